use tracing::{debug, instrument, warn};

use quizsolver_core_types::SolveError;

use crate::errors::SubmitError;
use crate::model::{ExecCtx, SubmitReport};
use crate::policy::SubmitPolicyView;
use crate::ports::SubmitPort;

pub struct RuntimeDeps<'a> {
    pub page: &'a dyn SubmitPort,
    pub policy: &'a SubmitPolicyView,
}

/// Walk the selector patterns in order and click the first visible,
/// enabled match; fall back to submitting the first plain form. A
/// selector that fails against the page is skipped, not fatal.
#[instrument(skip_all, fields(solve = %ctx.solve_id))]
pub async fn execute(ctx: &ExecCtx, deps: RuntimeDeps<'_>) -> Result<SubmitReport, SolveError> {
    if !deps.policy.enabled {
        return Err(SubmitError::Disabled.into());
    }

    for selector in &deps.policy.selectors {
        let matches = match deps.page.find_matches(selector).await {
            Ok(matches) => matches,
            Err(err) => {
                warn!(selector = selector.as_str(), error = %err, "selector failed, skipping");
                continue;
            }
        };
        for control in matches {
            if !control.visible || !control.enabled {
                continue;
            }
            deps.page.click(&control.handle).await?;
            debug!(selector = selector.as_str(), "submit control clicked");
            return Ok(SubmitReport::clicked(selector));
        }
    }

    let forms = deps.page.find_forms().await?;
    if let Some(form) = forms.first() {
        deps.page.submit_form(form).await?;
        debug!("no submit control matched, first form submitted directly");
        return Ok(SubmitReport::form_submitted());
    }

    Ok(SubmitReport::default())
}
