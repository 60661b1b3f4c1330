use tracing::{debug, instrument, warn};

use quizsolver_core_types::SolveError;

use crate::errors::FillError;
use crate::letters;
use crate::model::{
    Control, ControlKind, EventKind, ExecCtx, FillParams, FillReport, FillStrategy,
};
use crate::policy::FillPolicyView;
use crate::ports::PagePort;

pub struct RuntimeDeps<'a> {
    pub page: &'a dyn PagePort,
    pub policy: &'a FillPolicyView,
}

/// Free-text collection order mirrors the page scan: plain inputs first,
/// then textareas, then editable/rich surfaces.
const TEXT_KINDS: [ControlKind; 4] = [
    ControlKind::TextInput,
    ControlKind::TextArea,
    ControlKind::ContentEditable,
    ControlKind::RichEditor,
];

/// Try the three strategies in strict order; the first success wins and
/// no fallback runs after it. Runs against arbitrary third-party pages,
/// so page-port failures downgrade to a failed strategy instead of
/// aborting the attempt.
#[instrument(skip_all, fields(solve = %ctx.solve_id))]
pub async fn execute(
    ctx: &ExecCtx,
    params: FillParams,
    deps: RuntimeDeps<'_>,
) -> Result<FillReport, SolveError> {
    if !deps.policy.enabled {
        return Err(FillError::Disabled.into());
    }
    if params.answer_text.is_empty() {
        return Err(FillError::EmptyAnswer.into());
    }

    let answer = params.answer_text.as_str();

    if let Some(report) =
        attempt(single_choice(deps.page, deps.policy, answer).await, "single-choice")
    {
        return Ok(report);
    }
    if let Some(report) =
        attempt(multi_choice(deps.page, deps.policy, answer).await, "multi-choice")
    {
        return Ok(report);
    }
    if let Some(report) = attempt(free_text(deps.page, deps.policy, answer).await, "free-text") {
        return Ok(report);
    }

    debug!("no strategy matched any control");
    Ok(FillReport::unmatched())
}

fn attempt(
    outcome: Result<Option<FillReport>, SolveError>,
    strategy: &str,
) -> Option<FillReport> {
    match outcome {
        Ok(report) => report,
        Err(err) => {
            warn!(strategy, error = %err, "strategy failed against page, continuing");
            None
        }
    }
}

/// Strategy 1: one radio control selected from a single choice letter.
async fn single_choice(
    page: &dyn PagePort,
    policy: &FillPolicyView,
    answer: &str,
) -> Result<Option<FillReport>, SolveError> {
    let radios = page.find_controls(ControlKind::Radio).await?;
    if radios.is_empty() {
        return Ok(None);
    }
    let Some(letter) = letters::single_choice_letter(answer, &policy.letters) else {
        return Ok(None);
    };

    for radio in &radios {
        if label_matches(radio, letter) {
            page.set_checked(&radio.handle, true).await?;
            page.fire_event(&radio.handle, EventKind::Click).await?;
            page.fire_event(&radio.handle, EventKind::Change).await?;
            debug!(letter = %letter, "single-choice control selected");
            return Ok(Some(FillReport::success(FillStrategy::SingleChoice, 1)));
        }
    }
    Ok(None)
}

/// Strategy 2: reset every checkbox, then check all whose label matches
/// any letter found in the answer.
async fn multi_choice(
    page: &dyn PagePort,
    policy: &FillPolicyView,
    answer: &str,
) -> Result<Option<FillReport>, SolveError> {
    let checkboxes = page.find_controls(ControlKind::Checkbox).await?;
    if checkboxes.is_empty() {
        return Ok(None);
    }
    let options = letters::multi_choice_letters(answer, &policy.letters);
    if options.is_empty() {
        return Ok(None);
    }

    for checkbox in &checkboxes {
        page.set_checked(&checkbox.handle, false).await?;
        page.fire_event(&checkbox.handle, EventKind::Change).await?;
    }

    let mut selected = 0;
    for letter in options {
        for checkbox in &checkboxes {
            if label_matches(checkbox, letter) {
                page.set_checked(&checkbox.handle, true).await?;
                page.fire_event(&checkbox.handle, EventKind::Change).await?;
                selected += 1;
            }
        }
    }

    if selected > 0 {
        Ok(Some(FillReport::success(FillStrategy::MultiChoice, selected)))
    } else {
        Ok(None)
    }
}

/// Strategy 3: positional assignment into visible text surfaces.
async fn free_text(
    page: &dyn PagePort,
    policy: &FillPolicyView,
    answer: &str,
) -> Result<Option<FillReport>, SolveError> {
    let mut fields: Vec<Control> = Vec::new();
    for kind in TEXT_KINDS {
        let controls = page.find_controls(kind).await?;
        fields.extend(controls.into_iter().filter(|control| !control.hidden));
    }
    if fields.is_empty() {
        return Ok(None);
    }

    let mut clean = answer.trim().to_string();
    for marker in &policy.strip_markers {
        clean = clean.replace(marker, "");
    }
    let clean = clean.trim();

    if fields.len() == 1 {
        let field = &fields[0];
        write_text(page, field, clean).await?;
        return Ok(Some(FillReport::success(FillStrategy::FreeText, 1)));
    }

    // Positional best-effort pairing of non-empty lines to fields; extra
    // fields or extra lines are left unmatched.
    let lines: Vec<&str> = clean
        .split('\n')
        .filter(|line| !line.trim().is_empty())
        .collect();
    let mut filled = 0;
    for (field, line) in fields.iter().zip(lines.iter()) {
        write_text(page, field, line.trim()).await?;
        filled += 1;
    }

    if filled > 0 {
        Ok(Some(FillReport::success(FillStrategy::FreeText, filled)))
    } else {
        Ok(None)
    }
}

async fn write_text(page: &dyn PagePort, field: &Control, text: &str) -> Result<(), SolveError> {
    page.set_text(&field.handle, text).await?;
    page.fire_event(&field.handle, EventKind::Input).await?;
    if field.kind.is_plain_text() {
        page.fire_event(&field.handle, EventKind::Change).await?;
    }
    Ok(())
}

/// Label rule shared by both choice strategies: immediate label starts
/// with the letter, or the surrounding text contains "X." / "X)".
fn label_matches(control: &Control, letter: char) -> bool {
    if control.label.trim().starts_with(letter) {
        return true;
    }
    control.context.contains(&format!("{letter}."))
        || control.context.contains(&format!("{letter})"))
}
