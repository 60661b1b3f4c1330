use std::sync::Arc;

use tracing::{info, instrument, warn};

use gemini_client::{solve_request, GeminiClient};
use quizsolver_core_types::{Answer, SessionState, SolveError, SolveId, SolveSession, Stats};
use solve_store::{SolveStore, StoragePort};
use tool_fill_answer::{FillParams, FillReport, FillTool};
use tool_submit_form::{SubmitReport, SubmitTool};

use crate::capture::{data_uri_payload, CapturePort};
use crate::probe::{resolve_user_name, TextQueryPort};

/// Per-invocation overrides for the stored toggles. `None` reads the
/// persisted value.
#[derive(Clone, Copy, Debug, Default)]
pub struct SolveOptions {
    pub auto_fill: Option<bool>,
    pub auto_submit: Option<bool>,
}

/// Everything one completed cycle produced.
#[derive(Clone, Debug)]
pub struct SolveOutcome {
    pub answer: Answer,
    pub stats: Stats,
    pub fill: Option<FillReport>,
    pub submit: Option<SubmitReport>,
}

/// Drives one solve cycle end to end: capture, model call, store, then
/// the optional page-side steps. Capture and API failures abort the
/// cycle; injection failures downgrade to warnings.
pub struct SolveFlow<P: StoragePort> {
    session: SolveSession,
    store: SolveStore<P>,
    capture: Arc<dyn CapturePort>,
    client: GeminiClient,
    fill: Arc<dyn FillTool>,
    submit: Arc<dyn SubmitTool>,
    probe: Option<Arc<dyn TextQueryPort>>,
}

impl<P: StoragePort> SolveFlow<P> {
    pub fn new(
        store: SolveStore<P>,
        capture: Arc<dyn CapturePort>,
        client: GeminiClient,
        fill: Arc<dyn FillTool>,
        submit: Arc<dyn SubmitTool>,
    ) -> Self {
        Self {
            session: SolveSession::new(),
            store,
            capture,
            client,
            fill,
            submit,
            probe: None,
        }
    }

    pub fn with_probe(mut self, probe: Arc<dyn TextQueryPort>) -> Self {
        self.probe = Some(probe);
        self
    }

    pub fn store(&self) -> &SolveStore<P> {
        &self.store
    }

    pub fn session_state(&self) -> &SessionState {
        self.session.state()
    }

    /// One full cycle. Rejected with `SolveError::Busy` while another
    /// cycle is in flight on this flow.
    #[instrument(skip_all, fields(auto_fill = ?options.auto_fill, auto_submit = ?options.auto_submit))]
    pub async fn solve(&mut self, options: SolveOptions) -> Result<SolveOutcome, SolveError> {
        let solve_id = self.session.begin()?;
        info!(solve_id = %solve_id, "solve cycle started");
        let result = self.run_cycle(&solve_id, options).await;
        match result {
            Ok(outcome) => {
                self.session.complete();
                info!(solve_id = %solve_id, confidence = outcome.answer.confidence, "solve cycle finished");
                Ok(outcome)
            }
            Err(err) => {
                warn!(solve_id = %solve_id, error = %err, "solve cycle failed");
                self.session.fail(&err);
                Err(err)
            }
        }
    }

    async fn run_cycle(
        &self,
        solve_id: &SolveId,
        options: SolveOptions,
    ) -> Result<SolveOutcome, SolveError> {
        self.ensure_user_name().await;

        let image = self.capture.capture().await?;
        let request = solve_request(data_uri_payload(&image));
        let answer = self.client.solve(&request).await.map_err(SolveError::from)?;

        self.store.set_last_answer(&answer).await?;
        let stats = self.store.record_solved(&answer).await?;
        self.store.append_history(&answer).await?;

        let auto_fill = match options.auto_fill {
            Some(value) => value,
            None => self.store.auto_fill_enabled().await?,
        };
        let mut fill = None;
        if auto_fill {
            let ctx = tool_fill_answer::ExecCtx::new(solve_id.clone());
            match self
                .fill
                .run(ctx, FillParams::new(answer.answer_part.as_str()))
                .await
            {
                Ok(report) => {
                    if !report.filled {
                        warn!("no form control accepted the answer");
                    }
                    fill = Some(report);
                }
                Err(err) => warn!(error = %err, "answer injection failed"),
            }
        }

        let auto_submit = match options.auto_submit {
            Some(value) => value,
            None => self.store.auto_submit_enabled().await?,
        };
        let mut submit = None;
        if auto_submit {
            let ctx = tool_submit_form::ExecCtx::new(solve_id.clone());
            match self.submit.run(ctx).await {
                Ok(report) => {
                    if !report.submitted {
                        warn!("no submit control found on the page");
                    }
                    submit = Some(report);
                }
                Err(err) => warn!(error = %err, "form submission failed"),
            }
        }

        Ok(SolveOutcome {
            answer,
            stats,
            fill,
            submit,
        })
    }

    /// Populate the stored display name once, if a page probe is wired.
    async fn ensure_user_name(&self) {
        let Some(probe) = &self.probe else {
            return;
        };
        match self.store.user_name().await {
            Ok(Some(_)) => {}
            Ok(None) => {
                if let Some(name) = resolve_user_name(probe.as_ref()).await {
                    if let Err(err) = self.store.set_user_name(&name).await {
                        warn!(error = %err, "failed to persist user name");
                    }
                }
            }
            Err(err) => warn!(error = %err, "failed to read stored user name"),
        }
    }
}
