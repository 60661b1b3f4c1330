use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use gemini_client::types::GenerateContentRequest;
use gemini_client::{ApiError, ClockPort, GeminiClient, GeminiConfig, HttpPort, HttpReply, RetryPolicy};
use quizsolver_cli::{CapturePort, SolveFlow, SolveOptions, TextQueryPort};
use quizsolver_core_types::{SessionState, SolveError};
use solve_store::{MemoryStore, SolveStore};
use tool_fill_answer::model::{Control, ControlHandle, ControlKind, EventKind};
use tool_fill_answer::ports::PagePort;
use tool_fill_answer::{FillPolicyView, FillStrategy, FillToolBuilder};
use tool_submit_form::model::{FormHandle, SubmitControl};
use tool_submit_form::ports::SubmitPort;
use tool_submit_form::{SubmitPolicyView, SubmitToolBuilder, SubmitVia};

struct FixedCapture {
    uri: Option<String>,
}

#[async_trait]
impl CapturePort for FixedCapture {
    async fn capture(&self) -> Result<String, SolveError> {
        match &self.uri {
            Some(uri) => Ok(uri.clone()),
            None => Err(SolveError::Capture("no active tab".into())),
        }
    }
}

struct ScriptedHttp {
    replies: Mutex<Vec<Result<HttpReply, ApiError>>>,
}

#[async_trait]
impl HttpPort for ScriptedHttp {
    async fn generate(
        &self,
        _url: &str,
        _request: &GenerateContentRequest,
    ) -> Result<HttpReply, ApiError> {
        self.replies.lock().remove(0)
    }
}

struct InstantClock;

#[async_trait]
impl ClockPort for InstantClock {
    async fn sleep(&self, _duration: Duration) {}
}

#[derive(Default)]
struct QuizPage {
    radios: Vec<Control>,
    checked: Mutex<Vec<ControlHandle>>,
    events: Mutex<Vec<(ControlHandle, EventKind)>>,
    clicked: Mutex<Vec<FormHandle>>,
}

#[async_trait]
impl PagePort for QuizPage {
    async fn find_controls(&self, kind: ControlKind) -> Result<Vec<Control>, SolveError> {
        Ok(match kind {
            ControlKind::Radio => self.radios.clone(),
            _ => Vec::new(),
        })
    }

    async fn set_checked(&self, handle: &ControlHandle, checked: bool) -> Result<(), SolveError> {
        if checked {
            self.checked.lock().push(handle.clone());
        }
        Ok(())
    }

    async fn set_text(&self, _handle: &ControlHandle, _text: &str) -> Result<(), SolveError> {
        Ok(())
    }

    async fn fire_event(&self, handle: &ControlHandle, event: EventKind) -> Result<(), SolveError> {
        self.events.lock().push((handle.clone(), event));
        Ok(())
    }
}

#[async_trait]
impl SubmitPort for QuizPage {
    async fn find_matches(&self, selector: &str) -> Result<Vec<SubmitControl>, SolveError> {
        Ok(if selector == "button[type=\"submit\"]" {
            vec![SubmitControl::new("btn-submit")]
        } else {
            Vec::new()
        })
    }

    async fn click(&self, handle: &FormHandle) -> Result<(), SolveError> {
        self.clicked.lock().push(handle.clone());
        Ok(())
    }

    async fn find_forms(&self) -> Result<Vec<FormHandle>, SolveError> {
        Ok(Vec::new())
    }

    async fn submit_form(&self, _handle: &FormHandle) -> Result<(), SolveError> {
        Ok(())
    }
}

fn answer_body(letter: &str) -> String {
    serde_json::json!({
        "candidates": [{"content": {"parts": [{"text": format!(
            "[ĐÁP ÁN]\n{letter}\n\n[GIẢI THÍCH]\nlựa chọn đúng\n\n[ĐỘ TIN CẬY]\n85%"
        )}]}}]
    })
    .to_string()
}

fn client_with(replies: Vec<Result<HttpReply, ApiError>>) -> GeminiClient {
    GeminiClient::with_ports(
        GeminiConfig::new("test-key"),
        RetryPolicy::default(),
        Arc::new(ScriptedHttp {
            replies: Mutex::new(replies),
        }),
        Arc::new(InstantClock),
    )
}

fn quiz_page() -> Arc<QuizPage> {
    Arc::new(QuizPage {
        radios: vec![
            Control::new("r0", ControlKind::Radio).with_label("A. Huế"),
            Control::new("r1", ControlKind::Radio).with_label("B. Hà Nội"),
            Control::new("r2", ControlKind::Radio).with_label("C. Đà Nẵng"),
        ],
        ..Default::default()
    })
}

fn flow_with(
    page: Arc<QuizPage>,
    capture: FixedCapture,
    client: GeminiClient,
) -> SolveFlow<MemoryStore> {
    let fill = FillToolBuilder::new(FillPolicyView::default())
        .with_page(page.clone())
        .build();
    let submit = SubmitToolBuilder::new(SubmitPolicyView::default())
        .with_page(page)
        .build();
    SolveFlow::new(
        SolveStore::new(MemoryStore::new()),
        Arc::new(capture),
        client,
        fill,
        submit,
    )
}

#[tokio::test]
async fn full_cycle_fills_submits_and_records() {
    let page = quiz_page();
    let capture = FixedCapture {
        uri: Some("data:image/png;base64,AAAA".into()),
    };
    let client = client_with(vec![Ok(HttpReply {
        status: 200,
        body: answer_body("B"),
    })]);

    let mut flow = flow_with(page.clone(), capture, client);
    let outcome = flow
        .solve(SolveOptions {
            auto_fill: Some(true),
            auto_submit: Some(true),
        })
        .await
        .unwrap();

    assert_eq!(outcome.answer.answer_part, "B");
    assert_eq!(outcome.answer.confidence, 85);
    assert_eq!(outcome.stats.solved, 1);
    assert_eq!(outcome.stats.total_time, 5);
    assert_eq!(outcome.stats.total_confidence, 85);

    let fill = outcome.fill.expect("fill ran");
    assert!(fill.filled);
    assert_eq!(fill.strategy, Some(FillStrategy::SingleChoice));
    assert_eq!(*page.checked.lock(), vec![ControlHandle("r1".into())]);

    let submit = outcome.submit.expect("submit ran");
    assert_eq!(
        submit.via,
        Some(SubmitVia::Selector("button[type=\"submit\"]".into()))
    );
    assert_eq!(*page.clicked.lock(), vec![FormHandle("btn-submit".into())]);

    let store = flow.store();
    let last = store.last_answer().await.unwrap().unwrap();
    assert_eq!(last, outcome.answer);
    assert_eq!(store.history().await.unwrap().len(), 1);
    assert_eq!(flow.session_state(), &SessionState::Idle);
}

#[tokio::test]
async fn toggles_off_skip_page_interaction() {
    let page = quiz_page();
    let capture = FixedCapture {
        uri: Some("data:image/png;base64,AAAA".into()),
    };
    let client = client_with(vec![Ok(HttpReply {
        status: 200,
        body: answer_body("A"),
    })]);

    let mut flow = flow_with(page.clone(), capture, client);
    let outcome = flow.solve(SolveOptions::default()).await.unwrap();

    assert!(outcome.fill.is_none());
    assert!(outcome.submit.is_none());
    assert!(page.checked.lock().is_empty());
    assert!(page.clicked.lock().is_empty());
    // The answer is still recorded.
    assert_eq!(flow.store().stats().await.unwrap().solved, 1);
}

#[tokio::test]
async fn auto_fill_without_matching_controls_still_succeeds() {
    let page = Arc::new(QuizPage::default());
    let capture = FixedCapture {
        uri: Some("data:image/png;base64,AAAA".into()),
    };
    let client = client_with(vec![Ok(HttpReply {
        status: 200,
        body: answer_body("B"),
    })]);

    let mut flow = flow_with(page, capture, client);
    let outcome = flow
        .solve(SolveOptions {
            auto_fill: Some(true),
            auto_submit: None,
        })
        .await
        .unwrap();

    // Nothing on the page accepted the answer, but the cycle completed
    // and the answer was recorded anyway.
    let fill = outcome.fill.expect("fill ran");
    assert!(!fill.filled);
    assert!(fill.strategy.is_none());
    assert_eq!(flow.store().stats().await.unwrap().solved, 1);
    assert_eq!(flow.store().history().await.unwrap().len(), 1);
    assert_eq!(flow.session_state(), &SessionState::Idle);
}

struct CountingTextQuery {
    calls: Mutex<usize>,
}

#[async_trait]
impl TextQueryPort for CountingTextQuery {
    async fn query_text(&self, selector: &str) -> Result<Option<String>, SolveError> {
        *self.calls.lock() += 1;
        Ok((selector == ".username").then(|| "Minh Anh".to_string()))
    }
}

#[tokio::test]
async fn user_name_is_looked_up_once_then_persisted() {
    let page = quiz_page();
    let text_query = Arc::new(CountingTextQuery {
        calls: Mutex::new(0),
    });
    let client = client_with(vec![
        Ok(HttpReply {
            status: 200,
            body: answer_body("A"),
        }),
        Ok(HttpReply {
            status: 200,
            body: answer_body("B"),
        }),
    ]);

    let fill = FillToolBuilder::new(FillPolicyView::default())
        .with_page(page.clone())
        .build();
    let submit = SubmitToolBuilder::new(SubmitPolicyView::default())
        .with_page(page)
        .build();
    let mut flow = SolveFlow::new(
        SolveStore::new(MemoryStore::new()),
        Arc::new(FixedCapture {
            uri: Some("data:image/png;base64,AAAA".into()),
        }),
        client,
        fill,
        submit,
    )
    .with_probe(text_query.clone());

    flow.solve(SolveOptions::default()).await.unwrap();
    assert_eq!(
        flow.store().user_name().await.unwrap().as_deref(),
        Some("Minh Anh")
    );
    let after_first = *text_query.calls.lock();
    assert!(after_first >= 1);

    // The stored name makes the second cycle skip the page lookup.
    flow.solve(SolveOptions::default()).await.unwrap();
    assert_eq!(*text_query.calls.lock(), after_first);
}

#[tokio::test]
async fn api_exhaustion_fails_the_session_and_records_nothing() {
    let page = quiz_page();
    let capture = FixedCapture {
        uri: Some("data:image/png;base64,AAAA".into()),
    };
    let client = client_with(vec![
        Err(ApiError::Network("refused".into())),
        Err(ApiError::Network("refused".into())),
        Err(ApiError::Network("refused".into())),
    ]);

    let mut flow = flow_with(page, capture, client);
    let err = flow.solve(SolveOptions::default()).await.unwrap_err();
    assert!(matches!(err, SolveError::ApiExhausted { attempts: 3, .. }));

    assert!(matches!(flow.session_state(), SessionState::Failed { .. }));
    assert!(flow.store().history().await.unwrap().is_empty());
    assert_eq!(flow.store().stats().await.unwrap().solved, 0);
}

struct FlakyCapture {
    replies: Mutex<Vec<Result<String, SolveError>>>,
}

#[async_trait]
impl CapturePort for FlakyCapture {
    async fn capture(&self) -> Result<String, SolveError> {
        self.replies.lock().remove(0)
    }
}

#[tokio::test]
async fn failed_session_can_solve_again() {
    let page = quiz_page();
    let client = client_with(vec![Ok(HttpReply {
        status: 200,
        body: answer_body("C"),
    })]);
    let capture = FlakyCapture {
        replies: Mutex::new(vec![
            Err(SolveError::Capture("no active tab".into())),
            Ok("data:image/png;base64,AAAA".into()),
        ]),
    };

    let fill = FillToolBuilder::new(FillPolicyView::default())
        .with_page(page.clone())
        .build();
    let submit = SubmitToolBuilder::new(SubmitPolicyView::default())
        .with_page(page)
        .build();
    let mut flow = SolveFlow::new(
        SolveStore::new(MemoryStore::new()),
        Arc::new(capture),
        client,
        fill,
        submit,
    );

    let err = flow.solve(SolveOptions::default()).await.unwrap_err();
    assert!(matches!(err, SolveError::Capture(_)));
    assert!(matches!(flow.session_state(), SessionState::Failed { .. }));

    // Same flow accepts a fresh request after the failure.
    let outcome = flow.solve(SolveOptions::default()).await.unwrap();
    assert_eq!(outcome.answer.answer_part, "C");
    assert_eq!(flow.session_state(), &SessionState::Idle);
}
