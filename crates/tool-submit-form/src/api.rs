use std::sync::Arc;

use async_trait::async_trait;

use quizsolver_core_types::SolveError;

use crate::model::{ExecCtx, SubmitReport};
use crate::policy::SubmitPolicyView;
use crate::ports::SubmitPort;
use crate::runner::{execute, RuntimeDeps};

#[async_trait]
pub trait SubmitTool: Send + Sync {
    async fn run(&self, ctx: ExecCtx) -> Result<SubmitReport, SolveError>;
}

pub struct SubmitToolBuilder {
    policy: SubmitPolicyView,
    page: Option<Arc<dyn SubmitPort>>,
}

impl SubmitToolBuilder {
    pub fn new(policy: SubmitPolicyView) -> Self {
        Self { policy, page: None }
    }

    pub fn with_page(mut self, port: Arc<dyn SubmitPort>) -> Self {
        self.page = Some(port);
        self
    }

    pub fn build(self) -> Arc<dyn SubmitTool> {
        Arc::new(SubmitToolImpl {
            policy: self.policy,
            page: self.page.expect("submit port is required"),
        })
    }
}

pub struct SubmitToolImpl {
    policy: SubmitPolicyView,
    page: Arc<dyn SubmitPort>,
}

#[async_trait]
impl SubmitTool for SubmitToolImpl {
    async fn run(&self, ctx: ExecCtx) -> Result<SubmitReport, SolveError> {
        let deps = RuntimeDeps {
            page: self.page.as_ref(),
            policy: &self.policy,
        };
        execute(&ctx, deps).await
    }
}
