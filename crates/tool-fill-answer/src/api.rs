use std::sync::Arc;

use async_trait::async_trait;

use quizsolver_core_types::SolveError;

use crate::model::{ExecCtx, FillParams, FillReport};
use crate::policy::FillPolicyView;
use crate::ports::PagePort;
use crate::runner::{execute, RuntimeDeps};

#[async_trait]
pub trait FillTool: Send + Sync {
    async fn run(&self, ctx: ExecCtx, params: FillParams) -> Result<FillReport, SolveError>;
}

pub struct FillToolBuilder {
    policy: FillPolicyView,
    page: Option<Arc<dyn PagePort>>,
}

impl FillToolBuilder {
    pub fn new(policy: FillPolicyView) -> Self {
        Self { policy, page: None }
    }

    pub fn with_page(mut self, port: Arc<dyn PagePort>) -> Self {
        self.page = Some(port);
        self
    }

    pub fn build(self) -> Arc<dyn FillTool> {
        Arc::new(FillToolImpl {
            policy: self.policy,
            page: self.page.expect("page port is required"),
        })
    }
}

pub struct FillToolImpl {
    policy: FillPolicyView,
    page: Arc<dyn PagePort>,
}

#[async_trait]
impl FillTool for FillToolImpl {
    async fn run(&self, ctx: ExecCtx, params: FillParams) -> Result<FillReport, SolveError> {
        let deps = RuntimeDeps {
            page: self.page.as_ref(),
            policy: &self.policy,
        };
        execute(&ctx, params, deps).await
    }
}
