pub mod api;
pub mod errors;
pub mod model;
pub mod policy;
pub mod ports;

mod runner;

pub use api::{SubmitTool, SubmitToolBuilder};
pub use model::{ExecCtx, FormHandle, SubmitControl, SubmitReport, SubmitVia};
pub use policy::SubmitPolicyView;
