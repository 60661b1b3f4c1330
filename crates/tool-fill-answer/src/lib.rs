pub mod api;
pub mod errors;
pub mod model;
pub mod policy;
pub mod ports;

mod letters;
mod runner;

pub use api::{FillTool, FillToolBuilder};
pub use model::{
    Control, ControlHandle, ControlKind, EventKind, ExecCtx, FillParams, FillReport, FillStrategy,
};
pub use policy::FillPolicyView;
