//! Solve-cycle orchestration and the CLI plumbing around the solver
//! crates: screenshot capture, configuration, and the detached page
//! backend used when no browser adapter is attached.

pub mod capture;
pub mod config;
pub mod flow;
pub mod page;
pub mod probe;

pub use capture::{data_uri_payload, CapturePort, PngFileCapture};
pub use config::{load_config, resolve_api_key, resolve_store_path, AppConfig, API_KEY_ENV};
pub use flow::{SolveFlow, SolveOptions, SolveOutcome};
pub use page::DetachedPage;
pub use probe::{resolve_user_name, TextQueryPort};
