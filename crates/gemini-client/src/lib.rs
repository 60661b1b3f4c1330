//! Retrying client for the Gemini `generateContent` REST endpoint.

pub mod client;
pub mod errors;
pub mod prompt;
pub mod retry;
pub mod types;

pub use client::{GeminiClient, GeminiConfig, HttpPort, HttpReply, ReqwestPort};
pub use errors::ApiError;
pub use prompt::solve_request;
pub use retry::{ClockPort, RetryPolicy, TokioClock};
