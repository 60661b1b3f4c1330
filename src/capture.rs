use std::path::{Path, PathBuf};

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as Base64, Engine as _};

use quizsolver_core_types::SolveError;

/// Screenshot source for a solve cycle. Implementations hand back a PNG
/// data URI of the active page.
#[async_trait]
pub trait CapturePort: Send + Sync {
    async fn capture(&self) -> Result<String, SolveError>;
}

/// Base64 payload of a data URI: everything after the first comma. Inputs
/// without a comma are assumed to be bare payloads already.
pub fn data_uri_payload(uri: &str) -> &str {
    match uri.split_once(',') {
        Some((_, payload)) => payload,
        None => uri,
    }
}

/// Capture backed by a PNG file on disk, for the CLI `solve --screenshot`
/// path and tests.
pub struct PngFileCapture {
    path: PathBuf,
}

impl PngFileCapture {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CapturePort for PngFileCapture {
    async fn capture(&self) -> Result<String, SolveError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|err| SolveError::Capture(format!("{}: {err}", self.path.display())))?;
        Ok(format!("data:image/png;base64,{}", Base64.encode(bytes)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_follows_first_comma() {
        assert_eq!(data_uri_payload("data:image/png;base64,AAAA"), "AAAA");
        assert_eq!(data_uri_payload("data:text/plain,a,b"), "a,b");
    }

    #[test]
    fn bare_payload_passes_through() {
        assert_eq!(data_uri_payload("AAAA"), "AAAA");
    }

    #[tokio::test]
    async fn file_capture_encodes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shot.png");
        std::fs::write(&path, b"\x89PNG").unwrap();

        let capture = PngFileCapture::new(&path);
        let uri = capture.capture().await.unwrap();
        assert!(uri.starts_with("data:image/png;base64,"));
        assert_eq!(data_uri_payload(&uri), Base64.encode(b"\x89PNG"));
    }

    #[tokio::test]
    async fn missing_file_is_a_capture_error() {
        let capture = PngFileCapture::new("/nonexistent/shot.png");
        let err = capture.capture().await.unwrap_err();
        assert!(matches!(err, SolveError::Capture(_)));
    }
}
