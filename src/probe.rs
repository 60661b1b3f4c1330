use async_trait::async_trait;
use tracing::debug;

use quizsolver_core_types::SolveError;

/// Selectors known to carry the logged-in display name on the target
/// learning platforms, probed in order.
pub const USER_NAME_SELECTORS: &[&str] = &[
    "h6.ng-tns-c1366681314-11",
    ".user-name",
    ".username",
    ".profile-name",
    "h6[class*=\"ng-tns\"]",
];

/// Read-only text lookup against the live page.
#[async_trait]
pub trait TextQueryPort: Send + Sync {
    async fn query_text(&self, selector: &str) -> Result<Option<String>, SolveError>;
}

/// First non-empty trimmed match across the selector list. Lookup
/// failures are logged and skipped; the name is cosmetic.
pub async fn resolve_user_name(port: &dyn TextQueryPort) -> Option<String> {
    for selector in USER_NAME_SELECTORS {
        match port.query_text(selector).await {
            Ok(Some(text)) => {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    return Some(trimmed.to_string());
                }
            }
            Ok(None) => {}
            Err(err) => {
                debug!(selector, error = %err, "user name lookup failed");
            }
        }
    }
    None
}
