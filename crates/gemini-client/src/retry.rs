use std::time::Duration;

use async_trait::async_trait;

use crate::errors::ApiError;

/// Bounded retry with a per-failure delay table. Kept as an explicit
/// policy object so tests drive it with a fake clock.
#[derive(Clone, Copy, Debug)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub rate_limit_delay: Duration,
    pub failure_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            rate_limit_delay: Duration::from_millis(1500),
            failure_delay: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    pub fn delay_for(&self, failure: &ApiError) -> Duration {
        if failure.is_rate_limited() {
            self.rate_limit_delay
        } else {
            self.failure_delay
        }
    }
}

#[async_trait]
pub trait ClockPort: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

pub struct TokioClock;

#[async_trait]
impl ClockPort for TokioClock {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_table() {
        let policy = RetryPolicy::default();
        let rate_limited = ApiError::Status {
            status: 429,
            body: "quota".into(),
        };
        let server_error = ApiError::Status {
            status: 500,
            body: "boom".into(),
        };
        let network = ApiError::Network("reset".into());
        assert_eq!(policy.delay_for(&rate_limited), Duration::from_millis(1500));
        assert_eq!(policy.delay_for(&server_error), Duration::from_millis(1000));
        assert_eq!(policy.delay_for(&network), Duration::from_millis(1000));
    }
}
