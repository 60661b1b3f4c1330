use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use quizsolver_core_types::Answer;

use crate::errors::ApiError;
use crate::retry::{ClockPort, RetryPolicy, TokioClock};
use crate::types::{GenerateContentRequest, GenerateContentResponse};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-2.5-flash-preview-04-17";

#[derive(Clone, Debug)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

/// Raw HTTP reply, before structural validation.
#[derive(Clone, Debug)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport boundary; the retry loop is written against this so tests
/// script reply sequences without a server.
#[async_trait]
pub trait HttpPort: Send + Sync {
    async fn generate(
        &self,
        url: &str,
        request: &GenerateContentRequest,
    ) -> Result<HttpReply, ApiError>;
}

pub struct ReqwestPort {
    client: reqwest::Client,
}

impl ReqwestPort {
    pub fn new() -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(|err| ApiError::Network(err.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpPort for ReqwestPort {
    async fn generate(
        &self,
        url: &str,
        request: &GenerateContentRequest,
    ) -> Result<HttpReply, ApiError> {
        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(|err| ApiError::Network(err.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|err| ApiError::Network(err.to_string()))?;
        Ok(HttpReply { status, body })
    }
}

/// Client wrapping one `generateContent` call with the bounded retry
/// policy; validated text is handed straight to the answer parser.
pub struct GeminiClient {
    config: GeminiConfig,
    policy: RetryPolicy,
    http: Arc<dyn HttpPort>,
    clock: Arc<dyn ClockPort>,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, ApiError> {
        Ok(Self::with_ports(
            config,
            RetryPolicy::default(),
            Arc::new(ReqwestPort::new()?),
            Arc::new(TokioClock),
        ))
    }

    pub fn with_ports(
        config: GeminiConfig,
        policy: RetryPolicy,
        http: Arc<dyn HttpPort>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            config,
            policy,
            http,
            clock,
        }
    }

    /// Run the request to completion or exhaustion. Each failure, rate
    /// limit included, consumes one attempt; only the delay differs.
    pub async fn solve(&self, request: &GenerateContentRequest) -> Result<Answer, ApiError> {
        // Key travels in the query string; never log the URL.
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.config.base_url, self.config.model, self.config.api_key
        );

        let mut attempts = 0;
        loop {
            attempts += 1;
            match self.attempt(&url, request).await {
                Ok(text) => {
                    debug!(attempts, "model response accepted");
                    return Ok(answer_parser::parse(&text));
                }
                Err(err) => {
                    if attempts >= self.policy.max_attempts {
                        return Err(ApiError::Exhausted {
                            attempts,
                            last: err.to_string(),
                        });
                    }
                    let delay = self.policy.delay_for(&err);
                    warn!(
                        attempt = attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "API attempt failed, retrying"
                    );
                    self.clock.sleep(delay).await;
                }
            }
        }
    }

    async fn attempt(
        &self,
        url: &str,
        request: &GenerateContentRequest,
    ) -> Result<String, ApiError> {
        let reply = self.http.generate(url, request).await?;
        if !reply.is_success() {
            return Err(ApiError::Status {
                status: reply.status,
                body: reply.body,
            });
        }
        let response: GenerateContentResponse = serde_json::from_str(&reply.body)
            .map_err(|err| ApiError::InvalidResponse(err.to_string()))?;
        Ok(response.first_text()?.to_string())
    }
}
