use std::time::Duration;

use crate::retry::RetryPolicy;
use crate::url::DEFAULT_OPENAI_BASE_URL;

/// Everything the client needs to reach one Responses API deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponsesApiConfig {
    /// Sent as a bearer token.
    pub api_key: String,
    /// `/responses` is appended when missing.
    pub base_url: String,
    pub timeout: Option<Duration>,
    pub retry: RetryPolicy,
}

impl ResponsesApiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            timeout: None,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}
