use std::future::Future;
use std::sync::{atomic::AtomicBool, atomic::Ordering, Arc};
use std::time::Duration;

use reqwest::{Client, Response};
use tracing::{debug, warn};

use crate::config::ResponsesApiConfig;
use crate::error::{describe_failure, ResponsesApiError};
use crate::headers::build_headers;
use crate::payload::{ResponsesInput, ResponsesRequest};
use crate::response::ResponsesResponse;
use crate::retry::{classify_status, classify_transport, Failure};
use crate::url::normalize_responses_url;

/// Raised from another thread to abandon the request in flight.
pub type CancellationSignal = Arc<AtomicBool>;

const CANCEL_POLL_INTERVAL: Duration = Duration::from_millis(25);

/// One failed attempt, with how the retry policy should treat it.
struct AttemptError {
    error: ResponsesApiError,
    failure: Failure,
}

#[derive(Debug)]
pub struct ResponsesApiClient {
    http: Client,
    config: ResponsesApiConfig,
}

impl ResponsesApiClient {
    pub fn new(config: ResponsesApiConfig) -> Result<Self, ResponsesApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            config,
        })
    }

    pub fn config(&self) -> &ResponsesApiConfig {
        &self.config
    }

    pub fn endpoint(&self) -> String {
        normalize_responses_url(&self.config.base_url)
    }

    /// Validates `request` and prepares the POST without sending it.
    pub fn build_request(
        &self,
        request: &ResponsesRequest,
    ) -> Result<reqwest::RequestBuilder, ResponsesApiError> {
        validate_request_payload(request)?;
        Ok(self
            .http
            .post(self.endpoint())
            .headers(build_headers(&self.config)?)
            .json(request))
    }

    /// Sends `request` until it succeeds, fails permanently or the retry
    /// policy runs out. Backoff pauses are interruptible.
    pub async fn send(
        &self,
        request: &ResponsesRequest,
        cancellation: Option<&CancellationSignal>,
    ) -> Result<Response, ResponsesApiError> {
        let policy = self.config.retry;
        let mut attempt = 0;

        loop {
            if is_cancelled(cancellation) {
                return Err(ResponsesApiError::Cancelled);
            }

            let AttemptError { error, failure } = match self.attempt(request, cancellation).await? {
                Ok(response) => return Ok(response),
                Err(failed) => failed,
            };

            let Some(pause) = policy.next_backoff(attempt, failure) else {
                if failure == Failure::Transient && attempt > 0 {
                    warn!(attempts = attempt + 1, %error, "responses request gave up");
                    return Err(ResponsesApiError::GaveUp {
                        attempts: attempt + 1,
                        last_error: error.to_string(),
                    });
                }
                return Err(error);
            };

            debug!(attempt, ?pause, %error, "retrying responses request");
            await_or_cancel(tokio::time::sleep(pause), cancellation).await?;
            attempt += 1;
        }
    }

    /// The outer `Result` only carries cancellation and request-building errors.
    async fn attempt(
        &self,
        request: &ResponsesRequest,
        cancellation: Option<&CancellationSignal>,
    ) -> Result<Result<Response, AttemptError>, ResponsesApiError> {
        let sent = await_or_cancel(self.build_request(request)?.send(), cancellation).await?;
        let response = match sent {
            Ok(response) => response,
            Err(error) => {
                return Ok(Err(AttemptError {
                    failure: classify_transport(&error),
                    error: ResponsesApiError::Request(error),
                }))
            }
        };

        let status = response.status();
        if status.is_success() {
            return Ok(Ok(response));
        }

        let body = await_or_cancel(response.text(), cancellation)
            .await?
            .unwrap_or_default();
        Ok(Err(AttemptError {
            failure: classify_status(status.as_u16(), &body),
            error: ResponsesApiError::Status(status, describe_failure(status, &body)),
        }))
    }

    /// Sends one request and decodes the full response body.
    pub async fn create(
        &self,
        request: &ResponsesRequest,
        cancellation: Option<&CancellationSignal>,
    ) -> Result<ResponsesResponse, ResponsesApiError> {
        let response = self.send(request, cancellation).await?;
        let body = await_or_cancel(response.text(), cancellation)
            .await?
            .map_err(ResponsesApiError::from)?;
        serde_json::from_str::<ResponsesResponse>(&body).map_err(ResponsesApiError::from)
    }

    /// Sends one request and returns only the reply text.
    pub async fn create_text(
        &self,
        request: &ResponsesRequest,
        cancellation: Option<&CancellationSignal>,
    ) -> Result<String, ResponsesApiError> {
        self.create(request, cancellation).await?.into_text()
    }
}

fn validate_request_payload(request: &ResponsesRequest) -> Result<(), ResponsesApiError> {
    if request.model.trim().is_empty() {
        return Err(ResponsesApiError::InvalidRequest(
            "'model' must not be empty".to_owned(),
        ));
    }

    if let ResponsesInput::Messages(messages) = &request.input {
        if messages.is_empty() {
            return Err(ResponsesApiError::InvalidRequest(
                "'input' message list must not be empty".to_owned(),
            ));
        }
    }

    Ok(())
}

fn is_cancelled(cancel: Option<&CancellationSignal>) -> bool {
    cancel.is_some_and(|token| token.load(Ordering::Acquire))
}

async fn await_or_cancel<F>(
    future: F,
    cancellation: Option<&CancellationSignal>,
) -> Result<F::Output, ResponsesApiError>
where
    F: Future,
{
    if cancellation.is_none() {
        return Ok(future.await);
    }

    let mut future = Box::pin(future);

    loop {
        if is_cancelled(cancellation) {
            return Err(ResponsesApiError::Cancelled);
        }

        if let Ok(output) = tokio::time::timeout(CANCEL_POLL_INTERVAL, &mut future).await {
            if is_cancelled(cancellation) {
                return Err(ResponsesApiError::Cancelled);
            }
            return Ok(output);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::validate_request_payload;
    use crate::error::ResponsesApiError;
    use crate::payload::{ResponsesInput, ResponsesRequest};

    #[test]
    fn validation_rejects_blank_model() {
        let request = ResponsesRequest::new(" ", ResponsesInput::Text("hi".to_owned()), None);
        assert!(matches!(
            validate_request_payload(&request),
            Err(ResponsesApiError::InvalidRequest(_))
        ));
    }

    #[test]
    fn validation_rejects_empty_message_list() {
        let request = ResponsesRequest::new("gpt-5.1", ResponsesInput::Messages(Vec::new()), None);
        assert!(matches!(
            validate_request_payload(&request),
            Err(ResponsesApiError::InvalidRequest(_))
        ));
    }

    #[test]
    fn validation_accepts_plain_text_input() {
        let request = ResponsesRequest::new("gpt-5.1", ResponsesInput::Text("hi".to_owned()), None);
        assert!(validate_request_payload(&request).is_ok());
    }
}
