use std::fmt;

use reqwest::StatusCode;
use serde::Deserialize;

/// Everything that can go wrong between building a request and reading its reply text.
#[derive(Debug)]
pub enum ResponsesApiError {
    MissingApiKey,
    InvalidRequest(String),
    Request(reqwest::Error),
    /// Non-success HTTP answer, already turned into a user-facing message.
    Status(StatusCode, String),
    Json(serde_json::Error),
    /// Every attempt the retry policy allowed failed transiently.
    GaveUp {
        attempts: u32,
        last_error: String,
    },
    /// The body decoded but reported `status: "failed"`.
    ResponseFailed {
        code: Option<String>,
        message: String,
    },
    EmptyOutput {
        status: Option<String>,
    },
    Cancelled,
    Runtime(String),
}

impl fmt::Display for ResponsesApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingApiKey => f.write_str("API key is required (set OPENAI_API_KEY)"),
            Self::InvalidRequest(reason) => write!(f, "invalid request: {reason}"),
            Self::Request(error) if error.is_connect() || error.is_timeout() => {
                write!(f, "no connection to the OpenAI API: {error}")
            }
            Self::Request(error) => write!(f, "request error: {error}"),
            Self::Status(status, message) => write!(f, "HTTP {}: {message}", status.as_u16()),
            Self::Json(error) => write!(f, "malformed response body: {error}"),
            Self::GaveUp {
                attempts,
                last_error,
            } => write!(f, "giving up after {attempts} attempts: {last_error}"),
            Self::ResponseFailed {
                code: Some(code),
                message,
            } if !code.trim().is_empty() => write!(f, "response failed ({code}): {message}"),
            Self::ResponseFailed { message, .. } => write!(f, "response failed: {message}"),
            Self::EmptyOutput {
                status: Some(status),
            } => write!(f, "response contained no output text (status: {status})"),
            Self::EmptyOutput { status: None } => f.write_str("response contained no output text"),
            Self::Cancelled => f.write_str("request was cancelled"),
            Self::Runtime(message) => f.write_str(message),
        }
    }
}

impl std::error::Error for ResponsesApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Request(error) => Some(error),
            Self::Json(error) => Some(error),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ResponsesApiError {
    fn from(error: reqwest::Error) -> Self {
        Self::Request(error)
    }
}

impl From<serde_json::Error> for ResponsesApiError {
    fn from(error: serde_json::Error) -> Self {
        Self::Json(error)
    }
}

/// `{"error": {...}}` as the API sends it on failures.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorBody>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
}

/// Turns an error response into a one-line message for the terminal.
///
/// Bad keys, exhausted quota and rate limits get a fixed hint with the server
/// detail in parentheses. Other JSON errors show the server message; anything
/// else shows the raw body, or the status reason when the body is empty.
pub fn describe_failure(status: StatusCode, body: &str) -> String {
    let parsed = serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.error);

    if let Some(error) = parsed {
        let detail = error.message.as_deref().map(str::trim).filter(|m| !m.is_empty());
        let code = error
            .code
            .as_deref()
            .or(error.kind.as_deref())
            .unwrap_or_default();

        match (hint_for(status, code), detail) {
            (Some(hint), Some(detail)) => return format!("{hint} ({detail})"),
            (Some(hint), None) => return hint.to_owned(),
            (None, Some(detail)) => return detail.to_owned(),
            (None, None) => {}
        }
    }

    if body.trim().is_empty() {
        status.canonical_reason().unwrap_or("request failed").to_owned()
    } else {
        body.to_owned()
    }
}

fn hint_for(status: StatusCode, code: &str) -> Option<&'static str> {
    if status == StatusCode::UNAUTHORIZED || code == "invalid_api_key" {
        Some("Invalid API key. Please check your OPENAI_API_KEY.")
    } else if code.eq_ignore_ascii_case("insufficient_quota") {
        Some("Quota exceeded. Please check your OpenAI plan and billing details.")
    } else if status == StatusCode::TOO_MANY_REQUESTS {
        Some("Rate limit reached. Please wait a moment and try again.")
    } else {
        None
    }
}
