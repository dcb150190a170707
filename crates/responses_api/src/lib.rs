//! Transport-only OpenAI Responses API client primitives.
//!
//! This crate owns request building, header policy, retry/backoff and response
//! parsing for the `/responses` endpoint. It has no knowledge of chat
//! sessions, modes or terminal output.
//!
//! Requests are non-streaming: one POST, one JSON body back. The reply text is
//! taken from `output_text` when the server provides it and otherwise
//! assembled from the `output_text` parts of every `message` output item.

pub mod client;
pub mod config;
pub mod error;
pub mod headers;
pub mod payload;
pub mod response;
pub mod retry;
pub mod url;

pub use client::{CancellationSignal, ResponsesApiClient};
pub use config::ResponsesApiConfig;
pub use error::ResponsesApiError;
pub use payload::{
    InputContent, InputMessage, ReasoningConfig, ResponsesInput, ResponsesRequest, ResponsesTool,
    WebSearchFilters,
};
pub use response::{OutputContent, OutputItem, ResponsesResponse};
pub use retry::RetryPolicy;
pub use url::normalize_responses_url;
