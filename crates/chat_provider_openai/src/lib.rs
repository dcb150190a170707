//! OpenAI Responses API-backed implementation of the shared `chat_provider` contract.
//!
//! This adapter translates provider-neutral `ChatRequest`s into
//! `responses_api` payloads and blocks on a current-thread runtime per request,
//! so callers stay fully synchronous.

use std::sync::Arc;
use std::time::Duration;

use chat_provider::{
    CancelSignal, ChatError, ChatInput, ChatProvider, ChatRequest, ChatTool, ProviderInitError,
    ProviderProfile, Role, Turn,
};
use responses_api::{
    InputMessage, ResponsesApiClient, ResponsesApiConfig, ResponsesApiError, ResponsesInput,
    ResponsesRequest, ResponsesTool, WebSearchFilters,
};
use tracing::debug;

/// Stable provider identifier used by `kit` startup selection.
pub const OPENAI_PROVIDER_ID: &str = "openai";

/// Runtime configuration for the OpenAI provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenAiProviderConfig {
    pub api_key: String,
    pub base_url: Option<String>,
    pub timeout: Option<Duration>,
}

impl OpenAiProviderConfig {
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: None,
            timeout: None,
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn into_api_config(self) -> ResponsesApiConfig {
        let mut config = ResponsesApiConfig::new(self.api_key);

        if let Some(base_url) = self.base_url {
            config = config.with_base_url(base_url);
        }

        if let Some(timeout) = self.timeout {
            config = config.with_timeout(timeout);
        }

        config
    }
}

trait ResponsesTransport: Send + Sync {
    fn create_text(
        &self,
        request: &ResponsesRequest,
        cancel: &CancelSignal,
    ) -> Result<String, ResponsesApiError>;
}

#[derive(Debug)]
struct DefaultTransport {
    client: ResponsesApiClient,
}

impl ResponsesTransport for DefaultTransport {
    fn create_text(
        &self,
        request: &ResponsesRequest,
        cancel: &CancelSignal,
    ) -> Result<String, ResponsesApiError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|error| {
                ResponsesApiError::Runtime(format!("failed to initialize tokio runtime: {error}"))
            })?;

        runtime.block_on(self.client.create_text(request, Some(cancel)))
    }
}

/// `ChatProvider` adapter backed by `responses_api` transport primitives.
pub struct OpenAiProvider {
    transport: Arc<dyn ResponsesTransport>,
}

impl OpenAiProvider {
    /// Creates a provider using real Responses API transport.
    pub fn new(config: OpenAiProviderConfig) -> Result<Self, ProviderInitError> {
        if config.api_key.trim().is_empty() {
            return Err(ProviderInitError::MissingCredential {
                variable: "OPENAI_API_KEY",
            });
        }

        let transport = Arc::new(DefaultTransport {
            client: ResponsesApiClient::new(config.into_api_config()).map_err(map_init_error)?,
        });

        Ok(Self { transport })
    }

    #[cfg(test)]
    fn with_transport_for_tests(transport: Arc<dyn ResponsesTransport>) -> Self {
        Self { transport }
    }
}

impl ChatProvider for OpenAiProvider {
    fn profile(&self) -> ProviderProfile {
        ProviderProfile {
            provider_id: OPENAI_PROVIDER_ID.to_string(),
        }
    }

    fn complete(&self, req: ChatRequest, cancel: CancelSignal) -> Result<String, ChatError> {
        let request = to_responses_request(req);
        debug!(model = %request.model, tools = request.tools.len(), "sending responses request");

        match self.transport.create_text(&request, &cancel) {
            Ok(text) => Ok(text),
            Err(ResponsesApiError::Cancelled) => Err(ChatError::Cancelled),
            Err(error) => Err(ChatError::Failed(error.to_string())),
        }
    }
}

/// Maps a provider-neutral request onto the Responses API payload.
pub fn to_responses_request(req: ChatRequest) -> ResponsesRequest {
    let input = match req.input {
        ChatInput::Text(text) => ResponsesInput::Text(text),
        ChatInput::Conversation(turns) => {
            ResponsesInput::Messages(turns.iter().map(input_message).collect())
        }
    };
    let instructions = Some(req.instructions).filter(|value| !value.trim().is_empty());

    let mut request = ResponsesRequest::new(req.model, input, instructions);
    if let Some(effort) = req.reasoning_effort.filter(|value| !value.trim().is_empty()) {
        request = request.with_reasoning_effort(effort);
    }

    for tool in req.tools {
        request = match tool {
            ChatTool::WebSearch { allowed_domains } => {
                let filters = if allowed_domains.is_empty() {
                    None
                } else {
                    Some(WebSearchFilters { allowed_domains })
                };
                request.with_tool(ResponsesTool::WebSearch { filters })
            }
        };
    }

    if request.tools.iter().any(|tool| {
        matches!(
            tool,
            ResponsesTool::WebSearch {
                filters: Some(_),
            }
        )
    }) {
        request.tool_choice = Some("auto".to_owned());
        request.include = vec!["web_search_call.action.sources".to_owned()];
    }

    request
}

fn input_message(turn: &Turn) -> InputMessage {
    match turn.role {
        Role::User => InputMessage::user(turn.content.clone()),
        Role::Assistant => InputMessage::assistant(turn.content.clone()),
    }
}

fn map_init_error(error: ResponsesApiError) -> ProviderInitError {
    ProviderInitError::Setup {
        provider: OPENAI_PROVIDER_ID,
        reason: error.to_string(),
    }
}
