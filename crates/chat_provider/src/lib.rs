//! Minimal provider-agnostic contract for one chat completion.
//!
//! This crate defines the conversation vocabulary shared by the session store,
//! the turn handlers and the concrete providers. It excludes transport
//! details, wire payloads and any persistence concerns.

use std::sync::{atomic::AtomicBool, Arc};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Shared cancellation flag for an in-flight completion.
pub type CancelSignal = Arc<AtomicBool>;

/// Why a provider could not be built. Raised before any request is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderInitError {
    #[error("{variable} environment variable not set (export {variable}='your-key')")]
    MissingCredential { variable: &'static str },
    #[error("failed to initialize {provider} provider: {reason}")]
    Setup {
        provider: &'static str,
        reason: String,
    },
}

/// Author of one conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// One role-tagged message of a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// What the model is asked to respond to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatInput {
    /// Full multi-turn history, replayed on every request.
    Conversation(Vec<Turn>),
    /// A single free-form prompt with no history.
    Text(String),
}

/// Remote tool the model may use while answering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatTool {
    /// Web search, optionally limited to a set of domains.
    WebSearch { allowed_domains: Vec<String> },
}

/// Input required to request one completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    pub model: String,
    pub instructions: String,
    pub input: ChatInput,
    pub reasoning_effort: Option<String>,
    pub tools: Vec<ChatTool>,
}

impl ChatRequest {
    #[must_use]
    pub fn new(model: impl Into<String>, instructions: impl Into<String>, input: ChatInput) -> Self {
        Self {
            model: model.into(),
            instructions: instructions.into(),
            input,
            reasoning_effort: None,
            tools: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_reasoning_effort(mut self, effort: impl Into<String>) -> Self {
        self.reasoning_effort = Some(effort.into());
        self
    }

    #[must_use]
    pub fn with_tool(mut self, tool: ChatTool) -> Self {
        self.tools.push(tool);
        self
    }
}

/// Failure of a single completion request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatError {
    /// No reply; the message is ready to show to the user.
    #[error("{0}")]
    Failed(String),
    /// The cancel signal fired before a reply arrived.
    #[error("request was cancelled")]
    Cancelled,
}

/// Immutable metadata describing a chat provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderProfile {
    pub provider_id: String,
}

/// Provider interface for executing one completion request.
pub trait ChatProvider: Send + Sync + 'static {
    /// Returns provider identity metadata.
    fn profile(&self) -> ProviderProfile;

    /// Sends one request and blocks until the reply text is available.
    ///
    /// Implementations must observe `cancel` while waiting and return
    /// [`ChatError::Cancelled`] once it is set.
    fn complete(&self, req: ChatRequest, cancel: CancelSignal) -> Result<String, ChatError>;
}
