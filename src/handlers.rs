//! Per-mode turn handlers: one provider call per user input.

use std::sync::Arc;

use chat_provider::{CancelSignal, ChatError, ChatInput, ChatProvider, ChatRequest, ChatTool, Turn};
use tracing::{debug, warn};

use crate::config::{ConfigPaths, KitConfig};
use crate::error::KitError;
use crate::instructions::{self, PlatformInfo};
use crate::interaction::Interaction;
use crate::modes::Mode;

/// Result of one handled turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Both the user and the assistant turn were appended.
    Completed,
    /// The call failed; the turns are as they were and the failure was reported.
    Failed,
    /// The call was interrupted; the turns are as they were.
    Cancelled,
}

/// Handles one user input against the shared turn list.
///
/// Implementations append the user turn, make exactly one external call and
/// append the assistant turn on success. On any other outcome `turns` must be
/// left exactly as it was.
pub trait TurnHandler {
    fn handle(&mut self, turns: &mut Vec<Turn>, input: &str, ui: &mut dyn Interaction)
        -> TurnOutcome;
}

/// Model settings for one mode, resolved from config and instruction files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeProfile {
    pub mode: Mode,
    pub model: String,
    pub instructions: String,
    pub reasoning_effort: Option<String>,
    pub tools: Vec<ChatTool>,
}

impl ModeProfile {
    #[must_use]
    pub fn new(mode: Mode, model: impl Into<String>, instructions: impl Into<String>) -> Self {
        Self {
            mode,
            model: model.into(),
            instructions: instructions.into(),
            reasoning_effort: None,
            tools: Vec::new(),
        }
    }

    pub fn resolve(
        mode: Mode,
        config: &KitConfig,
        paths: &ConfigPaths,
        platform: &PlatformInfo,
    ) -> Result<Self, KitError> {
        let mut instructions = instructions::load(paths, mode, &config.language)?;
        if mode == Mode::Codex {
            instructions = instructions::render_codex(&instructions, platform);
        }

        let tools = match mode {
            Mode::WebSearch => vec![ChatTool::WebSearch {
                allowed_domains: Vec::new(),
            }],
            Mode::ItSecurityNews => vec![ChatTool::WebSearch {
                allowed_domains: config.security_domains.clone(),
            }],
            _ => Vec::new(),
        };

        Ok(Self {
            mode,
            model: config.model_for(mode).to_string(),
            instructions,
            reasoning_effort: config.reasoning_effort_for(mode).map(str::to_string),
            tools,
        })
    }

    #[must_use]
    pub fn request(&self, input: ChatInput) -> ChatRequest {
        let mut request = ChatRequest::new(self.model.clone(), self.instructions.clone(), input);
        if let Some(effort) = &self.reasoning_effort {
            request = request.with_reasoning_effort(effort.clone());
        }
        for tool in &self.tools {
            request = request.with_tool(tool.clone());
        }
        request
    }
}

/// Multi-turn handler that replays the whole conversation on every call.
pub struct ConversationHandler {
    provider: Arc<dyn ChatProvider>,
    profile: ModeProfile,
    cancel: CancelSignal,
}

impl ConversationHandler {
    #[must_use]
    pub fn new(provider: Arc<dyn ChatProvider>, profile: ModeProfile, cancel: CancelSignal) -> Self {
        Self {
            provider,
            profile,
            cancel,
        }
    }

    #[must_use]
    pub fn profile(&self) -> &ModeProfile {
        &self.profile
    }
}

impl TurnHandler for ConversationHandler {
    fn handle(
        &mut self,
        turns: &mut Vec<Turn>,
        input: &str,
        ui: &mut dyn Interaction,
    ) -> TurnOutcome {
        turns.push(Turn::user(input));
        ui.info(&format!("{} is thinking...", self.profile.model));

        let request = self.profile.request(ChatInput::Conversation(turns.clone()));
        match self.provider.complete(request, Arc::clone(&self.cancel)) {
            Ok(reply) => {
                ui.reply(&reply);
                turns.push(Turn::assistant(reply));
                TurnOutcome::Completed
            }
            Err(ChatError::Cancelled) => {
                turns.pop();
                debug!(mode = %self.profile.mode, "turn cancelled");
                ui.warn("Request cancelled.");
                TurnOutcome::Cancelled
            }
            Err(ChatError::Failed(message)) => {
                turns.pop();
                warn!(mode = %self.profile.mode, %message, "turn failed");
                ui.error(&message);
                TurnOutcome::Failed
            }
        }
    }
}

/// Sends `text` once, without history, and shows the reply.
pub fn run_one_shot(
    provider: &dyn ChatProvider,
    profile: &ModeProfile,
    text: &str,
    cancel: CancelSignal,
    ui: &mut dyn Interaction,
) -> Result<String, KitError> {
    ui.info(&format!("{} is thinking...", profile.model));
    let request = profile.request(ChatInput::Text(text.to_string()));

    match provider.complete(request, cancel) {
        Ok(reply) => {
            ui.reply(&reply);
            Ok(reply)
        }
        Err(ChatError::Cancelled) => Err(KitError::UserCancelled),
        Err(ChatError::Failed(message)) => Err(KitError::Provider(message)),
    }
}
