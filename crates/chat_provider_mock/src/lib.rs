//! Deterministic mock implementation of the shared `chat_provider` contract.
//!
//! This crate contains no transport/protocol logic and is intended for local
//! offline runs (`KIT_PROVIDER=mock`) and controller-level tests.

use std::collections::VecDeque;
use std::sync::atomic::Ordering;
use std::sync::{Mutex, MutexGuard};

use chat_provider::{
    CancelSignal, ChatError, ChatInput, ChatProvider, ChatRequest, ProviderProfile, Role,
};

/// Stable provider identifier used for explicit startup selection.
pub const MOCK_PROVIDER_ID: &str = "mock";

/// One scripted result for a future `complete` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockOutcome {
    /// Reply with the given text.
    Reply(String),
    /// Fail with the given message.
    Fail(String),
    /// Raise the cancel signal, as an interrupt would, and report cancellation.
    Interrupt,
}

/// Scripted mock provider used by `kit` tests and offline runs.
///
/// Scripted outcomes are consumed in order; once exhausted every request is
/// answered with an echo of the latest user text.
#[derive(Debug, Default)]
pub struct MockProvider {
    script: Mutex<VecDeque<MockOutcome>>,
    observed: Mutex<Vec<ChatRequest>>,
}

impl MockProvider {
    #[must_use]
    pub fn new(script: Vec<MockOutcome>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            observed: Mutex::new(Vec::new()),
        }
    }

    /// Creates a provider that answers each request with the next reply in order.
    #[must_use]
    pub fn with_replies<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            replies
                .into_iter()
                .map(|reply| MockOutcome::Reply(reply.into()))
                .collect(),
        )
    }

    /// Returns every request received so far, in call order.
    #[must_use]
    pub fn observed_requests(&self) -> Vec<ChatRequest> {
        lock_unpoisoned(&self.observed).clone()
    }

    fn next_outcome(&self) -> Option<MockOutcome> {
        lock_unpoisoned(&self.script).pop_front()
    }
}

impl ChatProvider for MockProvider {
    fn profile(&self) -> ProviderProfile {
        ProviderProfile {
            provider_id: MOCK_PROVIDER_ID.to_string(),
        }
    }

    fn complete(&self, req: ChatRequest, cancel: CancelSignal) -> Result<String, ChatError> {
        lock_unpoisoned(&self.observed).push(req.clone());

        if cancel.load(Ordering::SeqCst) {
            return Err(ChatError::Cancelled);
        }

        match self.next_outcome() {
            Some(MockOutcome::Reply(text)) => Ok(text),
            Some(MockOutcome::Fail(message)) => Err(ChatError::Failed(message)),
            Some(MockOutcome::Interrupt) => {
                cancel.store(true, Ordering::SeqCst);
                Err(ChatError::Cancelled)
            }
            None => Ok(echo_reply(&req)),
        }
    }
}

fn echo_reply(req: &ChatRequest) -> String {
    let prompt = match &req.input {
        ChatInput::Text(text) => text.as_str(),
        ChatInput::Conversation(turns) => turns
            .iter()
            .rev()
            .find(|turn| turn.role == Role::User)
            .map(|turn| turn.content.as_str())
            .unwrap_or(""),
    };
    format!("[{}] {prompt}", req.model)
}

fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
