use std::path::PathBuf;

use chat_provider::Turn;
use chat_store::{ChatStoreError, RecordRef};
use rustyline::error::ReadlineError;
use thiserror::Error;

/// Failures surfaced by the `kit` application layer.
#[derive(Debug, Error)]
pub enum KitError {
    #[error(transparent)]
    Store(#[from] ChatStoreError),

    #[error("could not load chat {record}: {source}")]
    Resume {
        record: RecordRef,
        #[source]
        source: ChatStoreError,
    },

    /// The session could not be written; its turns are handed back unsaved.
    /// `interrupted` records that the session was ending on Ctrl-C.
    #[error("chat was not saved ({} messages kept in memory): {source}", .unsaved.len())]
    Flush {
        #[source]
        source: ChatStoreError,
        unsaved: Vec<Turn>,
        interrupted: bool,
    },

    #[error("cancelled by user")]
    UserCancelled,

    #[error("terminal prompt failed: {0}")]
    Prompt(#[from] ReadlineError),

    #[error("configuration error at {path}: {message}")]
    Config { path: PathBuf, message: String },

    #[error("{0}")]
    Provider(String),

    #[error("unknown mode '{0}' (available: normalchat, websearch, codex, email, translate, itsecurity)")]
    UnknownMode(String),

    #[error("no text provided for {mode}")]
    MissingText { mode: &'static str },

    #[error("I/O error while {operation}: {source}")]
    Io {
        operation: &'static str,
        #[source]
        source: std::io::Error,
    },
}

impl KitError {
    #[must_use]
    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn io(operation: &'static str, source: std::io::Error) -> Self {
        Self::Io { operation, source }
    }

    /// Process exit status for this failure.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::UserCancelled
            | Self::Flush {
                interrupted: true, ..
            } => 130,
            _ => 1,
        }
    }
}
