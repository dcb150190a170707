//! Drives one interactive session and saves it exactly once on every exit path.

use std::sync::atomic::Ordering;

use chat_provider::{CancelSignal, Turn};
use chat_store::{ChatStore, RecordRef};
use tracing::{debug, error, info};

use crate::error::KitError;
use crate::handlers::{TurnHandler, TurnOutcome};
use crate::interaction::Interaction;
use crate::selector;

pub const EXIT_KEYWORD: &str = "exit";
pub const INPUT_PROMPT: &str = "💬 ";

/// Why a session loop ended without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    ExitKeyword,
    EndOfInput,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOutcome {
    pub exit: ExitReason,
    /// Where the session was written; `None` when it had no turns.
    pub saved: Option<RecordRef>,
}

/// In-memory state of one session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatSession {
    mode: String,
    turns: Vec<Turn>,
    reuse: Option<RecordRef>,
}

impl ChatSession {
    #[must_use]
    pub fn fresh(mode: impl Into<String>) -> Self {
        Self {
            mode: mode.into(),
            turns: Vec::new(),
            reuse: None,
        }
    }

    /// A session continuing `record`, whose identity later flushes keep.
    #[must_use]
    pub fn resumed(mode: impl Into<String>, turns: Vec<Turn>, record: RecordRef) -> Self {
        Self {
            mode: mode.into(),
            turns,
            reuse: Some(record),
        }
    }

    #[must_use]
    pub fn mode(&self) -> &str {
        &self.mode
    }

    #[must_use]
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    #[must_use]
    pub fn reuse(&self) -> Option<&RecordRef> {
        self.reuse.as_ref()
    }

    /// Writes the session through `store`, consuming it.
    fn flush(self, store: &ChatStore) -> Result<Option<RecordRef>, KitError> {
        let Self { mode, turns, reuse } = self;
        match store.write(&turns, &mode, reuse.as_ref()) {
            Ok(saved) => Ok(saved),
            Err(source) => Err(KitError::Flush {
                source,
                unsaved: turns,
                interrupted: false,
            }),
        }
    }
}

/// Owns a session until it is flushed.
///
/// [`SessionGuard::finish`] flushes explicitly; dropping an unfinished guard
/// (for example while unwinding) flushes as a backstop. Either way the session
/// is written at most once.
pub struct SessionGuard<'a> {
    store: &'a ChatStore,
    session: ChatSession,
    flushed: bool,
}

impl<'a> SessionGuard<'a> {
    #[must_use]
    pub fn new(store: &'a ChatStore, session: ChatSession) -> Self {
        Self {
            store,
            session,
            flushed: false,
        }
    }

    pub fn turns_mut(&mut self) -> &mut Vec<Turn> {
        &mut self.session.turns
    }

    pub fn finish(mut self) -> Result<Option<RecordRef>, KitError> {
        self.flush_once()
    }

    fn flush_once(&mut self) -> Result<Option<RecordRef>, KitError> {
        if self.flushed {
            return Ok(None);
        }
        self.flushed = true;
        std::mem::take(&mut self.session).flush(self.store)
    }
}

impl Drop for SessionGuard<'_> {
    fn drop(&mut self) {
        if self.flushed {
            return;
        }
        match self.flush_once() {
            Ok(Some(record)) => info!(record = %record, "chat saved while unwinding"),
            Ok(None) => {}
            Err(error) => error!(%error, "failed to save chat while unwinding"),
        }
    }
}

/// Runs sessions against one store.
pub struct Controller {
    store: ChatStore,
    interrupt: CancelSignal,
}

impl Controller {
    /// `interrupt` is the flag raised by SIGINT; it is checked after every turn.
    #[must_use]
    pub fn new(store: ChatStore, interrupt: CancelSignal) -> Self {
        Self { store, interrupt }
    }

    #[must_use]
    pub fn store(&self) -> &ChatStore {
        &self.store
    }

    /// Runs one session of `mode` until `exit`, end of input or an interrupt.
    ///
    /// Non-empty sessions are saved exactly once before this returns, on the
    /// interrupt path too. A failed save wins over any other error so the
    /// unsaved turns reach the caller; it remembers an interrupt so the exit
    /// status stays 130.
    pub fn run(
        &self,
        mode: &str,
        resume: bool,
        handler: &mut dyn TurnHandler,
        ui: &mut dyn Interaction,
    ) -> Result<SessionOutcome, KitError> {
        let session = if resume {
            self.open(mode, ui)?
        } else {
            ChatSession::fresh(mode)
        };

        let mut guard = SessionGuard::new(&self.store, session);
        let ended = self.drive(&mut guard, handler, ui);
        let saved = match guard.finish() {
            Ok(saved) => saved,
            Err(KitError::Flush {
                source, unsaved, ..
            }) => {
                return Err(KitError::Flush {
                    source,
                    unsaved,
                    interrupted: matches!(ended, Err(KitError::UserCancelled)),
                })
            }
            Err(error) => return Err(error),
        };

        if let Some(record) = &saved {
            info!(record = %record, "session flushed");
            ui.success("Chat saved");
        }

        ended.map(|exit| SessionOutcome { exit, saved })
    }

    fn open(&self, mode: &str, ui: &mut dyn Interaction) -> Result<ChatSession, KitError> {
        let Some(record) = selector::choose(&self.store, mode, ui)? else {
            return Ok(ChatSession::fresh(mode));
        };

        match self.store.read(&record) {
            Ok(turns) => {
                ui.success(&format!("Chat restored ({} messages)", turns.len()));
                Ok(ChatSession::resumed(mode, turns, record))
            }
            Err(source) => {
                ui.error(&format!("Error loading chat: {source}"));
                Err(KitError::Resume { record, source })
            }
        }
    }

    fn drive(
        &self,
        guard: &mut SessionGuard<'_>,
        handler: &mut dyn TurnHandler,
        ui: &mut dyn Interaction,
    ) -> Result<ExitReason, KitError> {
        loop {
            if self.interrupt.load(Ordering::SeqCst) {
                return Err(KitError::UserCancelled);
            }

            let Some(line) = ui.read_line(INPUT_PROMPT)? else {
                return Ok(ExitReason::EndOfInput);
            };
            let input = line.trim();
            if input.is_empty() {
                continue;
            }
            if input.eq_ignore_ascii_case(EXIT_KEYWORD) {
                return Ok(ExitReason::ExitKeyword);
            }

            match handler.handle(guard.turns_mut(), input, ui) {
                TurnOutcome::Completed | TurnOutcome::Failed => {}
                TurnOutcome::Cancelled => {
                    debug!("turn cancelled, ending session");
                    return Err(KitError::UserCancelled);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn json_count(store: &ChatStore) -> usize {
        fs::read_dir(store.root())
            .expect("store root is listable")
            .count()
    }

    #[test]
    fn finished_guard_does_not_flush_again_on_drop() {
        let temp = tempfile::tempdir().expect("tempdir should be created");
        let store = ChatStore::open(temp.path()).expect("store opens");

        let mut guard = SessionGuard::new(&store, ChatSession::fresh("normalchat"));
        guard.turns_mut().push(Turn::user("hello"));
        let saved = guard.finish().expect("flush").expect("record written");

        assert!(saved.path().is_file());
        assert_eq!(json_count(&store), 1);
    }

    #[test]
    fn dropped_guard_flushes_once() {
        let temp = tempfile::tempdir().expect("tempdir should be created");
        let store = ChatStore::open(temp.path()).expect("store opens");

        {
            let mut guard = SessionGuard::new(&store, ChatSession::fresh("codex"));
            guard.turns_mut().push(Turn::user("hello"));
        }

        let listed = store.list(Some("codex")).expect("list");
        assert_eq!(listed.len(), 1);
        assert_eq!(store.read(&listed[0]).expect("read"), vec![Turn::user("hello")]);
    }

    #[test]
    fn empty_session_flush_writes_nothing() {
        let temp = tempfile::tempdir().expect("tempdir should be created");
        let store = ChatStore::open(temp.path()).expect("store opens");

        let saved = SessionGuard::new(&store, ChatSession::fresh("normalchat"))
            .finish()
            .expect("flush");
        assert_eq!(saved, None);
        assert_eq!(json_count(&store), 0);
    }

    #[test]
    fn flush_failure_hands_back_the_turns() {
        let temp = tempfile::tempdir().expect("tempdir should be created");
        let store = ChatStore::open(temp.path().join("chats")).expect("store opens");
        fs::remove_dir(store.root()).expect("root removed");

        let mut guard = SessionGuard::new(&store, ChatSession::fresh("normalchat"));
        guard.turns_mut().push(Turn::user("keep me"));

        match guard.finish() {
            Err(KitError::Flush { unsaved, .. }) => {
                assert_eq!(unsaved, vec![Turn::user("keep me")]);
            }
            other => panic!("expected flush failure, got {other:?}"),
        }
    }
}
