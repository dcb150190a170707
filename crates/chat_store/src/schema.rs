use chat_provider::Turn;
use serde::{Deserialize, Serialize};

/// On-disk shape of one persisted conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionRecord {
    pub mode: String,
    /// Identity of the record; also embedded in the file name.
    pub timestamp: String,
    pub history: Vec<Turn>,
}

/// Borrowed view used for writing so callers keep ownership of their turns.
#[derive(Debug, Serialize)]
pub(crate) struct SessionRecordRef<'a> {
    pub mode: &'a str,
    pub timestamp: &'a str,
    pub history: &'a [Turn],
}
