use chat_provider::{Role, Turn};

use crate::paths::RecordRef;
use crate::schema::SessionRecord;

/// Maximum number of characters kept in a preview.
pub const PREVIEW_LIMIT: usize = 60;
/// Appended to a preview that was cut short.
pub const TRUNCATION_MARKER: &str = "...";

/// Menu-ready summary of one saved chat. Recomputed on every listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub record: RecordRef,
    pub identity: String,
    pub mode: String,
    pub preview: String,
    pub turn_count: usize,
}

impl CatalogEntry {
    #[must_use]
    pub fn from_record(record: RecordRef, session: &SessionRecord) -> Self {
        Self {
            record,
            identity: session.timestamp.clone(),
            mode: session.mode.clone(),
            preview: preview(&session.history),
            turn_count: session.history.len(),
        }
    }

    #[must_use]
    pub fn display_timestamp(&self) -> String {
        display_timestamp(&self.identity)
    }
}

/// First user turn, cut to [`PREVIEW_LIMIT`] characters; empty when there is none.
#[must_use]
pub fn preview(turns: &[Turn]) -> String {
    let Some(first) = turns.iter().find(|turn| turn.role == Role::User) else {
        return String::new();
    };

    let mut chars = first.content.chars();
    let head: String = chars.by_ref().take(PREVIEW_LIMIT).collect();
    if chars.next().is_some() {
        format!("{head}{TRUNCATION_MARKER}")
    } else {
        head
    }
}

/// `2025-11-16_14-30-15` is shown as `2025:11:16 14:30:15`.
#[must_use]
pub fn display_timestamp(identity: &str) -> String {
    identity.replace('_', " ").replace('-', ":")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_truncates_long_first_user_turn() {
        let long = "x".repeat(PREVIEW_LIMIT + 1);
        let turns = vec![Turn::assistant("greeting"), Turn::user(long)];

        let shown = preview(&turns);
        assert_eq!(shown, format!("{}{TRUNCATION_MARKER}", "x".repeat(PREVIEW_LIMIT)));
    }

    #[test]
    fn preview_keeps_content_at_exact_limit() {
        let exact = "y".repeat(PREVIEW_LIMIT);
        assert_eq!(preview(&[Turn::user(exact.clone())]), exact);
    }

    #[test]
    fn preview_counts_characters_not_bytes() {
        let umlauts = "ä".repeat(PREVIEW_LIMIT);
        assert_eq!(preview(&[Turn::user(umlauts.clone())]), umlauts);

        let emoji = format!("{}🙂", "ö".repeat(PREVIEW_LIMIT));
        assert_eq!(
            preview(&[Turn::user(emoji)]),
            format!("{}{TRUNCATION_MARKER}", "ö".repeat(PREVIEW_LIMIT))
        );
    }

    #[test]
    fn preview_is_empty_without_user_turn() {
        assert_eq!(preview(&[Turn::assistant("only me")]), "");
        assert_eq!(preview(&[]), "");
    }

    #[test]
    fn display_timestamp_matches_menu_layout() {
        assert_eq!(display_timestamp("2025-11-16_14-30-15"), "2025:11:16 14:30:15");
    }
}
