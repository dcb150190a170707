//! Numbered menu for picking a saved chat to resume.

use chat_store::{CatalogEntry, ChatStore, RecordRef};
use tracing::debug;

use crate::error::KitError;
use crate::interaction::Interaction;

pub const NEW_CHAT_CHOICE: &str = "0";

/// Lets the user pick one saved chat of `mode`.
///
/// Returns `Ok(None)` for "start a new chat", including when nothing is saved
/// yet. Interrupts propagate as [`KitError::UserCancelled`].
pub fn choose(
    store: &ChatStore,
    mode: &str,
    ui: &mut dyn Interaction,
) -> Result<Option<RecordRef>, KitError> {
    let mut entries = store.catalog(Some(mode))?;
    if entries.is_empty() {
        ui.warn("No saved chats found. Starting a new chat.");
        return Ok(None);
    }

    ui.info(&format!("Saved {mode} chats:"));
    for (index, entry) in entries.iter().enumerate() {
        ui.info(&menu_line(index + 1, entry));
    }
    ui.info(&format!("{NEW_CHAT_CHOICE}. Start a new chat"));

    loop {
        let answer = ui.ask_with_default("Select a chat", NEW_CHAT_CHOICE)?;
        let Ok(choice) = answer.trim().parse::<usize>() else {
            ui.error("Please enter a number.");
            continue;
        };

        match choice {
            0 => return Ok(None),
            index if index <= entries.len() => {
                let entry = entries.swap_remove(index - 1);
                debug!(record = %entry.record, "resuming chat");
                return Ok(Some(entry.record));
            }
            _ => ui.error("Invalid selection, please try again."),
        }
    }
}

/// `index. <YYYY:MM:DD HH:MM:SS> - <preview> (<n> messages)`
#[must_use]
pub fn menu_line(index: usize, entry: &CatalogEntry) -> String {
    format!(
        "{index}. {} - {} ({} messages)",
        entry.display_timestamp(),
        entry.preview,
        entry.turn_count
    )
}

#[cfg(test)]
mod tests {
    use chat_store::RecordRef;

    use super::*;

    #[test]
    fn menu_line_uses_display_timestamp_preview_and_count() {
        let entry = CatalogEntry {
            record: RecordRef::new("/tmp/normalchat_2025-11-16_14-30-15.json"),
            identity: "2025-11-16_14-30-15".to_string(),
            mode: "normalchat".to_string(),
            preview: "Wie geht's?".to_string(),
            turn_count: 4,
        };

        assert_eq!(
            menu_line(2, &entry),
            "2. 2025:11:16 14:30:15 - Wie geht's? (4 messages)"
        );
    }
}
