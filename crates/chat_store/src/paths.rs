use std::fmt;
use std::path::{Path, PathBuf};

use time::macros::format_description;
use time::OffsetDateTime;

use crate::error::ChatStoreError;

/// Directory holding every chat record, for all modes.
pub const CHAT_DIR_NAME: &str = "KITchats";

const RECORD_EXTENSION: &str = "json";

/// Reference to one persisted chat record (its file path).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordRef(PathBuf);

impl RecordRef {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.0
    }

    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.0.file_name().and_then(|name| name.to_str())
    }
}

impl AsRef<Path> for RecordRef {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// Returns the chat directory, creating it (and parents) when absent.
///
/// A non-blank `custom_base` wins and gets [`CHAT_DIR_NAME`] appended;
/// otherwise the directory lives under `config_dir`.
pub fn resolve_storage_root(
    custom_base: Option<&str>,
    config_dir: &Path,
) -> Result<PathBuf, ChatStoreError> {
    let root = match custom_base.map(str::trim).filter(|base| !base.is_empty()) {
        Some(base) => PathBuf::from(base).join(CHAT_DIR_NAME),
        None => config_dir.join(CHAT_DIR_NAME),
    };

    std::fs::create_dir_all(&root)
        .map_err(|source| ChatStoreError::io("creating chat directory", &root, source))?;
    Ok(root)
}

/// Formats an instant as a record identity: `YYYY-MM-DD_HH-MM-SS`.
///
/// Identities sort lexicographically in chronological order.
pub fn format_identity(instant: OffsetDateTime) -> Result<String, ChatStoreError> {
    instant
        .format(format_description!(
            "[year]-[month]-[day]_[hour]-[minute]-[second]"
        ))
        .map_err(ChatStoreError::ClockFormat)
}

#[must_use]
pub fn record_file_name(mode: &str, identity: &str) -> String {
    format!("{mode}_{identity}.{RECORD_EXTENSION}")
}

/// Whether `file_name` names a record, optionally of the given mode.
pub(crate) fn matches_record_name(file_name: &str, mode: Option<&str>) -> bool {
    let Some(stem) = file_name.strip_suffix(".json") else {
        return false;
    };
    match mode {
        Some(mode) => stem
            .strip_prefix(mode)
            .is_some_and(|rest| rest.starts_with('_')),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    #[test]
    fn identity_uses_second_precision_and_sortable_layout() {
        let identity = format_identity(datetime!(2025-11-16 04:03:09 UTC)).expect("format");
        assert_eq!(identity, "2025-11-16_04-03-09");
        assert_eq!(
            record_file_name("normalchat", &identity),
            "normalchat_2025-11-16_04-03-09.json"
        );
    }

    #[test]
    fn record_names_match_by_mode_prefix() {
        assert!(matches_record_name("codex_2025-11-16_04-03-09.json", Some("codex")));
        assert!(!matches_record_name("codex_2025-11-16_04-03-09.json", Some("normalchat")));
        assert!(!matches_record_name("codexplus_2025-11-16_04-03-09.json", Some("codex")));
        assert!(!matches_record_name("codex_2025-11-16_04-03-09.txt", Some("codex")));
        assert!(matches_record_name("anything.json", None));
    }

    #[test]
    fn storage_root_prefers_non_blank_custom_base() {
        let temp = tempfile::tempdir().expect("tempdir should be created");
        let config_dir = temp.path().join("config");
        let custom = temp.path().join("custom");

        let root = resolve_storage_root(Some(custom.to_str().expect("utf-8 path")), &config_dir)
            .expect("custom root resolves");
        assert_eq!(root, custom.join(CHAT_DIR_NAME));
        assert!(root.is_dir());

        let fallback = resolve_storage_root(Some("   "), &config_dir).expect("default resolves");
        assert_eq!(fallback, config_dir.join(CHAT_DIR_NAME));
        assert!(fallback.is_dir());
    }

    #[test]
    fn storage_root_resolution_is_idempotent() {
        let temp = tempfile::tempdir().expect("tempdir should be created");
        let first = resolve_storage_root(None, temp.path()).expect("first call");
        let second = resolve_storage_root(None, temp.path()).expect("second call");
        assert_eq!(first, second);
    }
}
