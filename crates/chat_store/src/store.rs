use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chat_provider::Turn;
use time::{Duration, OffsetDateTime};
use tracing::{debug, info, warn};

use crate::catalog::CatalogEntry;
use crate::error::ChatStoreError;
use crate::paths::{format_identity, matches_record_name, record_file_name, RecordRef};
use crate::schema::{SessionRecord, SessionRecordRef};

/// Source of "now" used when minting identities.
pub type Clock = fn() -> OffsetDateTime;

/// Fresh identities probe at most this many consecutive seconds.
const MAX_IDENTITY_PROBES: u32 = 3600;

/// Local wall-clock time, falling back to UTC when the offset is unknown.
#[must_use]
pub fn local_now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

/// Filesystem-backed repository of chat records.
///
/// One directory holds the records of every mode; the mode is part of each
/// file name and of the record itself.
#[derive(Debug, Clone)]
pub struct ChatStore {
    root: PathBuf,
    clock: Clock,
}

impl ChatStore {
    /// Opens (and creates when missing) a store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, ChatStoreError> {
        let root = root.into();
        fs::create_dir_all(&root)
            .map_err(|source| ChatStoreError::io("creating chat directory", &root, source))?;
        Ok(Self {
            root,
            clock: local_now,
        })
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Persists `turns` as one record and returns its reference.
    ///
    /// Empty `turns` are never written and yield `Ok(None)`. When `existing`
    /// names a readable record its identity and path are reused and the file
    /// is rewritten in full; otherwise a fresh identity is minted.
    pub fn write(
        &self,
        turns: &[Turn],
        mode: &str,
        existing: Option<&RecordRef>,
    ) -> Result<Option<RecordRef>, ChatStoreError> {
        if turns.is_empty() {
            return Ok(None);
        }

        let recovered = existing.and_then(|record| match self.read_record(record) {
            Ok(session) => Some((record.clone(), session.timestamp)),
            Err(error) => {
                warn!(record = %record, %error, "cannot recover chat identity, minting a new one");
                None
            }
        });

        let (record, identity, reserved) = match recovered {
            Some((record, identity)) => (record, identity, false),
            None => {
                let (record, identity) = self.reserve_fresh(mode)?;
                (record, identity, true)
            }
        };

        let written = serde_json::to_string_pretty(&SessionRecordRef {
            mode,
            timestamp: &identity,
            history: turns,
        })
        .map_err(|source| ChatStoreError::Serialize {
            path: record.path().to_path_buf(),
            source,
        })
        .and_then(|body| replace_file(record.path(), &body));

        if let Err(error) = written {
            if reserved {
                if let Err(cleanup) = fs::remove_file(record.path()) {
                    warn!(record = %record, %cleanup, "could not release reserved chat file");
                }
            }
            return Err(error);
        }

        info!(record = %record, turns = turns.len(), "chat saved");
        Ok(Some(record))
    }

    /// Loads the full turn sequence of a record.
    pub fn read(&self, record: &RecordRef) -> Result<Vec<Turn>, ChatStoreError> {
        self.read_record(record).map(|session| session.history)
    }

    /// Loads and validates a whole record.
    pub fn read_record(&self, record: &RecordRef) -> Result<SessionRecord, ChatStoreError> {
        let path = record.path();
        let bytes = fs::read(path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => ChatStoreError::NotFound {
                path: path.to_path_buf(),
            },
            _ => ChatStoreError::io("reading chat record", path, source),
        })?;

        serde_json::from_slice::<SessionRecord>(&bytes)
            .map_err(|source| ChatStoreError::malformed(path, source))
    }

    /// References of all well-formed records, most recently modified first.
    pub fn list(&self, mode: Option<&str>) -> Result<Vec<RecordRef>, ChatStoreError> {
        Ok(self
            .load_listed(mode)?
            .into_iter()
            .map(|(record, _)| record)
            .collect())
    }

    /// Menu entries for all well-formed records, most recently modified first.
    pub fn catalog(&self, mode: Option<&str>) -> Result<Vec<CatalogEntry>, ChatStoreError> {
        Ok(self
            .load_listed(mode)?
            .into_iter()
            .map(|(record, session)| CatalogEntry::from_record(record, &session))
            .collect())
    }

    fn load_listed(
        &self,
        mode: Option<&str>,
    ) -> Result<Vec<(RecordRef, SessionRecord)>, ChatStoreError> {
        let candidates = self.candidate_files(mode)?;
        let outcomes = candidates.into_iter().map(|record| {
            let outcome = self.read_record(&record);
            (record, outcome)
        });

        Ok(outcomes
            .filter_map(|(record, outcome)| match outcome {
                Ok(session) => Some((record, session)),
                Err(error) => {
                    debug!(record = %record, %error, "skipping unreadable chat record");
                    None
                }
            })
            .collect())
    }

    fn candidate_files(&self, mode: Option<&str>) -> Result<Vec<RecordRef>, ChatStoreError> {
        let entries = fs::read_dir(&self.root)
            .map_err(|source| ChatStoreError::io("listing chat directory", &self.root, source))?;

        let mut candidates: Vec<(SystemTime, PathBuf)> = entries
            .filter_map(Result::ok)
            .filter(|entry| {
                entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| matches_record_name(name, mode))
            })
            .filter_map(|entry| {
                let metadata = entry.metadata().ok()?;
                if !metadata.is_file() {
                    return None;
                }
                let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
                Some((modified, entry.path()))
            })
            .collect();

        candidates.sort_by(|left, right| right.0.cmp(&left.0).then_with(|| right.1.cmp(&left.1)));
        Ok(candidates
            .into_iter()
            .map(|(_, path)| RecordRef::new(path))
            .collect())
    }

    /// Claims an unused `<mode>_<identity>.json`, advancing one second per collision.
    ///
    /// The claimed file stays empty until [`replace_file`] moves the record over it.
    fn reserve_fresh(&self, mode: &str) -> Result<(RecordRef, String), ChatStoreError> {
        let mut instant = (self.clock)();

        for _ in 0..MAX_IDENTITY_PROBES {
            let identity = format_identity(instant)?;
            let path = self.root.join(record_file_name(mode, &identity));
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(_) => return Ok((RecordRef::new(path), identity)),
                Err(source) if source.kind() == ErrorKind::AlreadyExists => {
                    instant += Duration::SECOND;
                }
                Err(source) => return Err(ChatStoreError::write_failure(path, source)),
            }
        }

        Err(ChatStoreError::IdentityExhausted {
            root: self.root.clone(),
            attempts: MAX_IDENTITY_PROBES,
        })
    }
}

/// Writes `body` next to `target` and renames it into place, so a failed
/// write never leaves `target` truncated.
fn replace_file(target: &Path, body: &str) -> Result<(), ChatStoreError> {
    let staging = target.with_extension("json.tmp");

    let staged = File::create(&staging).and_then(|mut file| {
        file.write_all(body.as_bytes())?;
        file.write_all(b"\n")?;
        file.sync_all()
    });
    if let Err(source) = staged {
        let _ = fs::remove_file(&staging);
        return Err(ChatStoreError::write_failure(target, source));
    }

    fs::rename(&staging, target).map_err(|source| {
        let _ = fs::remove_file(&staging);
        ChatStoreError::write_failure(target, source)
    })
}
