//! History store persistence: one JSON document per event type.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::period::EventType;
use crate::store::HistoryStore;

/// Errors raised while loading or saving a history store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store file exists but could not be read.
    #[error("failed to read store {}", path.display())]
    Read {
        /// Path of the store file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The store file could not be written or moved into place.
    #[error("failed to write store {}", path.display())]
    Write {
        /// Path being written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The store file is not a valid store document.
    #[error("store {} is not a valid history document", path.display())]
    Decode {
        /// Path of the store file.
        path: PathBuf,
        /// Underlying decode error.
        #[source]
        source: serde_json::Error,
    },

    /// The in-memory store could not be encoded.
    #[error("failed to encode store")]
    Encode(#[source] serde_json::Error),
}

/// Result alias for store persistence.
pub type StoreResult<T> = Result<T, StoreError>;

/// Portable persistence surface; the JSON file implementation lives below.
pub trait HistoryRepo {
    /// Loads the store for one event type; an absent file is an empty store.
    fn load(&self, event: EventType) -> StoreResult<HistoryStore>;

    /// Persists a fully reconciled store. Implementations must never leave
    /// a partially written store observable.
    fn save(&self, event: EventType, store: &HistoryStore) -> StoreResult<()>;
}

/// One pretty-printed JSON document per event type under a data root:
/// `war_logs/player_stats_war.json` and `raid_logs/player_stats_raid.json`.
pub struct JsonFileRepo {
    root: PathBuf,
}

impl JsonFileRepo {
    /// A repository rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path of the store document for `event`.
    pub fn store_path(&self, event: EventType) -> PathBuf {
        self.root
            .join(format!("{event}_logs"))
            .join(format!("player_stats_{event}.json"))
    }
}

impl HistoryRepo for JsonFileRepo {
    fn load(&self, event: EventType) -> StoreResult<HistoryStore> {
        let path = self.store_path(event);
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(HistoryStore::default()),
            Err(source) => return Err(StoreError::Read { path, source }),
        };
        serde_json::from_str(&raw).map_err(|source| StoreError::Decode { path, source })
    }

    fn save(&self, event: EventType, store: &HistoryStore) -> StoreResult<()> {
        let path = self.store_path(event);
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(|source| StoreError::Write {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let body = serde_json::to_string_pretty(store).map_err(StoreError::Encode)?;

        // Write beside the target and rename, so a crashed pass never
        // leaves a truncated store behind.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, body).map_err(|source| StoreError::Write {
            path: tmp.clone(),
            source,
        })?;
        std::fs::rename(&tmp, &path).map_err(|source| StoreError::Write { path, source })
    }
}

impl AsRef<Path> for JsonFileRepo {
    fn as_ref(&self) -> &Path {
        &self.root
    }
}
