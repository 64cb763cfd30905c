//! File-backed pass collaborators: the current roster and the most recent
//! period snapshot.
//!
//! Snapshot discovery reads every stored document of the event type and
//! orders them by the end timestamp *inside* each document; file names
//! only scope the scan to the right kind of file. Documents that cannot
//! be used (unreadable JSON, unusable end timestamp) are skipped with a
//! warning rather than failing the scan.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::warn;

use clan_data_ingestor::models::{raid::RaidLog, roster::RosterDoc, war::WarLog};

use crate::period::{EventType, Member, PeriodSnapshot};

/// Errors raised by the file-backed collaborators.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// A file or directory could not be read.
    #[error("failed to read {}", path.display())]
    Io {
        /// Path being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A document could not be parsed as JSON.
    #[error("failed to parse {}", path.display())]
    Parse {
        /// Path of the document.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// A document parsed but cannot drive a pass (e.g. no usable end
    /// timestamp to derive the period date from).
    #[error("malformed snapshot {}: {reason}", path.display())]
    MalformedSnapshot {
        /// Path of the document.
        path: PathBuf,
        /// Human-readable cause.
        reason: String,
    },
}

/// Supplies the current set of group members.
pub trait RosterProvider {
    /// Current members; empty when no roster has been captured yet.
    fn current_members(&self) -> Result<Vec<Member>, ProviderError>;
}

/// Supplies the most recent period snapshot per event type.
pub trait SnapshotProvider {
    /// The latest period of `event`, or `None` when nothing usable is stored.
    fn latest_period(&self, event: EventType) -> Result<Option<PeriodSnapshot>, ProviderError>;
}

/// Roster read from the ingestor's `clan_logs/clan_members.json`.
pub struct FileRoster {
    path: PathBuf,
}

impl FileRoster {
    /// Roster document under `data_dir`.
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join("clan_logs").join("clan_members.json"),
        }
    }
}

impl RosterProvider for FileRoster {
    fn current_members(&self) -> Result<Vec<Member>, ProviderError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(ProviderError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        let doc: RosterDoc = serde_json::from_str(&raw).map_err(|source| ProviderError::Parse {
            path: self.path.clone(),
            source,
        })?;
        Ok(doc
            .members
            .into_iter()
            .map(|m| Member {
                tag: m.tag,
                name: m.name,
            })
            .collect())
    }
}

/// Snapshot provider over the ingestor's per-event log directories.
pub struct LogDirSnapshots {
    root: PathBuf,
}

impl LogDirSnapshots {
    /// Provider rooted at `root` (the directory holding `war_logs/` etc.).
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn scan(&self, event: EventType) -> Result<Vec<PathBuf>, ProviderError> {
        let dir = self.root.join(format!("{event}_logs"));
        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(ProviderError::Io { path: dir, source }),
        };

        let prefix = format!("{event}_");
        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| ProviderError::Io {
                path: dir.clone(),
                source,
            })?;
            let path = entry.path();
            let is_snapshot = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(&prefix) && n.ends_with(".json"));
            if is_snapshot {
                paths.push(path);
            }
        }
        Ok(paths)
    }

    fn read_snapshot(
        &self,
        event: EventType,
        path: &Path,
    ) -> Result<PeriodSnapshot, ProviderError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ProviderError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let parsed = match event {
            EventType::War => serde_json::from_str::<WarLog>(&raw).map(PeriodSnapshot::from_war),
            EventType::Raid => serde_json::from_str::<RaidLog>(&raw).map(PeriodSnapshot::from_raid),
        };
        match parsed {
            Ok(Ok(snapshot)) => Ok(snapshot),
            Ok(Err(bad_date)) => Err(ProviderError::MalformedSnapshot {
                path: path.to_path_buf(),
                reason: bad_date.to_string(),
            }),
            Err(source) => Err(ProviderError::Parse {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

impl SnapshotProvider for LogDirSnapshots {
    fn latest_period(&self, event: EventType) -> Result<Option<PeriodSnapshot>, ProviderError> {
        let mut latest: Option<PeriodSnapshot> = None;
        for path in self.scan(event)? {
            match self.read_snapshot(event, &path) {
                Ok(snapshot) => {
                    if latest.as_ref().is_none_or(|l| snapshot.date > l.date) {
                        latest = Some(snapshot);
                    }
                }
                Err(err) => warn!(%err, "skipping unusable snapshot document"),
            }
        }
        Ok(latest)
    }
}
