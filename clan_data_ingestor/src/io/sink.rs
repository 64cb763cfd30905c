use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use snafu::{Backtrace, ResultExt, Snafu};

use crate::models::{end_date_key, raid::RaidLog, roster::RosterDoc, war::WarLog};

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum SinkError {
    /// An error occurred while writing a document to its destination.
    #[snafu(display("Failed to write {}: {source}", path.display()))]
    Write {
        path: PathBuf,
        source: std::io::Error,
        backtrace: Backtrace,
    },

    /// An error occurred while creating a log directory.
    #[snafu(display("Failed to create directory {}: {source}", path.display()))]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
        backtrace: Backtrace,
    },

    /// An error occurred while encoding a document as JSON.
    #[snafu(display("Failed to encode document: {source}"))]
    Encode {
        source: serde_json::Error,
        backtrace: Backtrace,
    },
}

#[async_trait]
pub trait SnapshotSink {
    /// The type of output returned after a successful write operation.
    ///
    /// A file sink returns the path of the created file; other sinks may
    /// return row counts or object keys.
    type Output;

    /// Writes a war snapshot document.
    async fn write_war(&self, war: &WarLog) -> Result<Self::Output, SinkError>;

    /// Writes a raid snapshot document.
    async fn write_raid(&self, raid: &RaidLog) -> Result<Self::Output, SinkError>;

    /// Writes (replacing) the current roster document.
    async fn write_roster(&self, roster: &RosterDoc) -> Result<Self::Output, SinkError>;
}

/// Writes raw snapshot documents into per-event log directories under a
/// data root: `war_logs/`, `raid_logs/`, and `clan_logs/`. War and raid
/// files are keyed by the period's end date; the roster document is a
/// single file replaced on every capture.
pub struct LogDirSink {
    root: PathBuf,
}

impl LogDirSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn write_doc<T: serde::Serialize>(&self, dir: &str, file: &str, doc: &T) -> Result<PathBuf, SinkError> {
        let dir = self.root.join(dir);
        std::fs::create_dir_all(&dir).context(CreateDirSnafu { path: dir.clone() })?;

        let path = dir.join(file);
        let body = serde_json::to_string_pretty(doc).context(EncodeSnafu)?;
        std::fs::write(&path, body).context(WriteSnafu { path: path.clone() })?;
        Ok(path)
    }
}

/// Date key for a period file name: the document's end date, falling back
/// to today when the upstream omitted or mangled the timestamp.
fn date_key_or_today(end_time: &str) -> String {
    end_date_key(end_time).unwrap_or_else(|| Utc::now().format("%Y%m%d").to_string())
}

fn sanitize_name(name: &str) -> String {
    name.replace([' ', '/'], "_")
}

#[async_trait]
impl SnapshotSink for LogDirSink {
    type Output = PathBuf;

    async fn write_war(&self, war: &WarLog) -> Result<PathBuf, SinkError> {
        let date = date_key_or_today(&war.end_time);
        let opponent = sanitize_name(&war.opponent.name);
        self.write_doc("war_logs", &format!("war_{date}_{opponent}.json"), war)
    }

    async fn write_raid(&self, raid: &RaidLog) -> Result<PathBuf, SinkError> {
        let date = date_key_or_today(&raid.end_time);
        self.write_doc("raid_logs", &format!("raid_{date}.json"), raid)
    }

    async fn write_roster(&self, roster: &RosterDoc) -> Result<PathBuf, SinkError> {
        self.write_doc("clan_logs", "clan_members.json", roster)
    }
}

impl AsRef<Path> for LogDirSink {
    fn as_ref(&self) -> &Path {
        &self.root
    }
}
