//! JSON file implementation of the manifest repository.

use std::io;
use std::path::{Path, PathBuf};

use crate::manifest::{ManifestError, ManifestRepo, PeriodSummary};
use crate::period::EventType;

/// One `manifest.json` per event type under the data root, newest first.
pub struct JsonManifestRepo {
    root: PathBuf,
}

impl JsonManifestRepo {
    /// A repository rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path of the manifest document for `event`.
    pub fn manifest_path(&self, event: EventType) -> PathBuf {
        self.root.join(format!("{event}_logs")).join("manifest.json")
    }

    fn load(&self, path: &Path) -> Result<Vec<PeriodSummary>, ManifestError> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(ManifestError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        serde_json::from_str(&raw).map_err(|source| ManifestError::Decode {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl ManifestRepo for JsonManifestRepo {
    fn upsert_summary(
        &self,
        event: EventType,
        summary: &PeriodSummary,
    ) -> Result<(), ManifestError> {
        let path = self.manifest_path(event);
        let mut summaries = self.load(&path)?;

        summaries.retain(|s| s.date != summary.date);
        summaries.insert(0, summary.clone());

        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(|source| ManifestError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        let body = serde_json::to_string_pretty(&summaries).map_err(ManifestError::Encode)?;

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, body).map_err(|source| ManifestError::Io {
            path: tmp.clone(),
            source,
        })?;
        std::fs::rename(&tmp, &path).map_err(|source| ManifestError::Io { path, source })
    }
}
