//! Error taxonomy of a reconciliation pass.

use thiserror::Error;

use crate::manifest::ManifestError;
use crate::period::EventType;
use crate::providers::ProviderError;
use crate::store::repo::StoreError;

/// Everything that can stop a pass.
///
/// Malformed member rows inside an otherwise usable snapshot are not
/// errors: they are recovered per field where a default exists, logged as
/// warnings, and counted in the pass report instead of aborting the pass.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The snapshot provider had nothing usable (period not started,
    /// source unreachable, or every stored document was unusable).
    /// Non-fatal: the pass is a no-op and the prior store is untouched.
    #[error("no {event} snapshot available")]
    NoSnapshotAvailable {
        /// Event type of the attempted pass.
        event: EventType,
        /// Provider failure behind the miss, when there was one.
        #[source]
        source: Option<ProviderError>,
    },

    /// The roster collaborator failed outright. Fatal to the pass.
    #[error("roster provider failure")]
    Roster(#[source] ProviderError),

    /// The store could not be loaded or saved. Fatal to the pass: success
    /// is never reported and no data is silently dropped.
    #[error(transparent)]
    Persistence(#[from] StoreError),

    /// The period manifest could not be updated. Fatal to the pass.
    #[error(transparent)]
    Manifest(#[from] ManifestError),
}

impl SyncError {
    /// True for errors the operator must act on; a missing snapshot is
    /// expected between periods and only warrants a log line.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::NoSnapshotAvailable { .. })
    }
}

/// Result alias for pass-level operations.
pub type SyncResult<T> = Result<T, SyncError>;
