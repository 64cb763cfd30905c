//! One reconciliation pass over one event type.
//!
//! ## What this does
//! - Seeds a record for every current roster member and refreshes names.
//! - Extracts per-member entries from the latest period document and
//!   upserts them (replace-or-append, so re-running a pass is idempotent).
//! - Fills every remaining `(member, date)` hole with a policy placeholder,
//!   over the union of all dates the store has ever seen.
//! - Sorts each history ascending and stamps `lastUpdated`.
//!
//! ## Consistency
//! [`reconcile`] is pure: the complete new store value exists before any
//! collaborator write is attempted, so persistence never observes a
//! half-updated store. [`run_pass`] wires the collaborators together and
//! only persists after reconciliation has fully succeeded.

mod extract;
mod placeholder;

pub use extract::{Extraction, extract_entries};
pub use placeholder::GapFillContext;

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::config::TrackerConfig;
use crate::error::{SyncError, SyncResult};
use crate::manifest::{ManifestRepo, PeriodSummary};
use crate::period::{EventType, Member, PeriodDate, PeriodSnapshot};
use crate::providers::{RosterProvider, SnapshotProvider};
use crate::store::HistoryStore;
use crate::store::repo::HistoryRepo;

/// Options for a reconciliation pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassOptions {
    /// If true, compute and report only; nothing is persisted.
    pub dry_run: bool,
}

/// What one pass changed, for operator-facing reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Event type of the pass.
    pub event: EventType,
    /// Date of the snapshot that drove the pass.
    pub date: PeriodDate,
    /// Records created for members seen for the first time.
    pub records_created: usize,
    /// Members whose entry for the snapshot date was written.
    pub members_updated: usize,
    /// Placeholder entries appended across all records and dates.
    pub placeholders_filled: usize,
    /// Snapshot member rows skipped as unextractable.
    pub members_skipped: usize,
}

impl fmt::Display for ReconcileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}: {} updated, {} placeholders, {} new records",
            self.event, self.date, self.members_updated, self.placeholders_filled,
            self.records_created
        )?;
        if self.members_skipped > 0 {
            write!(f, ", {} skipped", self.members_skipped)?;
        }
        Ok(())
    }
}

/// Pure reconciliation: prior store + roster + snapshot → new store.
///
/// `now` becomes the store's `lastUpdated` stamp; injecting it keeps the
/// function deterministic for tests.
pub fn reconcile(
    mut store: HistoryStore,
    roster: &[Member],
    snapshot: &PeriodSnapshot,
    raid_allotment: u32,
    now: DateTime<Utc>,
) -> (HistoryStore, ReconcileReport) {
    let event = snapshot.event_type();

    let mut records_created = store.sync_roster(roster);

    let Extraction { entries, skipped } = extract_entries(snapshot);
    let members_updated = entries.len();
    for (member, entry) in entries {
        // Participants who already left the roster still get their entry.
        if !store.records.contains_key(&member.tag) {
            records_created += 1;
        }
        store.ensure_record(&member).upsert(entry);
    }

    // Fill over every date this store has ever seen, so records created
    // this pass pick up placeholders for historical periods too.
    let mut dates: BTreeSet<PeriodDate> = store.known_dates();
    dates.insert(snapshot.date);
    let latest = dates.iter().next_back().copied().unwrap_or(snapshot.date);

    let ctx = GapFillContext {
        event,
        lifecycle: snapshot.lifecycle(),
        latest,
        raid_allotment,
    };
    let roster_tags: BTreeSet<&str> = roster.iter().map(|m| m.tag.as_str()).collect();

    let mut placeholders_filled = 0;
    for (tag, record) in &mut store.records {
        let in_roster = roster_tags.contains(tag.as_str());
        for date in &dates {
            if !record.has_date(*date) {
                record.upsert(ctx.placeholder(*date, in_roster));
                placeholders_filled += 1;
            }
        }
        record.sort_by_date();
    }

    store.last_updated = Some(now);

    let report = ReconcileReport {
        event,
        date: snapshot.date,
        records_created,
        members_updated,
        placeholders_filled,
        members_skipped: skipped,
    };
    (store, report)
}

/// Loads, reconciles, and persists one event type end to end.
///
/// A missing or unusable snapshot is reported as
/// [`SyncError::NoSnapshotAvailable`]; the prior store stays untouched.
pub fn run_pass(
    event: EventType,
    roster: &dyn RosterProvider,
    snapshots: &dyn SnapshotProvider,
    history: &dyn HistoryRepo,
    manifest: &dyn ManifestRepo,
    cfg: &TrackerConfig,
    opts: PassOptions,
) -> SyncResult<ReconcileReport> {
    let snapshot = snapshots
        .latest_period(event)
        .map_err(|source| SyncError::NoSnapshotAvailable {
            event,
            source: Some(source),
        })?
        .ok_or(SyncError::NoSnapshotAvailable {
            event,
            source: None,
        })?;
    debug!(%event, date = %snapshot.date, "loaded latest period snapshot");

    let members = roster.current_members().map_err(SyncError::Roster)?;
    let prior = history.load(event)?;

    let (next, report) = reconcile(
        prior,
        &members,
        &snapshot,
        cfg.raid.attack_allotment,
        Utc::now(),
    );

    if opts.dry_run {
        info!(%report, "dry run, skipping persistence");
        return Ok(report);
    }

    history.save(event, &next)?;
    manifest.upsert_summary(event, &PeriodSummary::from_snapshot(&snapshot))?;
    info!(%report, "pass complete");
    Ok(report)
}
