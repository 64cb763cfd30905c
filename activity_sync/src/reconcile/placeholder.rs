use crate::period::{EventType, LifecycleState, PeriodDate};
use crate::store::{EntryMetrics, HistoryEntry, Stat};

/// Inputs that stay fixed across one gap-fill sweep.
#[derive(Debug, Clone, Copy)]
pub struct GapFillContext {
    /// Event type of the pass.
    pub event: EventType,
    /// Lifecycle of the snapshot driving the pass.
    pub lifecycle: LifecycleState,
    /// Latest date in the fill set; the only date an ongoing raid can be
    /// live for.
    pub latest: PeriodDate,
    /// Attacks a member is expected to have available in one raid weekend.
    pub raid_allotment: u32,
}

impl GapFillContext {
    /// The placeholder for one missing `(member, date)` hole.
    ///
    /// Decision table over (event, lifecycle, is-latest-date, in-roster).
    /// The single case that charges missed attacks is a current-roster
    /// member staying silent while the latest raid is still open: every
    /// elapsed opportunity already counts as missed, but the member can
    /// still act. Every other hole means "no reliable data": a member
    /// absent from a concluded period was never eligible for it (joined
    /// later, already departed, or simply not picked), so metrics read
    /// unavailable and no miss is charged.
    pub fn placeholder(&self, date: PeriodDate, in_roster: bool) -> HistoryEntry {
        match (self.event, self.lifecycle, date == self.latest, in_roster) {
            (EventType::Raid, LifecycleState::Ongoing, true, true) => HistoryEntry {
                date,
                metrics: EntryMetrics::Raid {
                    attacks_used: Stat::Count(0),
                    capital_loot: Stat::Count(0),
                    avg_loot_per_attack: Stat::Unavailable,
                },
                attacks_missed: Some(self.raid_allotment),
                participated: false,
            },
            (EventType::Raid, ..) => HistoryEntry {
                date,
                metrics: EntryMetrics::Raid {
                    attacks_used: Stat::Unavailable,
                    capital_loot: Stat::Unavailable,
                    avg_loot_per_attack: Stat::Unavailable,
                },
                attacks_missed: Some(0),
                participated: false,
            },
            (EventType::War, ..) => HistoryEntry {
                date,
                metrics: EntryMetrics::War {
                    attacks_used: Stat::Unavailable,
                    stars_earned: Stat::Unavailable,
                    destruction: Stat::Unavailable,
                },
                attacks_missed: Some(0),
                participated: false,
            },
        }
    }
}
