use clan_data_ingestor::models::{raid::RaidLog, war::WarLog};
use tracing::warn;

use crate::period::{LifecycleState, Member, PeriodDate, PeriodDoc, PeriodSnapshot};
use crate::store::{EntryMetrics, HistoryEntry, Stat};

/// Extraction output: entries ready for upsert plus the count of member
/// rows that could not be extracted.
#[derive(Debug)]
pub struct Extraction {
    /// Per-member entries for the snapshot's date.
    pub entries: Vec<(Member, HistoryEntry)>,
    /// Member rows skipped with a warning (e.g. missing tag).
    pub skipped: usize,
}

/// Maps one raw period document to per-member history entries.
pub fn extract_entries(snapshot: &PeriodSnapshot) -> Extraction {
    match &snapshot.doc {
        PeriodDoc::War(war) => extract_war(war, snapshot.date),
        PeriodDoc::Raid(raid) => extract_raid(raid, snapshot.date, snapshot.lifecycle()),
    }
}

fn extract_war(war: &WarLog, date: PeriodDate) -> Extraction {
    let mut entries = Vec::with_capacity(war.clan.members.len());
    let mut skipped = 0;

    for member in &war.clan.members {
        if member.tag.is_empty() {
            warn!(%date, name = %member.name, "war member row without tag, skipping");
            skipped += 1;
            continue;
        }

        let used = member.attacks.len() as u32;
        let stars: u32 = member.attacks.iter().map(|a| a.stars).sum();
        // Destruction is the cumulative sum across attacks, matching the
        // upstream's raw per-attack aggregation. Not an average.
        let destruction: f64 = member.attacks.iter().map(|a| a.destruction_percentage).sum();

        let entry = HistoryEntry {
            date,
            metrics: EntryMetrics::War {
                attacks_used: Stat::Count(used),
                stars_earned: Stat::Count(stars),
                destruction: Stat::Amount(destruction),
            },
            attacks_missed: (war.attacks_per_member > 0)
                .then(|| war.attacks_per_member.saturating_sub(used)),
            participated: used > 0,
        };
        entries.push((
            Member {
                tag: member.tag.clone(),
                name: member.name.clone(),
            },
            entry,
        ));
    }

    Extraction { entries, skipped }
}

fn extract_raid(raid: &RaidLog, date: PeriodDate, lifecycle: LifecycleState) -> Extraction {
    let mut entries = Vec::with_capacity(raid.members.len());
    let mut skipped = 0;

    for member in &raid.members {
        if member.tag.is_empty() {
            warn!(%date, name = %member.name, "raid member row without tag, skipping");
            skipped += 1;
            continue;
        }

        let attacks = member.attacks;
        let limit = member.attack_limit + member.bonus_attack_limit;
        let loot = member.capital_resources_looted;

        // A present member with zero attacks is a zero-attack participation,
        // not a missed period; during an ongoing raid the average reads 0,
        // after the raid it is unknowable.
        let avg_loot_per_attack = if attacks > 0 {
            Stat::Amount(round1(f64::from(loot) / f64::from(attacks)))
        } else if lifecycle == LifecycleState::Ongoing {
            Stat::Count(0)
        } else {
            Stat::Unavailable
        };

        let entry = HistoryEntry {
            date,
            metrics: EntryMetrics::Raid {
                attacks_used: Stat::Count(attacks),
                capital_loot: Stat::Count(loot),
                avg_loot_per_attack,
            },
            // Some snapshots omit the allotment; unknown is null, not 0.
            attacks_missed: (limit > 0).then(|| limit.saturating_sub(attacks)),
            participated: true,
        };
        entries.push((
            Member {
                tag: member.tag.clone(),
                name: member.name.clone(),
            },
            entry,
        ));
    }

    Extraction { entries, skipped }
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}
