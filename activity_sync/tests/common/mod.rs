#![allow(dead_code)]

use chrono::{DateTime, Utc};

use activity_sync::period::{Member, PeriodSnapshot};
use activity_sync::store::{HistoryEntry, HistoryStore};
use clan_data_ingestor::models::raid::{RaidLog, RaidMember};
use clan_data_ingestor::models::war::{WarAttack, WarLog, WarMember, WarSide};

pub fn member(tag: &str, name: &str) -> Member {
    Member {
        tag: tag.into(),
        name: name.into(),
    }
}

pub fn war_member(tag: &str, name: &str, attacks: &[(u32, f64)]) -> WarMember {
    WarMember {
        tag: tag.into(),
        name: name.into(),
        attacks: attacks
            .iter()
            .map(|&(stars, destruction_percentage)| WarAttack {
                stars,
                destruction_percentage,
            })
            .collect(),
    }
}

pub fn war_snapshot(date: &str, attacks_per_member: u32, members: Vec<WarMember>) -> PeriodSnapshot {
    PeriodSnapshot::from_war(WarLog {
        state: "warEnded".into(),
        team_size: members.len() as u32,
        attacks_per_member,
        end_time: format!("{date}T070000.000Z"),
        clan: WarSide {
            name: "Home".into(),
            members,
            ..WarSide::default()
        },
        opponent: WarSide {
            name: "Away".into(),
            ..WarSide::default()
        },
    })
    .expect("test war snapshot")
}

pub fn raid_member(tag: &str, name: &str, attacks: u32, limit: u32, loot: u32) -> RaidMember {
    RaidMember {
        tag: tag.into(),
        name: name.into(),
        attacks,
        attack_limit: limit,
        bonus_attack_limit: 0,
        capital_resources_looted: loot,
    }
}

pub fn raid_snapshot(date: &str, state: &str, members: Vec<RaidMember>) -> PeriodSnapshot {
    PeriodSnapshot::from_raid(RaidLog {
        state: state.into(),
        end_time: format!("{date}T070000.000Z"),
        members,
        ..RaidLog::default()
    })
    .expect("test raid snapshot")
}

pub fn entry<'a>(store: &'a HistoryStore, tag: &str, date: &str) -> &'a HistoryEntry {
    let record = store
        .records
        .get(tag)
        .unwrap_or_else(|| panic!("no record for {tag}"));
    record
        .history
        .iter()
        .find(|e| e.date.to_string() == date)
        .unwrap_or_else(|| panic!("no entry for {tag} on {date}"))
}

/// Every record has exactly one entry for every date known to the store,
/// sorted ascending.
pub fn assert_gap_complete(store: &HistoryStore) {
    let dates = store.known_dates();
    for record in store.records.values() {
        assert_eq!(
            record.history.len(),
            dates.len(),
            "record {} is missing dates",
            record.tag
        );
        for date in &dates {
            assert!(record.has_date(*date));
        }
        let seen: Vec<_> = record.history.iter().map(|e| e.date).collect();
        assert!(
            seen.windows(2).all(|w| w[0] < w[1]),
            "record {} is not strictly sorted",
            record.tag
        );
    }
}

pub fn fixed_now() -> DateTime<Utc> {
    "2024-08-01T06:00:00Z".parse().expect("fixed timestamp")
}
