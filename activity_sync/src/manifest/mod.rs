//! Period-level summary manifest: one row per captured period, newest
//! first. External bookkeeping: the reconciler writes it and never needs
//! to read it back.

pub mod repo;

use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::period::{EventType, PeriodDate, PeriodDoc, PeriodSnapshot};

/// Errors raised while updating a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// The manifest file exists but could not be read or written.
    #[error("failed to access manifest {}", path.display())]
    Io {
        /// Path of the manifest file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The manifest file is not a valid summary list.
    #[error("manifest {} is not a valid summary list", path.display())]
    Decode {
        /// Path of the manifest file.
        path: PathBuf,
        /// Underlying decode error.
        #[source]
        source: serde_json::Error,
    },

    /// The summary list could not be encoded.
    #[error("failed to encode manifest")]
    Encode(#[source] serde_json::Error),
}

/// Outcome of a war by star comparison; a tie requires exact equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WarResult {
    /// More stars than the opponent.
    Win,
    /// Fewer stars than the opponent.
    Lose,
    /// Exactly equal star counts.
    Tie,
}

impl WarResult {
    /// Classifies by star totals.
    pub fn from_stars(clan: u32, opponent: u32) -> Self {
        match clan.cmp(&opponent) {
            std::cmp::Ordering::Greater => Self::Win,
            std::cmp::Ordering::Less => Self::Lose,
            std::cmp::Ordering::Equal => Self::Tie,
        }
    }
}

/// One period's summary row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodSummary {
    /// Day key of the summarized period.
    pub date: PeriodDate,

    /// Event-specific aggregate totals, flattened into the row.
    #[serde(flatten)]
    pub totals: SummaryTotals,
}

/// Aggregate totals of one period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SummaryTotals {
    /// War aggregates, both sides.
    #[serde(rename_all = "camelCase")]
    War {
        /// Opponent clan name.
        opponent: String,
        /// Outcome by star comparison.
        result: WarResult,
        /// Members per side.
        team_size: u32,
        /// Our total stars.
        clan_stars: u32,
        /// Our side-level destruction percentage.
        clan_destruction: f64,
        /// Our total attacks.
        clan_attacks: u32,
        /// Opponent total stars.
        opponent_stars: u32,
        /// Opponent side-level destruction percentage.
        opponent_destruction: f64,
        /// Opponent total attacks.
        opponent_attacks: u32,
    },
    /// Raid aggregates.
    #[serde(rename_all = "camelCase")]
    Raid {
        /// Attacks used by the clan this weekend.
        total_attacks: u32,
        /// Attacks spent per destroyed district, rounded to two decimals.
        attacks_per_district: f64,
        /// Enemy districts destroyed.
        enemy_districts_destroyed: u32,
        /// Offensive medal reward.
        offensive_reward: u32,
        /// Defensive medal reward.
        defensive_reward: u32,
        /// Number of participating members.
        participants: usize,
    },
}

impl PeriodSummary {
    /// Builds the summary row for a period snapshot.
    pub fn from_snapshot(snapshot: &PeriodSnapshot) -> Self {
        let totals = match &snapshot.doc {
            PeriodDoc::War(war) => SummaryTotals::War {
                opponent: war.opponent.name.clone(),
                result: WarResult::from_stars(war.clan.stars, war.opponent.stars),
                team_size: war.team_size,
                clan_stars: war.clan.stars,
                clan_destruction: round_to(war.clan.destruction_percentage, 3),
                clan_attacks: war.clan.attacks,
                opponent_stars: war.opponent.stars,
                opponent_destruction: round_to(war.opponent.destruction_percentage, 3),
                opponent_attacks: war.opponent.attacks,
            },
            PeriodDoc::Raid(raid) => SummaryTotals::Raid {
                total_attacks: raid.total_attacks,
                attacks_per_district: if raid.enemy_districts_destroyed > 0 {
                    round_to(
                        f64::from(raid.total_attacks) / f64::from(raid.enemy_districts_destroyed),
                        2,
                    )
                } else {
                    0.0
                },
                enemy_districts_destroyed: raid.enemy_districts_destroyed,
                offensive_reward: raid.offensive_reward,
                defensive_reward: raid.defensive_reward,
                participants: raid.members.len(),
            },
        };

        Self {
            date: snapshot.date,
            totals,
        }
    }
}

fn round_to(v: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (v * factor).round() / factor
}

/// Portable manifest surface; the JSON file implementation lives in `repo.rs`.
pub trait ManifestRepo {
    /// Appends the summary, replacing any prior row for the same date.
    fn upsert_summary(&self, event: EventType, summary: &PeriodSummary)
    -> Result<(), ManifestError>;
}
