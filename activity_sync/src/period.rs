//! Period identity: which event, which day, and whether it is still open.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use clan_data_ingestor::models::{end_date_key, raid::RaidLog, war::WarLog};

/// Which recurring event a store tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// Clan war.
    War,
    /// Capital raid weekend.
    Raid,
}

impl EventType {
    /// Canonical lowercase code, as used in paths and log lines.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::War => "war",
            Self::Raid => "raid",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The string was not a recognized event type code.
#[derive(Debug, Error)]
#[error("unknown event type {0:?} (expected \"war\" or \"raid\")")]
pub struct ParseEventTypeError(String);

impl FromStr for EventType {
    type Err = ParseEventTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "war" => Ok(Self::War),
            "raid" => Ok(Self::Raid),
            other => Err(ParseEventTypeError(other.to_string())),
        }
    }
}

/// Whether a raid period is still accepting attacks.
///
/// Wars carry no meaningful lifecycle here: once captured they are treated
/// as concluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// The period is still open; members can still act.
    Ongoing,
    /// The period has concluded.
    Ended,
}

impl LifecycleState {
    /// Maps the upstream state string. Anything other than `ended` counts
    /// as ongoing, matching the upstream contract.
    pub fn from_raw(state: &str) -> Self {
        if state == "ended" {
            Self::Ended
        } else {
            Self::Ongoing
        }
    }
}

/// Calendar-day key of one period, derived from the event's end timestamp
/// and serialized in the compact `YYYYMMDD` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PeriodDate(NaiveDate);

/// The string could not be interpreted as a period day key.
#[derive(Debug, Error)]
#[error("invalid period date {value:?}")]
pub struct ParsePeriodDateError {
    /// The rejected input.
    pub value: String,
}

impl PeriodDate {
    /// Wraps an already-validated calendar day.
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Derives the day key from an upstream end timestamp
    /// (`20240601T070000.000Z` or `2024-06-01T07:00:00Z`).
    pub fn from_end_timestamp(end_time: &str) -> Result<Self, ParsePeriodDateError> {
        let key = end_date_key(end_time).ok_or_else(|| ParsePeriodDateError {
            value: end_time.to_string(),
        })?;
        key.parse()
    }
}

impl fmt::Display for PeriodDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y%m%d"))
    }
}

impl FromStr for PeriodDate {
    type Err = ParsePeriodDateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s, "%Y%m%d")
            .map(Self)
            .map_err(|_| ParsePeriodDateError {
                value: s.to_string(),
            })
    }
}

impl Serialize for PeriodDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PeriodDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A tracked group member. Identity is the `tag`; the display name is
/// refreshed from the roster on every pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Stable, unique player tag.
    pub tag: String,
    /// Current display name.
    pub name: String,
}

/// The most recent raw period document plus the day key derived from its
/// end timestamp. One snapshot drives one reconciliation pass.
#[derive(Debug, Clone)]
pub struct PeriodSnapshot {
    /// Day key of the period.
    pub date: PeriodDate,
    /// The raw document.
    pub doc: PeriodDoc,
}

/// The raw document backing a [`PeriodSnapshot`].
#[derive(Debug, Clone)]
pub enum PeriodDoc {
    /// A clan war document.
    War(WarLog),
    /// A capital raid weekend document.
    Raid(RaidLog),
}

impl PeriodSnapshot {
    /// Wraps a war document, deriving the day key from its end timestamp.
    pub fn from_war(war: WarLog) -> Result<Self, ParsePeriodDateError> {
        let date = PeriodDate::from_end_timestamp(&war.end_time)?;
        Ok(Self {
            date,
            doc: PeriodDoc::War(war),
        })
    }

    /// Wraps a raid document, deriving the day key from its end timestamp.
    pub fn from_raid(raid: RaidLog) -> Result<Self, ParsePeriodDateError> {
        let date = PeriodDate::from_end_timestamp(&raid.end_time)?;
        Ok(Self {
            date,
            doc: PeriodDoc::Raid(raid),
        })
    }

    /// Which event type this snapshot belongs to.
    pub fn event_type(&self) -> EventType {
        match self.doc {
            PeriodDoc::War(_) => EventType::War,
            PeriodDoc::Raid(_) => EventType::Raid,
        }
    }

    /// Lifecycle of the period. Wars are concluded once captured; only
    /// raids can still be ongoing.
    pub fn lifecycle(&self) -> LifecycleState {
        match &self.doc {
            PeriodDoc::War(_) => LifecycleState::Ended,
            PeriodDoc::Raid(raid) => LifecycleState::from_raw(&raid.state),
        }
    }
}
