//! The history store: per-member, append-only time series of period metrics.
//!
//! ## Shape at rest
//! One JSON document per event type: a mapping of member tag to record,
//! plus one reserved top-level key (`lastUpdated`) for the store-level
//! timestamp. Entry values are numbers, the `"unavailable"` sentinel
//! string, or booleans.
//!
//! ## Invariants
//! - At most one entry per `(member, date)`; upsert replaces wholesale.
//! - Each record's history is sorted ascending by date at rest.
//! - Records are never deleted, even after a member leaves the roster.

pub mod repo;

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::period::{Member, PeriodDate};

/// Sentinel string marking "no reliable value", kept distinct from zero.
pub const UNAVAILABLE: &str = "unavailable";

/// Reserved top-level key holding the store-level timestamp.
pub const LAST_UPDATED_KEY: &str = "lastUpdated";

/// One metric value: an integral count, a fractional amount, or the
/// explicit "no data" sentinel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Stat {
    /// An integral metric (attack counts, stars, loot).
    Count(u32),
    /// A fractional metric (destruction, loot averages).
    Amount(f64),
    /// No reliable value could be determined.
    Unavailable,
}

impl Stat {
    /// True for the sentinel.
    pub fn is_unavailable(self) -> bool {
        matches!(self, Self::Unavailable)
    }
}

impl Serialize for Stat {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Count(n) => serializer.serialize_u32(*n),
            Self::Amount(v) => serializer.serialize_f64(*v),
            Self::Unavailable => serializer.serialize_str(UNAVAILABLE),
        }
    }
}

struct StatVisitor;

impl Visitor<'_> for StatVisitor {
    type Value = Stat;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a number or the string {UNAVAILABLE:?}")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Stat, E> {
        match u32::try_from(v) {
            Ok(n) => Ok(Stat::Count(n)),
            Err(_) => Ok(Stat::Amount(v as f64)),
        }
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Stat, E> {
        match u32::try_from(v) {
            Ok(n) => Ok(Stat::Count(n)),
            Err(_) => Ok(Stat::Amount(v as f64)),
        }
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Stat, E> {
        Ok(Stat::Amount(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Stat, E> {
        if v == UNAVAILABLE {
            Ok(Stat::Unavailable)
        } else {
            Err(E::invalid_value(de::Unexpected::Str(v), &self))
        }
    }
}

impl<'de> Deserialize<'de> for Stat {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(StatVisitor)
    }
}

/// Per-event metric fields of one history entry. The field sets are
/// disjoint, so the untagged representation round-trips unambiguously.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntryMetrics {
    /// War metrics.
    #[serde(rename_all = "camelCase")]
    War {
        /// Attacks performed in this war.
        attacks_used: Stat,
        /// Stars earned across all attacks.
        stars_earned: Stat,
        /// Cumulative destruction percentage across all attacks.
        destruction: Stat,
    },
    /// Raid metrics.
    #[serde(rename_all = "camelCase")]
    Raid {
        /// Attacks performed in this raid weekend.
        attacks_used: Stat,
        /// Capital resources looted.
        capital_loot: Stat,
        /// Loot per attack, rounded to one decimal.
        avg_loot_per_attack: Stat,
    },
}

/// One member's metric row for one period date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Day key of the period this row belongs to.
    pub date: PeriodDate,

    /// Event-specific metric fields, flattened into the entry object.
    #[serde(flatten)]
    pub metrics: EntryMetrics,

    /// Attacks the member left unused; `None` when the allotment was unknown.
    #[serde(default)]
    pub attacks_missed: Option<u32>,

    /// Whether the member actually took part in the period.
    pub participated: bool,
}

/// Append-only time series for one member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// Display name as of the last pass that saw this member.
    pub name: String,
    /// Stable player tag (duplicated from the store key for self-contained rows).
    pub tag: String,
    /// Entries, sorted ascending by date at rest.
    pub history: Vec<HistoryEntry>,
}

impl HistoryRecord {
    /// An empty record for a newly observed member.
    pub fn new(member: &Member) -> Self {
        Self {
            name: member.name.clone(),
            tag: member.tag.clone(),
            history: Vec::new(),
        }
    }

    /// Replace-or-append for one date. An existing entry is replaced
    /// wholesale so re-ingesting a snapshot never merges stale fields.
    pub fn upsert(&mut self, entry: HistoryEntry) {
        match self.history.iter_mut().find(|e| e.date == entry.date) {
            Some(slot) => *slot = entry,
            None => self.history.push(entry),
        }
    }

    /// True when an entry for `date` already exists.
    pub fn has_date(&self, date: PeriodDate) -> bool {
        self.history.iter().any(|e| e.date == date)
    }

    /// Restores the at-rest ordering.
    pub fn sort_by_date(&mut self) {
        self.history.sort_by_key(|e| e.date);
    }
}

/// The full store for one event type: insertion-ordered map of member tag
/// to record, plus the store-level `lastUpdated` stamp.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryStore {
    /// Records keyed by member tag.
    pub records: IndexMap<String, HistoryRecord>,
    /// When the store was last reconciled; `None` for a store never saved.
    pub last_updated: Option<DateTime<Utc>>,
}

impl HistoryStore {
    /// Number of member records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when no member has ever been recorded.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record for `member`, created empty on first sight. The stored name
    /// is only set at creation; use [`HistoryStore::sync_roster`] to
    /// refresh names.
    pub fn ensure_record(&mut self, member: &Member) -> &mut HistoryRecord {
        self.records
            .entry(member.tag.clone())
            .or_insert_with(|| HistoryRecord::new(member))
    }

    /// Seeds a record for every roster member and refreshes display names.
    /// Returns how many records were newly created.
    pub fn sync_roster(&mut self, roster: &[Member]) -> usize {
        let mut created = 0;
        for member in roster {
            if !self.records.contains_key(&member.tag) {
                created += 1;
            }
            let record = self.ensure_record(member);
            record.name.clone_from(&member.name);
        }
        created
    }

    /// Union of all period dates appearing in any record's history.
    pub fn known_dates(&self) -> BTreeSet<PeriodDate> {
        self.records
            .values()
            .flat_map(|r| r.history.iter().map(|e| e.date))
            .collect()
    }
}

impl Serialize for HistoryStore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let extra = usize::from(self.last_updated.is_some());
        let mut map = serializer.serialize_map(Some(self.records.len() + extra))?;
        for (tag, record) in &self.records {
            map.serialize_entry(tag, record)?;
        }
        if let Some(ts) = &self.last_updated {
            map.serialize_entry(
                LAST_UPDATED_KEY,
                &ts.to_rfc3339_opts(SecondsFormat::Secs, true),
            )?;
        }
        map.end()
    }
}

struct StoreVisitor;

impl<'de> Visitor<'de> for StoreVisitor {
    type Value = HistoryStore;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of member tags to history records")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<HistoryStore, A::Error> {
        let mut store = HistoryStore::default();
        while let Some(key) = access.next_key::<String>()? {
            if key == LAST_UPDATED_KEY {
                let raw: String = access.next_value()?;
                let ts = DateTime::parse_from_rfc3339(&raw)
                    .map_err(|e| de::Error::custom(format!("bad {LAST_UPDATED_KEY}: {e}")))?;
                store.last_updated = Some(ts.with_timezone(&Utc));
            } else {
                let record: HistoryRecord = access.next_value()?;
                store.records.insert(key, record);
            }
        }
        Ok(store)
    }
}

impl<'de> Deserialize<'de> for HistoryStore {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(StoreVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn member(tag: &str, name: &str) -> Member {
        Member {
            tag: tag.into(),
            name: name.into(),
        }
    }

    fn war_entry(date: &str, used: u32) -> HistoryEntry {
        HistoryEntry {
            date: date.parse().unwrap(),
            metrics: EntryMetrics::War {
                attacks_used: Stat::Count(used),
                stars_earned: Stat::Count(used * 2),
                destruction: Stat::Amount(f64::from(used) * 40.0),
            },
            attacks_missed: Some(2_u32.saturating_sub(used)),
            participated: used > 0,
        }
    }

    #[test]
    fn stat_serializes_counts_amounts_and_the_sentinel() {
        assert_eq!(serde_json::to_value(Stat::Count(3)).unwrap(), json!(3));
        assert_eq!(serde_json::to_value(Stat::Amount(45.5)).unwrap(), json!(45.5));
        assert_eq!(
            serde_json::to_value(Stat::Unavailable).unwrap(),
            json!("unavailable")
        );
    }

    #[test]
    fn stat_rejects_arbitrary_strings() {
        assert!(serde_json::from_value::<Stat>(json!("---")).is_err());
        assert_eq!(
            serde_json::from_value::<Stat>(json!("unavailable")).unwrap(),
            Stat::Unavailable
        );
    }

    #[test]
    fn war_entry_wire_shape() {
        let entry = HistoryEntry {
            date: "20240601".parse().unwrap(),
            metrics: EntryMetrics::War {
                attacks_used: Stat::Count(1),
                stars_earned: Stat::Count(2),
                destruction: Stat::Amount(45.5),
            },
            attacks_missed: Some(1),
            participated: true,
        };

        assert_eq!(
            serde_json::to_value(&entry).unwrap(),
            json!({
                "date": "20240601",
                "attacksUsed": 1,
                "starsEarned": 2,
                "destruction": 45.5,
                "attacksMissed": 1,
                "participated": true
            })
        );
    }

    #[test]
    fn raid_entry_with_unknown_limit_round_trips() {
        let entry = HistoryEntry {
            date: "20240701".parse().unwrap(),
            metrics: EntryMetrics::Raid {
                attacks_used: Stat::Count(4),
                capital_loot: Stat::Count(12000),
                avg_loot_per_attack: Stat::Amount(3000.0),
            },
            attacks_missed: None,
            participated: true,
        };

        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["attacksMissed"], json!(null));

        let back: HistoryEntry = serde_json::from_value(value).unwrap();
        assert_eq!(back, entry);
    }

    #[test]
    fn upsert_replaces_wholesale_and_never_duplicates() {
        let mut record = HistoryRecord::new(&member("#P1", "Ann"));
        record.upsert(war_entry("20240601", 1));
        record.upsert(war_entry("20240601", 2));

        assert_eq!(record.history.len(), 1);
        assert_eq!(
            record.history[0].metrics,
            EntryMetrics::War {
                attacks_used: Stat::Count(2),
                stars_earned: Stat::Count(4),
                destruction: Stat::Amount(80.0),
            }
        );
    }

    #[test]
    fn store_serializes_records_plus_reserved_key() {
        let mut store = HistoryStore::default();
        store.ensure_record(&member("#P1", "Ann")).upsert(war_entry("20240601", 1));
        store.last_updated = Some("2024-06-02T08:00:00Z".parse().unwrap());

        let value = serde_json::to_value(&store).unwrap();
        assert_eq!(value["lastUpdated"], json!("2024-06-02T08:00:00Z"));
        assert_eq!(value["#P1"]["name"], json!("Ann"));
        assert_eq!(value["#P1"]["history"][0]["attacksUsed"], json!(1));

        let back: HistoryStore = serde_json::from_value(value).unwrap();
        assert_eq!(back, store);
    }

    #[test]
    fn sync_roster_refreshes_names_without_touching_history() {
        let mut store = HistoryStore::default();
        store.ensure_record(&member("#P1", "Ann")).upsert(war_entry("20240601", 1));

        let created = store.sync_roster(&[member("#P1", "Annabel"), member("#P2", "Bob")]);
        assert_eq!(created, 1);
        assert_eq!(store.records["#P1"].name, "Annabel");
        assert_eq!(store.records["#P1"].history.len(), 1);
        assert!(store.records["#P2"].history.is_empty());
    }

    proptest! {
        // Any sequence of upserts leaves at most one entry per date, and
        // sorting restores a strictly increasing order.
        #[test]
        fn upserts_preserve_date_uniqueness(days in proptest::collection::vec(1u32..=28, 1..40)) {
            let mut record = HistoryRecord::new(&member("#P1", "Ann"));
            for day in &days {
                record.upsert(war_entry(&format!("202406{day:02}"), *day % 3));
            }
            record.sort_by_date();

            let dates: Vec<_> = record.history.iter().map(|e| e.date).collect();
            let mut unique: Vec<_> = dates.clone();
            unique.dedup();
            prop_assert_eq!(dates.len(), unique.len());
            prop_assert!(dates.windows(2).all(|w| w[0] < w[1]));
        }
    }
}
