//! Clan member list, both the raw API response and the roster document the
//! ingestor writes to disk for downstream passes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Raw response of the clan members endpoint.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MemberList {
    /// Current members, in clan rank order.
    #[serde(default)]
    pub items: Vec<ClanMember>,
}

/// One member as reported by the members endpoint.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClanMember {
    /// Stable player tag.
    #[serde(default)]
    pub tag: String,

    /// Current display name.
    #[serde(default)]
    pub name: String,

    /// Position within the clan (1 = highest).
    #[serde(default)]
    pub clan_rank: u32,

    /// Current trophy count.
    #[serde(default)]
    pub trophies: u32,
}

/// The roster document written to `clan_logs/clan_members.json`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterDoc {
    /// Capture date (`YYYY-MM-DD`).
    pub date: String,

    /// Sum of all member trophies at capture time.
    pub total_player_trophies: u32,

    /// Per-member stats.
    pub members: Vec<RosterEntry>,
}

/// One member inside a [`RosterDoc`].
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RosterEntry {
    /// Current display name.
    pub name: String,

    /// Stable player tag.
    pub tag: String,

    /// Position within the clan (1 = highest).
    pub position: u32,

    /// Current trophy count.
    pub trophies: u32,
}

impl RosterDoc {
    /// Builds the on-disk roster document from a raw member list response.
    pub fn from_member_list(list: &MemberList, date: NaiveDate) -> Self {
        let members: Vec<RosterEntry> = list
            .items
            .iter()
            .map(|m| RosterEntry {
                name: m.name.clone(),
                tag: m.tag.clone(),
                position: m.clan_rank,
                trophies: m.trophies,
            })
            .collect();
        let total_player_trophies = list.items.iter().map(|m| m.trophies).sum();

        Self {
            date: date.format("%Y-%m-%d").to_string(),
            total_player_trophies,
            members,
        }
    }
}
