//! Raw current-war document as served by the clan API.

use serde::{Deserialize, Serialize};

/// One clan-war snapshot, covering both sides of the matchup.
///
/// `state` is the upstream lifecycle string (`preparation`, `inWar`,
/// `warEnded`, or `notInWar` when the clan has no active war).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WarLog {
    /// Upstream war state string.
    #[serde(default)]
    pub state: String,

    /// Number of members on each side.
    #[serde(default)]
    pub team_size: u32,

    /// Attack allotment per member for this war (1 or 2 in practice).
    #[serde(default)]
    pub attacks_per_member: u32,

    /// War end timestamp in the API's compact form (e.g. `20240601T070000.000Z`).
    #[serde(default)]
    pub end_time: String,

    /// Our side of the war.
    #[serde(default)]
    pub clan: WarSide,

    /// The opposing side.
    #[serde(default)]
    pub opponent: WarSide,
}

impl WarLog {
    /// True when the upstream reports no active war for the clan.
    pub fn is_not_in_war(&self) -> bool {
        self.state == "notInWar"
    }
}

/// One side of a war: aggregate totals plus the member roster with attacks.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WarSide {
    /// Clan name.
    #[serde(default)]
    pub name: String,

    /// Total stars earned by this side.
    #[serde(default)]
    pub stars: u32,

    /// Side-level destruction percentage (averaged by the upstream).
    #[serde(default)]
    pub destruction_percentage: f64,

    /// Total attacks used by this side.
    #[serde(default)]
    pub attacks: u32,

    /// Participating members with their individual attacks.
    #[serde(default)]
    pub members: Vec<WarMember>,
}

/// One participant in a war.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WarMember {
    /// Stable player tag (e.g. `#ABC123`).
    #[serde(default)]
    pub tag: String,

    /// Display name at the time of the war.
    #[serde(default)]
    pub name: String,

    /// Attacks actually performed; absent upstream when none were used.
    #[serde(default)]
    pub attacks: Vec<WarAttack>,
}

/// A single attack within a war.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WarAttack {
    /// Stars earned by this attack (0-3).
    #[serde(default)]
    pub stars: u32,

    /// Destruction percentage dealt by this attack (0-100).
    #[serde(default)]
    pub destruction_percentage: f64,
}
