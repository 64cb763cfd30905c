//! Raw capital-raid season document as served by the clan API.

use serde::{Deserialize, Serialize};

/// Wrapper for the raid seasons endpoint, newest season first.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RaidSeasonList {
    /// Seasons in reverse chronological order.
    #[serde(default)]
    pub items: Vec<RaidLog>,
}

/// One capital-raid weekend.
///
/// `state` is `ongoing` while the raid weekend is still accepting attacks
/// and `ended` once it has concluded.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RaidLog {
    /// Upstream raid state string (`ongoing` or `ended`).
    #[serde(default)]
    pub state: String,

    /// Raid start timestamp in the API's compact form.
    #[serde(default)]
    pub start_time: String,

    /// Raid end timestamp in the API's compact form.
    #[serde(default)]
    pub end_time: String,

    /// Total attacks used by the clan this weekend.
    #[serde(default)]
    pub total_attacks: u32,

    /// Enemy districts destroyed across all raids.
    #[serde(default)]
    pub enemy_districts_destroyed: u32,

    /// Offensive raid medal reward.
    #[serde(default)]
    pub offensive_reward: u32,

    /// Defensive raid medal reward.
    #[serde(default)]
    pub defensive_reward: u32,

    /// Members who participated this weekend.
    #[serde(default)]
    pub members: Vec<RaidMember>,
}

/// One participant in a raid weekend. `attacks` is a count here, unlike
/// wars where it is a list of individual attacks.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RaidMember {
    /// Stable player tag.
    #[serde(default)]
    pub tag: String,

    /// Display name at the time of the raid.
    #[serde(default)]
    pub name: String,

    /// Number of attacks used.
    #[serde(default)]
    pub attacks: u32,

    /// Base attack allotment; 0 when the upstream omits it.
    #[serde(default)]
    pub attack_limit: u32,

    /// Bonus attacks earned; 0 when the upstream omits it.
    #[serde(default)]
    pub bonus_attack_limit: u32,

    /// Capital resources looted this weekend.
    #[serde(default)]
    pub capital_resources_looted: u32,
}
