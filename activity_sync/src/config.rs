//! Tracker configuration: parsing and defaults.
//!
//! A TOML file points the CLI at the data root and carries the few policy
//! knobs the reconciler needs:
//!
//! ```toml
//! data_dir = "data"
//!
//! [raid]
//! attack_allotment = 6
//! ```
//!
//! Entrypoints:
//! - Parse from a TOML string: [`load_config_str`]
//! - Parse from a file path: [`load_config_path`]

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Top-level configuration for the tracker.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TrackerConfig {
    /// Root directory holding the per-event log directories.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Raid-specific policy knobs.
    #[serde(default)]
    pub raid: RaidPolicy,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            raid: RaidPolicy::default(),
        }
    }
}

/// Raid gap-fill policy.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RaidPolicy {
    /// Attacks a member is expected to have available in one raid weekend
    /// (base allotment plus bonus).
    #[serde(default = "default_attack_allotment")]
    pub attack_allotment: u32,
}

impl Default for RaidPolicy {
    fn default() -> Self {
        Self {
            attack_allotment: default_attack_allotment(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_attack_allotment() -> u32 {
    6
}

/// Parse a tracker config from a TOML string.
pub fn load_config_str(toml_str: &str) -> anyhow::Result<TrackerConfig> {
    toml::from_str(toml_str).context("failed to parse tracker config TOML")
}

/// Read a tracker config TOML file from disk and parse it.
pub fn load_config_path(path: impl AsRef<Path>) -> anyhow::Result<TrackerConfig> {
    let text = std::fs::read_to_string(path.as_ref())
        .with_context(|| format!("read config file {}", path.as_ref().display()))?;
    load_config_str(&text)
}
