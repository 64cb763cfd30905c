//! Provider abstraction for the upstream clan API.
//!
//! This module defines the [`ClanDataProvider`] trait, a unified interface
//! for fetching the three raw documents the trackers consume: the current
//! member list, the current war, and the latest capital raid season.
//!
//! The concrete [`coc_rest::CocRestProvider`] talks to the official REST
//! API; the trait exists so the fetch binary and tests can swap in stubs.
//! It is designed for async usage and supports dynamic dispatch
//! (`dyn ClanDataProvider`) for runtime selection of sources.

pub mod coc_rest;
pub mod errors;

use async_trait::async_trait;

pub use errors::{ProviderError, ProviderInitError};

use crate::models::{raid::RaidLog, roster::MemberList, war::WarLog};

#[async_trait]
pub trait ClanDataProvider {
    /// Fetches the current member list.
    async fn fetch_roster(&self) -> Result<MemberList, ProviderError>;

    /// Fetches the current war, or `None` when the clan is not in war.
    async fn fetch_current_war(&self) -> Result<Option<WarLog>, ProviderError>;

    /// Fetches the most recent capital raid season, or `None` when the
    /// upstream has no seasons to report.
    async fn fetch_latest_raid(&self) -> Result<Option<RaidLog>, ProviderError>;
}
