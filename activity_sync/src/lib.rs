//! Append-only per-member activity histories for recurring clan events.
//!
//! Each pass takes the most recent raw period snapshot (a clan war or a
//! capital raid weekend), the current roster, and the previously
//! accumulated history store, and produces an updated, gap-free store:
//! idempotent upsert of the latest period, roster synchronization, and
//! policy placeholders for every period a member has no data for.

#![deny(missing_docs)]

pub mod config;
pub mod error;
pub mod manifest;
pub mod period;
pub mod providers;
pub mod reconcile;
pub mod store;
