//! Serde models of the raw documents returned by the upstream clan API.
//!
//! These structs mirror the JSON the API actually sends, field for field,
//! so a fetched document can be written to disk and re-read without loss.
//! Every field the trackers read is `#[serde(default)]` because the API
//! omits fields freely (a war with no attacks yet has no `attacks` arrays,
//! a raid season may omit `attackLimit`, and so on). Unknown fields are
//! ignored on input and therefore dropped on re-serialization.

pub mod raid;
pub mod roster;
pub mod war;

/// Extracts the `YYYYMMDD` day key from an upstream end timestamp.
///
/// Upstream timestamps come in either compact (`20240601T070000.000Z`) or
/// dashed (`2024-06-01T07:00:00Z`) form; the date portion is everything
/// before the `T`, with dashes removed.
pub fn end_date_key(end_time: &str) -> Option<String> {
    let date = end_time.split('T').next()?.replace('-', "");
    (date.len() == 8 && date.bytes().all(|b| b.is_ascii_digit())).then_some(date)
}
