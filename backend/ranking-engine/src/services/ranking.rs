//! Ranking strategies
//!
//! Maps a votable's `(score, created_at)` and an explicit `now` to a
//! numeric rank key; higher key means higher rank. Pure functions, so every
//! strategy has deterministic test vectors: `now` is always a parameter,
//! never a hidden clock read.

use crate::models::Votable;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const SECONDS_PER_HOUR: f64 = 3600.0;

/// A votable paired with its computed rank key. Ephemeral projection used
/// during feed assembly; never persisted.
#[derive(Debug, Clone)]
pub struct RankedItem {
    pub votable: Votable,
    pub rank_key: f64,
}

/// Feed ordering strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Score discounted by the author's self-vote, decayed by age
    Hot,
    /// Most recent first
    New,
    /// Highest score first
    Top,
    /// Raw score decayed by age; surfaces fast-growing new content
    Rising,
}

impl Default for SortOrder {
    fn default() -> Self {
        SortOrder::Hot
    }
}

impl SortOrder {
    /// Resolve a sort query parameter. Absent or unrecognized values fall
    /// back to `hot`, matching the listing endpoint's behavior.
    pub fn from_query(value: Option<&str>) -> SortOrder {
        match value {
            Some("new") => SortOrder::New,
            Some("top") => SortOrder::Top,
            Some("rising") => SortOrder::Rising,
            _ => SortOrder::Hot,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Hot => "hot",
            SortOrder::New => "new",
            SortOrder::Top => "top",
            SortOrder::Rising => "rising",
        }
    }

    /// Compute the rank key for a votable under this strategy.
    ///
    /// Negative scores produce negative keys under `hot`/`top`/`rising` and
    /// sink to the bottom, which is intended.
    pub fn rank_key(&self, score: i64, created_at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
        match self {
            SortOrder::New => created_at.timestamp() as f64,
            SortOrder::Top => score as f64,
            SortOrder::Hot => (score as f64 - 1.0) / (age_hours(created_at, now) + 2.0),
            SortOrder::Rising => score as f64 / (age_hours(created_at, now) + 2.0),
        }
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Age in hours, clamped to zero so clock skew never produces a negative
/// age (which would flip the decay denominator).
fn age_hours(created_at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let age_seconds = (now - created_at).num_seconds().max(0);
    age_seconds as f64 / SECONDS_PER_HOUR
}
