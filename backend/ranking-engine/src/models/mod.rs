//! Data models for the ranking engine
//!
//! This module defines structures for:
//! - Votable: anything that accumulates a score via votes (posts, comments)
//! - Vote bookkeeping results returned to callers
//! - Flat and nested comment representations
//! - Paginated feed output

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of entity a vote targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    Post,
    Comment,
}

impl TargetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetKind::Post => "post",
            TargetKind::Comment => "comment",
        }
    }
}

impl std::fmt::Display for TargetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An entity that accumulates a score via up/down votes.
///
/// `score` is a denormalized cache of the vote ledger for this target; it is
/// only ever mutated through the ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Votable {
    pub id: Uuid,
    pub kind: TargetKind,
    pub author_id: Uuid,
    pub score: i64,
    pub created_at: DateTime<Utc>,
}

/// Result of one atomic vote mutation inside the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteOutcome {
    /// Target score after the mutation
    pub score: i64,
    /// The voter's vote value before the mutation (0 when absent)
    pub previous_value: i16,
}

/// What the caller gets back from a vote operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VoteReceipt {
    /// Target score after the operation
    pub score: i64,
    /// The caller's resulting vote value
    pub user_vote: i16,
}

/// Filter pushed down to the store's candidate query.
///
/// The engine never interprets these fields; the store's query layer does.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CandidateFilter {
    /// Which kind of votable to list; posts when unset
    pub kind: Option<TargetKind>,
    /// Restrict to a board by slug
    pub board: Option<String>,
    /// Restrict to a single author
    pub author_id: Option<Uuid>,
}

/// One page of an ordered feed.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub has_more: bool,
    /// Total candidate count before slicing
    pub total: usize,
}

/// A comment as stored: flat, with an optional parent reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlatComment {
    pub id: Uuid,
    pub parent_id: Option<Uuid>,
    pub author: String,
    pub author_karma: i64,
    pub content: String,
    pub score: i64,
    pub created_at: DateTime<Utc>,
}

/// A comment with its replies attached.
#[derive(Debug, Clone, Serialize)]
pub struct CommentNode {
    pub id: Uuid,
    pub parent_id: Option<Uuid>,
    pub author: String,
    pub author_karma: i64,
    pub content: String,
    pub score: i64,
    pub created_at: DateTime<Utc>,
    pub replies: Vec<CommentNode>,
}

impl From<FlatComment> for CommentNode {
    fn from(c: FlatComment) -> Self {
        CommentNode {
            id: c.id,
            parent_id: c.parent_id,
            author: c.author,
            author_karma: c.author_karma,
            content: c.content,
            score: c.score,
            created_at: c.created_at,
            replies: Vec::new(),
        }
    }
}

/// Format an item's age as the compact relative form used in listings
/// ("5m", "3h", "2d", "4mo", "1y").
pub fn format_age(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let age = (now - created_at).num_seconds().max(0);
    if age < 3_600 {
        format!("{}m", age / 60)
    } else if age < 86_400 {
        format!("{}h", age / 3_600)
    } else if age < 2_592_000 {
        format!("{}d", age / 86_400)
    } else if age < 31_536_000 {
        format!("{}mo", age / 2_592_000)
    } else {
        format!("{}y", age / 31_536_000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_format_age_buckets() {
        let now = Utc::now();
        assert_eq!(format_age(now - Duration::seconds(30), now), "0m");
        assert_eq!(format_age(now - Duration::minutes(5), now), "5m");
        assert_eq!(format_age(now - Duration::hours(3), now), "3h");
        assert_eq!(format_age(now - Duration::days(2), now), "2d");
        assert_eq!(format_age(now - Duration::days(120), now), "4mo");
        assert_eq!(format_age(now - Duration::days(400), now), "1y");
    }

    #[test]
    fn test_format_age_clamps_future_timestamps() {
        let now = Utc::now();
        assert_eq!(format_age(now + Duration::minutes(10), now), "0m");
    }

    #[test]
    fn test_target_kind_round_trip() {
        let json = serde_json::to_string(&TargetKind::Comment).unwrap();
        assert_eq!(json, "\"comment\"");
        let back: TargetKind = serde_json::from_str(&json).unwrap();
        assert_eq!(back, TargetKind::Comment);
    }
}
