//! Persistence collaborator interface
//!
//! The engine never talks to a database directly; it goes through the
//! `VoteStore` trait. Two implementations are provided: an in-process
//! `MemoryStore` for tests and single-node deployments, and `PgVoteStore`
//! backed by PostgreSQL.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgVoteStore;

use crate::error::Result;
use crate::models::{CandidateFilter, TargetKind, VoteOutcome, Votable};
use async_trait::async_trait;
use uuid::Uuid;

/// Storage operations the engine depends on.
///
/// `atomic_vote_update` is the load-bearing contract: the read of the
/// existing vote, the vote row upsert/delete, and the score adjustment must
/// happen as one unit serialized per target. Implementations signal a
/// detected race with `EngineError::Conflict`, which the ledger retries.
#[async_trait]
pub trait VoteStore: Send + Sync {
    /// Fetch a votable target, or `NotFound`.
    async fn get_votable(&self, kind: TargetKind, id: Uuid) -> Result<Votable>;

    /// The voter's live vote on a target; 0 when no vote exists.
    async fn get_vote(&self, voter_id: Uuid, kind: TargetKind, id: Uuid) -> Result<i16>;

    /// Atomically move the voter's vote on a target to `new_value` and fold
    /// the difference into the target's score.
    ///
    /// A `new_value` of 0 deletes the vote row. Returns the post-mutation
    /// score together with the value the voter held before the call.
    async fn atomic_vote_update(
        &self,
        voter_id: Uuid,
        kind: TargetKind,
        id: Uuid,
        new_value: i16,
    ) -> Result<VoteOutcome>;

    /// Add `delta` to a user's karma counter.
    ///
    /// Best-effort from the ledger's point of view: a failure here must not
    /// undo an already-committed score mutation.
    async fn increment_karma(&self, user_id: Uuid, delta: i64) -> Result<()>;

    /// Insert a freshly created votable with a zero score.
    async fn insert_votable(&self, votable: &Votable) -> Result<()>;

    /// Candidate set for feed assembly. Filtering is pushed down to the
    /// store's query layer; the engine does not re-filter.
    async fn list_candidates(&self, filter: &CandidateFilter) -> Result<Vec<Votable>>;

    /// A user's current karma counter (0 for unknown users).
    async fn get_karma(&self, user_id: Uuid) -> Result<i64>;
}
