//! Failure-injecting store for ledger tests
//!
//! Wraps `MemoryStore` and lets a test inject vote-update conflicts and
//! karma failures without a real database. Call counters expose how often
//! the ledger retried.

use async_trait::async_trait;
use ranking_engine::error::{EngineError, Result};
use ranking_engine::models::{CandidateFilter, TargetKind, VoteOutcome, Votable};
use ranking_engine::store::{MemoryStore, VoteStore};
use std::sync::atomic::{AtomicU32, Ordering};
use uuid::Uuid;

pub struct FlakyStore {
    inner: MemoryStore,
    /// How many upcoming `atomic_vote_update` calls report a conflict
    conflicts_remaining: AtomicU32,
    /// When set, every karma update fails
    fail_karma: bool,
    update_calls: AtomicU32,
}

impl FlakyStore {
    pub fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            conflicts_remaining: AtomicU32::new(0),
            fail_karma: false,
            update_calls: AtomicU32::new(0),
        }
    }

    pub fn with_conflicts(inner: MemoryStore, conflicts: u32) -> Self {
        let store = Self::new(inner);
        store.conflicts_remaining.store(conflicts, Ordering::SeqCst);
        store
    }

    pub fn with_failing_karma(inner: MemoryStore) -> Self {
        let mut store = Self::new(inner);
        store.fail_karma = true;
        store
    }

    pub fn update_call_count(&self) -> u32 {
        self.update_calls.load(Ordering::SeqCst)
    }

    pub fn inner(&self) -> &MemoryStore {
        &self.inner
    }
}

#[async_trait]
impl VoteStore for FlakyStore {
    async fn get_votable(&self, kind: TargetKind, id: Uuid) -> Result<Votable> {
        self.inner.get_votable(kind, id).await
    }

    async fn get_vote(&self, voter_id: Uuid, kind: TargetKind, id: Uuid) -> Result<i16> {
        self.inner.get_vote(voter_id, kind, id).await
    }

    async fn atomic_vote_update(
        &self,
        voter_id: Uuid,
        kind: TargetKind,
        id: Uuid,
        new_value: i16,
    ) -> Result<VoteOutcome> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);

        let remaining = self.conflicts_remaining.load(Ordering::SeqCst);
        if remaining > 0 {
            self.conflicts_remaining.store(remaining - 1, Ordering::SeqCst);
            return Err(EngineError::Conflict("injected vote conflict".to_string()));
        }

        self.inner.atomic_vote_update(voter_id, kind, id, new_value).await
    }

    async fn increment_karma(&self, user_id: Uuid, delta: i64) -> Result<()> {
        if self.fail_karma {
            return Err(EngineError::NotFound(format!("user {}", user_id)));
        }
        self.inner.increment_karma(user_id, delta).await
    }

    async fn insert_votable(&self, votable: &Votable) -> Result<()> {
        self.inner.insert_votable(votable).await
    }

    async fn list_candidates(&self, filter: &CandidateFilter) -> Result<Vec<Votable>> {
        self.inner.list_candidates(filter).await
    }

    async fn get_karma(&self, user_id: Uuid) -> Result<i64> {
        self.inner.get_karma(user_id).await
    }
}
