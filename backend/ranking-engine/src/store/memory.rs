//! In-process vote store
//!
//! Keeps every target behind its own async mutex so that vote mutations on
//! one target serialize while votes on different targets proceed in
//! parallel. Used by the test suite and by single-node deployments that do
//! not need durable storage.

use crate::error::{EngineError, Result};
use crate::models::{CandidateFilter, TargetKind, VoteOutcome, Votable};
use crate::store::VoteStore;
use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

#[derive(Debug)]
struct TargetRecord {
    votable: Votable,
    /// Live votes by voter; absence means "no vote", never a stored zero
    votes: HashMap<Uuid, i16>,
}

/// In-memory implementation of [`VoteStore`].
#[derive(Default)]
pub struct MemoryStore {
    targets: DashMap<(TargetKind, Uuid), Arc<Mutex<TargetRecord>>>,
    karma: DashMap<Uuid, i64>,
    boards: DashMap<Uuid, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Associate a votable with a board slug so that board-filtered
    /// candidate listings work against this store.
    pub fn set_board(&self, target_id: Uuid, slug: &str) {
        self.boards.insert(target_id, slug.to_string());
    }

    fn record(&self, kind: TargetKind, id: Uuid) -> Result<Arc<Mutex<TargetRecord>>> {
        self.targets
            .get(&(kind, id))
            .map(|entry| entry.value().clone())
            .ok_or_else(|| EngineError::NotFound(format!("{} {}", kind, id)))
    }
}

#[async_trait]
impl VoteStore for MemoryStore {
    async fn get_votable(&self, kind: TargetKind, id: Uuid) -> Result<Votable> {
        let record = self.record(kind, id)?;
        let guard = record.lock().await;
        Ok(guard.votable.clone())
    }

    async fn get_vote(&self, voter_id: Uuid, kind: TargetKind, id: Uuid) -> Result<i16> {
        let record = self.record(kind, id)?;
        let guard = record.lock().await;
        Ok(guard.votes.get(&voter_id).copied().unwrap_or(0))
    }

    async fn atomic_vote_update(
        &self,
        voter_id: Uuid,
        kind: TargetKind,
        id: Uuid,
        new_value: i16,
    ) -> Result<VoteOutcome> {
        let record = self.record(kind, id)?;
        // The per-target mutex is what serializes concurrent voters; all
        // reads and writes below happen under it.
        let mut guard = record.lock().await;

        let previous = guard.votes.get(&voter_id).copied().unwrap_or(0);
        let delta = i64::from(new_value) - i64::from(previous);

        if delta != 0 {
            if new_value == 0 {
                guard.votes.remove(&voter_id);
            } else {
                guard.votes.insert(voter_id, new_value);
            }
            guard.votable.score += delta;
        }

        Ok(VoteOutcome {
            score: guard.votable.score,
            previous_value: previous,
        })
    }

    async fn increment_karma(&self, user_id: Uuid, delta: i64) -> Result<()> {
        *self.karma.entry(user_id).or_insert(0) += delta;
        Ok(())
    }

    async fn insert_votable(&self, votable: &Votable) -> Result<()> {
        let key = (votable.kind, votable.id);
        if self.targets.contains_key(&key) {
            return Err(EngineError::InvalidInput(format!(
                "{} {} already exists",
                votable.kind, votable.id
            )));
        }
        self.targets.insert(
            key,
            Arc::new(Mutex::new(TargetRecord {
                votable: votable.clone(),
                votes: HashMap::new(),
            })),
        );
        Ok(())
    }

    async fn list_candidates(&self, filter: &CandidateFilter) -> Result<Vec<Votable>> {
        let kind = filter.kind.unwrap_or(TargetKind::Post);

        // Snapshot the matching records first; map guards must not be held
        // across the lock await below.
        let records: Vec<Arc<Mutex<TargetRecord>>> = self
            .targets
            .iter()
            .filter(|entry| {
                let (entry_kind, id) = *entry.key();
                if entry_kind != kind {
                    return false;
                }
                match &filter.board {
                    Some(board) => self
                        .boards
                        .get(&id)
                        .map(|slug| slug.value() == board)
                        .unwrap_or(false),
                    None => true,
                }
            })
            .map(|entry| entry.value().clone())
            .collect();

        let mut candidates = Vec::with_capacity(records.len());
        for record in records {
            let guard = record.lock().await;
            if let Some(author_id) = filter.author_id {
                if guard.votable.author_id != author_id {
                    continue;
                }
            }
            candidates.push(guard.votable.clone());
        }

        Ok(candidates)
    }

    async fn get_karma(&self, user_id: Uuid) -> Result<i64> {
        Ok(self.karma.get(&user_id).map(|k| *k.value()).unwrap_or(0))
    }
}
