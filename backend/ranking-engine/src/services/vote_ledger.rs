//! Vote ledger
//!
//! Single entry point for all score and karma mutation. The ledger reads
//! the voter's existing vote, folds the difference into the target's score
//! through the store's atomic primitive, and credits the author's karma as
//! a best-effort side effect. Nothing else in the system writes scores.

use crate::config::VoteConfig;
use crate::error::{EngineError, Result};
use crate::metrics::{KARMA_SKIPPED_TOTAL, VOTE_APPLIED_TOTAL, VOTE_RETRY_TOTAL};
use crate::models::{TargetKind, VoteOutcome, VoteReceipt, Votable};
use crate::store::VoteStore;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

/// Records one vote per (voter, target) pair and keeps the denormalized
/// score and karma counters consistent with the ledger.
pub struct VoteLedger {
    store: Arc<dyn VoteStore>,
    config: VoteConfig,
}

impl VoteLedger {
    pub fn new(store: Arc<dyn VoteStore>, config: VoteConfig) -> Self {
        Self { store, config }
    }

    /// Move `voter_id`'s vote on a target to `value`.
    ///
    /// `value` must be 1 (upvote), -1 (downvote), or 0 (remove). Re-voting
    /// with the current value is a no-op; changing the value adjusts score
    /// and karma by the difference. Conflicting concurrent mutations are
    /// retried up to the configured bound.
    pub async fn apply_vote(
        &self,
        voter_id: Uuid,
        kind: TargetKind,
        id: Uuid,
        value: i16,
    ) -> Result<VoteReceipt> {
        if !(-1..=1).contains(&value) {
            return Err(EngineError::InvalidInput(format!(
                "vote value must be 1 (upvote), -1 (downvote), or 0 (remove), got {}",
                value
            )));
        }

        // Resolve the target up front; this is also where the author for
        // karma bookkeeping comes from.
        let target = self.store.get_votable(kind, id).await?;

        let outcome = self.update_with_retry(voter_id, kind, id, value).await?;

        let delta = i64::from(value) - i64::from(outcome.previous_value);
        if delta == 0 {
            VOTE_APPLIED_TOTAL
                .with_label_values(&[kind.as_str(), "noop"])
                .inc();
            return Ok(VoteReceipt {
                score: outcome.score,
                user_vote: value,
            });
        }

        // Karma is best-effort: the score mutation already committed, and a
        // missing author (deleted account) must not fail the vote.
        if let Err(err) = self.store.increment_karma(target.author_id, delta).await {
            KARMA_SKIPPED_TOTAL.inc();
            warn!(
                author = %target.author_id,
                target = %id,
                delta,
                error = %err,
                "karma update skipped"
            );
        }

        VOTE_APPLIED_TOTAL
            .with_label_values(&[kind.as_str(), "applied"])
            .inc();
        debug!(
            voter = %voter_id,
            target = %id,
            kind = %kind,
            value,
            delta,
            score = outcome.score,
            "vote applied"
        );

        Ok(VoteReceipt {
            score: outcome.score,
            user_vote: value,
        })
    }

    /// Register a freshly created votable and apply the author's own +1.
    ///
    /// Posts and comments enter the system with their author's upvote
    /// already counted (score 1, author karma +1). The insert happens at
    /// score zero and the self-vote goes through `apply_vote`, so the
    /// ledger stays the only score mutation path. Any score on the passed
    /// votable is ignored.
    pub async fn register_votable(&self, votable: &Votable) -> Result<VoteReceipt> {
        let fresh = Votable {
            score: 0,
            ..votable.clone()
        };
        self.store.insert_votable(&fresh).await?;
        self.apply_vote(votable.author_id, votable.kind, votable.id, 1)
            .await
    }

    async fn update_with_retry(
        &self,
        voter_id: Uuid,
        kind: TargetKind,
        id: Uuid,
        value: i16,
    ) -> Result<VoteOutcome> {
        let mut attempt = 0;
        loop {
            match self.store.atomic_vote_update(voter_id, kind, id, value).await {
                Ok(outcome) => return Ok(outcome),
                Err(err) if err.is_retryable() => {
                    attempt += 1;
                    if attempt > self.config.max_retries {
                        warn!(
                            target = %id,
                            kind = %kind,
                            attempts = attempt,
                            "vote mutation still conflicting, giving up"
                        );
                        return Err(EngineError::StoreUnavailable(format!(
                            "vote on {} {} conflicted {} times",
                            kind, id, attempt
                        )));
                    }
                    VOTE_RETRY_TOTAL.with_label_values(&[kind.as_str()]).inc();
                    warn!(
                        target = %id,
                        kind = %kind,
                        attempt,
                        error = %err,
                        "retrying conflicting vote mutation"
                    );
                }
                Err(err) => return Err(err),
            }
        }
    }
}
