//! PostgreSQL vote store
//!
//! Posts and comments live in separate tables that share the voting
//! contract columns (`id`, `author_id`, `score`, `created_at`). The vote
//! mutation runs inside one transaction that locks the target row, so two
//! concurrent voters on the same target serialize at the database instead
//! of overwriting each other's score delta.

use crate::error::{EngineError, Result};
use crate::models::{CandidateFilter, TargetKind, VoteOutcome, Votable};
use crate::store::VoteStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use tracing::debug;
use uuid::Uuid;

/// PostgreSQL-backed implementation of [`VoteStore`].
pub struct PgVoteStore {
    pool: PgPool,
}

impl PgVoteStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Table and vote-column names for a target kind.
fn tables(kind: TargetKind) -> (&'static str, &'static str) {
    match kind {
        TargetKind::Post => ("posts", "post_id"),
        TargetKind::Comment => ("comments", "comment_id"),
    }
}

#[async_trait]
impl VoteStore for PgVoteStore {
    async fn get_votable(&self, kind: TargetKind, id: Uuid) -> Result<Votable> {
        let (table, _) = tables(kind);
        let row = sqlx::query(&format!(
            "SELECT id, author_id, score, created_at FROM {} WHERE id = $1",
            table
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| EngineError::NotFound(format!("{} {}", kind, id)))?;

        Ok(Votable {
            id: row.get("id"),
            kind,
            author_id: row.get("author_id"),
            score: row.get("score"),
            created_at: row.get::<DateTime<Utc>, _>("created_at"),
        })
    }

    async fn get_vote(&self, voter_id: Uuid, kind: TargetKind, id: Uuid) -> Result<i16> {
        let (_, vote_col) = tables(kind);
        let value: Option<i16> = sqlx::query_scalar(&format!(
            "SELECT value FROM votes WHERE user_id = $1 AND {} = $2",
            vote_col
        ))
        .bind(voter_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(value.unwrap_or(0))
    }

    async fn atomic_vote_update(
        &self,
        voter_id: Uuid,
        kind: TargetKind,
        id: Uuid,
        new_value: i16,
    ) -> Result<VoteOutcome> {
        let (table, vote_col) = tables(kind);
        let mut tx = self.pool.begin().await?;

        // Lock the target row for the rest of the transaction; concurrent
        // votes on this target queue here.
        let row = sqlx::query(&format!(
            "SELECT score FROM {} WHERE id = $1 FOR UPDATE",
            table
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| EngineError::NotFound(format!("{} {}", kind, id)))?;
        let current_score: i64 = row.get("score");

        let previous: i16 = sqlx::query_scalar(&format!(
            "SELECT value FROM votes WHERE user_id = $1 AND {} = $2",
            vote_col
        ))
        .bind(voter_id)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .unwrap_or(0);

        let delta = i64::from(new_value) - i64::from(previous);
        if delta == 0 {
            tx.commit().await?;
            return Ok(VoteOutcome {
                score: current_score,
                previous_value: previous,
            });
        }

        if new_value == 0 {
            sqlx::query(&format!(
                "DELETE FROM votes WHERE user_id = $1 AND {} = $2",
                vote_col
            ))
            .bind(voter_id)
            .bind(id)
            .execute(&mut *tx)
            .await?;
        } else {
            sqlx::query(&format!(
                r#"
                INSERT INTO votes (user_id, {col}, value)
                VALUES ($1, $2, $3)
                ON CONFLICT (user_id, {col}) DO UPDATE SET value = EXCLUDED.value
                "#,
                col = vote_col
            ))
            .bind(voter_id)
            .bind(id)
            .bind(new_value)
            .execute(&mut *tx)
            .await?;
        }

        let score: i64 = sqlx::query_scalar(&format!(
            "UPDATE {} SET score = score + $1 WHERE id = $2 RETURNING score",
            table
        ))
        .bind(delta)
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        debug!(
            voter = %voter_id,
            target = %id,
            kind = %kind,
            delta,
            score,
            "vote mutation committed"
        );

        Ok(VoteOutcome {
            score,
            previous_value: previous,
        })
    }

    async fn increment_karma(&self, user_id: Uuid, delta: i64) -> Result<()> {
        let result = sqlx::query("UPDATE users SET karma = karma + $1 WHERE id = $2")
            .bind(delta)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(EngineError::NotFound(format!("user {}", user_id)));
        }
        Ok(())
    }

    async fn insert_votable(&self, votable: &Votable) -> Result<()> {
        let (table, _) = tables(votable.kind);
        sqlx::query(&format!(
            r#"
            INSERT INTO {} (id, author_id, score, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
            table
        ))
        .bind(votable.id)
        .bind(votable.author_id)
        .bind(votable.score)
        .bind(votable.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_candidates(&self, filter: &CandidateFilter) -> Result<Vec<Votable>> {
        let kind = filter.kind.unwrap_or(TargetKind::Post);
        let (table, _) = tables(kind);

        // Board filtering only applies to posts; comments hang off a post.
        let rows = match (kind, &filter.board, filter.author_id) {
            (TargetKind::Post, Some(board), Some(author_id)) => {
                sqlx::query(
                    r#"
                    SELECT p.id, p.author_id, p.score, p.created_at
                    FROM posts p
                    JOIN boards b ON p.board_id = b.id
                    WHERE b.slug = $1 AND p.author_id = $2
                    "#,
                )
                .bind(board)
                .bind(author_id)
                .fetch_all(&self.pool)
                .await?
            }
            (TargetKind::Post, Some(board), None) => {
                sqlx::query(
                    r#"
                    SELECT p.id, p.author_id, p.score, p.created_at
                    FROM posts p
                    JOIN boards b ON p.board_id = b.id
                    WHERE b.slug = $1
                    "#,
                )
                .bind(board)
                .fetch_all(&self.pool)
                .await?
            }
            (_, _, Some(author_id)) => {
                sqlx::query(&format!(
                    "SELECT id, author_id, score, created_at FROM {} WHERE author_id = $1",
                    table
                ))
                .bind(author_id)
                .fetch_all(&self.pool)
                .await?
            }
            (_, _, None) => {
                sqlx::query(&format!(
                    "SELECT id, author_id, score, created_at FROM {}",
                    table
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(rows
            .into_iter()
            .map(|row| Votable {
                id: row.get("id"),
                kind,
                author_id: row.get("author_id"),
                score: row.get("score"),
                created_at: row.get::<DateTime<Utc>, _>("created_at"),
            })
            .collect())
    }

    async fn get_karma(&self, user_id: Uuid) -> Result<i64> {
        let karma: Option<i64> = sqlx::query_scalar("SELECT karma FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(karma.unwrap_or(0))
    }
}
