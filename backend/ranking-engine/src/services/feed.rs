//! Feed assembly
//!
//! Produces a stable, paginated ordering over a candidate set. Read-only:
//! assembly runs against whatever snapshot of scores the store returns, and
//! a slightly stale ordering is acceptable for a feed.

use crate::config::FeedConfig;
use crate::error::{EngineError, Result};
use crate::metrics::{FEED_CANDIDATE_COUNT, FEED_REQUEST_TOTAL};
use crate::models::{CandidateFilter, Page, Votable};
use crate::services::ranking::{RankedItem, SortOrder};
use crate::store::VoteStore;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::debug;

/// Assembles ordered feed pages from store candidates.
pub struct FeedAssembler {
    store: Arc<dyn VoteStore>,
    config: FeedConfig,
}

impl FeedAssembler {
    pub fn new(store: Arc<dyn VoteStore>, config: FeedConfig) -> Self {
        Self { store, config }
    }

    /// Fetch candidates for `filter`, rank them under `sort`, and return the
    /// requested slice.
    ///
    /// `limit` defaults to the configured page size and is capped at the
    /// configured maximum; negative bounds are rejected. An offset past the
    /// end of the candidate set yields an empty page, not an error.
    pub async fn get_page(
        &self,
        sort: SortOrder,
        filter: &CandidateFilter,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Page<Votable>> {
        let limit = limit.unwrap_or(self.config.default_limit);
        let offset = offset.unwrap_or(0);
        if limit < 0 {
            return Err(EngineError::InvalidInput(format!("negative limit {}", limit)));
        }
        if offset < 0 {
            return Err(EngineError::InvalidInput(format!(
                "negative offset {}",
                offset
            )));
        }
        let limit = limit.min(self.config.max_limit);

        let candidates = self.store.list_candidates(filter).await?;
        let total = candidates.len();

        FEED_REQUEST_TOTAL.with_label_values(&[sort.as_str()]).inc();
        FEED_CANDIDATE_COUNT
            .with_label_values(&[sort.as_str()])
            .observe(total as f64);

        let page = assemble_page(candidates, sort, Utc::now(), limit as usize, offset as usize);
        debug!(
            sort = %sort,
            total,
            returned = page.items.len(),
            has_more = page.has_more,
            "assembled feed page"
        );

        Ok(page)
    }
}

/// Rank `candidates` under `sort` at the instant `now` and slice out one
/// page. Pure; the same inputs always produce the same page.
///
/// Ordering is rank key descending, then `created_at` descending, then id
/// ascending. The id leg guarantees that two candidates with identical
/// keys and timestamps page stably across calls.
pub fn assemble_page(
    candidates: Vec<Votable>,
    sort: SortOrder,
    now: DateTime<Utc>,
    limit: usize,
    offset: usize,
) -> Page<Votable> {
    let mut ranked: Vec<RankedItem> = candidates
        .into_iter()
        .map(|votable| {
            let rank_key = sort.rank_key(votable.score, votable.created_at, now);
            RankedItem { votable, rank_key }
        })
        .collect();

    // NaN keys cannot occur with the shipped strategies (denominators are
    // >= 2), but partial_cmp still demands a total-order fallback.
    ranked.sort_by(|a, b| {
        b.rank_key
            .partial_cmp(&a.rank_key)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| b.votable.created_at.cmp(&a.votable.created_at))
            .then_with(|| a.votable.id.cmp(&b.votable.id))
    });

    let total = ranked.len();
    let start = offset.min(total);
    let end = start.saturating_add(limit).min(total);
    let has_more = end < total;

    Page {
        items: ranked[start..end]
            .iter()
            .map(|item| item.votable.clone())
            .collect(),
        has_more,
        total,
    }
}
