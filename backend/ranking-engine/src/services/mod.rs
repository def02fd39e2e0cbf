/// Business logic layer for the ranking engine
///
/// This module provides the engine's operations:
/// - Vote ledger: idempotent vote application and karma bookkeeping
/// - Ranking: pluggable rank-key strategies (hot, new, top, rising)
/// - Feed: candidate ranking and stable pagination
/// - Comment tree: reply forest assembly
pub mod comment_tree;
pub mod feed;
pub mod ranking;
pub mod vote_ledger;

// Re-export commonly used services
pub use comment_tree::{build_comment_tree, count_nodes};
pub use feed::{assemble_page, FeedAssembler};
pub use ranking::{RankedItem, SortOrder};
pub use vote_ledger::VoteLedger;
