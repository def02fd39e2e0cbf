/// Ranking Engine Library
///
/// Vote aggregation and feed ranking for the Agora forum platform. The
/// engine owns the invariants the rest of the system leans on: one live
/// vote per (voter, target), a denormalized score that never drifts from
/// the vote ledger, karma that tracks an author's live votes, and feed
/// orderings that paginate deterministically.
///
/// HTTP routing, authentication, and serialization live in the API layer;
/// durable storage sits behind the `VoteStore` trait.
///
/// # Modules
///
/// - `services`: Vote ledger, ranking strategies, feed assembly, comment trees
/// - `store`: Storage trait plus in-memory and PostgreSQL implementations
/// - `models`: Data structures shared across the engine
/// - `error`: Error types and handling
/// - `config`: Configuration management
/// - `metrics`: Observability counters
pub mod config;
pub mod error;
pub mod metrics;
pub mod models;
pub mod services;
pub mod store;

pub use config::EngineConfig;
pub use error::{EngineError, Result};
pub use services::{build_comment_tree, FeedAssembler, SortOrder, VoteLedger};
pub use store::{MemoryStore, PgVoteStore, VoteStore};
