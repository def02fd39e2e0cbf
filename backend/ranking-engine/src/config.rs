//! Configuration management for the ranking engine
//!
//! Loads engine tunables from environment variables with sensible defaults.

use serde::{Deserialize, Serialize};

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Vote ledger settings
    pub vote: VoteConfig,
    /// Feed assembly settings
    pub feed: FeedConfig,
}

/// Vote ledger settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteConfig {
    /// How many times a conflicting vote mutation is retried before the
    /// failure is surfaced to the caller
    pub max_retries: u32,
}

/// Feed assembly settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Page size used when the caller does not specify one
    pub default_limit: i64,
    /// Upper bound on the page size a caller may request
    pub max_limit: i64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            vote: VoteConfig { max_retries: 3 },
            feed: FeedConfig {
                default_limit: 20,
                max_limit: 100,
            },
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = EngineConfig::default();

        EngineConfig {
            vote: VoteConfig {
                max_retries: std::env::var("VOTE_MAX_RETRIES")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.vote.max_retries),
            },
            feed: FeedConfig {
                default_limit: std::env::var("FEED_DEFAULT_LIMIT")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.feed.default_limit),
                max_limit: std::env::var("FEED_MAX_LIMIT")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.feed.max_limit),
            },
        }
    }
}
