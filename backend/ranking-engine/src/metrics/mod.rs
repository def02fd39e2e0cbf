use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter, register_int_counter_vec, HistogramVec,
    IntCounter, IntCounterVec,
};

lazy_static! {
    /// Vote operations by target kind and result (applied, noop).
    pub static ref VOTE_APPLIED_TOTAL: IntCounterVec = register_int_counter_vec!(
        "vote_applied_total",
        "Vote operations segmented by target kind and result",
        &["kind", "result"]
    )
    .expect("failed to register vote_applied_total");

    /// Vote mutations retried after a detected conflict.
    pub static ref VOTE_RETRY_TOTAL: IntCounterVec = register_int_counter_vec!(
        "vote_retry_total",
        "Vote mutation retries segmented by target kind",
        &["kind"]
    )
    .expect("failed to register vote_retry_total");

    /// Karma updates skipped because the author could not be credited.
    pub static ref KARMA_SKIPPED_TOTAL: IntCounter = register_int_counter!(
        "karma_skipped_total",
        "Karma updates dropped after a best-effort failure"
    )
    .expect("failed to register karma_skipped_total");

    /// Total feed page requests by sort order.
    pub static ref FEED_REQUEST_TOTAL: IntCounterVec = register_int_counter_vec!(
        "feed_request_total",
        "Feed page requests segmented by sort order",
        &["sort"]
    )
    .expect("failed to register feed_request_total");

    /// Candidate-set size per feed request by sort order.
    pub static ref FEED_CANDIDATE_COUNT: HistogramVec = register_histogram_vec!(
        "feed_candidate_count",
        "Number of feed candidates ranked segmented by sort order",
        &["sort"]
    )
    .expect("failed to register feed_candidate_count");
}
