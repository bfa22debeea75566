//! The comparison data pipeline: normalize, aggregate, compare.

pub mod aggregate;
pub mod compare;
pub mod normalize;

pub use aggregate::{aggregate, aggregate_one, average_sentiment};
pub use compare::{
    ComparisonOutcome, MAX_COMPARE_QUERIES, QueryFailure, QuerySet, run_comparison,
    validate_queries,
};
pub use normalize::{TONE_THRESHOLD, TREND_THRESHOLD, format_score, normalize, round2, tone};
