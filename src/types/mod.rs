//! Public types for the TrendPulse pipeline.

mod comparison;
mod post;
mod result;
mod sentiment;

pub use comparison::{
    ComparisonDataset, PlatformAggregate, SentimentSeriesEntry, VolumeSeriesEntry,
};
pub use post::{Post, PostMetadata, Timestamp};
pub use result::{QueryResult, Source};
pub use sentiment::{SentimentLabel, SentimentScore, SentimentValue};
