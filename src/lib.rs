//! TrendPulse - social trend sentiment pipeline
//!
//! Fetches posts for a search query from an enrichment backend (Reddit,
//! Hacker News and NewsAPI posts, each with a sentiment), normalizes the
//! sentiment, and reshapes the results into chart-ready series for a
//! multi-query comparison view.
//!
//! # Comparison Example
//!
//! ```rust,no_run
//! use trendpulse::TrendClient;
//!
//! #[tokio::main]
//! async fn main() -> trendpulse::Result<()> {
//!     let client = TrendClient::builder()
//!         .base_url("http://127.0.0.1:3000")
//!         .build()?;
//!
//!     let outcome = client.compare(&["AI trends", "Blockchain"]).await?;
//!     for agg in &outcome.dataset.raw {
//!         println!("{}: reddit {:+.2} over {} posts", agg.query, agg.reddit_avg, agg.reddit_count);
//!     }
//!     for failed in outcome.failed_queries() {
//!         eprintln!("no data for {failed}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Offline Aggregation
//!
//! ```rust
//! use trendpulse::{Post, QueryResult, Source, aggregate};
//!
//! let result = QueryResult::empty("Q1")
//!     .with_posts(Source::Reddit, vec![Post::new("a", "u", 1.0), Post::new("b", "v", -1.0)])
//!     .with_posts(Source::News, vec![Post::new("c", "w", 0.5)]);
//!
//! let dataset = aggregate(&[result], &["Q1"]);
//! assert_eq!(dataset.raw[0].news_avg, 0.5);
//! assert_eq!(dataset.raw[0].total_count, 3);
//! assert_eq!(dataset.sentiment_series.len(), 3);
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod insights;
pub mod pipeline;
pub mod telemetry;
pub mod types;

// Re-export main types at crate root
pub use client::{HttpTransport, RetryConfig, TrendClient, TrendClientBuilder, TrendTransport};
pub use config::Config;
pub use error::{Result, TrendPulseError};
pub use pipeline::{
    ComparisonOutcome, MAX_COMPARE_QUERIES, QueryFailure, QuerySet, aggregate, normalize,
};

pub use types::{
    ComparisonDataset, PlatformAggregate, Post, PostMetadata, QueryResult, SentimentLabel,
    SentimentScore, SentimentSeriesEntry, SentimentValue, Source, Timestamp, VolumeSeriesEntry,
};
