//! Comparison aggregation.
//!
//! Turns N per-query results into the two series the comparison view charts:
//! sentiment by source (one row per source, one column per query) and volume
//! by query (one row per query, one column per source).

use tracing::warn;

use super::normalize::{normalize, round2};
use crate::types::{
    ComparisonDataset, PlatformAggregate, Post, QueryResult, SentimentSeriesEntry, Source,
    VolumeSeriesEntry,
};

/// Mean normalized sentiment of `posts`, rounded to two decimals.
///
/// An empty list averages to `0.0`.
pub fn average_sentiment(posts: &[Post]) -> f64 {
    if posts.is_empty() {
        return 0.0;
    }
    let sum: f64 = posts.iter().map(|p| normalize(&p.sentiment)).sum();
    round2(sum / posts.len() as f64)
}

/// Per-source averages and counts for one query.
pub fn aggregate_one(query: &str, result: &QueryResult) -> PlatformAggregate {
    let reddit_count = result.reddit.len();
    let hackernews_count = result.hackernews.len();
    let news_count = result.news.len();
    PlatformAggregate {
        query: query.to_string(),
        reddit_avg: average_sentiment(&result.reddit),
        hackernews_avg: average_sentiment(&result.hackernews),
        news_avg: average_sentiment(&result.news),
        reddit_count,
        hackernews_count,
        news_count,
        total_count: reddit_count + hackernews_count + news_count,
    }
}

/// Aggregate `results` paired by index with `queries`.
///
/// Output follows `queries`: every label appears exactly once, in order. A
/// label with no paired result is aggregated as empty; surplus results are
/// ignored. `sentiment_series` always has three rows, even for no queries.
pub fn aggregate<Q: AsRef<str>>(results: &[QueryResult], queries: &[Q]) -> ComparisonDataset {
    if results.len() != queries.len() {
        warn!(
            results = results.len(),
            queries = queries.len(),
            "result and query counts differ; aligning on queries"
        );
    }

    let empty = QueryResult::default();
    let raw: Vec<PlatformAggregate> = queries
        .iter()
        .enumerate()
        .map(|(i, query)| aggregate_one(query.as_ref(), results.get(i).unwrap_or(&empty)))
        .collect();

    let sentiment_series = Source::ALL
        .iter()
        .map(|source| SentimentSeriesEntry {
            source: *source,
            values: raw
                .iter()
                .map(|a| (a.query.clone(), a.average(*source)))
                .collect(),
        })
        .collect();

    let volume_series = raw
        .iter()
        .map(|a| VolumeSeriesEntry {
            query: a.query.clone(),
            reddit: a.reddit_count,
            hackernews: a.hackernews_count,
            news: a.news_count,
        })
        .collect();

    ComparisonDataset {
        sentiment_series,
        volume_series,
        raw,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(values: &[f64]) -> Vec<Post> {
        values.iter().map(|v| Post::new("t", "u", *v)).collect()
    }

    #[test]
    fn empty_list_averages_to_zero() {
        assert_eq!(average_sentiment(&[]), 0.0);
    }

    #[test]
    fn averages_are_rounded() {
        assert_eq!(average_sentiment(&numbers(&[0.1, 0.2, 0.2])), 0.17);
    }

    #[test]
    fn aggregate_one_counts_every_source() {
        let result = QueryResult::empty("rust")
            .with_posts(Source::Reddit, numbers(&[0.5, 0.5]))
            .with_posts(Source::News, numbers(&[-1.0]));
        let agg = aggregate_one("rust", &result);
        assert_eq!(agg.reddit_avg, 0.5);
        assert_eq!(agg.news_avg, -1.0);
        assert_eq!(agg.hackernews_avg, 0.0);
        assert_eq!(agg.total_count, 3);
    }

    #[test]
    fn missing_result_is_treated_as_empty() {
        let dataset = aggregate(&[], &["orphan"]);
        assert_eq!(dataset.raw.len(), 1);
        assert_eq!(dataset.raw[0].query, "orphan");
        assert_eq!(dataset.raw[0].total_count, 0);
    }

    #[test]
    fn surplus_results_are_ignored() {
        let results = vec![QueryResult::empty("a"), QueryResult::empty("b")];
        let dataset = aggregate(&results, &["a"]);
        assert_eq!(dataset.raw.len(), 1);
        assert_eq!(dataset.volume_series.len(), 1);
    }
}
