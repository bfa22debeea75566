//! Chart-ready comparison types.

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use super::result::Source;

/// Per-query sentiment and volume figures across the three sources.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlatformAggregate {
    pub query: String,
    pub reddit_avg: f64,
    pub hackernews_avg: f64,
    pub news_avg: f64,
    pub reddit_count: usize,
    pub hackernews_count: usize,
    pub news_count: usize,
    pub total_count: usize,
}

impl PlatformAggregate {
    pub fn average(&self, source: Source) -> f64 {
        match source {
            Source::Reddit => self.reddit_avg,
            Source::HackerNews => self.hackernews_avg,
            Source::News => self.news_avg,
        }
    }

    pub fn count(&self, source: Source) -> usize {
        match source {
            Source::Reddit => self.reddit_count,
            Source::HackerNews => self.hackernews_count,
            Source::News => self.news_count,
        }
    }
}

/// One row of the sentiment chart: a source with one value per query.
///
/// Serializes as `{"source": "Reddit", "<query>": <avg>, ...}` with queries
/// in caller order.
#[derive(Debug, Clone, PartialEq)]
pub struct SentimentSeriesEntry {
    pub source: Source,
    pub values: Vec<(String, f64)>,
}

impl SentimentSeriesEntry {
    pub fn new(source: Source) -> Self {
        Self {
            source,
            values: Vec::new(),
        }
    }

    /// Value for `query`. With duplicate labels the last one wins.
    pub fn get(&self, query: &str) -> Option<f64> {
        self.values
            .iter()
            .rev()
            .find(|(q, _)| q == query)
            .map(|(_, v)| *v)
    }
}

impl Serialize for SentimentSeriesEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len() + 1))?;
        map.serialize_entry("source", self.source.display_name())?;
        for (query, value) in &self.values {
            map.serialize_entry(query, value)?;
        }
        map.end()
    }
}

/// One row of the volume chart: a query with one post count per source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VolumeSeriesEntry {
    pub query: String,
    #[serde(rename = "Reddit")]
    pub reddit: usize,
    #[serde(rename = "Hacker News")]
    pub hackernews: usize,
    #[serde(rename = "News")]
    pub news: usize,
}

impl VolumeSeriesEntry {
    pub fn count(&self, source: Source) -> usize {
        match source {
            Source::Reddit => self.reddit,
            Source::HackerNews => self.hackernews,
            Source::News => self.news,
        }
    }
}

/// Everything the comparison view renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonDataset {
    /// Always three rows: Reddit, Hacker News, News.
    pub sentiment_series: Vec<SentimentSeriesEntry>,
    pub volume_series: Vec<VolumeSeriesEntry>,
    pub raw: Vec<PlatformAggregate>,
}

impl ComparisonDataset {
    pub fn sentiment_for(&self, source: Source) -> Option<&SentimentSeriesEntry> {
        self.sentiment_series.iter().find(|e| e.source == source)
    }

    /// Labels in the order they were aggregated.
    pub fn queries(&self) -> impl Iterator<Item = &str> {
        self.raw.iter().map(|a| a.query.as_str())
    }
}
