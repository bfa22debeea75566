//! Per-query insights: label breakdown, trend summaries, and top posts.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::pipeline::normalize::{TREND_THRESHOLD, format_score, normalize, tone};
use crate::types::{Post, QueryResult, SentimentLabel, Source};

/// How many posts of one source carry each classifier label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LabelBreakdown {
    pub source: Source,
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
    /// Posts whose sentiment has no label (bare numbers, missing values).
    pub unlabeled: usize,
}

impl LabelBreakdown {
    fn count(source: Source, posts: &[Post]) -> Self {
        let mut breakdown = Self {
            source,
            positive: 0,
            neutral: 0,
            negative: 0,
            unlabeled: 0,
        };
        for post in posts {
            match post.sentiment.label() {
                Some(SentimentLabel::Positive) => breakdown.positive += 1,
                Some(SentimentLabel::Neutral) => breakdown.neutral += 1,
                Some(SentimentLabel::Negative) => breakdown.negative += 1,
                None => breakdown.unlabeled += 1,
            }
        }
        breakdown
    }

    pub fn get(&self, label: SentimentLabel) -> usize {
        match label {
            SentimentLabel::Positive => self.positive,
            SentimentLabel::Neutral => self.neutral,
            SentimentLabel::Negative => self.negative,
        }
    }
}

/// Label counts for every source, in chart order.
pub fn label_breakdown(result: &QueryResult) -> [LabelBreakdown; 3] {
    Source::ALL.map(|source| LabelBreakdown::count(source, result.posts(source)))
}

/// Trend metrics for one source's posts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendSummary {
    /// Number of posts.
    pub frequency: usize,
    /// Newest post timestamp that could be parsed.
    pub latest: Option<DateTime<Utc>>,
    pub average_sentiment: f64,
    pub overall_sentiment: SentimentLabel,
    /// Sample standard deviation, rounded to four decimals.
    pub sentiment_std: f64,
}

impl Default for TrendSummary {
    fn default() -> Self {
        Self {
            frequency: 0,
            latest: None,
            average_sentiment: 0.0,
            overall_sentiment: SentimentLabel::Neutral,
            sentiment_std: 0.0,
        }
    }
}

/// Summarize one list of posts.
pub fn summarize_posts(posts: &[Post]) -> TrendSummary {
    if posts.is_empty() {
        return TrendSummary::default();
    }

    let scores: Vec<f64> = posts.iter().map(|p| normalize(&p.sentiment)).collect();
    let n = scores.len() as f64;
    let mean = scores.iter().sum::<f64>() / n;
    let std = if scores.len() > 1 {
        let var = scores.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / (n - 1.0);
        var.sqrt()
    } else {
        0.0
    };

    TrendSummary {
        frequency: posts.len(),
        latest: posts.iter().filter_map(Post::created_at).max(),
        average_sentiment: mean,
        overall_sentiment: SentimentLabel::from_score(mean, TREND_THRESHOLD),
        sentiment_std: (std * 10_000.0).round() / 10_000.0,
    }
}

/// Trend summaries for all three sources of a result.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrendReport {
    pub query: String,
    pub reddit: TrendSummary,
    pub hackernews: TrendSummary,
    pub news: TrendSummary,
}

impl TrendReport {
    pub fn get(&self, source: Source) -> &TrendSummary {
        match source {
            Source::Reddit => &self.reddit,
            Source::HackerNews => &self.hackernews,
            Source::News => &self.news,
        }
    }

    /// How many sources lean each way, for the overall mood chart.
    pub fn label_distribution(&self) -> [(SentimentLabel, usize); 3] {
        SentimentLabel::ALL.map(|label| {
            let n = Source::ALL
                .iter()
                .filter(|s| self.get(**s).overall_sentiment == label)
                .count();
            (label, n)
        })
    }
}

pub fn summarize(result: &QueryResult) -> TrendReport {
    TrendReport {
        query: result.query.clone(),
        reddit: summarize_posts(&result.reddit),
        hackernews: summarize_posts(&result.hackernews),
        news: summarize_posts(&result.news),
    }
}

/// A post prepared for the top-trends list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendingPost {
    pub source: Source,
    pub title: String,
    pub url: String,
    pub sentiment: f64,
    pub tone: SentimentLabel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub votes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<i64>,
}

impl TrendingPost {
    fn from_post(source: Source, post: &Post) -> Self {
        let meta = post.source_metadata.as_ref();
        Self {
            source,
            title: post.title.clone(),
            url: post.url.clone(),
            sentiment: normalize(&post.sentiment),
            tone: tone(&post.sentiment),
            votes: meta.and_then(|m| m.votes),
            comments: meta.and_then(|m| m.comments),
        }
    }

    /// Signed two-decimal rendering, e.g. `+0.42`.
    pub fn formatted_sentiment(&self) -> String {
        format_score(self.sentiment)
    }
}

/// The leading posts of each source.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TopTrends {
    pub query: String,
    pub reddit: Vec<TrendingPost>,
    pub hackernews: Vec<TrendingPost>,
    pub news: Vec<TrendingPost>,
}

impl TopTrends {
    pub fn get(&self, source: Source) -> &[TrendingPost] {
        match source {
            Source::Reddit => &self.reddit,
            Source::HackerNews => &self.hackernews,
            Source::News => &self.news,
        }
    }
}

/// First `limit` posts of each source, in backend order.
pub fn top_posts(result: &QueryResult, limit: usize) -> TopTrends {
    let pick = |source: Source| -> Vec<TrendingPost> {
        result
            .posts(source)
            .iter()
            .take(limit)
            .map(|p| TrendingPost::from_post(source, p))
            .collect()
    };
    TopTrends {
        query: result.query.clone(),
        reddit: pick(Source::Reddit),
        hackernews: pick(Source::HackerNews),
        news: pick(Source::News),
    }
}
