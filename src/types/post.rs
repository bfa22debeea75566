//! Post types returned by the enrichment endpoint.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::sentiment::SentimentValue;

/// A post timestamp as the upstream platform reported it.
///
/// Reddit sends unix seconds (`created_utc`), Hacker News and NewsAPI send
/// ISO-8601 strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    Unix(f64),
    Text(String),
}

impl Timestamp {
    /// Convert to a UTC instant; `None` when the value cannot be interpreted.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Timestamp::Unix(secs) => {
                if !secs.is_finite() {
                    return None;
                }
                let whole = secs.floor();
                let nanos = ((secs - whole) * 1e9).round() as u32;
                DateTime::from_timestamp(whole as i64, nanos.min(999_999_999))
            }
            Timestamp::Text(s) => {
                let s = s.trim();
                DateTime::parse_from_rfc3339(s)
                    .map(|dt| dt.with_timezone(&Utc))
                    .ok()
                    .or_else(|| {
                        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
                            .ok()
                            .map(|naive| naive.and_utc())
                    })
            }
        }
    }
}

/// Engagement data attached to a post by its source platform.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostMetadata {
    /// Upvotes (Reddit `score`, Hacker News `points`).
    #[serde(
        default,
        deserialize_with = "lenient_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub votes: Option<i64>,
    #[serde(
        default,
        deserialize_with = "lenient_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub comments: Option<i64>,
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created: Option<Timestamp>,
}

impl PostMetadata {
    fn is_empty(&self) -> bool {
        self.votes.is_none() && self.comments.is_none() && self.created.is_none()
    }
}

/// A single post from one source, carrying its sentiment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "WirePost")]
pub struct Post {
    pub title: String,
    pub url: String,
    pub sentiment: SentimentValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_metadata: Option<PostMetadata>,
}

impl Post {
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        sentiment: impl Into<SentimentValue>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            sentiment: sentiment.into(),
            source_metadata: None,
        }
    }

    /// Set the sentiment, keeping everything else.
    pub fn with_sentiment(mut self, sentiment: impl Into<SentimentValue>) -> Self {
        self.sentiment = sentiment.into();
        self
    }

    pub fn with_metadata(mut self, metadata: PostMetadata) -> Self {
        self.source_metadata = Some(metadata);
        self
    }

    /// When the post was created, if the source reported a usable timestamp.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.source_metadata
            .as_ref()
            .and_then(|m| m.created.as_ref())
            .and_then(Timestamp::to_datetime)
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Engagement counts: integers, floats (rounded) or numeric strings.
/// Anything else reads as absent rather than failing the post.
fn lenient_count<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let count = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().and_then(round_count)),
        Some(Value::String(s)) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(round_count))
        }
        _ => None,
    };
    Ok(count)
}

fn round_count(n: f64) -> Option<i64> {
    n.is_finite().then(|| n.round() as i64)
}

fn lenient_timestamp<'de, D>(deserializer: D) -> std::result::Result<Option<Timestamp>, D::Error>
where
    D: Deserializer<'de>,
{
    let timestamp = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_f64().map(Timestamp::Unix),
        Some(Value::String(s)) => Some(Timestamp::Text(s)),
        _ => None,
    };
    Ok(timestamp)
}

/// A nested `source_metadata` that is not an object is ignored.
fn lenient_metadata<'de, D>(deserializer: D) -> std::result::Result<Option<PostMetadata>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(value @ Value::Object(_)) => serde_json::from_value(value).ok(),
        _ => None,
    })
}

/// Wire shape: the backend emits metadata as flat, per-platform fields.
#[derive(Deserialize)]
struct WirePost {
    #[serde(default, deserialize_with = "null_as_empty")]
    title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    url: String,
    #[serde(default)]
    sentiment: SentimentValue,
    #[serde(default, deserialize_with = "lenient_metadata")]
    source_metadata: Option<PostMetadata>,
    #[serde(default, deserialize_with = "lenient_count")]
    score: Option<i64>,
    #[serde(default, deserialize_with = "lenient_count")]
    points: Option<i64>,
    #[serde(default, deserialize_with = "lenient_count")]
    votes: Option<i64>,
    #[serde(default, deserialize_with = "lenient_count")]
    num_comments: Option<i64>,
    #[serde(default, deserialize_with = "lenient_count")]
    comments: Option<i64>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    created: Option<Timestamp>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    created_utc: Option<Timestamp>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    created_at: Option<Timestamp>,
    #[serde(
        default,
        rename = "publishedAt",
        deserialize_with = "lenient_timestamp"
    )]
    published_at: Option<Timestamp>,
}

impl From<WirePost> for Post {
    fn from(wire: WirePost) -> Self {
        let source_metadata = wire.source_metadata.or_else(|| {
            let flat = PostMetadata {
                votes: wire.votes.or(wire.score).or(wire.points),
                comments: wire.comments.or(wire.num_comments),
                created: wire
                    .created
                    .or(wire.created_utc)
                    .or(wire.created_at)
                    .or(wire.published_at),
            };
            (!flat.is_empty()).then_some(flat)
        });
        Post {
            title: wire.title,
            url: wire.url,
            sentiment: wire.sentiment,
            source_metadata,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{SentimentLabel, SentimentScore};
    use serde_json::json;

    #[test]
    fn reddit_post_folds_flat_metadata() {
        let post: Post = serde_json::from_value(json!({
            "title": "Rust 2024 is out",
            "url": "https://reddit.com/r/rust/1",
            "score": 412,
            "created": 1_700_000_000.5,
            "sentiment": {"label": "Positive", "score": 0.91}
        }))
        .unwrap();

        let meta = post.source_metadata.clone().unwrap();
        assert_eq!(meta.votes, Some(412));
        assert_eq!(meta.created, Some(Timestamp::Unix(1_700_000_000.5)));
        assert_eq!(
            post.sentiment,
            SentimentValue::Scored(SentimentScore::new(SentimentLabel::Positive, 0.91))
        );
        assert_eq!(post.created_at().unwrap().timestamp(), 1_700_000_000);
    }

    #[test]
    fn hacker_news_post_with_null_title() {
        let post: Post = serde_json::from_value(json!({
            "title": null,
            "url": null,
            "points": 12,
            "created": "2024-03-01T10:00:00Z"
        }))
        .unwrap();

        assert_eq!(post.title, "");
        assert_eq!(post.url, "");
        assert_eq!(post.sentiment, SentimentValue::Missing);
        let meta = post.source_metadata.unwrap();
        assert_eq!(meta.votes, Some(12));
        assert_eq!(
            meta.created.unwrap().to_datetime().unwrap().to_rfc3339(),
            "2024-03-01T10:00:00+00:00"
        );
    }

    #[test]
    fn news_article_uses_published_at() {
        let post: Post = serde_json::from_value(json!({
            "title": "Markets rally",
            "url": "https://news.example/a",
            "publishedAt": "2024-05-02T08:30:00"
        }))
        .unwrap();

        assert!(post.created_at().is_some());
    }

    #[test]
    fn post_without_metadata_has_none() {
        let post: Post = serde_json::from_value(json!({"title": "t", "url": "u"})).unwrap();
        assert!(post.source_metadata.is_none());
        assert!(post.created_at().is_none());
    }

    #[test]
    fn explicit_source_metadata_wins() {
        let post: Post = serde_json::from_value(json!({
            "title": "t",
            "url": "u",
            "score": 1,
            "source_metadata": {"votes": 7, "comments": 3}
        }))
        .unwrap();

        let meta = post.source_metadata.unwrap();
        assert_eq!(meta.votes, Some(7));
        assert_eq!(meta.comments, Some(3));
    }

    #[test]
    fn loosely_typed_engagement_fields_are_accepted() {
        let reddit: Post = serde_json::from_value(json!({
            "title": "a",
            "url": "u",
            "sentiment": 0.5,
            "score": 12.5,
            "num_comments": " 7 ",
            "created_utc": {"seconds": 1}
        }))
        .unwrap();
        let meta = reddit.source_metadata.unwrap();
        assert_eq!(meta.votes, Some(13));
        assert_eq!(meta.comments, Some(7));
        assert_eq!(meta.created, None);

        let hn: Post = serde_json::from_value(json!({
            "title": "b",
            "url": "v",
            "points": "many",
            "comments": 4.0,
            "source_metadata": "n/a"
        }))
        .unwrap();
        let meta = hn.source_metadata.unwrap();
        assert_eq!(meta.votes, None);
        assert_eq!(meta.comments, Some(4));
    }

    #[test]
    fn unparsable_timestamp_is_ignored() {
        assert!(Timestamp::Text("yesterday".into()).to_datetime().is_none());
        assert!(Timestamp::Unix(f64::NAN).to_datetime().is_none());
    }
}
