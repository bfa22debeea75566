//! Sentiment types.
//!
//! The backend attaches sentiment to each post in more than one shape: a bare
//! number, a `{label, score}` object from the classifier, a numeric string,
//! or nothing at all. [`SentimentValue`] captures every shape so callers never
//! inspect raw JSON; use [`crate::normalize`] to collapse it to a score.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Categorical sentiment produced by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    /// All labels in display order.
    pub const ALL: [SentimentLabel; 3] = [
        SentimentLabel::Positive,
        SentimentLabel::Neutral,
        SentimentLabel::Negative,
    ];

    /// Bucket a score: above `threshold` is positive, below `-threshold` is
    /// negative, anything in between (inclusive) is neutral.
    pub fn from_score(score: f64, threshold: f64) -> Self {
        if score > threshold {
            SentimentLabel::Positive
        } else if score < -threshold {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "Positive",
            SentimentLabel::Neutral => "Neutral",
            SentimentLabel::Negative => "Negative",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SentimentLabel {
    type Err = String;

    /// Accepts label names case-insensitively and the classifier's raw
    /// `LABEL_0..2` ids (negative, neutral, positive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "positive" | "label_2" => Ok(SentimentLabel::Positive),
            "neutral" | "label_1" => Ok(SentimentLabel::Neutral),
            "negative" | "label_0" => Ok(SentimentLabel::Negative),
            other => Err(format!("unknown sentiment label: {other}")),
        }
    }
}

/// Object-shaped sentiment, e.g. `{"label": "Positive", "score": 0.93}`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SentimentScore {
    pub label: Option<SentimentLabel>,
    pub score: Option<f64>,
    /// Legacy field some payloads use instead of `score`.
    pub value: Option<f64>,
}

impl SentimentScore {
    pub fn new(label: SentimentLabel, score: f64) -> Self {
        Self {
            label: Some(label),
            score: Some(score),
            value: None,
        }
    }
}

/// Every shape a post's sentiment can take on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum SentimentValue {
    /// Raw polarity score, roughly in `[-1, 1]`.
    Number(f64),
    Scored(SentimentScore),
    /// Anything string-shaped; coerced numerically when normalized.
    Text(String),
    /// Absent, `null`, or a shape with no numeric reading.
    #[default]
    Missing,
}

impl SentimentValue {
    /// The classifier label, when the sentiment carries one.
    pub fn label(&self) -> Option<SentimentLabel> {
        match self {
            SentimentValue::Scored(s) => s.label,
            _ => None,
        }
    }
}

impl From<f64> for SentimentValue {
    fn from(n: f64) -> Self {
        SentimentValue::Number(n)
    }
}

impl From<SentimentScore> for SentimentValue {
    fn from(s: SentimentScore) -> Self {
        SentimentValue::Scored(s)
    }
}

/// Read `score`/`value` fields, accepting numbers and numeric strings.
fn numeric_field(map: &Map<String, Value>, key: &str) -> Option<f64> {
    match map.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

impl From<Value> for SentimentValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Number(n) => n
                .as_f64()
                .map(SentimentValue::Number)
                .unwrap_or(SentimentValue::Missing),
            Value::String(s) => SentimentValue::Text(s),
            Value::Object(map) => SentimentValue::Scored(SentimentScore {
                label: map
                    .get("label")
                    .and_then(Value::as_str)
                    .and_then(|l| l.parse().ok()),
                score: numeric_field(&map, "score"),
                value: numeric_field(&map, "value"),
            }),
            Value::Bool(flag) => SentimentValue::Number(if flag { 1.0 } else { 0.0 }),
            Value::Array(items) => from_array(items),
            Value::Null => SentimentValue::Missing,
        }
    }
}

/// An array reads as its only element; an empty one reads as zero.
fn from_array(mut items: Vec<Value>) -> SentimentValue {
    if items.len() > 1 {
        return SentimentValue::Missing;
    }
    match items.pop() {
        None | Some(Value::Null) => SentimentValue::Number(0.0),
        Some(Value::Number(n)) => n
            .as_f64()
            .map(SentimentValue::Number)
            .unwrap_or(SentimentValue::Missing),
        Some(Value::String(s)) => SentimentValue::Text(s),
        Some(Value::Array(inner)) => from_array(inner),
        Some(Value::Bool(_) | Value::Object(_)) => SentimentValue::Missing,
    }
}

impl From<SentimentValue> for Value {
    fn from(sentiment: SentimentValue) -> Self {
        match sentiment {
            SentimentValue::Number(n) => serde_json::Number::from_f64(n)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            SentimentValue::Scored(s) => {
                let mut map = Map::new();
                if let Some(label) = s.label {
                    map.insert("label".into(), Value::String(label.as_str().into()));
                }
                for (key, field) in [("score", s.score), ("value", s.value)] {
                    if let Some(n) = field.and_then(serde_json::Number::from_f64) {
                        map.insert(key.into(), Value::Number(n));
                    }
                }
                Value::Object(map)
            }
            SentimentValue::Text(s) => Value::String(s),
            SentimentValue::Missing => Value::Null,
        }
    }
}
