//! Sentiment normalization.
//!
//! Every place that reads a post's sentiment goes through [`normalize`] so
//! the same stored value is never interpreted two ways.

use crate::types::{SentimentLabel, SentimentValue};

/// Threshold used when tagging individual posts for display.
pub const TONE_THRESHOLD: f64 = 0.3;

/// Threshold used when labelling a whole source's average sentiment.
pub const TREND_THRESHOLD: f64 = 0.1;

/// Collapse any sentiment shape to one finite score.
///
/// - numbers are used as-is
/// - objects use `score`, then `value`; a field counts only when it is
///   present, finite and non-zero
/// - strings are coerced numerically (an empty string is `0.0`)
/// - anything else is `0.0`
pub fn normalize(sentiment: &SentimentValue) -> f64 {
    match sentiment {
        SentimentValue::Number(n) => finite_or_zero(*n),
        SentimentValue::Scored(s) => s
            .score
            .filter(|v| is_usable(*v))
            .or_else(|| s.value.filter(|v| is_usable(*v)))
            .unwrap_or(0.0),
        SentimentValue::Text(text) => coerce(text),
        SentimentValue::Missing => 0.0,
    }
}

/// Display tone of a single post.
pub fn tone(sentiment: &SentimentValue) -> SentimentLabel {
    SentimentLabel::from_score(normalize(sentiment), TONE_THRESHOLD)
}

/// Render a score with an explicit sign for positives: `+0.50`, `-0.25`, `0.00`.
pub fn format_score(score: f64) -> String {
    let score = finite_or_zero(score);
    if score > 0.0 {
        format!("+{score:.2}")
    } else {
        // avoid printing "-0.00" for tiny negatives
        let rounded = (score * 100.0).round() / 100.0;
        format!("{:.2}", if rounded == 0.0 { 0.0 } else { score })
    }
}

/// Round half away from zero to two decimals.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn is_usable(v: f64) -> bool {
    v.is_finite() && v != 0.0
}

fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() { v } else { 0.0 }
}

fn coerce(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    trimmed.parse::<f64>().map(finite_or_zero).unwrap_or(0.0)
}
