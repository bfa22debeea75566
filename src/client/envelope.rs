//! Decoding of the enrichment response envelope.
//!
//! The backend answers with `{"body": "<json string>"}`; the string holds the
//! actual payload `{"reddit": [...], "hackernews": [...], "news": [...]}`.

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::types::{Post, QueryResult, Source};
use crate::{Result, TrendPulseError};

#[derive(Deserialize)]
struct Envelope {
    #[serde(default)]
    body: Option<Value>,
}

fn parse_error(query: &str, message: impl Into<String>) -> TrendPulseError {
    TrendPulseError::Parse {
        query: query.to_string(),
        message: message.into(),
    }
}

fn schema_error(query: &str, detail: impl Into<String>) -> TrendPulseError {
    TrendPulseError::Schema {
        query: query.to_string(),
        detail: detail.into(),
    }
}

/// Decode a raw response envelope into a [`QueryResult`] for `query`.
pub fn parse_envelope(query: &str, raw: &str) -> Result<QueryResult> {
    let envelope: Envelope = serde_json::from_str(raw)
        .map_err(|e| parse_error(query, format!("response is not a JSON envelope: {e}")))?;

    let body = match envelope.body {
        Some(Value::String(body)) => body,
        None | Some(Value::Null) => return Err(parse_error(query, "envelope has no body")),
        Some(_) => return Err(parse_error(query, "envelope body is not a string")),
    };

    let payload: Value = serde_json::from_str(&body)
        .map_err(|e| parse_error(query, format!("envelope body is not valid JSON: {e}")))?;
    debug!(query, bytes = body.len(), "decoded envelope body");

    parse_payload(query, payload)
}

/// Validate a decoded payload and extract the three post lists.
pub fn parse_payload(query: &str, payload: Value) -> Result<QueryResult> {
    let Value::Object(mut map) = payload else {
        return Err(schema_error(query, "payload is not a JSON object"));
    };

    let mut result = QueryResult::empty(query);
    for source in Source::ALL {
        *result.posts_mut(source) = take_posts(query, &mut map, source)?;
    }
    Ok(result)
}

fn take_posts(query: &str, map: &mut Map<String, Value>, source: Source) -> Result<Vec<Post>> {
    let key = source.key();
    let Some(value) = map.remove(key) else {
        let mut detail = format!("missing `{key}` key");
        if let Some(Value::String(backend)) = map.get("error") {
            detail.push_str(&format!(" (backend error: {backend})"));
        }
        return Err(schema_error(query, detail));
    };

    if !value.is_array() {
        return Err(schema_error(query, format!("`{key}` is not an array")));
    }

    serde_json::from_value(value)
        .map_err(|e| schema_error(query, format!("`{key}` contains a malformed post: {e}")))
}
