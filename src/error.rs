//! TrendPulse error types

/// TrendPulse error types
#[derive(Debug, thiserror::Error)]
pub enum TrendPulseError {
    // Transport errors
    #[error("transport error: {0}")]
    Transport(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    // Payload errors
    #[error("invalid response for query '{query}': {message}")]
    Parse { query: String, message: String },

    #[error("invalid payload for query '{query}': {detail}")]
    Schema { query: String, detail: String },

    /// Raised once retries are exhausted; `source` is the last failure.
    #[error("failed to fetch trends for '{query}' after {attempts} attempt(s): {source}")]
    Fetch {
        query: String,
        attempts: u32,
        #[source]
        source: Box<TrendPulseError>,
    },

    // Caller errors
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("configuration error: {0}")]
    Configuration(String),
}

impl TrendPulseError {
    /// Whether the error is worth another attempt against the endpoint.
    ///
    /// Transport failures and every non-2xx status are retried. Payload
    /// problems are deterministic and are returned immediately.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Api { .. })
    }

    /// The query this error is annotated with, if any.
    pub fn query(&self) -> Option<&str> {
        match self {
            Self::Parse { query, .. } | Self::Schema { query, .. } | Self::Fetch { query, .. } => {
                Some(query)
            }
            _ => None,
        }
    }
}

/// Result type alias for TrendPulse operations
pub type Result<T> = std::result::Result<T, TrendPulseError>;
