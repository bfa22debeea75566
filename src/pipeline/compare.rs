//! Multi-query comparison.
//!
//! Queries are fetched one at a time, in order. Running them concurrently
//! would multiply the load on the shared enrichment backend, so the loop
//! awaits each fetch before starting the next.

use std::future::Future;

use serde::Serialize;
use tracing::{info, warn};

use super::aggregate::aggregate;
use crate::telemetry;
use crate::types::{ComparisonDataset, QueryResult};
use crate::{Result, TrendPulseError};

/// Most queries a single comparison accepts.
pub const MAX_COMPARE_QUERIES: usize = 5;

/// A query whose fetch failed and was replaced by an empty result.
#[derive(Debug)]
pub struct QueryFailure {
    pub query: String,
    pub error: TrendPulseError,
}

/// Result of a comparison run.
#[derive(Debug)]
pub struct ComparisonOutcome {
    pub dataset: ComparisonDataset,
    /// Queries that contributed empty data because their fetch failed.
    pub failures: Vec<QueryFailure>,
}

impl ComparisonOutcome {
    /// Whether any query degraded to an empty result.
    pub fn is_degraded(&self) -> bool {
        !self.failures.is_empty()
    }

    pub fn failed_queries(&self) -> impl Iterator<Item = &str> {
        self.failures.iter().map(|f| f.query.as_str())
    }
}

/// An editable list of comparison queries.
///
/// Entries are trimmed, never blank, and capped at [`MAX_COMPARE_QUERIES`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QuerySet {
    queries: Vec<String>,
}

impl QuerySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a query. Returns `false` if it is blank or the set is full.
    pub fn push(&mut self, query: &str) -> bool {
        let query = query.trim();
        if query.is_empty() || self.is_full() {
            return false;
        }
        self.queries.push(query.to_string());
        true
    }

    /// Remove the query at `index`, returning it if present.
    pub fn remove(&mut self, index: usize) -> Option<String> {
        (index < self.queries.len()).then(|| self.queries.remove(index))
    }

    pub fn is_full(&self) -> bool {
        self.queries.len() >= MAX_COMPARE_QUERIES
    }

    pub fn len(&self) -> usize {
        self.queries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.queries
    }
}

impl TryFrom<Vec<String>> for QuerySet {
    type Error = TrendPulseError;

    fn try_from(queries: Vec<String>) -> Result<Self> {
        Ok(Self {
            queries: validate_queries(&queries)?,
        })
    }
}

/// Trim and check a comparison request.
pub fn validate_queries<Q: AsRef<str>>(queries: &[Q]) -> Result<Vec<String>> {
    if queries.is_empty() {
        return Err(TrendPulseError::InvalidInput(
            "at least one query is required".into(),
        ));
    }
    if queries.len() > MAX_COMPARE_QUERIES {
        return Err(TrendPulseError::InvalidInput(format!(
            "at most {MAX_COMPARE_QUERIES} queries can be compared, got {}",
            queries.len()
        )));
    }
    queries
        .iter()
        .enumerate()
        .map(|(i, q)| {
            let q = q.as_ref().trim();
            if q.is_empty() {
                Err(TrendPulseError::InvalidInput(format!("query #{} is blank", i + 1)))
            } else {
                Ok(q.to_string())
            }
        })
        .collect()
}

/// Fetch each query in turn with `fetch`, then aggregate.
///
/// A failed fetch never aborts the run: its error is recorded and an empty
/// result keeps the remaining queries aligned with their labels.
pub async fn run_comparison<Q, F, Fut>(queries: &[Q], fetch: F) -> Result<ComparisonOutcome>
where
    Q: AsRef<str>,
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<QueryResult>>,
{
    let queries = validate_queries(queries)?;
    let mut results = Vec::with_capacity(queries.len());
    let mut failures = Vec::new();

    for query in &queries {
        match fetch(query.clone()).await {
            Ok(result) => results.push(result),
            Err(error) => {
                warn!(query = %query, error = %error, "query failed; substituting empty result");
                metrics::counter!(telemetry::DEGRADED_QUERIES_TOTAL).increment(1);
                results.push(QueryResult::empty(query.as_str()));
                failures.push(QueryFailure {
                    query: query.clone(),
                    error,
                });
            }
        }
    }

    let dataset = aggregate(&results, &queries);
    info!(
        queries = queries.len(),
        failed = failures.len(),
        "comparison complete"
    );
    Ok(ComparisonOutcome { dataset, failures })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_set_trims_and_caps() {
        let mut set = QuerySet::new();
        assert!(set.push("  AI trends "));
        assert!(!set.push("   "));
        for q in ["b", "c", "d", "e"] {
            assert!(set.push(q));
        }
        assert!(set.is_full());
        assert!(!set.push("f"));
        assert_eq!(set.as_slice()[0], "AI trends");
        assert_eq!(set.len(), MAX_COMPARE_QUERIES);
    }

    #[test]
    fn query_set_remove() {
        let mut set = QuerySet::new();
        set.push("a");
        set.push("b");
        assert_eq!(set.remove(0), Some("a".to_string()));
        assert_eq!(set.remove(5), None);
        assert_eq!(set.as_slice(), ["b".to_string()]);
    }

    #[test]
    fn validate_rejects_bad_requests() {
        let none: [&str; 0] = [];
        assert!(validate_queries(&none).is_err());
        assert!(validate_queries(&["a", " "]).is_err());
        assert!(validate_queries(&["1", "2", "3", "4", "5", "6"]).is_err());
        assert_eq!(validate_queries(&[" x "]).unwrap(), vec!["x".to_string()]);
    }

    #[test]
    fn query_set_try_from_validates() {
        assert!(QuerySet::try_from(vec!["ok".to_string()]).is_ok());
        assert!(QuerySet::try_from(Vec::new()).is_err());
    }
}
