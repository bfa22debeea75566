//! Per-query result types.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::post::Post;

/// Upstream content platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Reddit,
    #[serde(rename = "hackernews")]
    HackerNews,
    News,
}

impl Source {
    /// Every source, in the fixed chart order.
    pub const ALL: [Source; 3] = [Source::Reddit, Source::HackerNews, Source::News];

    /// Key used for this source in the backend payload.
    pub fn key(&self) -> &'static str {
        match self {
            Source::Reddit => "reddit",
            Source::HackerNews => "hackernews",
            Source::News => "news",
        }
    }

    /// Human-readable name used as a chart series label.
    pub fn display_name(&self) -> &'static str {
        match self {
            Source::Reddit => "Reddit",
            Source::HackerNews => "Hacker News",
            Source::News => "News",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Posts returned for one query, grouped by source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    pub query: String,
    #[serde(default)]
    pub reddit: Vec<Post>,
    #[serde(default)]
    pub hackernews: Vec<Post>,
    #[serde(default)]
    pub news: Vec<Post>,
}

impl QueryResult {
    /// A result with no posts from any source.
    pub fn empty(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    pub fn posts(&self, source: Source) -> &[Post] {
        match source {
            Source::Reddit => &self.reddit,
            Source::HackerNews => &self.hackernews,
            Source::News => &self.news,
        }
    }

    pub fn posts_mut(&mut self, source: Source) -> &mut Vec<Post> {
        match source {
            Source::Reddit => &mut self.reddit,
            Source::HackerNews => &mut self.hackernews,
            Source::News => &mut self.news,
        }
    }

    /// Builder-style setter for one source's posts.
    pub fn with_posts(mut self, source: Source, posts: Vec<Post>) -> Self {
        *self.posts_mut(source) = posts;
        self
    }

    pub fn total_posts(&self) -> usize {
        Source::ALL.iter().map(|s| self.posts(*s).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_posts() == 0
    }
}
