//! The value type returned by a query source.
use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// A single search hit.
///
/// Results are owned by the [`QuerySource`](crate::source::QuerySource) that produced them and
/// handed to the widget as `Arc<SearchResult>`, so the widget only ever references them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchResult {
    /// Unique identifier within a source
    pub id: String,
    /// Main text shown on the result row
    pub title: String,
    /// Secondary text shown next to the title
    pub category: String,
}

impl SearchResult {
    /// Creates a new result
    pub fn new(id: impl Into<String>, title: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            category: category.into(),
        }
    }

    /// Case-insensitive substring match against the title or the category.
    ///
    /// `needle` is expected to be lowercased already.
    pub(crate) fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle) || self.category.to_lowercase().contains(needle)
    }
}

impl Display for SearchResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}\t{}\t{}", self.id, self.title, self.category)
    }
}
