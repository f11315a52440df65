//! Query sources feeding the search widget.
//!
//! A [`QuerySource`] turns the settled query text into an ordered list of results. It may be
//! synchronous or asynchronous and it may fail; the widget never sees anything but the future it
//! returns.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt as _;
use futures::future::BoxFuture;
use thiserror::Error;

use crate::item::SearchResult;

/// Error returned by a query source
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// The source could not answer the query
    #[error("{0}")]
    Failed(String),
    /// The source is not reachable at the moment
    #[error("search source unavailable: {0}")]
    Unavailable(String),
}

/// Error raised while loading a catalog file
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The file could not be read
    #[error("could not read catalog: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not a valid RON list of results
    #[error("invalid catalog: {0}")]
    Parse(#[from] ron::error::SpannedError),
    /// Two entries share the same id
    #[error("duplicate result id `{0}` in catalog")]
    DuplicateId(String),
}

/// Anything that can answer a search query.
///
/// Synchronous closures `Fn(&str) -> Result<Vec<Arc<SearchResult>>, QueryError>` implement this
/// trait directly.
pub trait QuerySource: Send + Sync + 'static {
    /// Run the query. The text is passed untrimmed, exactly as it was committed.
    fn query(&self, text: &str) -> BoxFuture<'static, Result<Vec<Arc<SearchResult>>, QueryError>>;
}

impl<F> QuerySource for F
where
    F: Fn(&str) -> Result<Vec<Arc<SearchResult>>, QueryError> + Send + Sync + 'static,
{
    fn query(&self, text: &str) -> BoxFuture<'static, Result<Vec<Arc<SearchResult>>, QueryError>> {
        futures::future::ready(self(text)).boxed()
    }
}

/// A fixed, in-memory list of results.
///
/// Matching is a case-insensitive substring test on the title and the category, results keep
/// the catalog order.
#[derive(Debug, Clone)]
pub struct StaticCatalog {
    items: Vec<Arc<SearchResult>>,
    latency: Duration,
}

impl Default for StaticCatalog {
    fn default() -> Self {
        Self::demo()
    }
}

impl StaticCatalog {
    /// Creates a catalog from a list of results
    pub fn new(items: Vec<SearchResult>) -> Self {
        Self {
            items: items.into_iter().map(Arc::new).collect(),
            latency: Duration::ZERO,
        }
    }

    /// The catalog used by the demo application
    #[rustfmt::skip]
    pub fn demo() -> Self {
        Self::new(vec![
            SearchResult::new("1", "React Basics", "Frontend"),
            SearchResult::new("2", "TypeScript Tutorial", "Programming"),
            SearchResult::new("3", "Node.js Fundamentals", "Backend"),
            SearchResult::new("4", "CSS Grid Layout", "Frontend"),
            SearchResult::new("5", "React Hooks Demo", "Frontend"),
            SearchResult::new("6", "GraphQL API Design", "Backend"),
            SearchResult::new("7", "Rust Ownership Explained", "Programming"),
            SearchResult::new("8", "Docker for Developers", "DevOps"),
            SearchResult::new("9", "Testing with Jest", "Testing"),
            SearchResult::new("10", "Tailwind Styling Guide", "Frontend"),
        ])
    }

    /// Simulate a slow source: every query waits this long before answering
    pub fn latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Parse a catalog from RON, e.g. `[(id: "1", title: "React Basics", category: "Frontend")]`
    pub fn from_ron_str(s: &str) -> Result<Self, CatalogError> {
        let items: Vec<SearchResult> = ron::from_str(s)?;
        let mut seen = HashSet::new();
        for item in &items {
            if !seen.insert(item.id.as_str()) {
                return Err(CatalogError::DuplicateId(item.id.clone()));
            }
        }
        debug!("loaded catalog with {} entries", items.len());
        Ok(Self::new(items))
    }

    /// Read a catalog file, see [`StaticCatalog::from_ron_str`]
    pub fn from_ron_file<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_ron_str(&contents)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the catalog has no entries
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Synchronous lookup, shared by the async [`QuerySource`] implementation
    pub fn search(&self, text: &str) -> Vec<Arc<SearchResult>> {
        let needle = text.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.items.iter().filter(|item| item.matches(&needle)).cloned().collect()
    }
}

impl QuerySource for StaticCatalog {
    fn query(&self, text: &str) -> BoxFuture<'static, Result<Vec<Arc<SearchResult>>, QueryError>> {
        let hits = self.search(text);
        let latency = self.latency;
        trace!("catalog query {text:?}: {} hits", hits.len());
        async move {
            if !latency.is_zero() {
                tokio::time::sleep(latency).await;
            }
            Ok(hits)
        }
        .boxed()
    }
}
