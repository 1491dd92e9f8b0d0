//! Web searcher trait for evidence discovery.
//!
//! Abstracts over search providers (Brave, or a mock in tests). A provider
//! answers one query at a time; pacing, merging and failure absorption are
//! the gatherer's job, so implementations just report what happened.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError};

use crate::error::{SearchError, SearchResult};
use crate::types::{evidence::EvidenceItem, language::Language};

/// Web search trait.
///
/// # Implementations
///
/// - `BraveSearcher` - Brave Search API
/// - `DisabledSearcher` - No credential configured
/// - `MockWebSearcher` - For testing
#[async_trait]
pub trait WebSearcher: Send + Sync {
    /// Whether the provider is configured. A disabled provider is never queried.
    fn is_enabled(&self) -> bool {
        true
    }

    /// Search the web, returning at most `count` results.
    async fn search(
        &self,
        query: &str,
        count: usize,
        language: Language,
    ) -> SearchResult<Vec<EvidenceItem>>;
}

#[async_trait]
impl<T: WebSearcher + ?Sized> WebSearcher for Box<T> {
    fn is_enabled(&self) -> bool {
        (**self).is_enabled()
    }

    async fn search(
        &self,
        query: &str,
        count: usize,
        language: Language,
    ) -> SearchResult<Vec<EvidenceItem>> {
        (**self).search(query, count, language).await
    }
}

#[async_trait]
impl<T: WebSearcher + ?Sized> WebSearcher for Arc<T> {
    fn is_enabled(&self) -> bool {
        (**self).is_enabled()
    }

    async fn search(
        &self,
        query: &str,
        count: usize,
        language: Language,
    ) -> SearchResult<Vec<EvidenceItem>> {
        (**self).search(query, count, language).await
    }
}

/// Mock web searcher for testing.
///
/// Answers from a per-query table, optionally with a fallback for unknown
/// queries, and records every query it receives.
#[derive(Default)]
pub struct MockWebSearcher {
    results: Mutex<HashMap<String, Vec<EvidenceItem>>>,
    fallback: Mutex<Vec<EvidenceItem>>,
    failing: Mutex<HashSet<String>>,
    calls: Mutex<Vec<String>>,
    disabled: bool,
}

impl MockWebSearcher {
    /// Create a new mock searcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// A searcher reporting itself as unconfigured.
    pub fn disabled() -> Self {
        Self {
            disabled: true,
            ..Self::default()
        }
    }

    /// Add results for a query.
    pub fn with_results(self, query: &str, results: Vec<EvidenceItem>) -> Self {
        self.results
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(query.to_string(), results);
        self
    }

    /// Results returned for any query without an explicit entry.
    pub fn with_fallback(self, results: Vec<EvidenceItem>) -> Self {
        *self.fallback.lock().unwrap_or_else(PoisonError::into_inner) = results;
        self
    }

    /// Make a query fail with an HTTP error.
    pub fn failing_on(self, query: &str) -> Self {
        self.failing
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(query.to_string());
        self
    }

    /// Queries received so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl WebSearcher for MockWebSearcher {
    fn is_enabled(&self) -> bool {
        !self.disabled
    }

    async fn search(
        &self,
        query: &str,
        count: usize,
        _language: Language,
    ) -> SearchResult<Vec<EvidenceItem>> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(query.to_string());

        if self.disabled {
            return Err(SearchError::Disabled);
        }

        if self
            .failing
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(query)
        {
            return Err(SearchError::Http(Box::new(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                format!("mock failure for '{}'", query),
            ))));
        }

        let mut results = self
            .results
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(query)
            .cloned()
            .unwrap_or_else(|| {
                self.fallback
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .clone()
            });
        results.truncate(count);
        Ok(results)
    }
}
