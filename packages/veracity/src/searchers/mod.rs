//! Search provider implementations.

mod brave;

pub use brave::BraveSearcher;

use async_trait::async_trait;

use crate::error::{SearchError, SearchResult};
use crate::traits::searcher::WebSearcher;
use crate::types::{evidence::EvidenceItem, language::Language};

/// Searcher used when no search credential is configured.
///
/// Reports itself as disabled, so the gatherer skips searching entirely and
/// the model is told no evidence was found.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledSearcher;

#[async_trait]
impl WebSearcher for DisabledSearcher {
    fn is_enabled(&self) -> bool {
        false
    }

    async fn search(
        &self,
        _query: &str,
        _count: usize,
        _language: Language,
    ) -> SearchResult<Vec<EvidenceItem>> {
        tracing::warn!("DisabledSearcher: search called but no search API key configured");
        Err(SearchError::Disabled)
    }
}
