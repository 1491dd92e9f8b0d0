//! Evidence gathering - run expanded queries against the search provider.
//!
//! Queries go out one at a time with a pacing delay between them; search
//! providers rate-limit aggressively and evidence from eight queries is
//! worth more than a 429 on half of them.

use indexmap::IndexMap;
use tracing::{error, info, warn};

use crate::pipeline::{
    queries::{expand_queries, QueryRules},
    rank::rank_evidence,
};
use crate::traits::searcher::WebSearcher;
use crate::types::{config::VerificationConfig, evidence::EvidenceItem, language::Language};

/// Gather, deduplicate and rank evidence for a claim.
///
/// Returns an empty list when the provider is disabled. Per-query failures
/// (timeouts, HTTP errors, rate limits) count as zero results for that query
/// and never abort the remaining queries.
pub async fn gather_evidence<S: WebSearcher + ?Sized>(
    searcher: &S,
    claim: &str,
    language: Language,
    rules: &QueryRules,
    config: &VerificationConfig,
) -> Vec<EvidenceItem> {
    if !searcher.is_enabled() {
        error!("Web search is disabled - veracity analysis will be unreliable");
        return Vec::new();
    }

    let queries = expand_queries(claim, rules);
    let total = queries.len().min(config.max_queries);
    info!(total_queries = queries.len(), issued = total, "Expanded claim into search queries");

    let mut collected = Vec::new();
    for (i, query) in queries.iter().take(config.max_queries).enumerate() {
        if i > 0 && !config.query_pacing.is_zero() {
            tokio::time::sleep(config.query_pacing).await;
        }

        info!(query_index = i + 1, total, query = %query, "Searching");
        match searcher
            .search(query, config.results_per_query, language)
            .await
        {
            Ok(results) => {
                info!(query_index = i + 1, results = results.len(), "Search returned results");
                collected.extend(results);
            }
            Err(e) => {
                warn!(query = %query, error = %e, "Search failed, continuing with remaining queries");
            }
        }
    }

    let unique = dedupe_by_url(collected);
    info!(unique = unique.len(), "Deduplicated search results");

    let ranked = rank_evidence(unique, claim, config);
    info!(selected = ranked.len(), "Selected evidence for analysis");
    ranked
}

/// Deduplicate by exact url, keeping the first occurrence in order.
pub fn dedupe_by_url(items: Vec<EvidenceItem>) -> Vec<EvidenceItem> {
    let mut seen: IndexMap<String, EvidenceItem> = IndexMap::with_capacity(items.len());
    for item in items {
        seen.entry(item.url.clone()).or_insert(item);
    }
    seen.into_values().collect()
}
