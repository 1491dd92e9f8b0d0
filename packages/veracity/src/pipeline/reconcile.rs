//! Source reconciliation - keep citations honest.
//!
//! Model-reported sources must point at gathered evidence. When the model
//! cites nothing but evidence was gathered, a source list is rebuilt from the
//! evidence items sharing the most vocabulary with the justification.

use std::collections::HashSet;
use tracing::{info, warn};

use crate::types::{
    config::VerificationConfig,
    evidence::EvidenceItem,
    verdict::{Source, Verdict},
};

/// Justification words this short or shorter are not keywords.
const MIN_KEYWORD_CHARS: usize = 4;

/// Validate the verdict's sources against gathered evidence and rebuild
/// them when the model cited nothing.
///
/// With no gathered evidence the result always has an empty source list.
pub fn reconcile(mut verdict: Verdict, evidence: &[EvidenceItem], config: &VerificationConfig) -> Verdict {
    let gathered: HashSet<&str> = evidence.iter().map(|e| e.url.as_str()).collect();
    let reported = verdict.sources.len();
    verdict.sources.retain(|s| gathered.contains(s.url.as_str()));

    let dropped = reported - verdict.sources.len();
    if dropped > 0 {
        warn!(dropped, "Dropped sources not found in gathered evidence");
    }

    // First citation of a url wins
    let mut cited = HashSet::new();
    verdict.sources.retain(|s| cited.insert(s.url.clone()));

    if verdict.sources.is_empty() && !evidence.is_empty() {
        verdict.sources = reconstruct_sources(&verdict.justification, evidence, config);
        info!(sources = verdict.sources.len(), "Reconstructed sources from evidence");
    }

    verdict
}

/// Pick evidence items whose title or snippet share enough keywords with
/// the justification, falling back to the first few items.
pub fn reconstruct_sources(
    justification: &str,
    evidence: &[EvidenceItem],
    config: &VerificationConfig,
) -> Vec<Source> {
    let justification = justification.to_lowercase();
    let keywords: HashSet<&str> = justification
        .split_whitespace()
        .filter(|w| w.chars().count() > MIN_KEYWORD_CHARS)
        .collect();

    let matched: Vec<Source> = evidence
        .iter()
        .filter(|item| {
            let snippet = item.snippet.to_lowercase();
            let title = item.title.to_lowercase();
            let overlap = keywords
                .iter()
                .filter(|k| snippet.contains(**k) || title.contains(**k))
                .count();
            overlap >= config.reconcile_min_overlap
        })
        .map(|item| Source::from_evidence(item, config.reconcile_snippet_chars))
        .collect();

    if !matched.is_empty() {
        return matched;
    }

    evidence
        .iter()
        .take(config.reconcile_fallback_sources)
        .map(|item| Source::from_evidence(item, config.reconcile_snippet_chars))
        .collect()
}
