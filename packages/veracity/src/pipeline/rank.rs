//! Evidence ranking - filter off-topic or thin results, keep the best few.

use std::collections::HashSet;
use tracing::debug;

use crate::types::{config::VerificationConfig, evidence::EvidenceItem};

/// Claim words this short or shorter never count as a match.
const MIN_MATCH_WORD_CHARS: usize = 3;

const SNIPPET_POINTS: usize = 2;
const TITLE_POINTS: usize = 3;

/// An evidence item with its scratch relevance score. Never leaves this module.
struct Scored {
    item: EvidenceItem,
    score: usize,
}

/// Rank evidence against the claim and keep at most `config.max_evidence` items.
///
/// Items with a thin snippet or a missing url are dropped before scoring.
/// Survivors must share at least one claim word with their title or
/// snippet; title matches weigh 3, snippet matches 2, and a long snippet
/// adds a small bonus. Ties keep their input order.
pub fn rank_evidence(
    items: Vec<EvidenceItem>,
    claim: &str,
    config: &VerificationConfig,
) -> Vec<EvidenceItem> {
    let total = items.len();
    let claim_lower = claim.to_lowercase();
    let claim_words: HashSet<&str> = claim_lower
        .split_whitespace()
        .filter(|w| w.chars().count() > MIN_MATCH_WORD_CHARS)
        .collect();

    let mut skipped_short = 0;
    let mut skipped_no_url = 0;
    let mut skipped_no_match = 0;
    let mut scored = Vec::with_capacity(total);

    for item in items {
        if item.snippet.trim().chars().count() < config.min_snippet_chars {
            skipped_short += 1;
            continue;
        }
        let url = item.url.trim();
        if url.is_empty() || url.chars().count() < config.min_url_chars {
            skipped_no_url += 1;
            continue;
        }

        let snippet_lower = item.snippet.to_lowercase();
        let title_lower = item.title.to_lowercase();
        let snippet_matches = claim_words
            .iter()
            .filter(|w| snippet_lower.contains(**w))
            .count();
        let title_matches = claim_words
            .iter()
            .filter(|w| title_lower.contains(**w))
            .count();

        if snippet_matches + title_matches == 0 {
            skipped_no_match += 1;
            continue;
        }

        let score = length_bonus(&item.snippet)
            + snippet_matches * SNIPPET_POINTS
            + title_matches * TITLE_POINTS;
        scored.push(Scored { item, score });
    }

    debug!(
        total,
        accepted = scored.len(),
        skipped_short,
        skipped_no_url,
        skipped_no_match,
        "Filtered search results"
    );

    // sort_by is stable, equal scores keep discovery order
    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored
        .into_iter()
        .take(config.max_evidence)
        .map(|s| s.item)
        .collect()
}

fn length_bonus(snippet: &str) -> usize {
    match snippet.chars().count() {
        n if n >= 100 => 2,
        n if n >= 50 => 1,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLAIM: &str = "The Berlin Wall fell on November 9, 1989.";

    fn item(title: &str, url: &str, snippet: &str) -> EvidenceItem {
        EvidenceItem::new(title, url, snippet)
    }

    fn padded(text: &str, len: usize) -> String {
        let mut s = text.to_string();
        while s.chars().count() < len {
            s.push('.');
        }
        s
    }

    #[test]
    fn test_gate_drops_short_snippets_and_urls() {
        let items = vec![
            item("Berlin", "https://a.org/1", "Berlin Wall short"),
            item("Berlin", "", &padded("Berlin Wall", 60)),
            item("Berlin", "a.b", &padded("Berlin Wall", 60)),
            item("Berlin", "https://a.org/4", &padded("Berlin Wall", 60)),
        ];

        let ranked = rank_evidence(items, CLAIM, &VerificationConfig::default());
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].url, "https://a.org/4");
    }

    #[test]
    fn test_requires_claim_word_match() {
        let items = vec![item(
            "Weather report",
            "https://weather.example",
            &padded("Sunny skies expected across the region tomorrow", 120),
        )];

        assert!(rank_evidence(items, CLAIM, &VerificationConfig::default()).is_empty());
    }

    #[test]
    fn test_title_matches_outweigh_snippet_matches() {
        let snippet_only = item("Unrelated", "https://a.org/s", &padded("the berlin wall", 60));
        let title_only = item(
            "Berlin Wall",
            "https://a.org/t",
            &padded("a snippet about history in general terms", 60),
        );

        let ranked = rank_evidence(
            vec![snippet_only, title_only],
            CLAIM,
            &VerificationConfig::default(),
        );
        // snippet-only: 1 + 2*2 = 5, title-only: 1 + 2*3 = 7
        assert_eq!(ranked[0].url, "https://a.org/t");
        assert_eq!(ranked[1].url, "https://a.org/s");
    }

    #[test]
    fn test_ties_keep_input_order_and_cap_applies() {
        let items: Vec<EvidenceItem> = (0..7)
            .map(|i| {
                item(
                    "news",
                    &format!("https://a.org/{}", i),
                    &padded("the wall came down", 60),
                )
            })
            .collect();

        let ranked = rank_evidence(items, CLAIM, &VerificationConfig::default());
        assert_eq!(ranked.len(), 5);
        let urls: Vec<_> = ranked.iter().map(|e| e.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://a.org/0",
                "https://a.org/1",
                "https://a.org/2",
                "https://a.org/3",
                "https://a.org/4"
            ]
        );
    }

    #[test]
    fn test_distinct_words_counted_once() {
        let repeated = item("x", "https://a.org/r", &padded("wall wall wall wall wall", 60));
        let varied = item("x", "https://a.org/v", &padded("wall berlin", 60));

        let ranked = rank_evidence(vec![repeated, varied], CLAIM, &VerificationConfig::default());
        assert_eq!(ranked[0].url, "https://a.org/v");
    }

    #[test]
    fn test_empty_input() {
        assert!(rank_evidence(Vec::new(), CLAIM, &VerificationConfig::default()).is_empty());
    }
}
