//! Search context rendering - the evidence block of the veracity prompt.

use crate::types::{evidence::EvidenceItem, language::Language};

const RESULTS_HEADER: &str = "=== WEB SEARCH RESULTS ===";

/// Replace double quotes (ASCII and typographic) with single quotes so
/// evidence echoed back by the model cannot break its JSON strings.
pub fn sanitize(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '"' | '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{00AB}' | '\u{00BB}' => '\'',
            other => other,
        })
        .collect()
}

/// Render ranked evidence as numbered `[SOURCE n]` blocks, or an explicit
/// no-results marker when there is nothing to show.
///
/// The empty marker steers the model toward a negative verdict for
/// verifiable claims instead of "unverifiable".
pub fn build_search_context(evidence: &[EvidenceItem], language: Language) -> String {
    if evidence.is_empty() {
        return match language {
            Language::De => "\n\n[NONE] KEINE WEB-SUCHERGEBNISSE GEFUNDEN\n\n\
                Keine Informationen verfuegbar. Fuer ueberpruefbare Fakten bedeutet dies wahrscheinlich: FALSCH."
                .to_string(),
            Language::En => "\n\n[NONE] NO WEB SEARCH RESULTS FOUND\n\n\
                No information available. For verifiable facts, this likely means: FALSE."
                .to_string(),
        };
    }

    let blocks: Vec<String> = evidence
        .iter()
        .enumerate()
        .map(|(i, item)| {
            format!(
                "[SOURCE {}] Title: {}\nURL: {}\nSnippet: {}",
                i + 1,
                sanitize(&item.title),
                item.url,
                sanitize(&item.snippet)
            )
        })
        .collect();

    let only_source = match language {
        Language::De => "[OK] Die obigen Web-Suchergebnisse sind deine EINZIGE Informationsquelle.",
        Language::En => "[OK] The above web search results are your ONLY source of information.",
    };

    format!(
        "\n\n{}\n{}\n\n{}",
        RESULTS_HEADER,
        blocks.join("\n\n"),
        only_source
    )
}
