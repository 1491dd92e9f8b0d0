//! LLM prompts for veracity analysis.
//!
//! Templates carry `{claim}`, `{current_date}` and `{search_context}`
//! placeholders. The model is told to answer with one JSON object whose
//! `status` is one of the four canonical strings.

use chrono::{Datelike, NaiveDate};

use crate::types::language::Language;

/// English veracity prompt.
pub const VERACITY_PROMPT_EN: &str = r#"You are a professional fact-checker. Today's date is {current_date}.

Evaluate the veracity of the following claim using ONLY the web search results provided below. Do not rely on prior knowledge: facts may have changed since your training data was collected.

CLAIM: {claim}
{search_context}

Rules:
1. Base your verdict exclusively on the search results. If they contradict what you believe, the search results win.
2. Choose exactly one status:
   - "Factually Correct": the search results confirm the claim.
   - "Untruth": the search results contradict the claim.
   - "Misleading": the claim contains some truth but distorts, omits or exaggerates.
   - "Unverifiable": the claim is an opinion, a prediction, or cannot be checked.
3. Cite only sources that appear in the search results above, using their exact URLs.
4. Do not use double quotes inside string values. Use single quotes instead.

Respond with a single JSON object and nothing else:
{
    "status": "Factually Correct" | "Untruth" | "Misleading" | "Unverifiable",
    "justification": "2-4 sentences explaining the verdict with reference to the sources",
    "verification_method": "short description of how the claim was checked",
    "sources": [
        {"title": "source title", "url": "source url", "snippet": "relevant excerpt"}
    ]
}"#;

/// German veracity prompt.
pub const VERACITY_PROMPT_DE: &str = r#"Du bist ein professioneller Faktenprüfer. Das heutige Datum ist der {current_date}.

Bewerte den Wahrheitsgehalt der folgenden Behauptung AUSSCHLIESSLICH anhand der unten aufgeführten Web-Suchergebnisse. Verlasse dich nicht auf dein Vorwissen: Fakten können sich seit deinen Trainingsdaten geändert haben.

BEHAUPTUNG: {claim}
{search_context}

Regeln:
1. Stütze dein Urteil ausschließlich auf die Suchergebnisse. Widersprechen sie deinem Wissen, gelten die Suchergebnisse.
2. Wähle genau einen Status (die Werte bleiben auf Englisch):
   - "Factually Correct": die Suchergebnisse bestätigen die Behauptung.
   - "Untruth": die Suchergebnisse widerlegen die Behauptung.
   - "Misleading": die Behauptung enthält Wahres, verzerrt oder übertreibt aber.
   - "Unverifiable": die Behauptung ist eine Meinung, eine Prognose oder nicht überprüfbar.
3. Zitiere nur Quellen aus den obigen Suchergebnissen mit ihren exakten URLs.
4. Verwende keine doppelten Anführungszeichen innerhalb von Textwerten, sondern einfache.

Antworte mit genau einem JSON-Objekt und nichts anderem:
{
    "status": "Factually Correct" | "Untruth" | "Misleading" | "Unverifiable",
    "justification": "2-4 Sätze zur Begründung mit Bezug auf die Quellen",
    "verification_method": "kurze Beschreibung der Überprüfung",
    "sources": [
        {"title": "Titel der Quelle", "url": "URL der Quelle", "snippet": "relevanter Auszug"}
    ]
}"#;

const GERMAN_MONTHS: [&str; 12] = [
    "Januar",
    "Februar",
    "März",
    "April",
    "Mai",
    "Juni",
    "Juli",
    "August",
    "September",
    "Oktober",
    "November",
    "Dezember",
];

/// Render a date the way each prompt language writes it.
pub fn format_prompt_date(date: NaiveDate, language: Language) -> String {
    match language {
        Language::En => date.format("%B %d, %Y").to_string(),
        Language::De => format!(
            "{:02}. {} {}",
            date.day(),
            GERMAN_MONTHS[date.month0() as usize],
            date.year()
        ),
    }
}

/// Format the veracity prompt for a claim.
///
/// Placeholders are substituted in a single pass so text inside the claim
/// or the evidence is never itself treated as a placeholder.
pub fn format_veracity_prompt(
    claim: &str,
    current_date: &str,
    search_context: &str,
    language: Language,
) -> String {
    let template = match language {
        Language::En => VERACITY_PROMPT_EN,
        Language::De => VERACITY_PROMPT_DE,
    };

    render(
        template,
        &[
            ("{claim}", claim),
            ("{current_date}", current_date),
            ("{search_context}", search_context),
        ],
    )
}

fn render(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        match values.iter().find(|(key, _)| tail.starts_with(key)) {
            Some((key, value)) => {
                out.push_str(value);
                rest = &tail[key.len()..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_dates() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        assert_eq!(format_prompt_date(date, Language::En), "March 07, 2025");
        assert_eq!(format_prompt_date(date, Language::De), "07. März 2025");
    }

    #[test]
    fn test_format_veracity_prompt() {
        let prompt = format_veracity_prompt(
            "The Berlin Wall fell in 1989",
            "March 07, 2025",
            "\n\n=== WEB SEARCH RESULTS ===\n[SOURCE 1] Title: Wall",
            Language::En,
        );

        assert!(prompt.contains("Today's date is March 07, 2025."));
        assert!(prompt.contains("CLAIM: The Berlin Wall fell in 1989"));
        assert!(prompt.contains("[SOURCE 1] Title: Wall"));
        assert!(prompt.contains("\"status\": \"Factually Correct\""));
        assert!(!prompt.contains("{claim}"));
    }

    #[test]
    fn test_placeholders_inside_values_untouched() {
        let prompt = format_veracity_prompt(
            "a claim mentioning {search_context}",
            "today",
            "evidence with {claim}",
            Language::De,
        );

        assert!(prompt.contains("BEHAUPTUNG: a claim mentioning {search_context}"));
        assert!(prompt.contains("evidence with {claim}"));
    }

    #[test]
    fn test_json_braces_preserved() {
        let prompt = format_veracity_prompt("c", "d", "s", Language::En);
        assert!(prompt.contains("{\"title\": \"source title\""));
    }
}
