//! Verdict parsing - recover a structured verdict from model output.
//!
//! Models do not reliably emit clean JSON. Parsing is layered, first
//! success wins:
//!
//! 1. the raw text as JSON
//! 2. the text with code fences stripped and the first brace-balanced
//!    object sliced out
//! 3. that slice after a character-level repair of unescaped quotes and
//!    raw control characters inside strings
//!
//! Every layer is a best-effort heuristic. The repair pass in particular
//! decides whether a quote closes a string by looking at what follows it,
//! and prose that itself reads like JSON structure (`"stop", "now"`) can
//! still be mis-repaired. Such input falls through to the parse-failure
//! verdict.

use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::types::verdict::{Source, VeracityStatus, Verdict};

/// Justification used when the parsed object has none.
pub const DEFAULT_JUSTIFICATION: &str = "No analysis available";

/// Verification method used when the parsed object has none.
pub const DEFAULT_VERIFICATION_METHOD: &str = "Web search";

/// Parse a model response into a verdict. Never fails.
///
/// Returns the parse-failure verdict when no layer recovers an object.
pub fn parse_verdict(raw: &str) -> Verdict {
    parse_verdict_response(raw).unwrap_or_else(Verdict::parse_failure)
}

/// Parse a model response, returning `None` when every layer fails.
pub fn parse_verdict_response(raw: &str) -> Option<Verdict> {
    let object = parse_object(raw)?;
    Some(verdict_from_object(&object))
}

fn parse_object(raw: &str) -> Option<Map<String, Value>> {
    if let Some(object) = parse_as_object(raw) {
        debug!("Direct JSON parse succeeded");
        return Some(object);
    }

    let cleaned = strip_code_fence(raw);
    let candidate = extract_balanced_object(cleaned).unwrap_or(cleaned);
    if let Some(object) = parse_as_object(candidate) {
        info!("Parsed verdict after code fence and brace extraction");
        return Some(object);
    }

    let repaired = repair_json_strings(candidate);
    if let Some(object) = parse_as_object(&repaired) {
        info!("Parsed verdict after string repair");
        return Some(object);
    }

    warn!(
        response_chars = raw.chars().count(),
        "All verdict parse strategies failed"
    );
    None
}

fn parse_as_object(text: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(object)) => Some(object),
        _ => None,
    }
}

/// Remove a surrounding Markdown code fence (```` ```json ... ``` ````).
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    let rest = rest.trim_start_matches(|c: char| c.is_ascii_lowercase());
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Slice the first complete `{...}` span, ignoring braces inside strings.
///
/// Falls back to first `{` through last `}` when the scan never balances.
fn extract_balanced_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape = false;

    for (offset, c) in text[start..].char_indices() {
        if escape {
            escape = false;
            continue;
        }
        match c {
            '\\' => escape = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=start + offset]);
                }
            }
            _ => {}
        }
    }

    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Escape quotes that sit inside a value string instead of closing it, and
/// raw newlines, carriage returns and tabs inside any string.
///
/// A string opened in value position (after `:`, `,` or `[`) only ends at
/// a quote followed by structure: `:`, `}`, `]`, end of input, or a comma
/// leading into another key or value. Any other quote inside it is escaped.
pub fn repair_json_strings(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len() + 16);
    let mut in_string = false;
    let mut escape = false;
    let mut repairable = false;

    for (i, &c) in chars.iter().enumerate() {
        if escape {
            out.push(c);
            escape = false;
            continue;
        }

        if !in_string {
            if c == '"' {
                repairable = in_value_position(&out);
                in_string = true;
            }
            out.push(c);
            continue;
        }

        match c {
            '\\' => {
                out.push(c);
                escape = true;
            }
            '"' if repairable && !closes_string(&chars[i + 1..]) => out.push_str("\\\""),
            '"' => {
                out.push(c);
                in_string = false;
            }
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }

    out
}

fn in_value_position(emitted: &str) -> bool {
    matches!(
        emitted.chars().rev().find(|c| !c.is_whitespace()),
        Some(':' | ',' | '[')
    )
}

fn closes_string(rest: &[char]) -> bool {
    let mut after = rest.iter().copied().skip_while(|c| c.is_whitespace());
    match after.next() {
        None | Some(':' | '}' | ']') => true,
        Some(',') => {
            let next: String = after.skip_while(|c| c.is_whitespace()).take(5).collect();
            match next.chars().next() {
                None => true,
                Some('"' | '{' | '[' | ']' | '}' | '-') => true,
                Some(c) if c.is_ascii_digit() => true,
                Some(_) => {
                    next.starts_with("true") || next.starts_with("false") || next.starts_with("null")
                }
            }
        }
        Some(_) => false,
    }
}

fn verdict_from_object(object: &Map<String, Value>) -> Verdict {
    let status = match object.get("status") {
        None => VeracityStatus::Unverifiable,
        Some(value) => match value.as_str().and_then(VeracityStatus::from_canonical) {
            Some(status) => status,
            None => {
                warn!(status = %value, "Invalid status replaced with Unverifiable");
                VeracityStatus::Unverifiable
            }
        },
    };

    let justification = object
        .get("justification")
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_JUSTIFICATION);

    let verification_method = object
        .get("verification_method")
        .or_else(|| object.get("verificationMethod"))
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_VERIFICATION_METHOD);

    Verdict::new(status, justification, verification_method)
        .with_sources(normalize_sources(object.get("sources")))
}

/// Keep only source objects with a non-empty url, reduced to title/url/snippet.
fn normalize_sources(value: Option<&Value>) -> Vec<Source> {
    let Some(Value::Array(entries)) = value else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(Value::as_object)
        .filter_map(|entry| {
            let url = entry.get("url").and_then(Value::as_str)?;
            if url.trim().is_empty() {
                return None;
            }
            let text = |key: &str| {
                entry
                    .get(key)
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string()
            };
            Some(Source::new(text("title"), url, text("snippet")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::verdict::{PARSE_FAILURE_JUSTIFICATION, PARSE_FAILURE_METHOD};

    const BARE: &str = r#"{"status":"Untruth","justification":"The wall fell in 1989.","verification_method":"Web search","sources":[{"title":"Wall","url":"https://a.org","snippet":"It fell."}]}"#;

    #[test]
    fn test_serialized_verdict_round_trips() {
        let verdict = Verdict::new(
            VeracityStatus::FactuallyCorrect,
            "Confirmed by two outlets.",
            "Web search",
        )
        .with_sources(vec![Source::new("Wall", "https://a.org", "It fell.")]);

        let json = serde_json::to_string(&verdict).unwrap();
        assert_eq!(parse_verdict(&json), verdict);
    }

    #[test]
    fn test_fenced_json_with_prose() {
        let raw = format!("Here is the result:\n```json\n{}\n```\nThanks", BARE);
        assert_eq!(parse_verdict(&raw), parse_verdict(BARE));
        assert_eq!(parse_verdict(&raw).status, VeracityStatus::Untruth);
    }

    #[test]
    fn test_fence_only() {
        let raw = format!("```json\n{}\n```", BARE);
        assert_eq!(parse_verdict(&raw).sources.len(), 1);
    }

    #[test]
    fn test_braces_inside_strings_ignored() {
        let raw = r#"prefix {"status":"Misleading","justification":"uses {braces} and \"quotes\"","sources":[]} suffix {"x":1}"#;
        let verdict = parse_verdict(raw);
        assert_eq!(verdict.status, VeracityStatus::Misleading);
        assert_eq!(verdict.justification, "uses {braces} and \"quotes\"");
    }

    #[test]
    fn test_unescaped_quote_repaired() {
        let raw = r#"{"status":"Untruth","justification":"He said "no" publicly","verification_method":"Web search","sources":[]}"#;
        let verdict = parse_verdict(raw);
        assert_eq!(verdict.status, VeracityStatus::Untruth);
        assert!(verdict.justification.contains("no"));
        assert_eq!(verdict.justification, "He said \"no\" publicly");
    }

    #[test]
    fn test_raw_newline_in_string_repaired() {
        let raw = "{\"status\":\"Misleading\",\"justification\":\"line one\nline two\"}";
        let verdict = parse_verdict(raw);
        assert_eq!(verdict.status, VeracityStatus::Misleading);
        assert_eq!(verdict.justification, "line one\nline two");
    }

    #[test]
    fn test_quote_before_comma_prose_is_parse_failure() {
        let raw = r#"{"status":"Untruth","justification":"He said "stop", "now" loudly","sources":[]}"#;
        let verdict = parse_verdict(raw);
        assert_eq!(verdict.justification, PARSE_FAILURE_JUSTIFICATION);
        assert_eq!(verdict.verification_method, PARSE_FAILURE_METHOD);
    }

    #[test]
    fn test_total_failure_default() {
        for raw in ["", "no json here", "{broken", "[1, 2, 3]", "\"just a string\""] {
            let verdict = parse_verdict(raw);
            assert_eq!(verdict, Verdict::parse_failure(), "input: {:?}", raw);
            assert!(parse_verdict_response(raw).is_none());
        }
    }

    #[test]
    fn test_invalid_status_coerced() {
        let verdict = parse_verdict(r#"{"status":"Mostly True","justification":"x"}"#);
        assert_eq!(verdict.status, VeracityStatus::Unverifiable);
        assert_eq!(verdict.justification, "x");

        let verdict = parse_verdict(r#"{"status":"untruth"}"#);
        assert_eq!(verdict.status, VeracityStatus::Unverifiable);
    }

    #[test]
    fn test_missing_fields_default() {
        let verdict = parse_verdict(r#"{"status":"Untruth"}"#);
        assert_eq!(verdict.justification, DEFAULT_JUSTIFICATION);
        assert_eq!(verdict.verification_method, DEFAULT_VERIFICATION_METHOD);
        assert!(verdict.sources.is_empty());
    }

    #[test]
    fn test_camel_case_method_accepted() {
        let verdict = parse_verdict(r#"{"status":"Untruth","verificationMethod":"Archive lookup"}"#);
        assert_eq!(verdict.verification_method, "Archive lookup");
    }

    #[test]
    fn test_sources_normalized() {
        let raw = r#"{"status":"Untruth","sources":[
            {"url":"https://a.org","extra":"dropped"},
            {"title":"No url"},
            {"title":"Empty","url":"  "},
            "not an object",
            {"title":"Full","url":"https://b.org","snippet":"text"}
        ]}"#;

        let sources = parse_verdict(raw).sources;
        assert_eq!(
            sources,
            vec![
                Source::new("", "https://a.org", ""),
                Source::new("Full", "https://b.org", "text"),
            ]
        );
    }

    #[test]
    fn test_non_list_sources_discarded() {
        let verdict = parse_verdict(r#"{"status":"Untruth","sources":"https://a.org"}"#);
        assert!(verdict.sources.is_empty());
    }

    #[test]
    fn test_repair_leaves_valid_json_alone() {
        assert_eq!(repair_json_strings(BARE), BARE);
    }

    #[test]
    fn test_unbalanced_falls_back_to_last_brace() {
        assert_eq!(
            extract_balanced_object(r#"x {"a": "unterminated} y"#),
            Some(r#"{"a": "unterminated}"#)
        );
    }
}
