//! Query expansion - one claim in, several targeted search queries out.
//!
//! The literal claim is always the first query. Further queries come from
//! capitalized name runs in the claim, composed with topical qualifiers when
//! trigger keywords appear, plus year-scoped queries and a small table of
//! name-specific augmentations. All of that phrasing lives in [`QueryRules`],
//! so deployments can extend it from a JSON file instead of code.

use indexmap::IndexSet;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::error::Result;
use crate::types::language::Language;

/// Runs of capitalized words ("Friedrich Merz", "The Berlin Wall").
static NAME_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\p{Lu}\p{Ll}+(?:\s+\p{Lu}\p{Ll}+)*\b").unwrap());

static FOUR_DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\d{4}\b").unwrap());

/// Candidates this short are too generic to search on their own.
const MIN_CANDIDATE_CHARS: usize = 4;

/// Queries shorter than this are dropped.
const MIN_QUERY_CHARS: usize = 3;

/// Compose extra queries for every name candidate when a trigger keyword
/// appears anywhere in the claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicRule {
    /// Lowercase keywords looked up in the lowercased claim.
    pub triggers: Vec<String>,

    /// Query templates; `{name}` is replaced by the candidate.
    pub templates: Vec<String>,
}

/// Where an augmentation trigger is looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerScope {
    /// The lowercased name candidate.
    Candidate,

    /// The whole lowercased claim.
    Claim,
}

/// Fixed extra queries for a well-known name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Augmentation {
    pub trigger: String,
    pub scope: TriggerScope,
    pub queries: Vec<String>,
}

/// Expansion rules for one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRules {
    #[serde(default)]
    pub topic_rules: Vec<TopicRule>,

    #[serde(default)]
    pub augmentations: Vec<Augmentation>,

    /// Years that earn a topical year query.
    #[serde(default)]
    pub years: Vec<String>,

    /// Template for year queries; `{year}` is replaced by the match.
    #[serde(default)]
    pub year_template: String,
}

impl QueryRules {
    /// Built-in English rules.
    pub fn english() -> Self {
        Self {
            topic_rules: vec![
                TopicRule {
                    triggers: strings(&["chancellor"]),
                    templates: strings(&["{name} Chancellor Germany", "Germany Chancellor current"]),
                },
                TopicRule {
                    triggers: strings(&["book", "autobiography", "biography"]),
                    templates: strings(&["{name} book autobiography"]),
                },
            ],
            augmentations: vec![Augmentation {
                trigger: "merz".into(),
                scope: TriggerScope::Claim,
                queries: strings(&["Friedrich Merz Chancellor", "Germany Chancellor 2025"]),
            }],
            years: default_years(),
            year_template: "Germany politics {year}".into(),
        }
    }

    /// Built-in German rules.
    pub fn german() -> Self {
        Self {
            topic_rules: vec![
                TopicRule {
                    triggers: strings(&["bundeskanzler", "kanzler"]),
                    templates: strings(&[
                        "{name} Bundeskanzler Deutschland",
                        "Bundeskanzler Deutschland aktuell",
                    ]),
                },
                TopicRule {
                    triggers: strings(&["buch", "autobiografie", "biografie"]),
                    templates: strings(&["{name} Buch Autobiografie", "{name} Buch 2024 2025"]),
                },
            ],
            augmentations: vec![
                Augmentation {
                    trigger: "merkel".into(),
                    scope: TriggerScope::Candidate,
                    queries: strings(&["Angela Merkel Autobiografie Freiheit"]),
                },
                Augmentation {
                    trigger: "merz".into(),
                    scope: TriggerScope::Claim,
                    queries: strings(&["Friedrich Merz Bundeskanzler", "Deutschland Bundeskanzler 2025"]),
                },
            ],
            years: default_years(),
            year_template: "Deutschland Politik {year}".into(),
        }
    }
}

/// Expansion rules for every supported language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRuleSet {
    pub en: QueryRules,
    pub de: QueryRules,
}

impl Default for QueryRuleSet {
    fn default() -> Self {
        Self {
            en: QueryRules::english(),
            de: QueryRules::german(),
        }
    }
}

impl QueryRuleSet {
    /// Load a rule set from JSON (`{"en": {...}, "de": {...}}`).
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Rules for a language.
    pub fn for_language(&self, language: Language) -> &QueryRules {
        match language {
            Language::En => &self.en,
            Language::De => &self.de,
        }
    }

    /// Expand a claim using the rules for its language.
    pub fn expand(&self, claim: &str, language: Language) -> Vec<String> {
        expand_queries(claim, self.for_language(language))
    }
}

/// Derive an ordered, deduplicated list of search queries from a claim.
///
/// Never empty: the claim itself is always query #1, verbatim.
pub fn expand_queries(claim: &str, rules: &QueryRules) -> Vec<String> {
    let claim_lower = claim.to_lowercase();
    let mut queries: IndexSet<String> = IndexSet::new();
    queries.insert(claim.to_string());

    let mut push = |query: String| {
        if query.chars().count() >= MIN_QUERY_CHARS {
            queries.insert(query);
        }
    };

    for candidate in NAME_RUN.find_iter(claim).map(|m| m.as_str()) {
        if candidate.chars().count() < MIN_CANDIDATE_CHARS {
            continue;
        }
        push(candidate.to_string());

        for rule in &rules.topic_rules {
            let triggered = rule
                .triggers
                .iter()
                .any(|t| claim_lower.contains(&t.to_lowercase()));
            if triggered {
                for template in &rule.templates {
                    push(template.replace("{name}", candidate));
                }
            }
        }

        let candidate_lower = candidate.to_lowercase();
        for augmentation in rules
            .augmentations
            .iter()
            .filter(|a| a.scope == TriggerScope::Candidate)
        {
            if candidate_lower.contains(&augmentation.trigger.to_lowercase()) {
                augmentation.queries.iter().cloned().for_each(&mut push);
            }
        }
    }

    for augmentation in rules
        .augmentations
        .iter()
        .filter(|a| a.scope == TriggerScope::Claim)
    {
        if claim_lower.contains(&augmentation.trigger.to_lowercase()) {
            augmentation.queries.iter().cloned().for_each(&mut push);
        }
    }

    if !rules.year_template.is_empty() {
        for year in FOUR_DIGITS.find_iter(claim).map(|m| m.as_str()) {
            if rules.years.iter().any(|y| y == year) {
                push(rules.year_template.replace("{year}", year));
            }
        }
    }

    queries.into_iter().collect()
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn default_years() -> Vec<String> {
    strings(&["2024", "2025", "2026"])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_is_first_query() {
        let claim = "The Berlin Wall fell on November 9, 1989.";
        let queries = expand_queries(claim, &QueryRules::english());

        assert_eq!(queries[0], claim);
        assert_eq!(queries[1], "The Berlin Wall");
        assert_eq!(queries[2], "November");
        assert_eq!(queries.len(), 3);
    }

    #[test]
    fn test_chancellor_claim_expands_in_order() {
        let claim = "Friedrich Merz became Chancellor in 2025";
        let queries = expand_queries(claim, &QueryRules::english());

        assert_eq!(
            queries,
            vec![
                claim.to_string(),
                "Friedrich Merz".into(),
                "Friedrich Merz Chancellor Germany".into(),
                "Germany Chancellor current".into(),
                "Chancellor".into(),
                "Chancellor Chancellor Germany".into(),
                "Friedrich Merz Chancellor".into(),
                "Germany Chancellor 2025".into(),
                "Germany politics 2025".into(),
            ]
        );
    }

    #[test]
    fn test_german_candidate_augmentation() {
        let claim = "Angela Merkel hat ein Buch veröffentlicht";
        let queries = expand_queries(claim, &QueryRules::german());

        assert!(queries.contains(&"Angela Merkel Buch Autobiografie".to_string()));
        assert!(queries.contains(&"Angela Merkel Buch 2024 2025".to_string()));
        assert!(queries.contains(&"Angela Merkel Autobiografie Freiheit".to_string()));
    }

    #[test]
    fn test_umlaut_names_are_candidates() {
        let queries = expand_queries("Jürgen Müller wurde gewählt", &QueryRules::german());
        assert_eq!(queries[1], "Jürgen Müller");
    }

    #[test]
    fn test_only_listed_years_produce_year_queries() {
        let queries = expand_queries("in 2026 and 1999 things happened", &QueryRules::english());
        assert!(queries.contains(&"Germany politics 2026".to_string()));
        assert!(!queries.iter().any(|q| q.contains("1999") && q != &queries[0]));
    }

    #[test]
    fn test_duplicates_removed_preserving_first_seen() {
        let queries = expand_queries("2025 2025 2025", &QueryRules::english());
        assert_eq!(queries, vec!["2025 2025 2025", "Germany politics 2025"]);
    }

    #[test]
    fn test_short_candidates_skipped() {
        let queries = expand_queries("Bob ate", &QueryRules::english());
        assert_eq!(queries, vec!["Bob ate"]);
    }

    #[test]
    fn test_rule_set_from_json() {
        let json = r#"{
            "en": {
                "augmentations": [
                    {"trigger": "moon", "scope": "claim", "queries": ["Apollo 11 landing"]}
                ]
            },
            "de": {}
        }"#;

        let rules = QueryRuleSet::from_json(json).unwrap();
        let queries = rules.expand("the moon landing was staged", Language::En);
        assert_eq!(queries, vec!["the moon landing was staged", "Apollo 11 landing"]);

        let queries = rules.expand("Die Mondlandung", Language::De);
        assert_eq!(queries, vec!["Die Mondlandung"]);
    }

    #[test]
    fn test_invalid_rule_json_is_error() {
        assert!(QueryRuleSet::from_json("{\"en\": 3}").is_err());
    }
}
