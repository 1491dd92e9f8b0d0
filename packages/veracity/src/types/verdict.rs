//! Verdict types - the structured outcome of a fact check.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::evidence::EvidenceItem;

/// Justification used when no analysis could be produced.
pub const UNAVAILABLE_JUSTIFICATION: &str = "Analysis not available";
/// Verification method used when no analysis could be produced.
pub const UNAVAILABLE_METHOD: &str = "Default method used";
/// Justification used when the model response could not be parsed.
pub const PARSE_FAILURE_JUSTIFICATION: &str = "Invalid JSON response from analysis";
/// Verification method used when the model response could not be parsed.
pub const PARSE_FAILURE_METHOD: &str = "Parse error";

/// Veracity status of a claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum VeracityStatus {
    /// Evidence supports the claim.
    #[serde(rename = "Factually Correct")]
    FactuallyCorrect,

    /// Evidence contradicts the claim.
    Untruth,

    /// Technically true in parts but framed to mislead.
    Misleading,

    /// Evidence neither supports nor contradicts the claim.
    #[default]
    Unverifiable,
}

impl VeracityStatus {
    /// All statuses in canonical order.
    pub const ALL: [VeracityStatus; 4] = [
        VeracityStatus::FactuallyCorrect,
        VeracityStatus::Untruth,
        VeracityStatus::Misleading,
        VeracityStatus::Unverifiable,
    ];

    /// Canonical wire string.
    pub fn as_str(&self) -> &'static str {
        match self {
            VeracityStatus::FactuallyCorrect => "Factually Correct",
            VeracityStatus::Untruth => "Untruth",
            VeracityStatus::Misleading => "Misleading",
            VeracityStatus::Unverifiable => "Unverifiable",
        }
    }

    /// Match a canonical wire string exactly.
    pub fn from_canonical(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == s)
    }
}

impl fmt::Display for VeracityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A citation attached to a verdict.
///
/// Always derived from an [`EvidenceItem`] gathered for the same claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

impl Source {
    /// Create a new source.
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        snippet: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            snippet: snippet.into(),
        }
    }

    /// Build a source from evidence, keeping at most `max_snippet_chars` of the snippet.
    pub fn from_evidence(item: &EvidenceItem, max_snippet_chars: usize) -> Self {
        Self {
            title: item.title.clone(),
            url: item.url.clone(),
            snippet: item.snippet.chars().take(max_snippet_chars).collect(),
        }
    }
}

/// The final structured fact-check outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub status: VeracityStatus,
    pub justification: String,
    pub verification_method: String,
    #[serde(default)]
    pub sources: Vec<Source>,
}

impl Verdict {
    /// Create a verdict without sources.
    pub fn new(
        status: VeracityStatus,
        justification: impl Into<String>,
        verification_method: impl Into<String>,
    ) -> Self {
        Self {
            status,
            justification: justification.into(),
            verification_method: verification_method.into(),
            sources: Vec::new(),
        }
    }

    /// Attach sources.
    pub fn with_sources(mut self, sources: Vec<Source>) -> Self {
        self.sources = sources;
        self
    }

    /// Verdict returned when the model is unavailable or failed.
    pub fn unavailable() -> Self {
        Self::new(
            VeracityStatus::Unverifiable,
            UNAVAILABLE_JUSTIFICATION,
            UNAVAILABLE_METHOD,
        )
    }

    /// Verdict returned when no parse layer could recover the response.
    pub fn parse_failure() -> Self {
        Self::new(
            VeracityStatus::Unverifiable,
            PARSE_FAILURE_JUSTIFICATION,
            PARSE_FAILURE_METHOD,
        )
    }
}
