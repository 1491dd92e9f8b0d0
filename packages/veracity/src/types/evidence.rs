//! Evidence types - web search results gathered for a claim.

use serde::{Deserialize, Serialize};

/// One web search result candidate.
///
/// Identity is the exact `url` string (case-sensitive); two items with the
/// same url are the same evidence regardless of title or snippet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceItem {
    /// Result title (HTML stripped)
    #[serde(default)]
    pub title: String,

    /// Result URL
    pub url: String,

    /// Result description (HTML stripped)
    #[serde(default)]
    pub snippet: String,

    /// Provider-reported age ("2 days ago"), if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<String>,
}

impl EvidenceItem {
    /// Create a new evidence item.
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        snippet: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            snippet: snippet.into(),
            age: None,
        }
    }

    /// Set the provider-reported age.
    pub fn with_age(mut self, age: impl Into<String>) -> Self {
        let age = age.into();
        self.age = (!age.is_empty()).then_some(age);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_age_is_none() {
        let item = EvidenceItem::new("t", "https://a.org", "s").with_age("");
        assert!(item.age.is_none());

        let item = item.with_age("3 days ago");
        assert_eq!(item.age.as_deref(), Some("3 days ago"));
    }

    #[test]
    fn test_age_omitted_from_json_when_absent() {
        let item = EvidenceItem::new("t", "https://a.org", "s");
        let json = serde_json::to_value(&item).unwrap();
        assert!(json.get("age").is_none());
    }
}
