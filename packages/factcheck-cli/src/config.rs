use anyhow::{bail, Context, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;

use veracity::ai::{AiProvider, ModelSettings, DEFAULT_CLAUDE_MODEL, DEFAULT_MISTRAL_MODEL};
use veracity::searchers::{BraveSearcher, DisabledSearcher};
use veracity::{QueryRuleSet, RetryPolicy, SecretString, WebSearcher};

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub ai_provider: AiProvider,
    pub anthropic_api_key: Option<SecretString>,
    pub claude_model: String,
    pub mistral_api_key: Option<SecretString>,
    pub mistral_model: String,
    pub brave_api_key: Option<SecretString>,
    pub enable_web_search: bool,
    pub query_rules_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Self {
            ai_provider: non_empty("AI_PROVIDER")
                .unwrap_or_else(|| "claude".to_string())
                .parse()
                .context("AI_PROVIDER must be 'claude' or 'mistral'")?,
            anthropic_api_key: non_empty("ANTHROPIC_API_KEY").map(SecretString::from),
            claude_model: non_empty("CLAUDE_MODEL")
                .unwrap_or_else(|| DEFAULT_CLAUDE_MODEL.to_string()),
            mistral_api_key: non_empty("MISTRAL_API_KEY").map(SecretString::from),
            mistral_model: non_empty("MISTRAL_MODEL")
                .unwrap_or_else(|| DEFAULT_MISTRAL_MODEL.to_string()),
            brave_api_key: non_empty("BRAVE_API_KEY").map(SecretString::from),
            enable_web_search: match non_empty("ENABLE_WEB_SEARCH") {
                Some(value) => {
                    parse_bool(&value).context("ENABLE_WEB_SEARCH must be true or false")?
                }
                None => true,
            },
            query_rules_path: non_empty("QUERY_RULES_PATH").map(PathBuf::from),
        })
    }

    /// Settings for model selection.
    pub fn model_settings(&self) -> ModelSettings {
        ModelSettings {
            provider: self.ai_provider,
            anthropic_api_key: self.anthropic_api_key.clone(),
            claude_model: self.claude_model.clone(),
            mistral_api_key: self.mistral_api_key.clone(),
            mistral_model: self.mistral_model.clone(),
            retry: RetryPolicy::default(),
        }
    }

    /// Build the configured search provider.
    pub fn searcher(&self) -> Result<Box<dyn WebSearcher>> {
        if !self.enable_web_search {
            tracing::warn!("Web search disabled by ENABLE_WEB_SEARCH");
            return Ok(Box::new(DisabledSearcher));
        }

        match &self.brave_api_key {
            Some(key) => {
                let searcher = BraveSearcher::new(key.expose())
                    .context("Failed to build Brave search client")?;
                Ok(Box::new(searcher))
            }
            None => {
                tracing::warn!("BRAVE_API_KEY not set, web search disabled");
                Ok(Box::new(DisabledSearcher))
            }
        }
    }

    /// Load query rules from `QUERY_RULES_PATH`, or the built-in rules.
    pub fn query_rules(&self) -> Result<QueryRuleSet> {
        let Some(path) = &self.query_rules_path else {
            return Ok(QueryRuleSet::default());
        };

        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read query rules from {}", path.display()))?;
        QueryRuleSet::from_json(&json)
            .with_context(|| format!("Invalid query rules in {}", path.display()))
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => bail!("invalid boolean '{}'", other),
    }
}
