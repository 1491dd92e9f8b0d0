//! Language model implementations.
//!
//! Provider adapters (Claude, Mistral) sit behind the `providers` feature.
//! Selection happens once at start-up; everything downstream sees a
//! `Box<dyn LanguageModel>`.

mod retry;

#[cfg(feature = "providers")]
mod claude;
#[cfg(feature = "providers")]
mod mistral;

pub use retry::RetryingModel;

#[cfg(feature = "providers")]
pub use claude::{ClaudeModel, DEFAULT_CLAUDE_MODEL};
#[cfg(feature = "providers")]
pub use mistral::{MistralModel, DEFAULT_MISTRAL_MODEL};

use async_trait::async_trait;
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, VeracityError};
use crate::traits::model::{LanguageModel, OutputBudget};

/// Model used when no provider credential is configured.
///
/// The verifier checks `is_enabled` first and returns the default verdict
/// without calling `generate`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledModel;

#[async_trait]
impl LanguageModel for DisabledModel {
    fn name(&self) -> &str {
        "disabled"
    }

    fn is_enabled(&self) -> bool {
        false
    }

    async fn generate(&self, _prompt: &str, _budget: OutputBudget) -> Result<String> {
        Err(VeracityError::Config("no language model configured".into()))
    }
}

/// Chat-completion provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AiProvider {
    #[default]
    Claude,
    Mistral,
}

impl fmt::Display for AiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AiProvider::Claude => write!(f, "claude"),
            AiProvider::Mistral => write!(f, "mistral"),
        }
    }
}

impl FromStr for AiProvider {
    type Err = VeracityError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "claude" | "anthropic" => Ok(AiProvider::Claude),
            "mistral" => Ok(AiProvider::Mistral),
            other => Err(VeracityError::Config(format!(
                "unknown AI provider '{}' (expected 'claude' or 'mistral')",
                other
            ))),
        }
    }
}

#[cfg(feature = "providers")]
pub use selection::{select_model, ModelSettings};

#[cfg(feature = "providers")]
mod selection {
    use tracing::{info, warn};

    use super::{AiProvider, ClaudeModel, DisabledModel, MistralModel, RetryingModel};
    use super::{DEFAULT_CLAUDE_MODEL, DEFAULT_MISTRAL_MODEL};
    use crate::security::SecretString;
    use crate::traits::model::LanguageModel;
    use crate::types::config::RetryPolicy;

    /// Everything needed to pick and build a model.
    #[derive(Debug, Clone)]
    pub struct ModelSettings {
        pub provider: AiProvider,
        pub anthropic_api_key: Option<SecretString>,
        pub claude_model: String,
        pub mistral_api_key: Option<SecretString>,
        pub mistral_model: String,
        pub retry: RetryPolicy,
    }

    impl Default for ModelSettings {
        fn default() -> Self {
            Self {
                provider: AiProvider::default(),
                anthropic_api_key: None,
                claude_model: DEFAULT_CLAUDE_MODEL.to_string(),
                mistral_api_key: None,
                mistral_model: DEFAULT_MISTRAL_MODEL.to_string(),
                retry: RetryPolicy::default(),
            }
        }
    }

    fn usable(key: &Option<SecretString>) -> Option<&SecretString> {
        key.as_ref().filter(|k| !k.is_blank())
    }

    /// Build the configured model, wrapped with retries.
    ///
    /// Mistral without a Mistral key falls back to Claude. Without any
    /// usable key the result is a [`DisabledModel`].
    pub fn select_model(settings: &ModelSettings) -> Box<dyn LanguageModel> {
        if settings.provider == AiProvider::Mistral {
            if let Some(key) = usable(&settings.mistral_api_key) {
                info!(model = %settings.mistral_model, "Using Mistral");
                let model = MistralModel::new(key.clone()).with_model(&settings.mistral_model);
                return Box::new(RetryingModel::with_policy(model, settings.retry));
            }
            warn!("AI_PROVIDER is mistral but no Mistral API key is set, falling back to Claude");
        }

        match usable(&settings.anthropic_api_key) {
            Some(key) => {
                info!(model = %settings.claude_model, "Using Claude");
                let model = ClaudeModel::new(key.clone()).with_model(&settings.claude_model);
                Box::new(RetryingModel::with_policy(model, settings.retry))
            }
            None => {
                warn!("No language model API key configured, veracity analysis disabled");
                Box::new(DisabledModel)
            }
        }
    }

}
