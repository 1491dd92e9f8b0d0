//! Mistral implementation of the LanguageModel trait.
//!
//! # Example
//!
//! ```rust,ignore
//! use veracity::ai::MistralModel;
//!
//! let model = MistralModel::new(api_key).with_model("mistral-large-latest");
//! let verifier = Verifier::new(RetryingModel::new(model), searcher);
//! ```

use async_trait::async_trait;
use llm_client::{CompletionRequest, Message, MistralClient};
use std::time::Duration;
use tracing::debug;

use crate::error::{Result, VeracityError};
use crate::security::SecretString;
use crate::traits::model::{LanguageModel, OutputBudget, ANALYSIS_TEMPERATURE};

/// Default Mistral model.
pub const DEFAULT_MISTRAL_MODEL: &str = "mistral-large-latest";

/// Mistral-backed language model.
#[derive(Clone)]
pub struct MistralModel {
    client: MistralClient,
    model: String,
    enabled: bool,
}

impl MistralModel {
    /// Create a model for the given API key. A blank key yields a disabled model.
    pub fn new(api_key: impl Into<SecretString>) -> Self {
        let api_key = api_key.into();
        Self {
            enabled: !api_key.is_blank(),
            client: MistralClient::new(api_key.expose()),
            model: DEFAULT_MISTRAL_MODEL.to_string(),
        }
    }

    /// Set the model (default: mistral-large-latest).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set a custom base URL (for proxies, gateways, etc.).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.client = self.client.with_base_url(url);
        self
    }

    /// Bound each provider call; a timed-out call counts as a failed attempt.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = self.client.with_timeout(timeout);
        self
    }

    /// Get the current model name.
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl LanguageModel for MistralModel {
    fn name(&self) -> &str {
        "mistral"
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    async fn generate(&self, prompt: &str, budget: OutputBudget) -> Result<String> {
        let request = CompletionRequest::new(&self.model)
            .message(Message::user(prompt))
            .max_tokens(budget.max_tokens())
            .temperature(ANALYSIS_TEMPERATURE);

        let completion = self
            .client
            .complete(&request)
            .await
            .map_err(VeracityError::model)?;

        debug!(
            model = %self.model,
            chars = completion.content.len(),
            input_tokens = completion.usage.map(|u| u.input_tokens),
            output_tokens = completion.usage.map(|u| u.output_tokens),
            "Mistral completion received"
        );
        Ok(completion.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_key_disables() {
        assert!(!MistralModel::new("").is_enabled());
        assert!(!MistralModel::new("   ").is_enabled());
        assert!(MistralModel::new("mistral-test").is_enabled());
    }

    #[test]
    fn test_model_override() {
        let model = MistralModel::new("k").with_model("mistral-small-latest");
        assert_eq!(model.model(), "mistral-small-latest");
        assert_eq!(MistralModel::new("k").model(), DEFAULT_MISTRAL_MODEL);
    }
}
