//! Claude implementation of the LanguageModel trait.
//!
//! # Example
//!
//! ```rust,ignore
//! use veracity::ai::ClaudeModel;
//!
//! let model = ClaudeModel::new(api_key).with_model("claude-sonnet-4-5-20250929");
//! let verifier = Verifier::new(RetryingModel::new(model), searcher);
//! ```

use async_trait::async_trait;
use llm_client::{AnthropicClient, CompletionRequest, Message};
use std::time::Duration;
use tracing::debug;

use crate::error::{Result, VeracityError};
use crate::security::SecretString;
use crate::traits::model::{LanguageModel, OutputBudget, ANALYSIS_TEMPERATURE};

/// Default Claude model.
pub const DEFAULT_CLAUDE_MODEL: &str = "claude-sonnet-4-5-20250929";

/// Claude-backed language model.
#[derive(Clone)]
pub struct ClaudeModel {
    client: AnthropicClient,
    model: String,
    enabled: bool,
}

impl ClaudeModel {
    /// Create a model for the given API key. A blank key yields a disabled model.
    pub fn new(api_key: impl Into<SecretString>) -> Self {
        let api_key = api_key.into();
        Self {
            enabled: !api_key.is_blank(),
            client: AnthropicClient::new(api_key.expose()),
            model: DEFAULT_CLAUDE_MODEL.to_string(),
        }
    }

    /// Set the model (default: claude-sonnet-4-5-20250929).
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
impl LanguageModel for ClaudeModel {
    fn name(&self) -> &str {
        "claude"
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
            "Claude completion received"
        );
        Ok(completion.content)
    }
}
