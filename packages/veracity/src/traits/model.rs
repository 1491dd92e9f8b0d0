//! Language model trait.
//!
//! The pipeline needs exactly one capability from an LLM: prompt in, raw
//! text out. Provider identity (Claude, Mistral, a test double) never leaks
//! past this trait, so the search, ranking, parsing and reconciliation
//! stages are shared by every provider.

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::Result;

/// How much output the caller expects from a prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputBudget {
    /// Short single-shot answers.
    #[default]
    Standard,

    /// Long structured answers such as veracity verdicts with sources.
    High,
}

impl OutputBudget {
    /// Maximum completion tokens for this budget.
    pub fn max_tokens(&self) -> u32 {
        match self {
            OutputBudget::Standard => 1000,
            OutputBudget::High => 4096,
        }
    }
}

/// Sampling temperature used for every analysis prompt.
pub const ANALYSIS_TEMPERATURE: f32 = 0.1;

/// Language model trait.
///
/// Implementations wrap specific providers and return the model's raw text.
/// Interpreting that text is the caller's job.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Provider name for logging.
    fn name(&self) -> &str;

    /// Whether the model can be called at all (a credential is configured).
    fn is_enabled(&self) -> bool {
        true
    }

    /// Generate a completion for the prompt.
    async fn generate(&self, prompt: &str, budget: OutputBudget) -> Result<String>;
}

#[async_trait]
impl<T: LanguageModel + ?Sized> LanguageModel for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn is_enabled(&self) -> bool {
        (**self).is_enabled()
    }

    async fn generate(&self, prompt: &str, budget: OutputBudget) -> Result<String> {
        (**self).generate(prompt, budget).await
    }
}

#[async_trait]
impl<T: LanguageModel + ?Sized> LanguageModel for Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn is_enabled(&self) -> bool {
        (**self).is_enabled()
    }

    async fn generate(&self, prompt: &str, budget: OutputBudget) -> Result<String> {
        (**self).generate(prompt, budget).await
    }
}
