//! Retrying model wrapper.
//!
//! Wraps any LanguageModel with exponential backoff.

use async_trait::async_trait;
use tracing::warn;

use crate::error::Result;
use crate::traits::model::{LanguageModel, OutputBudget};
use crate::types::config::RetryPolicy;

/// A model wrapper that retries failed calls.
///
/// Waits `base_delay`, then `2 * base_delay`, and so on between attempts.
/// The last failure is returned to the caller.
pub struct RetryingModel<M: LanguageModel> {
    inner: M,
    policy: RetryPolicy,
}

impl<M: LanguageModel> RetryingModel<M> {
    /// Wrap a model with the default policy (3 attempts, 1s base delay).
    pub fn new(model: M) -> Self {
        Self::with_policy(model, RetryPolicy::default())
    }

    /// Wrap a model with a custom policy.
    pub fn with_policy(model: M, policy: RetryPolicy) -> Self {
        Self {
            inner: model,
            policy,
        }
    }

    /// Get a reference to the inner model.
    pub fn inner(&self) -> &M {
        &self.inner
    }

    /// Unwrap and return the inner model.
    pub fn into_inner(self) -> M {
        self.inner
    }
}

#[async_trait]
impl<M: LanguageModel> LanguageModel for RetryingModel<M> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn is_enabled(&self) -> bool {
        self.inner.is_enabled()
    }

    async fn generate(&self, prompt: &str, budget: OutputBudget) -> Result<String> {
        let attempts = self.policy.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            match self.inner.generate(prompt, budget).await {
                Ok(text) => return Ok(text),
                Err(e) if attempt + 1 >= attempts => {
                    warn!(model = self.inner.name(), attempts, error = %e, "Model call failed, giving up");
                    return Err(e);
                }
                Err(e) => {
                    let delay = self.policy.delay_for(attempt);
                    warn!(
                        model = self.inner.name(),
                        attempt = attempt + 1,
                        attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Model call failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
