//! Configuration types for the verification pipeline.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tuning for evidence gathering, ranking and source reconciliation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationConfig {
    /// Maximum expanded queries actually sent to the search provider.
    ///
    /// Default: 8.
    pub max_queries: usize,

    /// Results requested per query.
    ///
    /// Default: 3.
    pub results_per_query: usize,

    /// Size cap of the ranked evidence set handed to the model.
    ///
    /// Default: 5.
    pub max_evidence: usize,

    /// Delay inserted before every query after the first.
    ///
    /// Default: 250ms.
    #[serde(with = "duration_millis")]
    pub query_pacing: Duration,

    /// Snippets shorter than this (after trimming) are dropped unscored.
    pub min_snippet_chars: usize,

    /// URLs shorter than this (after trimming) are dropped unscored.
    pub min_url_chars: usize,

    /// Justification keywords an evidence item must share to be cited
    /// during reconciliation.
    pub reconcile_min_overlap: usize,

    /// Evidence items cited unconditionally when none reaches the overlap.
    pub reconcile_fallback_sources: usize,

    /// Snippet length kept on reconciled sources.
    pub reconcile_snippet_chars: usize,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            max_queries: 8,
            results_per_query: 3,
            max_evidence: 5,
            query_pacing: Duration::from_millis(250),
            min_snippet_chars: 50,
            min_url_chars: 5,
            reconcile_min_overlap: 2,
            reconcile_fallback_sources: 2,
            reconcile_snippet_chars: 200,
        }
    }
}

impl VerificationConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the query cap.
    pub fn with_max_queries(mut self, max: usize) -> Self {
        self.max_queries = max;
        self
    }

    /// Set the evidence cap.
    pub fn with_max_evidence(mut self, max: usize) -> Self {
        self.max_evidence = max;
        self
    }

    /// Set the inter-query pacing delay.
    pub fn with_query_pacing(mut self, pacing: Duration) -> Self {
        self.query_pacing = pacing;
        self
    }
}

/// Exponential backoff policy for model calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,

    /// Delay after the first failure; doubles after each further failure.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Delay to wait after the given zero-based failed attempt.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(1u32 << attempt.min(16))
    }

    /// Policy with no waiting between attempts.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            base_delay: Duration::ZERO,
        }
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}
