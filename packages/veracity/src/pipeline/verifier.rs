//! The Verifier - main entry point for claim verification.
//!
//! Sequences query expansion, evidence gathering, prompting, parsing and
//! source reconciliation. Evidence is request-local: it is threaded from
//! the gatherer to the reconciler as a value, so one `Verifier` can serve
//! concurrent verifications.

use chrono::NaiveDate;
use tokio_util::sync::CancellationToken;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::error::{Result, VeracityError};
use crate::pipeline::{
    context::build_search_context,
    gather::gather_evidence,
    parse::parse_verdict_response,
    prompts::{format_prompt_date, format_veracity_prompt},
    queries::QueryRuleSet,
    reconcile::reconcile,
};
use crate::traits::{
    model::{LanguageModel, OutputBudget},
    searcher::WebSearcher,
};
use crate::types::{
    config::VerificationConfig, evidence::EvidenceItem, language::Language, verdict::Verdict,
};

/// Verifies claims against live web evidence.
///
/// # Example
///
/// ```rust,ignore
/// let verifier = Verifier::new(model, searcher);
///
/// let verdict = verifier
///     .analyze_veracity("The Berlin Wall fell on November 9, 1989.", Language::En)
///     .await;
/// println!("{}: {}", verdict.status, verdict.justification);
/// ```
pub struct Verifier<M: LanguageModel, S: WebSearcher> {
    model: M,
    searcher: S,
    config: VerificationConfig,
    rules: QueryRuleSet,
    fixed_date: Option<NaiveDate>,
}

impl<M: LanguageModel, S: WebSearcher> Verifier<M, S> {
    /// Create a verifier with default configuration and query rules.
    pub fn new(model: M, searcher: S) -> Self {
        Self::with_config(model, searcher, VerificationConfig::default())
    }

    /// Create with custom configuration.
    pub fn with_config(model: M, searcher: S, config: VerificationConfig) -> Self {
        Self {
            model,
            searcher,
            config,
            rules: QueryRuleSet::default(),
            fixed_date: None,
        }
    }

    /// Replace the query expansion rules.
    pub fn with_rules(mut self, rules: QueryRuleSet) -> Self {
        self.rules = rules;
        self
    }

    /// Pin the date shown to the model instead of today's.
    pub fn with_fixed_date(mut self, date: NaiveDate) -> Self {
        self.fixed_date = Some(date);
        self
    }

    /// Get a reference to the configuration.
    pub fn config(&self) -> &VerificationConfig {
        &self.config
    }

    /// Get a reference to the query rules.
    pub fn rules(&self) -> &QueryRuleSet {
        &self.rules
    }

    /// Expand a claim into its search queries.
    pub fn expand_queries(&self, claim: &str, language: Language) -> Vec<String> {
        self.rules.expand(claim, language)
    }

    /// Gather and rank evidence for a claim without calling the model.
    pub async fn gather(&self, claim: &str, language: Language) -> Vec<EvidenceItem> {
        gather_evidence(
            &self.searcher,
            claim,
            language,
            self.rules.for_language(language),
            &self.config,
        )
        .await
    }

    /// Verify a claim. Never fails: every failure path degrades to an
    /// `Unverifiable` verdict.
    pub async fn analyze_veracity(&self, claim: &str, language: Language) -> Verdict {
        let span = info_span!(
            "verification",
            verification_id = %Uuid::now_v7(),
            language = %language,
        );
        self.run(claim, language).instrument(span).await
    }

    /// Verify a claim, giving up as soon as the token is cancelled.
    pub async fn analyze_veracity_with_cancel(
        &self,
        claim: &str,
        language: Language,
        cancel: CancellationToken,
    ) -> Result<Verdict> {
        tokio::select! {
            verdict = self.analyze_veracity(claim, language) => Ok(verdict),
            _ = cancel.cancelled() => Err(VeracityError::Cancelled),
        }
    }

    async fn run(&self, claim: &str, language: Language) -> Verdict {
        if !self.model.is_enabled() {
            warn!(model = self.model.name(), "Language model not configured, returning default verdict");
            return Verdict::unavailable();
        }

        info!(claim_chars = claim.chars().count(), "Starting veracity analysis");

        let evidence = self.gather(claim, language).await;
        let search_context = build_search_context(&evidence, language);

        let today = self
            .fixed_date
            .unwrap_or_else(|| chrono::Local::now().date_naive());
        let prompt = format_veracity_prompt(
            claim,
            &format_prompt_date(today, language),
            &search_context,
            language,
        );

        let response = match self.model.generate(&prompt, OutputBudget::High).await {
            Ok(response) => response,
            Err(e) => {
                warn!(model = self.model.name(), error = %e, "Veracity analysis failed, returning default verdict");
                return Verdict::unavailable();
            }
        };
        info!(response_chars = response.chars().count(), "Received model response");

        let verdict = match parse_verdict_response(&response) {
            Some(parsed) => reconcile(parsed, &evidence, &self.config),
            None => Verdict::parse_failure(),
        };

        info!(
            status = %verdict.status,
            sources = verdict.sources.len(),
            evidence = evidence.len(),
            "Veracity analysis complete"
        );
        verdict
    }
}
