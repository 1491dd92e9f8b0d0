//! Evidence-Grounded Claim Verification Library
//!
//! Turns a short text claim into a veracity verdict backed by live web
//! search results rather than a model's training knowledge.
//!
//! # Design Philosophy
//!
//! **"Degrade, never crash"**
//!
//! - Search failures shrink the evidence, they never abort a verification
//! - Model output is parsed best-effort, with a fixed verdict on failure
//! - Every cited source must come from gathered evidence
//! - Providers sit behind traits; pipeline logic is provider-agnostic
//!
//! # Usage
//!
//! ```rust,ignore
//! use veracity::{Language, Verifier};
//! use veracity::ai::{ClaudeModel, RetryingModel};
//! use veracity::searchers::BraveSearcher;
//!
//! let model = RetryingModel::new(ClaudeModel::new(anthropic_key));
//! let searcher = BraveSearcher::new(brave_key)?;
//! let verifier = Verifier::new(model, searcher);
//!
//! let verdict = verifier
//!     .analyze_veracity("The Berlin Wall fell on November 9, 1989.", Language::En)
//!     .await;
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Core trait abstractions (LanguageModel, WebSearcher)
//! - [`types`] - Evidence, verdict, language and configuration types
//! - [`pipeline`] - Query expansion through source reconciliation
//! - [`searchers`] - Search providers (Brave, disabled)
//! - [`ai`] - Model adapters, retries and provider selection
//! - [`security`] - Credential handling
//! - [`testing`] - Mock implementations for testing

pub mod ai;
pub mod error;
pub mod pipeline;
pub mod searchers;
pub mod security;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use error::{Result, SearchError, SearchResult, VeracityError};
pub use pipeline::{QueryRuleSet, QueryRules, Verifier};
pub use security::SecretString;
pub use traits::{
    model::{LanguageModel, OutputBudget},
    searcher::{MockWebSearcher, WebSearcher},
};
pub use types::{
    config::{RetryPolicy, VerificationConfig},
    evidence::EvidenceItem,
    language::Language,
    verdict::{Source, VeracityStatus, Verdict},
};
