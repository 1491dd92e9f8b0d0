//! Verification pipeline - the core of the library.
//!
//! The pipeline runs, per claim:
//! - Query expansion (claim → targeted search queries)
//! - Evidence gathering (paced search, dedupe by url)
//! - Evidence ranking (quality gate, claim-word scoring, top-N)
//! - Prompting (search context + veracity template)
//! - Verdict parsing (layered JSON recovery)
//! - Source reconciliation (no fabricated citations)

pub mod context;
pub mod gather;
pub mod parse;
pub mod prompts;
pub mod queries;
pub mod rank;
pub mod reconcile;
pub mod verifier;

pub use context::{build_search_context, sanitize};
pub use gather::{dedupe_by_url, gather_evidence};
pub use parse::{
    parse_verdict, parse_verdict_response, repair_json_strings, DEFAULT_JUSTIFICATION,
    DEFAULT_VERIFICATION_METHOD,
};
pub use prompts::{format_prompt_date, format_veracity_prompt, VERACITY_PROMPT_DE, VERACITY_PROMPT_EN};
pub use queries::{expand_queries, Augmentation, QueryRuleSet, QueryRules, TopicRule, TriggerScope};
pub use rank::rank_evidence;
pub use reconcile::{reconcile, reconstruct_sources};
pub use verifier::Verifier;
