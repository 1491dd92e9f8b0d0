//! Core trait abstractions for the verification library.
//!
//! These traits define the two external capabilities the pipeline consumes:
//! a language model and a web search provider.

pub mod model;
pub mod searcher;
