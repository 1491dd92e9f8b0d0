//! Data types for the verification pipeline.

pub mod config;
pub mod evidence;
pub mod language;
pub mod verdict;
