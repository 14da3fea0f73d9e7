//! Top-level module for the backoff sentence completer.
//!
//! This module provides:
//! - A multi-order n-gram index over a token corpus (`NGramModel`)
//! - Per-context follower lists with memoized counts (`State`)
//! - Stupid-backoff scoring and the generation loop (`Predictor`)
//! - The deterministic / stochastic choice of the next token (`Selection`)

/// Multi-order n-gram index (`n >= 1`).
///
/// Maps every context of 0 to n-1 tokens to the tokens that followed it.
pub mod ngram_model;

/// Stupid-backoff predictor.
///
/// Gathers candidates from every context length, scores them and extends
/// a sentence until a stop condition.
pub mod predictor;

/// Next-token selection strategy and weighted sampling helpers.
pub mod selection;

/// Internal representation of a single context (follower list and counts).
mod state;

pub use state::State;
