//! Sentence completion with a stupid-backoff n-gram language model.
//!
//! This crate provides:
//! - A multi-order n-gram model built from an already tokenized corpus
//! - A backoff predictor that extends a partial sentence up to ten tokens
//!   or until a terminal punctuation token is produced
//! - Deterministic (best score) or stochastic (score-weighted) selection
//! - Small I/O helpers to load whitespace-tokenized corpora
//!
//! The high-level entry point is [`finish_sentence`].

/// Error type shared by the crate.
pub mod error;

/// Corpus loading and whitespace tokenization.
pub mod io;

/// Core n-gram model, scoring and generation logic.
pub mod model;

pub use error::{MtgError, Result};
pub use model::ngram_model::NGramModel;
pub use model::predictor::{ALPHA, MAX_SENTENCE_LENGTH, Predictor, TERMINAL_TOKENS};
pub use model::selection::Selection;

/// Extends `sentence` with tokens predicted from `corpus` using an
/// order-`n` backoff model.
///
/// With `randomize == false` the output is fully determined by the inputs.
/// With `randomize == true` each token is drawn proportionally to its score.
///
/// # Errors
/// Returns `MtgError::InvalidOrder` if `n < 1`.
pub fn finish_sentence(sentence: &[String], n: usize, corpus: &[String], randomize: bool) -> Result<Vec<String>> {
	finish_sentence_with(sentence, n, corpus, &Selection::from_randomize(randomize))
}

/// Same as [`finish_sentence`] with an explicit selection strategy, which
/// allows seeding stochastic completion.
///
/// # Errors
/// Returns `MtgError::InvalidOrder` if `n < 1`.
pub fn finish_sentence_with(
	sentence: &[String],
	n: usize,
	corpus: &[String],
	selection: &Selection,
) -> Result<Vec<String>> {
	let model = NGramModel::new(corpus, n)?;
	Ok(Predictor::new(&model).predict(sentence, selection))
}
