use super::state::State;
use crate::error::{MtgError, Result};
use log::info;
use std::collections::HashMap;

/// Represents a multi-order n-gram index over a token corpus.
///
/// The `NGramModel` stores one state per context key, for every context
/// length from 0 (the unigram context) up to `n-1`, and gives access to the
/// followers and occurrence counts observed after each key.
///
/// # Responsibilities
/// - Build the index from a flat token sequence
/// - Answer follower and count queries for any context key
///
/// # Invariants
/// - `n` is always >= 1
/// - The empty context is always present and maps to the whole corpus
/// - A key of length k only maps to tokens that followed that exact k-token
///   window somewhere in the corpus
/// - The model is never mutated once built; count tables are memoized
///   lazily inside each state
#[derive(Clone, Debug)]
pub struct NGramModel {
	/// The order of the model (context keys hold at most n-1 tokens)
	n: usize, // must be >= 1

	/// Mapping from a context key to its corresponding state
	states: HashMap<Vec<String>, State>,
}

impl NGramModel {
	/// Builds an n-gram model of order `n` from `corpus`.
	///
	/// Every sliding window of the corpus contributes one observation per
	/// context length. Follower lists keep corpus scan order.
	///
	/// # Errors
	/// Returns `MtgError::InvalidOrder` if `n < 1`.
	pub fn new(corpus: &[String], n: usize) -> Result<Self> {
		if n < 1 {
			return Err(MtgError::InvalidOrder(n));
		}

		let mut states = HashMap::new();

		let mut unigram = State::new();
		unigram.extend_followers(corpus);
		states.insert(Vec::new(), unigram);

		// For each context length
		for k in 1..n {
			if corpus.len() <= k {
				// Corpus too short, no window of k tokens has a follower
				break;
			}
			for i in 0..corpus.len() - k {
				let prefix = &corpus[i..i + k];
				let state = states.entry(prefix.to_vec()).or_insert_with(State::new);
				state.add_follower(&corpus[i + k]);
			}
		}

		let model = Self { n, states };
		info!(
			"Built {}-gram model: {} tokens, {} contexts, {} distinct tokens",
			n,
			corpus.len(),
			model.states.len(),
			model.vocabulary_size()
		);
		Ok(model)
	}

	/// Returns the order of the model.
	pub fn n(&self) -> usize {
		self.n
	}

	/// Returns the state for a context key, if that key was ever observed.
	pub fn state(&self, context: &[String]) -> Option<&State> {
		self.states.get(context)
	}

	/// Returns `true` if the context key was observed in the corpus.
	pub fn contains(&self, context: &[String]) -> bool {
		self.states.contains_key(context)
	}

	/// Returns the followers observed after `context`, in corpus order.
	///
	/// Unknown keys have no followers.
	pub fn followers(&self, context: &[String]) -> &[String] {
		self.state(context).map(State::followers).unwrap_or(&[])
	}

	/// Returns the memoized occurrence counts for `context`.
	pub fn counts(&self, context: &[String]) -> Option<&HashMap<String, usize>> {
		self.state(context).map(State::counts)
	}

	/// Returns how many times `token` followed `context`.
	pub fn count(&self, token: &str, context: &[String]) -> usize {
		self.state(context).map_or(0, |state| state.count(token))
	}

	/// Returns the number of observations recorded for `context`.
	pub fn total(&self, context: &[String]) -> usize {
		self.state(context).map_or(0, State::total)
	}

	/// Returns the number of tokens in the corpus the model was built from.
	pub fn corpus_len(&self) -> usize {
		self.total(&[])
	}

	/// Returns the number of distinct tokens in the corpus.
	pub fn vocabulary_size(&self) -> usize {
		self.counts(&[]).map_or(0, HashMap::len)
	}

	/// Returns `true` if the model was built from an empty corpus.
	pub fn is_empty(&self) -> bool {
		self.corpus_len() == 0
	}

	/// Returns the context key used to extend `sentence`: its last
	/// `n-1` tokens, or the whole sentence if it is shorter.
	pub fn context_of<'s>(&self, sentence: &'s [String]) -> &'s [String] {
		context_of(sentence, self.n)
	}
}

/// Returns the last `min(n-1, len)` tokens of `sentence`.
///
/// For `n <= 1` this is always the empty (unigram) context.
pub fn context_of(sentence: &[String], n: usize) -> &[String] {
	let width = n.saturating_sub(1);
	&sentence[sentence.len().saturating_sub(width)..]
}
