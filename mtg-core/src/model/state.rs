use std::collections::HashMap;
use std::sync::OnceLock;

/// Represents a context in the backoff model.
///
/// A `State` is stored under a context key (0 to n-1 tokens) and holds
/// every token observed immediately after an occurrence of that key, in
/// corpus scan order.
///
/// ## Responsibilities:
/// - Accumulate follower observations while the model is built
/// - Expose per-token occurrence counts, computed once on first query
///
/// ## Invariants
/// - All followers belong to the key the state is stored under
/// - Duplicates are kept: the follower list is a multiset, not a set
/// - Once `counts` is populated, `followers` is never mutated again
#[derive(Clone, Debug, Default)]
pub struct State {
	/// Observed followers in corpus order.
	/// Example: ["b", "b", "c"]
	followers: Vec<String>,
	/// Memoized occurrence counts derived from `followers`.
	/// Example: { "b" => 2, "c" => 1 }
	counts: OnceLock<HashMap<String, usize>>,
}

impl State {
	/// Creates a new empty state.
	pub fn new() -> Self {
		Self {
			followers: Vec::new(),
			counts: OnceLock::new(),
		}
	}

	/// Records an occurrence of `token` following this context.
	///
	/// Only called while the model is being built, before any count query.
	pub(crate) fn add_follower(&mut self, token: &str) {
		debug_assert!(self.counts.get().is_none(), "state mutated after counts were memoized");
		self.followers.push(token.to_owned());
	}

	/// Records a whole run of followers at once (used for the unigram context).
	pub(crate) fn extend_followers(&mut self, tokens: &[String]) {
		debug_assert!(self.counts.get().is_none(), "state mutated after counts were memoized");
		self.followers.extend_from_slice(tokens);
	}

	/// Returns the followers in the order they were observed.
	pub fn followers(&self) -> &[String] {
		&self.followers
	}

	/// Returns the occurrence count of each follower.
	///
	/// The table is built on the first call and reused afterwards.
	pub fn counts(&self) -> &HashMap<String, usize> {
		self.counts.get_or_init(|| {
			let mut counts = HashMap::new();
			for token in &self.followers {
				*counts.entry(token.clone()).or_insert(0) += 1;
			}
			counts
		})
	}

	/// Returns how many times `token` followed this context.
	pub fn count(&self, token: &str) -> usize {
		self.counts().get(token).copied().unwrap_or(0)
	}

	/// Returns the total number of observations for this context.
	pub fn total(&self) -> usize {
		self.followers.len()
	}
}
