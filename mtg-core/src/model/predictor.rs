use super::ngram_model::NGramModel;
use super::selection::Selection;
use log::debug;
use rand::Rng;
use std::collections::HashSet;

/// Stupid-backoff discount applied once per dropped context token.
pub const ALPHA: f64 = 0.4;

/// Total sentence length at which generation stops.
pub const MAX_SENTENCE_LENGTH: usize = 10;

/// Tokens that end a sentence.
pub const TERMINAL_TOKENS: [&str; 3] = [".", "?", "!"];

/// Returns `true` if `token` ends a sentence.
pub fn is_terminal(token: &str) -> bool {
	TERMINAL_TOKENS.contains(&token)
}

/// Extends token sequences using stupid-backoff scoring over an `NGramModel`.
///
/// # Responsibilities
/// - Gather candidates from every context length, longest first
/// - Score candidates with discounted maximum-likelihood estimates
/// - Run the generation loop until no candidate, the length cap, or a
///   terminal token
///
/// Count lookups go through the model's memoized per-context tables, so the
/// cache lives and dies with the model it was built from.
#[derive(Clone, Copy, Debug)]
pub struct Predictor<'m> {
	model: &'m NGramModel,
}

impl<'m> Predictor<'m> {
	/// Creates a predictor reading from `model`.
	pub fn new(model: &'m NGramModel) -> Self {
		Self { model }
	}

	/// Returns the model this predictor reads from.
	pub fn model(&self) -> &'m NGramModel {
		self.model
	}

	/// Collects every token observed after `context` or any of its suffixes.
	///
	/// The full key is tried first, then the oldest token is dropped until the
	/// empty key is reached. Tokens are kept in first-seen order, without
	/// duplicates. Shorter contexts are always unioned in, even when a longer
	/// one already produced candidates.
	pub fn candidates(&self, context: &[String]) -> Vec<&'m str> {
		let model = self.model;
		let mut seen = HashSet::new();
		let mut candidates = Vec::new();

		for start in 0..=context.len() {
			for token in model.followers(&context[start..]) {
				if seen.insert(token.as_str()) {
					candidates.push(token.as_str());
				}
			}
		}

		// The union already covers the empty key; this only matters for an empty model
		if candidates.is_empty() {
			for token in model.followers(&[]) {
				if seen.insert(token.as_str()) {
					candidates.push(token.as_str());
				}
			}
		}

		candidates
	}

	/// Scores `token` after `context` with stupid backoff.
	///
	/// - Seen at `context`: count / total at `context`
	/// - Unseen and `context` is empty: unigram frequency, or 0.0 for an
	///   empty corpus
	/// - Otherwise: `ALPHA` times the score at `context` minus its oldest token
	///
	/// The result ranks candidates; it is not normalized.
	pub fn score(&self, token: &str, context: &[String]) -> f64 {
		if let Some(state) = self.model.state(context) {
			let count = state.count(token);
			let total = state.total();
			if count > 0 && total > 0 {
				return count as f64 / total as f64;
			}
		}

		if context.is_empty() {
			let total = self.model.total(&[]);
			if total == 0 {
				return 0.0;
			}
			return self.model.count(token, &[]) as f64 / total as f64;
		}

		// Recursion depth is bounded by the context length
		ALPHA * self.score(token, &context[1..])
	}

	/// Scores every candidate for `context`, in candidate order.
	pub fn scored_candidates(&self, context: &[String]) -> Vec<(&'m str, f64)> {
		self.candidates(context)
			.into_iter()
			.map(|token| (token, self.score(token, context)))
			.collect()
	}

	/// Picks the token following `context`.
	///
	/// Returns `None` if there is no candidate at all.
	pub fn next_token<R: Rng + ?Sized>(
		&self,
		context: &[String],
		selection: &Selection,
		rng: &mut R,
	) -> Option<&'m str> {
		let scored = self.scored_candidates(context);
		selection.pick(&scored, rng)
	}

	/// Extends `sentence` until a stop condition, seeding randomness from
	/// `selection`.
	pub fn predict(&self, sentence: &[String], selection: &Selection) -> Vec<String> {
		let mut rng = selection.make_rng();
		self.predict_with_rng(sentence, selection, &mut rng)
	}

	/// Extends `sentence` one token at a time.
	///
	/// Stops when:
	/// - no candidate exists for the current context
	/// - the sentence reaches `MAX_SENTENCE_LENGTH` tokens
	/// - the appended token is terminal (`.`, `?`, `!`)
	///
	/// A sentence already at the length cap is returned unchanged.
	pub fn predict_with_rng<R: Rng + ?Sized>(
		&self,
		sentence: &[String],
		selection: &Selection,
		rng: &mut R,
	) -> Vec<String> {
		let mut sentence = sentence.to_vec();
		if sentence.len() >= MAX_SENTENCE_LENGTH {
			debug!("Sentence already has {} tokens, nothing to add", sentence.len());
			return sentence;
		}

		loop {
			let context = self.model.context_of(&sentence);
			let Some(next) = self.next_token(context, selection, rng) else {
				debug!("No candidate after {:?}, stopping", context);
				break;
			};

			sentence.push(next.to_owned());
			debug!("Appended {:?} ({} tokens)", next, sentence.len());

			if sentence.len() >= MAX_SENTENCE_LENGTH {
				debug!("Length cap reached");
				break;
			}
			if is_terminal(next) {
				debug!("Terminal token {:?} reached", next);
				break;
			}
		}

		sentence
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	fn tokens(words: &[&str]) -> Vec<String> {
		words.iter().map(|w| w.to_string()).collect()
	}

	fn model(words: &[&str], n: usize) -> NGramModel {
		NGramModel::new(&tokens(words), n).unwrap()
	}

	const EPSILON: f64 = 1e-12;

	#[test]
	fn score_uses_longest_matching_context() {
		let model = model(&["a", "b", "a", "b", "a", "c"], 2);
		let predictor = Predictor::new(&model);

		let ctx = tokens(&["a"]);
		assert!((predictor.score("b", &ctx) - 2.0 / 3.0).abs() < EPSILON);
		assert!((predictor.score("c", &ctx) - 1.0 / 3.0).abs() < EPSILON);
	}

	#[test]
	fn score_backs_off_with_alpha() {
		let model = model(&["a", "b", "a", "b", "a", "c"], 2);
		let predictor = Predictor::new(&model);

		// "a" never follows "a": 0.4 * unigram(a) = 0.4 * 3/6
		let ctx = tokens(&["a"]);
		assert!((predictor.score("a", &ctx) - ALPHA * 0.5).abs() < EPSILON);
	}

	#[test]
	fn score_backs_off_twice_for_unknown_context() {
		let model = model(&["x", "y", "z", "x", "y", "w"], 3);
		let predictor = Predictor::new(&model);

		// ("q", "y") is unknown, "y" is followed by "z" and "w"
		let ctx = tokens(&["q", "y"]);
		assert!((predictor.score("z", &ctx) - ALPHA * 0.5).abs() < EPSILON);
		// "x" never follows "y": two discounts down to the unigram 2/6
		assert!((predictor.score("x", &ctx) - ALPHA * ALPHA * 2.0 / 6.0).abs() < EPSILON);
	}

	#[test]
	fn score_discounts_the_ratio_once_per_step() {
		let model = model(&["x", "y", "z", "x", "y", "w"], 3);
		let predictor = Predictor::new(&model);

		let ctx = tokens(&["q", "y"]);
		assert_eq!(predictor.score("x", &ctx), ALPHA * (ALPHA * (2.0 / 6.0)));
	}

	#[test]
	fn equal_scores_across_backoff_depths_tie_exactly() {
		// "a" backs off once to ("q") at 1/5, "Y" twice to the unigram at 10/20
		let model = model(
			&["q", "a", "Y", "Y", "q", "b", "Y", "Y", "q", "c", "Y", "Y", "q", "d", "Y", "Y", "q", "e", "Y", "Y"],
			3,
		);
		let predictor = Predictor::new(&model);
		let ctx = tokens(&["p", "q"]);

		assert_eq!(predictor.score("a", &ctx), predictor.score("Y", &ctx));

		let mut rng = StdRng::seed_from_u64(0);
		let next = predictor.next_token(&ctx, &Selection::Deterministic, &mut rng);
		assert_eq!(next, Some("a"));
	}

	#[test]
	fn score_is_zero_for_empty_corpus() {
		let model = model(&[], 2);
		let predictor = Predictor::new(&model);
		assert_eq!(predictor.score("x", &tokens(&["a"])), 0.0);
		assert_eq!(predictor.score("x", &[]), 0.0);
	}

	#[test]
	fn score_of_unseen_token_is_zero() {
		let model = model(&["a", "b"], 2);
		let predictor = Predictor::new(&model);
		assert_eq!(predictor.score("zzz", &tokens(&["a"])), 0.0);
	}

	#[test]
	fn candidates_union_every_context_length() {
		let model = model(&["a", "b", "c", "a", "b", "d", "e"], 3);
		let predictor = Predictor::new(&model);

		let candidates = predictor.candidates(&tokens(&["a", "b"]));
		// Longest context first, then "b", then the whole vocabulary
		assert_eq!(candidates, vec!["c", "d", "a", "b", "e"]);
	}

	#[test]
	fn candidates_include_unigram_vocabulary_for_unknown_context() {
		let model = model(&["the", "cat", "sat", "."], 2);
		let predictor = Predictor::new(&model);

		let mut candidates = predictor.candidates(&tokens(&["dog"]));
		candidates.sort();
		assert_eq!(candidates, vec![".", "cat", "sat", "the"]);
	}

	#[test]
	fn candidates_of_empty_model() {
		let model = model(&[], 1);
		let predictor = Predictor::new(&model);
		assert!(predictor.candidates(&[]).is_empty());
	}

	#[test]
	fn deterministic_step_picks_most_frequent_follower() {
		let model = model(&["a", "b", "a", "b", "a", "c"], 2);
		let predictor = Predictor::new(&model);
		let mut rng = StdRng::seed_from_u64(0);

		let next = predictor.next_token(&tokens(&["a"]), &Selection::Deterministic, &mut rng);
		assert_eq!(next, Some("b"));
	}

	#[test]
	fn predict_stops_on_terminal_token() {
		let model = model(&["i", "am", "here", ".", "you", "are", "there", "."], 2);
		let predictor = Predictor::new(&model);

		let out = predictor.predict(&tokens(&["you"]), &Selection::Deterministic);
		assert_eq!(out, tokens(&["you", "are", "there", "."]));
	}

	#[test]
	fn predict_stops_at_length_cap() {
		let model = model(&["go", "go", "go"], 2);
		let predictor = Predictor::new(&model);

		let out = predictor.predict(&tokens(&["go"]), &Selection::Deterministic);
		assert_eq!(out.len(), MAX_SENTENCE_LENGTH);
		assert!(out.iter().all(|t| t == "go"));
	}

	#[test]
	fn predict_leaves_full_sentence_alone() {
		let model = model(&["a", "b"], 2);
		let predictor = Predictor::new(&model);

		let long = tokens(&["w"; 12]);
		assert_eq!(predictor.predict(&long, &Selection::Deterministic), long);
	}

	#[test]
	fn predict_without_candidates_is_noop() {
		let model = model(&[], 2);
		let predictor = Predictor::new(&model);

		let sentence = tokens(&["hello"]);
		assert_eq!(predictor.predict(&sentence, &Selection::Deterministic), sentence);
	}

	#[test]
	fn seeded_prediction_is_reproducible() {
		let model = model(&["a", "b", "c", "a", "c", "b", "b", "a", "!", "c", "?"], 2);
		let predictor = Predictor::new(&model);
		let selection = Selection::Stochastic { seed: Some(1234) };

		let first = predictor.predict(&tokens(&["a"]), &selection);
		let second = predictor.predict(&tokens(&["a"]), &selection);
		assert_eq!(first, second);
		assert!(first.len() <= MAX_SENTENCE_LENGTH);
	}

	#[test]
	fn terminal_tokens() {
		assert!(is_terminal("."));
		assert!(is_terminal("?"));
		assert!(is_terminal("!"));
		assert!(!is_terminal(","));
		assert!(!is_terminal("end"));
	}
}
