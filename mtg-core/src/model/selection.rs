use log::warn;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Strategy used to pick the next token among scored candidates.
///
/// Chosen once per completion and threaded through the generation loop.
///
/// # Variants
/// - `Deterministic`: highest score wins, ties broken by ascending
///   case-insensitive token order.
/// - `Stochastic { seed }`: draw a candidate with probability proportional
///   to its score. A `seed` makes the draws reproducible; `None` seeds the
///   generator from the thread-local RNG.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Selection {
	#[default]
	Deterministic,
	Stochastic { seed: Option<u64> },
}

impl Selection {
	/// Maps the `randomize` flag of `finish_sentence` to a strategy.
	pub fn from_randomize(randomize: bool) -> Self {
		if randomize {
			Selection::Stochastic { seed: None }
		} else {
			Selection::Deterministic
		}
	}

	/// Returns `true` for the stochastic strategy.
	pub fn is_random(&self) -> bool {
		matches!(self, Selection::Stochastic { .. })
	}

	/// Builds the random generator used by this strategy.
	///
	/// `Deterministic` never draws, so it gets a fixed seed instead of
	/// pulling entropy from the thread-local RNG.
	pub fn make_rng(&self) -> StdRng {
		match self {
			Selection::Deterministic => StdRng::seed_from_u64(0),
			Selection::Stochastic { seed: Some(seed) } => StdRng::seed_from_u64(*seed),
			Selection::Stochastic { seed: None } => StdRng::from_rng(&mut rand::rng()),
		}
	}

	/// Picks one token among `scored` candidates.
	///
	/// Returns `None` only when `scored` is empty.
	pub fn pick<'c, R: Rng + ?Sized>(&self, scored: &[(&'c str, f64)], rng: &mut R) -> Option<&'c str> {
		match self {
			Selection::Deterministic => pick_best(scored),
			Selection::Stochastic { .. } => pick_weighted(scored, rng),
		}
	}
}

/// Returns the candidate minimizing `(-score, lowercase token)`.
///
/// Candidates equal on both keys resolve to the first one in `scored`.
pub fn pick_best<'c>(scored: &[(&'c str, f64)]) -> Option<&'c str> {
	scored
		.iter()
		.min_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.to_lowercase().cmp(&b.0.to_lowercase())))
		.map(|(token, _)| *token)
}

/// Returns the case-insensitive smallest candidate, ignoring scores.
pub fn pick_lexicographic<'c>(scored: &[(&'c str, f64)]) -> Option<&'c str> {
	scored
		.iter()
		.min_by_key(|(token, _)| token.to_lowercase())
		.map(|(token, _)| *token)
}

/// Draws a candidate with probability proportional to its score.
///
/// Scores need not sum to 1. Zero-score candidates are never drawn.
/// If every score is zero, falls back to `pick_lexicographic`.
pub fn pick_weighted<'c, R: Rng + ?Sized>(scored: &[(&'c str, f64)], rng: &mut R) -> Option<&'c str> {
	if scored.is_empty() {
		return None;
	}

	if scored.iter().all(|(_, weight)| *weight == 0.0) {
		warn!("All {} candidates have zero weight, falling back to lexicographic choice", scored.len());
		return pick_lexicographic(scored);
	}

	match WeightedIndex::new(scored.iter().map(|(_, weight)| *weight)) {
		Ok(dist) => Some(scored[dist.sample(rng)].0),
		Err(e) => {
			warn!("Invalid candidate weights ({e}), falling back to lexicographic choice");
			pick_lexicographic(scored)
		}
	}
}
