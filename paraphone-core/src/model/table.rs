use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::phoneme::{Phoneme, PhonemeSequence};

/// Probabilities for every observed n-gram of one order.
///
/// A table is derived once from corpus counts and never mutated.
///
/// # Invariants
/// - `order` is 1 (unigrams) or 2 (bigrams)
/// - Every key has exactly `order` phonemes
/// - Every probability lies in `(0, 1]`
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct NGramTable {
	order: usize,
	probabilities: HashMap<PhonemeSequence, f64>,
}

impl NGramTable {
	pub(crate) fn new(order: usize, probabilities: HashMap<PhonemeSequence, f64>) -> Self {
		Self { order, probabilities }
	}

	/// Number of phonemes per n-gram.
	pub fn order(&self) -> usize {
		self.order
	}

	pub fn len(&self) -> usize {
		self.probabilities.len()
	}

	pub fn is_empty(&self) -> bool {
		self.probabilities.is_empty()
	}

	/// Probability of one n-gram, `0.0` if it was never observed.
	pub fn probability(&self, ngram: &[Phoneme]) -> f64 {
		self.probabilities.get(ngram).copied().unwrap_or(0.0)
	}

	/// Iterates over `(n-gram, probability)` pairs in no particular order.
	pub fn iter(&self) -> impl Iterator<Item = (&[Phoneme], f64)> {
		self.probabilities
			.iter()
			.map(|(ngram, probability)| (ngram.as_slice(), *probability))
	}

	/// Sum of the log-probabilities of every n-gram in `sequence`.
	///
	/// An unseen n-gram contributes `ln(0) = -inf`, so the result is
	/// `-inf` for any sequence containing one. No smoothing is applied.
	/// A sequence shorter than the order has no n-grams and scores `0.0`.
	pub fn log_probability(&self, sequence: &[Phoneme]) -> f64 {
		sequence
			.windows(self.order)
			.map(|ngram| self.probability(ngram).ln())
			.sum()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::phoneme::parse_phonetic;

	fn table() -> NGramTable {
		let mut probabilities = HashMap::new();
		probabilities.insert(parse_phonetic("a"), 0.5);
		probabilities.insert(parse_phonetic("b"), 0.25);
		NGramTable::new(1, probabilities)
	}

	#[test]
	fn log_probability_sums_logs() {
		let score = table().log_probability(&parse_phonetic("a b a"));
		let expected = 0.5f64.ln() * 2.0 + 0.25f64.ln();
		assert!((score - expected).abs() < 1e-12);
	}

	#[test]
	fn unseen_ngram_gives_negative_infinity() {
		let score = table().log_probability(&parse_phonetic("a z"));
		assert_eq!(score, f64::NEG_INFINITY);
	}

	#[test]
	fn empty_sequence_scores_zero() {
		assert_eq!(table().log_probability(&[]), 0.0);
	}
}
