use std::collections::HashMap;

use crate::phoneme::{Phoneme, PhonemeSequence};

use super::table::NGramTable;

/// Weighted unigram and bigram counts over a corpus.
///
/// Each n-gram is keyed by its phonemes (one for a unigram, two for a
/// bigram). Occurrences are weighted by the frequency of the word they
/// come from.
///
/// ## Responsibilities:
/// - Accumulate weighted occurrences during fitting
/// - Merge with counts built on another chunk of the corpus
/// - Normalise into probability tables
///
/// ## Invariants
/// - Every stored count is strictly positive
#[derive(Clone, Debug, Default)]
pub(crate) struct NGramCounts {
	/// Example: { ["a"] => 42, ["p"] => 3 }
	unigrams: HashMap<PhonemeSequence, u64>,
	/// Example: { ["p", "a"] => 3 }
	bigrams: HashMap<PhonemeSequence, u64>,
}

impl NGramCounts {
	/// Records every unigram and bigram of `phonemes`, weighted by `frequency`.
	///
	/// Words with a null frequency contribute nothing.
	pub(crate) fn add_sequence(&mut self, phonemes: &[Phoneme], frequency: u64) {
		if frequency == 0 {
			return;
		}

		for unigram in phonemes.windows(1) {
			*self.unigrams.entry(unigram.to_vec()).or_insert(0) += frequency;
		}
		for bigram in phonemes.windows(2) {
			*self.bigrams.entry(bigram.to_vec()).or_insert(0) += frequency;
		}
	}

	/// Merges another set of counts into this one.
	///
	/// Counts are summed, so merging partial counts gives exactly the
	/// counts of a single pass over the whole corpus.
	pub(crate) fn merge(&mut self, other: &Self) {
		for (unigram, count) in &other.unigrams {
			*self.unigrams.entry(unigram.clone()).or_insert(0) += *count;
		}
		for (bigram, count) in &other.bigrams {
			*self.bigrams.entry(bigram.clone()).or_insert(0) += *count;
		}
	}

	/// Unigram probabilities: each count over the total count.
	pub(crate) fn unigram_table(&self) -> NGramTable {
		let total: u64 = self.unigrams.values().sum();
		let probabilities = self
			.unigrams
			.iter()
			.map(|(unigram, count)| (unigram.clone(), *count as f64 / total as f64))
			.collect();
		NGramTable::new(1, probabilities)
	}

	/// Bigram probabilities conditioned on the first phoneme.
	///
	/// Each bigram count is divided by the weighted unigram count of its
	/// first phoneme. A phoneme that ends words (or the boundary, which
	/// both opens and closes them) is counted more often as a unigram than
	/// as a bigram head, so `P(· | x)` sums to one only for phonemes that
	/// never end a sequence.
	pub(crate) fn bigram_table(&self) -> NGramTable {
		let probabilities = self
			.bigrams
			.iter()
			.map(|(bigram, count)| {
				let head = self.unigrams.get(&bigram[..1]).copied().unwrap_or(*count);
				(bigram.clone(), *count as f64 / head as f64)
			})
			.collect();
		NGramTable::new(2, probabilities)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::phoneme::parse_phonetic;

	#[test]
	fn occurrences_are_weighted_by_frequency() {
		let mut counts = NGramCounts::default();
		counts.add_sequence(&parse_phonetic("a b a"), 3);
		assert_eq!(counts.unigrams[&parse_phonetic("a")], 6);
		assert_eq!(counts.unigrams[&parse_phonetic("b")], 3);
		assert_eq!(counts.bigrams[&parse_phonetic("a b")], 3);
		assert_eq!(counts.bigrams[&parse_phonetic("b a")], 3);
	}

	#[test]
	fn null_frequency_adds_nothing() {
		let mut counts = NGramCounts::default();
		counts.add_sequence(&parse_phonetic("a b"), 0);
		assert!(counts.unigrams.is_empty());
		assert!(counts.bigrams.is_empty());
	}

	#[test]
	fn merged_counts_equal_single_pass() {
		let mut whole = NGramCounts::default();
		whole.add_sequence(&parse_phonetic("a b"), 2);
		whole.add_sequence(&parse_phonetic("b a"), 1);

		let mut left = NGramCounts::default();
		left.add_sequence(&parse_phonetic("a b"), 2);
		let mut right = NGramCounts::default();
		right.add_sequence(&parse_phonetic("b a"), 1);
		left.merge(&right);

		assert_eq!(left.unigrams, whole.unigrams);
		assert_eq!(left.bigrams, whole.bigrams);
	}

	#[test]
	fn bigrams_are_divided_by_the_head_unigram() {
		let mut counts = NGramCounts::default();
		counts.add_sequence(&parse_phonetic("a b"), 2);
		counts.add_sequence(&parse_phonetic("a c"), 1);
		counts.add_sequence(&parse_phonetic("b a"), 1);
		let table = counts.bigram_table();

		// "a" occurs 4 times as a unigram but heads only 3 bigrams
		assert_eq!(table.probability(&parse_phonetic("a b")), 2.0 / 4.0);
		assert_eq!(table.probability(&parse_phonetic("a c")), 1.0 / 4.0);
		assert_eq!(table.probability(&parse_phonetic("b a")), 1.0 / 3.0);
	}
}
