use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use super::balancer::WordPair;
use crate::error::BalancerError;
use crate::model::WordScores;

/// Distance of a set of running averages from the balanced state.
pub type Objective = fn(&[f64]) -> f64;

/// Sum over every score of `|average - 0.5|`.
///
/// Zero when real words and nonwords are indistinguishable on every score.
pub fn abs_sum_objective(averages: &[f64]) -> f64 {
	averages.iter().map(|average| (average - 0.5).abs()).sum()
}

/// Compares a real word's score with a nonword's.
///
/// Returns 1 if the real word scores higher, 0.5 on a tie, 0 otherwise.
pub fn compare_scores(real_word: f64, nonword: f64) -> f64 {
	if real_word > nonword {
		1.0
	} else if real_word == nonword {
		0.5
	} else {
		0.0
	}
}

/// Comparison outcomes of a real word against one nonword, one per score.
pub(crate) fn comparison_outcomes(
	word: &str,
	word_scores: &WordScores,
	nonword: &str,
	nonword_scores: &WordScores,
	score_names: &[String],
) -> Result<Vec<f64>, BalancerError> {
	score_names
		.iter()
		.map(|name| {
			let real = score(word, word_scores, name)?;
			let fake = score(nonword, nonword_scores, name)?;
			Ok(compare_scores(real, fake))
		})
		.collect()
}

fn score(word: &str, scores: &WordScores, name: &str) -> Result<f64, BalancerError> {
	scores.get(name).copied().ok_or_else(|| BalancerError::MissingScore {
		word: word.to_owned(),
		score: name.to_owned(),
	})
}

/// Running comparison statistics of one category.
///
/// Tracks how many pairs were committed and, per score, the sum of
/// their comparison outcomes. Scores are identified by position, in
/// the balancer's score order.
///
/// # Invariants
/// - `sums[i]` lies in `[0, count]`
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ScoringStatistics {
	count: usize,
	sums: Vec<f64>,
}

impl ScoringStatistics {
	pub fn new(score_count: usize) -> Self {
		Self { count: 0, sums: vec![0.0; score_count] }
	}

	/// Number of committed pairs.
	pub fn count(&self) -> usize {
		self.count
	}

	/// Running average of every score.
	///
	/// Before any pair is committed every average is 0.5: an empty
	/// category counts as balanced.
	pub fn averages(&self) -> Vec<f64> {
		if self.count == 0 {
			return vec![0.5; self.sums.len()];
		}
		self.sums.iter().map(|sum| sum / self.count as f64).collect()
	}

	/// Current value of `objective` for this category.
	pub fn objective(&self, objective: Objective) -> f64 {
		objective(&self.averages())
	}

	/// Value `objective` would take after committing `outcomes`.
	///
	/// Does not modify the statistics.
	pub fn hypothetical_objective(&self, outcomes: &[f64], objective: Objective) -> f64 {
		let count = (self.count + 1) as f64;
		let averages: Vec<f64> = self
			.sums
			.iter()
			.zip(outcomes)
			.map(|(sum, outcome)| (sum + outcome) / count)
			.collect();
		objective(&averages)
	}

	/// Adds one committed pair.
	pub fn commit(&mut self, outcomes: &[f64]) {
		for (sum, outcome) in self.sums.iter_mut().zip(outcomes) {
			*sum += outcome;
		}
		self.count += 1;
	}
}

/// Share of pairs in which the real word outscores its nonword.
///
/// Ties count for half. Balanced sets sit close to 0.5 on every score.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Accuracy {
	pub pairs: usize,
	pub scores: BTreeMap<String, f64>,
}

impl Accuracy {
	fn from_statistics(statistics: &ScoringStatistics, score_names: &[String]) -> Self {
		Self {
			pairs: statistics.count(),
			scores: score_names.iter().cloned().zip(statistics.averages()).collect(),
		}
	}
}

/// Accuracy of the pairs over the whole set.
pub fn overall_accuracy(
	pairs: &[WordPair],
	scores: &HashMap<String, WordScores>,
	score_names: &[String],
) -> Result<Accuracy, BalancerError> {
	let mut statistics = ScoringStatistics::new(score_names.len());
	for pair in pairs {
		statistics.commit(&pair_outcomes(pair, scores, score_names)?);
	}
	Ok(Accuracy::from_statistics(&statistics, score_names))
}

/// Accuracy of the pairs within each category of their real word.
///
/// # Errors
/// Returns an error if a real word has no category or a score is missing.
pub fn accuracy_by_category<C: Clone + Ord>(
	pairs: &[WordPair],
	scores: &HashMap<String, WordScores>,
	categories: &HashMap<String, C>,
	score_names: &[String],
) -> Result<BTreeMap<C, Accuracy>, BalancerError> {
	let mut statistics: BTreeMap<C, ScoringStatistics> = BTreeMap::new();
	for pair in pairs {
		let category = categories
			.get(&pair.word)
			.ok_or_else(|| BalancerError::MissingCategory(pair.word.clone()))?;
		statistics
			.entry(category.clone())
			.or_insert_with(|| ScoringStatistics::new(score_names.len()))
			.commit(&pair_outcomes(pair, scores, score_names)?);
	}

	Ok(statistics
		.into_iter()
		.map(|(category, statistics)| (category, Accuracy::from_statistics(&statistics, score_names)))
		.collect())
}

fn pair_outcomes(
	pair: &WordPair,
	scores: &HashMap<String, WordScores>,
	score_names: &[String],
) -> Result<Vec<f64>, BalancerError> {
	let empty = WordScores::new();
	comparison_outcomes(
		&pair.word,
		scores.get(&pair.word).unwrap_or(&empty),
		&pair.nonword,
		scores.get(&pair.nonword).unwrap_or(&empty),
		score_names,
	)
}
