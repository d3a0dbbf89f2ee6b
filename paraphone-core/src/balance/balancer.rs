use std::collections::{BTreeMap, HashMap, HashSet};
use std::hash::Hash;
use std::thread;

use log::{debug, info};
use rand::rngs::StdRng;
use rand::seq::{IndexedRandom, SliceRandom};
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use super::statistics::{abs_sum_objective, comparison_outcomes, Objective, ScoringStatistics};
use crate::config::PipelineConfig;
use crate::error::BalancerError;
use crate::model::WordScores;

/// A real word and the nonword chosen for it.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WordPair {
	pub word: String,
	pub nonword: String,
}

/// Outcome counters of a balancing run.
#[derive(Serialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct BalanceReport {
	/// Words matched.
	pub words: usize,
	/// Choices that lowered their category's objective.
	pub improved: usize,
	/// Choices drawn at random because no candidate helped.
	pub fallbacks: usize,
	/// Distinct nonwords among the chosen ones.
	pub distinct_nonwords: usize,
}

/// Picks one nonword per real word so that, within every category,
/// real words and nonwords are indistinguishable on each score.
///
/// # Responsibilities
/// - Process real words in a shuffled (seeded) order
/// - For each word, commit the first candidate that lowers its
///   category's objective, or a random candidate if none does
/// - Keep one [`ScoringStatistics`] per category, updated after each choice
///
/// Choices depend on every earlier choice in the same category, so a
/// pass is strictly sequential. Categories are independent of each
/// other, which [`CandidateBalancer::balance_by_category`] exploits.
///
/// # Invariants
/// - Every balanced word has at least one candidate, a category and
///   all the balanced scores (checked at construction)
/// - A word is matched at most once
pub struct CandidateBalancer<'a, C> {
	scores: &'a HashMap<String, WordScores>,
	categories: &'a HashMap<String, C>,
	candidates: &'a HashMap<String, Vec<String>>,

	/// Real words with at least one candidate, sorted.
	words: Vec<&'a str>,
	score_names: Vec<String>,
	objective: Objective,
	unique_nonwords: bool,
	seed: Option<u64>,
	rng: StdRng,

	statistics: HashMap<C, ScoringStatistics>,
	chosen: HashMap<&'a str, &'a str>,
	used_nonwords: HashSet<&'a str>,
	report: BalanceReport,
}

impl<'a, C> CandidateBalancer<'a, C>
where
	C: Clone + Eq + Hash + Ord,
{
	/// Creates a balancer over a candidate pool.
	///
	/// # Parameters
	/// - `scores`: named scores of every real word and every candidate
	/// - `categories`: category of every real word
	/// - `candidates`: nonword candidates of every real word, in the
	///   order they should be tried
	/// - `config`: seed, nonword reuse and score selection
	///
	/// Words without candidates are left out.
	///
	/// # Errors
	/// Returns an error if no score can be balanced, or if a word lacks
	/// a category or a word/candidate lacks one of the balanced scores.
	pub fn new(
		scores: &'a HashMap<String, WordScores>,
		categories: &'a HashMap<String, C>,
		candidates: &'a HashMap<String, Vec<String>>,
		config: &PipelineConfig,
	) -> Result<Self, BalancerError> {
		let mut words: Vec<&'a str> = candidates
			.iter()
			.filter(|(_, pool)| !pool.is_empty())
			.map(|(word, _)| word.as_str())
			.collect();
		words.sort_unstable();

		let skipped = candidates.len() - words.len();
		if skipped > 0 {
			info!("{} words have no candidate and will not be matched", skipped);
		}

		let score_names = if config.score_names.is_empty() {
			words
				.first()
				.and_then(|word| scores.get(*word))
				.map(|first| first.keys().cloned().collect())
				.unwrap_or_default()
		} else {
			config.score_names.clone()
		};
		if score_names.is_empty() && !words.is_empty() {
			return Err(BalancerError::NoScores);
		}

		for word in &words {
			if !categories.contains_key(*word) {
				return Err(BalancerError::MissingCategory((*word).to_owned()));
			}
			let pool = candidates.get(*word).map(Vec::as_slice).unwrap_or_default();
			for id in std::iter::once(*word).chain(pool.iter().map(String::as_str)) {
				let word_scores = scores.get(id);
				for name in &score_names {
					if !word_scores.is_some_and(|word_scores| word_scores.contains_key(name)) {
						return Err(BalancerError::MissingScore {
							word: id.to_owned(),
							score: name.clone(),
						});
					}
				}
			}
		}

		Ok(Self::with_words(
			scores,
			categories,
			candidates,
			words,
			score_names,
			config.unique_nonwords,
			config.seed,
		))
	}

	fn with_words(
		scores: &'a HashMap<String, WordScores>,
		categories: &'a HashMap<String, C>,
		candidates: &'a HashMap<String, Vec<String>>,
		words: Vec<&'a str>,
		score_names: Vec<String>,
		unique_nonwords: bool,
		seed: Option<u64>,
	) -> Self {
		let rng = match seed {
			Some(seed) => StdRng::seed_from_u64(seed),
			None => StdRng::from_os_rng(),
		};

		Self {
			scores,
			categories,
			candidates,
			words,
			score_names,
			objective: abs_sum_objective,
			unique_nonwords,
			seed,
			rng,
			statistics: HashMap::new(),
			chosen: HashMap::new(),
			used_nonwords: HashSet::new(),
			report: BalanceReport::default(),
		}
	}

	/// Replaces the objective function (default: [`abs_sum_objective`]).
	pub fn with_objective(mut self, objective: Objective) -> Self {
		self.objective = objective;
		self
	}

	/// Names of the balanced scores, in statistics order.
	pub fn score_names(&self) -> &[String] {
		&self.score_names
	}

	/// Real words that will be matched, sorted.
	pub fn words(&self) -> &[&'a str] {
		&self.words
	}

	/// Running statistics of a category, if any of its words was matched.
	pub fn statistics(&self, category: &C) -> Option<&ScoringStatistics> {
		self.statistics.get(category)
	}

	/// Counters of every choice made so far.
	pub fn report(&self) -> BalanceReport {
		BalanceReport {
			distinct_nonwords: self.used_nonwords.len(),
			..self.report.clone()
		}
	}

	/// Chooses and commits a nonword for `word`.
	///
	/// Candidates are tried in pool order. The first one whose
	/// hypothetical addition strictly lowers the category objective is
	/// committed. If none does, a candidate is drawn uniformly at random.
	/// The category statistics are updated before returning.
	///
	/// # Errors
	/// Returns an error if the word is unknown, has no candidate or was
	/// already matched.
	pub fn choose(&mut self, word: &str) -> Result<&'a str, BalancerError> {
		let candidates = self.candidates;
		let scores = self.scores;

		let (word, pool) = candidates
			.get_key_value(word)
			.ok_or_else(|| BalancerError::UnknownWord(word.to_owned()))?;
		let word = word.as_str();
		if pool.is_empty() {
			return Err(BalancerError::NoCandidates(word.to_owned()));
		}
		if self.chosen.contains_key(word) {
			return Err(BalancerError::AlreadyChosen(word.to_owned()));
		}
		let category = self
			.categories
			.get(word)
			.ok_or_else(|| BalancerError::MissingCategory(word.to_owned()))?;
		let empty = WordScores::new();
		let word_scores = scores.get(word).unwrap_or(&empty);

		let statistics = self
			.statistics
			.entry(category.clone())
			.or_insert_with(|| ScoringStatistics::new(self.score_names.len()));
		let current = statistics.objective(self.objective);

		let mut improvement = None;
		for nonword in pool {
			if self.unique_nonwords && self.used_nonwords.contains(nonword.as_str()) {
				continue;
			}
			let nonword_scores = scores.get(nonword).unwrap_or(&empty);
			let outcomes = comparison_outcomes(word, word_scores, nonword, nonword_scores, &self.score_names)?;
			if statistics.hypothetical_objective(&outcomes, self.objective) < current {
				improvement = Some((nonword.as_str(), outcomes));
				break;
			}
		}

		let (nonword, outcomes) = match improvement {
			Some(choice) => {
				self.report.improved += 1;
				choice
			}
			None => {
				let mut options: Vec<&'a String> = pool
					.iter()
					.filter(|nonword| !self.unique_nonwords || !self.used_nonwords.contains(nonword.as_str()))
					.collect();
				if options.is_empty() {
					options = pool.iter().collect();
				}
				let nonword: &'a String = *options
					.choose(&mut self.rng)
					.ok_or_else(|| BalancerError::NoCandidates(word.to_owned()))?;
				let nonword = nonword.as_str();
				let nonword_scores = scores.get(nonword).unwrap_or(&empty);
				self.report.fallbacks += 1;
				(
					nonword,
					comparison_outcomes(word, word_scores, nonword, nonword_scores, &self.score_names)?,
				)
			}
		};

		statistics.commit(&outcomes);
		self.chosen.insert(word, nonword);
		self.used_nonwords.insert(nonword);
		self.report.words += 1;
		debug!("Matched {} with {} (objective was {:.4})", word, nonword, current);

		Ok(nonword)
	}

	/// Matches every remaining word, in a shuffled order.
	///
	/// Pairs are returned in processing order.
	pub fn balance(&mut self) -> Result<Vec<WordPair>, BalancerError> {
		let mut order: Vec<&'a str> = self
			.words
			.iter()
			.copied()
			.filter(|word| !self.chosen.contains_key(word))
			.collect();
		order.shuffle(&mut self.rng);

		info!("Finding a balanced nonword for {} words", order.len());
		let mut pairs = Vec::with_capacity(order.len());
		for word in order {
			let nonword = self.choose(word)?;
			pairs.push(WordPair {
				word: word.to_owned(),
				nonword: nonword.to_owned(),
			});
		}

		info!(
			"{}/{} choices decreased the objective, {} distinct nonwords",
			self.report.improved,
			self.report.words,
			self.used_nonwords.len()
		);
		Ok(pairs)
	}

	/// Balances each category on its own thread.
	///
	/// Categories never influence each other, so this gives the same
	/// kind of result as [`balance`](Self::balance) with one sequential
	/// pass per category. With a seed, shard `i` (categories in sorted
	/// order) is seeded with `seed + i`.
	///
	/// Nonword uniqueness, when enabled, is only enforced within a
	/// category.
	///
	/// Pairs are returned grouped by category, in category order.
	pub fn balance_by_category(self) -> Result<(Vec<WordPair>, BalanceReport), BalancerError>
	where
		C: Send + Sync,
	{
		let mut shards: BTreeMap<&C, Vec<&'a str>> = BTreeMap::new();
		for word in &self.words {
			if self.chosen.contains_key(word) {
				continue;
			}
			let category = self
				.categories
				.get(*word)
				.ok_or_else(|| BalancerError::MissingCategory((*word).to_owned()))?;
			shards.entry(category).or_default().push(*word);
		}

		info!("Balancing {} categories in parallel", shards.len());

		let balancers: Vec<Self> = shards
			.into_values()
			.enumerate()
			.map(|(index, words)| {
				let seed = self.seed.map(|seed| seed.wrapping_add(index as u64));
				Self::with_words(
					self.scores,
					self.categories,
					self.candidates,
					words,
					self.score_names.clone(),
					self.unique_nonwords,
					seed,
				)
				.with_objective(self.objective)
			})
			.collect();

		let results = thread::scope(|scope| {
			let handles: Vec<_> = balancers
				.into_iter()
				.map(|mut balancer| {
					scope.spawn(move || balancer.balance().map(|pairs| (pairs, balancer.report())))
				})
				.collect();

			handles
				.into_iter()
				.map(|handle| handle.join().unwrap_or(Err(BalancerError::Worker)))
				.collect::<Result<Vec<_>, BalancerError>>()
		})?;

		let mut pairs = Vec::new();
		let mut report = BalanceReport::default();
		for (shard_pairs, shard_report) in results {
			report.words += shard_report.words;
			report.improved += shard_report.improved;
			report.fallbacks += shard_report.fallbacks;
			pairs.extend(shard_pairs);
		}
		report.distinct_nonwords = pairs
			.iter()
			.map(|pair| pair.nonword.as_str())
			.collect::<HashSet<_>>()
			.len();

		Ok((pairs, report))
	}
}
