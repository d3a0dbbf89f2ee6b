use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::mpsc;
use std::thread;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use super::counts::NGramCounts;
use super::table::NGramTable;
use crate::config::PipelineConfig;
use crate::error::ModelError;
use crate::phoneme::{Phoneme, PhonemeSequence};

/// Default word-edge symbol of bounded n-grams.
pub const BOUNDARY: &str = "_";

pub const UNIGRAM_BOUNDED: &str = "unigram_bounded";
pub const UNIGRAM_UNBOUNDED: &str = "unigram_unbounded";
pub const BIGRAM_BOUNDED: &str = "bigram_bounded";
pub const BIGRAM_UNBOUNDED: &str = "bigram_unbounded";

/// Named scores of one phonetic form, e.g. `{"bigram_bounded": -12.3}`.
pub type WordScores = BTreeMap<String, f64>;

/// Corpus chunks per worker thread.
const CHUNK_FACTOR: usize = 8;

/// Unigram and bigram probabilities fitted on a frequency-weighted corpus.
///
/// Two variants of each table are kept:
/// - *bounded*: every word is wrapped with the boundary symbol before
///   counting, so word edges are modelled
/// - *unbounded*: words are counted as they are
///
/// # Responsibilities
/// - Fit the four tables in one parallel pass over the corpus
/// - Score phonetic forms by summed log-probability
/// - Save and reload fitted models
///
/// # Invariants
/// - Tables are never modified after fitting
/// - The boundary symbol never occurs inside a corpus word
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct NGramModel {
	boundary: Phoneme,
	unigrams_bounded: NGramTable,
	unigrams_unbounded: NGramTable,
	bigrams_bounded: NGramTable,
	bigrams_unbounded: NGramTable,
}

impl NGramModel {
	/// Fits the model on a corpus of `phonetic form → frequency`.
	///
	/// # Behavior
	/// - Splits the corpus into chunks (worker count * factor)
	/// - Counts each chunk on a scoped thread
	/// - Merges the partial counts, then normalises once
	///
	/// Counts are integers, so the tables do not depend on how the
	/// corpus was split.
	///
	/// # Errors
	/// Returns [`ModelError::ReservedSymbol`] if a corpus word contains
	/// the boundary symbol.
	pub fn fit(
		corpus: &HashMap<PhonemeSequence, u64>,
		config: &PipelineConfig,
	) -> Result<Self, ModelError> {
		let boundary = config.boundary().to_owned();
		if let Some(word) = corpus.keys().find(|word| word.contains(&boundary)) {
			return Err(ModelError::ReservedSymbol {
				word: word.clone(),
				boundary,
			});
		}

		let entries: Vec<(&PhonemeSequence, u64)> =
			corpus.iter().map(|(word, frequency)| (word, *frequency)).collect();
		let chunks = config.workers() * CHUNK_FACTOR;
		let chunk_size = entries.len().div_ceil(chunks).max(1);

		info!("Counting n-grams over {} phonetic forms", entries.len());

		let (bounded, unbounded) = thread::scope(|scope| {
			let (tx, rx) = mpsc::channel();
			for chunk in entries.chunks(chunk_size) {
				let tx = tx.clone();
				let boundary = &boundary;

				scope.spawn(move || {
					let mut bounded = NGramCounts::default();
					let mut unbounded = NGramCounts::default();
					for (word, frequency) in chunk {
						unbounded.add_sequence(word, *frequency);
						bounded.add_sequence(&wrap(word, boundary), *frequency);
					}
					if tx.send((bounded, unbounded)).is_err() {
						warn!("N-gram counts dropped: receiver closed");
					}
				});
			}
			drop(tx);

			let mut bounded = NGramCounts::default();
			let mut unbounded = NGramCounts::default();
			for (partial_bounded, partial_unbounded) in rx.iter() {
				bounded.merge(&partial_bounded);
				unbounded.merge(&partial_unbounded);
			}
			(bounded, unbounded)
		});

		let model = Self {
			boundary,
			unigrams_bounded: bounded.unigram_table(),
			unigrams_unbounded: unbounded.unigram_table(),
			bigrams_bounded: bounded.bigram_table(),
			bigrams_unbounded: unbounded.bigram_table(),
		};
		debug!(
			"Fitted {} bounded unigrams, {} bounded bigrams",
			model.unigrams_bounded.len(),
			model.bigrams_bounded.len()
		);

		Ok(model)
	}

	/// Loads a model from `path` if it exists, otherwise fits it and
	/// writes it there for the next run.
	pub fn load_or_fit<P: AsRef<Path>>(
		corpus: &HashMap<PhonemeSequence, u64>,
		config: &PipelineConfig,
		path: P,
	) -> Result<Self, ModelError> {
		let path = path.as_ref();
		if path.exists() {
			info!("Loading n-gram model from {}", path.display());
			return Self::load(path);
		}

		let model = Self::fit(corpus, config)?;
		model.save(path)?;
		Ok(model)
	}

	/// Serializes the model with `postcard`.
	pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ModelError> {
		let bytes = postcard::to_stdvec(self)?;
		std::fs::write(path, bytes)?;
		Ok(())
	}

	pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ModelError> {
		let bytes = std::fs::read(path)?;
		Ok(postcard::from_bytes(&bytes)?)
	}

	pub fn boundary(&self) -> &str {
		&self.boundary
	}

	/// Unigram probabilities, `P(x)`.
	pub fn unigrams(&self, bounded: bool) -> &NGramTable {
		if bounded { &self.unigrams_bounded } else { &self.unigrams_unbounded }
	}

	/// Conditional bigram probabilities, `P(y | x)`.
	pub fn bigrams(&self, bounded: bool) -> &NGramTable {
		if bounded { &self.bigrams_bounded } else { &self.bigrams_unbounded }
	}

	/// Wraps a word with the boundary symbol at both ends.
	pub fn bounded(&self, word: &[Phoneme]) -> PhonemeSequence {
		wrap(word, &self.boundary)
	}

	/// Computes the four named log-probability scores of a phonetic form.
	///
	/// Bounded scores are taken on the wrapped form with the bounded
	/// tables, unbounded scores on the bare form with the unbounded
	/// tables. Unseen n-grams yield `-inf`.
	pub fn scores(&self, word: &[Phoneme]) -> WordScores {
		let bounded = self.bounded(word);
		BTreeMap::from([
			(UNIGRAM_BOUNDED.to_owned(), self.unigrams_bounded.log_probability(&bounded)),
			(UNIGRAM_UNBOUNDED.to_owned(), self.unigrams_unbounded.log_probability(word)),
			(BIGRAM_BOUNDED.to_owned(), self.bigrams_bounded.log_probability(&bounded)),
			(BIGRAM_UNBOUNDED.to_owned(), self.bigrams_unbounded.log_probability(word)),
		])
	}

	/// Scores many phonetic forms in parallel.
	///
	/// Results are returned in the order of `words`.
	///
	/// # Errors
	/// Returns [`ModelError::Worker`] if a worker thread panicked.
	pub fn score_all(
		&self,
		words: &[PhonemeSequence],
		config: &PipelineConfig,
	) -> Result<Vec<WordScores>, ModelError> {
		let chunk_size = words.len().div_ceil(config.workers()).max(1);

		thread::scope(|scope| -> Result<Vec<WordScores>, ModelError> {
			let handles: Vec<_> = words
				.chunks(chunk_size)
				.map(|chunk| {
					scope.spawn(move || {
						chunk.iter().map(|word| self.scores(word)).collect::<Vec<_>>()
					})
				})
				.collect();

			let mut scores = Vec::with_capacity(words.len());
			for handle in handles {
				scores.extend(handle.join().map_err(|_| ModelError::Worker)?);
			}
			Ok(scores)
		})
	}
}

fn wrap(word: &[Phoneme], boundary: &str) -> PhonemeSequence {
	let mut wrapped = PhonemeSequence::with_capacity(word.len() + 2);
	wrapped.push(boundary.to_owned());
	wrapped.extend(word.iter().cloned());
	wrapped.push(boundary.to_owned());
	wrapped
}
