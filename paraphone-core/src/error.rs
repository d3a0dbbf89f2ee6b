//! Error types for every stage of the phonetic pipeline.
//!
//! Each stage reports its own error enum. Failures are per word: the
//! caller is expected to record the word as skipped and carry on with
//! the rest of the lexicon. Nothing here is retried.

use thiserror::Error;

use crate::phoneme::{format_phonetic, Phoneme, PhonemeSequence};

/// Result type defaulting to the crate-level [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Any error raised by this crate.
#[derive(Debug, Error)]
pub enum Error {
	#[error(transparent)]
	Folding(#[from] FoldingError),

	#[error(transparent)]
	Syllabification(#[from] SyllabificationError),

	#[error(transparent)]
	Model(#[from] ModelError),

	#[error(transparent)]
	Balancer(#[from] BalancerError),

	#[error(transparent)]
	Config(#[from] ConfigError),
}

/// Errors raised while building a folding table or folding a word.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FoldingError {
	/// No table key matches the start of the remaining input.
	#[error("no folding entry covers \"{}\" in word \"{}\"", format_phonetic(.remainder), format_phonetic(.word))]
	Uncovered {
		word: PhonemeSequence,
		remainder: PhonemeSequence,
	},

	/// Every phoneme of the word folded to an empty target.
	#[error("word \"{}\" folds to an empty sequence", format_phonetic(.0))]
	Emptied(PhonemeSequence),

	/// The same source fragment appears twice in the table.
	#[error("duplicate folding entry for \"{}\"", format_phonetic(.0))]
	DuplicateKey(PhonemeSequence),

	/// A source fragment with no phonemes.
	#[error("folding entry with an empty source fragment")]
	EmptyKey,
}

/// Errors raised by the syllabifier on a single word.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyllabificationError {
	/// A phoneme that is neither a vowel nor part of any onset.
	#[error("unknown symbol \"{}\" in word \"{}\"", .symbol, format_phonetic(.word))]
	UnknownSymbol {
		symbol: Phoneme,
		word: PhonemeSequence,
	},

	#[error("no vowel in word \"{}\"", format_phonetic(.0))]
	NoVowel(PhonemeSequence),

	/// Some leading consonants could not be attached to any legal onset.
	#[error("onset not found in word \"{}\" (segmented as \"{}\")", format_phonetic(.word), format_phonetic(.segmented))]
	NoOnset {
		word: PhonemeSequence,
		segmented: PhonemeSequence,
	},
}

/// Errors raised while fitting, scoring or persisting n-gram models.
#[derive(Debug, Error)]
pub enum ModelError {
	/// A corpus sequence uses the reserved word-boundary symbol.
	#[error("corpus word \"{}\" contains the reserved boundary symbol \"{}\"", format_phonetic(.word), .boundary)]
	ReservedSymbol {
		word: PhonemeSequence,
		boundary: Phoneme,
	},

	#[error("model I/O failed: {0}")]
	Io(#[from] std::io::Error),

	#[error("model encoding failed: {0}")]
	Encoding(#[from] postcard::Error),

	/// A scoring worker thread panicked.
	#[error("a scoring worker panicked")]
	Worker,
}

/// Errors raised by the candidate balancer.
///
/// Most of these are caller contract violations detected up front.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BalancerError {
	#[error("word \"{0}\" has no nonword candidates")]
	NoCandidates(String),

	#[error("word \"{0}\" is not part of the candidate pool")]
	UnknownWord(String),

	#[error("word \"{0}\" has already been matched")]
	AlreadyChosen(String),

	#[error("word \"{0}\" has no category")]
	MissingCategory(String),

	#[error("no \"{score}\" score for \"{word}\"")]
	MissingScore { word: String, score: String },

	/// Neither the configuration nor the score table names any score.
	#[error("no score to balance")]
	NoScores,

	/// A per-category balancing thread panicked.
	#[error("a balancing worker panicked")]
	Worker,
}

/// Errors raised by invalid settings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
	#[error("vowel set is empty")]
	EmptyVowels,

	#[error("onset set is empty")]
	EmptyOnsets,

	#[error("an onset has no phonemes")]
	EmptyOnset,

	#[error("invalid frequency bands {0:?}: expected strictly increasing bounds starting at 0")]
	InvalidFrequencyBands(Vec<u64>),

	#[error("boundary symbol must not be empty")]
	EmptyBoundary,
}
