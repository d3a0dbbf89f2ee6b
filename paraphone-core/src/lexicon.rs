//! Pronunciation lookup and stage application over a whole lexicon.
//!
//! A lexicon is built by asking one or more [`PronunciationSource`]s for
//! each word. Folding and syllabification are then applied entry by
//! entry: a word that fails a stage is reported as a [`SkippedWord`]
//! and the rest of the lexicon carries on.

use std::collections::HashMap;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::balance::category::{FrequencyBands, WordCategory};
use crate::error::{Error, FoldingError};
use crate::folding::PhonemeFolder;
use crate::phoneme::{format_phonetic, parse_phonetic, PhonemeSequence, Syllable};
use crate::syllabify::Syllabifier;

/// Anything that can give the pronunciation of a written word.
pub trait PronunciationSource {
	/// Name used in logs.
	fn name(&self) -> &str;

	/// Returns the phonemes of `word`, or `None` if it is unknown.
	fn lookup(&self, word: &str) -> Option<PhonemeSequence>;
}

/// In-memory `word → phonemes` dictionary.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct PronunciationDictionary {
	name: String,
	entries: HashMap<String, PhonemeSequence>,
}

impl PronunciationDictionary {
	pub fn new(name: &str) -> Self {
		Self {
			name: name.to_owned(),
			entries: HashMap::new(),
		}
	}

	/// Builds a dictionary from `(word, phonetic form)` pairs.
	///
	/// Later pairs replace earlier ones for the same word.
	pub fn from_forms<'a, I>(name: &str, entries: I) -> Self
	where
		I: IntoIterator<Item = (&'a str, &'a str)>,
	{
		let mut dictionary = Self::new(name);
		for (word, form) in entries {
			dictionary.insert(word, parse_phonetic(form));
		}
		dictionary
	}

	pub fn insert(&mut self, word: &str, phonemes: PhonemeSequence) {
		self.entries.insert(word.to_owned(), phonemes);
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

impl PronunciationSource for PronunciationDictionary {
	fn name(&self) -> &str {
		&self.name
	}

	fn lookup(&self, word: &str) -> Option<PhonemeSequence> {
		self.entries.get(word).cloned()
	}
}

/// A source whose pronunciations are folded into the target inventory.
pub struct FoldedSource<S> {
	source: S,
	folder: PhonemeFolder,
}

impl<S: PronunciationSource> FoldedSource<S> {
	pub fn new(source: S, folder: PhonemeFolder) -> Self {
		Self { source, folder }
	}

	/// Looks `word` up and folds it.
	///
	/// # Errors
	/// Returns the folding error if the source knows the word but its
	/// pronunciation cannot be folded.
	pub fn try_lookup(&self, word: &str) -> Result<Option<PhonemeSequence>, FoldingError> {
		self.source
			.lookup(word)
			.map(|phonemes| self.folder.fold(&phonemes))
			.transpose()
	}
}

impl<S: PronunciationSource> PronunciationSource for FoldedSource<S> {
	fn name(&self) -> &str {
		self.source.name()
	}

	/// Unfoldable pronunciations count as unknown.
	fn lookup(&self, word: &str) -> Option<PhonemeSequence> {
		match self.try_lookup(word) {
			Ok(phonemes) => phonemes,
			Err(err) => {
				debug!("{}: {}", self.source.name(), err);
				None
			}
		}
	}
}

/// Sources tried in priority order. The first one that knows a word wins.
#[derive(Default)]
pub struct SourceChain {
	sources: Vec<Box<dyn PronunciationSource + Send + Sync>>,
}

impl SourceChain {
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends a source with a lower priority than every current one.
	pub fn with<S>(mut self, source: S) -> Self
	where
		S: PronunciationSource + Send + Sync + 'static,
	{
		self.sources.push(Box::new(source));
		self
	}

	pub fn len(&self) -> usize {
		self.sources.len()
	}

	pub fn is_empty(&self) -> bool {
		self.sources.is_empty()
	}

	/// Looks `word` up and returns the name of the source that knew it.
	pub fn lookup_with_source(&self, word: &str) -> Option<(&str, PhonemeSequence)> {
		self.sources
			.iter()
			.find_map(|source| source.lookup(word).map(|phonemes| (source.name(), phonemes)))
	}
}

impl PronunciationSource for SourceChain {
	fn name(&self) -> &str {
		"chain"
	}

	fn lookup(&self, word: &str) -> Option<PhonemeSequence> {
		self.lookup_with_source(word).map(|(_, phonemes)| phonemes)
	}
}

/// A written word with its pronunciation and corpus frequency.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct LexiconEntry {
	pub word: String,
	pub phonemes: PhonemeSequence,
	pub frequency: u64,
}

/// A word left out of a stage, with the reason.
#[derive(Debug)]
pub struct SkippedWord {
	pub word: String,
	pub error: Error,
}

/// Words of a corpus with their pronunciations.
///
/// # Responsibilities
/// - Build entries from pronunciation sources
/// - Apply folding and syllabification entry by entry
/// - Aggregate frequencies per phonetic form, the unit the n-gram
///   model and the balancer work on
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Lexicon {
	entries: Vec<LexiconEntry>,
}

impl Lexicon {
	pub fn new(entries: Vec<LexiconEntry>) -> Self {
		Self { entries }
	}

	/// Looks every `(word, frequency)` up in `source`.
	///
	/// Returns the lexicon of known words and the list of unknown ones.
	pub fn from_words<'a, S, I>(source: &S, words: I) -> (Self, Vec<String>)
	where
		S: PronunciationSource + ?Sized,
		I: IntoIterator<Item = (&'a str, u64)>,
	{
		let mut entries = Vec::new();
		let mut unknown = Vec::new();

		for (word, frequency) in words {
			match source.lookup(word) {
				Some(phonemes) => entries.push(LexiconEntry {
					word: word.to_owned(),
					phonemes,
					frequency,
				}),
				None => unknown.push(word.to_owned()),
			}
		}

		if !unknown.is_empty() {
			warn!("{}: {} words have no pronunciation", source.name(), unknown.len());
		}
		info!("Lexicon built with {} words", entries.len());

		(Self { entries }, unknown)
	}

	pub fn entries(&self) -> &[LexiconEntry] {
		&self.entries
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Sums the frequencies of words sharing a phonetic form.
	///
	/// Homophones collapse into one form: this is the corpus the n-gram
	/// model is fitted on.
	pub fn phonemic_frequencies(&self) -> HashMap<PhonemeSequence, u64> {
		let mut frequencies: HashMap<PhonemeSequence, u64> = HashMap::new();
		for entry in &self.entries {
			*frequencies.entry(entry.phonemes.clone()).or_insert(0) += entry.frequency;
		}
		frequencies
	}

	/// Folds every entry, dropping the words that cannot be folded.
	pub fn fold_all(&self, folder: &PhonemeFolder) -> (Self, Vec<SkippedWord>) {
		let mut folded = Vec::with_capacity(self.entries.len());
		let mut skipped = Vec::new();

		for entry in &self.entries {
			match folder.fold(&entry.phonemes) {
				Ok(phonemes) => folded.push(LexiconEntry {
					phonemes,
					..entry.clone()
				}),
				Err(err) => skipped.push(skip(&entry.word, err.into())),
			}
		}

		info!("Folded {} words, skipped {}", folded.len(), skipped.len());
		(Self { entries: folded }, skipped)
	}

	/// Syllabifies every entry.
	///
	/// Returns `(entry, syllables)` for the words that could be
	/// segmented.
	pub fn syllabify_all(
		&self,
		syllabifier: &Syllabifier,
	) -> (Vec<(&LexiconEntry, Vec<Syllable>)>, Vec<SkippedWord>) {
		let mut syllabified = Vec::with_capacity(self.entries.len());
		let mut skipped = Vec::new();

		for entry in &self.entries {
			match syllabifier.syllabify(&entry.phonemes) {
				Ok(syllables) => syllabified.push((entry, syllables)),
				Err(err) => skipped.push(skip(&entry.word, err.into())),
			}
		}

		info!("Syllabified {} words, skipped {}", syllabified.len(), skipped.len());
		(syllabified, skipped)
	}

	/// Category of every phonetic form, keyed by its textual form.
	///
	/// The frequency of a form is the summed frequency of its homophones.
	pub fn categories(&self, bands: &FrequencyBands) -> HashMap<String, WordCategory> {
		self.phonemic_frequencies()
			.into_iter()
			.map(|(phonemes, frequency)| {
				let category = WordCategory::new(phonemes.len(), frequency, bands);
				(format_phonetic(&phonemes), category)
			})
			.collect()
	}
}

fn skip(word: &str, error: Error) -> SkippedWord {
	warn!("Skipping \"{}\": {}", word, error);
	SkippedWord {
		word: word.to_owned(),
		error,
	}
}
