//! Syllable boundaries estimated with the maximal onset principle.
//!
//! Words are read from their last phoneme to their first. Each vowel
//! closes a syllable, and the consonants to its left are pulled into
//! the onset for as long as the growing cluster is a legal onset.
//! Consonants that follow the last vowel end up in its coda.

use std::collections::{HashSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, SyllabificationError};
use crate::phoneme::{Phoneme, PhonemeSequence, Syllable};

/// Segments words into syllables given vowels and legal onsets.
///
/// # Invariants
/// - `vowels` and `onsets` are non-empty
/// - `symbols` is the union of the vowels and every onset phoneme
///
/// Serialized as its vowels and onsets only; deserializing goes through
/// [`Syllabifier::new`] and its checks.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(try_from = "SyllabifierSettings", into = "SyllabifierSettings")]
pub struct Syllabifier {
	vowels: HashSet<Phoneme>,
	onsets: HashSet<PhonemeSequence>,
	symbols: HashSet<Phoneme>,
}

/// Serialized form of a [`Syllabifier`].
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct SyllabifierSettings {
	pub vowels: Vec<Phoneme>,
	pub onsets: Vec<PhonemeSequence>,
}

impl TryFrom<SyllabifierSettings> for Syllabifier {
	type Error = ConfigError;

	fn try_from(settings: SyllabifierSettings) -> Result<Self, Self::Error> {
		Self::new(settings.vowels, settings.onsets)
	}
}

impl From<Syllabifier> for SyllabifierSettings {
	fn from(syllabifier: Syllabifier) -> Self {
		let mut vowels: Vec<Phoneme> = syllabifier.vowels.into_iter().collect();
		let mut onsets: Vec<PhonemeSequence> = syllabifier.onsets.into_iter().collect();
		vowels.sort_unstable();
		onsets.sort_unstable();
		Self { vowels, onsets }
	}
}

impl Syllabifier {
	/// Creates a syllabifier.
	///
	/// # Errors
	/// Returns a [`ConfigError`] if there are no vowels, no onsets, or
	/// an onset with no phonemes.
	pub fn new<V, O>(vowels: V, onsets: O) -> Result<Self, ConfigError>
	where
		V: IntoIterator<Item = Phoneme>,
		O: IntoIterator<Item = PhonemeSequence>,
	{
		let vowels: HashSet<Phoneme> = vowels.into_iter().collect();
		let onsets: HashSet<PhonemeSequence> = onsets.into_iter().collect();

		if vowels.is_empty() {
			return Err(ConfigError::EmptyVowels);
		}
		if onsets.is_empty() {
			return Err(ConfigError::EmptyOnsets);
		}
		if onsets.iter().any(Vec::is_empty) {
			return Err(ConfigError::EmptyOnset);
		}

		let mut symbols = vowels.clone();
		for onset in &onsets {
			symbols.extend(onset.iter().cloned());
		}

		Ok(Self { vowels, onsets, symbols })
	}

	pub fn is_vowel(&self, phoneme: &str) -> bool {
		self.vowels.contains(phoneme)
	}

	/// Splits a word into syllables.
	///
	/// # Errors
	/// - [`SyllabificationError::UnknownSymbol`] for a phoneme outside
	///   the vowels and onsets
	/// - [`SyllabificationError::NoVowel`] for a word without vowels
	/// - [`SyllabificationError::NoOnset`] when leading consonants cannot
	///   form a legal onset, so the syllables do not cover the word
	pub fn syllabify(&self, word: &[Phoneme]) -> Result<Vec<Syllable>, SyllabificationError> {
		if let Some(symbol) = word.iter().find(|phoneme| !self.symbols.contains(*phoneme)) {
			return Err(SyllabificationError::UnknownSymbol {
				symbol: symbol.clone(),
				word: word.to_vec(),
			});
		}
		if !word.iter().any(|phoneme| self.vowels.contains(phoneme)) {
			return Err(SyllabificationError::NoVowel(word.to_vec()));
		}

		let mut remaining: Vec<Phoneme> = word.to_vec();
		let mut syllables: VecDeque<Syllable> = VecDeque::new();
		let mut syllable: VecDeque<Phoneme> = VecDeque::new();

		while let Some(phoneme) = remaining.pop() {
			let is_vowel = self.vowels.contains(&phoneme);
			syllable.push_front(phoneme);

			if is_vowel {
				for consonant in self.take_onset(&mut remaining).into_iter().rev() {
					syllable.push_front(consonant);
				}
				syllables.push_front(syllable.drain(..).collect());
			}
		}

		// Whatever is left in `syllable` never reached an onset.
		let segmented: PhonemeSequence = syllables.iter().flatten().cloned().collect();
		if segmented != word {
			return Err(SyllabificationError::NoOnset {
				word: word.to_vec(),
				segmented,
			});
		}

		Ok(syllables.into())
	}

	/// Pops the longest legal onset off the end of `remaining`.
	///
	/// The onset grows one phoneme at a time and stops at the first
	/// phoneme whose addition is not a legal onset. Nothing is taken
	/// when the preceding phoneme is a vowel.
	fn take_onset(&self, remaining: &mut Vec<Phoneme>) -> PhonemeSequence {
		let mut onset: VecDeque<Phoneme> = VecDeque::new();

		while let Some(previous) = remaining.last() {
			if self.vowels.contains(previous) {
				break;
			}

			let mut candidate: PhonemeSequence = Vec::with_capacity(onset.len() + 1);
			candidate.push(previous.clone());
			candidate.extend(onset.iter().cloned());
			if !self.onsets.contains(&candidate) {
				break;
			}

			if let Some(consonant) = remaining.pop() {
				onset.push_front(consonant);
			}
		}

		onset.into()
	}
}
