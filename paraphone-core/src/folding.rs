//! Rewriting phoneme sequences from one inventory into another.
//!
//! Dictionaries transcribe the same sounds with different symbol sets.
//! A [`FoldingTable`] lists correspondences between fragments of a
//! source inventory and fragments of the target inventory, and a
//! [`PhonemeFolder`] applies it with a greedy longest-match scan.

use std::collections::{HashMap, HashSet};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::FoldingError;
use crate::phoneme::{parse_phonetic, Phoneme, PhonemeSequence};

/// Correspondences between source fragments and target fragments.
///
/// # Invariants
/// - Every source fragment has at least one phoneme
/// - No source fragment appears twice
///
/// Target fragments may be empty, which drops the matched phonemes. A
/// word whose phonemes are all dropped fails to fold.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct FoldingTable {
	/// `(source, target)` pairs in the order they were declared.
	entries: Vec<(PhonemeSequence, PhonemeSequence)>,
}

impl FoldingTable {
	/// Builds a table from `(source, target)` fragment pairs.
	///
	/// # Errors
	/// - [`FoldingError::EmptyKey`] if a source fragment is empty
	/// - [`FoldingError::DuplicateKey`] if a source fragment is repeated
	pub fn new<I>(entries: I) -> Result<Self, FoldingError>
	where
		I: IntoIterator<Item = (PhonemeSequence, PhonemeSequence)>,
	{
		let mut seen: HashSet<PhonemeSequence> = HashSet::new();
		let mut table = Self::default();

		for (source, target) in entries {
			if source.is_empty() {
				return Err(FoldingError::EmptyKey);
			}
			if !seen.insert(source.clone()) {
				return Err(FoldingError::DuplicateKey(source));
			}
			table.entries.push((source, target));
		}

		Ok(table)
	}

	/// Builds a table from pairs of phonetic forms (`"t s"` → `"ts"`).
	pub fn from_forms<'a, I>(entries: I) -> Result<Self, FoldingError>
	where
		I: IntoIterator<Item = (&'a str, &'a str)>,
	{
		Self::new(
			entries
				.into_iter()
				.map(|(source, target)| (parse_phonetic(source), parse_phonetic(target))),
		)
	}

	/// Identity table over an inventory: every phoneme folds to itself.
	pub fn identity<I, S>(inventory: I) -> Result<Self, FoldingError>
	where
		I: IntoIterator<Item = S>,
		S: Into<Phoneme>,
	{
		Self::new(inventory.into_iter().map(|phoneme| {
			let phoneme = phoneme.into();
			(vec![phoneme.clone()], vec![phoneme])
		}))
	}

	/// Number of correspondences.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Returns the phonemes of `inventory` that have no single-phoneme entry.
	///
	/// Any word containing one of these on its own will fail to fold.
	pub fn uncovered<'a, I>(&self, inventory: I) -> Vec<Phoneme>
	where
		I: IntoIterator<Item = &'a str>,
	{
		let singles: HashSet<&str> = self
			.entries
			.iter()
			.filter(|(source, _)| source.len() == 1)
			.map(|(source, _)| source[0].as_str())
			.collect();

		inventory
			.into_iter()
			.filter(|phoneme| !singles.contains(phoneme))
			.map(str::to_owned)
			.collect()
	}
}

/// Applies a [`FoldingTable`] to phoneme sequences.
///
/// # Responsibilities
/// - Precompute, once, the table entries grouped by source length
/// - Fold sequences by repeatedly consuming the longest matching prefix
///
/// Folding is pure: the same folder can be shared between threads.
#[derive(Clone, Debug)]
pub struct PhonemeFolder {
	/// Entries grouped by source length, longest first.
	by_length: Vec<(usize, HashMap<PhonemeSequence, PhonemeSequence>)>,
}

impl PhonemeFolder {
	pub fn new(table: &FoldingTable) -> Self {
		let mut grouped: HashMap<usize, HashMap<PhonemeSequence, PhonemeSequence>> = HashMap::new();
		for (source, target) in &table.entries {
			grouped
				.entry(source.len())
				.or_default()
				.insert(source.clone(), target.clone());
		}

		let mut by_length: Vec<_> = grouped.into_iter().collect();
		by_length.sort_by(|a, b| b.0.cmp(&a.0));

		Self { by_length }
	}

	/// Folds a sequence into the target inventory.
	///
	/// At each position the longest table key matching the remaining
	/// input is consumed and its target fragment appended to the output.
	///
	/// # Errors
	/// - [`FoldingError::Uncovered`] with the unconsumed remainder when no
	///   key matches. Unknown phonemes are never skipped.
	/// - [`FoldingError::Emptied`] when every phoneme of a non-empty word
	///   folds to an empty target.
	pub fn fold(&self, word: &[Phoneme]) -> Result<PhonemeSequence, FoldingError> {
		let mut folded = PhonemeSequence::with_capacity(word.len());
		let mut position = 0;

		while position < word.len() {
			let remaining = &word[position..];
			let matched = self
				.by_length
				.iter()
				.filter(|(length, _)| *length <= remaining.len())
				.find_map(|(length, entries)| {
					entries.get(&remaining[..*length]).map(|target| (*length, target))
				});

			match matched {
				Some((length, target)) => {
					folded.extend(target.iter().cloned());
					position += length;
				}
				None => {
					debug!("Folding stopped at position {} of {:?}", position, word);
					return Err(FoldingError::Uncovered {
						word: word.to_vec(),
						remainder: remaining.to_vec(),
					});
				}
			}
		}

		if folded.is_empty() && !word.is_empty() {
			return Err(FoldingError::Emptied(word.to_vec()));
		}

		Ok(folded)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn folder(entries: &[(&str, &str)]) -> PhonemeFolder {
		PhonemeFolder::new(&FoldingTable::from_forms(entries.iter().copied()).unwrap())
	}

	#[test]
	fn single_phonemes_fold_one_to_one() {
		let folder = folder(&[("p", "p"), ("t", "t"), ("a", "a")]);
		assert_eq!(folder.fold(&parse_phonetic("p a t")).unwrap(), vec!["p", "a", "t"]);
	}

	#[test]
	fn longest_key_wins() {
		let folder = folder(&[("t", "t"), ("s", "s"), ("t s", "ts"), ("a", "a")]);
		assert_eq!(folder.fold(&parse_phonetic("t s a t")).unwrap(), vec!["ts", "a", "t"]);
	}

	#[test]
	fn targets_may_split_or_drop_phonemes() {
		let folder = folder(&[("ts", "t s"), ("ː", ""), ("a", "a")]);
		assert_eq!(folder.fold(&parse_phonetic("ts a ː")).unwrap(), vec!["t", "s", "a"]);
	}

	#[test]
	fn uncovered_phoneme_reports_the_remainder() {
		let folder = folder(&[("p", "p"), ("a", "a")]);
		let word = parse_phonetic("p a x a");
		let err = folder.fold(&word).unwrap_err();
		assert_eq!(
			err,
			FoldingError::Uncovered {
				word: word.clone(),
				remainder: parse_phonetic("x a"),
			}
		);
	}

	#[test]
	fn identity_table_is_idempotent() {
		let folder = PhonemeFolder::new(&FoldingTable::identity(["p", "a", "t"]).unwrap());
		let word = parse_phonetic("t a p a");
		let once = folder.fold(&word).unwrap();
		assert_eq!(once, word);
		assert_eq!(folder.fold(&once).unwrap(), once);
	}

	#[test]
	fn malformed_tables_are_rejected() {
		assert_eq!(
			FoldingTable::from_forms([("a", "a"), ("a", "e")]).unwrap_err(),
			FoldingError::DuplicateKey(vec!["a".to_owned()])
		);
		assert_eq!(FoldingTable::from_forms([("", "a")]).unwrap_err(), FoldingError::EmptyKey);
	}

	#[test]
	fn uncovered_lists_missing_inventory_phonemes() {
		let table = FoldingTable::from_forms([("p", "p"), ("t s", "ts")]).unwrap();
		assert_eq!(table.uncovered(["p", "t", "s"]), vec!["t", "s"]);
	}

	#[test]
	fn word_folding_to_nothing_is_rejected() {
		let folder = folder(&[("ː", ""), ("ʔ", ""), ("a", "a")]);
		let word = parse_phonetic("ʔ ː");
		assert_eq!(folder.fold(&word).unwrap_err(), FoldingError::Emptied(word));
		assert_eq!(folder.fold(&parse_phonetic("ʔ a ː")).unwrap(), vec!["a"]);
	}

	#[test]
	fn empty_word_folds_to_empty() {
		let folder = folder(&[("a", "a")]);
		assert!(folder.fold(&[]).unwrap().is_empty());
	}
}
