//! Phoneme sequences and their textual forms.
//!
//! A phonetic form is written with phonemes separated by spaces
//! (`"p a t"`). A syllabic form additionally separates syllables with
//! dashes (`"p a-t a"`).

/// A single phoneme token (one IPA symbol or digraph).
///
/// Equality is exact string equality.
pub type Phoneme = String;

/// One word's pronunciation.
pub type PhonemeSequence = Vec<Phoneme>;

/// A contiguous, non-empty slice of a word's phonemes.
pub type Syllable = Vec<Phoneme>;

/// Separator between phonemes in a phonetic form.
pub const PHONEME_SEPARATOR: &str = " ";

/// Separator between syllables in a syllabic form.
pub const SYLLABLE_SEPARATOR: &str = "-";

/// Splits a phonetic form into its phonemes.
///
/// Runs of whitespace are treated as a single separator.
pub fn parse_phonetic(form: &str) -> PhonemeSequence {
	form.split_whitespace().map(str::to_owned).collect()
}

/// Joins phonemes back into a phonetic form.
pub fn format_phonetic<S: AsRef<str>>(phonemes: &[S]) -> String {
	phonemes
		.iter()
		.map(AsRef::as_ref)
		.collect::<Vec<_>>()
		.join(PHONEME_SEPARATOR)
}

/// Splits a syllabic form into syllables.
///
/// Example: `"p a-t a"` → `[["p", "a"], ["t", "a"]]`
pub fn parse_syllabic(form: &str) -> Vec<Syllable> {
	form.split(SYLLABLE_SEPARATOR)
		.map(parse_phonetic)
		.filter(|syllable| !syllable.is_empty())
		.collect()
}

/// Joins syllables into a syllabic form.
pub fn format_syllabic(syllables: &[Syllable]) -> String {
	syllables
		.iter()
		.map(|syllable| format_phonetic(syllable))
		.collect::<Vec<_>>()
		.join(SYLLABLE_SEPARATOR)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn phonetic_form_ignores_extra_whitespace() {
		assert_eq!(parse_phonetic("  p  a t "), vec!["p", "a", "t"]);
		assert!(parse_phonetic("").is_empty());
	}

	#[test]
	fn syllabic_form_round_trips() {
		let form = "b R i-k a";
		let syllables = parse_syllabic(form);
		assert_eq!(syllables, vec![vec!["b", "R", "i"], vec!["k", "a"]]);
		assert_eq!(format_syllabic(&syllables), form);
	}

	#[test]
	fn multi_character_phonemes_stay_whole() {
		let phonemes = parse_phonetic("t͡ʃ a ɲ");
		assert_eq!(phonemes.len(), 3);
		assert_eq!(format_phonetic(&phonemes), "t͡ʃ a ɲ");
	}
}
