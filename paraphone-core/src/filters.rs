//! Filters on word/nonword pairs that only look at phonetic forms.

use std::collections::HashMap;

use crate::balance::WordPair;
use crate::phoneme::parse_phonetic;

/// Keeps pairs whose nonword differs from the real word.
pub fn is_distinct(pair: &WordPair) -> bool {
	parse_phonetic(&pair.word) != parse_phonetic(&pair.nonword)
}

/// Levenshtein distance counted in phonemes rather than characters.
///
/// Substituting `ts` with `t` costs 1, whatever the symbols' length.
pub fn phoneme_distance<S: AsRef<str>>(a: &[S], b: &[S]) -> usize {
	let mut previous: Vec<usize> = (0..=b.len()).collect();
	let mut current = vec![0; b.len() + 1];

	for (i, left) in a.iter().enumerate() {
		current[0] = i + 1;
		for (j, right) in b.iter().enumerate() {
			let substitution = previous[j] + usize::from(left.as_ref() != right.as_ref());
			current[j + 1] = substitution.min(previous[j + 1] + 1).min(current[j] + 1);
		}
		std::mem::swap(&mut previous, &mut current);
	}

	previous[b.len()]
}

/// Keeps pairs at most `max_distance` phoneme edits apart.
pub fn within_distance(pair: &WordPair, max_distance: usize) -> bool {
	phoneme_distance(&parse_phonetic(&pair.word), &parse_phonetic(&pair.nonword)) <= max_distance
}

/// Applies a pair filter to a `word → candidates` pool.
///
/// Words left without any candidate are removed.
pub fn filter_pool<F>(pool: &HashMap<String, Vec<String>>, mut keep: F) -> HashMap<String, Vec<String>>
where
	F: FnMut(&WordPair) -> bool,
{
	pool.iter()
		.filter_map(|(word, candidates)| {
			let kept: Vec<String> = candidates
				.iter()
				.filter(|nonword| {
					keep(&WordPair {
						word: word.clone(),
						nonword: (*nonword).clone(),
					})
				})
				.cloned()
				.collect();
			(!kept.is_empty()).then(|| (word.clone(), kept))
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn pair(word: &str, nonword: &str) -> WordPair {
		WordPair {
			word: word.to_owned(),
			nonword: nonword.to_owned(),
		}
	}

	#[test]
	fn distance_counts_phoneme_edits() {
		let distance = |a: &str, b: &str| phoneme_distance(&parse_phonetic(a), &parse_phonetic(b));
		assert_eq!(distance("p a t", "p a t"), 0);
		assert_eq!(distance("p a t", "p a k"), 1);
		assert_eq!(distance("ts a", "t a"), 1);
		assert_eq!(distance("p a t", "a t"), 1);
		assert_eq!(distance("", "p a"), 2);
		assert_eq!(distance("k i t ɛ", "s i t"), 2);
	}

	#[test]
	fn pair_predicates() {
		assert!(!is_distinct(&pair("p a t", "p  a t")));
		assert!(is_distinct(&pair("p a t", "p a k")));
		assert!(within_distance(&pair("p a t", "p o k"), 2));
		assert!(!within_distance(&pair("p a t", "k o s"), 2));
	}

	#[test]
	fn pool_filtering_drops_emptied_words() {
		let pool = HashMap::from([
			("p a t".to_owned(), vec!["p a t".to_owned(), "p a k".to_owned()]),
			("t a".to_owned(), vec!["t a".to_owned()]),
		]);
		let filtered = filter_pool(&pool, is_distinct);
		assert_eq!(filtered.len(), 1);
		assert_eq!(filtered["p a t"], vec!["p a k".to_owned()]);
	}
}
