use std::collections::HashMap;

use paraphone_core::balance::{overall_accuracy, CandidateBalancer, WordCategory};
use paraphone_core::config::PipelineConfig;
use paraphone_core::folding::{FoldingTable, PhonemeFolder};
use paraphone_core::lexicon::{Lexicon, LexiconEntry};
use paraphone_core::model::{NGramModel, WordScores, BIGRAM_BOUNDED, UNIGRAM_UNBOUNDED};
use paraphone_core::phoneme::{format_phonetic, parse_phonetic, PhonemeSequence};
use paraphone_core::syllabify::Syllabifier;

const EPSILON: f64 = 1e-9;

fn approx(a: f64, b: f64) -> bool {
	(a - b).abs() < EPSILON
}

fn entry(word: &str, form: &str, frequency: u64) -> LexiconEntry {
	LexiconEntry {
		word: word.to_owned(),
		phonemes: parse_phonetic(form),
		frequency,
	}
}

#[test]
fn folded_word_is_syllabified_and_counted() {
	let table = FoldingTable::from_forms([("p", "p"), ("t", "t"), ("a", "a")]).unwrap();
	let lexicon = Lexicon::new(vec![entry("pat", "p a t", 5)]);
	let (folded, skipped) = lexicon.fold_all(&PhonemeFolder::new(&table));
	assert!(skipped.is_empty());
	assert_eq!(folded.entries()[0].phonemes, vec!["p", "a", "t"]);

	let syllabifier = Syllabifier::new(parse_phonetic("a"), [parse_phonetic("p"), parse_phonetic("t")]).unwrap();
	let (syllabified, _) = folded.syllabify_all(&syllabifier);
	assert_eq!(syllabified[0].1, vec![parse_phonetic("p a t")]);

	let corpus = folded.phonemic_frequencies();
	assert_eq!(corpus[&parse_phonetic("p a t")], 5);
}

#[test]
fn bounded_and_unbounded_tables_are_normalised() {
	let corpus: HashMap<PhonemeSequence, u64> = [("a b", 2), ("b a", 1), ("a a b", 4), ("b", 3)]
		.iter()
		.map(|(form, frequency)| (parse_phonetic(form), *frequency))
		.collect();
	let model = NGramModel::fit(&corpus, &PipelineConfig::default()).unwrap();

	for bounded in [true, false] {
		let unigrams: f64 = model.unigrams(bounded).iter().map(|(_, probability)| probability).sum();
		assert!(approx(unigrams, 1.0));
	}

	// Bigrams are divided by the unigram count of their head, so P(. | x)
	// sums to 1 only when x never ends a word. Bounded, every real phoneme
	// is followed by something ("_" at the end), but "_" itself is not.
	let mut by_head: HashMap<&str, f64> = HashMap::new();
	for (bigram, probability) in model.bigrams(true).iter() {
		*by_head.entry(bigram[0].as_str()).or_insert(0.0) += probability;
	}
	assert!(approx(by_head["a"], 1.0));
	assert!(approx(by_head["b"], 1.0));
	// "_" is counted twice per word but opens it only once
	assert!(approx(by_head["_"], 0.5));

	// Unbounded, word-final occurrences take probability mass away
	let mut by_head: HashMap<&str, f64> = HashMap::new();
	for (bigram, probability) in model.bigrams(false).iter() {
		*by_head.entry(bigram[0].as_str()).or_insert(0.0) += probability;
	}
	assert!(by_head.values().all(|total| *total > 0.0 && *total <= 1.0 + EPSILON));

	// Unbounded unigram score is the sum of the individual log-probabilities
	let unigrams = model.unigrams(false);
	let expected = unigrams.probability(&parse_phonetic("a")).ln() + unigrams.probability(&parse_phonetic("b")).ln();
	assert!(approx(model.scores(&parse_phonetic("a b"))[UNIGRAM_UNBOUNDED], expected));
}

#[test]
fn saved_model_reloads_identically() {
	let corpus: HashMap<PhonemeSequence, u64> = [("p a t", 5), ("t a p", 2)]
		.iter()
		.map(|(form, frequency)| (parse_phonetic(form), *frequency))
		.collect();
	let config = PipelineConfig::default();
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("ngrams.bin");

	let fitted = NGramModel::load_or_fit(&corpus, &config, &path).unwrap();
	assert!(path.exists());

	// The cached file wins over the corpus passed in
	let cached = NGramModel::load_or_fit(&HashMap::new(), &config, &path).unwrap();
	assert_eq!(fitted, cached);
	let word = parse_phonetic("p a t");
	assert_eq!(cached.scores(&word)[BIGRAM_BOUNDED], fitted.scores(&word)[BIGRAM_BOUNDED]);
}

#[test]
fn loading_a_missing_model_fails() {
	let dir = tempfile::tempdir().unwrap();
	assert!(NGramModel::load(dir.path().join("absent.bin")).is_err());
}

#[test]
fn scored_pool_is_balanced_per_category() {
	// Real words: every CVC and CVCV form over a small inventory
	let consonants = ["p", "t", "k", "b", "d"];
	let vowels = ["a", "i", "u"];
	let mut entries = Vec::new();
	for (i, c1) in consonants.iter().enumerate() {
		for (j, v) in vowels.iter().enumerate() {
			for c2 in &consonants {
				let form = format!("{c1} {v} {c2}");
				entries.push(entry(&form, &form, ((i * 7 + j * 13) % 40) as u64));
			}
			let form = format!("{c1} {v} t a");
			entries.push(entry(&form, &form, (i * 11 + j) as u64 + 1));
		}
	}
	let lexicon = Lexicon::new(entries);
	let mut config = PipelineConfig::default();
	config.seed = Some(4577);
	config.score_names = vec![BIGRAM_BOUNDED.to_owned(), UNIGRAM_UNBOUNDED.to_owned()];
	let model = NGramModel::fit(&lexicon.phonemic_frequencies(), &config).unwrap();

	// Candidates: swap the vowel of each real word
	let mut pool: HashMap<String, Vec<String>> = HashMap::new();
	for entry in lexicon.entries() {
		let candidates = vowels
			.iter()
			.filter(|vowel| **vowel != entry.phonemes[1])
			.map(|vowel| {
				let mut phonemes = entry.phonemes.clone();
				phonemes[1] = (*vowel).to_owned();
				phonemes[0] = if phonemes[0] == "p" { "g".to_owned() } else { phonemes[0].clone() };
				format_phonetic(&phonemes)
			})
			.collect();
		pool.insert(format_phonetic(&entry.phonemes), candidates);
	}

	let mut scores: HashMap<String, WordScores> = HashMap::new();
	for form in pool.keys().chain(pool.values().flatten()) {
		scores
			.entry(form.clone())
			.or_insert_with(|| model.scores(&parse_phonetic(form)));
	}
	let categories: HashMap<String, WordCategory> = lexicon.categories(config.frequency_bands());

	let mut balancer = CandidateBalancer::new(&scores, &categories, &pool, &config).unwrap();
	let pairs = balancer.balance().unwrap();
	assert_eq!(pairs.len(), pool.len());
	assert_eq!(balancer.report().words, pool.len());

	for pair in &pairs {
		assert!(pool[&pair.word].contains(&pair.nonword));
	}

	// Sharded run matches every word too, and is reproducible
	let (sharded, report) = CandidateBalancer::new(&scores, &categories, &pool, &config)
		.unwrap()
		.balance_by_category()
		.unwrap();
	assert_eq!(sharded.len(), pool.len());
	assert_eq!(report.improved + report.fallbacks, pool.len());
	let (again, _) = CandidateBalancer::new(&scores, &categories, &pool, &config)
		.unwrap()
		.balance_by_category()
		.unwrap();
	assert_eq!(sharded, again);

	let accuracy = overall_accuracy(&pairs, &scores, balancer.score_names()).unwrap();
	assert_eq!(accuracy.pairs, pairs.len());
	assert!(accuracy.scores.values().all(|score| (0.0..=1.0).contains(score)));
}
