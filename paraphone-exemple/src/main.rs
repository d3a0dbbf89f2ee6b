use std::collections::HashMap;

use log::{info, warn};
use paraphone_core::balance::{accuracy_by_category, overall_accuracy, CandidateBalancer};
use paraphone_core::config::PipelineConfig;
use paraphone_core::filters::{filter_pool, is_distinct, within_distance};
use paraphone_core::folding::{FoldingTable, PhonemeFolder};
use paraphone_core::lexicon::{FoldedSource, Lexicon, PronunciationDictionary, SourceChain};
use paraphone_core::model::NGramModel;
use paraphone_core::phoneme::{format_phonetic, format_syllabic, parse_phonetic};
use paraphone_core::syllabify::Syllabifier;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Two dictionaries: the first one already uses the target inventory,
    // the second one writes the uvular R as "R" and must be folded
    let lexique = PronunciationDictionary::from_forms(
        "lexique",
        [
            ("pate", "p a t"),
            ("table", "t a b l"),
            ("lac", "l a k"),
            ("sac", "s a k"),
            ("bal", "b a l"),
            ("pile", "p i l"),
            ("tapis", "t a p i"),
            ("cabine", "k a b i n"),
            ("salade", "s a l a d"),
            ("ami", "a m i"),
        ],
    );
    let cmu = PronunciationDictionary::from_forms(
        "cmu",
        [
            ("pate", "p a t e"),
            ("tri", "t R i"),
            ("parti", "p a R t i"),
            ("bras", "b R a"),
            ("arbre", "a R b R"),
        ],
    );
    let cmu_folding = FoldingTable::from_forms([
        ("p", "p"),
        ("t", "t"),
        ("k", "k"),
        ("b", "b"),
        ("a", "a"),
        ("i", "i"),
        ("e", "e"),
        ("R", "ʁ"),
    ])?;
    warn!(
        "Unfolded cmu phonemes: {:?}",
        cmu_folding.uncovered(["p", "t", "R", "m"])
    );

    // Sources are tried in order: a word known by "lexique" is never looked up in "cmu"
    let sources = SourceChain::new()
        .with(lexique)
        .with(FoldedSource::new(cmu, PhonemeFolder::new(&cmu_folding)));

    let frequencies = [
        ("pate", 12),
        ("table", 80),
        ("lac", 15),
        ("sac", 18),
        ("bal", 9),
        ("pile", 5),
        ("tapis", 30),
        ("cabine", 7),
        ("salade", 25),
        ("ami", 140),
        ("tri", 4),
        ("parti", 60),
        ("bras", 45),
        ("arbre", 35),
        ("xylophone", 2),
    ];
    let (lexicon, unknown) = Lexicon::from_words(&sources, frequencies);
    warn!("Words without pronunciation: {:?}", unknown);

    // Syllabify the lexicon with the maximal onset principle
    let syllabifier = Syllabifier::new(
        parse_phonetic("a i e"),
        ["p", "t", "k", "b", "d", "l", "s", "m", "n", "ʁ", "t ʁ", "b ʁ", "b l"]
            .iter()
            .map(|onset| parse_phonetic(onset)),
    )?;
    let (syllabified, skipped) = lexicon.syllabify_all(&syllabifier);
    for (entry, syllables) in &syllabified {
        println!("{:>8}: {}", entry.word, format_syllabic(syllables));
    }
    for word in &skipped {
        warn!("{}: skipped ({})", word.word, word.error);
    }

    // Fit the phonotactic model on the phonemic frequencies
    let mut config = PipelineConfig::default();
    config.seed = Some(4577);
    config.set_frequency_bands(vec![0, 10, 50, 100])?;
    let corpus = lexicon.phonemic_frequencies();
    let model = NGramModel::fit(&corpus, &config)?;
    info!(
        "Model fitted: {} bounded bigrams, {} unbounded bigrams",
        model.bigrams(true).len(),
        model.bigrams(false).len()
    );

    // Candidate nonwords, as a generator would produce them
    let pool: HashMap<String, Vec<String>> = [
        ("p a t", vec!["p a t", "t a p", "p i t", "b a t"]),
        ("t a b l", vec!["p a b l", "t i b l", "t a k l"]),
        ("l a k", vec!["l i k", "s a p", "b a k"]),
        ("s a k", vec!["s i k", "l a p", "s a b"]),
        ("t a p i", vec!["t a k i", "p a t i", "t i p a"]),
        ("a m i", vec!["a n i", "a m a", "i m a"]),
        ("p a ʁ t i", vec!["p i ʁ t a", "b a ʁ t i", "p a ʁ k i"]),
        ("b ʁ a", vec!["t ʁ a", "b ʁ i", "p l a"]),
    ]
    .into_iter()
    .map(|(word, candidates)| {
        (
            word.to_owned(),
            candidates.into_iter().map(str::to_owned).collect(),
        )
    })
    .collect();

    // Drop candidates equal to their word or too far from it
    let pool = filter_pool(&pool, |pair| is_distinct(pair) && within_distance(pair, 2));

    // Score every real word and candidate with the four n-gram scores
    let mut forms: Vec<String> = pool.keys().cloned().collect();
    forms.extend(pool.values().flatten().cloned());
    forms.sort();
    forms.dedup();
    let sequences: Vec<_> = forms.iter().map(|form| parse_phonetic(form)).collect();
    let scores: HashMap<String, _> = forms
        .into_iter()
        .zip(model.score_all(&sequences, &config)?)
        .collect();

    // Balance within each (length, frequency band) category
    let categories = lexicon.categories(config.frequency_bands());
    let mut balancer = CandidateBalancer::new(&scores, &categories, &pool, &config)?;
    let pairs = balancer.balance()?;
    let report = balancer.report();

    for pair in &pairs {
        println!(
            "{:>12} -> {:<12} ({})",
            pair.word, pair.nonword, categories[&pair.word]
        );
    }
    info!(
        "{} words, {} improving choices, {} random fallbacks, {} distinct nonwords",
        report.words, report.improved, report.fallbacks, report.distinct_nonwords
    );

    // Fraction of pairs where the real word scores higher, per category and overall
    let score_names = balancer.score_names().to_vec();
    for (category, accuracy) in accuracy_by_category(&pairs, &scores, &categories, &score_names)? {
        println!("{} ({} pairs): {:?}", category, accuracy.pairs, accuracy.scores);
    }
    let overall = overall_accuracy(&pairs, &scores, &score_names)?;
    println!("overall ({} pairs): {:?}", overall.pairs, overall.scores);

    // Model persistence: the fitted tables can be cached next to the data
    let cache = std::env::temp_dir().join("paraphone-ngrams.bin");
    model.save(&cache)?;
    let reloaded = NGramModel::load_or_fit(&corpus, &config, &cache)?;
    info!(
        "Reloaded model scores \"{}\" identically: {}",
        format_phonetic(&sequences[0]),
        reloaded.scores(&sequences[0]) == model.scores(&sequences[0])
    );

    Ok(())
}
