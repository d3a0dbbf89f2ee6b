//! Phonetic normalisation, segmentation and scoring for matched
//! word/nonword stimulus sets.
//!
//! This crate provides the linguistic core of the stimulus pipeline:
//! - Phoneme folding between transcription inventories (`folding`)
//! - Maximal-onset syllabification (`syllabify`)
//! - Frequency-weighted unigram/bigram phonotactic models (`model`)
//! - Category-stratified nonword selection (`balance`)
//!
//! Everything here is an in-memory transform. Reading dictionaries,
//! generating candidates and writing results belong to the caller.

/// Phoneme, sequence and syllable types, plus phonetic form helpers.
pub mod phoneme;

/// Error types shared by every stage.
pub mod error;

/// Greedy longest-match rewriting between phoneme inventories.
pub mod folding;

/// Syllable segmentation following the maximal onset principle.
pub mod syllabify;

/// Unigram/bigram probability tables and log-probability scoring.
///
/// Supports parallel counting, merging of partial counts and
/// binary persistence of fitted models.
pub mod model;

/// Online, category-stratified nonword selection.
pub mod balance;

/// Pronunciation sources and lexicon-wide stage application.
pub mod lexicon;

/// Word/nonword pair filters working on phonetic forms.
pub mod filters;

/// Pipeline-wide settings.
pub mod config;

pub use error::{Error, Result};
