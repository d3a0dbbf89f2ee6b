//! Phonotactic n-gram models.
//!
//! This module provides:
//! - Weighted n-gram counting with mergeable partial counts (`NGramCounts`)
//! - Normalised probability tables and log-probability scoring (`NGramTable`)
//! - The four-table model fitted on a lexicon (`NGramModel`)

/// Frequency-weighted unigram and bigram counts.
///
/// Partial counts built on separate corpus chunks are merged by summation.
/// This module is not exposed publicly.
mod counts;

/// Probability table for one n-gram order.
pub mod table;

/// Bounded and unbounded unigram/bigram model.
///
/// Handles parallel fitting, named scores and binary persistence.
pub mod ngram_model;

pub use ngram_model::{
	NGramModel, WordScores, BIGRAM_BOUNDED, BIGRAM_UNBOUNDED, BOUNDARY, UNIGRAM_BOUNDED,
	UNIGRAM_UNBOUNDED,
};
pub use table::NGramTable;
