//! Matching every real word with one nonword candidate.
//!
//! This module provides:
//! - Word categories by length and frequency band (`category`)
//! - Running comparison statistics and the balance objective (`statistics`)
//! - The online, shuffled, first-improvement balancer (`balancer`)

/// Word length × frequency band strata.
pub mod category;

/// Per-category running statistics and accuracy reports.
pub mod statistics;

/// High-level balancing interface.
///
/// Exposes word-by-word choice, full passes and per-category sharding.
pub mod balancer;

pub use balancer::{BalanceReport, CandidateBalancer, WordPair};
pub use category::{FrequencyBands, FrequencyRank, WordCategory};
pub use statistics::{
	abs_sum_objective, accuracy_by_category, compare_scores, overall_accuracy, Accuracy, Objective,
	ScoringStatistics,
};
