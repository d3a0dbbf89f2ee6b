use serde::{Deserialize, Serialize};

use crate::balance::category::FrequencyBands;
use crate::error::ConfigError;
use crate::model::BOUNDARY;
use crate::phoneme::Phoneme;

/// Settings shared by the fitting, scoring and balancing stages.
///
/// `PipelineConfig` holds both **run parameters** (seed, worker count)
/// and **balancing policy** (nonword reuse, scores to balance,
/// frequency bands).
///
/// # Responsibilities
/// - Track the seed used for the balancer's shuffle and random fallback
/// - Track which scores are balanced and whether nonwords may be reused
/// - Validate frequency bands and the boundary symbol on assignment
///
/// # Invariants
/// - `frequency_bands` starts at 0 and is strictly increasing
/// - `boundary` is never empty
///
/// Serializable, so the calling layer can embed it in its own settings.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct PipelineConfig {
	/// Seed for every random draw of a balancing run. `None` seeds from the OS.
	pub seed: Option<u64>,

	/// Whether a nonword may be matched with more than one real word.
	///
	/// When `true`, nonwords already committed are skipped during the
	/// improvement scan and avoided by the random fallback when possible.
	pub unique_nonwords: bool,

	/// Names of the scores to balance. Empty means every score of the
	/// first real word (in sorted order).
	pub score_names: Vec<String>,

	/// Upper bounds of the word frequency bands.
	frequency_bands: FrequencyBands,

	/// Word-edge symbol used by bounded n-grams.
	boundary: Phoneme,

	/// Worker threads for counting and scoring (0 = one per CPU).
	workers: usize,
}

impl Default for PipelineConfig {
	fn default() -> Self {
		Self {
			seed: None,
			unique_nonwords: false,
			score_names: Vec::new(),
			frequency_bands: FrequencyBands::default(),
			boundary: BOUNDARY.to_owned(),
			workers: 0,
		}
	}
}

impl PipelineConfig {
	/// Returns the frequency bands used to build word categories.
	pub fn frequency_bands(&self) -> &FrequencyBands {
		&self.frequency_bands
	}

	/// Sets the frequency band upper bounds, e.g. `[0, 10, 20, 50, 100]`.
	///
	/// # Errors
	/// Returns an error if the bounds do not start at 0 or are not
	/// strictly increasing.
	pub fn set_frequency_bands(&mut self, bounds: Vec<u64>) -> Result<(), ConfigError> {
		self.frequency_bands = FrequencyBands::new(bounds)?;
		Ok(())
	}

	pub fn boundary(&self) -> &str {
		&self.boundary
	}

	/// Sets the word-edge symbol of bounded n-grams.
	///
	/// # Errors
	/// Returns an error if the symbol is empty.
	pub fn set_boundary(&mut self, boundary: &str) -> Result<(), ConfigError> {
		if boundary.is_empty() {
			return Err(ConfigError::EmptyBoundary);
		}
		self.boundary = boundary.to_owned();
		Ok(())
	}

	/// Effective number of worker threads.
	pub fn workers(&self) -> usize {
		if self.workers == 0 {
			num_cpus::get().max(1)
		} else {
			self.workers
		}
	}

	/// Sets the number of worker threads. `0` uses one per CPU.
	pub fn set_workers(&mut self, workers: usize) {
		self.workers = workers;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_match_the_usual_bands() {
		let config = PipelineConfig::default();
		assert_eq!(config.frequency_bands().bounds(), &[0, 10, 20, 50, 100]);
		assert_eq!(config.boundary(), "_");
		assert!(config.workers() >= 1);
	}

	#[test]
	fn invalid_values_are_refused() {
		let mut config = PipelineConfig::default();
		assert!(config.set_frequency_bands(vec![5, 10]).is_err());
		assert!(config.set_frequency_bands(vec![0, 10, 10]).is_err());
		assert!(config.set_boundary("").is_err());
		assert_eq!(config, PipelineConfig::default());

		config.set_frequency_bands(vec![0, 3]).unwrap();
		assert_eq!(config.frequency_bands().bounds(), &[0, 3]);
	}

	#[test]
	fn explicit_worker_count_is_kept() {
		let mut config = PipelineConfig::default();
		config.set_workers(3);
		assert_eq!(config.workers(), 3);
	}
}
