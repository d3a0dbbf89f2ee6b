use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Ordered upper bounds splitting word frequencies into bands.
///
/// With bounds `[0, 10, 20, 50, 100]` the bands are `0`, `1 - 10`,
/// `11 - 20`, `21 - 50`, `51 - 100` and `101 - inf`.
///
/// # Invariants
/// - The first bound is 0
/// - Bounds are strictly increasing
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(try_from = "Vec<u64>", into = "Vec<u64>")]
pub struct FrequencyBands {
	bounds: Vec<u64>,
}

impl Default for FrequencyBands {
	fn default() -> Self {
		Self { bounds: vec![0, 10, 20, 50, 100] }
	}
}

impl TryFrom<Vec<u64>> for FrequencyBands {
	type Error = ConfigError;

	fn try_from(bounds: Vec<u64>) -> Result<Self, Self::Error> {
		Self::new(bounds)
	}
}

impl From<FrequencyBands> for Vec<u64> {
	fn from(bands: FrequencyBands) -> Self {
		bands.bounds
	}
}

impl FrequencyBands {
	/// # Errors
	/// Returns an error if `bounds` is empty, does not start at 0 or is
	/// not strictly increasing.
	pub fn new(bounds: Vec<u64>) -> Result<Self, ConfigError> {
		let starts_at_zero = bounds.first() == Some(&0);
		let increasing = bounds.windows(2).all(|pair| pair[0] < pair[1]);
		if !starts_at_zero || !increasing {
			return Err(ConfigError::InvalidFrequencyBands(bounds));
		}
		Ok(Self { bounds })
	}

	pub fn bounds(&self) -> &[u64] {
		&self.bounds
	}

	/// Returns the band containing `frequency`.
	pub fn rank(&self, frequency: u64) -> FrequencyRank {
		let mut low = 0;
		for bound in &self.bounds {
			if frequency <= *bound {
				return FrequencyRank { low, high: Some(*bound) };
			}
			low = bound.saturating_add(1);
		}
		FrequencyRank { low, high: None }
	}
}

/// A frequency band, inclusive on both ends. `high` is `None` for the
/// open-ended top band.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrequencyRank {
	pub low: u64,
	pub high: Option<u64>,
}

impl fmt::Display for FrequencyRank {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.high {
			Some(high) if high == self.low => write!(f, "FREQRANK[{}]", high),
			Some(high) => write!(f, "FREQRANK[{} - {}]", self.low, high),
			None => write!(f, "FREQRANK[{} - inf]", self.low),
		}
	}
}

/// Stratum used to balance statistics independently.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WordCategory {
	/// Number of phonemes.
	pub length: usize,
	pub rank: FrequencyRank,
}

impl WordCategory {
	pub fn new(length: usize, frequency: u64, bands: &FrequencyBands) -> Self {
		Self { length, rank: bands.rank(frequency) }
	}
}

impl fmt::Display for WordCategory {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} phonemes, {}", self.length, self.rank)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn default_bands_rank_frequencies() {
		let bands = FrequencyBands::default();
		let ranks: Vec<String> = [0, 1, 10, 11, 20, 21, 50, 51, 100, 101, 5000]
			.iter()
			.map(|frequency| bands.rank(*frequency).to_string())
			.collect();
		assert_eq!(
			ranks,
			vec![
				"FREQRANK[0]",
				"FREQRANK[1 - 10]",
				"FREQRANK[1 - 10]",
				"FREQRANK[11 - 20]",
				"FREQRANK[11 - 20]",
				"FREQRANK[21 - 50]",
				"FREQRANK[21 - 50]",
				"FREQRANK[51 - 100]",
				"FREQRANK[51 - 100]",
				"FREQRANK[101 - inf]",
				"FREQRANK[101 - inf]",
			]
		);
	}

	#[test]
	fn bands_do_not_overlap() {
		let bands = FrequencyBands::new(vec![0, 2, 5]).unwrap();
		assert!(bands.rank(2) < bands.rank(3));
		assert_eq!(bands.rank(3), bands.rank(5));
		assert_ne!(bands.rank(5), bands.rank(6));
	}

	#[test]
	fn largest_bound_closes_the_last_band() {
		let bands = FrequencyBands::new(vec![0, u64::MAX]).unwrap();
		let top = FrequencyRank { low: 1, high: Some(u64::MAX) };
		assert_eq!(bands.rank(u64::MAX), top);
		assert_eq!(bands.rank(7), top);
		assert_eq!(bands.rank(0).to_string(), "FREQRANK[0]");
	}

	#[test]
	fn invalid_bounds_are_rejected() {
		assert!(FrequencyBands::new(vec![]).is_err());
		assert!(FrequencyBands::new(vec![1, 2]).is_err());
		assert!(FrequencyBands::new(vec![0, 4, 4]).is_err());
	}

	#[test]
	fn categories_combine_length_and_band() {
		let bands = FrequencyBands::default();
		let a = WordCategory::new(3, 15, &bands);
		let b = WordCategory::new(3, 12, &bands);
		let c = WordCategory::new(4, 15, &bands);
		assert_eq!(a, b);
		assert_ne!(a, c);
		assert_eq!(a.to_string(), "3 phonemes, FREQRANK[11 - 20]");
	}
}
