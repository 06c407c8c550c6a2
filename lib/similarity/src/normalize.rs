//! Pool-wide z-score normalization
//!
//! Raw Euclidean distances are in the units of the variable (MW, $/MWh)
//! while cosine distances live in [0, 2]. Rescaling each metric by its
//! population mean and standard deviation over the whole candidate pool
//! makes the two comparable before they are weighted together.

use serde::{Deserialize, Serialize};

/// Relative tolerance under which a standard deviation counts as zero
pub const ZERO_SIGMA_TOLERANCE: f64 = 1e-12;

/// Population statistics of one metric over the pool
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoolStatistics {
    pub mean: f64,
    pub std_dev: f64,
    pub count: usize,
}

impl PoolStatistics {
    /// Population mean and standard deviation; zeros for an empty slice
    pub fn compute(values: &[f64]) -> Self {
        let count = values.len();
        if count == 0 {
            return Self {
                mean: 0.0,
                std_dev: 0.0,
                count,
            };
        }

        let n = count as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / n;

        Self {
            mean,
            std_dev: variance.sqrt(),
            count,
        }
    }

    /// True when every value is (numerically) identical
    pub fn is_degenerate(&self) -> bool {
        self.std_dev <= ZERO_SIGMA_TOLERANCE * self.mean.abs().max(1.0)
    }

    /// z-score of a single value; 0 when the pool is degenerate
    #[inline]
    pub fn z_score(&self, value: f64) -> f64 {
        if self.is_degenerate() {
            0.0
        } else {
            (value - self.mean) / self.std_dev
        }
    }
}

/// z-scores both metrics over the full candidate pool
#[derive(Debug, Clone, Copy, Default)]
pub struct PoolNormalizer;

impl PoolNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// z-score every value against the statistics of the whole slice
    pub fn normalize(&self, values: &[f64]) -> (PoolStatistics, Vec<f64>) {
        let stats = PoolStatistics::compute(values);
        let z = values.iter().map(|v| stats.z_score(*v)).collect();
        (stats, z)
    }
}
