//! Raw distances between day vectors
//!
//! Two complementary metrics:
//! - Euclidean distance captures both shape and magnitude differences.
//! - Cosine distance captures shape only; it is scale-invariant for any
//!   positive multiple.
//!
//! Both operate on complete 24-point vectors only.

use likeday_core::DayVector;
use serde::{Deserialize, Serialize};

/// Cosine distance assigned when either vector has zero norm.
///
/// Flat-zero days are treated as maximally dissimilar in shape, including
/// when both sides are flat-zero.
pub const ZERO_NORM_COSINE_DISTANCE: f64 = 2.0;

/// Raw Euclidean and cosine distances for one candidate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawDistances {
    pub euclidean: f64,
    pub cosine: f64,
}

/// Computes raw distances between a reference and a candidate vector
#[derive(Debug, Clone, Copy, Default)]
pub struct DistanceCalculator;

impl DistanceCalculator {
    pub fn new() -> Self {
        Self
    }

    pub fn distances(&self, reference: &DayVector, candidate: &DayVector) -> RawDistances {
        RawDistances {
            euclidean: euclidean_distance(reference.as_slice(), candidate.as_slice()),
            cosine: cosine_distance(reference.as_slice(), candidate.as_slice()),
        }
    }
}

/// `sqrt(Σ (a[i] − b[i])²)`
#[inline]
pub fn euclidean_distance(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

/// `1 − (a·b)/(‖a‖·‖b‖)`, or [`ZERO_NORM_COSINE_DISTANCE`] if either norm is zero.
///
/// The similarity term is clamped to [-1, 1] so rounding never yields a
/// distance outside [0, 2].
#[inline]
pub fn cosine_distance(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    let mut dot = 0.0;
    let mut norm_a_sq = 0.0;
    let mut norm_b_sq = 0.0;

    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a_sq += x * x;
        norm_b_sq += y * y;
    }

    if norm_a_sq == 0.0 || norm_b_sq == 0.0 {
        return ZERO_NORM_COSINE_DISTANCE;
    }

    let similarity = (dot / (norm_a_sq * norm_b_sq).sqrt()).clamp(-1.0, 1.0);
    1.0 - similarity
}
