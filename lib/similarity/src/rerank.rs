//! Similarity ranking
//!
//! Scores every pool member against the reference day, z-scores both raw
//! metrics over the *full* pool, blends them with the Euclidean weight and
//! ranks ascending (lower combined score = more similar). Truncation to the
//! requested top N happens only after ranking, so the weighting does not
//! depend on how many results the caller asked for.

use crate::distance::{DistanceCalculator, RawDistances};
use crate::normalize::{PoolNormalizer, PoolStatistics};
use crate::pool::CandidatePool;
use chrono::NaiveDate;
use likeday_core::{DayVector, Error, Result};
use ordered_float::OrderedFloat;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Pools at least this large compute distances in parallel by default
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 256;

/// Similarity of one candidate day to the reference day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityScore {
    pub day: NaiveDate,
    /// Raw Euclidean distance (magnitude)
    pub euclidean: f64,
    /// Raw cosine distance (shape)
    pub cosine: f64,
    pub euclidean_z: f64,
    pub cosine_z: f64,
    /// Weighted blend of the z-scores; lower is more similar
    pub combined_score: f64,
    /// 1 = most similar; dense over the full pool
    pub rank: usize,
}

/// Ranked candidates plus the pool statistics used to normalize them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ranking {
    pub scores: Vec<SimilarityScore>,
    pub pool_size: usize,
    pub euclidean_stats: PoolStatistics,
    pub cosine_stats: PoolStatistics,
}

/// Combines normalized distances into ranked similarity scores
#[derive(Debug, Clone)]
pub struct SimilarityRanker {
    top_n: usize,
    euclidean_weight: f64,
    parallel_threshold: usize,
    calculator: DistanceCalculator,
    normalizer: PoolNormalizer,
}

impl SimilarityRanker {
    /// Create a ranker returning the `top_n` best days.
    ///
    /// `euclidean_weight` slides from 0 ("Shape", cosine only) to 1
    /// ("Magnitude", Euclidean only).
    pub fn new(top_n: usize, euclidean_weight: f64) -> Result<Self> {
        validate_top_n(top_n)?;
        validate_weight(euclidean_weight)?;
        Ok(Self {
            top_n,
            euclidean_weight,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            calculator: DistanceCalculator::new(),
            normalizer: PoolNormalizer::new(),
        })
    }

    /// Override the pool size at which distances are computed with rayon
    #[must_use]
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }

    pub fn euclidean_weight(&self) -> f64 {
        self.euclidean_weight
    }

    /// Rank the pool and keep the top N entries
    pub fn rank(&self, reference: &DayVector, pool: &CandidatePool) -> Result<Ranking> {
        let mut ranking = self.rank_all(reference, pool)?;
        ranking.scores.truncate(self.top_n);
        Ok(ranking)
    }

    /// Rank every pool member without truncation
    pub fn rank_all(&self, reference: &DayVector, pool: &CandidatePool) -> Result<Ranking> {
        if pool.is_empty() {
            return Err(Error::InsufficientData(format!(
                "no comparable days found for {} relative to {}",
                pool.variable(),
                pool.reference_date()
            )));
        }

        let raw = self.raw_distances(reference, pool.vectors());

        let euclidean: Vec<f64> = raw.iter().map(|d| d.euclidean).collect();
        let cosine: Vec<f64> = raw.iter().map(|d| d.cosine).collect();
        let (euclidean_stats, euclidean_z) = self.normalizer.normalize(&euclidean);
        let (cosine_stats, cosine_z) = self.normalizer.normalize(&cosine);

        let w = self.euclidean_weight;
        let mut scores: Vec<SimilarityScore> = pool
            .vectors()
            .iter()
            .zip(raw.iter())
            .zip(euclidean_z.iter().zip(cosine_z.iter()))
            .map(|((vector, d), (ez, cz))| SimilarityScore {
                day: vector.day,
                euclidean: d.euclidean,
                cosine: d.cosine,
                euclidean_z: *ez,
                cosine_z: *cz,
                combined_score: w * ez + (1.0 - w) * cz,
                rank: 0,
            })
            .collect();

        // Stable: equal scores keep the pool's chronological order
        scores.sort_by_key(|s| OrderedFloat(s.combined_score));
        for (idx, score) in scores.iter_mut().enumerate() {
            score.rank = idx + 1;
        }

        Ok(Ranking {
            scores,
            pool_size: pool.len(),
            euclidean_stats,
            cosine_stats,
        })
    }

    /// Raw distances in pool order
    fn raw_distances(&self, reference: &DayVector, candidates: &[DayVector]) -> Vec<RawDistances> {
        if candidates.len() >= self.parallel_threshold {
            candidates
                .par_iter()
                .map(|c| self.calculator.distances(reference, c))
                .collect()
        } else {
            candidates
                .iter()
                .map(|c| self.calculator.distances(reference, c))
                .collect()
        }
    }
}

pub(crate) fn validate_top_n(top_n: usize) -> Result<()> {
    if top_n < 1 {
        return Err(Error::InvalidParameter("topN must be at least 1".to_string()));
    }
    Ok(())
}

pub(crate) fn validate_weight(weight: f64) -> Result<()> {
    if !weight.is_finite() || !(0.0..=1.0).contains(&weight) {
        return Err(Error::InvalidParameter(format!(
            "euclideanWeight must be within [0, 1], got {weight}"
        )));
    }
    Ok(())
}
