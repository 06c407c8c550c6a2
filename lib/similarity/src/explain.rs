//! Explainability for similarity results
//!
//! Summaries that accompany a ranked day list: how large the pool was,
//! which days were dropped and why, and how the returned scores spread.

use crate::normalize::PoolStatistics;
use crate::pool::ExcludedDay;
use crate::rerank::{Ranking, SimilarityScore};
use serde::{Deserialize, Serialize};

/// Summary statistics for the returned similarity scores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityStats {
    /// Number of candidates considered (full pool)
    pub candidates_count: usize,
    /// Number of results returned
    pub results_count: usize,
    /// Combined score of the rank-1 day
    pub best_score: f64,
    /// Combined score of the last returned day
    pub worst_score: f64,
    pub avg_score: f64,
    /// Mean raw Euclidean distance of the returned days
    pub mean_euclidean: f64,
    /// Mean raw cosine distance of the returned days
    pub mean_cosine: f64,
}

impl SimilarityStats {
    /// Compute stats from rank-ordered scores
    pub fn compute(results: &[SimilarityScore], candidates_count: usize) -> Self {
        if results.is_empty() {
            return Self {
                candidates_count,
                results_count: 0,
                best_score: 0.0,
                worst_score: 0.0,
                avg_score: 0.0,
                mean_euclidean: 0.0,
                mean_cosine: 0.0,
            };
        }

        let n = results.len() as f64;
        let mean_of = |f: fn(&SimilarityScore) -> f64| results.iter().map(f).sum::<f64>() / n;

        Self {
            candidates_count,
            results_count: results.len(),
            best_score: results[0].combined_score,
            worst_score: results[results.len() - 1].combined_score,
            avg_score: mean_of(|s| s.combined_score),
            mean_euclidean: mean_of(|s| s.euclidean),
            mean_cosine: mean_of(|s| s.cosine),
        }
    }
}

/// Pool coverage and normalization details for an analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolSummary {
    pub candidates_considered: usize,
    pub excluded_days: Vec<ExcludedDay>,
    pub euclidean_stats: PoolStatistics,
    pub cosine_stats: PoolStatistics,
    pub stats: SimilarityStats,
}

impl PoolSummary {
    pub fn from_ranking(ranking: &Ranking, excluded_days: Vec<ExcludedDay>) -> Self {
        Self {
            candidates_considered: ranking.pool_size,
            excluded_days,
            euclidean_stats: ranking.euclidean_stats,
            cosine_stats: ranking.cosine_stats,
            stats: SimilarityStats::compute(&ranking.scores, ranking.pool_size),
        }
    }
}
