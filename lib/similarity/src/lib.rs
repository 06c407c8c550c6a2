//! # Likeday Similarity
//!
//! Finds historical days whose 24-hour profile of a market variable most
//! resembles a reference day.
//!
//! Each candidate is scored on two axes: **magnitude** (Euclidean distance)
//! and **shape** (cosine distance). Both are z-score normalized across the
//! candidate pool so they can be blended with a single weight, and days are
//! ranked by the blended score, lowest first.
//!
//! ## Features
//!
//! - **Candidate Pool**: Complete day vectors over a date range, incomplete days reported
//! - **Pool Normalization**: Population z-scores with a degenerate-pool guard
//! - **Weighted Ranking**: Deterministic ranks with chronological tie-breaking
//! - **Secondary Projection**: Reuse a ranked day-set for another variable
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use likeday_core::{DayRecordSet, HourlyRecord, InMemorySource, MatchVariable};
//! use likeday_similarity::{AnalysisRequest, LikedayEngine};
//!
//! let mut records = DayRecordSet::new();
//! for d in 1..=10u32 {
//!     let day = NaiveDate::from_ymd_opt(2024, 7, d).unwrap();
//!     for h in 1..=24u8 {
//!         let load = 20_000.0 + 100.0 * f64::from(d) + 50.0 * f64::from(h);
//!         records.push(day, HourlyRecord::new(h).with_field("CAISO_RTLOAD_MW", load));
//!     }
//! }
//!
//! let engine = LikedayEngine::new(InMemorySource::new(records));
//! let request = AnalysisRequest::new(
//!     NaiveDate::from_ymd_opt(2024, 7, 10).unwrap(),
//!     NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
//!     NaiveDate::from_ymd_opt(2024, 7, 9).unwrap(),
//!     MatchVariable::RtLoad,
//! )
//! .with_top_n(3);
//!
//! let result = engine.analyze(&request).unwrap();
//! assert_eq!(result.similarity_scores.len(), 3);
//! assert_eq!(result.similarity_scores[0].rank, 1);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  DaySource  │────>│   Builder   │────>│    Pool     │
//! │  (records)  │     │ (day→24h v) │     │ (candidates)│
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                            │                   │
//!                            │ reference  ┌─────────────┐
//!                            └───────────>│   Ranker    │
//!                                         │ (z + blend) │
//!                                         └─────────────┘
//!                                                │
//!                     ┌─────────────┐     ┌─────────────┐
//!                     │  Projector  │<────│   Result    │
//!                     │ (new var)   │     │  (explain)  │
//!                     └─────────────┘     └─────────────┘
//! ```

pub mod analysis;
pub mod distance;
pub mod engine;
pub mod explain;
pub mod normalize;
pub mod pool;
pub mod project;
pub mod rerank;

// Re-export main types for convenience
pub use analysis::{
    AnalysisRequest,
    AnalysisResult,
    ChartData,
    DayVectorCache,
    ReferenceMode,
    SecondaryRequest,
    DEFAULT_EUCLIDEAN_WEIGHT,
    DEFAULT_TOP_N,
};
pub use distance::{cosine_distance, euclidean_distance, DistanceCalculator, RawDistances};
pub use engine::{EngineConfig, LikedayEngine};
pub use explain::{PoolSummary, SimilarityStats};
pub use normalize::{PoolNormalizer, PoolStatistics};
pub use pool::{CandidatePool, ExcludedDay};
pub use project::{DaySet, ProjectedDay, Projection, SecondaryProjector};
pub use rerank::{Ranking, SimilarityRanker, SimilarityScore, DEFAULT_PARALLEL_THRESHOLD};
