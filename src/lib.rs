//! # likeday
//!
//! Likeday analysis for energy-market time series.
//!
//! Given a reference day and a historical date range, likeday ranks the
//! historical days whose 24-hour profile of a market variable (real-time
//! load, LMP, day-ahead forecasts, ...) best resembles the reference. Each
//! day is compared on magnitude and on shape, the two distances are
//! normalized across the pool and blended with a single weight.
//!
//! ## Quick Start
//!
//! ### From the command line
//!
//! ```bash
//! likeday --data rows.json analyze --reference 2024-08-15 \
//!     --start 2024-06-01 --end 2024-08-14 --variable "RT Load" --top-n 5
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use likeday::prelude::*;
//! use chrono::NaiveDate;
//!
//! let source = JsonFileSource::open("rows.json").unwrap();
//! let engine = LikedayEngine::new(source);
//!
//! let request = AnalysisRequest::new(
//!     NaiveDate::from_ymd_opt(2024, 8, 15).unwrap(),
//!     NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
//!     NaiveDate::from_ymd_opt(2024, 8, 14).unwrap(),
//!     MatchVariable::RtLoad,
//! )
//! .with_top_n(5)
//! .with_euclidean_weight(0.7);
//!
//! let result = engine.analyze(&request).unwrap();
//! for score in &result.similarity_scores {
//!     println!("#{} {} {:.3}", score.rank, score.day, score.combined_score);
//! }
//!
//! // Same days, another variable
//! let lmp = engine.project(&result, &MatchVariable::RtLmp).unwrap();
//! ```
//!
//! ## Crate Structure
//!
//! - [`likeday-core`](https://docs.rs/likeday-core) - Hourly records, variables, field resolution, day vectors, sources
//! - [`likeday-similarity`](https://docs.rs/likeday-similarity) - Distances, normalization, ranking, projection, engine

// Re-export core types
pub use likeday_core::{
    DayRecordSet, DayRecords, DaySource, DayVector, DayVectorBuilder,
    Error, HourlyRecord, InMemorySource, JsonFileSource, MatchVariable,
    Result, VariableFieldResolver, HOURS_PER_DAY,
};

// Re-export the engine
pub use likeday_similarity::{
    AnalysisRequest, AnalysisResult, EngineConfig, LikedayEngine,
    Projection, ReferenceMode, SecondaryRequest, SimilarityScore,
    DEFAULT_EUCLIDEAN_WEIGHT, DEFAULT_TOP_N,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        AnalysisRequest, AnalysisResult, EngineConfig, LikedayEngine,
        Projection, ReferenceMode, SecondaryRequest, SimilarityScore,
        DaySource, DayVector, InMemorySource, JsonFileSource, MatchVariable,
        Error, Result,
    };
}

/// Distance primitives on raw hourly profiles
pub mod distance {
    pub use likeday_similarity::distance::{cosine_distance, euclidean_distance};
}
