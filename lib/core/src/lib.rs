//! # Likeday Core
//!
//! Core types for the Likeday similarity engine.
//!
//! This crate turns loosely structured hourly market records into the
//! canonical day vectors the similarity engine compares:
//!
//! - [`HourlyRecord`] - one hour of raw fields, tagged with an hour-ending
//! - [`MatchVariable`] - the canonical variable names (`RT Load`, `DA LMP`, ...)
//! - [`VariableFieldResolver`] - maps a variable onto a record's raw field
//! - [`DayVectorBuilder`] - assembles complete 24-point [`DayVector`]s
//! - [`DaySource`] - the time-series fetch seam
//!
//! ## Example
//!
//! ```rust
//! use likeday_core::{DayRecords, DayVectorBuilder, HourlyRecord, MatchVariable};
//! use chrono::NaiveDate;
//!
//! let day = NaiveDate::from_ymd_opt(2024, 7, 15).unwrap();
//! let records: DayRecords = (1..=24u8)
//!     .map(|h| HourlyRecord::new(h).with_field("CAISO_RTLOAD_MW", 25_000.0 + f64::from(h)))
//!     .collect();
//!
//! let vector = DayVectorBuilder::new()
//!     .build(day, &MatchVariable::RtLoad, &records)
//!     .unwrap();
//! assert_eq!(vector.hour(1), Some(25_001.0));
//! ```

pub mod error;
pub mod record;
pub mod resolver;
pub mod source;
pub mod variable;
pub mod vector;

pub use error::{Error, Result};
pub use record::{DayRecords, DayRecordSet, HourlyRecord, HOUR_ENDING_KEY};
pub use resolver::VariableFieldResolver;
pub use source::{DaySource, InMemorySource, JsonFileSource};
pub use variable::MatchVariable;
pub use vector::{DayVector, DayVectorBuilder, HOURS_PER_DAY};
