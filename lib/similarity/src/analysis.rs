//! Analysis request and result types
//!
//! These mirror the request/response boundary of the dashboard: camelCase
//! top-level keys, similarity scores with snake_case metric names, and
//! `{variable → {day → ...}}` maps for the reusable day vectors and the raw
//! chart rows.

use crate::explain::PoolSummary;
use crate::rerank::{validate_top_n, validate_weight, SimilarityScore};
use ahash::RandomState;
use chrono::NaiveDate;
use likeday_core::{DayRecordSet, DayRecords, DayVector, Error, MatchVariable, Result, HOURS_PER_DAY};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

/// Default number of similar days returned
pub const DEFAULT_TOP_N: usize = 10;

/// Default blend between shape (0) and magnitude (1)
pub const DEFAULT_EUCLIDEAN_WEIGHT: f64 = 0.5;

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

fn default_euclidean_weight() -> f64 {
    DEFAULT_EUCLIDEAN_WEIGHT
}

/// How the reference day's profile is sourced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceMode {
    /// The reference day is a past day described by the match variable itself
    #[default]
    Historical,
    /// The reference day is described by the match variable's day-ahead counterpart
    Forecast,
}

impl ReferenceMode {
    /// Variable used to build the reference day's vector
    pub fn reference_variable(&self, variable: &MatchVariable) -> MatchVariable {
        match self {
            ReferenceMode::Historical => variable.clone(),
            ReferenceMode::Forecast => variable.forecast_counterpart(),
        }
    }
}

impl fmt::Display for ReferenceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceMode::Historical => f.write_str("historical"),
            ReferenceMode::Forecast => f.write_str("forecast"),
        }
    }
}

impl FromStr for ReferenceMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "historical" => Ok(ReferenceMode::Historical),
            "forecast" => Ok(ReferenceMode::Forecast),
            other => Err(format!("unknown reference mode '{other}', expected historical or forecast")),
        }
    }
}

/// A likeday analysis request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub reference_date: NaiveDate,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub match_variable: MatchVariable,
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    #[serde(default = "default_euclidean_weight")]
    pub euclidean_weight: f64,
    #[serde(default)]
    pub reference_mode: ReferenceMode,
}

impl AnalysisRequest {
    pub fn new(
        reference_date: NaiveDate,
        start_date: NaiveDate,
        end_date: NaiveDate,
        match_variable: MatchVariable,
    ) -> Self {
        Self {
            reference_date,
            start_date,
            end_date,
            match_variable,
            top_n: DEFAULT_TOP_N,
            euclidean_weight: DEFAULT_EUCLIDEAN_WEIGHT,
            reference_mode: ReferenceMode::Historical,
        }
    }

    #[must_use]
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    #[must_use]
    pub fn with_euclidean_weight(mut self, weight: f64) -> Self {
        self.euclidean_weight = weight;
        self
    }

    #[must_use]
    pub fn with_reference_mode(mut self, mode: ReferenceMode) -> Self {
        self.reference_mode = mode;
        self
    }

    /// Reject bad parameters before any data is touched
    pub fn validate(&self) -> Result<()> {
        if self.start_date > self.end_date {
            return Err(Error::InvalidParameter(format!(
                "startDate {} is after endDate {}",
                self.start_date, self.end_date
            )));
        }
        validate_top_n(self.top_n)?;
        validate_weight(self.euclidean_weight)
    }

    /// Variable used for the reference day's vector
    pub fn reference_variable(&self) -> MatchVariable {
        self.reference_mode.reference_variable(&self.match_variable)
    }
}

/// Projection request for a day-set taken from an earlier response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecondaryRequest {
    pub reference_date: NaiveDate,
    /// Similar days in rank order
    pub top_similar_days: Vec<NaiveDate>,
    pub match_variable: MatchVariable,
    #[serde(default)]
    pub reference_mode: ReferenceMode,
}

/// Already-extracted 24-point series keyed by `(variable, day)`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DayVectorCache {
    entries: HashMap<MatchVariable, BTreeMap<NaiveDate, [f64; HOURS_PER_DAY]>, RandomState>,
}

impl DayVectorCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, vector: &DayVector) {
        self.entries
            .entry(vector.variable.clone())
            .or_default()
            .insert(vector.day, *vector.values());
    }

    pub fn get(&self, variable: &MatchVariable, day: NaiveDate) -> Option<DayVector> {
        self.entries
            .get(variable)
            .and_then(|days| days.get(&day))
            .map(|values| DayVector::new(day, variable.clone(), *values))
    }

    pub fn contains(&self, variable: &MatchVariable, day: NaiveDate) -> bool {
        self.entries
            .get(variable)
            .map_or(false, |days| days.contains_key(&day))
    }

    pub fn variables(&self) -> impl Iterator<Item = &MatchVariable> {
        self.entries.keys()
    }

    /// Total number of cached (variable, day) series
    pub fn len(&self) -> usize {
        self.entries.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Raw hourly rows for charting, keyed by variable then day
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChartData {
    entries: HashMap<MatchVariable, BTreeMap<NaiveDate, DayRecords>, RandomState>,
}

impl ChartData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, variable: &MatchVariable, day: NaiveDate, records: DayRecords) {
        self.entries
            .entry(variable.clone())
            .or_default()
            .insert(day, records);
    }

    pub fn get(&self, variable: &MatchVariable, day: NaiveDate) -> Option<&DayRecords> {
        self.entries.get(variable).and_then(|days| days.get(&day))
    }

    /// Days charted for `variable`, chronological
    pub fn days(&self, variable: &MatchVariable) -> Vec<NaiveDate> {
        self.entries
            .get(variable)
            .map(|days| days.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Raw rows are variable-independent; collect every charted day once
    pub fn to_record_set(&self) -> DayRecordSet {
        let mut set = DayRecordSet::new();
        for days in self.entries.values() {
            for (day, records) in days {
                if !set.contains_day(day) {
                    set.insert_day(*day, records.clone());
                }
            }
        }
        set
    }

    pub fn is_empty(&self) -> bool {
        self.entries.values().all(BTreeMap::is_empty)
    }
}

/// Outcome of a likeday analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub reference_date: NaiveDate,
    pub match_variable: MatchVariable,
    #[serde(default)]
    pub reference_mode: ReferenceMode,
    pub top_n: usize,
    pub euclidean_weight: f64,
    /// Rank-ordered, at most `top_n` long
    pub similarity_scores: Vec<SimilarityScore>,
    /// Reference and top-N series, reusable by projections
    pub day_vectors: DayVectorCache,
    #[serde(default)]
    pub chart_data: ChartData,
    pub pool_summary: PoolSummary,
}

impl AnalysisResult {
    /// Similar days in rank order
    pub fn top_days(&self) -> Vec<NaiveDate> {
        self.similarity_scores.iter().map(|s| s.day).collect()
    }

    /// Vector the reference day was scored with
    pub fn reference_vector(&self) -> Option<DayVector> {
        let variable = self.reference_mode.reference_variable(&self.match_variable);
        self.day_vectors.get(&variable, self.reference_date)
    }

    pub fn score_for(&self, day: NaiveDate) -> Option<&SimilarityScore> {
        self.similarity_scores.iter().find(|s| s.day == day)
    }
}
