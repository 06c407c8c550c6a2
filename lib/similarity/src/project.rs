//! Secondary projection
//!
//! Once a day-set has been ranked for one variable, the dashboard looks at
//! how *another* variable behaved on exactly those days. Projection builds
//! the new series without re-running distances, normalization or ranking;
//! the day-set and its order are never altered.

use crate::analysis::{AnalysisResult, ChartData, DayVectorCache, ReferenceMode, SecondaryRequest};
use chrono::NaiveDate;
use likeday_core::{DayRecordSet, DayVector, DayVectorBuilder, MatchVariable, HOURS_PER_DAY};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A fixed, rank-ordered set of days to project onto
#[derive(Debug, Clone, PartialEq)]
pub struct DaySet {
    pub reference_date: NaiveDate,
    pub reference_mode: ReferenceMode,
    /// Similar days, rank 1 first
    pub ranked_days: Vec<NaiveDate>,
}

impl DaySet {
    pub fn from_result(result: &AnalysisResult) -> Self {
        Self {
            reference_date: result.reference_date,
            reference_mode: result.reference_mode,
            ranked_days: result.top_days(),
        }
    }

    pub fn from_request(request: &SecondaryRequest) -> Self {
        Self {
            reference_date: request.reference_date,
            reference_mode: request.reference_mode,
            ranked_days: request.top_similar_days.clone(),
        }
    }

    /// Reference day first, then similar days with their 1-based rank
    fn entries(&self) -> impl Iterator<Item = (NaiveDate, Option<usize>)> + '_ {
        std::iter::once((self.reference_date, None)).chain(
            self.ranked_days
                .iter()
                .enumerate()
                .map(|(idx, day)| (*day, Some(idx + 1))),
        )
    }

    /// Every day in the set, reference first
    pub fn all_days(&self) -> Vec<NaiveDate> {
        self.entries().map(|(day, _)| day).collect()
    }

    /// Variable used for `day`: the reference day of a forecast set uses
    /// the day-ahead counterpart
    fn variable_for(&self, rank: Option<usize>, variable: &MatchVariable) -> MatchVariable {
        match rank {
            None => self.reference_mode.reference_variable(variable),
            Some(_) => variable.clone(),
        }
    }
}

/// One projected series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectedDay {
    pub day: NaiveDate,
    /// `None` for the reference day
    pub rank: Option<usize>,
    pub values: [f64; HOURS_PER_DAY],
}

/// A new variable's series over an existing day-set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Projection {
    pub reference_date: NaiveDate,
    pub variable: MatchVariable,
    /// Reference day first, then similar days in rank order
    pub days: Vec<ProjectedDay>,
    /// Days that could not be vectorized for `variable`
    pub omitted: Vec<NaiveDate>,
    pub chart_data: ChartData,
}

impl Projection {
    pub fn day(&self, day: NaiveDate) -> Option<&ProjectedDay> {
        self.days.iter().find(|p| p.day == day)
    }
}

/// Builds series for a new variable over a ranked day-set
#[derive(Debug, Clone, Copy, Default)]
pub struct SecondaryProjector {
    builder: DayVectorBuilder,
}

impl SecondaryProjector {
    pub fn new() -> Self {
        Self {
            builder: DayVectorBuilder::new(),
        }
    }

    /// Days that are neither cached for `variable` nor covered by `records`
    pub fn required_days(
        &self,
        day_set: &DaySet,
        variable: &MatchVariable,
        cache: &DayVectorCache,
        records: &DayRecordSet,
    ) -> Vec<NaiveDate> {
        day_set
            .entries()
            .filter(|(day, rank)| {
                let v = day_set.variable_for(*rank, variable);
                !cache.contains(&v, *day) && !records.contains_day(day)
            })
            .map(|(day, _)| day)
            .collect()
    }

    /// Project `variable` onto the day-set.
    ///
    /// Cached series are reused as-is; the rest are built from `records`.
    /// Days that cannot be vectorized land in `omitted`.
    pub fn project(
        &self,
        day_set: &DaySet,
        variable: &MatchVariable,
        cache: &DayVectorCache,
        records: &DayRecordSet,
    ) -> Projection {
        let mut days = Vec::with_capacity(day_set.ranked_days.len() + 1);
        let mut omitted = Vec::new();
        let mut chart_data = ChartData::new();

        for (day, rank) in day_set.entries() {
            let target = day_set.variable_for(rank, variable);
            let day_records = records.get(&day);

            if let Some(rows) = day_records {
                chart_data.insert(variable, day, rows.clone());
            }

            match self.vector_for(&target, day, cache, records) {
                Some(vector) => days.push(ProjectedDay {
                    day,
                    rank,
                    values: *vector.values(),
                }),
                None => omitted.push(day),
            }
        }

        debug!(
            variable = %variable,
            projected = days.len(),
            omitted = omitted.len(),
            "projected day-set"
        );

        Projection {
            reference_date: day_set.reference_date,
            variable: variable.clone(),
            days,
            omitted,
            chart_data,
        }
    }

    fn vector_for(
        &self,
        variable: &MatchVariable,
        day: NaiveDate,
        cache: &DayVectorCache,
        records: &DayRecordSet,
    ) -> Option<DayVector> {
        if let Some(vector) = cache.get(variable, day) {
            return Some(vector);
        }
        let day_records = records.get(&day)?;
        match self.builder.build(day, variable, day_records) {
            Ok(vector) => Some(vector),
            Err(e) => {
                debug!(day = %day, variable = %variable, error = %e, "omitting day from projection");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use likeday_core::HourlyRecord;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 9, d).unwrap()
    }

    fn push_day(set: &mut DayRecordSet, d: NaiveDate, fields: &[(&str, f64)]) {
        for h in 1..=24u8 {
            let record = fields
                .iter()
                .fold(HourlyRecord::new(h), |r, (n, v)| r.with_field(*n, *v));
            set.push(d, record);
        }
    }

    fn day_set(mode: ReferenceMode) -> DaySet {
        DaySet {
            reference_date: day(10),
            reference_mode: mode,
            ranked_days: vec![day(3), day(1), day(7)],
        }
    }

    #[test]
    fn test_projection_keeps_rank_order_and_omits() {
        let mut records = DayRecordSet::new();
        push_day(&mut records, day(10), &[("SP15_DALMP", 40.0)]);
        push_day(&mut records, day(3), &[("SP15_DALMP", 33.0)]);
        push_day(&mut records, day(1), &[("CAISO_RTLOAD", 1.0)]);
        push_day(&mut records, day(7), &[("SP15_DALMP", 37.0)]);

        let projection = SecondaryProjector::new().project(
            &day_set(ReferenceMode::Historical),
            &MatchVariable::DaLmp,
            &DayVectorCache::new(),
            &records,
        );

        let order: Vec<_> = projection.days.iter().map(|p| (p.day, p.rank)).collect();
        assert_eq!(order, vec![(day(10), None), (day(3), Some(1)), (day(7), Some(3))]);
        assert_eq!(projection.omitted, vec![day(1)]);
        assert_eq!(projection.day(day(7)).unwrap().values[0], 37.0);
    }

    #[test]
    fn test_cached_series_reused_without_records() {
        let mut cache = DayVectorCache::new();
        for d in [10, 3, 1, 7] {
            cache.insert(&DayVector::new(day(d), MatchVariable::RtLoad, [f64::from(d); 24]));
        }
        let set = day_set(ReferenceMode::Historical);
        let projector = SecondaryProjector::new();

        assert!(projector
            .required_days(&set, &MatchVariable::RtLoad, &cache, &DayRecordSet::new())
            .is_empty());

        let projection = projector.project(&set, &MatchVariable::RtLoad, &cache, &DayRecordSet::new());
        assert_eq!(projection.days.len(), 4);
        assert!(projection.omitted.is_empty());
        assert_eq!(projection.day(day(3)).unwrap().values[5], 3.0);
    }

    #[test]
    fn test_required_days_lists_uncovered_days() {
        let mut records = DayRecordSet::new();
        push_day(&mut records, day(3), &[("X", 1.0)]);
        let required = SecondaryProjector::new().required_days(
            &day_set(ReferenceMode::Historical),
            &MatchVariable::RtLmp,
            &DayVectorCache::new(),
            &records,
        );
        assert_eq!(required, vec![day(10), day(1), day(7)]);
    }

    #[test]
    fn test_forecast_reference_uses_counterpart() {
        let mut records = DayRecordSet::new();
        push_day(&mut records, day(10), &[("CAISO_DA_DEMAND_FORECAST", 900.0)]);
        for d in [3, 1, 7] {
            push_day(&mut records, day(d), &[("CAISO_RTLOAD", 800.0)]);
        }

        let projection = SecondaryProjector::new().project(
            &day_set(ReferenceMode::Forecast),
            &MatchVariable::RtLoad,
            &DayVectorCache::new(),
            &records,
        );

        assert!(projection.omitted.is_empty());
        assert_eq!(projection.days[0].values[0], 900.0);
        assert_eq!(projection.days[1].values[0], 800.0);
    }
}
