//! Candidate pool construction
//!
//! A pool holds one complete [`DayVector`] per eligible historical day, in
//! chronological order. Days that cannot be vectorized are dropped and
//! remembered with the reason so callers can report data coverage.

use chrono::NaiveDate;
use likeday_core::{DayRecordSet, DayVector, DayVectorBuilder, MatchVariable};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A day dropped from the pool and why
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExcludedDay {
    pub day: NaiveDate,
    pub reason: String,
}

/// The immutable set of comparable days for one analysis
#[derive(Debug, Clone)]
pub struct CandidatePool {
    variable: MatchVariable,
    reference_date: NaiveDate,
    vectors: Vec<DayVector>,
    excluded: Vec<ExcludedDay>,
}

impl CandidatePool {
    /// Build the pool for `variable` over `[start, end]`, skipping the
    /// reference day and dropping incomplete days.
    pub fn build(
        builder: &DayVectorBuilder,
        records: &DayRecordSet,
        variable: &MatchVariable,
        reference_date: NaiveDate,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Self {
        let mut vectors = Vec::new();
        let mut excluded = Vec::new();

        for (day, day_records) in records.range(start, end) {
            if *day == reference_date {
                continue;
            }
            match builder.build(*day, variable, day_records) {
                Ok(vector) => vectors.push(vector),
                Err(e) => {
                    debug!(day = %day, variable = %variable, error = %e, "dropping day from candidate pool");
                    excluded.push(ExcludedDay {
                        day: *day,
                        reason: e.to_string(),
                    });
                }
            }
        }

        Self {
            variable: variable.clone(),
            reference_date,
            vectors,
            excluded,
        }
    }

    /// Assemble a pool from vectors that are already built.
    ///
    /// Vectors are sorted chronologically; the reference day is removed.
    pub fn from_vectors(variable: MatchVariable, reference_date: NaiveDate, mut vectors: Vec<DayVector>) -> Self {
        vectors.retain(|v| v.day != reference_date);
        vectors.sort_by_key(|v| v.day);
        Self {
            variable,
            reference_date,
            vectors,
            excluded: Vec::new(),
        }
    }

    pub fn variable(&self) -> &MatchVariable {
        &self.variable
    }

    pub fn reference_date(&self) -> NaiveDate {
        self.reference_date
    }

    /// Pool members in chronological order
    pub fn vectors(&self) -> &[DayVector] {
        &self.vectors
    }

    pub fn excluded(&self) -> &[ExcludedDay] {
        &self.excluded
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use likeday_core::HourlyRecord;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, d).unwrap()
    }

    fn push_day(set: &mut DayRecordSet, d: NaiveDate, hours: u8, value: f64) {
        for h in 1..=hours {
            set.push(d, HourlyRecord::new(h).with_field("CAISO_RTLOAD", value));
        }
    }

    #[test]
    fn test_build_excludes_reference_and_incomplete_days() {
        let mut set = DayRecordSet::new();
        push_day(&mut set, day(1), 24, 100.0);
        push_day(&mut set, day(2), 23, 100.0);
        push_day(&mut set, day(3), 24, 110.0);
        push_day(&mut set, day(4), 24, 120.0);
        push_day(&mut set, day(9), 24, 120.0);

        let pool = CandidatePool::build(
            &DayVectorBuilder::new(),
            &set,
            &MatchVariable::RtLoad,
            day(3),
            day(1),
            day(5),
        );

        let days: Vec<_> = pool.vectors().iter().map(|v| v.day).collect();
        assert_eq!(days, vec![day(1), day(4)]);
        assert_eq!(pool.excluded().len(), 1);
        assert_eq!(pool.excluded()[0].day, day(2));
        assert!(pool.excluded()[0].reason.contains("hour ending 24"));
    }

    #[test]
    fn test_from_vectors_sorts_and_drops_reference() {
        let v = |d| DayVector::new(day(d), MatchVariable::RtLmp, [1.0; 24]);
        let pool = CandidatePool::from_vectors(MatchVariable::RtLmp, day(2), vec![v(3), v(2), v(1)]);
        let days: Vec<_> = pool.vectors().iter().map(|v| v.day).collect();
        assert_eq!(days, vec![day(1), day(3)]);
        assert_eq!(pool.len(), 2);
    }
}
