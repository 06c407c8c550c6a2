use crate::error::{Error, Result};
use crate::record::DayRecords;
use crate::resolver::VariableFieldResolver;
use crate::variable::MatchVariable;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Number of hour-ending slots in a day vector
pub const HOURS_PER_DAY: usize = 24;

/// A complete 24-point hourly profile of one variable on one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayVector {
    pub day: NaiveDate,
    pub variable: MatchVariable,
    values: [f64; HOURS_PER_DAY],
}

impl DayVector {
    #[inline]
    #[must_use]
    pub fn new(day: NaiveDate, variable: MatchVariable, values: [f64; HOURS_PER_DAY]) -> Self {
        Self { day, variable, values }
    }

    /// Build from a slice; fails unless it holds exactly 24 values
    pub fn from_slice(day: NaiveDate, variable: MatchVariable, values: &[f64]) -> Result<Self> {
        let values: [f64; HOURS_PER_DAY] = values.try_into().map_err(|_| Error::InvalidParameter(format!(
            "day vector for {} needs {} values, got {}",
            day,
            HOURS_PER_DAY,
            values.len()
        )))?;
        Ok(Self::new(day, variable, values))
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    #[inline]
    #[must_use]
    pub fn values(&self) -> &[f64; HOURS_PER_DAY] {
        &self.values
    }

    /// Value at hour-ending `hour` (1..=24)
    #[inline]
    pub fn hour(&self, hour: u8) -> Option<f64> {
        let idx = usize::from(hour).checked_sub(1)?;
        self.values.get(idx).copied()
    }

    #[inline]
    pub fn norm(&self) -> f64 {
        self.values.iter().map(|x| x * x).sum::<f64>().sqrt()
    }

    pub fn mean(&self) -> f64 {
        self.values.iter().sum::<f64>() / HOURS_PER_DAY as f64
    }

    pub fn peak(&self) -> f64 {
        self.values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }
}

/// Assembles day vectors from raw hourly records
#[derive(Debug, Clone, Copy, Default)]
pub struct DayVectorBuilder {
    resolver: VariableFieldResolver,
}

impl DayVectorBuilder {
    pub fn new() -> Self {
        Self {
            resolver: VariableFieldResolver::new(),
        }
    }

    pub fn resolver(&self) -> &VariableFieldResolver {
        &self.resolver
    }

    /// Build the vector for `variable` on `day`.
    ///
    /// Every hour-ending 1..=24 must have a record whose resolved field holds
    /// a finite value; otherwise fails with [`Error::IncompleteDay`] naming the
    /// first offending hour. Duplicate hour-endings use the first record.
    pub fn build(&self, day: NaiveDate, variable: &MatchVariable, records: &DayRecords) -> Result<DayVector> {
        let mut values = [0.0f64; HOURS_PER_DAY];

        for (slot, hour) in values.iter_mut().zip(1..=HOURS_PER_DAY as u8) {
            let incomplete = |reason: &str| Error::IncompleteDay {
                day,
                variable: variable.to_string(),
                hour,
                reason: reason.to_string(),
            };

            let record = records.hour(hour).ok_or_else(|| incomplete("has no record"))?;
            let field = self
                .resolver
                .resolve(variable, record)
                .ok_or_else(|| incomplete("has no matching field"))?;
            let value = record
                .get(field)
                .filter(|v| v.is_finite())
                .ok_or_else(|| incomplete("has a non-finite value"))?;

            *slot = value;
        }

        Ok(DayVector::new(day, variable.clone(), values))
    }
}
