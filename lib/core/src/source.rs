//! Time-series fetch collaborators
//!
//! The engine never talks to storage directly; it asks a [`DaySource`] for
//! per-day hourly records. Two sources ship with the crate: an in-memory
//! one for tests and embedding, and a JSON-file one used by the CLI.

use crate::error::{Error, Result};
use crate::record::{DayRecordSet, HourlyRecord};
use chrono::NaiveDate;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Accepted spellings of the date column in raw rows
const DATE_KEYS: [&str; 4] = ["DATE", "OPR_DT", "DAY", "TRADE_DATE"];

/// Supplies hourly records for calendar days
pub trait DaySource {
    /// All days with data in `[start, end]`
    fn fetch_range(&self, start: NaiveDate, end: NaiveDate) -> Result<DayRecordSet>;

    /// The listed days that have data; absent days are simply missing
    fn fetch_days(&self, days: &[NaiveDate]) -> Result<DayRecordSet>;
}

impl<S: DaySource + ?Sized> DaySource for &S {
    fn fetch_range(&self, start: NaiveDate, end: NaiveDate) -> Result<DayRecordSet> {
        (**self).fetch_range(start, end)
    }

    fn fetch_days(&self, days: &[NaiveDate]) -> Result<DayRecordSet> {
        (**self).fetch_days(days)
    }
}

/// A source backed by records already in memory
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    records: DayRecordSet,
}

impl InMemorySource {
    pub fn new(records: DayRecordSet) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &DayRecordSet {
        &self.records
    }

    pub fn day_count(&self) -> usize {
        self.records.len()
    }
}

impl DaySource for InMemorySource {
    fn fetch_range(&self, start: NaiveDate, end: NaiveDate) -> Result<DayRecordSet> {
        Ok(self.records.subset_range(start, end))
    }

    fn fetch_days(&self, days: &[NaiveDate]) -> Result<DayRecordSet> {
        Ok(self.records.subset_days(days))
    }
}

/// A source that loads a JSON array of flat hourly rows
///
/// ```json
/// [{"DATE": "2024-07-01", "HOURENDING": 1, "CAISO_RTLOAD_MW": 25100.0}, ...]
/// ```
///
/// The file is parsed once on open and served from memory afterwards.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
    inner: InMemorySource,
}

impl JsonFileSource {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let contents = std::fs::read_to_string(&path)?;
        let records = parse_rows(&contents)?;
        tracing::debug!(
            path = %path.display(),
            days = records.len(),
            "loaded hourly rows"
        );
        Ok(Self {
            path,
            inner: InMemorySource::new(records),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn records(&self) -> &DayRecordSet {
        self.inner.records()
    }
}

impl DaySource for JsonFileSource {
    fn fetch_range(&self, start: NaiveDate, end: NaiveDate) -> Result<DayRecordSet> {
        self.inner.fetch_range(start, end)
    }

    fn fetch_days(&self, days: &[NaiveDate]) -> Result<DayRecordSet> {
        self.inner.fetch_days(days)
    }
}

/// Parse a JSON array of flat rows into per-day records
pub fn parse_rows(json: &str) -> Result<DayRecordSet> {
    let value: Value = serde_json::from_str(json)?;
    let rows = value
        .as_array()
        .ok_or_else(|| Error::Serialization("expected a JSON array of hourly rows".to_string()))?;

    let mut set = DayRecordSet::new();
    for (idx, row) in rows.iter().enumerate() {
        let row = row
            .as_object()
            .ok_or_else(|| Error::Serialization(format!("row {idx} is not an object")))?;
        let day = row_date(row)
            .ok_or_else(|| Error::Serialization(format!("row {idx} has no parseable date")))?;
        let record = HourlyRecord::from_row(row)
            .ok_or_else(|| Error::Serialization(format!("row {idx} has no hour-ending")))?;
        set.push(day, record);
    }
    Ok(set)
}

fn row_date(row: &Map<String, Value>) -> Option<NaiveDate> {
    row.iter()
        .find(|(k, _)| DATE_KEYS.iter().any(|key| k.eq_ignore_ascii_case(key)))
        .and_then(|(_, v)| v.as_str())
        .and_then(parse_date)
}

/// Accepts `YYYY-MM-DD`, optionally followed by a time component
fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    let date_part = s.get(..10).unwrap_or(s);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, d).unwrap()
    }

    #[test]
    fn test_parse_rows_groups_by_day() {
        let json = r#"[
            {"DATE": "2024-07-01", "HOURENDING": 1, "CAISO_RTLOAD": 100.0},
            {"DATE": "2024-07-01", "HOURENDING": 2, "CAISO_RTLOAD": 110.0},
            {"opr_dt": "2024-07-02T00:00:00", "HOURENDING": 1, "CAISO_RTLOAD": 90.0}
        ]"#;
        let set = parse_rows(json).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.get(&day(1)).unwrap().len(), 2);
        assert_eq!(set.get(&day(2)).unwrap().hour(1).unwrap().get("CAISO_RTLOAD"), Some(90.0));
    }

    #[test]
    fn test_parse_rows_rejects_missing_date() {
        let json = r#"[{"HOURENDING": 1, "CAISO_RTLOAD": 100.0}]"#;
        let err = parse_rows(json).unwrap_err();
        assert!(err.to_string().contains("row 0"));
    }

    #[test]
    fn test_parse_rows_rejects_non_array() {
        assert!(matches!(parse_rows("{}"), Err(Error::Serialization(_))));
    }

    #[test]
    fn test_in_memory_fetch() {
        let mut set = DayRecordSet::new();
        for d in 1..=10 {
            set.push(day(d), HourlyRecord::new(1).with_field("X", f64::from(d)));
        }
        let source = InMemorySource::new(set);

        assert_eq!(source.fetch_range(day(3), day(5)).unwrap().len(), 3);
        assert_eq!(source.fetch_days(&[day(1), day(10), day(20)]).unwrap().len(), 2);
    }

    #[test]
    fn test_json_file_source() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"DATE": "2024-07-03", "HOURENDING": 4, "SP15_RTLMP": 41.5}}]"#
        )
        .unwrap();

        let source = JsonFileSource::open(file.path()).unwrap();
        let set = source.fetch_days(&[day(3)]).unwrap();
        assert_eq!(set.get(&day(3)).unwrap().hour(4).unwrap().get("SP15_RTLMP"), Some(41.5));
    }

    #[test]
    fn test_json_file_source_missing_file() {
        let err = JsonFileSource::open("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
