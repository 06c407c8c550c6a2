use chrono::NaiveDate;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Key under which the hour-ending index is emitted in chart rows
pub const HOUR_ENDING_KEY: &str = "HOURENDING";

/// Accepted spellings of the hour-ending column in raw rows
const HOUR_ENDING_ALIASES: [&str; 3] = [HOUR_ENDING_KEY, "HOUR_ENDING", "HE"];

/// One hour of raw market data
///
/// Fields keep the order the source supplied them in; the resolver picks
/// the first matching field.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyRecord {
    /// Hour-ending index, 1..=24 (24 = interval ending at midnight)
    pub hour_ending: u8,
    fields: Vec<(String, f64)>,
}

impl HourlyRecord {
    #[inline]
    #[must_use]
    pub fn new(hour_ending: u8) -> Self {
        Self {
            hour_ending,
            fields: Vec::new(),
        }
    }

    /// Add a raw field, replacing an existing value of the same name
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: f64) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        let name = name.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
    }

    /// Raw field names in source order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    pub fn fields(&self) -> &[(String, f64)] {
        &self.fields
    }

    pub fn is_valid_hour(&self) -> bool {
        (1..=24).contains(&self.hour_ending)
    }

    /// Build a record from a flat JSON row.
    ///
    /// The hour-ending column may be a number or a numeric string. Every
    /// other numeric column becomes a raw field; strings, booleans and
    /// nulls are skipped. Returns `None` when no hour-ending is present.
    pub fn from_row(row: &Map<String, Value>) -> Option<Self> {
        let hour_ending = row
            .iter()
            .find(|(k, _)| is_hour_key(k))
            .and_then(|(_, v)| value_as_hour(v))?;

        let mut record = HourlyRecord::new(hour_ending);
        for (name, value) in row {
            if is_hour_key(name) {
                continue;
            }
            if let Some(v) = value.as_f64() {
                record.insert(name.clone(), v);
            }
        }
        Some(record)
    }
}

fn is_hour_key(key: &str) -> bool {
    HOUR_ENDING_ALIASES
        .iter()
        .any(|alias| key.eq_ignore_ascii_case(alias))
}

fn value_as_hour(value: &Value) -> Option<u8> {
    let hour = match value {
        Value::Number(n) => n.as_u64()?,
        Value::String(s) => s.trim().parse::<u64>().ok()?,
        _ => return None,
    };
    u8::try_from(hour).ok()
}

/// Serializes as a flat chart row: `{"HOURENDING": h, "<field>": value, ...}`
impl Serialize for HourlyRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 1))?;
        map.serialize_entry(HOUR_ENDING_KEY, &self.hour_ending)?;
        for (name, value) in &self.fields {
            if name.eq_ignore_ascii_case(HOUR_ENDING_KEY) {
                continue;
            }
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for HourlyRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let row = Map::<String, Value>::deserialize(deserializer)?;
        HourlyRecord::from_row(&row)
            .ok_or_else(|| serde::de::Error::custom("row is missing an hour-ending column"))
    }
}

/// All hourly records fetched for a single day
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DayRecords {
    records: Vec<HourlyRecord>,
}

impl DayRecords {
    pub fn new(records: Vec<HourlyRecord>) -> Self {
        Self { records }
    }

    pub fn push(&mut self, record: HourlyRecord) {
        self.records.push(record);
    }

    /// First record for the given hour-ending
    pub fn hour(&self, hour_ending: u8) -> Option<&HourlyRecord> {
        self.records.iter().find(|r| r.hour_ending == hour_ending)
    }

    pub fn records(&self) -> &[HourlyRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<HourlyRecord> for DayRecords {
    fn from_iter<I: IntoIterator<Item = HourlyRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Chronologically ordered records for a span of days
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DayRecordSet {
    days: BTreeMap<NaiveDate, DayRecords>,
}

impl DayRecordSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_day(&mut self, day: NaiveDate, records: DayRecords) {
        self.days.insert(day, records);
    }

    /// Append a single record to a day, creating the day if needed
    pub fn push(&mut self, day: NaiveDate, record: HourlyRecord) {
        self.days.entry(day).or_default().push(record);
    }

    pub fn get(&self, day: &NaiveDate) -> Option<&DayRecords> {
        self.days.get(day)
    }

    pub fn contains_day(&self, day: &NaiveDate) -> bool {
        self.days.contains_key(day)
    }

    /// Days in chronological order
    pub fn iter(&self) -> impl Iterator<Item = (&NaiveDate, &DayRecords)> {
        self.days.iter()
    }

    /// Days within `[start, end]`, chronological. Empty when `start > end`.
    pub fn range(&self, start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = (&NaiveDate, &DayRecords)> {
        self.days
            .iter()
            .skip_while(move |(d, _)| **d < start)
            .take_while(move |(d, _)| **d <= end)
    }

    /// Copy of the subset of days in `[start, end]`
    pub fn subset_range(&self, start: NaiveDate, end: NaiveDate) -> DayRecordSet {
        Self {
            days: self
                .range(start, end)
                .map(|(d, r)| (*d, r.clone()))
                .collect(),
        }
    }

    /// Copy of the listed days that are present
    pub fn subset_days(&self, days: &[NaiveDate]) -> DayRecordSet {
        Self {
            days: days
                .iter()
                .filter_map(|d| self.days.get(d).map(|r| (*d, r.clone())))
                .collect(),
        }
    }

    /// Merge another set into this one; days already present are kept
    pub fn merge(&mut self, other: DayRecordSet) {
        for (day, records) in other.days {
            self.days.entry(day).or_insert(records);
        }
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}
