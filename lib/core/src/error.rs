use chrono::NaiveDate;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// A day lacks a full 24-hour vector for the requested variable.
    /// Recovered locally by dropping the day from the candidate pool.
    #[error("Incomplete day {day} for {variable}: hour ending {hour} {reason}")]
    IncompleteDay {
        day: NaiveDate,
        variable: String,
        hour: u8,
        reason: String,
    },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// True for errors that only exclude a single day from a pool
    pub fn is_incomplete_day(&self) -> bool {
        matches!(self, Error::IncompleteDay { .. })
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
