//! Canonical market variables
//!
//! The eight variables the dashboard knows how to match on, plus an open
//! `Custom` variant for any other column family. Serializes as the
//! canonical display name (e.g. `"RT Net Load"`).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A canonical variable name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum MatchVariable {
    RtLoad,
    RtNetLoad,
    RtLmp,
    RtEnergy,
    RtCongestion,
    DaLmp,
    DaLoad,
    DaNetLoad,
    /// Any other variable; resolved by the generic substring fallback only
    Custom(String),
}

impl MatchVariable {
    /// All variables with a dedicated resolver rule, in rule order
    pub const CANONICAL: [MatchVariable; 8] = [
        MatchVariable::RtLoad,
        MatchVariable::RtNetLoad,
        MatchVariable::RtLmp,
        MatchVariable::RtEnergy,
        MatchVariable::RtCongestion,
        MatchVariable::DaLmp,
        MatchVariable::DaLoad,
        MatchVariable::DaNetLoad,
    ];

    /// Display name as used by the request/response boundary
    pub fn name(&self) -> &str {
        match self {
            MatchVariable::RtLoad => "RT Load",
            MatchVariable::RtNetLoad => "RT Net Load",
            MatchVariable::RtLmp => "RT LMP",
            MatchVariable::RtEnergy => "RT Energy",
            MatchVariable::RtCongestion => "RT Congestion",
            MatchVariable::DaLmp => "DA LMP",
            MatchVariable::DaLoad => "DA Load",
            MatchVariable::DaNetLoad => "DA Net Load",
            MatchVariable::Custom(name) => name,
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, MatchVariable::Custom(_))
    }

    /// Day-ahead counterpart used to describe a forecast reference day.
    ///
    /// Real-time load, net load and LMP map onto their DA forecasts; every
    /// other variable is its own counterpart.
    pub fn forecast_counterpart(&self) -> MatchVariable {
        match self {
            MatchVariable::RtLoad => MatchVariable::DaLoad,
            MatchVariable::RtNetLoad => MatchVariable::DaNetLoad,
            MatchVariable::RtLmp => MatchVariable::DaLmp,
            other => other.clone(),
        }
    }
}

impl fmt::Display for MatchVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Collapse runs of whitespace and upper-case, so "rt  net load" parses
fn normalize_name(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

impl FromStr for MatchVariable {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize_name(s);
        if normalized.is_empty() {
            return Err("variable name cannot be empty".to_string());
        }

        let canonical = MatchVariable::CANONICAL
            .iter()
            .find(|v| v.name().to_uppercase() == normalized)
            .cloned();

        Ok(canonical.unwrap_or_else(|| MatchVariable::Custom(s.trim().to_string())))
    }
}

impl TryFrom<String> for MatchVariable {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MatchVariable> for String {
    fn from(v: MatchVariable) -> Self {
        v.name().to_string()
    }
}
