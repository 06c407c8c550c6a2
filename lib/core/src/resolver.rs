//! Variable field resolution
//!
//! Raw hourly records are loosely structured: the same logical variable may
//! appear under different column names depending on the market and feed
//! (`CAISO_RTLOAD_MW`, `ERCOT_RTLOAD`, ...). The resolver maps a canonical
//! [`MatchVariable`] onto the raw field that carries it.
//!
//! Resolution is an ordered rule table. The first rule whose predicate
//! claims the variable decides the match; a claimed variable never reaches
//! the generic fallback, so `RT Load` cannot pick up an `RTLOAD_NET` column
//! through the `RTLOAD` substring.

use crate::record::HourlyRecord;
use crate::variable::MatchVariable;

/// One entry of the rule table
struct FieldRule {
    name: &'static str,
    applies: fn(&MatchVariable) -> bool,
    matches: fn(&str) -> bool,
}

/// Category rules, evaluated in order. Field names arrive upper-cased.
static RULES: [FieldRule; 8] = [
    FieldRule {
        name: "rt_load",
        applies: |v| *v == MatchVariable::RtLoad,
        matches: |f| f.contains("RTLOAD") && !f.contains("NET"),
    },
    FieldRule {
        name: "rt_net_load",
        applies: |v| *v == MatchVariable::RtNetLoad,
        matches: |f| f.contains("RTLOAD_NET") || f.contains("NET_OF_RENEWABLES"),
    },
    FieldRule {
        name: "rt_lmp",
        applies: |v| *v == MatchVariable::RtLmp,
        matches: |f| f.contains("RTLMP"),
    },
    FieldRule {
        name: "rt_energy",
        applies: |v| *v == MatchVariable::RtEnergy,
        matches: |f| f.contains("RTENERGY"),
    },
    FieldRule {
        name: "rt_congestion",
        applies: |v| *v == MatchVariable::RtCongestion,
        matches: |f| f.contains("RTCONG"),
    },
    FieldRule {
        name: "da_lmp",
        applies: |v| *v == MatchVariable::DaLmp,
        matches: |f| f.contains("DALMP"),
    },
    FieldRule {
        name: "da_load",
        applies: |v| *v == MatchVariable::DaLoad,
        matches: |f| f.contains("DA_DEMAND_FORECAST") || f.contains("DADEMANDFORECAST"),
    },
    FieldRule {
        name: "da_net_load",
        applies: |v| *v == MatchVariable::DaNetLoad,
        matches: |f| f.contains("DA NET DEMAND FC") || f.contains("DANETDEMANDFC"),
    },
];

/// Maps canonical variables onto raw record fields
#[derive(Debug, Clone, Copy, Default)]
pub struct VariableFieldResolver;

impl VariableFieldResolver {
    pub fn new() -> Self {
        Self
    }

    /// Return the raw field in `record` that carries `variable`, if any
    pub fn resolve<'a>(&self, variable: &MatchVariable, record: &'a HourlyRecord) -> Option<&'a str> {
        let fields = record.field_names();
        match RULES.iter().find(|rule| (rule.applies)(variable)) {
            Some(rule) => find_field(fields, rule.matches),
            None => resolve_fallback(variable.name(), fields),
        }
    }

    /// Resolve and read the value in one step
    pub fn value(&self, variable: &MatchVariable, record: &HourlyRecord) -> Option<f64> {
        self.resolve(variable, record)
            .and_then(|field| record.get(field))
    }

    /// Name of the rule that handles `variable`, or `"fallback"`
    pub fn rule_name(&self, variable: &MatchVariable) -> &'static str {
        RULES
            .iter()
            .find(|rule| (rule.applies)(variable))
            .map(|rule| rule.name)
            .unwrap_or("fallback")
    }
}

fn find_field<'a>(
    mut fields: impl Iterator<Item = &'a str>,
    matches: fn(&str) -> bool,
) -> Option<&'a str> {
    fields.find(|field| matches(&field.to_uppercase()))
}

/// Generic matcher: the canonical name with whitespace stripped, or with
/// whitespace replaced by underscores
fn resolve_fallback<'a>(name: &str, mut fields: impl Iterator<Item = &'a str>) -> Option<&'a str> {
    let words: Vec<String> = name.split_whitespace().map(str::to_uppercase).collect();
    if words.is_empty() {
        return None;
    }
    let compact = words.concat();
    let underscored = words.join("_");

    fields.find(|field| {
        let upper = field.to_uppercase();
        upper.contains(&compact) || upper.contains(&underscored)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(fields: &[(&str, f64)]) -> HourlyRecord {
        fields
            .iter()
            .fold(HourlyRecord::new(1), |r, (n, v)| r.with_field(*n, *v))
    }

    #[test]
    fn test_rt_load_excludes_net() {
        let resolver = VariableFieldResolver::new();
        let r = record(&[("CAISO_RTLOAD_MW", 5000.0)]);

        assert_eq!(resolver.resolve(&MatchVariable::RtLoad, &r), Some("CAISO_RTLOAD_MW"));
        assert_eq!(resolver.resolve(&MatchVariable::RtNetLoad, &r), None);
    }

    #[test]
    fn test_rt_load_skips_net_column() {
        let resolver = VariableFieldResolver::new();
        let r = record(&[("CAISO_RTLOAD_NET", 3000.0), ("CAISO_RTLOAD", 5000.0)]);

        assert_eq!(resolver.resolve(&MatchVariable::RtLoad, &r), Some("CAISO_RTLOAD"));
        assert_eq!(resolver.resolve(&MatchVariable::RtNetLoad, &r), Some("CAISO_RTLOAD_NET"));
    }

    #[test]
    fn test_rt_load_never_falls_back_to_net_column() {
        let resolver = VariableFieldResolver::new();
        let r = record(&[("CAISO_RTLOAD_NET", 3000.0)]);
        assert_eq!(resolver.resolve(&MatchVariable::RtLoad, &r), None);
    }

    #[test]
    fn test_net_of_renewables() {
        let resolver = VariableFieldResolver::new();
        let r = record(&[("LOAD_NET_OF_RENEWABLES", 1200.0)]);
        assert_eq!(resolver.value(&MatchVariable::RtNetLoad, &r), Some(1200.0));
    }

    #[test]
    fn test_case_insensitive() {
        let resolver = VariableFieldResolver::new();
        let r = record(&[("sp15_rtlmp", 42.0), ("np15_dalmp", 40.0)]);
        assert_eq!(resolver.resolve(&MatchVariable::RtLmp, &r), Some("sp15_rtlmp"));
        assert_eq!(resolver.resolve(&MatchVariable::DaLmp, &r), Some("np15_dalmp"));
    }

    #[test]
    fn test_price_components() {
        let resolver = VariableFieldResolver::new();
        let r = record(&[("HUB_RTENERGY", 38.0), ("HUB_RTCONG", 4.0)]);
        assert_eq!(resolver.value(&MatchVariable::RtEnergy, &r), Some(38.0));
        assert_eq!(resolver.value(&MatchVariable::RtCongestion, &r), Some(4.0));
    }

    #[test]
    fn test_da_load_variants() {
        let resolver = VariableFieldResolver::new();
        let a = record(&[("CAISO_DA_DEMAND_FORECAST", 1.0)]);
        let b = record(&[("caiso_dademandforecast", 2.0)]);
        assert_eq!(resolver.value(&MatchVariable::DaLoad, &a), Some(1.0));
        assert_eq!(resolver.value(&MatchVariable::DaLoad, &b), Some(2.0));
    }

    #[test]
    fn test_da_net_load_variants() {
        let resolver = VariableFieldResolver::new();
        let a = record(&[("CAISO DA Net Demand FC", 1.0)]);
        let b = record(&[("CAISO_DANETDEMANDFC", 2.0)]);
        assert_eq!(resolver.value(&MatchVariable::DaNetLoad, &a), Some(1.0));
        assert_eq!(resolver.value(&MatchVariable::DaNetLoad, &b), Some(2.0));
        assert_eq!(resolver.value(&MatchVariable::DaLoad, &a), None);
    }

    #[test]
    fn test_first_matching_field_wins() {
        let resolver = VariableFieldResolver::new();
        let r = record(&[("NP15_RTLMP", 30.0), ("SP15_RTLMP", 35.0)]);
        assert_eq!(resolver.value(&MatchVariable::RtLmp, &r), Some(30.0));
    }

    #[test]
    fn test_custom_fallback_compact_and_underscored() {
        let resolver = VariableFieldResolver::new();
        let custom = MatchVariable::Custom("Hydro Gen".to_string());

        let a = record(&[("CAISO_HYDROGEN_MW", 900.0)]);
        let b = record(&[("caiso_hydro_gen", 800.0)]);
        let c = record(&[("CAISO_SOLAR", 700.0)]);

        assert_eq!(resolver.value(&custom, &a), Some(900.0));
        assert_eq!(resolver.value(&custom, &b), Some(800.0));
        assert_eq!(resolver.value(&custom, &c), None);
        assert_eq!(resolver.rule_name(&custom), "fallback");
    }

    #[test]
    fn test_every_canonical_variable_has_a_rule() {
        let resolver = VariableFieldResolver::new();
        for v in MatchVariable::CANONICAL.iter() {
            assert_ne!(resolver.rule_name(v), "fallback", "{} has no rule", v);
        }
    }
}
