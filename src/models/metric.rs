//! Derived per-player metrics.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{Counter, Field, Mode};
use crate::error::StatsError;

/// Result of a derived metric.
///
/// A zero denominator yields `Undefined` rather than infinity or NaN. The
/// record stays in every view and the value serializes as `null`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "Option<f64>", into = "Option<f64>")]
pub enum MetricValue {
    Value(f64),
    Undefined,
}

impl MetricValue {
    pub fn as_option(&self) -> Option<f64> {
        match self {
            MetricValue::Value(v) => Some(*v),
            MetricValue::Undefined => None,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, MetricValue::Undefined)
    }
}

impl From<MetricValue> for Option<f64> {
    fn from(value: MetricValue) -> Self {
        value.as_option()
    }
}

impl From<Option<f64>> for MetricValue {
    fn from(value: Option<f64>) -> Self {
        value.map_or(MetricValue::Undefined, MetricValue::Value)
    }
}

/// A pure ratio over two fields of the same mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Formula {
    /// top1 / (minutes played / 60)
    WinsPerHour(Mode),
    /// kills / (minutes played / 60)
    KillsPerHour(Mode),
    /// kills / matches
    KillsPerMatch(Mode),
    /// top1 / matches
    WinRate(Mode),
}

impl Formula {
    pub fn mode(&self) -> Mode {
        match *self {
            Formula::WinsPerHour(m)
            | Formula::KillsPerHour(m)
            | Formula::KillsPerMatch(m)
            | Formula::WinRate(m) => m,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Formula::WinsPerHour(_) => "wins_per_hour",
            Formula::KillsPerHour(_) => "kills_per_hour",
            Formula::KillsPerMatch(_) => "kills_per_match",
            Formula::WinRate(_) => "win_rate",
        }
    }

    pub fn numerator(&self) -> Field {
        let counter = match self {
            Formula::WinsPerHour(_) | Formula::WinRate(_) => Counter::Top1,
            Formula::KillsPerHour(_) | Formula::KillsPerMatch(_) => Counter::Kills,
        };
        Field::new(self.mode(), counter)
    }

    pub fn denominator(&self) -> Field {
        let counter = match self {
            Formula::WinsPerHour(_) | Formula::KillsPerHour(_) => Counter::MinutesPlayed,
            Formula::KillsPerMatch(_) | Formula::WinRate(_) => Counter::Matches,
        };
        Field::new(self.mode(), counter)
    }

    /// Apply the formula to raw numerator and denominator values.
    pub fn evaluate(&self, numerator: f64, denominator: f64) -> MetricValue {
        let denominator = match self {
            Formula::WinsPerHour(_) | Formula::KillsPerHour(_) => denominator / 60.0,
            Formula::KillsPerMatch(_) | Formula::WinRate(_) => denominator,
        };
        if denominator == 0.0 {
            MetricValue::Undefined
        } else {
            MetricValue::Value(numerator / denominator)
        }
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name(), self.mode().as_str().to_lowercase())
    }
}

impl FromStr for Formula {
    type Err = StatsError;

    /// Accepts `name` (solo implied) or `name:mode`, e.g. `kills_per_match:squad`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, mode) = match s.split_once(':') {
            Some((name, mode)) => (name.trim(), mode.parse::<Mode>()?),
            None => (s.trim(), Mode::Solo),
        };
        match name.to_ascii_lowercase().as_str() {
            "wins_per_hour" => Ok(Formula::WinsPerHour(mode)),
            "kills_per_hour" => Ok(Formula::KillsPerHour(mode)),
            "kills_per_match" => Ok(Formula::KillsPerMatch(mode)),
            "win_rate" => Ok(Formula::WinRate(mode)),
            _ => Err(StatsError::invalid_parameter(
                "formula",
                format!("unknown metric '{}'", name),
            )),
        }
    }
}

impl From<Formula> for String {
    fn from(formula: Formula) -> Self {
        formula.to_string()
    }
}

impl TryFrom<String> for Formula {
    type Error = StatsError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wins_per_hour_inputs() {
        let formula = Formula::WinsPerHour(Mode::Solo);
        assert_eq!(formula.numerator(), Field::new(Mode::Solo, Counter::Top1));
        assert_eq!(
            formula.denominator(),
            Field::new(Mode::Solo, Counter::MinutesPlayed)
        );
    }

    #[test]
    fn test_evaluate_scales_minutes_to_hours() {
        let value = Formula::WinsPerHour(Mode::Solo).evaluate(3.0, 600.0);
        assert_eq!(value, MetricValue::Value(0.3));
    }

    #[test]
    fn test_evaluate_zero_denominator_is_undefined() {
        assert!(Formula::WinsPerHour(Mode::Solo)
            .evaluate(0.0, 0.0)
            .is_undefined());
        assert!(Formula::WinRate(Mode::Duo).evaluate(5.0, 0.0).is_undefined());
    }

    #[test]
    fn test_formula_parse() {
        assert_eq!(
            "wins_per_hour".parse::<Formula>().unwrap(),
            Formula::WinsPerHour(Mode::Solo)
        );
        assert_eq!(
            "kills_per_match:squads".parse::<Formula>().unwrap(),
            Formula::KillsPerMatch(Mode::Squad)
        );
        assert!("kd_ratio".parse::<Formula>().is_err());
        assert!("win_rate:pairs".parse::<Formula>().is_err());
    }

    #[test]
    fn test_formula_display() {
        assert_eq!(Formula::KillsPerHour(Mode::Trio).to_string(), "kills_per_hour:trio");
    }

    #[test]
    fn test_metric_value_serializes_undefined_as_null() {
        assert_eq!(serde_json::to_string(&MetricValue::Undefined).unwrap(), "null");
        assert_eq!(serde_json::to_string(&MetricValue::Value(1.5)).unwrap(), "1.5");
    }
}
