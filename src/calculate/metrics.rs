//! Derived per-record metrics.

use crate::error::{Result, StatsError};
use crate::models::{Formula, MetricValue, PlayerRecord, RankedView, Schema};

/// Compute `formula` for one record.
///
/// Fails with `MissingColumn` when either input is not tracked for the
/// record. A zero denominator is not an error: it yields
/// [`MetricValue::Undefined`].
pub fn derive_metric(record: &PlayerRecord, formula: Formula) -> Result<MetricValue> {
    let numerator = record
        .get(formula.numerator())
        .ok_or_else(|| StatsError::missing(formula.numerator()))?;
    let denominator = record
        .get(formula.denominator())
        .ok_or_else(|| StatsError::missing(formula.denominator()))?;
    Ok(formula.evaluate(numerator, denominator))
}

/// Compute `formula` for every entry of a view, in rank order.
///
/// The columns must exist in `schema`; individual records with an empty
/// cell get [`MetricValue::Undefined`].
pub fn derive_for_view(
    view: &RankedView<'_>,
    formula: Formula,
    schema: &Schema,
) -> Result<Vec<MetricValue>> {
    schema.require(formula.numerator())?;
    schema.require(formula.denominator())?;

    Ok(view
        .records()
        .map(|record| derive_metric(record, formula).unwrap_or(MetricValue::Undefined))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculate::rank;
    use crate::models::{Counter, Field, Mode};

    const MINUTES: Field = Field::new(Mode::Solo, Counter::MinutesPlayed);
    const TOP1: Field = Field::new(Mode::Solo, Counter::Top1);

    fn player(name: &str, minutes: f64, wins: f64) -> PlayerRecord {
        PlayerRecord::new(name).with(MINUTES, minutes).with(TOP1, wins)
    }

    #[test]
    fn test_wins_per_hour() {
        let a = player("A", 600.0, 3.0);
        let value = derive_metric(&a, Formula::WinsPerHour(Mode::Solo)).unwrap();
        assert_eq!(value, MetricValue::Value(0.3));
    }

    #[test]
    fn test_zero_minutes_is_undefined() {
        let c = player("C", 0.0, 0.0);
        let value = derive_metric(&c, Formula::WinsPerHour(Mode::Solo)).unwrap();
        assert_eq!(value, MetricValue::Undefined);

        let c = player("C", 0.0, 4.0);
        let value = derive_metric(&c, Formula::WinsPerHour(Mode::Solo)).unwrap();
        assert_eq!(value, MetricValue::Undefined);
    }

    #[test]
    fn test_missing_input_names_field() {
        let a = player("A", 600.0, 3.0);
        let err = derive_metric(&a, Formula::KillsPerMatch(Mode::Solo)).unwrap_err();
        match err {
            StatsError::MissingColumn { field } => {
                assert_eq!(field, Field::new(Mode::Solo, Counter::Kills))
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_derive_for_view_keeps_rank_order() {
        let records = vec![
            player("B", 300.0, 1.0),
            player("C", 0.0, 0.0),
            player("A", 600.0, 3.0),
            PlayerRecord::new("D").with(MINUTES, 120.0),
        ];
        let schema = Schema::new([MINUTES, TOP1]);
        let view = rank(&records, MINUTES, 4);

        let values = derive_for_view(&view, Formula::WinsPerHour(Mode::Solo), &schema).unwrap();
        assert_eq!(
            values,
            vec![
                MetricValue::Value(0.3),
                MetricValue::Value(0.2),
                MetricValue::Undefined,
                MetricValue::Undefined,
            ]
        );
    }

    #[test]
    fn test_derive_for_view_missing_column() {
        let records = vec![player("A", 600.0, 3.0)];
        let view = rank(&records, MINUTES, 1);
        let err = derive_for_view(&view, Formula::WinRate(Mode::Solo), &Schema::new([MINUTES, TOP1]))
            .unwrap_err();
        assert!(matches!(err, StatsError::MissingColumn { .. }));
    }
}
