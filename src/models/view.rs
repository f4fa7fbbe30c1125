//! Derived views computed fresh from a dataset on every request.

use std::collections::BTreeMap;

use serde::Serialize;

use super::{Counter, Field, Mode, PlayerRecord};

/// One row of a ranked view.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RankedEntry<'a> {
    /// 1-based position in the view
    pub rank: usize,
    pub record: &'a PlayerRecord,
}

/// Top-N records sorted descending by a single field.
#[derive(Debug, Clone, Serialize)]
pub struct RankedView<'a> {
    pub sort_key: Field,
    pub top_n: usize,
    pub entries: Vec<RankedEntry<'a>>,
}

impl<'a> RankedView<'a> {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Records in rank order.
    pub fn records(&self) -> impl Iterator<Item = &'a PlayerRecord> + '_ {
        self.entries.iter().map(|e| e.record)
    }

    pub fn players(&self) -> Vec<&'a str> {
        self.entries.iter().map(|e| e.record.player.as_str()).collect()
    }
}

/// Per-mode sums of one counter.
///
/// Modes whose column is missing from the source are listed in `omitted`
/// and never appear in `totals`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModeTotals {
    pub counter: Counter,
    pub totals: BTreeMap<Mode, f64>,
    /// Sum of the included mode totals
    pub grand_total: f64,
    pub omitted: Vec<Mode>,
}

impl ModeTotals {
    pub fn get(&self, mode: Mode) -> Option<f64> {
        self.totals.get(&mode).copied()
    }

    /// Share of the grand total for each included mode (0.0 to 1.0).
    pub fn shares(&self) -> BTreeMap<Mode, f64> {
        self.totals
            .iter()
            .map(|(mode, total)| {
                let share = if self.grand_total > 0.0 {
                    total / self.grand_total
                } else {
                    0.0
                };
                (*mode, share)
            })
            .collect()
    }
}

/// Scalar aggregates of one field over a record set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub field: Field,
    /// Records that carry a value for the field
    pub count: usize,
    pub sum: f64,
    pub mean: Option<f64>,
}

/// Headline figures for a ranked view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Kpis {
    pub mode: Mode,
    pub players: usize,
    pub average_minutes: Option<f64>,
    pub total_wins: Option<f64>,
    pub total_kills: Option<f64>,
    /// Figures that could not be computed because their column is absent
    pub skipped: Vec<Field>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_totals_shares() {
        let totals = ModeTotals {
            counter: Counter::Kills,
            totals: BTreeMap::from([(Mode::Solo, 30.0), (Mode::Duo, 10.0)]),
            grand_total: 40.0,
            omitted: vec![Mode::Trio],
        };

        let shares = totals.shares();
        assert_eq!(shares[&Mode::Solo], 0.75);
        assert_eq!(shares[&Mode::Duo], 0.25);
        assert!(!shares.contains_key(&Mode::Trio));
    }

    #[test]
    fn test_mode_totals_shares_empty_total() {
        let totals = ModeTotals {
            counter: Counter::Kills,
            totals: BTreeMap::from([(Mode::Solo, 0.0)]),
            grand_total: 0.0,
            omitted: vec![],
        };
        assert_eq!(totals.shares()[&Mode::Solo], 0.0);
    }

    #[test]
    fn test_mode_totals_serialization() {
        let totals = ModeTotals {
            counter: Counter::Kills,
            totals: BTreeMap::from([(Mode::Solo, 10.0), (Mode::Duo, 5.0)]),
            grand_total: 15.0,
            omitted: vec![Mode::Trio, Mode::Squad],
        };
        let json = serde_json::to_value(&totals).unwrap();
        assert_eq!(json["counter"], "kills");
        assert_eq!(json["totals"]["solo"], 10.0);
        assert_eq!(json["totals"]["duo"], 5.0);
        assert!(json["totals"].get("trio").is_none());
        assert_eq!(json["omitted"][0], "trio");
    }
}
