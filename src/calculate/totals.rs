//! Per-mode aggregate totals.

use std::collections::BTreeMap;

use tracing::debug;

use crate::models::{Counter, Field, Mode, ModeTotals, PlayerRecord, Schema};

/// Sum `counter` per mode over `records`.
///
/// Modes without a backing column in `schema` are left out of the totals
/// and reported in [`ModeTotals::omitted`]. Empty cells contribute
/// nothing. No reconciliation against any global total column is done.
pub fn aggregate_totals<'a, I>(
    records: I,
    counter: Counter,
    modes: &[Mode],
    schema: &Schema,
) -> ModeTotals
where
    I: IntoIterator<Item = &'a PlayerRecord>,
{
    let mut included: Vec<Mode> = Vec::new();
    let mut omitted: Vec<Mode> = Vec::new();
    for &mode in modes {
        if included.contains(&mode) || omitted.contains(&mode) {
            continue;
        }
        if schema.contains(Field::new(mode, counter)) {
            included.push(mode);
        } else {
            debug!("Omitting {} from {} totals: column absent", mode, counter);
            omitted.push(mode);
        }
    }

    let mut totals: BTreeMap<Mode, f64> = included.iter().map(|m| (*m, 0.0)).collect();
    for record in records {
        for &mode in &included {
            if let Some(value) = record.get(Field::new(mode, counter)) {
                *totals.entry(mode).or_insert(0.0) += value;
            }
        }
    }

    let grand_total = totals.values().sum();

    ModeTotals {
        counter,
        totals,
        grand_total,
        omitted,
    }
}
