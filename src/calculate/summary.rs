//! Scalar aggregates for summary display.

use crate::models::{Counter, Field, Kpis, Mode, PlayerRecord, RankedView, Schema, Summary};

/// Count, sum and mean of `field` over `records`, skipping untracked values.
pub fn summarize<'a, I>(records: I, field: Field) -> Summary
where
    I: IntoIterator<Item = &'a PlayerRecord>,
{
    let (count, sum) = records
        .into_iter()
        .filter_map(|r| r.get(field))
        .fold((0usize, 0.0f64), |(n, s), v| (n + 1, s + v));

    let mean = if count > 0 {
        Some(sum / count as f64)
    } else {
        None
    };

    Summary {
        field,
        count,
        sum,
        mean,
    }
}

/// Headline figures for a ranked view: mean minutes played, total wins
/// and total kills in `mode`. Figures whose column is absent are skipped.
pub fn kpis(view: &RankedView<'_>, mode: Mode, schema: &Schema) -> Kpis {
    let mut skipped = Vec::new();
    let mut figure = |counter: Counter| {
        let field = Field::new(mode, counter);
        if schema.contains(field) {
            Some(summarize(view.records(), field))
        } else {
            skipped.push(field);
            None
        }
    };

    let average_minutes = figure(Counter::MinutesPlayed).and_then(|s| s.mean);
    let total_wins = figure(Counter::Top1).map(|s| s.sum);
    let total_kills = figure(Counter::Kills).map(|s| s.sum);

    Kpis {
        mode,
        players: view.len(),
        average_minutes,
        total_wins,
        total_kills,
        skipped,
    }
}
