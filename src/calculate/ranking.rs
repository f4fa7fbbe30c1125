//! Top-N ranking.

use std::cmp::Ordering;

use crate::error::{Result, StatsError};
use crate::models::{Dataset, Field, PlayerRecord, RankedEntry, RankedView};

/// Descending order on an optional value; untracked values sort last.
///
/// Uses the IEEE total order so records built outside the loader with
/// non-finite values still sort without panicking.
fn compare_desc(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Sort `records` descending by `sort_key` and keep the first `top_n`.
///
/// The sort is stable, so records with equal keys keep their input order.
/// Ranks are contiguous and start at 1.
pub fn rank<'a, I>(records: I, sort_key: Field, top_n: usize) -> RankedView<'a>
where
    I: IntoIterator<Item = &'a PlayerRecord>,
{
    let mut sorted: Vec<&'a PlayerRecord> = records.into_iter().collect();
    sorted.sort_by(|a, b| compare_desc(a.get(sort_key), b.get(sort_key)));
    sorted.truncate(top_n);

    let entries = sorted
        .into_iter()
        .enumerate()
        .map(|(i, record)| RankedEntry { rank: i + 1, record })
        .collect();

    RankedView {
        sort_key,
        top_n,
        entries,
    }
}

/// Validate a caller-supplied Top-N bound.
pub fn top_n_from_i64(top_n: i64) -> Result<usize> {
    usize::try_from(top_n).map_err(|_| {
        StatsError::invalid_parameter("top_n", format!("must be non-negative, got {}", top_n))
    })
}

impl Dataset {
    /// Rank the whole dataset, failing if the sort key has no column.
    pub fn rank(&self, sort_key: Field, top_n: usize) -> Result<RankedView<'_>> {
        self.schema().require(sort_key)?;
        Ok(rank(self.records(), sort_key, top_n))
    }
}
