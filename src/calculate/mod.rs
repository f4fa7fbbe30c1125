//! Ranking and aggregation engine.
//!
//! Pure functions over an immutable record set:
//! - Top-N ranking by any counter column
//! - Derived per-player ratios (wins per hour, kills per match, ...)
//! - Per-mode totals of a counter
//! - Scalar summaries (count, sum, mean) and headline KPIs
//!
//! Nothing here mutates its input, so every function can be called
//! repeatedly and concurrently against the same loaded dataset.

mod metrics;
mod ranking;
mod summary;
mod totals;

pub use metrics::{derive_for_view, derive_metric};
pub use ranking::{rank, top_n_from_i64};
pub use summary::{kpis, summarize};
pub use totals::aggregate_totals;
