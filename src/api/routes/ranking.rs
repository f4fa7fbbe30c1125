use std::collections::BTreeMap;

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate::{aggregate_totals, derive_for_view, kpis, summarize, top_n_from_i64};
use crate::error::StatsError;
use crate::models::{
    parse_modes, Counter, Field, Formula, Kpis, Mode, ModeTotals, RankedView, Schema, Summary,
};

/// Rank the dataset with request overrides falling back to configured defaults.
fn ranked_view<'a>(
    state: &'a AppState,
    top_n: Option<i64>,
    sort_key: Option<&str>,
) -> Result<RankedView<'a>, ApiError> {
    let sort_key: Field = match sort_key {
        Some(s) => s.parse()?,
        None => state.ranking.sort_key,
    };
    let top_n = match top_n {
        Some(n) => top_n_from_i64(n)?,
        None => state.ranking.default_top_n,
    };
    Ok(state.dataset.rank(sort_key, top_n)?)
}

#[derive(Debug, Deserialize)]
pub struct RankParams {
    pub top_n: Option<i64>,
    pub sort_key: Option<String>,
}

// ── Ranking Endpoint ────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RankingParams {
    pub top_n: Option<i64>,
    pub sort_key: Option<String>,
    pub metric: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RankedPlayer {
    pub rank: usize,
    pub player: String,
    pub values: BTreeMap<Field, f64>,
    pub metric: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct RankingResponse {
    pub sort_key: Field,
    pub top_n: usize,
    pub total_players: usize,
    pub metric: Formula,
    pub players: Vec<RankedPlayer>,
    /// Computations skipped because their column is absent
    pub skipped: Vec<Field>,
}

impl RankingResponse {
    /// Rows of `view` with `metric` derived per player. A metric whose
    /// column is absent is listed in `skipped` and left null.
    pub fn build(
        view: &RankedView<'_>,
        metric: Formula,
        schema: &Schema,
        total_players: usize,
    ) -> Result<Self, StatsError> {
        let mut skipped = Vec::new();
        let metrics: Vec<Option<f64>> = match derive_for_view(view, metric, schema) {
            Ok(values) => values.into_iter().map(|v| v.as_option()).collect(),
            Err(StatsError::MissingColumn { field }) => {
                debug!("Skipping {} for ranking: {} absent", metric, field);
                skipped.push(field);
                vec![None; view.len()]
            }
            Err(e) => return Err(e),
        };

        let players = view
            .entries
            .iter()
            .zip(metrics)
            .map(|(entry, metric)| RankedPlayer {
                rank: entry.rank,
                player: entry.record.player.clone(),
                values: entry.record.values.clone(),
                metric,
            })
            .collect();

        Ok(Self {
            sort_key: view.sort_key,
            top_n: view.top_n,
            total_players,
            metric,
            players,
            skipped,
        })
    }
}

pub async fn ranking(
    State(state): State<AppState>,
    Query(params): Query<RankingParams>,
) -> Result<Json<RankingResponse>, ApiError> {
    let metric = match params.metric.as_deref() {
        Some(s) => s.parse::<Formula>()?,
        None => state.ranking.metric,
    };
    let view = ranked_view(&state, params.top_n, params.sort_key.as_deref())?;

    Ok(Json(RankingResponse::build(
        &view,
        metric,
        state.dataset.schema(),
        state.dataset.len(),
    )?))
}

// ── Totals Endpoint ─────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct TotalsParams {
    pub top_n: Option<i64>,
    pub sort_key: Option<String>,
    pub counter: Option<String>,
    /// Comma-separated mode list
    pub modes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TotalsResponse {
    pub sort_key: Field,
    pub top_n: usize,
    pub players: usize,
    #[serde(flatten)]
    pub totals: ModeTotals,
    pub shares: BTreeMap<Mode, f64>,
}

pub async fn totals(
    State(state): State<AppState>,
    Query(params): Query<TotalsParams>,
) -> Result<Json<TotalsResponse>, ApiError> {
    let counter = match params.counter.as_deref() {
        Some(s) => s.parse::<Counter>()?,
        None => state.ranking.totals_counter,
    };
    let modes = match params.modes.as_deref() {
        Some(s) => parse_modes(s)?,
        None => state.ranking.modes.clone(),
    };
    let view = ranked_view(&state, params.top_n, params.sort_key.as_deref())?;

    let totals = aggregate_totals(view.records(), counter, &modes, state.dataset.schema());
    let shares = totals.shares();

    Ok(Json(TotalsResponse {
        sort_key: view.sort_key,
        top_n: view.top_n,
        players: view.len(),
        totals,
        shares,
    }))
}

// ── Summary Endpoint ────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub sort_key: Field,
    pub top_n: usize,
    pub kpis: Kpis,
    pub sort_key_summary: Summary,
}

impl SummaryResponse {
    pub fn build(view: &RankedView<'_>, kpi_mode: Mode, schema: &Schema) -> Self {
        Self {
            sort_key: view.sort_key,
            top_n: view.top_n,
            kpis: kpis(view, kpi_mode, schema),
            sort_key_summary: summarize(view.records(), view.sort_key),
        }
    }
}

pub async fn summary(
    State(state): State<AppState>,
    Query(params): Query<RankParams>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let view = ranked_view(&state, params.top_n, params.sort_key.as_deref())?;
    Ok(Json(SummaryResponse::build(
        &view,
        state.ranking.kpi_mode,
        state.dataset.schema(),
    )))
}
