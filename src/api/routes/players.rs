use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::{ApiError, Pagination, PaginationMeta};
use crate::models::{Field, PlayerRecord};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub players: usize,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        players: state.dataset.len(),
    })
}

#[derive(Debug, Serialize)]
pub struct ColumnsResponse {
    pub source: Option<String>,
    pub loaded_at: DateTime<Utc>,
    pub players: usize,
    pub columns: Vec<Field>,
}

pub async fn columns(State(state): State<AppState>) -> Json<ColumnsResponse> {
    let dataset = &state.dataset;
    Json(ColumnsResponse {
        source: dataset.source().map(|p| p.display().to_string()),
        loaded_at: dataset.loaded_at(),
        players: dataset.len(),
        columns: dataset.schema().fields().collect(),
    })
}

#[derive(Debug, Deserialize)]
pub struct ListPlayersParams {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct PlayerListResponse {
    pub players: Vec<PlayerRecord>,
    pub pagination: PaginationMeta,
}

/// The full dataset in source order, paginated.
pub async fn list_players(
    State(state): State<AppState>,
    Query(params): Query<ListPlayersParams>,
) -> Json<PlayerListResponse> {
    let pagination = Pagination::new(params.page, params.page_size);
    let records = state.dataset.records();
    let total_items = u32::try_from(records.len()).unwrap_or(u32::MAX);

    Json(PlayerListResponse {
        players: pagination.slice(records).to_vec(),
        pagination: PaginationMeta::new(&pagination, total_items),
    })
}

pub async fn get_player(
    State(state): State<AppState>,
    Path(player): Path<String>,
) -> Result<Json<PlayerRecord>, ApiError> {
    state
        .dataset
        .get_player(&player)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("player '{}'", player)))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{get_json, test_state};
    use crate::api::build_router;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_health() {
        let app = build_router(test_state());
        let (status, json) = get_json(app, "/api/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
        assert_eq!(json["players"], 4);
    }

    #[tokio::test]
    async fn test_columns() {
        let app = build_router(test_state());
        let (status, json) = get_json(app, "/api/columns").await;

        assert_eq!(status, StatusCode::OK);
        let columns = json["columns"].as_array().unwrap();
        assert_eq!(columns.len(), 5);
        assert!(columns.iter().any(|c| c == "Duo kills"));
        assert!(json["source"].is_null());
    }

    #[tokio::test]
    async fn test_list_players_paginated() {
        let app = build_router(test_state());
        let (status, json) = get_json(app, "/api/players?page=2&page_size=3").await;

        assert_eq!(status, StatusCode::OK);
        let players = json["players"].as_array().unwrap();
        assert_eq!(players.len(), 1);
        assert_eq!(players[0]["player"], "D");
        assert_eq!(json["pagination"]["total_items"], 4);
        assert_eq!(json["pagination"]["total_pages"], 2);
        assert_eq!(json["pagination"]["has_next"], false);
    }

    #[tokio::test]
    async fn test_list_players_page_beyond_range() {
        let app = build_router(test_state());
        let (status, json) = get_json(app, "/api/players?page=4294967295&page_size=100").await;

        assert_eq!(status, StatusCode::OK);
        assert!(json["players"].as_array().unwrap().is_empty());
        assert_eq!(json["pagination"]["total_items"], 4);
        assert_eq!(json["pagination"]["has_next"], false);
        assert_eq!(json["pagination"]["has_prev"], true);
    }

    #[tokio::test]
    async fn test_get_player() {
        let app = build_router(test_state());
        let (status, json) = get_json(app.clone(), "/api/players/B").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["values"]["Solo minutesPlayed"], 300.0);
        assert!(json["values"].get("Squad kills").is_none());

        let (status, json) = get_json(app, "/api/players/Nobody").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["code"], "NOT_FOUND");
    }
}
