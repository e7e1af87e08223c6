//! Statistics endpoint

use axum::{extract::State, Json};

use crate::services::stats::LibraryStats;

/// Library dashboard counters
#[utoipa::path(
    get,
    path = "/stats",
    tag = "stats",
    responses(
        (status = 200, description = "Current statistics", body = LibraryStats)
    )
)]
pub async fn get_stats(State(state): State<crate::AppState>) -> Json<LibraryStats> {
    Json(state.services.stats.get_stats())
}
