use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::comparisons::store::{ComparisonFilter, ComparisonPatch, ComparisonStats, NewComparison};
use crate::errors::AppError;
use crate::models::comparison::Comparison;
use crate::state::AppState;

#[derive(Serialize)]
pub struct SaveComparisonResponse {
    pub id: Uuid,
}

/// POST /api/comparisons
pub async fn handle_save_comparison(
    State(state): State<AppState>,
    payload: Result<Json<NewComparison>, JsonRejection>,
) -> Result<(StatusCode, Json<SaveComparisonResponse>), AppError> {
    let Json(request) = payload?;
    if request.prompt_text.trim().is_empty() {
        return Err(AppError::Validation("promptText cannot be empty".to_string()));
    }
    let saved = state.comparisons.save(request).await;
    Ok((StatusCode::CREATED, Json(SaveComparisonResponse { id: saved.id })))
}

/// GET /api/comparisons?studio=&search=
pub async fn handle_list_comparisons(
    State(state): State<AppState>,
    Query(filter): Query<ComparisonFilter>,
) -> Json<Vec<Comparison>> {
    Json(state.comparisons.list(&filter).await)
}

/// GET /api/comparisons/stats
pub async fn handle_comparison_stats(State(state): State<AppState>) -> Json<ComparisonStats> {
    Json(state.comparisons.stats().await)
}

/// GET /api/comparisons/:id
pub async fn handle_get_comparison(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Comparison>, AppError> {
    state
        .comparisons
        .get(id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Comparison {id} not found")))
}

/// PATCH /api/comparisons/:id
pub async fn handle_update_comparison(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<ComparisonPatch>, JsonRejection>,
) -> Result<Json<Comparison>, AppError> {
    let Json(patch) = payload?;
    state
        .comparisons
        .update(id, patch)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Comparison {id} not found")))
}

/// DELETE /api/comparisons/:id
pub async fn handle_delete_comparison(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.comparisons.delete(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Comparison {id} not found")))
    }
}
