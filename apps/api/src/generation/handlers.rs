//! Axum route handlers for the Generation API.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::errors::AppError;
use crate::generation::generator::GenerateExamplesRequest;
use crate::models::generation::GenerationResult;
use crate::state::AppState;

/// POST /api/generate-examples
///
/// Returns 200 with a result on every generation outcome, including fallback.
/// Only a malformed request (unreadable body, missing fields, unknown studio,
/// blank prompt) is a 400.
pub async fn handle_generate_examples(
    State(state): State<AppState>,
    payload: Result<Json<GenerateExamplesRequest>, JsonRejection>,
) -> Result<Json<GenerationResult>, AppError> {
    let Json(request) = payload?;
    let outcome = state.orchestrator.handle(&request).await?;
    Ok(Json(outcome.result))
}
