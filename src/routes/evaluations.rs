//! Criterion evaluation routes. Every write refreshes the asset's means.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::errors::{ApiResponse, AppError};
use crate::models::estimate::{CreateEvaluation, EstimateFilters, Evaluation, EvaluationSummary, UpdateEvaluation};
use crate::services::estimate as estimate_service;
use crate::AppState;

/// GET /api/v1/evaluations -- optionally filtered by `asset_id` and `expert_id`.
pub async fn list(
    State(state): State<AppState>,
    Query(filters): Query<EstimateFilters>,
) -> Result<Json<ApiResponse<Vec<EvaluationSummary>>>, AppError> {
    let rows = estimate_service::list_evaluations(&state.db, &filters).await?;
    Ok(ApiResponse::success(rows))
}

/// GET /api/v1/evaluations/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Evaluation>>, AppError> {
    let evaluation = estimate_service::find_evaluation(&state.db, id).await?;
    Ok(ApiResponse::success(evaluation))
}

/// POST /api/v1/evaluations -- 409 if the expert already evaluated the asset.
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateEvaluation>,
) -> Result<Json<ApiResponse<Evaluation>>, AppError> {
    let evaluation = estimate_service::create_evaluation(&state.db, &body).await?;
    Ok(ApiResponse::success(evaluation))
}

/// PUT /api/v1/evaluations/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateEvaluation>,
) -> Result<Json<ApiResponse<Evaluation>>, AppError> {
    let evaluation = estimate_service::update_evaluation(&state.db, id, &body).await?;
    Ok(ApiResponse::success(evaluation))
}

/// DELETE /api/v1/evaluations/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    estimate_service::delete_evaluation(&state.db, id).await?;
    Ok(ApiResponse::success(()))
}
