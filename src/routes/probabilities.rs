use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::errors::{ApiResponse, AppError};
use crate::models::estimate::{
    CreateThreatProbability, EstimateFilters, ThreatProbability, ThreatProbabilitySummary,
    UpdateThreatProbability,
};
use crate::services::estimate as estimate_service;
use crate::AppState;

/// GET /api/v1/threat-probabilities
pub async fn list(
    State(state): State<AppState>,
    Query(filters): Query<EstimateFilters>,
) -> Result<Json<ApiResponse<Vec<ThreatProbabilitySummary>>>, AppError> {
    let rows = estimate_service::list_probabilities(&state.db, &filters).await?;
    Ok(ApiResponse::success(rows))
}

/// GET /api/v1/threat-probabilities/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ThreatProbability>>, AppError> {
    let estimate = estimate_service::find_probability(&state.db, id).await?;
    Ok(ApiResponse::success(estimate))
}

/// POST /api/v1/threat-probabilities
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateThreatProbability>,
) -> Result<Json<ApiResponse<ThreatProbability>>, AppError> {
    let estimate = estimate_service::create_probability(&state.db, &body).await?;
    Ok(ApiResponse::success(estimate))
}

/// PUT /api/v1/threat-probabilities/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateThreatProbability>,
) -> Result<Json<ApiResponse<ThreatProbability>>, AppError> {
    let estimate = estimate_service::update_probability(&state.db, id, &body).await?;
    Ok(ApiResponse::success(estimate))
}

/// DELETE /api/v1/threat-probabilities/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    estimate_service::delete_probability(&state.db, id).await?;
    Ok(ApiResponse::success(()))
}
