//! Risk treatment routes.

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::errors::{ApiResponse, AppError};
use crate::models::treatment::{CreateRiskTreatment, RiskTreatment, RiskTreatmentDetail, TreatmentPlan};
use crate::services::treatment as treatment_service;
use crate::AppState;

/// GET /api/v1/treatments -- joined with owner, threat, vulnerability and measure names.
pub async fn list(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<RiskTreatmentDetail>>>, AppError> {
    let rows = treatment_service::list_details(&state.db).await?;
    Ok(ApiResponse::success(rows))
}

/// GET /api/v1/treatments/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<RiskTreatment>>, AppError> {
    let treatment = treatment_service::find_by_id(&state.db, id).await?;
    Ok(ApiResponse::success(treatment))
}

/// POST /api/v1/treatments
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateRiskTreatment>,
) -> Result<Json<ApiResponse<RiskTreatment>>, AppError> {
    let treatment = treatment_service::create(&state.db, &body).await?;
    Ok(ApiResponse::success(treatment))
}

/// PUT /api/v1/treatments/{id} -- replace asset, owner, threat, vulnerability and plan.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<CreateRiskTreatment>,
) -> Result<Json<ApiResponse<RiskTreatment>>, AppError> {
    let treatment = treatment_service::update(&state.db, id, &body).await?;
    Ok(ApiResponse::success(treatment))
}

/// PATCH /api/v1/treatments/{id}/plan -- replace strategy, measure and effectiveness.
///
/// Non-Mitigate strategies clear the measure and the effectiveness.
pub async fn update_plan(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<TreatmentPlan>,
) -> Result<Json<ApiResponse<RiskTreatment>>, AppError> {
    let treatment = treatment_service::update_plan(&state.db, id, &body).await?;
    Ok(ApiResponse::success(treatment))
}

/// DELETE /api/v1/treatments/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    treatment_service::delete(&state.db, id).await?;
    Ok(ApiResponse::success(()))
}
