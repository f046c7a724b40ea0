use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::errors::{ApiResponse, AppError};
use crate::models::expert::{Expert, ExpertInput};
use crate::services::expert as expert_service;
use crate::AppState;

/// GET /api/v1/experts
pub async fn list(State(state): State<AppState>) -> Result<Json<ApiResponse<Vec<Expert>>>, AppError> {
    let experts = expert_service::list(&state.db).await?;
    Ok(ApiResponse::success(experts))
}

/// POST /api/v1/experts
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<ExpertInput>,
) -> Result<Json<ApiResponse<Expert>>, AppError> {
    let expert = expert_service::create(&state.db, &body).await?;
    Ok(ApiResponse::success(expert))
}

/// PUT /api/v1/experts/{id}
pub async fn rename(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<ExpertInput>,
) -> Result<Json<ApiResponse<Expert>>, AppError> {
    let expert = expert_service::rename(&state.db, id, &body).await?;
    Ok(ApiResponse::success(expert))
}

/// DELETE /api/v1/experts/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    expert_service::delete(&state.db, id).await?;
    Ok(ApiResponse::success(()))
}
