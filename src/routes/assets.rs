//! Asset routes: registry CRUD and manual recompute of cached means.

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::errors::{ApiResponse, AppError};
use crate::models::asset::{Asset, CreateAsset, RenameAsset};
use crate::services::aggregation::{self, RecomputeOutcome};
use crate::services::asset as asset_service;
use crate::AppState;

/// GET /api/v1/assets
pub async fn list(State(state): State<AppState>) -> Result<Json<ApiResponse<Vec<Asset>>>, AppError> {
    let assets = asset_service::list(&state.db).await?;
    Ok(ApiResponse::success(assets))
}

/// POST /api/v1/assets -- register an asset with unset means.
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateAsset>,
) -> Result<Json<ApiResponse<Asset>>, AppError> {
    let asset = asset_service::create(&state.db, &body).await?;
    Ok(ApiResponse::success(asset))
}

/// GET /api/v1/assets/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Asset>>, AppError> {
    let asset = asset_service::find_by_id(&state.db, id).await?;
    Ok(ApiResponse::success(asset))
}

/// PUT /api/v1/assets/{id}
pub async fn rename(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<RenameAsset>,
) -> Result<Json<ApiResponse<Asset>>, AppError> {
    let asset = asset_service::rename(&state.db, id, &body).await?;
    Ok(ApiResponse::success(asset))
}

/// DELETE /api/v1/assets/{id} -- refused while estimates or treatments exist.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    asset_service::delete(&state.db, id).await?;
    Ok(ApiResponse::success(()))
}

/// POST /api/v1/assets/{id}/recompute -- refresh both cached means.
pub async fn recompute(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<RecomputeOutcome>>, AppError> {
    let outcome = aggregation::recompute_all(&state.db, id).await?;
    Ok(ApiResponse::success(outcome))
}
