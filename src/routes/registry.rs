//! Reference registry routes: asset owners, threats, control measures and
//! vulnerabilities.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::errors::{ApiResponse, AppError};
use crate::models::registry::{
    CreateRegistryEntry, CreateVulnerability, RegistryEntry, RegistryKind, Vulnerability,
};
use crate::services::registry as registry_service;
use crate::AppState;

/// GET /api/v1/registry/{kind} -- `asset-owners`, `threats` or `control-measures`.
pub async fn list(
    State(state): State<AppState>,
    Path(kind): Path<RegistryKind>,
) -> Result<Json<ApiResponse<Vec<RegistryEntry>>>, AppError> {
    let entries = registry_service::list(&state.db, kind).await?;
    Ok(ApiResponse::success(entries))
}

/// POST /api/v1/registry/{kind}
pub async fn create(
    State(state): State<AppState>,
    Path(kind): Path<RegistryKind>,
    Json(body): Json<CreateRegistryEntry>,
) -> Result<Json<ApiResponse<RegistryEntry>>, AppError> {
    let entry = registry_service::create(&state.db, kind, &body).await?;
    Ok(ApiResponse::success(entry))
}

/// GET /api/v1/vulnerabilities
pub async fn list_vulnerabilities(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Vulnerability>>>, AppError> {
    let rows = registry_service::list_vulnerabilities(&state.db).await?;
    Ok(ApiResponse::success(rows))
}

/// POST /api/v1/vulnerabilities
pub async fn create_vulnerability(
    State(state): State<AppState>,
    Json(body): Json<CreateVulnerability>,
) -> Result<Json<ApiResponse<Vulnerability>>, AppError> {
    let row = registry_service::create_vulnerability(&state.db, &body).await?;
    Ok(ApiResponse::success(row))
}
