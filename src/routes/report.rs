//! Risk report routes: ranked table, chart data and CSV export.

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};

use crate::errors::{ApiResponse, AppError};
use crate::services::report::{self as report_service, ChartView, RiskReport};
use crate::AppState;

/// GET /api/v1/report -- ranked risks plus the joined treatment rows.
pub async fn get(State(state): State<AppState>) -> Result<Json<ApiResponse<RiskReport>>, AppError> {
    let report = report_service::build(&state.db).await?;
    Ok(ApiResponse::success(report))
}

/// GET /api/v1/report/chart -- points and band colours for the renderer.
pub async fn chart(State(state): State<AppState>) -> Result<Json<ApiResponse<ChartView>>, AppError> {
    let view = report_service::chart(&state.db, &state.config.palette).await?;
    Ok(ApiResponse::success(view))
}

/// GET /api/v1/report/export -- ranked risks as CSV.
pub async fn export(State(state): State<AppState>) -> Result<Response, AppError> {
    let report = report_service::build(&state.db).await?;
    let body = report_service::to_csv(&report.ranked)?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"risk_report.csv\""),
        ],
        body,
    )
        .into_response())
}
