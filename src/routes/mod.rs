//! Route definitions for the risk matrix API.

pub mod assets;
pub mod evaluations;
pub mod experts;
pub mod health;
pub mod probabilities;
pub mod registry;
pub mod report;
pub mod treatments;

use axum::{
    http::{HeaderValue, Method},
    routing::{get, patch, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::AppState;

/// Largest accepted request body. Every payload is a small JSON object.
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Build the complete application router.
pub fn router(state: AppState) -> Router {
    let cors = match state.config.frontend_url.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new().allow_origin(origin),
        Err(_) => {
            tracing::warn!(
                frontend_url = %state.config.frontend_url,
                "FRONTEND_URL is not a valid origin; allowing any origin"
            );
            CorsLayer::new().allow_origin(Any)
        }
    }
    .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE])
    .allow_headers(Any);

    let asset_routes = Router::new()
        .route("/assets", get(assets::list).post(assets::create))
        .route(
            "/assets/{id}",
            get(assets::get_by_id).put(assets::rename).delete(assets::delete),
        )
        .route("/assets/{id}/recompute", post(assets::recompute));

    let expert_routes = Router::new()
        .route("/experts", get(experts::list).post(experts::create))
        .route(
            "/experts/{id}",
            axum::routing::put(experts::rename).delete(experts::delete),
        );

    let estimate_routes = Router::new()
        .route(
            "/evaluations",
            get(evaluations::list).post(evaluations::create),
        )
        .route(
            "/evaluations/{id}",
            get(evaluations::get_by_id)
                .put(evaluations::update)
                .delete(evaluations::delete),
        )
        .route(
            "/threat-probabilities",
            get(probabilities::list).post(probabilities::create),
        )
        .route(
            "/threat-probabilities/{id}",
            get(probabilities::get_by_id)
                .put(probabilities::update)
                .delete(probabilities::delete),
        );

    let registry_routes = Router::new()
        .route(
            "/vulnerabilities",
            get(registry::list_vulnerabilities).post(registry::create_vulnerability),
        )
        .route(
            "/registry/{kind}",
            get(registry::list).post(registry::create),
        );

    let treatment_routes = Router::new()
        .route("/treatments", get(treatments::list).post(treatments::create))
        .route(
            "/treatments/{id}",
            get(treatments::get_by_id)
                .put(treatments::update)
                .delete(treatments::delete),
        )
        .route("/treatments/{id}/plan", patch(treatments::update_plan));

    let report_routes = Router::new()
        .route("/report", get(report::get))
        .route("/report/chart", get(report::chart))
        .route("/report/export", get(report::export));

    Router::new()
        .route("/health/live", get(health::live))
        .route("/health/ready", get(health::ready))
        .nest("/api/v1", asset_routes)
        .nest("/api/v1", expert_routes)
        .nest("/api/v1", estimate_routes)
        .nest("/api/v1", registry_routes)
        .nest("/api/v1", treatment_routes)
        .nest("/api/v1", report_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(CompressionLayer::new())
                .map_response(|res: axum::response::Response<_>| res.map(axum::body::Body::new))
                .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES)),
        )
        .with_state(state)
}
