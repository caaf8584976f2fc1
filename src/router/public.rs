//! Public routes that don't require authentication.
//!
//! Includes: health check, metrics, account endpoints, Swagger UI.

use axum::{
    routing::{get, post},
    Router,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::app_state::AppState;
use crate::handlers::{auth as auth_handlers, health, metrics};
use crate::openapi::ApiDoc;

/// Build public routes that don't require authentication.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/metrics", get(metrics::get_prometheus_metrics))
        .route("/auth/register/", post(auth_handlers::register))
        .route("/auth/token/", post(auth_handlers::login))
        .merge(SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", ApiDoc::openapi()))
}
