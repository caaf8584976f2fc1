//! Router configuration module

use axum::{middleware::from_fn, Router};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::app_state::AppState;
use crate::middleware::{metrics_middleware, request_logger_middleware};

pub mod protected;
pub mod public;

pub use protected::protected_routes;
pub use public::public_routes;

/// Build the application router: public and protected routes behind the
/// shared trace, timeout, CORS, metrics and logging layers.
pub fn build_router(app_state: AppState) -> Router {
    let timeout = std::time::Duration::from_secs(app_state.config.request_timeout);

    let mut router = public_routes().merge(protected_routes(app_state.clone()));

    if app_state.config.metrics_enabled {
        router = router.layer(from_fn(metrics_middleware));
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(from_fn(request_logger_middleware))
                .layer(TimeoutLayer::with_status_code(
                    axum::http::StatusCode::REQUEST_TIMEOUT,
                    timeout,
                ))
                .layer(CorsLayer::permissive()),
        )
        .with_state(app_state)
}
