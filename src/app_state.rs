//! Application state shared across all handlers.

use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;

use crate::auth::jwt::JwtService;
use crate::config::Config;
use crate::database::Store;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Storage backend (Postgres or in-memory)
    pub store: Arc<dyn Store>,
    /// Application configuration
    pub config: Config,
    /// JWT authentication service
    pub jwt_service: JwtService,
    /// Prometheus render handle, absent when metrics are disabled
    pub metrics_handle: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: Config) -> Self {
        let jwt_service = JwtService::new(&config.jwt_secret, config.jwt_expiration);
        Self {
            store,
            config,
            jwt_service,
            metrics_handle: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics_handle = Some(handle);
        self
    }
}
