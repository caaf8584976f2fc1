//! Application startup and initialization logic
//!
//! Tracing, the Prometheus recorder, the storage backend and the bootstrap
//! admin account are set up here before the router is built.

use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::app_state::AppState;
use crate::auth::password::PasswordService;
use crate::auth::Role;
use crate::config::{Config, LogFormat};
use crate::database::{self, Store};
use crate::models::NewUser;

/// Install the global tracing subscriber. `RUST_LOG` overrides `LOG_LEVEL`.
pub fn init_tracing(config: &Config) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "health_records_api={level},tower_http={level}",
            level = config.log_level
        ))
    });

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let installed = match config.log_format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.try_init(),
    };
    installed.map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {}", e))
}

/// Initialize application services and create the AppState.
pub async fn initialize_app(config: &Config) -> Result<AppState> {
    info!(environment = %config.environment, "Starting health records API");

    let store = database::setup_store(config).await?;
    info!(backend = store.backend_name(), "Storage backend ready");

    bootstrap_admin(store.as_ref(), config).await?;

    let mut app_state = AppState::new(store, config.clone());

    if config.metrics_enabled {
        let handle = metrics_exporter_prometheus::PrometheusBuilder::new()
            .install_recorder()
            .map_err(|e| anyhow::anyhow!("Failed to install Prometheus recorder: {}", e))?;
        app_state = app_state.with_metrics(handle);
        info!("Prometheus metrics initialized");
    }

    Ok(app_state)
}

/// Create the configured admin account unless the username is already taken
pub async fn bootstrap_admin(store: &dyn Store, config: &Config) -> Result<()> {
    let Some(admin) = &config.bootstrap_admin else {
        return Ok(());
    };

    if let Some(existing) = store.find_credentials(&admin.username).await? {
        if existing.role != Role::Admin {
            warn!(
                username = %admin.username,
                "Bootstrap admin username belongs to a non-admin account"
            );
        }
        return Ok(());
    }

    let password_hash = PasswordService::hash_password(&admin.password, config.bcrypt_cost)?;
    let user = store
        .create_user(NewUser {
            username: admin.username.clone(),
            password_hash,
            role: Role::Admin,
        })
        .await?;
    info!(user_id = user.id, username = %user.username, "Bootstrap admin created");
    Ok(())
}

/// Wait for SIGTERM or SIGINT signal for graceful shutdown
pub async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal, shutting down gracefully");
        },
        _ = terminate => {
            info!("Received SIGTERM signal, shutting down gracefully");
        },
    }
}
