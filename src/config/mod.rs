use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

/// Minimum JWT secret length enforced outside development
const MIN_JWT_SECRET_LEN: usize = 32;

/// Where records are persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(anyhow::anyhow!(
                "Invalid STORAGE_BACKEND '{}': expected 'postgres' or 'memory'",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub environment: String,
    pub port: u16,
    pub storage_backend: StorageBackend,
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub jwt_secret: String,
    /// Token lifetime in seconds
    pub jwt_expiration: i64,
    pub bcrypt_cost: u32,
    /// Request timeout in seconds
    pub request_timeout: u64,
    pub log_level: String,
    pub log_format: LogFormat,
    pub metrics_enabled: bool,
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

/// Credentials for the admin account created on first start
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootstrapAdmin {
    pub username: String,
    pub password: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let storage_backend: StorageBackend = env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "postgres".to_string())
            .parse()?;

        let bootstrap_admin = match (
            env::var("BOOTSTRAP_ADMIN_USERNAME").ok(),
            env::var("BOOTSTRAP_ADMIN_PASSWORD").ok(),
        ) {
            (Some(username), Some(password)) => Some(BootstrapAdmin { username, password }),
            _ => None,
        };

        let config = Config {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .map_err(|e| anyhow::anyhow!("PORT must be a valid port number: {}", e))?,
            storage_backend,
            database_url: env::var("DATABASE_URL").ok(),
            max_connections: env::var("MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap_or(10),
            jwt_secret: env::var("JWT_SECRET")
                .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable is required"))?,
            jwt_expiration: env::var("JWT_EXPIRATION")
                .unwrap_or_else(|_| "86400".to_string())
                .parse()
                .unwrap_or(86400),
            bcrypt_cost: env::var("BCRYPT_COST")
                .unwrap_or_else(|_| bcrypt::DEFAULT_COST.to_string())
                .parse()
                .unwrap_or(bcrypt::DEFAULT_COST),
            request_timeout: env::var("REQUEST_TIMEOUT")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap_or(30),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            log_format: match env::var("LOG_FORMAT").as_deref() {
                Ok("json") => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
            metrics_enabled: env::var("METRICS_ENABLED")
                .unwrap_or_else(|_| "true".to_string())
                .parse()
                .unwrap_or(true),
            bootstrap_admin,
            environment,
        };

        config.validate()?;
        Ok(config)
    }

    /// Settings suitable for tests and local experiments: in-memory storage,
    /// cheapest bcrypt cost, no metrics recorder.
    pub fn for_testing(jwt_secret: impl Into<String>) -> Self {
        Config {
            environment: "test".to_string(),
            port: 0,
            storage_backend: StorageBackend::Memory,
            database_url: None,
            max_connections: 1,
            jwt_secret: jwt_secret.into(),
            jwt_expiration: 3600,
            bcrypt_cost: 4,
            request_timeout: 30,
            log_level: "debug".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            bootstrap_admin: None,
        }
    }

    /// Cross-field checks that cannot be expressed while parsing
    pub fn validate(&self) -> Result<()> {
        if self.storage_backend == StorageBackend::Postgres
            && self.database_url.as_deref().map_or(true, str::is_empty)
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL environment variable is required when STORAGE_BACKEND=postgres"
            ));
        }

        if self.jwt_secret.is_empty() {
            return Err(anyhow::anyhow!("JWT_SECRET must not be empty"));
        }

        if self.environment != "development"
            && self.environment != "test"
            && self.jwt_secret.len() < MIN_JWT_SECRET_LEN
        {
            return Err(anyhow::anyhow!(
                "JWT_SECRET must be at least {} bytes in {}",
                MIN_JWT_SECRET_LEN,
                self.environment
            ));
        }

        if !(4..=31).contains(&self.bcrypt_cost) {
            return Err(anyhow::anyhow!(
                "BCRYPT_COST must be between 4 and 31, got {}",
                self.bcrypt_cost
            ));
        }

        if self.jwt_expiration <= 0 {
            return Err(anyhow::anyhow!("JWT_EXPIRATION must be positive"));
        }

        Ok(())
    }
}
