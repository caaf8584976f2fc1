use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers::health::{HealthStatus, ServiceHealth};
use crate::handlers::response::DeletedResponse;
use crate::models::{
    BasicDetails, CovidTestDone, CreateBasicDetailsRequest, CreateDailyRecordRequest,
    CreateRecordNameRequest, DailyRecordName, DailyRecordValue, LoginRequest, RegisterRequest,
    TokenResponse, UpdateBasicDetailsRequest, UpdateDailyRecordRequest, User,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Health Records API",
        version = "0.1.0",
        description = "Per-user basic details and timestamped daily health records"
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    paths(
        // Health
        crate::handlers::health::health_check,
        crate::handlers::metrics::get_prometheus_metrics,

        // Accounts
        crate::handlers::auth::register,
        crate::handlers::auth::login,

        // Basic details
        crate::handlers::basic_details::create_basic_details,
        crate::handlers::basic_details::get_basic_details,
        crate::handlers::basic_details::update_basic_details,
        crate::handlers::basic_details::delete_basic_details,

        // Daily records
        crate::handlers::daily_records::create_daily_record,
        crate::handlers::daily_records::list_daily_records,
        crate::handlers::daily_records::update_daily_record,
        crate::handlers::daily_records::delete_daily_records,
        crate::handlers::daily_records::get_daily_record,
        crate::handlers::daily_records::delete_daily_record,

        // Record names
        crate::handlers::record_names::list_record_names,
        crate::handlers::record_names::create_record_name,
    ),
    components(
        schemas(
            HealthStatus,
            ServiceHealth,
            DeletedResponse,
            User,
            RegisterRequest,
            LoginRequest,
            TokenResponse,
            BasicDetails,
            CovidTestDone,
            CreateBasicDetailsRequest,
            UpdateBasicDetailsRequest,
            DailyRecordName,
            CreateRecordNameRequest,
            DailyRecordValue,
            CreateDailyRecordRequest,
            UpdateDailyRecordRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "metrics", description = "Prometheus metrics"),
        (name = "auth", description = "Registration and token issuance"),
        (name = "basic-details", description = "Per-user diagnosis and test summary"),
        (name = "daily-records", description = "Timestamped metric values"),
        (name = "record-names", description = "Metric labels"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT from POST /auth/token/"))
                        .build(),
                ),
            )
        }
    }
}
