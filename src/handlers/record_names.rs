//! Record Name Handlers
//!
//! The lookup table of metric labels referenced by daily records.

use axum::{extract::State, response::Json};
use tracing::info;

use crate::auth::middleware::AuthenticatedUser;
use crate::error::{ApiError, Result};
use crate::handlers::authorization::require_admin;
use crate::handlers::extractors::ValidatedJson;
use crate::handlers::response::Created;
use crate::models::{CreateRecordNameRequest, DailyRecordName};
use crate::AppState;

/// List all record names
#[utoipa::path(
    get,
    path = "/recordnames/",
    tag = "record-names",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All record names", body = Vec<DailyRecordName>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_record_names(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<Json<Vec<DailyRecordName>>> {
    Ok(Json(state.store.list_record_names().await?))
}

/// Create a record name (admin only)
#[utoipa::path(
    post,
    path = "/recordnames/",
    tag = "record-names",
    request_body = CreateRecordNameRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Record name created", body = DailyRecordName),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin role required"),
        (status = 409, description = "Record name already exists")
    )
)]
pub async fn create_record_name(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ValidatedJson(request): ValidatedJson<CreateRecordNameRequest>,
) -> Result<Created<DailyRecordName>> {
    require_admin(&user.0)?;

    let recordname = request.recordname.trim();
    if recordname.is_empty() {
        return Err(ApiError::validation_field(
            "recordname",
            "recordname must not be blank",
        ));
    }

    let name = state.store.create_record_name(recordname).await?;
    info!(recordname_id = name.id, recordname = %name.recordname, "Record name created");
    Ok(Created(name))
}
