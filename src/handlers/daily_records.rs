//! Daily Record Handlers
//!
//! Timestamped metric values. The collection path segment is a user id for
//! listing and bulk deletion, and a record id for updates.

use axum::{
    extract::{Path, State},
    response::Json,
};
use tracing::info;

use crate::auth::middleware::AuthenticatedUser;
use crate::error::{ApiError, Result};
use crate::handlers::authorization::require_admin_or_owner;
use crate::handlers::basic_details::ensure_user_exists;
use crate::handlers::extractors::{ValidatedId, ValidatedJson};
use crate::handlers::response::{Created, DeletedResponse};
use crate::models::{CreateDailyRecordRequest, DailyRecordValue, UpdateDailyRecordRequest};
use crate::AppState;

async fn ensure_record_name_exists(state: &AppState, recordname_id: i64) -> Result<()> {
    match state.store.find_record_name(recordname_id).await? {
        Some(_) => Ok(()),
        None => Err(ApiError::validation_field(
            "recordname",
            format!("Record name {} does not exist", recordname_id),
        )),
    }
}

async fn load_owned_record(
    state: &AppState,
    user: &AuthenticatedUser,
    record_id: i64,
) -> Result<DailyRecordValue> {
    let record = state
        .store
        .find_daily_record(record_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Daily record"))?;
    require_admin_or_owner(&user.0, record.user)?;
    Ok(record)
}

/// Record a metric value
#[utoipa::path(
    post,
    path = "/dailyrecords/",
    tag = "daily-records",
    request_body = CreateDailyRecordRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Daily record created", body = DailyRecordValue),
        (status = 400, description = "Invalid input, unknown user or record name"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the owner")
    )
)]
pub async fn create_daily_record(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ValidatedJson(request): ValidatedJson<CreateDailyRecordRequest>,
) -> Result<Created<DailyRecordValue>> {
    require_admin_or_owner(&user.0, request.user)?;
    ensure_user_exists(&state, request.user).await?;
    ensure_record_name_exists(&state, request.recordname).await?;

    let record = state.store.create_daily_record(request).await?;
    info!(
        record_id = record.id,
        user_id = record.user,
        recordname = record.recordname,
        "Daily record created"
    );
    Ok(Created(record))
}

/// List a user's records ordered by datetime
#[utoipa::path(
    get,
    path = "/dailyrecords/{id}/",
    tag = "daily-records",
    params(("id" = i64, Path, description = "Owning user id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "The user's records, possibly empty", body = Vec<DailyRecordValue>),
        (status = 400, description = "Malformed id"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Unknown user")
    )
)]
pub async fn list_daily_records(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<DailyRecordValue>>> {
    let user_id = ValidatedId::parse(&user_id, "user_id")?;
    require_admin_or_owner(&user.0, user_id)?;

    if state.store.find_user(user_id).await?.is_none() {
        return Err(ApiError::not_found("User"));
    }

    let records = state.store.list_daily_records(user_id).await?;
    Ok(Json(records))
}

/// Update a single record by its own id
#[utoipa::path(
    put,
    path = "/dailyrecords/{id}/",
    tag = "daily-records",
    params(("id" = i64, Path, description = "Daily record id")),
    request_body = UpdateDailyRecordRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Updated record", body = DailyRecordValue),
        (status = 400, description = "Invalid input or unknown record name"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Unknown record")
    )
)]
pub async fn update_daily_record(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(record_id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateDailyRecordRequest>,
) -> Result<Json<DailyRecordValue>> {
    let record_id = ValidatedId::parse(&record_id, "record_id")?;
    let existing = load_owned_record(&state, &user, record_id).await?;

    if let Some(body_user) = request.user {
        if body_user != existing.user {
            return Err(ApiError::validation_field(
                "user",
                "A record cannot be moved to another user",
            ));
        }
    }
    if let Some(recordname) = request.recordname {
        ensure_record_name_exists(&state, recordname).await?;
    }

    let record = state
        .store
        .update_daily_record(record_id, &request)
        .await?
        .ok_or_else(|| ApiError::not_found("Daily record"))?;

    info!(record_id, caller = user.id(), "Daily record updated");
    Ok(Json(record))
}

/// Delete every record of a user
#[utoipa::path(
    delete,
    path = "/dailyrecords/{id}/",
    tag = "daily-records",
    params(("id" = i64, Path, description = "Owning user id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Records deleted", body = DeletedResponse),
        (status = 400, description = "Malformed id"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Unknown user")
    )
)]
pub async fn delete_daily_records(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(user_id): Path<String>,
) -> Result<Json<DeletedResponse>> {
    let user_id = ValidatedId::parse(&user_id, "user_id")?;
    require_admin_or_owner(&user.0, user_id)?;

    if state.store.find_user(user_id).await?.is_none() {
        return Err(ApiError::not_found("User"));
    }

    let deleted = state.store.delete_daily_records_for_user(user_id).await?;
    info!(user_id, deleted, caller = user.id(), "Daily records deleted");
    Ok(Json(DeletedResponse::new(
        deleted,
        format!("Deleted {} daily records", deleted),
    )))
}

/// Get a single record by its own id
#[utoipa::path(
    get,
    path = "/dailyrecords/record/{record_id}/",
    tag = "daily-records",
    params(("record_id" = i64, Path, description = "Daily record id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "The record", body = DailyRecordValue),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Unknown record")
    )
)]
pub async fn get_daily_record(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(record_id): Path<String>,
) -> Result<Json<DailyRecordValue>> {
    let record_id = ValidatedId::parse(&record_id, "record_id")?;
    let record = load_owned_record(&state, &user, record_id).await?;
    Ok(Json(record))
}

/// Delete a single record by its own id
#[utoipa::path(
    delete,
    path = "/dailyrecords/record/{record_id}/",
    tag = "daily-records",
    params(("record_id" = i64, Path, description = "Daily record id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Record deleted", body = DeletedResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Unknown record")
    )
)]
pub async fn delete_daily_record(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(record_id): Path<String>,
) -> Result<Json<DeletedResponse>> {
    let record_id = ValidatedId::parse(&record_id, "record_id")?;
    load_owned_record(&state, &user, record_id).await?;

    if !state.store.delete_daily_record(record_id).await? {
        return Err(ApiError::not_found("Daily record"));
    }

    info!(record_id, caller = user.id(), "Daily record deleted");
    Ok(Json(DeletedResponse::new(1, "Daily record deleted")))
}
