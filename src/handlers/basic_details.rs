//! Basic Details Handlers
//!
//! One diagnosis/admission/test summary per user, addressed by the owning
//! user's id. Callers may only touch their own record unless they are admin.

use axum::{
    extract::{Path, State},
    response::Json,
};
use tracing::info;

use crate::auth::middleware::AuthenticatedUser;
use crate::error::{ApiError, Result};
use crate::handlers::authorization::require_admin_or_owner;
use crate::handlers::extractors::{ValidatedId, ValidatedJson};
use crate::handlers::response::{Created, DeletedResponse};
use crate::models::{BasicDetails, CreateBasicDetailsRequest, UpdateBasicDetailsRequest};
use crate::AppState;

/// Fails with 400 when the referenced user does not exist
pub(crate) async fn ensure_user_exists(state: &AppState, user_id: i64) -> Result<()> {
    match state.store.find_user(user_id).await? {
        Some(_) => Ok(()),
        None => Err(ApiError::validation_field(
            "user",
            format!("User {} does not exist", user_id),
        )),
    }
}

/// Create basic details for a user
#[utoipa::path(
    post,
    path = "/besicdetails/",
    tag = "basic-details",
    request_body = CreateBasicDetailsRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Basic details created", body = BasicDetails),
        (status = 400, description = "Invalid input or unknown user"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the owner"),
        (status = 409, description = "User already has basic details")
    )
)]
pub async fn create_basic_details(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ValidatedJson(request): ValidatedJson<CreateBasicDetailsRequest>,
) -> Result<Created<BasicDetails>> {
    require_admin_or_owner(&user.0, request.user)?;
    ensure_user_exists(&state, request.user).await?;

    if state.store.find_basic_details(request.user).await?.is_some() {
        return Err(ApiError::already_exists("Basic details"));
    }

    let details = state.store.create_basic_details(request).await?;
    info!(
        user_id = details.user,
        caller = user.id(),
        "Basic details created"
    );
    Ok(Created(details))
}

/// Get a user's basic details
#[utoipa::path(
    get,
    path = "/besicdetails/{user_id}/",
    tag = "basic-details",
    params(("user_id" = i64, Path, description = "Owning user id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Basic details", body = BasicDetails),
        (status = 400, description = "Malformed id"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "No basic details for this user")
    )
)]
pub async fn get_basic_details(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(user_id): Path<String>,
) -> Result<Json<BasicDetails>> {
    let user_id = ValidatedId::parse(&user_id, "user_id")?;
    require_admin_or_owner(&user.0, user_id)?;

    let details = state
        .store
        .find_basic_details(user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Basic details"))?;

    Ok(Json(details))
}

/// Update a user's basic details
///
/// Only fields present in the body change; `null` clears an optional field.
#[utoipa::path(
    put,
    path = "/besicdetails/{user_id}/",
    tag = "basic-details",
    params(("user_id" = i64, Path, description = "Owning user id")),
    request_body = UpdateBasicDetailsRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Updated basic details", body = BasicDetails),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "No basic details for this user")
    )
)]
pub async fn update_basic_details(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(user_id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateBasicDetailsRequest>,
) -> Result<Json<BasicDetails>> {
    let user_id = ValidatedId::parse(&user_id, "user_id")?;
    require_admin_or_owner(&user.0, user_id)?;

    if let Some(body_user) = request.user {
        if body_user != user_id {
            return Err(ApiError::validation_field(
                "user",
                "user in body does not match the path",
            ));
        }
    }

    let details = state
        .store
        .update_basic_details(user_id, &request)
        .await?
        .ok_or_else(|| ApiError::not_found("Basic details"))?;

    info!(user_id, caller = user.id(), "Basic details updated");
    Ok(Json(details))
}

/// Delete a user's basic details
#[utoipa::path(
    delete,
    path = "/besicdetails/{user_id}/",
    tag = "basic-details",
    params(("user_id" = i64, Path, description = "Owning user id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Basic details deleted", body = DeletedResponse),
        (status = 400, description = "Malformed id"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "No basic details for this user")
    )
)]
pub async fn delete_basic_details(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(user_id): Path<String>,
) -> Result<Json<DeletedResponse>> {
    let user_id = ValidatedId::parse(&user_id, "user_id")?;
    require_admin_or_owner(&user.0, user_id)?;

    if !state.store.delete_basic_details(user_id).await? {
        return Err(ApiError::not_found("Basic details"));
    }

    info!(user_id, caller = user.id(), "Basic details deleted");
    Ok(Json(DeletedResponse::new(1, "Basic details deleted")))
}
