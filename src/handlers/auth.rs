//! Account Handlers
//!
//! Registration and token issuance. Every other resource endpoint requires
//! the bearer token returned by [`login`].

use axum::{extract::State, response::Json};
use tracing::{info, warn};

use crate::auth::password::PasswordService;
use crate::auth::Role;
use crate::error::{ApiError, Result};
use crate::handlers::extractors::ValidatedJson;
use crate::handlers::response::Created;
use crate::middleware::metrics::{track_auth_attempt, track_auth_failure};
use crate::models::{LoginRequest, NewUser, RegisterRequest, TokenResponse, User};
use crate::AppState;

/// Register a new account with the `user` role
#[utoipa::path(
    post,
    path = "/auth/register/",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = User),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Username already taken")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> Result<Created<User>> {
    let password_hash = PasswordService::hash_password(&request.password, state.config.bcrypt_cost)?;

    let user = state
        .store
        .create_user(NewUser {
            username: request.username,
            password_hash,
            role: Role::User,
        })
        .await?;

    info!(user_id = user.id, username = %user.username, "Account registered");
    Ok(Created(user))
}

/// Exchange username and password for a bearer token
#[utoipa::path(
    post,
    path = "/auth/token/",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Json<TokenResponse>> {
    let credentials = match state.store.find_credentials(&request.username).await? {
        Some(credentials) => credentials,
        None => {
            PasswordService::verify_dummy(&request.password, state.config.bcrypt_cost)?;
            warn!(username = %request.username, "Login attempt for unknown account");
            track_auth_attempt(false, "password");
            track_auth_failure("unknown_user");
            return Err(ApiError::invalid_credentials());
        }
    };

    if !PasswordService::verify_password(&request.password, &credentials.password_hash)? {
        warn!(username = %credentials.username, "Invalid password");
        track_auth_attempt(false, "password");
        track_auth_failure("invalid_password");
        return Err(ApiError::invalid_credentials());
    }
    track_auth_attempt(true, "password");

    let user = state
        .store
        .find_user(credentials.id)
        .await?
        .ok_or_else(ApiError::invalid_credentials)?;

    let claims = state
        .jwt_service
        .claims_for(user.id, &user.username, user.role.as_str());
    let access_token = state.jwt_service.encode_token(&claims)?;

    info!(user_id = user.id, "Token issued");
    Ok(Json(TokenResponse {
        access_token,
        token_type: "Bearer".to_string(),
        expires_in: state.jwt_service.expiration(),
        user,
    }))
}
