//! Authorization helpers for handler endpoints.

use crate::auth::Claims;
use crate::error::ApiError;

/// Check if user is an admin
pub fn require_admin(user: &Claims) -> Result<(), ApiError> {
    if user.is_admin() {
        return Ok(());
    }
    Err(ApiError::Forbidden(
        "Access denied. Required role: admin".to_string(),
    ))
}

/// Check if user is admin or the owner of the records being touched
pub fn require_admin_or_owner(user: &Claims, resource_user_id: i64) -> Result<(), ApiError> {
    if user.is_admin() || user.sub == resource_user_id {
        return Ok(());
    }
    Err(ApiError::Forbidden(
        "Access denied. Must be admin or resource owner".to_string(),
    ))
}
