//! Common extractors for API handlers.
//!
//! Request bodies go through [`ValidatedJson`] so that malformed JSON,
//! missing fields and `validator` rule failures all surface as structured
//! 400 responses. Path ids go through [`ValidatedId`].

use axum::{
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::ApiError;

/// JSON body that has been deserialized and validated
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

/// Validated numeric id helper
///
/// Use this to parse ids taken from path segments.
///
/// # Example
/// ```ignore
/// let user_id = ValidatedId::parse(&raw, "user_id")?;
/// ```
pub struct ValidatedId;

impl ValidatedId {
    /// Parse a string into a positive id, returning an ApiError on failure
    pub fn parse(s: &str, field: &str) -> Result<i64, ApiError> {
        match s.parse::<i64>() {
            Ok(id) if id > 0 => Ok(id),
            _ => Err(ApiError::validation_field(
                field,
                format!("Invalid {}: {}", field, s),
            )),
        }
    }
}
