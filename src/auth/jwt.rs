//! HS256 token issuing and verification.

use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::auth::{Claims, TOKEN_ISSUER};
use crate::error::{ApiError, Result};

#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    expiration: i64,
}

impl JwtService {
    pub fn new(secret: &str, expiration_seconds: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[TOKEN_ISSUER]);
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            expiration: expiration_seconds,
        }
    }

    /// Token lifetime in seconds
    pub fn expiration(&self) -> i64 {
        self.expiration
    }

    /// Build claims for a user with this service's lifetime
    pub fn claims_for(&self, user_id: i64, username: &str, role: &str) -> Claims {
        Claims::new(user_id, username.to_string(), role.to_string(), self.expiration)
    }

    pub fn encode_token(&self, claims: &Claims) -> Result<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| ApiError::Internal(format!("Failed to sign token: {}", e)))
    }

    pub fn decode_token(&self, token: &str) -> Result<Claims> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => ApiError::token_expired(),
                _ => ApiError::token_invalid(),
            })
    }
}
