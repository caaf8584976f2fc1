use std::sync::OnceLock;

use crate::error::{ApiError, Result};

/// Hash checked when no account matches, so unknown usernames cost a bcrypt run too
static DUMMY_HASH: OnceLock<String> = OnceLock::new();

pub struct PasswordService;

impl PasswordService {
    pub fn hash_password(password: &str, cost: u32) -> Result<String> {
        bcrypt::hash(password, cost)
            .map_err(|e| ApiError::Internal(format!("Failed to hash password: {}", e)))
    }

    pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
        bcrypt::verify(password, hash)
            .map_err(|e| ApiError::Internal(format!("Failed to verify password: {}", e)))
    }

    /// Run a verification against a throwaway hash of the given cost. The
    /// result is discarded.
    pub fn verify_dummy(password: &str, cost: u32) -> Result<()> {
        let hash = match DUMMY_HASH.get() {
            Some(hash) => hash,
            None => {
                let hash = Self::hash_password("no-such-account", cost)?;
                DUMMY_HASH.get_or_init(|| hash)
            }
        };
        Self::verify_password(password, hash)?;
        Ok(())
    }
}
