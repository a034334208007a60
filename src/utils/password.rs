use actix_web::rt::task::spawn_blocking;
use bcrypt::{hash, verify, BcryptError};

use crate::errors::AppError;

/// bcrypt hashing off the async executor.
#[derive(Clone)]
pub struct PasswordHasher {
    cost: u32,
    // Verified against when no account matches, so a miss costs as much as a hit.
    dummy_hash: String,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Result<Self, BcryptError> {
        let dummy_hash = hash("nutri-dummy-password", cost)?;
        Ok(Self { cost, dummy_hash })
    }

    pub async fn hash(&self, password: &str) -> Result<String, AppError> {
        let password = password.to_string();
        let cost = self.cost;
        spawn_blocking(move || hash(password, cost))
            .await
            .map_err(|_| AppError::InternalServerError("Hashing failed".to_string()))?
            .map_err(|e| AppError::InternalServerError(e.to_string()))
    }

    pub async fn verify(&self, password: &str, digest: &str) -> Result<bool, AppError> {
        let password = password.to_string();
        let digest = digest.to_string();
        spawn_blocking(move || verify(password, &digest))
            .await
            .map_err(|_| AppError::InternalServerError("Password verification error".to_string()))?
            .map_err(|e| AppError::InternalServerError(e.to_string()))
    }

    /// Burns one verification against the dummy hash.
    pub async fn verify_dummy(&self, password: &str) {
        let _ = self.verify(password, &self.dummy_hash).await;
    }
}
