use crate::errors::AppError;

/// Work factor for stored hashes.
pub const HASH_COST: u32 = 10;

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("Bcrypt failure: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),
}

impl From<PasswordError> for AppError {
    fn from(err: PasswordError) -> Self {
        AppError::Internal(anyhow::Error::new(err))
    }
}

pub fn hash_password(plaintext: &str) -> Result<String, PasswordError> {
    bcrypt::hash(plaintext, HASH_COST).map_err(PasswordError::from)
}

/// Verify a password against a bcrypt hash
pub fn verify_password(plaintext: &str, hash: &str) -> Result<bool, PasswordError> {
    bcrypt::verify(plaintext, hash).map_err(PasswordError::from)
}
