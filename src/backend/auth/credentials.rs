/**
 * Password Credentials
 *
 * bcrypt hashing and verification. Both run on tokio's blocking pool since a
 * single bcrypt round at the default cost takes tens of milliseconds.
 */

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("token signing failed: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Hashes and checks passwords at a fixed bcrypt cost
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub async fn hash(&self, password: &str) -> Result<String, CredentialError> {
        let password = password.to_owned();
        let cost = self.cost;
        let hashed = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost)).await??;
        Ok(hashed)
    }

    /// Check `password` against a stored hash
    ///
    /// A malformed stored hash counts as a mismatch rather than an error, so
    /// login answers 401 instead of 500.
    pub async fn verify(&self, password: &str, hash: &str) -> Result<bool, CredentialError> {
        let password = password.to_owned();
        let hash = hash.to_owned();
        let outcome = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash)).await?;

        match outcome {
            Ok(valid) => Ok(valid),
            Err(e) => {
                tracing::warn!("Stored password hash could not be parsed: {}", e);
                Ok(false)
            }
        }
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}
