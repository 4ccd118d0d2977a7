use error_stack::{Result, ResultExt};
use thiserror::Error;
use tokio::task::spawn_blocking;

use crate::util::Sensitive;

// Hashing at full cost makes the test suite crawl
const COST: u32 = if cfg!(test) { 4 } else { 10 };

#[derive(Debug, Error)]
#[error("Failed to process password hash")]
pub struct HashError;

/// Hashes the password with bcrypt and a random salt. Runs on
/// the blocking thread pool.
#[tracing::instrument(skip_all)]
pub async fn hash_password(password: Sensitive<String>) -> Result<String, HashError> {
  spawn_blocking(move || bcrypt::hash(password.as_str(), COST))
    .await
    .change_context(HashError)?
    .change_context(HashError)
}

#[tracing::instrument(skip_all)]
pub async fn verify_password(password: Sensitive<String>, hash: String) -> Result<bool, HashError> {
  spawn_blocking(move || bcrypt::verify(password.as_str(), &hash))
    .await
    .change_context(HashError)?
    .change_context(HashError)
}
