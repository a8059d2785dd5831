use tokio::task::JoinError;

// argon2 is CPU heavy, keep it off the async worker threads

pub async fn hash_password(password: String) -> Result<String, JoinError> {
    tokio::task::spawn_blocking(move || password_auth::generate_hash(password)).await
}

/// `Ok(false)` on mismatch or a malformed hash. `Err` only if the blocking task dies.
pub async fn verify_password(password: String, hash: String) -> Result<bool, JoinError> {
    tokio::task::spawn_blocking(move || password_auth::verify_password(password, &hash).is_ok()).await
}
