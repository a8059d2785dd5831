use std::collections::HashMap;

use sha2::{Digest, Sha256};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::models::Account;

/// In-memory map from session token to the account that logged in.
///
/// Sessions never expire; they live until logout or process restart.
/// An account may hold any number of concurrent sessions.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, Account>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, token: &str) -> Option<Account> {
        self.sessions.read().await.get(token).cloned()
    }

    /// Bind a fresh token to a snapshot of `account` and return it.
    pub async fn create(&self, account: Account) -> String {
        let token = generate_token();
        self.sessions.write().await.insert(token.clone(), account);
        token
    }

    /// Remove the binding. Absent tokens are ignored.
    pub async fn delete(&self, token: &str) {
        self.sessions.write().await.remove(token);
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

/// SHA-256 hex digest of a random v4 UUID.
fn generate_token() -> String {
    let mut hasher = Sha256::new();
    hasher.update(Uuid::new_v4().to_string().as_bytes());
    format!("{:x}", hasher.finalize())
}
