use std::sync::Arc;

use tracing::{error, info};

use super::ServiceError;
use crate::auth::hash_password;
use crate::database::models::{Account, AccountType, NewAccount};
use crate::database::AccountStore;

/// Account operations over an `AccountStore`. Errors are logged with their
/// inputs (never the password) and handed back unchanged.
#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn AccountStore>,
}

impl AccountService {
    pub fn new(store: Arc<dyn AccountStore>) -> Self {
        Self { store }
    }

    pub async fn create_account(
        &self,
        name: String,
        password: String,
        account_type: AccountType,
    ) -> Result<Account, ServiceError> {
        let password_hash = hash_password(password)
            .await
            .map_err(|source| ServiceError::Worker { operation: "AccountService::create_account", source })?;

        let new_account = NewAccount {
            name,
            password_hash,
            account_type,
        };

        match self.store.create(new_account.clone()).await {
            Ok(account) => {
                info!(id = account.id, name = %account.name, account_type = %account.account_type, "Account created");
                Ok(account)
            }
            Err(e) => {
                error!(error = %e, name = %new_account.name, account_type = %new_account.account_type, "AccountService::create_account failed");
                Err(ServiceError::store("AccountService::create_account")(e))
            }
        }
    }

    pub async fn get_account(&self, id: i64) -> Result<Option<Account>, ServiceError> {
        self.store.get(id).await.map_err(|e| {
            error!(error = %e, id, "AccountService::get_account failed");
            ServiceError::store("AccountService::get_account")(e)
        })
    }

    /// Includes the password hash, login compares against it
    pub async fn get_account_by_name(&self, name: &str) -> Result<Option<Account>, ServiceError> {
        self.store.get_by_name(name).await.map_err(|e| {
            error!(error = %e, name = %name, "AccountService::get_account_by_name failed");
            ServiceError::store("AccountService::get_account_by_name")(e)
        })
    }

    pub async fn list_accounts(&self) -> Result<Vec<Account>, ServiceError> {
        self.store.get_all().await.map_err(|e| {
            error!(error = %e, "AccountService::list_accounts failed");
            ServiceError::store("AccountService::list_accounts")(e)
        })
    }

    pub async fn delete_account(&self, id: i64) -> Result<(), ServiceError> {
        self.store.delete(id).await.map_err(|e| {
            error!(error = %e, id, "AccountService::delete_account failed");
            ServiceError::store("AccountService::delete_account")(e)
        })?;
        info!(id, "Account deleted");
        Ok(())
    }

    /// Create the bootstrap administrator unless an account with that name exists.
    /// Returns `true` when a new account was created.
    pub async fn ensure_admin(&self, name: &str, password: &str) -> Result<bool, ServiceError> {
        if self.get_account_by_name(name).await?.is_some() {
            return Ok(false);
        }

        self.create_account(name.to_string(), password.to_string(), AccountType::Admin)
            .await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::verify_password;
    use crate::database::{DatabaseError, MemoryAccountStore};

    fn service() -> AccountService {
        AccountService::new(Arc::new(MemoryAccountStore::new()))
    }

    #[tokio::test]
    async fn stores_a_hash_not_the_password() {
        let svc = service();
        let account = svc
            .create_account("alice".to_string(), "pw".to_string(), AccountType::User)
            .await
            .unwrap();

        assert_ne!(account.password_hash, "pw");
        assert!(verify_password("pw".to_string(), account.password_hash).await.unwrap());
    }

    #[tokio::test]
    async fn duplicate_names_propagate_the_store_error() {
        let svc = service();
        svc.create_account("bob".into(), "a".into(), AccountType::User).await.unwrap();

        let err = svc
            .create_account("bob".into(), "b".into(), AccountType::Admin)
            .await
            .unwrap_err();
        assert!(matches!(err.store_error(), Some(DatabaseError::Conflict(_))));
    }

    #[tokio::test]
    async fn ensure_admin_is_idempotent() {
        let svc = service();
        assert!(svc.ensure_admin("root", "x").await.unwrap());
        assert!(!svc.ensure_admin("root", "x").await.unwrap());

        let accounts = svc.list_accounts().await.unwrap();
        assert_eq!(accounts.len(), 1);
        assert!(accounts[0].is_admin());
    }

    #[tokio::test]
    async fn delete_then_lookup_is_absent() {
        let svc = service();
        let account = svc.create_account("c".into(), "p".into(), AccountType::User).await.unwrap();

        svc.delete_account(account.id).await.unwrap();
        assert!(svc.get_account(account.id).await.unwrap().is_none());
        assert!(svc.get_account_by_name("c").await.unwrap().is_none());
    }
}
