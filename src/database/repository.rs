use async_trait::async_trait;

use crate::database::manager::DatabaseError;
use crate::database::models::{Account, NewAccount, NewTodo, Todo, TodoPatch};

/// Persistence contract for accounts. Name uniqueness is the store's job.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn create(&self, account: NewAccount) -> Result<Account, DatabaseError>;

    async fn get(&self, id: i64) -> Result<Option<Account>, DatabaseError>;

    async fn get_by_name(&self, name: &str) -> Result<Option<Account>, DatabaseError>;

    async fn get_all(&self) -> Result<Vec<Account>, DatabaseError>;

    /// Deleting an absent id is not an error
    async fn delete(&self, id: i64) -> Result<(), DatabaseError>;
}

/// Persistence contract for todos.
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// New todos always start out `open`
    async fn create(&self, todo: NewTodo) -> Result<Todo, DatabaseError>;

    async fn get(&self, id: i64) -> Result<Option<Todo>, DatabaseError>;

    async fn get_all(&self) -> Result<Vec<Todo>, DatabaseError>;

    /// Applies only the fields present in `patch`
    async fn update(&self, patch: TodoPatch) -> Result<(), DatabaseError>;

    async fn delete(&self, id: i64) -> Result<(), DatabaseError>;
}
