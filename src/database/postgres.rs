use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::database::manager::DatabaseError;
use crate::database::models::account::AccountRow;
use crate::database::models::todo::TodoRow;
use crate::database::models::{Account, NewAccount, NewTodo, Todo, TodoPatch, TodoStatus};
use crate::database::repository::{AccountStore, TodoStore};

const ACCOUNT_COLUMNS: &str = "id, name, password_hash, account_type, created_at";
const TODO_COLUMNS: &str = "id, owner_id, name, description, status, created_at, updated_at";

pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn create(&self, account: NewAccount) -> Result<Account, DatabaseError> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "INSERT INTO accounts (name, password_hash, account_type) VALUES ($1, $2, $3) RETURNING {}",
            ACCOUNT_COLUMNS
        ))
        .bind(&account.name)
        .bind(&account.password_hash)
        .bind(account.account_type.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DatabaseError::from_write(e, format!("account name '{}' is taken", account.name)))?;

        row.try_into()
    }

    async fn get(&self, id: i64) -> Result<Option<Account>, DatabaseError> {
        sqlx::query_as::<_, AccountRow>(&format!("SELECT {} FROM accounts WHERE id = $1", ACCOUNT_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Account::try_from)
            .transpose()
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<Account>, DatabaseError> {
        sqlx::query_as::<_, AccountRow>(&format!("SELECT {} FROM accounts WHERE name = $1", ACCOUNT_COLUMNS))
            .bind(name)
            .fetch_optional(&self.pool)
            .await?
            .map(Account::try_from)
            .transpose()
    }

    async fn get_all(&self) -> Result<Vec<Account>, DatabaseError> {
        sqlx::query_as::<_, AccountRow>(&format!("SELECT {} FROM accounts ORDER BY id", ACCOUNT_COLUMNS))
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(Account::try_from)
            .collect()
    }

    async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

pub struct PgTodoStore {
    pool: PgPool,
}

impl PgTodoStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Builds `UPDATE todos SET ... WHERE id = $n` with only the patch's present fields.
fn build_update(patch: &TodoPatch) -> QueryBuilder<'_, Postgres> {
    let mut builder = QueryBuilder::new("UPDATE todos SET updated_at = NOW()");

    if let Some(name) = &patch.name {
        builder.push(", name = ").push_bind(name.as_str());
    }
    if let Some(desc) = &patch.desc {
        builder.push(", description = ").push_bind(desc.as_str());
    }
    if let Some(status) = patch.status {
        builder.push(", status = ").push_bind(status.as_str());
    }

    builder.push(" WHERE id = ").push_bind(patch.id);
    builder
}

#[async_trait]
impl TodoStore for PgTodoStore {
    async fn create(&self, todo: NewTodo) -> Result<Todo, DatabaseError> {
        let row = sqlx::query_as::<_, TodoRow>(&format!(
            "INSERT INTO todos (owner_id, name, description, status) VALUES ($1, $2, $3, $4) RETURNING {}",
            TODO_COLUMNS
        ))
        .bind(todo.owner_id)
        .bind(&todo.name)
        .bind(&todo.desc)
        .bind(TodoStatus::Open.as_str())
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn get(&self, id: i64) -> Result<Option<Todo>, DatabaseError> {
        sqlx::query_as::<_, TodoRow>(&format!("SELECT {} FROM todos WHERE id = $1", TODO_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Todo::try_from)
            .transpose()
    }

    async fn get_all(&self) -> Result<Vec<Todo>, DatabaseError> {
        sqlx::query_as::<_, TodoRow>(&format!("SELECT {} FROM todos ORDER BY id", TODO_COLUMNS))
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(Todo::try_from)
            .collect()
    }

    async fn update(&self, patch: TodoPatch) -> Result<(), DatabaseError> {
        build_update(&patch).build().execute(&self.pool).await?;
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        sqlx::query("DELETE FROM todos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
