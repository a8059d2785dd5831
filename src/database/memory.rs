use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::database::manager::DatabaseError;
use crate::database::models::{Account, NewAccount, NewTodo, Todo, TodoPatch, TodoStatus};
use crate::database::repository::{AccountStore, TodoStore};

/// Process-local account store, used for `STORAGE_BACKEND=memory` and in tests
#[derive(Default)]
pub struct MemoryAccountStore {
    inner: RwLock<Table<Account>>,
}

/// Process-local todo store
#[derive(Default)]
pub struct MemoryTodoStore {
    inner: RwLock<Table<Todo>>,
}

struct Table<T> {
    next_id: i64,
    rows: BTreeMap<i64, T>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            next_id: 1,
            rows: BTreeMap::new(),
        }
    }
}

impl<T> Table<T> {
    fn allocate_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.rows.len()
    }
}

impl MemoryTodoStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn create(&self, account: NewAccount) -> Result<Account, DatabaseError> {
        let mut table = self.inner.write().await;

        if table.rows.values().any(|a| a.name == account.name) {
            return Err(DatabaseError::Conflict(format!("account name '{}' is taken", account.name)));
        }

        let created = Account {
            id: table.allocate_id(),
            name: account.name,
            password_hash: account.password_hash,
            account_type: account.account_type,
            created_at: Utc::now(),
        };
        table.rows.insert(created.id, created.clone());
        Ok(created)
    }

    async fn get(&self, id: i64) -> Result<Option<Account>, DatabaseError> {
        Ok(self.inner.read().await.rows.get(&id).cloned())
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<Account>, DatabaseError> {
        Ok(self
            .inner
            .read()
            .await
            .rows
            .values()
            .find(|a| a.name == name)
            .cloned())
    }

    async fn get_all(&self) -> Result<Vec<Account>, DatabaseError> {
        Ok(self.inner.read().await.rows.values().cloned().collect())
    }

    async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        self.inner.write().await.rows.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl TodoStore for MemoryTodoStore {
    async fn create(&self, todo: NewTodo) -> Result<Todo, DatabaseError> {
        let mut table = self.inner.write().await;
        let now = Utc::now();

        let created = Todo {
            id: table.allocate_id(),
            owner_id: todo.owner_id,
            name: todo.name,
            desc: todo.desc,
            status: TodoStatus::Open,
            created_at: now,
            updated_at: now,
        };
        table.rows.insert(created.id, created.clone());
        Ok(created)
    }

    async fn get(&self, id: i64) -> Result<Option<Todo>, DatabaseError> {
        Ok(self.inner.read().await.rows.get(&id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<Todo>, DatabaseError> {
        Ok(self.inner.read().await.rows.values().cloned().collect())
    }

    async fn update(&self, patch: TodoPatch) -> Result<(), DatabaseError> {
        let mut table = self.inner.write().await;

        // Matches UPDATE ... WHERE id = ?: a missing row is a silent no-op
        if let Some(todo) = table.rows.get_mut(&patch.id) {
            patch.apply_to(todo);
            todo.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        self.inner.write().await.rows.remove(&id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::AccountType;

    fn new_account(name: &str) -> NewAccount {
        NewAccount {
            name: name.to_string(),
            password_hash: "hash".to_string(),
            account_type: AccountType::User,
        }
    }

    #[tokio::test]
    async fn account_names_are_unique() {
        let store = MemoryAccountStore::new();
        store.create(new_account("alice")).await.unwrap();

        let err = store.create(new_account("alice")).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Conflict(_)));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let store = MemoryAccountStore::new();
        let first = store.create(new_account("a")).await.unwrap();
        store.delete(first.id).await.unwrap();
        let second = store.create(new_account("b")).await.unwrap();

        assert!(second.id > first.id);
        assert!(store.get(first.id).await.unwrap().is_none());
        assert_eq!(store.get_by_name("b").await.unwrap().map(|a| a.id), Some(second.id));
    }

    #[tokio::test]
    async fn sparse_update_keeps_untouched_fields() {
        let store = MemoryTodoStore::new();
        let todo = store
            .create(NewTodo {
                owner_id: 1,
                name: "name".to_string(),
                desc: "desc".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(todo.status, TodoStatus::Open);

        store
            .update(TodoPatch {
                id: todo.id,
                status: Some(TodoStatus::Done),
                ..Default::default()
            })
            .await
            .unwrap();

        let stored = store.get(todo.id).await.unwrap().unwrap();
        assert_eq!(stored.status, TodoStatus::Done);
        assert_eq!(stored.name, "name");
        assert_eq!(stored.desc, "desc");
    }

    #[tokio::test]
    async fn updating_missing_todo_is_a_no_op() {
        let store = MemoryTodoStore::new();
        store
            .update(TodoPatch {
                id: 42,
                name: Some("ghost".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(store.get_all().await.unwrap().is_empty());
    }
}
