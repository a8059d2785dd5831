use std::sync::Arc;

use tracing::{debug, error, info, warn};

use super::ServiceError;
use crate::database::models::{NewTodo, Todo, TodoPatch};
use crate::database::TodoStore;
use crate::notification::Notifier;

/// Todo operations over a `TodoStore`, announcing each new todo to a `Notifier`.
#[derive(Clone)]
pub struct TodoService {
    store: Arc<dyn TodoStore>,
    notifier: Arc<dyn Notifier>,
}

impl TodoService {
    pub fn new(store: Arc<dyn TodoStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    pub async fn create_todo(&self, todo: NewTodo) -> Result<Todo, ServiceError> {
        let created = self.store.create(todo.clone()).await.map_err(|e| {
            error!(
                error = %e,
                owner_id = todo.owner_id,
                name = %todo.name,
                desc = %todo.desc,
                "TodoService::create_todo failed"
            );
            ServiceError::store("TodoService::create_todo")(e)
        })?;

        info!(id = created.id, owner_id = created.owner_id, "Todo created");

        match serde_json::to_value(&created) {
            Ok(payload) => self.notifier.send(payload),
            Err(e) => warn!(error = %e, id = created.id, "Could not encode todo notification"),
        }

        Ok(created)
    }

    pub async fn get_todo(&self, id: i64) -> Result<Option<Todo>, ServiceError> {
        self.store.get(id).await.map_err(|e| {
            error!(error = %e, id, "TodoService::get_todo failed");
            ServiceError::store("TodoService::get_todo")(e)
        })
    }

    pub async fn list_todos(&self) -> Result<Vec<Todo>, ServiceError> {
        self.store.get_all().await.map_err(|e| {
            error!(error = %e, "TodoService::list_todos failed");
            ServiceError::store("TodoService::list_todos")(e)
        })
    }

    /// Sparse update, see `TodoPatch`
    pub async fn update_todo(&self, patch: TodoPatch) -> Result<(), ServiceError> {
        if patch.is_empty() {
            debug!(id = patch.id, "Empty todo patch, only updated_at changes");
        }

        self.store.update(patch.clone()).await.map_err(|e| {
            error!(
                error = %e,
                id = patch.id,
                name = ?patch.name,
                desc = ?patch.desc,
                status = ?patch.status,
                "TodoService::update_todo failed"
            );
            ServiceError::store("TodoService::update_todo")(e)
        })
    }

    pub async fn delete_todo(&self, id: i64) -> Result<(), ServiceError> {
        self.store.delete(id).await.map_err(|e| {
            error!(error = %e, id, "TodoService::delete_todo failed");
            ServiceError::store("TodoService::delete_todo")(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::TodoStatus;
    use crate::database::{DatabaseError, MemoryTodoStore};
    use async_trait::async_trait;
    use serde_json::Value;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingNotifier {
        sent: Mutex<Vec<Value>>,
    }

    impl Notifier for RecordingNotifier {
        fn send(&self, payload: Value) {
            self.sent.lock().unwrap().push(payload);
        }
    }

    struct BrokenStore;

    #[async_trait]
    impl TodoStore for BrokenStore {
        async fn create(&self, _todo: NewTodo) -> Result<Todo, DatabaseError> {
            Err(DatabaseError::InvalidRow("disk on fire".to_string()))
        }
        async fn get(&self, _id: i64) -> Result<Option<Todo>, DatabaseError> {
            Err(DatabaseError::InvalidRow("disk on fire".to_string()))
        }
        async fn get_all(&self) -> Result<Vec<Todo>, DatabaseError> {
            Ok(vec![])
        }
        async fn update(&self, _patch: TodoPatch) -> Result<(), DatabaseError> {
            Ok(())
        }
        async fn delete(&self, _id: i64) -> Result<(), DatabaseError> {
            Ok(())
        }
    }

    fn new_todo() -> NewTodo {
        NewTodo {
            owner_id: 3,
            name: "ship".to_string(),
            desc: "it".to_string(),
        }
    }

    #[tokio::test]
    async fn create_notifies_with_created_todo() {
        let notifier = Arc::new(RecordingNotifier::default());
        let svc = TodoService::new(Arc::new(MemoryTodoStore::new()), notifier.clone());

        let todo = svc.create_todo(new_todo()).await.unwrap();
        assert_eq!(todo.status, TodoStatus::Open);

        let sent = notifier.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0]["id"], todo.id);
        assert_eq!(sent[0]["owner_id"], 3);
        assert_eq!(sent[0]["status"], "open");
    }

    #[tokio::test]
    async fn failed_create_does_not_notify() {
        let notifier = Arc::new(RecordingNotifier::default());
        let svc = TodoService::new(Arc::new(BrokenStore), notifier.clone());

        let err = svc.create_todo(new_todo()).await.unwrap_err();
        assert!(err.to_string().contains("disk on fire"));
        assert!(notifier.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn store_errors_propagate_unchanged() {
        let svc = TodoService::new(Arc::new(BrokenStore), Arc::new(RecordingNotifier::default()));

        let err = svc.get_todo(1).await.unwrap_err();
        assert!(matches!(err.store_error(), Some(DatabaseError::InvalidRow(_))));
    }
}
