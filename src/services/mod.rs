pub mod account_service;
pub mod todo_service;

pub use account_service::AccountService;
pub use todo_service::TodoService;

use crate::database::DatabaseError;

/// Failure of a service operation: which operation failed and why
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{operation}: {source}")]
    Store {
        operation: &'static str,
        #[source]
        source: DatabaseError,
    },

    #[error("{operation}: worker task failed: {source}")]
    Worker {
        operation: &'static str,
        #[source]
        source: tokio::task::JoinError,
    },
}

impl ServiceError {
    pub fn store(operation: &'static str) -> impl FnOnce(DatabaseError) -> Self {
        move |source| ServiceError::Store { operation, source }
    }

    /// Underlying store error, if that is what failed
    pub fn store_error(&self) -> Option<&DatabaseError> {
        match self {
            ServiceError::Store { source, .. } => Some(source),
            ServiceError::Worker { .. } => None,
        }
    }
}
