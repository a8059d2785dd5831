pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod transaction;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::{MemoryAccountStore, MemoryTodoStore};
pub use postgres::{PgAccountStore, PgTodoStore};
pub use repository::{AccountStore, TodoStore};
pub use transaction::within_transaction;
