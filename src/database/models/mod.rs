pub mod account;
pub mod todo;

pub use account::{Account, AccountType, NewAccount};
pub use todo::{NewTodo, Todo, TodoPatch, TodoStatus};
