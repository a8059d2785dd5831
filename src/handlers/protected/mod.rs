// handlers/protected/mod.rs - Protected handlers (session token required)
//
// The session middleware has already resolved the token; handlers take the
// caller as a `CurrentAccount` argument and apply ownership rules themselves.

pub mod account; // GET /v1/accounts, GET /v1/account
pub mod auth;    // POST /v1/logout, GET /v1/whoami
pub mod todo;    // /v1/todos, /v1/todo
