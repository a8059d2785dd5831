// handlers/public/mod.rs - Public handlers (no token required)
//
// Reachable without a session because their paths are on the allow-list.

pub mod auth; // POST /v1/login
pub mod info; // GET / and GET /health
