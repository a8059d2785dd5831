// handlers/elevated/mod.rs - Elevated handlers (admin session required)
//
// Account management. Handlers take `AdminAccount`, which refuses non-admins
// with `no access` before the request body is parsed or any store is touched.

pub mod account; // POST /v1/account, DELETE /v1/account
