pub mod password;
pub mod session;

pub use password::{hash_password, verify_password};
pub use session::SessionRegistry;

/// Request header carrying the session token
pub const TOKEN_HEADER: &str = "token";
