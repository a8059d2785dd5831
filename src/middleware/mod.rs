pub mod auth;
pub mod extract;
pub mod response;

pub use auth::{extract_token, session_auth_middleware, AdminAccount, CurrentAccount};
pub use extract::{ApiJson, ApiQuery};
pub use response::{ApiResponse, ApiResult};
