use axum::{extract::State, http::HeaderMap};
use serde_json::Value;

use crate::app::AppState;
use crate::database::models::Account;
use crate::middleware::{extract_token, ApiResponse, ApiResult, CurrentAccount};

/// POST /v1/logout - drop the session behind the request's token
///
/// Always succeeds once past the middleware; deleting is idempotent.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Value> {
    if let Some(token) = extract_token(&headers) {
        state.sessions.delete(&token).await;
        tracing::info!("Session closed");
    }

    Ok(ApiResponse::empty())
}

/// GET /v1/whoami - the account snapshot bound to the session
pub async fn whoami(CurrentAccount(account): CurrentAccount) -> ApiResult<Account> {
    Ok(ApiResponse::success(account))
}
