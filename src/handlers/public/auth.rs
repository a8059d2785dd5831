use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::app::AppState;
use crate::auth::verify_password;
use crate::error::ApiError;
use crate::services::ServiceError;
use crate::handlers::validation::require_non_empty;
use crate::middleware::{ApiJson, ApiResponse, ApiResult};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub name: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

/// POST /v1/login - exchange name and password for a session token
///
/// ```json
/// { "name": "root", "password": "root" }
/// ```
///
/// Unknown names and wrong passwords are both `unauthenticated`.
pub async fn login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> ApiResult<LoginResponse> {
    require_non_empty("name", &body.name)?;
    require_non_empty("password", &body.password)?;

    let account = state
        .accounts
        .get_account_by_name(&body.name)
        .await?
        .ok_or_else(|| ApiError::unauthenticated("account not found"))?;

    let matches = verify_password(body.password, account.password_hash.clone())
        .await
        .map_err(|source| {
            tracing::error!(error = %source, name = %account.name, "Password check failed");
            ServiceError::Worker { operation: "login", source }
        })?;

    if !matches {
        tracing::info!(name = %account.name, "Login refused: wrong password");
        return Err(ApiError::unauthenticated("invalid password"));
    }

    let account_id = account.id;
    let token = state.sessions.create(account).await;
    tracing::info!(account_id, name = %body.name, "Session created");

    Ok(ApiResponse::success(LoginResponse { token }))
}
