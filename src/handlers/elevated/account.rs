use axum::extract::State;
use serde::Deserialize;
use serde_json::Value;

use crate::app::AppState;
use crate::database::models::{Account, AccountType};
use crate::handlers::validation::{require_id, require_non_empty};
use crate::middleware::{AdminAccount, ApiJson, ApiResponse, ApiResult};

#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    pub name: String,
    pub password: String,
    #[serde(rename = "type")]
    pub account_type: AccountType,
}

#[derive(Debug, Deserialize)]
pub struct DeleteAccountRequest {
    pub id: i64,
}

/// POST /v1/account - admin only
///
/// ```json
/// { "name": "alice", "password": "secret", "type": "user" }
/// ```
pub async fn create_account(
    State(state): State<AppState>,
    AdminAccount(admin): AdminAccount,
    ApiJson(body): ApiJson<CreateAccountRequest>,
) -> ApiResult<Account> {
    require_non_empty("name", &body.name)?;
    require_non_empty("password", &body.password)?;

    let account = state
        .accounts
        .create_account(body.name, body.password, body.account_type)
        .await?;

    tracing::info!(admin_id = admin.id, account_id = account.id, "Account created by admin");
    Ok(ApiResponse::success(account))
}

/// DELETE /v1/account - admin only, body `{ "id": 3 }`
///
/// Live sessions of the deleted account keep their snapshot until logout.
pub async fn delete_account(
    State(state): State<AppState>,
    AdminAccount(admin): AdminAccount,
    ApiJson(body): ApiJson<DeleteAccountRequest>,
) -> ApiResult<Value> {
    require_id(body.id)?;

    state.accounts.delete_account(body.id).await?;

    tracing::info!(admin_id = admin.id, account_id = body.id, "Account deleted by admin");
    Ok(ApiResponse::empty())
}
