use axum::extract::State;
use serde::Deserialize;

use crate::app::AppState;
use crate::database::models::Account;
use crate::error::ApiError;
use crate::handlers::validation::require_id;
use crate::middleware::{ApiQuery, ApiResponse, ApiResult, CurrentAccount};

#[derive(Debug, Deserialize)]
pub struct AccountQuery {
    pub id: i64,
}

/// GET /v1/accounts
pub async fn list_accounts(
    State(state): State<AppState>,
    _caller: CurrentAccount,
) -> ApiResult<Vec<Account>> {
    let accounts = state.accounts.list_accounts().await?;
    Ok(ApiResponse::success(accounts))
}

/// GET /v1/account?id=
pub async fn get_account(
    State(state): State<AppState>,
    _caller: CurrentAccount,
    ApiQuery(query): ApiQuery<AccountQuery>,
) -> ApiResult<Account> {
    require_id(query.id)?;

    let account = state
        .accounts
        .get_account(query.id)
        .await?
        .ok_or_else(|| ApiError::not_found("account not found"))?;

    Ok(ApiResponse::success(account))
}
