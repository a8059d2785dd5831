use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::app::AppState;
use crate::auth::TOKEN_HEADER;
use crate::database::models::Account;
use crate::error::ApiError;

/// Account resolved from the session token of the current request
#[derive(Clone, Debug)]
pub struct CurrentAccount(pub Account);

/// Session authentication middleware: resolves the `token` header against the
/// session registry and injects `CurrentAccount` for the handlers behind it.
/// Paths on the configured allow-list pass through untouched.
pub async fn session_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if state.allow_list.contains(request.uri().path()) {
        return Ok(next.run(request).await);
    }

    let token = extract_token(request.headers()).ok_or_else(invalid_token)?;

    let account = state.sessions.get(&token).await.ok_or_else(|| {
        tracing::debug!(path = %request.uri().path(), "Unknown session token");
        invalid_token()
    })?;

    request.extensions_mut().insert(CurrentAccount(account));

    Ok(next.run(request).await)
}

/// Token from the `token` header, read verbatim. `None` when missing,
/// unreadable or blank.
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|token| !token.trim().is_empty())
        .map(str::to_string)
}

fn invalid_token() -> ApiError {
    ApiError::unauthenticated("invalid token")
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentAccount
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentAccount>()
            .cloned()
            .ok_or_else(invalid_token)
    }
}

/// `CurrentAccount` narrowed to administrators, anyone else gets `no access`.
/// Being a parts extractor it rejects before any body is read.
#[derive(Clone, Debug)]
pub struct AdminAccount(pub Account);

#[async_trait]
impl<S> FromRequestParts<S> for AdminAccount
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let CurrentAccount(account) = CurrentAccount::from_request_parts(parts, state).await?;

        if !account.is_admin() {
            tracing::debug!(account_id = account.id, path = %parts.uri.path(), "Admin route refused");
            return Err(ApiError::no_access());
        }

        Ok(AdminAccount(account))
    }
}
