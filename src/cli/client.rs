use std::time::Duration;

use reqwest::{Method, RequestBuilder};
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::auth::TOKEN_HEADER;
use crate::cli::config::CliConfig;
use crate::error::ErrCode;

/// Non-zero `code` returned by the server
#[derive(Debug, thiserror::Error)]
#[error("{message} ({kind})")]
pub struct RemoteError {
    pub code: u8,
    pub kind: String,
    pub message: String,
}

impl RemoteError {
    fn new(code: u8, message: String) -> Self {
        let kind = match ErrCode::from_u8(code) {
            Some(ErrCode::InvalidArgument) => "invalid argument",
            Some(ErrCode::Internal) => "internal error",
            Some(ErrCode::Unauthenticated) => "unauthenticated",
            Some(ErrCode::NoAccess) => "no access",
            Some(ErrCode::NotFound) => "not found",
            Some(ErrCode::None) | None => "unknown error",
        };

        Self {
            code,
            kind: kind.to_string(),
            message,
        }
    }
}

/// HTTP client for the tasktrack API that unwraps the `{code, message, data}` envelope
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(server_url: &str, token: Option<String>) -> anyhow::Result<Self> {
        let base = Url::parse(server_url).map_err(|e| anyhow::anyhow!("invalid server URL '{}': {}", server_url, e))?;
        let http = reqwest::Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self { http, base, token })
    }

    pub fn from_config(config: &CliConfig) -> anyhow::Result<Self> {
        Self::new(&config.server_url, config.token.clone())
    }

    pub async fn get(&self, path: &str) -> anyhow::Result<Value> {
        self.send(self.request(Method::GET, path)?).await
    }

    pub async fn get_query<Q: Serialize + ?Sized>(&self, path: &str, query: &Q) -> anyhow::Result<Value> {
        self.send(self.request(Method::GET, path)?.query(query)).await
    }

    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> anyhow::Result<Value> {
        self.send(self.request(Method::POST, path)?.json(body)).await
    }

    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> anyhow::Result<Value> {
        self.send(self.request(Method::PUT, path)?.json(body)).await
    }

    pub async fn delete<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> anyhow::Result<Value> {
        self.send(self.request(Method::DELETE, path)?.json(body)).await
    }

    fn request(&self, method: Method, path: &str) -> anyhow::Result<RequestBuilder> {
        let url = self.base.join(path)?;
        let mut builder = self.http.request(method, url);
        if let Some(token) = &self.token {
            builder = builder.header(TOKEN_HEADER, token);
        }
        Ok(builder)
    }

    async fn send(&self, builder: RequestBuilder) -> anyhow::Result<Value> {
        let response = builder.send().await?;
        let status = response.status();
        let body: Value = response
            .json()
            .await
            .map_err(|e| anyhow::anyhow!("unexpected response (HTTP {}): {}", status, e))?;

        unwrap_envelope(body)
    }
}

/// `data` of a successful envelope, `RemoteError` otherwise
pub fn unwrap_envelope(mut body: Value) -> anyhow::Result<Value> {
    let code = body
        .get("code")
        .and_then(Value::as_u64)
        .ok_or_else(|| anyhow::anyhow!("response has no code: {}", body))?;

    if code != 0 {
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        return Err(RemoteError::new(u8::try_from(code).unwrap_or(u8::MAX), message).into());
    }

    Ok(body.get_mut("data").map(Value::take).unwrap_or(Value::Null))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_yields_data() {
        let data = unwrap_envelope(json!({ "code": 0, "message": "ok", "data": { "token": "t" } })).unwrap();
        assert_eq!(data["token"], "t");
    }

    #[test]
    fn failure_becomes_remote_error() {
        let err = unwrap_envelope(json!({ "code": 4, "message": "No access", "data": null })).unwrap_err();
        let remote = err.downcast_ref::<RemoteError>().unwrap();
        assert_eq!(remote.code, 4);
        assert_eq!(remote.to_string(), "No access (no access)");
    }

    #[test]
    fn bad_server_url_is_rejected() {
        assert!(ApiClient::new("not a url", None).is_err());
    }
}
