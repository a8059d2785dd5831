#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use tasktrack_api::app::{router, AppState};
use tasktrack_api::auth::TOKEN_HEADER;
use tasktrack_api::config::AppConfig;
use tasktrack_api::database::models::AccountType;
use tasktrack_api::database::{MemoryAccountStore, MemoryTodoStore};
use tasktrack_api::notification::Notifier;

pub const ADMIN_NAME: &str = "root";
pub const ADMIN_PASSWORD: &str = "root";

/// Captures notifications instead of delivering them
#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<Value>>,
}

impl Notifier for RecordingNotifier {
    fn send(&self, payload: Value) {
        self.sent.lock().unwrap().push(payload);
    }
}

pub struct TestApp {
    pub base_url: String,
    pub state: AppState,
    pub account_store: Arc<MemoryAccountStore>,
    pub notifier: Arc<RecordingNotifier>,
    client: reqwest::Client,
}

/// Response status plus the decoded envelope
pub struct Reply {
    pub status: StatusCode,
    pub body: Value,
}

impl Reply {
    pub fn code(&self) -> u64 {
        self.body["code"].as_u64().unwrap_or(u64::MAX)
    }

    pub fn data(&self) -> &Value {
        &self.body["data"]
    }
}

/// Serve the router on a free port, backed by fresh in-memory stores.
/// The server lives on the calling test's runtime.
pub async fn spawn_app() -> Result<TestApp> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let base_url = format!("http://127.0.0.1:{}", port);

    let mut config = AppConfig::development();
    config.server.enable_request_logging = false;

    let account_store = Arc::new(MemoryAccountStore::new());
    let notifier = Arc::new(RecordingNotifier::default());
    let state = AppState::new(
        account_store.clone(),
        Arc::new(MemoryTodoStore::new()),
        notifier.clone(),
        config.server.allow_list.clone(),
    );

    let listener = TcpListener::bind(("127.0.0.1", port)).await?;
    let app = router(state.clone(), &config);
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    let client = reqwest::Client::builder().timeout(Duration::from_secs(30)).build()?;

    Ok(TestApp {
        base_url,
        state,
        account_store,
        notifier,
        client,
    })
}

/// `spawn_app` with the `root` administrator already in place
pub async fn spawn_app_with_admin() -> Result<TestApp> {
    let app = spawn_app().await?;
    app.seed_account(ADMIN_NAME, ADMIN_PASSWORD, AccountType::Admin).await?;
    Ok(app)
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Create an account straight through the service, bypassing HTTP
    pub async fn seed_account(&self, name: &str, password: &str, account_type: AccountType) -> Result<i64> {
        let account = self
            .state
            .accounts
            .create_account(name.to_string(), password.to_string(), account_type)
            .await?;
        Ok(account.id)
    }

    pub async fn login(&self, name: &str, password: &str) -> Result<String> {
        let reply = self
            .post("/v1/login", None, json!({ "name": name, "password": password }))
            .await?;
        anyhow::ensure!(reply.code() == 0, "login failed: {}", reply.body);

        reply.data()["token"]
            .as_str()
            .map(str::to_string)
            .context("login reply has no token")
    }

    pub async fn admin_token(&self) -> Result<String> {
        self.login(ADMIN_NAME, ADMIN_PASSWORD).await
    }

    /// Seed a plain user and log it in, returning (id, token)
    pub async fn user_session(&self, name: &str) -> Result<(i64, String)> {
        let id = self.seed_account(name, "pw", AccountType::User).await?;
        let token = self.login(name, "pw").await?;
        Ok((id, token))
    }

    pub async fn create_todo(&self, token: &str, name: &str, desc: &str) -> Result<Value> {
        let reply = self
            .post("/v1/todo", Some(token), json!({ "name": name, "desc": desc }))
            .await?;
        anyhow::ensure!(reply.code() == 0, "create todo failed: {}", reply.body);
        Ok(reply.data().clone())
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> Result<Reply> {
        self.send(self.client.get(self.url(path)), token).await
    }

    pub async fn post(&self, path: &str, token: Option<&str>, body: Value) -> Result<Reply> {
        self.send(self.client.post(self.url(path)).json(&body), token).await
    }

    pub async fn put(&self, path: &str, token: Option<&str>, body: Value) -> Result<Reply> {
        self.send(self.client.put(self.url(path)).json(&body), token).await
    }

    pub async fn delete(&self, path: &str, token: Option<&str>, body: Value) -> Result<Reply> {
        self.send(self.client.delete(self.url(path)).json(&body), token).await
    }

    async fn send(&self, mut builder: reqwest::RequestBuilder, token: Option<&str>) -> Result<Reply> {
        if let Some(token) = token {
            builder = builder.header(TOKEN_HEADER, token);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.json::<Value>().await.context("response body is not JSON")?;
        Ok(Reply { status, body })
    }
}
