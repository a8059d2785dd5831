use std::collections::HashSet;
use std::sync::Arc;

use axum::{
    http::HeaderValue,
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::SessionRegistry;
use crate::config::AppConfig;
use crate::database::{AccountStore, DatabaseManager, TodoStore};
use crate::handlers::{elevated, protected, public};
use crate::middleware::session_auth_middleware;
use crate::notification::Notifier;
use crate::services::{AccountService, TodoService};

/// Shared state handed to every handler and to the session middleware
#[derive(Clone)]
pub struct AppState {
    pub accounts: AccountService,
    pub todos: TodoService,
    pub sessions: Arc<SessionRegistry>,
    pub allow_list: Arc<HashSet<String>>,
    pub database: Option<DatabaseManager>,
}

impl AppState {
    pub fn new(
        account_store: Arc<dyn AccountStore>,
        todo_store: Arc<dyn TodoStore>,
        notifier: Arc<dyn Notifier>,
        allow_list: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            accounts: AccountService::new(account_store),
            todos: TodoService::new(todo_store, notifier),
            sessions: Arc::new(SessionRegistry::new()),
            allow_list: Arc::new(allow_list.into_iter().collect()),
            database: None,
        }
    }

    /// Attach the pool so `/health` can probe it
    pub fn with_database(mut self, database: DatabaseManager) -> Self {
        self.database = Some(database);
        self
    }
}

pub fn router(state: AppState, config: &AppConfig) -> Router {
    let api = Router::new()
        .route("/v1/login", post(public::auth::login))
        .route("/v1/logout", post(protected::auth::logout))
        .route("/v1/whoami", get(protected::auth::whoami))
        .route("/v1/accounts", get(protected::account::list_accounts))
        .route(
            "/v1/account",
            get(protected::account::get_account)
                .post(elevated::account::create_account)
                .delete(elevated::account::delete_account),
        )
        .route("/v1/todos", get(protected::todo::list_todos))
        .route(
            "/v1/todo",
            get(protected::todo::get_todo)
                .post(protected::todo::create_todo)
                .put(protected::todo::update_todo)
                .delete(protected::todo::delete_todo),
        );

    let mut app = Router::new()
        .route("/", get(public::info::root))
        .route("/health", get(public::info::health))
        .merge(api)
        .layer(middleware::from_fn_with_state(state.clone(), session_auth_middleware))
        .with_state(state);

    if config.security.enable_cors {
        app = app.layer(cors_layer(&config.security.cors_origins));
    }

    if config.server.enable_request_logging {
        app = app.layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()));
    }

    app
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any)
}
