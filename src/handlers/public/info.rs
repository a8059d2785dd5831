use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::error::ErrCode;
use crate::middleware::{ApiResponse, ApiResult};

/// GET / - service name, version and route overview
pub async fn root() -> ApiResult<Value> {
    Ok(ApiResponse::success(json!({
        "name": "tasktrack-api",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "public": ["/", "/health", "POST /v1/login"],
            "session": ["POST /v1/logout", "GET /v1/whoami"],
            "accounts": ["GET /v1/accounts", "GET|POST|DELETE /v1/account"],
            "todos": ["GET /v1/todos", "GET|POST|PUT|DELETE /v1/todo"]
        }
    })))
}

/// GET /health - liveness plus a database probe when a pool is attached
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    let Some(database) = &state.database else {
        return ApiResponse::success(json!({
            "status": "ok",
            "timestamp": now,
            "database": "memory"
        }))
        .into_response();
    };

    match database.health_check().await {
        Ok(()) => ApiResponse::success(json!({
            "status": "ok",
            "timestamp": now,
            "database": "ok"
        }))
        .into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "Database health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "code": ErrCode::Internal,
                    "message": "database unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now,
                        "database_error": e.to_string()
                    }
                })),
            )
                .into_response()
        }
    }
}
