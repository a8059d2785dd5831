use axum::extract::State;
use serde::Deserialize;
use serde_json::Value;

use crate::app::AppState;
use crate::database::models::{Account, NewTodo, Todo, TodoPatch, TodoStatus};
use crate::error::ApiError;
use crate::handlers::validation::{non_blank, require_id, require_non_empty};
use crate::middleware::{ApiJson, ApiQuery, ApiResponse, ApiResult, CurrentAccount};

#[derive(Debug, Deserialize)]
pub struct TodoQuery {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateTodoRequest {
    pub name: String,
    pub desc: String,
}

/// Sparse update body: absent or blank fields keep their stored value
#[derive(Debug, Deserialize)]
pub struct UpdateTodoRequest {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub desc: Option<String>,
    #[serde(default)]
    pub status: Option<TodoStatus>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteTodoRequest {
    pub id: i64,
}

/// GET /v1/todos
pub async fn list_todos(State(state): State<AppState>, _caller: CurrentAccount) -> ApiResult<Vec<Todo>> {
    let todos = state.todos.list_todos().await?;
    Ok(ApiResponse::success(todos))
}

/// GET /v1/todo?id=
pub async fn get_todo(
    State(state): State<AppState>,
    _caller: CurrentAccount,
    ApiQuery(query): ApiQuery<TodoQuery>,
) -> ApiResult<Todo> {
    require_id(query.id)?;
    let todo = find_todo(&state, query.id).await?;
    Ok(ApiResponse::success(todo))
}

/// POST /v1/todo - the caller becomes the owner
pub async fn create_todo(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    ApiJson(body): ApiJson<CreateTodoRequest>,
) -> ApiResult<Todo> {
    require_non_empty("name", &body.name)?;
    require_non_empty("desc", &body.desc)?;

    let todo = state
        .todos
        .create_todo(NewTodo {
            owner_id: account.id,
            name: body.name,
            desc: body.desc,
        })
        .await?;

    Ok(ApiResponse::success(todo))
}

/// PUT /v1/todo - owner or admin
pub async fn update_todo(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    ApiJson(body): ApiJson<UpdateTodoRequest>,
) -> ApiResult<Value> {
    require_id(body.id)?;

    let todo = find_todo(&state, body.id).await?;
    ensure_can_modify(&account, &todo)?;

    let patch = TodoPatch {
        id: body.id,
        name: non_blank(body.name),
        desc: non_blank(body.desc),
        status: body.status,
    };
    state.todos.update_todo(patch).await?;

    Ok(ApiResponse::empty())
}

/// DELETE /v1/todo - owner or admin, body `{ "id": 7 }`
pub async fn delete_todo(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    ApiJson(body): ApiJson<DeleteTodoRequest>,
) -> ApiResult<Value> {
    require_id(body.id)?;

    let todo = find_todo(&state, body.id).await?;
    ensure_can_modify(&account, &todo)?;

    state.todos.delete_todo(body.id).await?;

    Ok(ApiResponse::empty())
}

async fn find_todo(state: &AppState, id: i64) -> Result<Todo, ApiError> {
    state
        .todos
        .get_todo(id)
        .await?
        .ok_or_else(|| ApiError::not_found("not found"))
}

fn ensure_can_modify(account: &Account, todo: &Todo) -> Result<(), ApiError> {
    if account.is_admin() || account.id == todo.owner_id {
        return Ok(());
    }

    tracing::debug!(account_id = account.id, todo_id = todo.id, owner_id = todo.owner_id, "Todo change refused");
    Err(ApiError::no_access())
}
