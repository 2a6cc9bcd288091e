use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, Path, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use sqlx::PgPool;

use crate::api::AppState;
use crate::error::{AppError, Result};
use crate::models::todo::{CreateTodoRequest, Todo, UpdateTodoRequest};

type JsonBody<T> = std::result::Result<Json<T>, JsonRejection>;
type TodoId = std::result::Result<Path<i32>, PathRejection>;

fn store_error(operation: &'static str, todo_id: Option<i32>) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| {
        tracing::error!(operation, todo_id, error = %e, "Todo store operation failed");
        AppError::Database(e)
    }
}

fn not_found(id: i32) -> AppError {
    AppError::NotFound(format!("Todo with ID {} not found", id))
}

/// List all todos
async fn list_todos(State(pool): State<PgPool>) -> Result<Json<Vec<Todo>>> {
    let todos = Todo::list_all(&pool)
        .await
        .map_err(store_error("list", None))?;

    Ok(Json(todos))
}

/// Create a todo
async fn create_todo(
    State(pool): State<PgPool>,
    payload: JsonBody<CreateTodoRequest>,
) -> Result<(StatusCode, Json<Todo>)> {
    let Json(req) = payload?;
    let data = req.validate()?;

    let todo = Todo::create(&pool, data)
        .await
        .map_err(store_error("create", None))?;

    tracing::info!(todo_id = todo.id, "Todo created");

    Ok((StatusCode::CREATED, Json(todo)))
}

/// Update title and/or completion of a todo
async fn update_todo(
    State(pool): State<PgPool>,
    id: TodoId,
    payload: JsonBody<UpdateTodoRequest>,
) -> Result<Json<Todo>> {
    let Path(id) = id?;
    let Json(req) = payload?;
    let changes = req.validate()?;

    if changes.is_empty() {
        tracing::debug!(todo_id = id, "Empty update, refreshing timestamp only");
    }

    let todo = Todo::update(&pool, id, changes)
        .await
        .map_err(store_error("update", Some(id)))?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(todo_id = todo.id, completed = todo.completed, "Todo updated");

    Ok(Json(todo))
}

/// Delete a todo
async fn delete_todo(State(pool): State<PgPool>, id: TodoId) -> Result<StatusCode> {
    let Path(id) = id?;

    let deleted = Todo::delete(&pool, id)
        .await
        .map_err(store_error("delete", Some(id)))?;

    if !deleted {
        return Err(not_found(id));
    }

    tracing::info!(todo_id = id, "Todo deleted");

    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/:id", patch(update_todo).delete(delete_todo))
}
