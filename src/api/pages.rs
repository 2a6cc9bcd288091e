use askama::Template;
use axum::{extract::State, routing::get, Router};
use sqlx::PgPool;

use crate::api::AppState;
use crate::models::todo::{Todo, TITLE_MAX_CHARS};

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    todos: Vec<Todo>,
    completed_count: usize,
    title_max: usize,
    error: Option<String>,
}

/// Client page. The list is rendered server-side and then owned by `app.js`.
async fn index(State(pool): State<PgPool>) -> IndexTemplate {
    let (todos, error) = match Todo::list_all(&pool).await {
        Ok(todos) => (todos, None),
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch todos for page");
            (Vec::new(), Some("Failed to fetch todos".to_string()))
        }
    };

    IndexTemplate {
        completed_count: todos.iter().filter(|t| t.completed).count(),
        todos,
        title_max: TITLE_MAX_CHARS,
        error,
    }
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(index))
}
