use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use crate::error::AppError;

pub const TITLE_MAX_CHARS: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: i32,
    pub title: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Raw body of `POST /todos`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateTodoRequest {
    pub title: String,
}

/// Raw body of `PATCH /todos/:id`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateTodoRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub title: String,
}

/// Validated partial update. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoChanges {
    pub title: Option<String>,
    pub completed: Option<bool>,
}

impl TodoChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.completed.is_none()
    }
}

impl CreateTodoRequest {
    pub fn validate(self) -> Result<NewTodo, AppError> {
        Ok(NewTodo {
            title: validate_title(&self.title)?,
        })
    }
}

impl UpdateTodoRequest {
    pub fn validate(self) -> Result<TodoChanges, AppError> {
        let title = self.title.as_deref().map(validate_title).transpose()?;

        Ok(TodoChanges {
            title,
            completed: self.completed,
        })
    }
}

/// Strips control characters and surrounding whitespace.
pub fn sanitize_title(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_control())
        .collect::<String>()
        .trim()
        .to_string()
}

pub fn validate_title(raw: &str) -> Result<String, AppError> {
    let title = sanitize_title(raw);

    if title.is_empty() {
        return Err(AppError::Validation("Title cannot be empty".to_string()));
    }
    if title.chars().count() > TITLE_MAX_CHARS {
        return Err(AppError::Validation(format!(
            "Title cannot exceed {} characters",
            TITLE_MAX_CHARS
        )));
    }

    Ok(title)
}

impl Todo {
    /// List every todo, oldest first
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let todos = sqlx::query_as::<_, Todo>(
            r#"
            SELECT * FROM todos
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(todos)
    }

    /// Insert a todo. Both timestamps come from the same `NOW()`.
    /// An insert that returns no row surfaces as `RowNotFound`.
    pub async fn create(pool: &PgPool, data: NewTodo) -> Result<Self, sqlx::Error> {
        let todo = sqlx::query_as::<_, Todo>(
            r#"
            INSERT INTO todos (title)
            VALUES ($1)
            RETURNING *
            "#,
        )
        .bind(data.title)
        .fetch_optional(pool)
        .await?;

        todo.ok_or(sqlx::Error::RowNotFound)
    }

    /// Apply a partial update, returning `None` when no row has this id
    pub async fn update(
        pool: &PgPool,
        id: i32,
        changes: TodoChanges,
    ) -> Result<Option<Self>, sqlx::Error> {
        let todo = sqlx::query_as::<_, Todo>(
            r#"
            UPDATE todos
            SET title = COALESCE($1, title),
                completed = COALESCE($2, completed),
                updated_at = NOW()
            WHERE id = $3
            RETURNING *
            "#,
        )
        .bind(changes.title)
        .bind(changes.completed)
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(todo)
    }

    /// Delete a todo, returning whether a row was removed
    pub async fn delete(pool: &PgPool, id: i32) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM todos WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
