use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

use crate::models::todo::{Todo, UpdateTodoRequest};

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Server responded {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Status {
        status: StatusCode,
        message: Option<String>,
    },
}

impl ClientError {
    /// Text suitable for showing to a user, falling back to `context` plus the status.
    pub fn user_message(&self, context: &str) -> String {
        match self {
            ClientError::Status {
                message: Some(message),
                ..
            } => message.clone(),
            ClientError::Status {
                status,
                message: None,
            } => format!("{}: {}", context, status.as_u16()),
            ClientError::HttpError(e) => format!("{}: {}", context, e),
        }
    }
}

/// Operations the todo view needs from the server
#[allow(async_fn_in_trait)]
pub trait TodoApi {
    async fn list(&self) -> Result<Vec<Todo>, ClientError>;
    async fn create(&self, title: &str) -> Result<Todo, ClientError>;
    async fn update(&self, id: i32, changes: &UpdateTodoRequest) -> Result<Todo, ClientError>;
    async fn delete(&self, id: i32) -> Result<(), ClientError>;
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// `TodoApi` over HTTP with reqwest
#[derive(Debug, Clone)]
pub struct HttpTodoApi {
    client: Client,
    base_url: String,
}

impl HttpTodoApi {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn todos_url(&self) -> String {
        format!("{}/api/todos", self.base_url)
    }

    fn todo_url(&self, id: i32) -> String {
        format!("{}/api/todos/{}", self.base_url, id)
    }
}

/// Pass successful responses through, turn the rest into `ClientError::Status`
async fn check(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.message);

    tracing::debug!(status = %status, message = ?message, "Todo API request failed");

    Err(ClientError::Status { status, message })
}

impl TodoApi for HttpTodoApi {
    async fn list(&self) -> Result<Vec<Todo>, ClientError> {
        let response = self.client.get(self.todos_url()).send().await?;
        Ok(check(response).await?.json().await?)
    }

    async fn create(&self, title: &str) -> Result<Todo, ClientError> {
        let response = self
            .client
            .post(self.todos_url())
            .json(&json!({ "title": title }))
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    async fn update(&self, id: i32, changes: &UpdateTodoRequest) -> Result<Todo, ClientError> {
        let response = self
            .client
            .patch(self.todo_url(id))
            .json(changes)
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    async fn delete(&self, id: i32) -> Result<(), ClientError> {
        let response = self.client.delete(self.todo_url(id)).send().await?;
        check(response).await?;
        Ok(())
    }
}
