use crate::client::api::{ClientError, TodoApi};
use crate::models::todo::{Todo, UpdateTodoRequest};

/// Local mirror of the server's todo list.
///
/// Rows only ever enter or change from server responses, so ids and
/// timestamps never drift from the store. A failed request records one
/// dismissible message and leaves the list as it was. Nothing is retried.
#[derive(Debug)]
pub struct TodoListView<A> {
    api: A,
    todos: Vec<Todo>,
    loading: bool,
    submitting: bool,
    error: Option<String>,
}

impl<A: TodoApi> TodoListView<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            todos: Vec::new(),
            loading: true,
            submitting: false,
            error: None,
        }
    }

    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    pub fn completed_count(&self) -> usize {
        self.todos.iter().filter(|t| t.completed).count()
    }

    fn fail(&mut self, context: &str, err: ClientError) {
        tracing::error!(error = %err, "{}", context);
        self.error = Some(err.user_message(context));
    }

    /// Replace the local list with the server's
    pub async fn load(&mut self) {
        self.error = None;
        match self.api.list().await {
            Ok(todos) => self.todos = todos,
            Err(e) => self.fail("Failed to fetch todos", e),
        }
        self.loading = false;
    }

    /// Post a new title and append the row the server returns.
    /// Returns whether a todo was created; blank input is ignored without a request.
    pub async fn submit(&mut self, input: &str) -> bool {
        let title = input.trim();
        if title.is_empty() || self.submitting {
            return false;
        }

        self.submitting = true;
        self.error = None;

        let created = match self.api.create(title).await {
            Ok(todo) => {
                self.todos.push(todo);
                true
            }
            Err(e) => {
                self.fail("Failed to create todo", e);
                false
            }
        };

        self.submitting = false;
        created
    }

    /// Flip completion, then swap in the server's copy of the row
    pub async fn toggle(&mut self, id: i32) {
        let Some(current) = self.todos.iter().find(|t| t.id == id) else {
            return;
        };

        let changes = UpdateTodoRequest {
            title: None,
            completed: Some(!current.completed),
        };

        self.error = None;
        match self.api.update(id, &changes).await {
            Ok(updated) => {
                if let Some(slot) = self.todos.iter_mut().find(|t| t.id == id) {
                    *slot = updated;
                }
            }
            Err(e) => self.fail("Failed to update todo", e),
        }
    }

    /// Drop the row once the server confirms the delete
    pub async fn remove(&mut self, id: i32) {
        self.error = None;
        match self.api.delete(id).await {
            Ok(()) => self.todos.retain(|t| t.id != id),
            Err(e) => self.fail("Failed to delete todo", e),
        }
    }
}
