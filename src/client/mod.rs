// Client module - consumers of the JSON API

pub mod api;
pub mod view;

pub use api::{ClientError, HttpTodoApi, TodoApi};
pub use view::TodoListView;
