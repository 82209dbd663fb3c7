//! Interface to the remote list service.
//!
//! The store talks to the server only through [`ListService`], so the HTTP
//! client and the in-process backend are interchangeable.

use std::future::Future;

use crate::model::todo::{Direction, NewTodo, Todo, TodoId};

/// Error type for remote list service calls
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("the server rejected the list token")]
    Unauthorized,
    #[error("server answered {status}: {message}")]
    Status { status: u16, message: String },
    #[error("could not decode server response: {0}")]
    Decode(String),
    #[error("server returned no todo")]
    EmptyResponse,
}

impl ServiceError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ServiceError::Status { status: 404, .. })
    }
}

/// CRUD and reorder calls for the todos of one list.
///
/// Every mutating call returns the server's canonical entity, which
/// replaces whatever the client held before.
pub trait ListService: Send + Sync {
    /// All todos of the list, in no particular order.
    fn fetch_todos(&self) -> impl Future<Output = Result<Vec<Todo>, ServiceError>> + Send;

    fn create_todo(
        &self,
        new_todo: &NewTodo,
    ) -> impl Future<Output = Result<Todo, ServiceError>> + Send;

    /// Send the full entity; the server answers with its canonical copy.
    fn update_todo(&self, todo: &Todo) -> impl Future<Output = Result<Todo, ServiceError>> + Send;

    /// Ask the server to move `todo` one step; it returns the moved todo
    /// with its recomputed rank.
    fn move_todo(
        &self,
        todo: &Todo,
        direction: Direction,
    ) -> impl Future<Output = Result<Todo, ServiceError>> + Send;

    fn delete_todo(&self, id: &TodoId) -> impl Future<Output = Result<(), ServiceError>> + Send;
}
