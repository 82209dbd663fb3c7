//! In-process list server.
//!
//! Mirrors the list server's behavior closely enough to drive the store
//! without a network: new todos land on top, moves swap ranks with the
//! display neighbor, deletes of unknown ids answer 404 and unknown tokens
//! are rejected.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::debug;

use crate::io::service::{ListService, ServiceError};
use crate::model::session::SessionToken;
use crate::model::todo::{Direction, NewTodo, Todo, TodoId};
use crate::ops::ordering;

#[derive(Debug, Default)]
struct BackendState {
    /// Todos per list token, in insertion order
    lists: HashMap<SessionToken, Vec<Todo>>,
    next_id: u64,
    fail_next: Option<ServiceError>,
}

/// Shared server state. Cloning yields another handle to the same lists.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    state: Arc<Mutex<BackendState>>,
}

/// [`ListService`] for one list of a [`MemoryBackend`].
#[derive(Debug, Clone)]
pub struct MemoryListService {
    backend: MemoryBackend,
    token: SessionToken,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty list under a fresh random token.
    pub async fn create_list(&self) -> SessionToken {
        let mut state = self.state.lock().await;
        loop {
            let bytes: [u8; 16] = rand::random();
            let hex: String = bytes.iter().map(|b| format!("{:02x}", b)).collect();
            if let Ok(token) = SessionToken::parse(&hex) {
                if !state.lists.contains_key(&token) {
                    state.lists.insert(token.clone(), Vec::new());
                    return token;
                }
            }
        }
    }

    pub fn session(&self, token: SessionToken) -> MemoryListService {
        MemoryListService {
            backend: self.clone(),
            token,
        }
    }

    /// Make the next call, from any session, fail with `error`.
    pub async fn fail_next(&self, error: ServiceError) {
        self.state.lock().await.fail_next = Some(error);
    }

    /// The list as the server holds it, in display order.
    pub async fn snapshot(&self, token: &SessionToken) -> Option<Vec<Todo>> {
        let state = self.state.lock().await;
        state.lists.get(token).map(|todos| ordering::display_order(todos))
    }
}

impl BackendState {
    /// Resolve the list for `token`, consuming any injected failure first.
    fn list_mut(&mut self, token: &SessionToken) -> Result<&mut Vec<Todo>, ServiceError> {
        if let Some(error) = self.fail_next.take() {
            return Err(error);
        }
        self.lists.get_mut(token).ok_or(ServiceError::Unauthorized)
    }
}

fn not_found(status: u16) -> ServiceError {
    ServiceError::Status {
        status,
        message: "todo with given id not found".to_string(),
    }
}

/// Copy the client-editable fields onto the stored todo.
fn overwrite_fields(stored: &mut Todo, update: &Todo) {
    stored.name = update.name.clone();
    stored.text = update.text.clone();
    stored.done = update.done;
    stored.category = update.category.clone();
}

impl ListService for MemoryListService {
    async fn fetch_todos(&self) -> Result<Vec<Todo>, ServiceError> {
        let mut state = self.backend.state.lock().await;
        Ok(state.list_mut(&self.token)?.clone())
    }

    async fn create_todo(&self, new_todo: &NewTodo) -> Result<Todo, ServiceError> {
        let mut state = self.backend.state.lock().await;
        let id = state.next_id;
        let todos = state.list_mut(&self.token)?;
        let rank = todos.iter().map(|t| t.rank).max().map_or(1, |max| max + 1);
        let todo = Todo {
            id: TodoId::Number(id),
            name: new_todo.name.clone(),
            text: new_todo.text.clone(),
            done: new_todo.done,
            category: new_todo.category.clone(),
            rank,
        };
        todos.push(todo.clone());
        state.next_id += 1;
        debug!(id = %todo.id, rank, "memory backend created todo");
        Ok(todo)
    }

    async fn update_todo(&self, todo: &Todo) -> Result<Todo, ServiceError> {
        let mut state = self.backend.state.lock().await;
        let todos = state.list_mut(&self.token)?;
        let stored = todos
            .iter_mut()
            .find(|t| t.id == todo.id)
            .ok_or_else(|| not_found(400))?;
        overwrite_fields(stored, todo);
        Ok(stored.clone())
    }

    async fn move_todo(&self, todo: &Todo, direction: Direction) -> Result<Todo, ServiceError> {
        let mut state = self.backend.state.lock().await;
        let todos = state.list_mut(&self.token)?;
        let stored_idx = todos
            .iter()
            .position(|t| t.id == todo.id)
            .ok_or_else(|| not_found(400))?;
        overwrite_fields(&mut todos[stored_idx], todo);

        let order = ordering::display_order(todos);
        let display_idx = ordering::position_of(&order, &todo.id).ok_or_else(|| not_found(400))?;
        if let Some(neighbor_idx) = ordering::neighbor_index(order.len(), display_idx, direction) {
            let neighbor_id = order[neighbor_idx].id.clone();
            let moved_rank = order[display_idx].rank;
            let neighbor_rank = order[neighbor_idx].rank;
            for stored in todos.iter_mut() {
                if stored.id == todo.id {
                    stored.rank = neighbor_rank;
                } else if stored.id == neighbor_id {
                    stored.rank = moved_rank;
                }
            }
        }
        Ok(todos[stored_idx].clone())
    }

    async fn delete_todo(&self, id: &TodoId) -> Result<(), ServiceError> {
        let mut state = self.backend.state.lock().await;
        let todos = state.list_mut(&self.token)?;
        let idx = todos
            .iter()
            .position(|t| &t.id == id)
            .ok_or_else(|| not_found(404))?;
        todos.remove(idx);
        Ok(())
    }
}
