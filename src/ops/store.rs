//! The list state store.
//!
//! Holds the todos of the current list in display order and routes every
//! change through the [`ListService`]. Local state only changes after the
//! server has answered; on any error the collection is left exactly as it
//! was before the call.

use tracing::{debug, warn};

use crate::io::service::{ListService, ServiceError};
use crate::model::todo::{Direction, NewTodo, Todo, TodoId, TodoPatch};
use crate::ops::ordering;

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error("server returned todo {got} in answer to a change of {expected}")]
    IdMismatch { expected: TodoId, got: TodoId },
    #[error("server returned todo {0}, which is already in the list")]
    DuplicateId(TodoId),
}

/// Ordered todos of one list, kept in step with the server.
pub struct TodoStore<S> {
    service: S,
    todos: Vec<Todo>,
}

impl<S: ListService> TodoStore<S> {
    pub fn new(service: S) -> Self {
        TodoStore {
            service,
            todos: Vec::new(),
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// The todos in display order.
    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn get(&self, id: &TodoId) -> Option<&Todo> {
        self.todos.iter().find(|t| &t.id == id)
    }

    /// The todo whose id reads as `input`. Ids are matched by their text
    /// form, so `"12"` finds both a numeric and a string id.
    pub fn find_by_input(&self, input: &str) -> Option<&Todo> {
        let input = input.trim();
        self.todos.iter().find(|t| t.id.to_string() == input)
    }

    pub fn len(&self) -> usize {
        self.todos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }

    // -----------------------------------------------------------------------
    // Operations
    // -----------------------------------------------------------------------

    /// Replace the collection with the server's list, sorted by rank.
    /// Returns the number of todos held.
    pub async fn load(&mut self) -> Result<usize, StoreError> {
        let mut todos = self.service.fetch_todos().await?;
        let dropped = ordering::dedup_by_id(&mut todos);
        if dropped > 0 {
            warn!(dropped, "server list repeated todo ids; kept the first of each");
        }
        ordering::sort_by_rank(&mut todos);
        self.todos = todos;
        debug!(count = self.todos.len(), "loaded list");
        Ok(self.todos.len())
    }

    /// Create a todo. The server's entity goes in ahead of every todo of
    /// equal or lower rank. The server lists the newest todo first among
    /// equal ranks, so this is the order the next `load` produces.
    pub async fn add(&mut self, new_todo: NewTodo) -> Result<Todo, StoreError> {
        let created = self.service.create_todo(&new_todo).await?;
        if self.get(&created.id).is_some() {
            return Err(StoreError::DuplicateId(created.id));
        }
        let idx = ordering::insertion_index(&self.todos, created.rank);
        debug!(id = %created.id, rank = created.rank, idx, "added todo");
        self.todos.insert(idx, created.clone());
        Ok(created)
    }

    /// Apply `patch` to the todo with `id` ("edit" and "mark").
    ///
    /// The patch is applied to a copy that is sent to the server; the
    /// server's answer then replaces the local todo in place. Returns
    /// `Ok(None)` without a request when `id` is not held.
    pub async fn update(
        &mut self,
        id: &TodoId,
        patch: TodoPatch,
    ) -> Result<Option<Todo>, StoreError> {
        let Some(current) = self.get(id) else {
            debug!(%id, "update of unknown todo ignored");
            return Ok(None);
        };
        let candidate = patch.apply_to(current);
        let canonical = self.service.update_todo(&candidate).await?;
        self.replace(id, canonical).map(Some)
    }

    /// Flip the done flag of the todo with `id`.
    pub async fn toggle(&mut self, id: &TodoId) -> Result<Option<Todo>, StoreError> {
        let Some(current) = self.get(id) else {
            debug!(%id, "toggle of unknown todo ignored");
            return Ok(None);
        };
        let patch = TodoPatch {
            done: Some(!current.done),
            ..Default::default()
        };
        self.update(id, patch).await
    }

    /// Delete the todo with `id`. The local copy goes once the server has
    /// confirmed; a 404 counts as confirmation. Returns whether a todo was
    /// removed locally.
    pub async fn remove(&mut self, id: &TodoId) -> Result<bool, StoreError> {
        if self.get(id).is_none() {
            debug!(%id, "remove of unknown todo ignored");
            return Ok(false);
        }
        match self.service.delete_todo(id).await {
            Ok(()) => {}
            Err(e) if e.is_not_found() => {
                debug!(%id, "server no longer had todo");
            }
            Err(e) => return Err(e.into()),
        }
        self.todos.retain(|t| &t.id != id);
        Ok(true)
    }

    /// Move the todo with `id` one step up or down.
    ///
    /// The server recomputes the moved todo's rank. Locally the moved todo
    /// and its neighbor swap positions, and the neighbor keeps its previous
    /// copy: the resulting order comes from the swap, not from a re-sort.
    pub async fn move_todo(
        &mut self,
        id: &TodoId,
        direction: Direction,
    ) -> Result<Option<Todo>, StoreError> {
        let Some(idx) = ordering::position_of(&self.todos, id) else {
            debug!(%id, "move of unknown todo ignored");
            return Ok(None);
        };
        let neighbor = ordering::neighbor_index(self.todos.len(), idx, direction);
        let moved = self.service.move_todo(&self.todos[idx], direction).await?;
        if &moved.id != id {
            return Err(StoreError::IdMismatch {
                expected: id.clone(),
                got: moved.id,
            });
        }
        debug!(%id, %direction, rank = moved.rank, swapped = neighbor.is_some(), "moved todo");
        ordering::splice_moved(&mut self.todos, idx, neighbor, moved.clone());
        Ok(Some(moved))
    }

    fn replace(&mut self, id: &TodoId, canonical: Todo) -> Result<Todo, StoreError> {
        if &canonical.id != id {
            return Err(StoreError::IdMismatch {
                expected: id.clone(),
                got: canonical.id,
            });
        }
        if let Some(slot) = self.todos.iter_mut().find(|t| &t.id == id) {
            *slot = canonical.clone();
        }
        Ok(canonical)
    }
}
