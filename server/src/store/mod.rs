//! Persistence backends for todo documents.
//!
//! The API layer only ever talks to a `TodoStore` handle injected at router
//! construction. Absence of a record is reported as `None`; `StoreError` is
//! reserved for failures of the backend itself.

mod collection;
mod file;
mod memory;

use async_trait::async_trait;
use uuid::Uuid;

use crate::model::{NewTodo, Todo, TodoPatch};

pub use file::FileStore;
pub use memory::MemoryStore;

/// Failures of the persistence backend, unrelated to request input.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("{0}")]
    Persistence(String),
}

/// Create/read/update/delete access to the todo collection.
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// All todos, newest `created_at` first.
    async fn list(&self) -> Result<Vec<Todo>, StoreError>;

    async fn get(&self, id: Uuid) -> Result<Option<Todo>, StoreError>;

    /// Persist a new todo, assigning `id`, `created_at` and `completed = false`.
    async fn insert(&self, new: NewTodo) -> Result<Todo, StoreError>;

    /// Apply `patch` and return the updated record, or `None` if `id` is unknown.
    async fn update(&self, id: Uuid, patch: TodoPatch) -> Result<Option<Todo>, StoreError>;

    /// Remove the record and return its last content, or `None` if `id` is unknown.
    async fn delete(&self, id: Uuid) -> Result<Option<Todo>, StoreError>;
}
