use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::collection::Collection;
use super::{StoreError, TodoStore};
use crate::model::{NewTodo, Todo, TodoPatch};

/// Process-local store. Cloning shares the same collection.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    collection: Arc<RwLock<Collection>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TodoStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Todo>, StoreError> {
        Ok(self.collection.read().await.list())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Todo>, StoreError> {
        Ok(self.collection.read().await.get(&id))
    }

    async fn insert(&self, new: NewTodo) -> Result<Todo, StoreError> {
        Ok(self.collection.write().await.insert(new))
    }

    async fn update(&self, id: Uuid, patch: TodoPatch) -> Result<Option<Todo>, StoreError> {
        Ok(self.collection.write().await.update(&id, &patch))
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Todo>, StoreError> {
        Ok(self.collection.write().await.delete(&id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn clones_share_state() {
        let store = MemoryStore::new();
        let other = store.clone();
        let todo = store
            .insert(NewTodo {
                title: "shared".to_string(),
                description: String::new(),
            })
            .await
            .unwrap();
        assert_eq!(other.get(todo.id).await.unwrap(), Some(todo));
    }

    #[tokio::test]
    async fn update_returns_patched_record() {
        let store = MemoryStore::new();
        let todo = store
            .insert(NewTodo {
                title: "t".to_string(),
                description: "d".to_string(),
            })
            .await
            .unwrap();
        let patch = TodoPatch {
            completed: Some(true),
            ..TodoPatch::default()
        };
        let updated = store.update(todo.id, patch).await.unwrap().unwrap();
        assert!(updated.completed);
        assert_eq!(updated.title, "t");
        assert_eq!(updated.description, "d");
        assert_eq!(updated.created_at, todo.created_at);
    }
}
