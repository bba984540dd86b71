use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::collection::Collection;
use super::{StoreError, TodoStore};
use crate::model::{NewTodo, Todo, TodoPatch};

/// Store backed by a JSON document file.
///
/// The whole collection is rewritten on every mutation: the snapshot goes to
/// a temporary sibling file which is then renamed over the target. The
/// in-memory collection is only replaced once the write has succeeded.
#[derive(Clone, Debug)]
pub struct FileStore {
    collection: Arc<RwLock<Collection>>,
    path: PathBuf,
}

impl FileStore {
    /// Open `path`, starting empty if the file does not exist yet.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let documents = match tokio::fs::read(&path).await {
            Ok(raw) => serde_json::from_slice::<Vec<Todo>>(&raw).map_err(|e| {
                StoreError::Unavailable(format!("failed to parse {}: {e}", path.display()))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                return Err(StoreError::Unavailable(format!(
                    "failed to read {}: {e}",
                    path.display()
                )))
            }
        };

        let collection = Collection::from_documents(documents);
        info!(path = %path.display(), documents = collection.len(), "todo store opened");
        Ok(Self {
            collection: Arc::new(RwLock::new(collection)),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run `f` against a copy of the collection, persist the copy, then swap
    /// it in. The write lock is held across the write so snapshots are
    /// never interleaved.
    async fn mutate<T>(&self, f: impl FnOnce(&mut Collection) -> T) -> Result<T, StoreError> {
        let mut guard = self.collection.write().await;
        let mut next = guard.clone();
        let out = f(&mut next);
        self.persist(&next).await?;
        *guard = next;
        Ok(out)
    }

    async fn persist(&self, collection: &Collection) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                StoreError::Persistence(format!("failed to prepare store directory: {e}"))
            })?;
        }

        let payload = serde_json::to_vec_pretty(&collection.documents())
            .map_err(|e| StoreError::Persistence(format!("failed to encode todos: {e}")))?;

        let temp_path = self
            .path
            .with_extension(format!("{}.tmp", Uuid::new_v4().simple()));
        let written = match tokio::fs::write(&temp_path, payload).await {
            Ok(()) => tokio::fs::rename(&temp_path, &self.path)
                .await
                .map_err(|e| StoreError::Persistence(format!("failed to finalize todos: {e}"))),
            Err(e) => Err(StoreError::Persistence(format!("failed to write todos: {e}"))),
        };
        if let Err(err) = written {
            discard_temp(&temp_path).await;
            return Err(err);
        }

        debug!(path = %self.path.display(), documents = collection.len(), "todo store persisted");
        Ok(())
    }
}

/// Best-effort removal of a snapshot that never made it into place.
async fn discard_temp(temp_path: &Path) {
    match tokio::fs::remove_file(temp_path).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %temp_path.display(), error = %e, "failed to remove temp snapshot"),
    }
}

#[async_trait]
impl TodoStore for FileStore {
    async fn list(&self) -> Result<Vec<Todo>, StoreError> {
        Ok(self.collection.read().await.list())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Todo>, StoreError> {
        Ok(self.collection.read().await.get(&id))
    }

    async fn insert(&self, new: NewTodo) -> Result<Todo, StoreError> {
        self.mutate(|c| c.insert(new)).await
    }

    async fn update(&self, id: Uuid, patch: TodoPatch) -> Result<Option<Todo>, StoreError> {
        if self.collection.read().await.get(&id).is_none() {
            return Ok(None);
        }
        self.mutate(|c| c.update(&id, &patch)).await
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Todo>, StoreError> {
        if self.collection.read().await.get(&id).is_none() {
            return Ok(None);
        }
        self.mutate(|c| c.delete(&id)).await
    }
}
