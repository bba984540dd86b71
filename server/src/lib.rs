//! Todo REST service.
//!
//! # Overview
//! Five operations over a single `Todo` entity (list, get, create, update,
//! delete) plus a liveness probe. Every response body is an [`Envelope`].
//!
//! # Design
//! - The persistence backend is a [`TodoStore`] handle injected into
//!   [`app`]; nothing is cached between requests.
//! - Request bodies are all-optional structs validated into `NewTodo` /
//!   `TodoPatch`, so an absent field is never confused with `false` or `""`.
//! - Every failure, including panics below the router, is rendered as a
//!   failure envelope by [`ApiError`].

pub mod api;
pub mod config;
pub mod envelope;
pub mod error;
pub mod logging;
pub mod model;
pub mod store;

use std::future::Future;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;

pub use api::AppState;
pub use config::{Config, ConfigError};
pub use envelope::Envelope;
pub use error::ApiError;
pub use model::{CreateTodo, NewTodo, Todo, TodoPatch, UpdateTodo};
pub use store::{FileStore, MemoryStore, StoreError, TodoStore};

/// The full router backed by `store`.
pub fn app(store: Arc<dyn TodoStore>) -> Router {
    api::router(store)
}

/// Serve until the listener fails.
pub async fn run(listener: TcpListener, store: Arc<dyn TodoStore>) -> Result<(), std::io::Error> {
    axum::serve(listener, app(store)).await
}

/// Serve until `shutdown` resolves, then drain in-flight requests.
pub async fn run_until(
    listener: TcpListener,
    store: Arc<dyn TodoStore>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), std::io::Error> {
    axum::serve(listener, app(store))
        .with_graceful_shutdown(shutdown)
        .await
}

/// Open the store selected by `config`.
pub async fn open_store(config: &Config) -> Result<Arc<dyn TodoStore>, StoreError> {
    let store: Arc<dyn TodoStore> = match &config.data_file {
        Some(path) => Arc::new(FileStore::open(path.clone()).await?),
        None => Arc::new(MemoryStore::new()),
    };
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn open_store_follows_data_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("todos.json");
        let config = Config {
            data_file: Some(path.clone()),
            ..Config::from_lookup(|_| None).unwrap()
        };

        let store = open_store(&config).await.unwrap();
        store
            .insert(NewTodo {
                title: "persisted".to_string(),
                description: String::new(),
            })
            .await
            .unwrap();
        assert!(path.exists());

        let memory = open_store(&Config::from_lookup(|_| None).unwrap()).await.unwrap();
        assert!(memory.list().await.unwrap().is_empty());
    }
}
