//! Router and request handlers for the todo API.

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use tracing::{debug, error};
use uuid::Uuid;

use crate::envelope::Envelope;
use crate::error::ApiError;
use crate::model::{CreateTodo, Todo, UpdateTodo};
use crate::store::TodoStore;

/// Shared handler state: the injected store handle.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TodoStore>,
}

pub fn router(store: Arc<dyn TodoStore>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/{id}", get(get_todo).put(update_todo).delete(delete_todo))
        .fallback(route_not_found)
        .method_not_allowed_fallback(route_not_found)
        .layer(middleware::from_fn(catch_panics))
        .with_state(AppState { store })
}

/// Ids that do not parse can never resolve, so they are reported as missing.
fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound)
}

/// Path segments that cannot even be extracted (e.g. invalid UTF-8) are
/// reported as missing too.
fn todo_id(path: Result<Path<String>, PathRejection>) -> Result<Uuid, ApiError> {
    let Path(raw) = path.map_err(|_| ApiError::NotFound)?;
    parse_id(&raw)
}

fn decode<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

async fn list_todos(
    State(state): State<AppState>,
) -> Result<Json<Envelope<Vec<Todo>>>, ApiError> {
    let todos = state.store.list().await?;
    Ok(Json(Envelope::list(todos)))
}

async fn get_todo(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<Envelope<Todo>>, ApiError> {
    let id = todo_id(path)?;
    let todo = state.store.get(id).await?.ok_or(ApiError::NotFound)?;
    Ok(Json(Envelope::data(todo)))
}

async fn create_todo(
    State(state): State<AppState>,
    payload: Result<Json<CreateTodo>, JsonRejection>,
) -> Result<(StatusCode, Json<Envelope<Todo>>), ApiError> {
    let new = decode(payload)?.validate()?;
    let todo = state.store.insert(new).await?;
    debug!(id = %todo.id, "todo created");
    Ok((StatusCode::CREATED, Json(Envelope::data(todo))))
}

async fn update_todo(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    payload: Result<Json<UpdateTodo>, JsonRejection>,
) -> Result<Json<Envelope<Todo>>, ApiError> {
    let id = todo_id(path)?;
    let patch = decode(payload)?.validate()?;
    let todo = state
        .store
        .update(id, patch)
        .await?
        .ok_or(ApiError::NotFound)?;
    debug!(%id, "todo updated");
    Ok(Json(Envelope::data(todo)))
}

async fn delete_todo(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<Envelope<Todo>>, ApiError> {
    let id = todo_id(path)?;
    let todo = state.store.delete(id).await?.ok_or(ApiError::NotFound)?;
    debug!(%id, "todo deleted");
    Ok(Json(Envelope::data(todo).with_message("Todo deleted successfully")))
}

#[derive(Serialize)]
struct Health {
    status: &'static str,
    message: &'static str,
    timestamp: String,
    version: &'static str,
}

async fn health() -> Json<Health> {
    Json(Health {
        status: "OK",
        message: "Backend is running",
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn route_not_found() -> ApiError {
    ApiError::RouteNotFound
}

/// Runs the rest of the stack on its own task so a panic anywhere below
/// becomes a 500 envelope instead of a dropped connection.
async fn catch_panics(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    match tokio::spawn(next.run(req)).await {
        Ok(response) => response,
        Err(join_error) => {
            error!(%method, %uri, error = %join_error, "handler aborted");
            ApiError::Internal.into_response()
        }
    }
}
