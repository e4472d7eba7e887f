//! HTTP resource service for the `todos` collection.
//!
//! Six routes, each translated into one store call. The store handle is
//! acquired once at startup and shared read-only with every handler through
//! router state.

pub mod config;
pub mod error;
pub mod store;
pub mod types;

use std::{future::Future, sync::Arc};

use axum::{
    extract::{rejection::JsonRejection, FromRequestParts, Path, State},
    http::{request::Parts, StatusCode},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use error::ApiError;
pub use store::{MemoryStore, PgStore, StoreError, TodoStore};
pub use types::{CreateTodo, Message, Todo, TodoCount, UpdateTodo};

pub type Db = Arc<dyn TodoStore>;

/// Router backed by a fresh in-memory store.
pub fn app() -> Router {
    router(Arc::new(MemoryStore::default()))
}

pub fn router(db: Db) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/count", get(count_todos))
        .route(
            "/todos/{id}",
            get(get_todo).patch(update_todo).delete(delete_todo),
        )
        .with_state(db)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Serve until `shutdown` resolves, then release the store.
pub async fn run<F>(listener: TcpListener, db: Db, shutdown: F) -> Result<(), std::io::Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    let result = axum::serve(listener, router(db.clone()))
        .with_graceful_shutdown(shutdown)
        .await;
    db.close().await;
    result
}

/// Path id parsed as an integer. Anything non-numeric is rejected with 400
/// before a handler runs.
pub struct TodoId(pub i64);

impl<S> FromRequestParts<S> for TodoId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::InvalidId(rejection.body_text()))?;
        raw.trim()
            .parse::<i64>()
            .map(TodoId)
            .map_err(|_| ApiError::InvalidId(raw))
    }
}

fn validate_text(text: &str) -> Result<(), ApiError> {
    if text.trim().is_empty() {
        return Err(ApiError::Validation("text must not be empty".to_string()));
    }
    Ok(())
}

fn payload<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(input)| input)
        .map_err(|rejection| ApiError::Validation(rejection.body_text()))
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "todo-server"
    }))
}

async fn list_todos(State(db): State<Db>) -> Result<Json<Vec<Todo>>, ApiError> {
    Ok(Json(db.list().await?))
}

async fn count_todos(State(db): State<Db>) -> Result<Json<TodoCount>, ApiError> {
    let amount = db.count().await?;
    Ok(Json(TodoCount { amount }))
}

async fn get_todo(State(db): State<Db>, TodoId(id): TodoId) -> Result<Json<Todo>, ApiError> {
    db.get(id).await?.map(Json).ok_or(ApiError::NotFound)
}

async fn create_todo(
    State(db): State<Db>,
    input: Result<Json<CreateTodo>, JsonRejection>,
) -> Result<(StatusCode, Json<Todo>), ApiError> {
    let input = payload(input)?;
    validate_text(&input.text)?;

    let todo = db.create(&input.text).await?;
    tracing::debug!(id = todo.id, "created todo");
    Ok((StatusCode::CREATED, Json(todo)))
}

async fn update_todo(
    State(db): State<Db>,
    TodoId(id): TodoId,
    input: Result<Json<UpdateTodo>, JsonRejection>,
) -> Result<Json<Todo>, ApiError> {
    let input = payload(input)?;
    if let Some(text) = &input.text {
        validate_text(text)?;
    }

    let todo = db.update(id, &input).await?.ok_or(ApiError::NotFound)?;
    tracing::debug!(id, completed = todo.completed, "updated todo");
    Ok(Json(todo))
}

async fn delete_todo(State(db): State<Db>, TodoId(id): TodoId) -> Result<Json<Message>, ApiError> {
    if !db.delete(id).await? {
        return Err(ApiError::NotFound);
    }
    tracing::debug!(id, "deleted todo");
    Ok(Json(Message {
        message: "Todo deleted successfully".to_string(),
    }))
}
