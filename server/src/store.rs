//! Persistence for the `todos` collection.
//!
//! # Design
//! Handlers only see `Arc<dyn TodoStore>`. Every method maps to a single
//! statement against the backing store, so there are no multi-step
//! transactions to coordinate. A missing row is reported as `Ok(None)` or
//! `Ok(false)`; `Err` is reserved for faults in the store itself.

use std::collections::BTreeMap;

use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;
use tokio::sync::RwLock;

use crate::types::{Todo, UpdateTodo};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;

#[async_trait]
pub trait TodoStore: Send + Sync {
    /// All todos in ascending id order.
    async fn list(&self) -> Result<Vec<Todo>>;

    async fn count(&self) -> Result<i64>;

    async fn get(&self, id: i64) -> Result<Option<Todo>>;

    /// Insert a new row. `completed` always starts out `false`.
    async fn create(&self, text: &str) -> Result<Todo>;

    /// Merge the supplied fields into the stored row; `None` fields keep
    /// their current value.
    async fn update(&self, id: i64, patch: &UpdateTodo) -> Result<Option<Todo>>;

    /// Returns `false` when no row had this id.
    async fn delete(&self, id: i64) -> Result<bool>;

    /// Release the underlying connections.
    async fn close(&self) {}
}

// ---------------------------------------------------------------------------
// Postgres
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        tracing::info!("connected to PostgreSQL database");
        Ok(Self { pool })
    }

    pub async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS todos (
                id BIGSERIAL PRIMARY KEY,
                text TEXT NOT NULL,
                completed BOOLEAN NOT NULL DEFAULT FALSE
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl TodoStore for PgStore {
    async fn list(&self) -> Result<Vec<Todo>> {
        let todos = sqlx::query_as::<_, Todo>("SELECT id, text, completed FROM todos ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(todos)
    }

    async fn count(&self) -> Result<i64> {
        let amount: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM todos")
            .fetch_one(&self.pool)
            .await?;
        Ok(amount)
    }

    async fn get(&self, id: i64) -> Result<Option<Todo>> {
        let todo = sqlx::query_as::<_, Todo>("SELECT id, text, completed FROM todos WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(todo)
    }

    async fn create(&self, text: &str) -> Result<Todo> {
        let todo = sqlx::query_as::<_, Todo>(
            "INSERT INTO todos (text, completed) VALUES ($1, FALSE) RETURNING id, text, completed",
        )
        .bind(text)
        .fetch_one(&self.pool)
        .await?;
        Ok(todo)
    }

    async fn update(&self, id: i64, patch: &UpdateTodo) -> Result<Option<Todo>> {
        let todo = sqlx::query_as::<_, Todo>(
            r#"
            UPDATE todos
            SET text = COALESCE($1, text), completed = COALESCE($2, completed)
            WHERE id = $3
            RETURNING id, text, completed
            "#,
        )
        .bind(patch.text.as_deref())
        .bind(patch.completed)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(todo)
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM todos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

// ---------------------------------------------------------------------------
// In-memory
// ---------------------------------------------------------------------------

/// Process-local store. Ids start at 1 and are never reused, matching a
/// serial column.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    last_id: i64,
    todos: BTreeMap<i64, Todo>,
}

#[async_trait]
impl TodoStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Todo>> {
        let state = self.inner.read().await;
        Ok(state.todos.values().cloned().collect())
    }

    async fn count(&self) -> Result<i64> {
        let state = self.inner.read().await;
        Ok(state.todos.len() as i64)
    }

    async fn get(&self, id: i64) -> Result<Option<Todo>> {
        let state = self.inner.read().await;
        Ok(state.todos.get(&id).cloned())
    }

    async fn create(&self, text: &str) -> Result<Todo> {
        let mut state = self.inner.write().await;
        state.last_id += 1;
        let todo = Todo {
            id: state.last_id,
            text: text.to_string(),
            completed: false,
        };
        state.todos.insert(todo.id, todo.clone());
        Ok(todo)
    }

    async fn update(&self, id: i64, patch: &UpdateTodo) -> Result<Option<Todo>> {
        let mut state = self.inner.write().await;
        let Some(todo) = state.todos.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(text) = &patch.text {
            todo.text = text.clone();
        }
        if let Some(completed) = patch.completed {
            todo.completed = completed;
        }
        Ok(Some(todo.clone()))
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let mut state = self.inner.write().await;
        Ok(state.todos.remove(&id).is_some())
    }
}
