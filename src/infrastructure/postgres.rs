//! `PostgreSQL` task store.
//!
//! `PostgreSQL` is used as a document store: each task is one JSONB document
//! keyed by its UUID. A sequence column records insertion order for listing.
//!
//! # Table Schema
//!
//! ```sql
//! CREATE TABLE IF NOT EXISTS tasks (
//!     seq BIGSERIAL NOT NULL,
//!     id UUID PRIMARY KEY,
//!     data JSONB NOT NULL,
//!     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
//! );
//! CREATE INDEX IF NOT EXISTS idx_tasks_seq ON tasks(seq);
//! ```

use futures::FutureExt;
use futures::future::BoxFuture;
use serde_json::{Map, Value};
use sqlx::PgPool;

use crate::domain::{Task, TaskId, TaskPatch, Timestamp};
use crate::infrastructure::{RepositoryError, RepositoryResult, TaskRepository};

const CREATE_TASKS_TABLE: &str = "CREATE TABLE IF NOT EXISTS tasks (\
     seq BIGSERIAL NOT NULL, \
     id UUID PRIMARY KEY, \
     data JSONB NOT NULL, \
     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(), \
     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW())";

const CREATE_TASKS_SEQ_INDEX: &str = "CREATE INDEX IF NOT EXISTS idx_tasks_seq ON tasks(seq)";

fn database_error(error: &sqlx::Error) -> RepositoryError {
    RepositoryError::DatabaseError(error.to_string())
}

fn decode_task(data: Value) -> RepositoryResult<Task> {
    serde_json::from_value(data)
        .map_err(|error| RepositoryError::SerializationError(error.to_string()))
}

/// Builds the JSONB object merged into the stored document by an update.
///
/// Keys match the serialized field names of [`Task`]. `updated_at` is
/// always included.
fn patch_document(patch: &TaskPatch, now: &Timestamp) -> RepositoryResult<Value> {
    let mut document = Map::new();
    if let Some(title) = &patch.title {
        document.insert("title".to_string(), Value::String(title.clone()));
    }
    if let Some(completed) = patch.completed {
        document.insert("completed".to_string(), Value::Bool(completed));
    }
    let updated_at = serde_json::to_value(now)
        .map_err(|error| RepositoryError::SerializationError(error.to_string()))?;
    document.insert("updated_at".to_string(), updated_at);
    Ok(Value::Object(document))
}

/// Creates the `tasks` table and its index if they do not exist yet.
///
/// # Errors
///
/// Returns `RepositoryError::DatabaseError` if a statement fails.
pub async fn ensure_schema(pool: &PgPool) -> RepositoryResult<()> {
    for statement in [CREATE_TASKS_TABLE, CREATE_TASKS_SEQ_INDEX] {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|error| database_error(&error))?;
    }
    Ok(())
}

/// `PostgreSQL` implementation of `TaskRepository`.
///
/// # Example
///
/// ```ignore
/// let pool = PgPool::connect("postgres://localhost/tasks").await?;
/// ensure_schema(&pool).await?;
/// let repository = PostgresTaskRepository::new(pool);
/// ```
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: PgPool,
}

impl PostgresTaskRepository {
    /// Creates a new `PostgreSQL` task repository with the given connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl TaskRepository for PostgresTaskRepository {
    fn find_by_id(&self, id: &TaskId) -> BoxFuture<'static, RepositoryResult<Option<Task>>> {
        let pool = self.pool.clone();
        let task_id = id.clone();

        async move {
            let row: Option<(Value,)> = sqlx::query_as("SELECT data FROM tasks WHERE id = $1")
                .bind(task_id.as_uuid())
                .fetch_optional(&pool)
                .await
                .map_err(|error| database_error(&error))?;

            row.map(|(data,)| decode_task(data)).transpose()
        }
        .boxed()
    }

    fn insert(&self, task: &Task) -> BoxFuture<'static, RepositoryResult<()>> {
        let pool = self.pool.clone();
        let task = task.clone();

        async move {
            let task_data = serde_json::to_value(&task)
                .map_err(|error| RepositoryError::SerializationError(error.to_string()))?;

            sqlx::query(
                "INSERT INTO tasks (id, data, created_at, updated_at) \
                 VALUES ($1, $2, NOW(), NOW())",
            )
            .bind(task.task_id.as_uuid())
            .bind(&task_data)
            .execute(&pool)
            .await
            .map_err(|error| database_error(&error))?;

            Ok(())
        }
        .boxed()
    }

    fn update(
        &self,
        id: &TaskId,
        patch: &TaskPatch,
        now: Timestamp,
    ) -> BoxFuture<'static, RepositoryResult<Option<Task>>> {
        let pool = self.pool.clone();
        let task_id = id.clone();
        let patch = patch.clone();

        async move {
            let document = patch_document(&patch, &now)?;

            // `||` merges top-level keys, so absent fields keep their value.
            let row: Option<(Value,)> = sqlx::query_as(
                "UPDATE tasks SET data = data || $2, updated_at = NOW() \
                 WHERE id = $1 RETURNING data",
            )
            .bind(task_id.as_uuid())
            .bind(&document)
            .fetch_optional(&pool)
            .await
            .map_err(|error| database_error(&error))?;

            row.map(|(data,)| decode_task(data)).transpose()
        }
        .boxed()
    }

    fn delete(&self, id: &TaskId) -> BoxFuture<'static, RepositoryResult<bool>> {
        let pool = self.pool.clone();
        let task_id = id.clone();

        async move {
            let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
                .bind(task_id.as_uuid())
                .execute(&pool)
                .await
                .map_err(|error| database_error(&error))?;

            Ok(result.rows_affected() > 0)
        }
        .boxed()
    }

    fn list(&self) -> BoxFuture<'static, RepositoryResult<Vec<Task>>> {
        let pool = self.pool.clone();

        async move {
            let rows: Vec<(Value,)> = sqlx::query_as("SELECT data FROM tasks ORDER BY seq ASC")
                .fetch_all(&pool)
                .await
                .map_err(|error| database_error(&error))?;

            rows.into_iter().map(|(data,)| decode_task(data)).collect()
        }
        .boxed()
    }
}

// =============================================================================
// Tests
// =============================================================================
