//! Postgres-backed document store.
//!
//! Every collection shares one `documents` table; each record's fields live
//! in a JSONB `body`, with identity and timestamps in their own columns.
//!
//! ## Error Mapping
//!
//! | Failure | StoreError |
//! |---|---|
//! | any SQLx error (pool, network, SQL) | `Backend` |
//! | row whose `body` no longer fits the schema | `Corrupt` |
//! | patch that fails validation | `Validation` (transaction rolled back) |

use std::marker::PhantomData;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{PgPool, Row, postgres::PgRow};

use crudkit_core::{Record, RecordId, Schema};

use crate::error::{StoreError, StoreResult};
use crate::record_store::{RecordStore, parse_id};

const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS documents (
        seq         BIGSERIAL,
        collection  TEXT        NOT NULL,
        id          UUID        NOT NULL,
        body        JSONB       NOT NULL,
        created_at  TIMESTAMPTZ NOT NULL,
        updated_at  TIMESTAMPTZ NOT NULL,
        PRIMARY KEY (collection, id)
    )
"#;

/// Create the `documents` table if it does not exist yet.
pub async fn ensure_schema(pool: &PgPool) -> StoreResult<()> {
    sqlx::query(CREATE_TABLE)
        .execute(pool)
        .await
        .map_err(|e| map_sqlx_error("ensure_schema", e))?;
    Ok(())
}

/// Postgres collection of records of kind `T`.
#[derive(Debug)]
pub struct PostgresStore<T> {
    pool: Arc<PgPool>,
    _kind: PhantomData<fn() -> T>,
}

impl<T> Clone for PostgresStore<T> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            _kind: PhantomData,
        }
    }
}

impl<T: Schema> PostgresStore<T> {
    /// Wrap a shared pool. Call [`ensure_schema`] once before first use.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self {
            pool,
            _kind: PhantomData,
        }
    }
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    tracing::warn!(operation, error = %err, "postgres operation failed");
    StoreError::backend(format!("{operation}: {err}"))
}

fn record_from_row<T: Schema>(row: &PgRow) -> StoreResult<Record<T>> {
    let read = |e: sqlx::Error| StoreError::Corrupt(e.to_string());

    let id: uuid::Uuid = row.try_get("id").map_err(read)?;
    let body: Value = row.try_get("body").map_err(read)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(read)?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at").map_err(read)?;

    let fields: T = serde_json::from_value(body)
        .map_err(|e| StoreError::Corrupt(format!("{} {id}: {e}", T::KIND)))?;

    Ok(Record {
        id: RecordId::from_uuid(id),
        fields,
        created_at,
        updated_at,
    })
}

#[async_trait::async_trait]
impl<T: Schema> RecordStore<T> for PostgresStore<T> {
    async fn create(&self, fields: T) -> StoreResult<Record<T>> {
        let record = Record::new(fields, Utc::now());

        sqlx::query(
            r#"
            INSERT INTO documents (collection, id, body, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(T::COLLECTION)
        .bind(record.id.as_uuid())
        .bind(Value::Object(record.fields.to_document()))
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("create", e))?;

        Ok(record)
    }

    async fn find(&self) -> StoreResult<Vec<Record<T>>> {
        let rows = sqlx::query(
            r#"
            SELECT id, body, created_at, updated_at
            FROM documents
            WHERE collection = $1
            ORDER BY seq ASC
            "#,
        )
        .bind(T::COLLECTION)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find", e))?;

        rows.iter().map(record_from_row::<T>).collect()
    }

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Record<T>>> {
        let id = parse_id(id)?;

        let row = sqlx::query(
            r#"
            SELECT id, body, created_at, updated_at
            FROM documents
            WHERE collection = $1 AND id = $2
            "#,
        )
        .bind(T::COLLECTION)
        .bind(id.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_by_id", e))?;

        row.as_ref().map(record_from_row::<T>).transpose()
    }

    async fn find_by_id_and_update(
        &self,
        id: &str,
        patch: &Value,
    ) -> StoreResult<Option<Record<T>>> {
        let id = parse_id(id)?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin", e))?;

        // Row lock keeps the read-merge-write atomic against concurrent updates.
        let row = sqlx::query(
            r#"
            SELECT id, body, created_at, updated_at
            FROM documents
            WHERE collection = $1 AND id = $2
            FOR UPDATE
            "#,
        )
        .bind(T::COLLECTION)
        .bind(id.as_uuid())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("find_by_id_and_update", e))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let current = record_from_row::<T>(&row)?;
        let fields = current.fields.apply_patch(patch)?;
        let updated = current.revise(fields, Utc::now());

        sqlx::query(
            r#"
            UPDATE documents
            SET body = $3, updated_at = $4
            WHERE collection = $1 AND id = $2
            "#,
        )
        .bind(T::COLLECTION)
        .bind(id.as_uuid())
        .bind(Value::Object(updated.fields.to_document()))
        .bind(updated.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("find_by_id_and_update", e))?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit", e))?;

        Ok(Some(updated))
    }

    async fn find_by_id_and_delete(&self, id: &str) -> StoreResult<Option<Record<T>>> {
        let id = parse_id(id)?;

        let row = sqlx::query(
            r#"
            DELETE FROM documents
            WHERE collection = $1 AND id = $2
            RETURNING id, body, created_at, updated_at
            "#,
        )
        .bind(T::COLLECTION)
        .bind(id.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_by_id_and_delete", e))?;

        row.as_ref().map(record_from_row::<T>).transpose()
    }
}
