//! Document store backed by a PostgreSQL JSONB table.
//!
//! Every collection shares the `documents` table. Nested array updates are
//! expressed as single `UPDATE` statements so each one is atomic for the
//! document it touches. A GIN index over the body serves containment
//! lookups of embedded elements by id.

use crate::domain::model::{ObjectId, ID_FIELD};
use crate::storage::document::{ensure_id, Document, DocumentStore, StoreError};
use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value as JsonValue;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use tracing::{debug, info};

/// Owning document of an embedded element, picked in insertion order.
const OWNER_CTE: &str = "WITH owner AS (
        SELECT collection, id FROM documents
        WHERE collection = $1
          AND body @> jsonb_build_object($2::text, jsonb_build_array(jsonb_build_object('_id', $3::text)))
        ORDER BY seq
        LIMIT 1
        FOR UPDATE
    )";

#[derive(Clone)]
pub struct PostgresDocumentStore {
    pool: PgPool,
}

impl PostgresDocumentStore {
    /// Opens a connection pool. Pair with [`close`](Self::close) on shutdown.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        info!(max_connections, "connected to document store");
        Ok(Self { pool })
    }

    pub fn with_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Creates the documents table and its indexes if they are missing.
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS documents (
                collection TEXT NOT NULL,
                id TEXT NOT NULL,
                seq BIGSERIAL NOT NULL,
                body JSONB NOT NULL,
                PRIMARY KEY (collection, id)
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS documents_collection_seq_idx
             ON documents (collection, seq)",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS documents_body_path_idx
             ON documents USING GIN (body jsonb_path_ops)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Drains the pool, waiting for in-flight queries.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("document store connection closed");
    }
}

fn body_of(collection: &str, row: &sqlx::postgres::PgRow) -> Result<Document, StoreError> {
    let body: JsonValue = row.try_get("body")?;
    match body {
        JsonValue::Object(map) => Ok(map),
        other => Err(StoreError::InvalidShape {
            collection: collection.to_string(),
            reason: format!("stored body is not an object: {}", other),
        }),
    }
}

fn owner_id(collection: &str, row: Option<sqlx::postgres::PgRow>) -> Result<Option<ObjectId>, StoreError> {
    let Some(row) = row else {
        return Ok(None);
    };
    let id: String = row.try_get("id")?;
    id.parse().map(Some).map_err(|_| StoreError::InvalidShape {
        collection: collection.to_string(),
        reason: format!("stored id '{}' is not an object id", id),
    })
}

#[async_trait]
impl DocumentStore for PostgresDocumentStore {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn find_all(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        let rows = sqlx::query("SELECT body FROM documents WHERE collection = $1 ORDER BY seq")
            .bind(collection)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(|row| body_of(collection, row)).collect()
    }

    async fn find_by_id(
        &self,
        collection: &str,
        id: &ObjectId,
    ) -> Result<Option<Document>, StoreError> {
        let row = sqlx::query("SELECT body FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id.to_hex())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(|r| body_of(collection, r)).transpose()
    }

    async fn find_by_element(
        &self,
        collection: &str,
        array_field: &str,
        element_id: &ObjectId,
    ) -> Result<Option<Document>, StoreError> {
        let row = sqlx::query(
            "SELECT body FROM documents
             WHERE collection = $1
               AND body @> jsonb_build_object($2::text, jsonb_build_array(jsonb_build_object('_id', $3::text)))
             ORDER BY seq
             LIMIT 1",
        )
        .bind(collection)
        .bind(array_field)
        .bind(element_id.to_hex())
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(|r| body_of(collection, r)).transpose()
    }

    async fn insert(
        &self,
        collection: &str,
        mut document: Document,
    ) -> Result<ObjectId, StoreError> {
        let id = ensure_id(collection, &mut document)?;
        sqlx::query("INSERT INTO documents (collection, id, body) VALUES ($1, $2, $3)")
            .bind(collection)
            .bind(id.to_hex())
            .bind(JsonValue::Object(document))
            .execute(&self.pool)
            .await?;
        debug!(collection, %id, "inserted document");
        Ok(id)
    }

    async fn set_fields(
        &self,
        collection: &str,
        id: &ObjectId,
        mut fields: Document,
    ) -> Result<bool, StoreError> {
        fields.remove(ID_FIELD);
        let result = sqlx::query(
            "UPDATE documents SET body = body || $3::jsonb WHERE collection = $1 AND id = $2",
        )
        .bind(collection)
        .bind(id.to_hex())
        .bind(JsonValue::Object(fields))
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn push_element(
        &self,
        collection: &str,
        id: &ObjectId,
        array_field: &str,
        mut element: Document,
    ) -> Result<bool, StoreError> {
        ensure_id(collection, &mut element)?;
        let result = sqlx::query(
            "UPDATE documents
             SET body = jsonb_set(
                 body,
                 ARRAY[$3::text],
                 COALESCE(body -> $3::text, '[]'::jsonb) || jsonb_build_array($4::jsonb),
                 true
             )
             WHERE collection = $1 AND id = $2",
        )
        .bind(collection)
        .bind(id.to_hex())
        .bind(array_field)
        .bind(JsonValue::Object(element))
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn set_element_fields(
        &self,
        collection: &str,
        array_field: &str,
        element_id: &ObjectId,
        mut fields: Document,
    ) -> Result<Option<ObjectId>, StoreError> {
        fields.remove(ID_FIELD);
        let sql = format!(
            "{OWNER_CTE}
            UPDATE documents d
            SET body = jsonb_set(d.body, ARRAY[$2::text], (
                SELECT jsonb_agg(
                    CASE WHEN elem ->> '_id' = $3::text THEN elem || $4::jsonb ELSE elem END
                    ORDER BY ord
                )
                FROM jsonb_array_elements(d.body -> $2::text) WITH ORDINALITY AS t(elem, ord)
            ))
            FROM owner
            WHERE d.collection = owner.collection AND d.id = owner.id
            RETURNING d.id"
        );
        let row = sqlx::query(&sql)
            .bind(collection)
            .bind(array_field)
            .bind(element_id.to_hex())
            .bind(JsonValue::Object(fields))
            .fetch_optional(&self.pool)
            .await?;
        owner_id(collection, row)
    }

    async fn pull_element(
        &self,
        collection: &str,
        array_field: &str,
        element_id: &ObjectId,
    ) -> Result<Option<ObjectId>, StoreError> {
        let sql = format!(
            "{OWNER_CTE}
            UPDATE documents d
            SET body = jsonb_set(d.body, ARRAY[$2::text], COALESCE((
                SELECT jsonb_agg(elem ORDER BY ord)
                FROM jsonb_array_elements(d.body -> $2::text) WITH ORDINALITY AS t(elem, ord)
                WHERE elem ->> '_id' IS DISTINCT FROM $3::text
            ), '[]'::jsonb))
            FROM owner
            WHERE d.collection = owner.collection AND d.id = owner.id
            RETURNING d.id"
        );
        let row = sqlx::query(&sql)
            .bind(collection)
            .bind(array_field)
            .bind(element_id.to_hex())
            .fetch_optional(&self.pool)
            .await?;
        owner_id(collection, row)
    }

    async fn delete(&self, collection: &str, id: &ObjectId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id.to_hex())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self, collection: &str) -> Result<u64, StoreError> {
        let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM documents WHERE collection = $1")
            .bind(collection)
            .fetch_one(&self.pool)
            .await?;
        Ok(n.max(0) as u64)
    }
}
