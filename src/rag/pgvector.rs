//! Postgres + pgvector nearest-neighbor lookup.
//!
//! Expects a table shaped like:
//!
//! ```sql
//! CREATE TABLE embeddings (
//!     id TEXT PRIMARY KEY,
//!     text TEXT NOT NULL,
//!     embedding vector(768)
//! );
//! ```
//!
//! The table is owned and filled elsewhere; this module only reads it.

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};

use super::vector::{vector_literal, NeighborIndex};
use crate::core::config::VectorStoreConfig;
use crate::core::errors::{ConfigError, ServiceError};

pub struct PgNeighborIndex {
    pool: PgPool,
    query: String,
}

impl PgNeighborIndex {
    /// Builds a lazily connecting pool; the database is first contacted on
    /// the first lookup.
    pub fn connect_lazy(config: &VectorStoreConfig) -> Result<Self, ConfigError> {
        let url = config
            .database_url
            .as_deref()
            .ok_or(ConfigError::Missing("vector_store.database_url"))?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect_lazy(url)
            .map_err(|e| ConfigError::Invalid {
                field: "vector_store.database_url",
                reason: e.to_string(),
            })?;

        Ok(Self::with_pool(pool, config))
    }

    pub fn with_pool(pool: PgPool, config: &VectorStoreConfig) -> Self {
        Self {
            pool,
            query: nearest_neighbor_sql(config),
        }
    }
}

/// `table` is validated as a plain identifier at config load.
pub fn nearest_neighbor_sql(config: &VectorStoreConfig) -> String {
    format!(
        "SELECT text FROM {} ORDER BY embedding {} CAST($1 AS vector) LIMIT $2",
        config.table,
        config.distance.operator()
    )
}

#[async_trait]
impl NeighborIndex for PgNeighborIndex {
    async fn nearest(&self, embedding: &[f32], limit: usize) -> Result<Vec<String>, ServiceError> {
        let literal = vector_literal(embedding);
        tracing::debug!("Nearest-neighbor query vector: {}", literal);

        let texts: Vec<String> = sqlx::query_scalar::<_, String>(&self.query)
            .bind(literal)
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await?;

        Ok(texts)
    }
}
