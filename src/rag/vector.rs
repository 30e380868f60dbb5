//! Grounding from a relational store of pre-embedded manual chunks:
//! embed the query, then take its nearest stored neighbors.

use std::sync::Arc;

use async_trait::async_trait;

use super::store::{ContextJoin, GroundingSource, RetrievedSnippet};
use crate::core::errors::ServiceError;
use crate::llm::EmbeddingBackend;

/// Rows requested per lookup, whatever the query vector looks like.
pub const NEAREST_NEIGHBOR_LIMIT: usize = 3;

/// Read-only nearest-neighbor lookup over stored chunk embeddings.
#[async_trait]
pub trait NeighborIndex: Send + Sync {
    /// Stored texts ordered by ascending distance to `embedding`.
    async fn nearest(&self, embedding: &[f32], limit: usize) -> Result<Vec<String>, ServiceError>;
}

pub struct VectorStoreSource {
    embedder: Arc<dyn EmbeddingBackend>,
    index: Arc<dyn NeighborIndex>,
}

impl VectorStoreSource {
    pub fn new(embedder: Arc<dyn EmbeddingBackend>, index: Arc<dyn NeighborIndex>) -> Self {
        Self { embedder, index }
    }

    /// Embedding failures degrade to a zero-length vector; the lookup still runs.
    async fn embed_query(&self, query: &str) -> Vec<f32> {
        match self.embedder.embed(query).await {
            Ok(embedding) => {
                tracing::info!("Generated prompt embedding of length {}", embedding.len());
                embedding
            }
            Err(err) => {
                tracing::error!("Embedding request failed, querying with an empty vector: {}", err);
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl GroundingSource for VectorStoreSource {
    fn name(&self) -> &str {
        "vector_store"
    }

    fn context_join(&self) -> ContextJoin {
        ContextJoin::LineTerminated
    }

    async fn retrieve(&self, query: &str) -> Result<Vec<RetrievedSnippet>, ServiceError> {
        let embedding = self.embed_query(query).await;
        let texts = self.index.nearest(&embedding, NEAREST_NEIGHBOR_LIMIT).await?;

        tracing::info!("Found {} nearest neighbors", texts.len());
        for text in &texts {
            tracing::debug!("Neighbor: {}", text);
        }

        Ok(texts.into_iter().map(RetrievedSnippet::new).collect())
    }
}

/// pgvector text form of a vector: `[0.1,0.2,0.3]`.
pub fn vector_literal(embedding: &[f32]) -> String {
    let values: Vec<String> = embedding.iter().map(|v| v.to_string()).collect();
    format!("[{}]", values.join(","))
}
