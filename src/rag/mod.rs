//! Grounding retrieval for the chat pipeline.
//!
//! This module provides:
//! - `GroundingSource`: the retrieval capability every backend implements
//! - `ExtractiveSearchSource`: managed search service (data store or agent-builder app)
//! - `VectorStoreSource`: query embedding plus nearest-neighbor lookup
//! - `PgNeighborIndex`: the Postgres/pgvector lookup behind `VectorStoreSource`

mod pgvector;
mod search;
mod store;
mod vector;


pub use pgvector::{nearest_neighbor_sql, PgNeighborIndex};
pub use search::{serving_config_url, ExtractiveSearchSource, SearchTarget};
pub use store::{build_grounding_context, ContextJoin, GroundingSource, RetrievedSnippet};
pub use vector::{vector_literal, NeighborIndex, VectorStoreSource, NEAREST_NEIGHBOR_LIMIT};
