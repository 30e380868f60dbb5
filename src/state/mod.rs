use std::sync::Arc;

use reqwest::Client;

use crate::chat::ChatPipeline;
use crate::core::auth::{token_source, TokenSource};
use crate::core::config::{AppConfig, GroundingBackend};
use crate::llm::{GeminiClient, VertexEmbeddingClient};
use crate::rag::{ExtractiveSearchSource, GroundingSource, PgNeighborIndex, VectorStoreSource};

pub mod error;

use error::InitializationError;

/// Application state shared across all routes.
///
/// Holds no per-request data: the configuration and the pipeline's clients
/// are reused by every request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub pipeline: ChatPipeline,
}

impl AppState {
    /// Builds the grounding source selected by `grounding.backend` and the
    /// generation client.
    pub fn initialize(config: Arc<AppConfig>) -> Result<Arc<Self>, InitializationError> {
        let client = Client::builder()
            .build()
            .map_err(InitializationError::HttpClient)?;
        let tokens = token_source(&config.auth, client.clone());

        let grounding = build_grounding_source(&config, client.clone(), tokens.clone())?;
        let generation = Arc::new(GeminiClient::new(
            &config.project_id,
            &config.generation,
            client,
            tokens,
        ));

        tracing::info!(
            "Chat pipeline ready: project {}, grounding {}, model {}",
            config.project_id,
            grounding.name(),
            config.generation.model
        );

        Ok(Self::with_pipeline(
            config,
            ChatPipeline::new(grounding, generation),
        ))
    }

    pub fn with_pipeline(config: Arc<AppConfig>, pipeline: ChatPipeline) -> Arc<Self> {
        Arc::new(AppState { config, pipeline })
    }
}

fn build_grounding_source(
    config: &AppConfig,
    client: Client,
    tokens: Arc<dyn TokenSource>,
) -> Result<Arc<dyn GroundingSource>, InitializationError> {
    let source: Arc<dyn GroundingSource> = match config.grounding.backend {
        GroundingBackend::SearchService => {
            match config.search.datastore_id.as_deref() {
                Some(id) => tracing::info!("Datastore ID: {}", id),
                None => tracing::warn!(
                    "search.datastore_id is not set; chat replies will be ungrounded"
                ),
            }
            Arc::new(ExtractiveSearchSource::data_store(
                &config.project_id,
                &config.search,
                client,
                tokens,
            ))
        }
        GroundingBackend::AgentBuilder => {
            if let Some(id) = config.search.engine_id.as_deref() {
                tracing::info!("Agent builder app ID: {}", id);
            }
            Arc::new(ExtractiveSearchSource::agent_builder(
                &config.project_id,
                &config.search,
                client,
                tokens,
            ))
        }
        GroundingBackend::VectorStore => {
            let embedder = Arc::new(VertexEmbeddingClient::new(
                &config.project_id,
                &config.embedding,
                client,
                tokens,
            ));
            let index = Arc::new(
                PgNeighborIndex::connect_lazy(&config.vector_store)
                    .map_err(InitializationError::VectorStore)?,
            );
            Arc::new(VectorStoreSource::new(embedder, index))
        }
    };

    Ok(source)
}
