use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;

use super::provider::{EmbeddingBackend, GenerationBackend};
use super::types::{
    ChatRequest, EmbeddingInstance, GenerateContentRequest, GenerateContentResponse,
    PredictRequest, PredictResponse,
};
use crate::core::auth::TokenSource;
use crate::core::config::{EmbeddingConfig, GenerationConfig};
use crate::core::errors::ServiceError;
use crate::core::http::post_json;

const GENERATION: &str = "generation";
const EMBEDDING: &str = "embedding";

/// Chat completion against a hosted Gemini model.
#[derive(Clone)]
pub struct GeminiClient {
    url: String,
    model: String,
    client: Client,
    tokens: Arc<dyn TokenSource>,
}

impl GeminiClient {
    pub fn new(
        project_id: &str,
        config: &GenerationConfig,
        client: Client,
        tokens: Arc<dyn TokenSource>,
    ) -> Self {
        Self {
            url: model_url(
                &config.resolved_endpoint(),
                project_id,
                &config.location,
                "google",
                &config.model,
                "generateContent",
            ),
            model: config.model.clone(),
            client,
            tokens,
        }
    }
}

#[async_trait]
impl GenerationBackend for GeminiClient {
    fn model(&self) -> &str {
        &self.model
    }

    async fn chat(&self, request: ChatRequest) -> Result<String, ServiceError> {
        let body = GenerateContentRequest::from(&request);
        let response: GenerateContentResponse =
            post_json(&self.client, self.tokens.as_ref(), GENERATION, &self.url, &body).await?;

        response
            .into_text()
            .map_err(|reason| ServiceError::decode(GENERATION, reason))
    }
}

/// Text embeddings through the publisher model `predict` endpoint.
#[derive(Clone)]
pub struct VertexEmbeddingClient {
    url: String,
    client: Client,
    tokens: Arc<dyn TokenSource>,
}

impl VertexEmbeddingClient {
    pub fn new(
        project_id: &str,
        config: &EmbeddingConfig,
        client: Client,
        tokens: Arc<dyn TokenSource>,
    ) -> Self {
        Self {
            url: model_url(
                &config.resolved_endpoint(),
                project_id,
                &config.location,
                &config.publisher,
                &config.model,
                "predict",
            ),
            client,
            tokens,
        }
    }
}

#[async_trait]
impl EmbeddingBackend for VertexEmbeddingClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ServiceError> {
        let body = PredictRequest {
            instances: vec![EmbeddingInstance {
                content: text.to_string(),
            }],
        };
        let response: PredictResponse =
            post_json(&self.client, self.tokens.as_ref(), EMBEDDING, &self.url, &body).await?;

        response
            .into_vector()
            .map_err(|reason| ServiceError::decode(EMBEDDING, reason))
    }
}

fn model_url(
    endpoint: &str,
    project_id: &str,
    location: &str,
    publisher: &str,
    model: &str,
    method: &str,
) -> String {
    format!(
        "{}/v1/projects/{}/locations/{}/publishers/{}/models/{}:{}",
        endpoint.trim_end_matches('/'),
        project_id,
        location,
        publisher,
        model,
        method
    )
}
