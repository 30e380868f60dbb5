use async_trait::async_trait;

use super::types::ChatRequest;
use crate::core::errors::ServiceError;

#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// model identifier, for logs and status
    fn model(&self) -> &str;

    /// chat completion (non-streaming)
    async fn chat(&self, request: ChatRequest) -> Result<String, ServiceError>;

    /// Sends `prompt` as the only turn of a new session.
    async fn generate(&self, prompt: &str) -> Result<String, ServiceError> {
        self.chat(ChatRequest::single_turn(prompt)).await
    }
}

#[async_trait]
pub trait EmbeddingBackend: Send + Sync {
    /// embed one query text
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ServiceError>;
}
