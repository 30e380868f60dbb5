use std::sync::Arc;

use super::prompt::build_augmented_prompt;
use super::types::ChatExchange;
use crate::llm::GenerationBackend;
use crate::rag::{build_grounding_context, GroundingSource};

/// retrieve -> flatten -> assemble prompt -> generate, once per request.
///
/// Backend failures never abort a request: a failed retrieval runs the model
/// without grounding, and a failed generation turns its error text into the
/// reply.
#[derive(Clone)]
pub struct ChatPipeline {
    grounding: Arc<dyn GroundingSource>,
    generation: Arc<dyn GenerationBackend>,
}

impl ChatPipeline {
    pub fn new(
        grounding: Arc<dyn GroundingSource>,
        generation: Arc<dyn GenerationBackend>,
    ) -> Self {
        Self {
            grounding,
            generation,
        }
    }

    pub fn grounding_backend(&self) -> &str {
        self.grounding.name()
    }

    pub fn generation_model(&self) -> &str {
        self.generation.model()
    }

    pub async fn respond(&self, mut exchange: ChatExchange) -> ChatExchange {
        let context = self.grounding_context(&exchange.prompt).await;
        let reply = self.generate(&exchange.prompt, &context).await;
        exchange.response = Some(reply);
        exchange
    }

    async fn grounding_context(&self, query: &str) -> String {
        tracing::info!("Grounding query via {}: {}", self.grounding.name(), query);
        match self.grounding.retrieve(query).await {
            Ok(snippets) => {
                let context = build_grounding_context(&snippets, self.grounding.context_join());
                tracing::info!(
                    "Retrieved {} snippets ({} chars of context)",
                    snippets.len(),
                    context.len()
                );
                context
            }
            Err(err) => {
                tracing::error!(
                    "{} retrieval failed, continuing without grounding: {}",
                    self.grounding.name(),
                    err
                );
                String::new()
            }
        }
    }

    async fn generate(&self, user_prompt: &str, context: &str) -> String {
        let prompt = build_augmented_prompt(user_prompt, context);
        tracing::debug!("Augmented prompt: {}", prompt);

        match self.generation.generate(&prompt).await {
            Ok(reply) => {
                tracing::debug!("Model response: {}", reply);
                reply
            }
            Err(err) => {
                tracing::error!("{} generation failed: {}", self.generation.model(), err);
                err.to_string()
            }
        }
    }
}
