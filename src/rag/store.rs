//! GroundingSource trait: the retrieval backends that feed the chat pipeline.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::errors::ServiceError;

/// One piece of retrieved manual text. Identity is its position in the result list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrievedSnippet {
    pub text: String,
}

impl RetrievedSnippet {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// How a backend's snippets are laid out in the grounding context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextJoin {
    /// Texts back to back, no separator.
    Concatenate,
    /// Every text followed by a newline.
    LineTerminated,
}

/// A single best-effort retrieval call per request. No retries, no caching.
#[async_trait]
pub trait GroundingSource: Send + Sync {
    /// backend name for logs and status
    fn name(&self) -> &str;

    fn context_join(&self) -> ContextJoin;

    async fn retrieve(&self, query: &str) -> Result<Vec<RetrievedSnippet>, ServiceError>;
}

/// Flattens snippets into one context blob, keeping backend order.
pub fn build_grounding_context(snippets: &[RetrievedSnippet], join: ContextJoin) -> String {
    match join {
        ContextJoin::Concatenate => snippets.iter().map(|s| s.text.as_str()).collect(),
        ContextJoin::LineTerminated => snippets.iter().fold(String::new(), |mut acc, s| {
            acc.push_str(&s.text);
            acc.push('\n');
            acc
        }),
    }
}
