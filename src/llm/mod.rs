pub mod provider;
pub mod types;
pub mod vertex;


pub use provider::{EmbeddingBackend, GenerationBackend};
pub use types::{ChatMessage, ChatRequest};
pub use vertex::{GeminiClient, VertexEmbeddingClient};
