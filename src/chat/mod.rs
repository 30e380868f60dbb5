//! The chat exchange and the retrieval-augmented pipeline that answers it.

mod pipeline;
mod prompt;
mod types;

pub use pipeline::ChatPipeline;
pub use prompt::build_augmented_prompt;
pub use types::ChatExchange;
