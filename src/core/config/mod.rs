pub mod defaults;
pub mod service;
pub mod types;
pub mod validation;

pub use service::{load_config, load_config_from};
pub use types::{
    AppConfig, AuthConfig, DistanceMetric, EmbeddingConfig, GenerationConfig, GroundingBackend,
    GroundingConfig, LoggingConfig, SearchConfig, ServerConfig, VectorStoreConfig,
};
