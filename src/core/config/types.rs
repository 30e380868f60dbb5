use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::defaults;

/// Process-wide configuration, read once at startup and shared by `Arc`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub project_id: String,
    #[serde(default)]
    pub grounding: GroundingConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub vector_store: VectorStoreConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Which grounding source a deployment uses. Fixed for the life of the process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroundingBackend {
    #[default]
    SearchService,
    VectorStore,
    AgentBuilder,
}

impl GroundingBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroundingBackend::SearchService => "search_service",
            GroundingBackend::VectorStore => "vector_store",
            GroundingBackend::AgentBuilder => "agent_builder",
        }
    }
}

impl fmt::Display for GroundingBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroundingConfig {
    #[serde(default)]
    pub backend: GroundingBackend,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "defaults::search_endpoint")]
    pub endpoint: String,
    #[serde(default = "defaults::search_location")]
    pub location: String,
    #[serde(default = "defaults::search_collection_id")]
    pub collection_id: String,
    #[serde(default)]
    pub datastore_id: Option<String>,
    /// Agent-builder app id, used by the `agent_builder` backend.
    #[serde(default)]
    pub engine_id: Option<String>,
    #[serde(default = "defaults::search_serving_config_id")]
    pub serving_config_id: String,
    #[serde(default = "defaults::search_page_size")]
    pub page_size: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: defaults::search_endpoint(),
            location: defaults::search_location(),
            collection_id: defaults::search_collection_id(),
            datastore_id: None,
            engine_id: None,
            serving_config_id: defaults::search_serving_config_id(),
            page_size: defaults::search_page_size(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    #[serde(default = "defaults::embedding_location")]
    pub location: String,
    #[serde(default = "defaults::embedding_publisher")]
    pub publisher: String,
    #[serde(default = "defaults::embedding_model")]
    pub model: String,
    #[serde(default)]
    pub endpoint: Option<String>,
}

impl EmbeddingConfig {
    pub fn resolved_endpoint(&self) -> String {
        self.endpoint
            .clone()
            .unwrap_or_else(|| defaults::aiplatform_endpoint(&self.location))
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            location: defaults::embedding_location(),
            publisher: defaults::embedding_publisher(),
            model: defaults::embedding_model(),
            endpoint: None,
        }
    }
}

/// pgvector distance operator used to order rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMetric {
    #[default]
    L2,
    Cosine,
    InnerProduct,
}

impl DistanceMetric {
    pub fn operator(&self) -> &'static str {
        match self {
            DistanceMetric::L2 => "<->",
            DistanceMetric::Cosine => "<=>",
            DistanceMetric::InnerProduct => "<#>",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorStoreConfig {
    #[serde(default)]
    pub database_url: Option<String>,
    #[serde(default = "defaults::vector_table")]
    pub table: String,
    #[serde(default)]
    pub distance: DistanceMetric,
    #[serde(default = "defaults::vector_max_connections")]
    pub max_connections: u32,
}

impl Default for VectorStoreConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            table: defaults::vector_table(),
            distance: DistanceMetric::default(),
            max_connections: defaults::vector_max_connections(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "defaults::generation_location")]
    pub location: String,
    #[serde(default = "defaults::generation_model")]
    pub model: String,
    #[serde(default)]
    pub endpoint: Option<String>,
}

impl GenerationConfig {
    pub fn resolved_endpoint(&self) -> String {
        self.endpoint
            .clone()
            .unwrap_or_else(|| defaults::aiplatform_endpoint(&self.location))
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            location: defaults::generation_location(),
            model: defaults::generation_model(),
            endpoint: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Static bearer token. When unset, tokens come from the metadata server.
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default = "defaults::metadata_url")]
    pub metadata_url: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_token: None,
            metadata_url: defaults::metadata_url(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "defaults::server_host")]
    pub host: String,
    #[serde(default = "defaults::server_port")]
    pub port: u16,
    #[serde(default)]
    pub cors_allowed_origins: Vec<String>,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: defaults::server_host(),
            port: defaults::server_port(),
            cors_allowed_origins: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}
