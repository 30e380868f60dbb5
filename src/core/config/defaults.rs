//! Deployment constants used when neither the config file nor the
//! environment supplies a value.

pub const CONFIG_PATH_ENV: &str = "MANUAL_CHAT_CONFIG_PATH";
pub const DEFAULT_CONFIG_FILE: &str = "config.yml";

pub const SEARCH_ENDPOINT: &str = "https://discoveryengine.googleapis.com";
pub const SEARCH_LOCATION: &str = "global";
pub const SEARCH_COLLECTION_ID: &str = "default_collection";
pub const SEARCH_SERVING_CONFIG_ID: &str = "default_search";
pub const SEARCH_PAGE_SIZE: u32 = 10;
pub const SEARCH_MAX_PAGE_SIZE: u32 = 100;

pub const EMBEDDING_LOCATION: &str = "us-central1";
pub const EMBEDDING_PUBLISHER: &str = "google";
pub const EMBEDDING_MODEL: &str = "textembedding-gecko@003";

pub const GENERATION_LOCATION: &str = "us-central1";
pub const GENERATION_MODEL: &str = "gemini-1.5-flash-001";

pub const VECTOR_TABLE: &str = "embeddings";
pub const VECTOR_MAX_CONNECTIONS: u32 = 4;

pub const METADATA_URL: &str = "http://metadata.google.internal";

pub const SERVER_HOST: &str = "0.0.0.0";
pub const SERVER_PORT: u16 = 8080;

/// Regional Vertex AI endpoint, e.g. `https://us-central1-aiplatform.googleapis.com`.
pub fn aiplatform_endpoint(location: &str) -> String {
    format!("https://{}-aiplatform.googleapis.com", location)
}

pub(crate) fn search_endpoint() -> String {
    SEARCH_ENDPOINT.to_string()
}

pub(crate) fn search_location() -> String {
    SEARCH_LOCATION.to_string()
}

pub(crate) fn search_collection_id() -> String {
    SEARCH_COLLECTION_ID.to_string()
}

pub(crate) fn search_serving_config_id() -> String {
    SEARCH_SERVING_CONFIG_ID.to_string()
}

pub(crate) fn search_page_size() -> u32 {
    SEARCH_PAGE_SIZE
}

pub(crate) fn embedding_location() -> String {
    EMBEDDING_LOCATION.to_string()
}

pub(crate) fn embedding_publisher() -> String {
    EMBEDDING_PUBLISHER.to_string()
}

pub(crate) fn embedding_model() -> String {
    EMBEDDING_MODEL.to_string()
}

pub(crate) fn generation_location() -> String {
    GENERATION_LOCATION.to_string()
}

pub(crate) fn generation_model() -> String {
    GENERATION_MODEL.to_string()
}

pub(crate) fn vector_table() -> String {
    VECTOR_TABLE.to_string()
}

pub(crate) fn vector_max_connections() -> u32 {
    VECTOR_MAX_CONNECTIONS
}

pub(crate) fn metadata_url() -> String {
    METADATA_URL.to_string()
}

pub(crate) fn server_host() -> String {
    SERVER_HOST.to_string()
}

pub(crate) fn server_port() -> u16 {
    SERVER_PORT
}
