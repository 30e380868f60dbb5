use super::defaults::SEARCH_MAX_PAGE_SIZE;
use super::types::{AppConfig, GroundingBackend};
use crate::core::errors::ConfigError;

pub fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.project_id.trim().is_empty() {
        return Err(ConfigError::Missing("project_id"));
    }
    validate_path_segment("project_id", &config.project_id)?;

    let search = &config.search;
    validate_url("search.endpoint", &search.endpoint)?;
    validate_path_segment("search.location", &search.location)?;
    validate_path_segment("search.collection_id", &search.collection_id)?;
    validate_path_segment("search.serving_config_id", &search.serving_config_id)?;
    if let Some(datastore_id) = &search.datastore_id {
        validate_path_segment("search.datastore_id", datastore_id)?;
    }
    if let Some(engine_id) = &search.engine_id {
        validate_path_segment("search.engine_id", engine_id)?;
    }
    if search.page_size == 0 || search.page_size > SEARCH_MAX_PAGE_SIZE {
        return Err(ConfigError::Invalid {
            field: "search.page_size",
            reason: format!("must be between 1 and {}", SEARCH_MAX_PAGE_SIZE),
        });
    }

    validate_path_segment("embedding.location", &config.embedding.location)?;
    validate_path_segment("embedding.publisher", &config.embedding.publisher)?;
    validate_path_segment("embedding.model", &config.embedding.model)?;
    if let Some(endpoint) = &config.embedding.endpoint {
        validate_url("embedding.endpoint", endpoint)?;
    }

    validate_path_segment("generation.location", &config.generation.location)?;
    validate_path_segment("generation.model", &config.generation.model)?;
    if let Some(endpoint) = &config.generation.endpoint {
        validate_url("generation.endpoint", endpoint)?;
    }

    validate_url("auth.metadata_url", &config.auth.metadata_url)?;
    validate_sql_identifier("vector_store.table", &config.vector_store.table)?;
    if config.vector_store.max_connections == 0 {
        return Err(ConfigError::Invalid {
            field: "vector_store.max_connections",
            reason: "must be at least 1".to_string(),
        });
    }

    for origin in &config.server.cors_allowed_origins {
        if origin.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "server.cors_allowed_origins",
                reason: "origins cannot be empty".to_string(),
            });
        }
    }

    match config.grounding.backend {
        GroundingBackend::SearchService => {}
        GroundingBackend::VectorStore => {
            let has_url = config
                .vector_store
                .database_url
                .as_deref()
                .map(|url| !url.trim().is_empty())
                .unwrap_or(false);
            if !has_url {
                return Err(ConfigError::Missing("vector_store.database_url"));
            }
        }
        GroundingBackend::AgentBuilder => {
            if search.engine_id.is_none() {
                return Err(ConfigError::Missing("search.engine_id"));
            }
        }
    }

    Ok(())
}

/// Identifiers interpolated into REST resource paths.
fn validate_path_segment(field: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Invalid {
            field,
            reason: "value cannot be empty".to_string(),
        });
    }
    if value.contains(['/', '?', '#', ' ']) {
        return Err(ConfigError::Invalid {
            field,
            reason: format!("'{}' is not a valid resource identifier", value),
        });
    }
    Ok(())
}

fn validate_url(field: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.starts_with("http://") || value.starts_with("https://") {
        return Ok(());
    }
    Err(ConfigError::Invalid {
        field,
        reason: format!("'{}' must be an http(s) URL", value),
    })
}

/// The table name is spliced into SQL text, so only plain identifiers pass.
fn validate_sql_identifier(field: &'static str, value: &str) -> Result<(), ConfigError> {
    let mut chars = value.chars();
    let valid_start = chars
        .next()
        .map(|c| c.is_ascii_alphabetic() || c == '_')
        .unwrap_or(false);
    if valid_start && chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Ok(());
    }
    Err(ConfigError::Invalid {
        field,
        reason: format!("'{}' is not a plain SQL identifier", value),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> AppConfig {
        AppConfig {
            project_id: "demo".to_string(),
            ..AppConfig::default()
        }
    }

    #[test]
    fn default_search_service_config_is_valid() {
        assert!(validate_config(&base()).is_ok());
    }

    #[test]
    fn vector_store_requires_database_url() {
        let mut config = base();
        config.grounding.backend = GroundingBackend::VectorStore;
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::Missing("vector_store.database_url"))
        ));

        config.vector_store.database_url = Some("postgres://localhost/manuals".to_string());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn agent_builder_requires_engine_id() {
        let mut config = base();
        config.grounding.backend = GroundingBackend::AgentBuilder;
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::Missing("search.engine_id"))
        ));

        config.search.engine_id = Some("car-manual-app".to_string());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn table_name_must_be_identifier() {
        let mut config = base();
        config.vector_store.table = "embeddings; DROP TABLE users".to_string();
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::Invalid { field: "vector_store.table", .. })
        ));

        config.vector_store.table = "manual_chunks_v2".to_string();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn page_size_is_bounded() {
        let mut config = base();
        config.search.page_size = 0;
        assert!(validate_config(&config).is_err());
        config.search.page_size = 101;
        assert!(validate_config(&config).is_err());
        config.search.page_size = 100;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn resource_ids_cannot_contain_slashes() {
        let mut config = base();
        config.search.datastore_id = Some("a/b".to_string());
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::Invalid { field: "search.datastore_id", .. })
        ));
    }
}
