use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use super::defaults::{CONFIG_PATH_ENV, DEFAULT_CONFIG_FILE};
use super::types::AppConfig;
use super::validation::validate_config;
use crate::core::errors::ConfigError;

/// How an environment variable maps onto the config tree.
enum EnvKind {
    Text,
    Port,
}

const ENV_OVERRIDES: [(&str, &[&str], EnvKind); 11] = [
    ("GOOGLE_CLOUD_PROJECT", &["project_id"], EnvKind::Text),
    ("PROJECT_ID", &["project_id"], EnvKind::Text),
    ("GROUNDING_BACKEND", &["grounding", "backend"], EnvKind::Text),
    ("DATASTORE_ID", &["search", "datastore_id"], EnvKind::Text),
    ("ENGINE_ID", &["search", "engine_id"], EnvKind::Text),
    ("DATABASE_URL", &["vector_store", "database_url"], EnvKind::Text),
    ("GOOGLE_ACCESS_TOKEN", &["auth", "access_token"], EnvKind::Text),
    ("HOST", &["server", "host"], EnvKind::Text),
    ("PORT", &["server", "port"], EnvKind::Port),
    ("LOG_DIR", &["logging", "log_dir"], EnvKind::Text),
    ("METADATA_URL", &["auth", "metadata_url"], EnvKind::Text),
];

/// Loads the process configuration from the config file and the process
/// environment.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let vars: HashMap<String, String> = env::vars().collect();
    let path = config_path(&vars);
    load_config_from(path.as_deref(), &vars)
}

/// Loads configuration from an optional YAML file overlaid with `vars`.
///
/// Later entries of the override table win, so `PROJECT_ID` beats
/// `GOOGLE_CLOUD_PROJECT` when both are set.
pub fn load_config_from(
    path: Option<&Path>,
    vars: &HashMap<String, String>,
) -> Result<AppConfig, ConfigError> {
    let file_config = match path {
        Some(path) => load_yaml_file(path)?,
        None => Value::Object(Map::new()),
    };
    let env_config = env_overrides(vars)?;
    let merged = deep_merge(&file_config, &env_config);

    let config: AppConfig = serde_json::from_value(merged)?;
    validate_config(&config)?;
    Ok(config)
}

fn config_path(vars: &HashMap<String, String>) -> Option<PathBuf> {
    if let Some(path) = vars.get(CONFIG_PATH_ENV).filter(|p| !p.trim().is_empty()) {
        return Some(PathBuf::from(path));
    }

    let local = PathBuf::from(DEFAULT_CONFIG_FILE);
    local.exists().then_some(local)
}

fn load_yaml_file(path: &Path) -> Result<Value, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;

    if contents.trim().is_empty() {
        return Ok(Value::Object(Map::new()));
    }

    let value: Value = serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })?;

    match value {
        Value::Object(_) => Ok(value),
        Value::Null => Ok(Value::Object(Map::new())),
        _ => Err(ConfigError::Invalid {
            field: "root",
            reason: "expected a mapping".to_string(),
        }),
    }
}

fn env_overrides(vars: &HashMap<String, String>) -> Result<Value, ConfigError> {
    let mut overrides = Value::Object(Map::new());

    for (name, path, kind) in ENV_OVERRIDES.iter() {
        // blank values count as unset
        let Some(raw) = vars.get(*name).filter(|v| !v.trim().is_empty()) else {
            continue;
        };
        let value = match kind {
            EnvKind::Text => Value::String(raw.clone()),
            EnvKind::Port => {
                let port = raw.trim().parse::<u16>().map_err(|_| ConfigError::Invalid {
                    field: "server.port",
                    reason: format!("'{}' is not a port number", raw),
                })?;
                Value::from(port)
            }
        };
        ensure_object_path(&mut overrides, path, value);
    }

    Ok(overrides)
}

fn ensure_object_path(config: &mut Value, path: &[&str], value: Value) {
    if path.is_empty() {
        return;
    }

    let mut current = config;
    for (index, key) in path.iter().enumerate() {
        if index == path.len() - 1 {
            if let Some(map) = current.as_object_mut() {
                map.insert(key.to_string(), value);
            }
            return;
        }

        if !current.get(*key).map(|v| v.is_object()).unwrap_or(false) {
            let Some(map) = current.as_object_mut() else {
                return;
            };
            map.insert((*key).to_string(), Value::Object(Map::new()));
        }

        let Some(next) = current.get_mut(*key) else {
            return;
        };
        current = next;
    }
}

fn deep_merge(base: &Value, override_value: &Value) -> Value {
    match (base, override_value) {
        (Value::Object(base_map), Value::Object(override_map)) => {
            let mut merged: Map<String, Value> = base_map.clone();
            for (key, value) in override_map {
                let merged_value = match merged.get(key) {
                    Some(existing) => deep_merge(existing, value),
                    None => value.clone(),
                };
                merged.insert(key.clone(), merged_value);
            }
            Value::Object(merged)
        }
        _ => override_value.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{DistanceMetric, GroundingBackend};
    use serde_json::json;
    use std::io::Write;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn yaml_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn deep_merge_merges_objects_and_overrides_scalars() {
        let base = json!({
            "a": 1,
            "b": { "c": 2, "d": 3 },
            "arr": [1, 2]
        });
        let override_value = json!({
            "b": { "c": 99 },
            "arr": [3],
            "e": "x"
        });

        let merged = deep_merge(&base, &override_value);

        assert_eq!(
            merged,
            json!({
                "a": 1,
                "b": { "c": 99, "d": 3 },
                "arr": [3],
                "e": "x"
            })
        );
    }

    #[test]
    fn env_only_config_uses_defaults() {
        let config = load_config_from(None, &vars(&[("PROJECT_ID", "demo-project")])).unwrap();

        assert_eq!(config.project_id, "demo-project");
        assert_eq!(config.grounding.backend, GroundingBackend::SearchService);
        assert_eq!(config.search.location, "global");
        assert_eq!(config.search.collection_id, "default_collection");
        assert_eq!(config.search.serving_config_id, "default_search");
        assert_eq!(config.search.page_size, 10);
        assert_eq!(config.generation.model, "gemini-1.5-flash-001");
        assert_eq!(config.embedding.model, "textembedding-gecko@003");
        assert_eq!(config.server.port, 8080);
        assert!(config.search.datastore_id.is_none());
    }

    #[test]
    fn missing_project_id_is_rejected() {
        let err = load_config_from(None, &HashMap::new()).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("project_id")));

        let err = load_config_from(None, &vars(&[("PROJECT_ID", "   ")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("project_id")));
    }

    #[test]
    fn environment_overrides_file_values() {
        let file = yaml_file(
            "project_id: from-file\n\
             search:\n  datastore_id: manuals\n  page_size: 5\n\
             server:\n  port: 9000\n",
        );

        let config = load_config_from(
            Some(file.path()),
            &vars(&[("PROJECT_ID", "from-env"), ("PORT", "7000")]),
        )
        .unwrap();

        assert_eq!(config.project_id, "from-env");
        assert_eq!(config.search.datastore_id.as_deref(), Some("manuals"));
        assert_eq!(config.search.page_size, 5);
        assert_eq!(config.server.port, 7000);
    }

    #[test]
    fn project_id_prefers_explicit_variable() {
        let config = load_config_from(
            None,
            &vars(&[("GOOGLE_CLOUD_PROJECT", "ambient"), ("PROJECT_ID", "explicit")]),
        )
        .unwrap();
        assert_eq!(config.project_id, "explicit");
    }

    #[test]
    fn blank_variables_are_treated_as_unset() {
        let config =
            load_config_from(None, &vars(&[("PROJECT_ID", "demo"), ("DATASTORE_ID", "")])).unwrap();
        assert!(config.search.datastore_id.is_none());

        let config = load_config_from(
            None,
            &vars(&[("GOOGLE_CLOUD_PROJECT", "ambient"), ("PROJECT_ID", "  ")]),
        )
        .unwrap();
        assert_eq!(config.project_id, "ambient");
    }

    #[test]
    fn blank_variable_keeps_file_value() {
        let file = yaml_file("project_id: from-file\nsearch:\n  datastore_id: manuals\n");

        let config = load_config_from(
            Some(file.path()),
            &vars(&[("PROJECT_ID", ""), ("DATASTORE_ID", ""), ("PORT", "")]),
        )
        .unwrap();

        assert_eq!(config.project_id, "from-file");
        assert_eq!(config.search.datastore_id.as_deref(), Some("manuals"));
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn vector_store_section_parses() {
        let file = yaml_file(
            "project_id: p\n\
             grounding:\n  backend: vector_store\n\
             vector_store:\n  database_url: postgres://u:p@localhost/manuals\n  distance: cosine\n",
        );

        let config = load_config_from(Some(file.path()), &HashMap::new()).unwrap();

        assert_eq!(config.grounding.backend, GroundingBackend::VectorStore);
        assert_eq!(config.vector_store.distance, DistanceMetric::Cosine);
        assert_eq!(config.vector_store.table, "embeddings");
    }

    #[test]
    fn bad_port_is_rejected() {
        let err = load_config_from(None, &vars(&[("PROJECT_ID", "p"), ("PORT", "http")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "server.port", .. }));
    }

    #[test]
    fn unknown_backend_is_a_shape_error() {
        let err = load_config_from(
            None,
            &vars(&[("PROJECT_ID", "p"), ("GROUNDING_BACKEND", "web")]),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Shape(_)));
    }

    #[test]
    fn non_mapping_file_is_rejected() {
        let file = yaml_file("- just\n- a list\n");
        let err = load_config_from(Some(file.path()), &vars(&[("PROJECT_ID", "p")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "root", .. }));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = load_config_from(
            Some(Path::new("/nonexistent/manual-chat/config.yml")),
            &vars(&[("PROJECT_ID", "p")]),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
