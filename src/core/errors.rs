use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a call to one of the hosted collaborators (search, embedding,
/// generation, vector store, token endpoint).
///
/// Every variant renders a non-empty message: the generation failure text is
/// returned to the chat caller as-is.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{service} request failed: {source}")]
    Transport {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{service} returned {status}: {body}")]
    Status {
        service: &'static str,
        status: StatusCode,
        body: String,
    },

    #[error("{service} response could not be decoded: {reason}")]
    Decode {
        service: &'static str,
        reason: String,
    },

    #[error("access token unavailable: {0}")]
    Auth(String),

    #[error("vector store query failed: {0}")]
    Database(#[from] sqlx::Error),

    #[error("{0} is not configured")]
    Unconfigured(&'static str),
}

impl ServiceError {
    pub fn transport(service: &'static str) -> impl FnOnce(reqwest::Error) -> Self {
        move |source| ServiceError::Transport { service, source }
    }

    pub fn decode<R: Into<String>>(service: &'static str, reason: R) -> Self {
        ServiceError::Decode {
            service,
            reason: reason.into(),
        }
    }
}

/// Rejected configuration. Fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid config: {0}")]
    Shape(#[from] serde_json::Error),

    #[error("missing required config value: {0}")]
    Missing(&'static str),

    #[error("invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_error_names_service_and_reason() {
        let err = ServiceError::decode("search", "results[0].document missing");
        assert_eq!(
            err.to_string(),
            "search response could not be decoded: results[0].document missing"
        );
    }

    #[test]
    fn status_error_message_is_never_empty() {
        let err = ServiceError::Status {
            service: "generation",
            status: StatusCode::FORBIDDEN,
            body: "Forbidden".to_string(),
        };
        assert!(err.to_string().contains("403"));
    }
}
