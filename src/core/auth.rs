//! Bearer tokens for the hosted search and model APIs.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::core::config::AuthConfig;
use crate::core::errors::ServiceError;

const TOKEN_PATH: &str = "/computeMetadata/v1/instance/service-accounts/default/token";

#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn access_token(&self) -> Result<String, ServiceError>;
}

/// Picks the token source described by `config`.
pub fn token_source(config: &AuthConfig, client: Client) -> Arc<dyn TokenSource> {
    match config.access_token.as_deref().map(str::trim) {
        Some(token) if !token.is_empty() => Arc::new(StaticToken::new(token)),
        _ => Arc::new(MetadataServerToken::new(&config.metadata_url, client)),
    }
}

pub struct StaticToken {
    token: String,
}

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl TokenSource for StaticToken {
    async fn access_token(&self) -> Result<String, ServiceError> {
        Ok(self.token.clone())
    }
}

/// Fetches the default service account token from the instance metadata
/// server on every call.
pub struct MetadataServerToken {
    url: String,
    client: Client,
}

#[derive(Deserialize)]
struct MetadataTokenResponse {
    access_token: String,
}

impl MetadataServerToken {
    pub fn new(base_url: &str, client: Client) -> Self {
        Self {
            url: format!("{}{}", base_url.trim_end_matches('/'), TOKEN_PATH),
            client,
        }
    }
}

#[async_trait]
impl TokenSource for MetadataServerToken {
    async fn access_token(&self) -> Result<String, ServiceError> {
        let res = self
            .client
            .get(&self.url)
            .header("Metadata-Flavor", "Google")
            .send()
            .await
            .map_err(|e| ServiceError::Auth(format!("metadata server unreachable: {}", e)))?;

        if !res.status().is_success() {
            return Err(ServiceError::Auth(format!(
                "metadata server returned {}",
                res.status()
            )));
        }

        let payload: MetadataTokenResponse = res
            .json()
            .await
            .map_err(|e| ServiceError::Auth(format!("malformed token response: {}", e)))?;

        if payload.access_token.is_empty() {
            return Err(ServiceError::Auth("metadata server returned an empty token".to_string()));
        }
        Ok(payload.access_token)
    }
}
