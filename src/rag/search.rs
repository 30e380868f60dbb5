//! Extractive-answer retrieval from the managed search service.
//!
//! Serves both the data-store search deployment and the agent-builder
//! deployment; they differ only in the serving config they address.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::store::{ContextJoin, GroundingSource, RetrievedSnippet};
use crate::core::auth::TokenSource;
use crate::core::config::SearchConfig;
use crate::core::errors::ServiceError;
use crate::core::http::post_json;

const SEARCH: &str = "search";

/// Resource that owns the serving config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchTarget {
    DataStore(String),
    Engine(String),
}

#[derive(Clone)]
pub struct ExtractiveSearchSource {
    name: &'static str,
    id_field: &'static str,
    url: Option<String>,
    page_size: u32,
    client: Client,
    tokens: Arc<dyn TokenSource>,
}

impl ExtractiveSearchSource {
    /// Search against `search.datastore_id`. A missing id leaves the source
    /// unconfigured: every call fails and the pipeline runs ungrounded.
    pub fn data_store(
        project_id: &str,
        config: &SearchConfig,
        client: Client,
        tokens: Arc<dyn TokenSource>,
    ) -> Self {
        let url = config.datastore_id.as_ref().map(|id| {
            serving_config_url(project_id, config, &SearchTarget::DataStore(id.clone()))
        });
        Self {
            name: "search_service",
            id_field: "search.datastore_id",
            url,
            page_size: config.page_size,
            client,
            tokens,
        }
    }

    /// Search through the agent-builder app `search.engine_id`.
    pub fn agent_builder(
        project_id: &str,
        config: &SearchConfig,
        client: Client,
        tokens: Arc<dyn TokenSource>,
    ) -> Self {
        let url = config.engine_id.as_ref().map(|id| {
            serving_config_url(project_id, config, &SearchTarget::Engine(id.clone()))
        });
        Self {
            name: "agent_builder",
            id_field: "search.engine_id",
            url,
            page_size: config.page_size,
            client,
            tokens,
        }
    }
}

#[async_trait]
impl GroundingSource for ExtractiveSearchSource {
    fn name(&self) -> &str {
        self.name
    }

    fn context_join(&self) -> ContextJoin {
        ContextJoin::Concatenate
    }

    async fn retrieve(&self, query: &str) -> Result<Vec<RetrievedSnippet>, ServiceError> {
        let Some(url) = &self.url else {
            return Err(ServiceError::Unconfigured(self.id_field));
        };

        let body = SearchRequest::new(query, self.page_size);
        let response: SearchResponse =
            post_json(&self.client, self.tokens.as_ref(), SEARCH, url, &body).await?;

        tracing::info!("Found {} search results", response.results.len());
        response
            .into_snippets()
            .map_err(|reason| ServiceError::decode(SEARCH, reason))
    }
}

pub fn serving_config_url(
    project_id: &str,
    config: &SearchConfig,
    target: &SearchTarget,
) -> String {
    let owner = match target {
        SearchTarget::DataStore(id) => format!("dataStores/{}", id),
        SearchTarget::Engine(id) => format!("engines/{}", id),
    };
    format!(
        "{}/v1/projects/{}/locations/{}/collections/{}/{}/servingConfigs/{}:search",
        config.endpoint.trim_end_matches('/'),
        project_id,
        config.location,
        config.collection_id,
        owner,
        config.serving_config_id
    )
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchRequest {
    query: String,
    page_size: u32,
    content_search_spec: ContentSearchSpec,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ContentSearchSpec {
    extractive_content_spec: ExtractiveContentSpec,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExtractiveContentSpec {
    max_extractive_answer_count: u32,
}

impl SearchRequest {
    fn new(query: &str, page_size: u32) -> Self {
        Self {
            query: query.to_string(),
            page_size,
            content_search_spec: ContentSearchSpec {
                extractive_content_spec: ExtractiveContentSpec {
                    max_extractive_answer_count: 1,
                },
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    #[serde(default)]
    document: Option<SearchDocument>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchDocument {
    #[serde(default)]
    derived_struct_data: Option<DerivedStructData>,
}

#[derive(Debug, Deserialize)]
struct DerivedStructData {
    #[serde(default)]
    extractive_answers: Option<Vec<ExtractiveAnswer>>,
}

#[derive(Debug, Deserialize)]
struct ExtractiveAnswer {
    #[serde(default)]
    content: Option<String>,
}

impl SearchResponse {
    /// First extractive answer of every result, in service order. Any result
    /// without one fails the whole response.
    fn into_snippets(self) -> Result<Vec<RetrievedSnippet>, String> {
        self.results
            .into_iter()
            .enumerate()
            .map(|(idx, result)| {
                let data = result
                    .document
                    .ok_or_else(|| format!("results[{}].document missing", idx))?
                    .derived_struct_data
                    .ok_or_else(|| format!("results[{}].document.derivedStructData missing", idx))?;
                let answer = data
                    .extractive_answers
                    .ok_or_else(|| format!("results[{}] has no extractive_answers", idx))?
                    .into_iter()
                    .next()
                    .ok_or_else(|| format!("results[{}].extractive_answers is empty", idx))?;
                let content = answer.content.ok_or_else(|| {
                    format!("results[{}].extractive_answers[0].content missing", idx)
                })?;
                Ok(RetrievedSnippet::new(content))
            })
            .collect()
    }
}
