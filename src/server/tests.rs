//! End-to-end tests of the HTTP surface over a real listener.

use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use crate::chat::{ChatExchange, ChatPipeline};
use crate::core::config::AppConfig;
use crate::core::errors::ServiceError;
use crate::llm::{ChatRequest, GenerationBackend};
use crate::rag::{ContextJoin, GroundingSource, RetrievedSnippet};
use crate::server::handlers::health::WELCOME;
use crate::server::router::router;
use crate::state::AppState;

struct ManualSnippets(Vec<&'static str>);

#[async_trait]
impl GroundingSource for ManualSnippets {
    fn name(&self) -> &str {
        "test_manual"
    }

    fn context_join(&self) -> ContextJoin {
        ContextJoin::Concatenate
    }

    async fn retrieve(&self, _query: &str) -> Result<Vec<RetrievedSnippet>, ServiceError> {
        Ok(self.0.iter().map(|t| RetrievedSnippet::new(*t)).collect())
    }
}

enum Model {
    Echo,
    Failing,
}

#[async_trait]
impl GenerationBackend for Model {
    fn model(&self) -> &str {
        "test-model"
    }

    async fn chat(&self, request: ChatRequest) -> Result<String, ServiceError> {
        match self {
            Model::Echo => Ok(request
                .messages
                .into_iter()
                .map(|m| m.content)
                .collect::<Vec<_>>()
                .join("\n")),
            Model::Failing => Err(ServiceError::Auth(
                "metadata server returned 404 Not Found".to_string(),
            )),
        }
    }
}

async fn spawn_app(model: Model, config: AppConfig) -> SocketAddr {
    let pipeline = ChatPipeline::new(
        Arc::new(ManualSnippets(vec![
            "Check tire pressure monthly.",
            "Recommended PSI is on the door sticker.",
        ])),
        Arc::new(model),
    );
    let state = AppState::with_pipeline(Arc::new(config), pipeline);
    let app = router(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn test_config() -> AppConfig {
    AppConfig {
        project_id: "demo".to_string(),
        ..AppConfig::default()
    }
}

#[tokio::test]
async fn index_and_health_return_plain_text() {
    let addr = spawn_app(Model::Echo, test_config()).await;
    let client = reqwest::Client::new();

    let index = client.get(format!("http://{}/", addr)).send().await.unwrap();
    assert_eq!(index.status(), 200);
    assert_eq!(index.text().await.unwrap(), WELCOME);

    let health = client
        .get(format!("http://{}/health", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(health.status(), 200);
    assert_eq!(health.text().await.unwrap(), "ok");
}

#[tokio::test]
async fn status_reports_backends() {
    let addr = spawn_app(Model::Echo, test_config()).await;

    let body: Value = reqwest::get(format!("http://{}/api/status", addr))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(
        body,
        json!({
            "status": "ok",
            "project_id": "demo",
            "grounding_backend": "test_manual",
            "generation_model": "test-model"
        })
    );
}

#[tokio::test]
async fn chat_returns_prompt_verbatim_with_grounded_answer() {
    let addr = spawn_app(Model::Echo, test_config()).await;
    let prompt = "  How do I check tire pressure?  ";

    let res = reqwest::Client::new()
        .post(format!("http://{}/chat", addr))
        .json(&json!({ "prompt": prompt }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    let exchange: ChatExchange = res.json().await.unwrap();
    assert_eq!(exchange.prompt, prompt);
    let reply = exchange.response.unwrap();
    assert!(reply.contains(prompt));
    assert!(reply.contains("Check tire pressure monthly.Recommended PSI is on the door sticker."));
}

#[tokio::test]
async fn empty_prompt_is_accepted() {
    let addr = spawn_app(Model::Echo, test_config()).await;

    let res = reqwest::Client::new()
        .post(format!("http://{}/chat", addr))
        .json(&json!({ "prompt": "" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    let exchange: ChatExchange = res.json().await.unwrap();
    assert_eq!(exchange.prompt, "");
    assert!(exchange.response.is_some());
}

#[tokio::test]
async fn generation_failure_is_a_200_with_error_text() {
    let addr = spawn_app(Model::Failing, test_config()).await;

    let res = reqwest::Client::new()
        .post(format!("http://{}/chat", addr))
        .json(&json!({ "prompt": "Where is the spare tire?" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    let exchange: ChatExchange = res.json().await.unwrap();
    assert_eq!(
        exchange.response.as_deref(),
        Some("access token unavailable: metadata server returned 404 Not Found")
    );
}

#[tokio::test]
async fn body_without_prompt_is_rejected() {
    let addr = spawn_app(Model::Echo, test_config()).await;

    let res = reqwest::Client::new()
        .post(format!("http://{}/chat", addr))
        .json(&json!({ "question": "missing prompt field" }))
        .send()
        .await
        .unwrap();

    assert!(res.status().is_client_error());
}

#[tokio::test]
async fn configured_cors_origin_is_echoed() {
    let mut config = test_config();
    config.server.cors_allowed_origins = vec!["http://localhost:4200".to_string()];
    let addr = spawn_app(Model::Echo, config).await;

    let res = reqwest::Client::new()
        .get(format!("http://{}/health", addr))
        .header("Origin", "http://localhost:4200")
        .send()
        .await
        .unwrap();

    assert_eq!(
        res.headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("http://localhost:4200")
    );
}
