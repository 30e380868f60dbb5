use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::state::AppState;

pub const WELCOME: &str = "Welcome to the car manual chat backend API!";

pub async fn index() -> &'static str {
    tracing::info!("GET /");
    WELCOME
}

pub async fn health() -> &'static str {
    tracing::info!("GET /health");
    "ok"
}

pub async fn get_status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "project_id": state.config.project_id,
        "grounding_backend": state.pipeline.grounding_backend(),
        "generation_model": state.pipeline.generation_model(),
    }))
}
