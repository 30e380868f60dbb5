use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use tracing::Instrument;
use uuid::Uuid;

use crate::chat::ChatExchange;
use crate::state::AppState;

/// POST /chat. Always answers 200: backend failures show up in `response`.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(exchange): Json<ChatExchange>,
) -> Json<ChatExchange> {
    let span = tracing::info_span!("chat", request_id = %Uuid::new_v4());
    async move {
        tracing::info!("POST /chat ({} chars)", exchange.prompt.len());
        Json(state.pipeline.respond(exchange).await)
    }
    .instrument(span)
    .await
}
