use axum::{extract::{Query, State}, Json};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use super::bot::ReplyEngine;
use crate::client::Reply;

/// Shared by the reply routes
pub struct AppState {
    pub engine: ReplyEngine,
    /// Name of the query parameter carrying the message
    pub query_param: String,
}

/// Returns a health check response
pub async fn health_check() -> &'static str {
    info!("Health check endpoint called");
    "SilverBot is running!"
}

/// Answers one chat message. A missing message parameter is treated as empty text.
pub async fn get_response(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Reply> {
    let msg = params.get(&state.query_param).map(String::as_str).unwrap_or_default();
    info!("Reply endpoint called with {} chars", msg.chars().count());

    Json(state.engine.reply(msg))
}
