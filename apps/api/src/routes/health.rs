use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::llm_client::gemini::MODEL;
use crate::state::AppState;

/// GET /health
/// Returns service status, version and how many API credentials are loaded.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "tailor-api",
        "model": MODEL,
        "credentials": state.dispatcher.pool().len()
    }))
}
