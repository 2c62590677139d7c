use crate::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;

// Reports liveness and which chains have a provider configured.
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let chains: Vec<_> = state
        .runtime
        .registry
        .chains()
        .iter()
        .map(|c| json!({ "chainId": c.chain_id, "name": c.name, "providerConfigured": c.provider_url.is_some() }))
        .collect();
    Json(json!({
        "status": "ok",
        "plugin": state.plugin.name,
        "chains": chains,
    }))
}
