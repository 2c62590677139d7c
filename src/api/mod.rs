//! # API Module
//!
//! HTTP API handlers for the Uniswap v4 agent.
//!
//! ## Available Endpoints
//!
//! - `GET /health` - liveness and configured chains
//! - `GET /actions` - registered actions with their descriptions
//! - `POST /actions/:name` - run an action on `{ "text": "..." }`
//! - `POST /rpc` - JSON-RPC forwarded to the MCP dispatcher

pub mod actions;
pub mod health;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    mcp::{
        handler::handle_mcp_request,
        protocol::{error_codes, Request, Response},
    },
    AppState,
};

/// The full application router, with every endpoint nested under `/api`.
pub fn router(state: AppState) -> Router {
    let api_router = Router::new()
        .route("/health", get(health::health_handler))
        .merge(actions::create_actions_router())
        // JSON-RPC endpoint for MCP tool calls
        .route("/rpc", post(rpc_handler));

    Router::new()
        .nest("/api", api_router)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

// Forward JSON-RPC requests over HTTP to the MCP handler
async fn rpc_handler(State(state): State<AppState>, Json(req): Json<Request>) -> Json<Response> {
    match handle_mcp_request(req, state).await {
        Some(resp) => Json(resp),
        None => Json(Response::error(
            serde_json::Value::Null,
            error_codes::INVALID_REQUEST,
            "Notifications are not supported over HTTP".into(),
        )),
    }
}
