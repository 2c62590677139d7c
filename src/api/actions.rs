use crate::{plugin::ActionSummary, AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

// Body of POST /actions/:name.
#[derive(Debug, Deserialize)]
pub struct RunActionInput {
    pub text: String,
}

pub fn create_actions_router() -> Router<AppState> {
    Router::new()
        .route("/actions", get(list_actions_handler))
        .route("/actions/:name", post(run_action_handler))
}

// GET /actions
pub async fn list_actions_handler(State(state): State<AppState>) -> Json<Vec<ActionSummary>> {
    Json(state.plugin.summaries())
}

// POST /actions/:name
pub async fn run_action_handler(
    Path(name): Path<String>,
    State(state): State<AppState>,
    Json(input): Json<RunActionInput>,
) -> impl IntoResponse {
    match state.plugin.run(&name, &state.runtime, &input.text).await {
        Ok(Some(run)) => (StatusCode::OK, Json(json!(run))).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": format!("Unknown action: {}", name) })),
        )
            .into_response(),
        Err(e) => {
            error!("Action {} failed: {:?}", name, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}
