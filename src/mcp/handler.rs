//! # MCP Handler Module
//!
//! Implements the Model Context Protocol for the Uniswap v4 agent. Each
//! registered action is exposed as one tool taking a single free-text
//! `text` argument; the action pulls its parameters out of that text.
//!
//! ## Supported Tools
//!
//! - `GET_POOL_LIQUIDITY`
//! - `GET_POOL_STATE`
//! - `GET_POOL_KEYS`
//! - `GET_POSITION_INFO_WITH_POSITION_ID`
//! - `CALCULATE_POOL_ID`
//! - `CREATE_POOL`

use std::error::Error;

use serde_json::{json, Value};
use tracing::{error, info};

use crate::{
    error::ActionError,
    mcp::protocol::{error_codes, Request, Response},
    plugin::ActionRun,
    utils, AppState,
};

// Helper: produce a result Value that always contains a text content array
// and preserves structured data for JSON-friendly clients.
fn make_texty_result(text: String, payload: Value) -> Value {
    let content = json!([{ "type": "text", "text": text }]);
    match payload {
        Value::Object(mut map) => {
            if !map.contains_key("content") {
                map.insert("content".into(), content);
            }
            Value::Object(map)
        }
        other => json!({
            "data": other,
            "content": content
        }),
    }
}

/// This is the main dispatcher for all incoming MCP requests.
pub async fn handle_mcp_request(req: Request, state: AppState) -> Option<Response> {
    info!("Handling MCP request for method: {}", req.method);

    if req.is_notification() {
        return None;
    }

    let response = match req.method.as_str() {
        "initialize" => handle_initialize(&req, &state),
        "tools/list" => handle_tools_list(&req, &state),
        "tools/call" => handle_tool_call(req, state).await,
        _ => Response::error(
            req.id,
            error_codes::METHOD_NOT_FOUND,
            format!("Method not found: {}", req.method),
        ),
    };

    Some(response)
}

/// Handles a 'tools/call' request by running the named action.
async fn handle_tool_call(req: Request, state: AppState) -> Response {
    let params = match req.params.as_ref() {
        Some(p) => p,
        None => {
            return Response::error(
                req.id,
                error_codes::INVALID_PARAMS,
                "Missing 'params' object".into(),
            )
        }
    };

    let tool_name = match params.get("name").and_then(|n| n.as_str()) {
        Some(name) => name,
        None => {
            return Response::error(
                req.id,
                error_codes::INVALID_PARAMS,
                "Missing 'name' field in params".into(),
            )
        }
    };

    let empty_args = json!({});
    let args = params.get("arguments").unwrap_or(&empty_args);
    let text = match utils::get_required_arg::<String>(args, "text", &req.id) {
        Ok(text) => text,
        Err(resp) => return resp,
    };

    match state.plugin.run(tool_name, &state.runtime, &text).await {
        Ok(Some(run)) => Response::success(req.id, run_to_result(run)),
        Ok(None) => Response::error(
            req.id,
            error_codes::METHOD_NOT_FOUND,
            format!("Tool not found: {}", tool_name),
        ),
        Err(e) => action_error_response(req.id, e),
    }
}

fn run_to_result(run: ActionRun) -> Value {
    let text = run
        .responses
        .iter()
        .map(|c| c.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");
    let mut result = make_texty_result(text, json!({ "success": run.success }));
    if !run.success {
        result["isError"] = json!(true);
    }
    result
}

fn action_error_response(id: Value, e: ActionError) -> Response {
    error!("Tool call failed: {:?}", e);
    let causes: Vec<String> = std::iter::successors(e.source(), |&cause| cause.source())
        .map(|cause| cause.to_string())
        .collect();
    Response::error_with_data(
        id,
        error_codes::INTERNAL_ERROR,
        e.to_string(),
        json!({ "causes": causes }),
    )
}

/// Handles the 'initialize' request.
fn handle_initialize(req: &Request, state: &AppState) -> Response {
    let server_info = json!({
        "name": state.plugin.name,
        "version": env!("CARGO_PKG_VERSION")
    });
    let capabilities = json!({ "tools": { "listChanged": false } });

    Response::success(
        req.id.clone(),
        json!({
            "serverInfo": server_info,
            "protocolVersion": "2025-06-18",
            "capabilities": capabilities,
            "instructions": state.plugin.description
        }),
    )
}

/// Handles the 'tools/list' request: one tool per registered action.
fn handle_tools_list(req: &Request, state: &AppState) -> Response {
    let tools: Vec<Value> = state
        .plugin
        .actions
        .iter()
        .map(|action| {
            json!({
                "name": action.name(),
                "description": action.description(),
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "text": {
                            "type": "string",
                            "description": "The user's request in natural language, including every value the action needs."
                        }
                    },
                    "required": ["text"],
                    "additionalProperties": false
                }
            })
        })
        .collect();

    Response::success(req.id.clone(), json!({ "tools": tools }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::Content;

    #[test]
    fn texty_result_wraps_non_objects() {
        let value = make_texty_result("hello".into(), json!([1, 2]));
        assert_eq!(value["data"], json!([1, 2]));
        assert_eq!(value["content"][0]["text"], "hello");
    }

    #[test]
    fn failed_run_is_marked_as_error() {
        let run = ActionRun {
            success: false,
            responses: vec![Content::text("Error calculating poolId. bad fee")],
        };
        let value = run_to_result(run);
        assert_eq!(value["success"], json!(false));
        assert_eq!(value["isError"], json!(true));
        assert_eq!(value["content"][0]["text"], "Error calculating poolId. bad fee");
    }

    #[test]
    fn fatal_error_keeps_cause_chain() {
        let err = ActionError::fatal("Error fetching pool state.", anyhow::anyhow!("connection refused"));
        let resp = action_error_response(json!(9), err);
        let error = resp.error.unwrap();
        assert_eq!(error.code, error_codes::INTERNAL_ERROR);
        assert_eq!(error.message, "Error fetching pool state.");
        assert_eq!(error.data.unwrap()["causes"][0], "connection refused");
    }
}
