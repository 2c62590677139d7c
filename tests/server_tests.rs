//! Tests for the MCP dispatcher and the HTTP router

mod common;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request as HttpRequest, StatusCode},
};
use common::*;
use serde_json::{json, Value};
use tower::ServiceExt;
use uniswap_v4_agent::{
    api,
    mcp::{
        handler::handle_mcp_request,
        protocol::{error_codes, Request},
    },
    AppState,
};

fn state(model: ScriptedModel) -> AppState {
    AppState::new(mock_config(), runtime(model))
}

fn rpc(id: Value, method: &str, params: Option<Value>) -> Request {
    Request {
        jsonrpc: "2.0".into(),
        id,
        method: method.into(),
        params,
    }
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn initialize_names_the_plugin() {
    let resp = handle_mcp_request(rpc(json!(1), "initialize", None), state(ScriptedModel::new()))
        .await
        .unwrap();
    let result = resp.result.unwrap();
    assert_eq!(result["serverInfo"]["name"], "plugin-uniswap");
    assert_eq!(result["capabilities"]["tools"]["listChanged"], json!(false));
}

#[tokio::test]
async fn tools_list_exposes_every_action() {
    let resp = handle_mcp_request(rpc(json!(2), "tools/list", None), state(ScriptedModel::new()))
        .await
        .unwrap();
    let tools = resp.result.unwrap()["tools"].as_array().unwrap().clone();
    let names: Vec<&str> = tools.iter().map(|t| t["name"].as_str().unwrap()).collect();

    assert_eq!(tools.len(), 6);
    assert!(names.contains(&"CREATE_POOL"));
    assert!(names.contains(&"GET_POSITION_INFO_WITH_POSITION_ID"));
    assert_eq!(tools[0]["inputSchema"]["required"], json!(["text"]));
}

#[tokio::test]
async fn notifications_get_no_response() {
    let resp = handle_mcp_request(rpc(Value::Null, "tools/list", None), state(ScriptedModel::new())).await;
    assert!(resp.is_none());
}

#[tokio::test]
async fn tools_call_runs_the_action() {
    let model = ScriptedModel::new().pool_key(ZERO, USDC, "500", "10", ZERO);
    let params = json!({ "name": "CALCULATE_POOL_ID", "arguments": { "text": "pool id for ETH/USDC 0.05%" } });
    let resp = handle_mcp_request(rpc(json!(3), "tools/call", Some(params)), state(model))
        .await
        .unwrap();

    let result = resp.result.unwrap();
    assert_eq!(result["success"], json!(true));
    assert!(result["content"][0]["text"].as_str().unwrap().starts_with("The poolId is 0x"));
}

#[tokio::test]
async fn tools_call_reports_recoverable_failure() {
    let model = ScriptedModel::new().pool_key(ZERO, USDC, "1500000", "10", ZERO);
    let params = json!({ "name": "CALCULATE_POOL_ID", "arguments": { "text": "fee 150%" } });
    let resp = handle_mcp_request(rpc(json!(4), "tools/call", Some(params)), state(model))
        .await
        .unwrap();

    let result = resp.result.unwrap();
    assert_eq!(result["success"], json!(false));
    assert_eq!(result["isError"], json!(true));
}

#[tokio::test]
async fn tools_call_validates_arguments() {
    let st = state(ScriptedModel::new());

    let missing_text = json!({ "name": "GET_POOL_STATE", "arguments": {} });
    let resp = handle_mcp_request(rpc(json!(5), "tools/call", Some(missing_text)), st.clone())
        .await
        .unwrap();
    assert_eq!(resp.error.unwrap().code, error_codes::INVALID_PARAMS);

    let unknown = json!({ "name": "SWAP", "arguments": { "text": "swap" } });
    let resp = handle_mcp_request(rpc(json!(6), "tools/call", Some(unknown)), st)
        .await
        .unwrap();
    assert_eq!(resp.error.unwrap().code, error_codes::METHOD_NOT_FOUND);
}

#[tokio::test]
async fn http_health_lists_chains() {
    let app = api::router(state(ScriptedModel::new()));
    let response = app
        .oneshot(HttpRequest::builder().uri("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["chains"].as_array().unwrap().len(), 5);
    // provider URLs stay private
    assert!(!body.to_string().contains(&mockito::server_url()));
}

#[tokio::test]
async fn http_lists_actions() {
    let app = api::router(state(ScriptedModel::new()));
    let response = app
        .oneshot(HttpRequest::builder().uri("/api/actions").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let body = body_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 6);
    assert_eq!(body[0]["name"], "GET_POOL_LIQUIDITY");
}

#[tokio::test]
async fn http_runs_action_by_name() {
    let model = ScriptedModel::new().pool_id("0x1234").chain_id("1");
    let app = api::router(state(model));
    let response = app
        .oneshot(
            HttpRequest::builder()
                .method(Method::POST)
                .uri("/api/actions/GET_POOL_STATE")
                .header("content-type", "application/json")
                .body(Body::from(json!({ "text": "state of 0x1234" }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], json!(false));
    assert!(body["responses"][0]["text"]
        .as_str()
        .unwrap()
        .starts_with("Error fetching pool state. Error validating poolId"));
}

#[tokio::test]
async fn http_unknown_action_is_not_found() {
    let app = api::router(state(ScriptedModel::new()));
    let response = app
        .oneshot(
            HttpRequest::builder()
                .method(Method::POST)
                .uri("/api/actions/SWAP")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"text":"swap"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn http_rpc_forwards_to_dispatcher() {
    let app = api::router(state(ScriptedModel::new()));
    let response = app
        .oneshot(
            HttpRequest::builder()
                .method(Method::POST)
                .uri("/api/rpc")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"jsonrpc":"2.0","id":7,"method":"tools/list"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    let body = body_json(response).await;
    assert_eq!(body["id"], json!(7));
    assert_eq!(body["result"]["tools"].as_array().unwrap().len(), 6);
}
