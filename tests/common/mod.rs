//! Shared fixtures: a scripted model and helpers for a mocked JSON-RPC node.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use ethers_core::abi::{encode, Token};
use mockito::{mock, Matcher, Mock};
use uniswap_v4_agent::{
    actions::AgentRuntime,
    blockchain::ChainRegistry,
    config::Config,
    error::ModelError,
    llm::{ModelType, TextModel},
};

/// Answers each prompt with the reply registered for the first tag the
/// prompt asks for. Unknown prompts get an empty response block.
#[derive(Default)]
pub struct ScriptedModel {
    replies: Vec<(&'static str, String)>,
    overloaded: bool,
}

impl ScriptedModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn overloaded() -> Self {
        Self {
            replies: Vec::new(),
            overloaded: true,
        }
    }

    fn with(mut self, tag: &'static str, body: String) -> Self {
        self.replies.push((tag, format!("<response>{}</response>", body)));
        self
    }

    pub fn pool_id(self, id: &str) -> Self {
        self.with("<poolId>", format!("<poolId>{}</poolId>", id))
    }

    pub fn position_id(self, id: &str) -> Self {
        self.with("<positionId>", format!("<positionId>{}</positionId>", id))
    }

    pub fn chain_id(self, id: &str) -> Self {
        self.with("<chainId>", format!("<chainId>{}</chainId>", id))
    }

    pub fn starting_price(self, price: &str) -> Self {
        self.with("<startingPrice>", format!("<startingPrice>{}</startingPrice>", price))
    }

    pub fn pool_key(self, currency0: &str, currency1: &str, fee: &str, tick_spacing: &str, hooks: &str) -> Self {
        self.with(
            "<currency0>",
            format!(
                "<currency0>{}</currency0><currency1>{}</currency1><fee>{}</fee><tickSpacing>{}</tickSpacing><hooks>{}</hooks>",
                currency0, currency1, fee, tick_spacing, hooks
            ),
        )
    }
}

#[async_trait]
impl TextModel for ScriptedModel {
    async fn use_model(&self, _model_type: ModelType, prompt: &str) -> Result<String, ModelError> {
        if self.overloaded {
            return Err(ModelError::Overloaded);
        }
        Ok(self
            .replies
            .iter()
            .find(|(tag, _)| prompt.contains(tag))
            .map(|(_, reply)| reply.clone())
            .unwrap_or_else(|| "<response></response>".to_string()))
    }
}

pub const ZERO: &str = "0x0000000000000000000000000000000000000000";
pub const USDC: &str = "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48";

/// Config with Ethereum pointed at the mock node and Base left unconfigured.
pub fn mock_config() -> Config {
    let mut config = Config::default();
    config.provider_urls.insert(1, mockito::server_url());
    config
}

pub fn runtime(model: ScriptedModel) -> AgentRuntime {
    let registry = ChainRegistry::from_config(&mock_config()).expect("registry");
    AgentRuntime::new(Arc::new(model), registry)
}

/// Mocks an `eth_call` whose calldata contains every fragment in `calldata`.
pub fn mock_eth_call(calldata: &[&str], outputs: &[Token]) -> Mock {
    let mut matchers = vec![Matcher::Regex("eth_call".to_string())];
    matchers.extend(calldata.iter().map(|f| Matcher::Regex(f.to_lowercase())));
    mock("POST", "/")
        .match_body(Matcher::AllOf(matchers))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(format!(
            r#"{{"jsonrpc":"2.0","id":1,"result":"0x{}"}}"#,
            hex::encode(encode(outputs))
        ))
        .create()
}

/// Mocks a JSON-RPC method whose body contains every fragment in `body`,
/// answering with a raw JSON `result`.
pub fn mock_rpc(method: &str, body: &[&str], result: &str) -> Mock {
    let mut matchers = vec![Matcher::Regex(format!("\"{}\"", method))];
    matchers.extend(body.iter().map(|f| Matcher::Regex(f.to_lowercase())));
    mock("POST", "/")
        .match_body(Matcher::AllOf(matchers))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(format!(r#"{{"jsonrpc":"2.0","id":1,"result":{}}}"#, result))
        .create()
}

/// Mocks an `eth_call` the node rejects.
pub fn mock_eth_call_revert(calldata: &str) -> Mock {
    mock("POST", "/")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex("eth_call".to_string()),
            Matcher::Regex(calldata.to_lowercase()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32000,"message":"execution reverted"}}"#)
        .create()
}
