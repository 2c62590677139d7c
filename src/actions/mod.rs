//! # Actions
//!
//! The agent-runtime action contract and the Uniswap v4 actions built on it.
//!
//! Every handler follows the same shape: extract fields from the message,
//! validate them, resolve the chain, call the contract, format a reply. A
//! recoverable failure is reported through the callback and the handler
//! returns `success: false`; anything else becomes an [`ActionError`].
//!
//! - `GET_POOL_LIQUIDITY` - total liquidity of a pool
//! - `GET_POOL_STATE` - sqrtPriceX96, tick, protocol and LP fees
//! - `GET_POOL_KEYS` - currency0, currency1, fee, tickSpacing, hooks
//! - `GET_POSITION_INFO_WITH_POSITION_ID` - liquidity and fee growth of a position
//! - `CALCULATE_POOL_ID` - pool id derived from a pool key
//! - `CREATE_POOL` - initialize a new pool on the pool manager

use std::sync::Arc;

use async_trait::async_trait;
use secrecy::SecretString;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::warn;

use crate::blockchain::ChainRegistry;
use crate::blockchain::ChainEntry;
use crate::error::{ActionError, ExtractionError};
use crate::llm::TextModel;

pub mod calculate_pool_id;
pub mod create_pool;
pub mod get_pool_keys;
pub mod get_pool_liquidity;
pub mod get_pool_state;
pub mod get_position_info;

pub use calculate_pool_id::CalculatePoolIdAction;
pub use create_pool::CreatePoolAction;
pub use get_pool_keys::GetPoolKeysAction;
pub use get_pool_liquidity::GetPoolLiquidityAction;
pub use get_pool_state::GetPoolStateAction;
pub use get_position_info::GetPositionInfoAction;

/// Incoming chat message.
#[derive(Debug, Clone, Default)]
pub struct Memory {
    pub text: Option<String>,
}

impl Memory {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }

    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }
}

/// A reply handed to the response callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Content {
    pub text: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<String>,
}

impl Content {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            actions: Vec::new(),
        }
    }

    pub fn from_action(text: impl Into<String>, action: &str) -> Self {
        Self {
            text: text.into(),
            actions: vec![action.to_string()],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActionResult {
    pub success: bool,
}

impl ActionResult {
    pub fn success() -> Self {
        Self { success: true }
    }

    pub fn failure() -> Self {
        Self { success: false }
    }
}

/// One turn of an example conversation.
#[derive(Debug, Clone, Copy)]
pub struct ActionExample {
    pub name: &'static str,
    pub text: &'static str,
    pub action: Option<&'static str>,
}

/// Receives the replies an action produces.
#[async_trait]
pub trait HandlerCallback: Send + Sync {
    async fn call(&self, content: Content) -> anyhow::Result<()>;
}

/// Callback that keeps every reply in memory.
#[derive(Debug, Default)]
pub struct CollectingCallback {
    responses: Mutex<Vec<Content>>,
}

impl CollectingCallback {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn responses(&self) -> Vec<Content> {
        self.responses.lock().await.clone()
    }
}

#[async_trait]
impl HandlerCallback for CollectingCallback {
    async fn call(&self, content: Content) -> anyhow::Result<()> {
        self.responses.lock().await.push(content);
        Ok(())
    }
}

/// Capabilities the host hands to every action.
pub struct AgentRuntime {
    pub model: Arc<dyn TextModel>,
    pub registry: ChainRegistry,
    /// Signs pool-creation transactions.
    pub signer_key: Option<SecretString>,
}

impl AgentRuntime {
    pub fn new(model: Arc<dyn TextModel>, registry: ChainRegistry) -> Self {
        Self {
            model,
            registry,
            signer_key: None,
        }
    }

    pub fn with_signer_key(mut self, key: Option<SecretString>) -> Self {
        self.signer_key = key;
        self
    }
}

#[async_trait]
pub trait Action: Send + Sync {
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    fn examples(&self) -> &'static [&'static [ActionExample]] {
        &[]
    }

    /// Whether the action applies to the message. Every action here accepts
    /// any message and leaves rejection to the handler.
    async fn validate(&self, _runtime: &AgentRuntime, _message: &Memory) -> bool {
        true
    }

    async fn handler(
        &self,
        runtime: &AgentRuntime,
        message: &Memory,
        callback: &dyn HandlerCallback,
    ) -> Result<ActionResult, ActionError>;
}

/// Reports a recoverable failure and ends the handler.
pub(crate) async fn reply_error(
    callback: &dyn HandlerCallback,
    text: String,
) -> anyhow::Result<ActionResult> {
    warn!("{}", text);
    callback.call(Content::text(text)).await?;
    Ok(ActionResult::failure())
}

/// A chain without a provider URL cannot be queried.
pub(crate) fn require_provider(chain: &ChainEntry) -> Result<(), ExtractionError> {
    if chain.provider_url.is_none() {
        return Err(ExtractionError::MissingProvider(chain.name.clone()));
    }
    Ok(())
}
