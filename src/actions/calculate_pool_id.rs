// src/actions/calculate_pool_id.rs

use async_trait::async_trait;
use tracing::info;

use super::{
    reply_error, Action, ActionExample, ActionResult, AgentRuntime, Content, HandlerCallback,
    Memory,
};
use crate::blockchain::models::{PoolKey, TruncatedPoolId};
use crate::error::ActionError;
use crate::llm::extract;

pub const NAME: &str = "CALCULATE_POOL_ID";

pub struct CalculatePoolIdAction;

/// The 25-byte id the position manager uses for `key`: keccak-256 of the
/// ABI-encoded key, truncated to its leading 25 bytes.
pub fn derive_id(key: &PoolKey) -> TruncatedPoolId {
    key.truncated_pool_id()
}

impl CalculatePoolIdAction {
    async fn run(
        &self,
        runtime: &AgentRuntime,
        message: &Memory,
        callback: &dyn HandlerCallback,
    ) -> anyhow::Result<ActionResult> {
        let key = match extract::extract_pool_key(runtime.model.as_ref(), message.text()).await {
            Ok(key) => key,
            Err(e) => return reply_error(callback, format!("Error calculating poolId. {}", e)).await,
        };

        let truncated = derive_id(&key);
        let full = key.pool_id();
        info!("Derived pool id {} from {:?}", full, key);

        callback
            .call(Content::from_action(
                format!(
                    "The poolId is {}. The full 32-byte poolId used by the state view is {}.",
                    truncated, full
                ),
                NAME,
            ))
            .await?;
        Ok(ActionResult::success())
    }
}

#[async_trait]
impl Action for CalculatePoolIdAction {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Calculate the id of a pool using pool keys: currency0, currency1, fee, tickSpacing, hooks"
    }

    fn examples(&self) -> &'static [&'static [ActionExample]] {
        &[&[
            ActionExample {
                name: "{{user1}}",
                text: "What is the poolId for the pool keys: currency0: *currency0*, currency1: *currency1*, fee: *fee*, tickSpacing: *tickSpacing*, hooks: *hooks*?",
                action: None,
            },
            ActionExample {
                name: "{{agent}}",
                text: "",
                action: Some(NAME),
            },
        ]]
    }

    async fn handler(
        &self,
        runtime: &AgentRuntime,
        message: &Memory,
        callback: &dyn HandlerCallback,
    ) -> Result<ActionResult, ActionError> {
        self.run(runtime, message, callback)
            .await
            .map_err(|e| ActionError::fatal("Error calculating poolId.", e))
    }
}
