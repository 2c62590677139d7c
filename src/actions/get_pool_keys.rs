// src/actions/get_pool_keys.rs

use async_trait::async_trait;
use tracing::info;

use super::{
    reply_error, require_provider, Action, ActionExample, ActionResult, AgentRuntime, Content,
    HandlerCallback, Memory,
};
use crate::blockchain::{
    abi, bind_contract, build_client,
    models::{fee_to_percent, PairNames, PoolKey},
    services::{erc20, position_manager},
};
use crate::error::ActionError;
use crate::llm::extract;

pub const NAME: &str = "GET_POOL_KEYS";

pub struct GetPoolKeysAction;

/// Pool key listing shared by GET_POOL_KEYS and CREATE_POOL.
pub fn format_pool_key(key: &PoolKey, names: &PairNames) -> String {
    format!(
        "currency0: {:?} ({})\ncurrency1: {:?} ({})\nfee: {}\ntickSpacing: {}\nhooks: {:?}",
        key.currency0,
        names.currency0,
        key.currency1,
        names.currency1,
        fee_to_percent(key.fee),
        key.tick_spacing,
        key.hooks,
    )
}

impl GetPoolKeysAction {
    async fn run(
        &self,
        runtime: &AgentRuntime,
        message: &Memory,
        callback: &dyn HandlerCallback,
    ) -> anyhow::Result<ActionResult> {
        let text = message.text();
        let model = runtime.model.as_ref();

        let (pool_id, chain) = tokio::join!(
            extract::extract_pool_id(model, text),
            extract::extract_chain(model, &runtime.registry, text),
        );

        let pool_id = match pool_id {
            Ok(id) => id,
            Err(e) => {
                return reply_error(
                    callback,
                    format!("Error fetching pool keys. Error validating poolId: {}", e),
                )
                .await
            }
        };
        let chain = match chain.and_then(|c| require_provider(c).map(|_| c)) {
            Ok(c) => c,
            Err(e) => return reply_error(callback, format!("Error fetching pool keys: {}", e)).await,
        };

        // The position manager keys pools by the leading 25 bytes of the id.
        let truncated = pool_id.truncated();
        info!("Fetching pool keys of {} on {}", truncated, chain.name);

        let client = build_client(chain)?;
        let position_manager =
            bind_contract(chain.position_manager, abi::position_manager()?, client.clone());
        let key = position_manager::get_pool_keys(&position_manager, truncated).await?;
        let names = erc20::get_pair_names(client, chain, key.currency0, key.currency1).await?;

        callback
            .call(Content::from_action(
                format!("The pool keys are:\n\n{}", format_pool_key(&key, &names)),
                NAME,
            ))
            .await?;
        Ok(ActionResult::success())
    }
}

#[async_trait]
impl Action for GetPoolKeysAction {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Get the keys of a v4 pool: currency0, currency1, fee, tickSpacing, hooks"
    }

    fn examples(&self) -> &'static [&'static [ActionExample]] {
        &[&[
            ActionExample {
                name: "{{user1}}",
                text: "What are the keys of the pool *poolId* on Avalanche?",
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
            .map_err(|e| ActionError::fatal("Error fetching pool keys.", e))
    }
}
