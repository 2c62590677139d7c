// src/actions/get_pool_liquidity.rs

use async_trait::async_trait;
use tracing::info;

use super::{
    reply_error, require_provider, Action, ActionExample, ActionResult, AgentRuntime, Content,
    HandlerCallback, Memory,
};
use crate::blockchain::{abi, bind_contract, build_client, services::state_view};
use crate::error::ActionError;
use crate::llm::extract;

pub const NAME: &str = "GET_POOL_LIQUIDITY";

pub struct GetPoolLiquidityAction;

impl GetPoolLiquidityAction {
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
            Err(e) => return reply_error(callback, format!("Error fetching liquidity: {}", e)).await,
        };
        let chain = match chain.and_then(|c| require_provider(c).map(|_| c)) {
            Ok(c) => c,
            Err(e) => return reply_error(callback, format!("Error fetching liquidity: {}", e)).await,
        };

        info!("Fetching liquidity of {} on {}", pool_id, chain.name);
        let state_view = bind_contract(chain.state_view, abi::state_view()?, build_client(chain)?);
        let liquidity = state_view::get_pool_liquidity(&state_view, pool_id).await?;

        callback
            .call(Content::from_action(
                format!("The liquidity of the pool is {}", liquidity),
                NAME,
            ))
            .await?;
        Ok(ActionResult::success())
    }
}

#[async_trait]
impl Action for GetPoolLiquidityAction {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Get the liquidity of a v4 pool"
    }

    fn examples(&self) -> &'static [&'static [ActionExample]] {
        &[
            &[
                ActionExample {
                    name: "{{user1}}",
                    text: "Can you get the liquidity of the pool *poolId* on the Ethereum network?",
                    action: None,
                },
                ActionExample {
                    name: "{{agent}}",
                    text: "Will do!",
                    action: Some(NAME),
                },
            ],
            &[
                ActionExample {
                    name: "{{user1}}",
                    text: "What's the liquidity of the pool *poolId* on the Avalanche network?",
                    action: None,
                },
                ActionExample {
                    name: "{{agent}}",
                    text: "",
                    action: Some(NAME),
                },
            ],
        ]
    }

    async fn handler(
        &self,
        runtime: &AgentRuntime,
        message: &Memory,
        callback: &dyn HandlerCallback,
    ) -> Result<ActionResult, ActionError> {
        self.run(runtime, message, callback)
            .await
            .map_err(|e| ActionError::fatal("Error fetching pool liquidity.", e))
    }
}
