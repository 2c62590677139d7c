// src/actions/get_pool_state.rs

use async_trait::async_trait;
use tracing::info;

use super::{
    reply_error, require_provider, Action, ActionExample, ActionResult, AgentRuntime, Content,
    HandlerCallback, Memory,
};
use crate::blockchain::{
    abi, bind_contract, build_client,
    models::{fee_to_percent, PoolState},
    services::state_view,
};
use crate::error::ActionError;
use crate::llm::extract;

pub const NAME: &str = "GET_POOL_STATE";

pub struct GetPoolStateAction;

pub fn format_pool_state(state: &PoolState) -> String {
    format!(
        "The state of the pool is:\n\nsqrtPriceX96: {}\ntick: {}\nprotocolFee: {}\nlpFee: {}",
        state.sqrt_price_x96,
        state.tick,
        fee_to_percent(state.protocol_fee),
        fee_to_percent(state.lp_fee),
    )
}

impl GetPoolStateAction {
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
                    format!("Error fetching pool state. Error validating poolId: {}", e),
                )
                .await
            }
        };
        let chain = match chain.and_then(|c| require_provider(c).map(|_| c)) {
            Ok(c) => c,
            Err(e) => return reply_error(callback, format!("Error fetching state: {}", e)).await,
        };

        info!("Fetching slot0 of {} on {}", pool_id, chain.name);
        let state_view = bind_contract(chain.state_view, abi::state_view()?, build_client(chain)?);
        let state = state_view::get_pool_state(&state_view, pool_id).await?;

        callback
            .call(Content::from_action(format_pool_state(&state), NAME))
            .await?;
        Ok(ActionResult::success())
    }
}

#[async_trait]
impl Action for GetPoolStateAction {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Get the state of a v4 pool: sqrtPriceX96, tick, protocolFee, lpFee"
    }

    fn examples(&self) -> &'static [&'static [ActionExample]] {
        &[
            &[
                ActionExample {
                    name: "{{user1}}",
                    text: "What is the current tick of the pool *poolId* on Ethereum?",
                    action: None,
                },
                ActionExample {
                    name: "{{agent}}",
                    text: "Here is the entire state of the pool, including the current tick:",
                    action: Some(NAME),
                },
            ],
            &[
                ActionExample {
                    name: "{{user1}}",
                    text: "What are the fees of the pool *poolId* on Base?",
                    action: None,
                },
                ActionExample {
                    name: "{{agent}}",
                    text: "Here is the entire state of the pool, including the protocol fee and the liquidity provider fee:",
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
            .map_err(|e| ActionError::fatal("Error fetching pool state.", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers_core::types::U256;

    #[test]
    fn formats_fees_as_percentages() {
        let text = format_pool_state(&PoolState {
            sqrt_price_x96: U256::from(79_228_162_514_264_337_593_543_950_336u128),
            tick: -200,
            protocol_fee: 0,
            lp_fee: 500,
        });
        assert!(text.contains("sqrtPriceX96: 79228162514264337593543950336"));
        assert!(text.contains("tick: -200"));
        assert!(text.contains("protocolFee: 0%"));
        assert!(text.ends_with("lpFee: 0.05%"));
    }
}
