// src/actions/get_position_info.rs

use async_trait::async_trait;
use tracing::info;

use super::{
    reply_error, require_provider, Action, ActionExample, ActionResult, AgentRuntime, Content,
    HandlerCallback, Memory,
};
use crate::blockchain::{abi, bind_contract, build_client, models::PositionInfo, services::state_view};
use crate::error::ActionError;
use crate::llm::extract;

pub const NAME: &str = "GET_POSITION_INFO_WITH_POSITION_ID";

pub struct GetPositionInfoAction;

pub fn format_position_info(info: &PositionInfo) -> String {
    format!(
        "The position info is:\n\nliquidity: {}\nfeeGrowthInside0LastX128: {}\nfeeGrowthInside1LastX128: {}",
        info.liquidity, info.fee_growth_inside0_last_x128, info.fee_growth_inside1_last_x128,
    )
}

impl GetPositionInfoAction {
    async fn run(
        &self,
        runtime: &AgentRuntime,
        message: &Memory,
        callback: &dyn HandlerCallback,
    ) -> anyhow::Result<ActionResult> {
        let text = message.text();
        let model = runtime.model.as_ref();

        let (pool_id, position_id, chain) = tokio::join!(
            extract::extract_pool_id(model, text),
            extract::extract_position_id(model, text),
            extract::extract_chain(model, &runtime.registry, text),
        );

        let pool_id = match pool_id {
            Ok(id) => id,
            Err(e) => return reply_error(callback, format!("Error fetching position info: {}", e)).await,
        };
        let position_id = match position_id {
            Ok(id) => id,
            Err(e) => return reply_error(callback, format!("Error fetching position info: {}", e)).await,
        };
        let chain = match chain.and_then(|c| require_provider(c).map(|_| c)) {
            Ok(c) => c,
            Err(e) => return reply_error(callback, format!("Error fetching position info: {}", e)).await,
        };

        info!("Fetching position {} in {} on {}", position_id, pool_id, chain.name);
        let state_view = bind_contract(chain.state_view, abi::state_view()?, build_client(chain)?);
        let position = state_view::get_position_info(&state_view, pool_id, position_id).await?;

        callback
            .call(Content::from_action(format_position_info(&position), NAME))
            .await?;
        Ok(ActionResult::success())
    }
}

#[async_trait]
impl Action for GetPositionInfoAction {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Get the position info of a v4 pool using the positionId: liquidity, feeGrowthInside0LastX128, feeGrowthInside1LastX128"
    }

    fn examples(&self) -> &'static [&'static [ActionExample]] {
        &[&[
            ActionExample {
                name: "{{user1}}",
                text: "Can you get the position info for the pool *poolId* and positionId *positionId* on the Ethereum network?",
                action: None,
            },
            ActionExample {
                name: "{{agent}}",
                text: "Sure I can!",
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
            .map_err(|e| ActionError::fatal("Error fetching position info.", e))
    }
}
