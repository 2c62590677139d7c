// src/actions/create_pool.rs

use async_trait::async_trait;
use tracing::info;

use super::{
    get_pool_keys::format_pool_key, reply_error, require_provider, Action, ActionExample,
    ActionResult, AgentRuntime, Content, HandlerCallback, Memory,
};
use crate::blockchain::{
    abi, bind_contract, build_client, build_signing_client,
    services::{erc20, pool_manager},
};
use crate::error::{ActionError, ExtractionError};
use crate::llm::extract;

pub const NAME: &str = "CREATE_POOL";

pub struct CreatePoolAction;

impl CreatePoolAction {
    async fn run(
        &self,
        runtime: &AgentRuntime,
        message: &Memory,
        callback: &dyn HandlerCallback,
    ) -> anyhow::Result<ActionResult> {
        let text = message.text();
        let model = runtime.model.as_ref();

        // Sequential so that an invalid key stops before any further model call.
        let key = match extract::extract_pool_key(model, text).await {
            Ok(key) => key,
            Err(e) => return reply_error(callback, format!("Error creating pool. {}", e)).await,
        };
        let sqrt_price_x96 = match extract::extract_starting_price(model, text).await {
            Ok(price) => price,
            Err(e) => return reply_error(callback, format!("Error creating pool. {}", e)).await,
        };
        let chain = match extract::extract_chain(model, &runtime.registry, text)
            .await
            .and_then(|c| require_provider(c).map(|_| c))
        {
            Ok(c) => c,
            Err(e) => return reply_error(callback, format!("Error creating pool: {}", e)).await,
        };
        let Some(signer_key) = runtime.signer_key.as_ref() else {
            return reply_error(
                callback,
                format!("Error creating pool: {}", ExtractionError::MissingSigner),
            )
            .await;
        };

        let names =
            erc20::get_pair_names(build_client(chain)?, chain, key.currency0, key.currency1).await?;

        info!("Creating pool {} on {}", key.pool_id(), chain.name);
        let pool_manager = bind_contract(
            chain.pool_manager,
            abi::pool_manager()?,
            build_signing_client(chain, signer_key)?,
        );
        let tx_hash = pool_manager::create_pool(&pool_manager, &key, sqrt_price_x96).await?;
        let tx_hash = format!("{:?}", tx_hash);

        let link = chain
            .tx_url(&tx_hash)
            .map(|url| format!(" ({})", url))
            .unwrap_or_default();
        let reply = format!(
            "Successfully created a new pool on {} with the following parameters:\n\n{}\n\nThe transaction hash is {}{}.",
            chain.name,
            format_pool_key(&key, &names),
            tx_hash,
            link,
        );

        callback.call(Content::from_action(reply, NAME)).await?;
        Ok(ActionResult::success())
    }
}

#[async_trait]
impl Action for CreatePoolAction {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Create a new v4 pool from pool keys and a starting sqrtPriceX96"
    }

    fn examples(&self) -> &'static [&'static [ActionExample]] {
        &[&[
            ActionExample {
                name: "{{user1}}",
                text: "Create a new pool on *chain name* with *currency0*, *currency1*, *fee*, *tickSpacing*, *hooks*, *startingPrice*",
                action: None,
            },
            ActionExample {
                name: "{{agent}}",
                text: "I'm on it.",
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
            .map_err(|e| ActionError::fatal("Error creating new pool.", e))
    }
}
