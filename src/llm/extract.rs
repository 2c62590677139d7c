//! Parameter extraction: prompt the model for one structured field, parse the
//! XML reply and validate what came back.

use std::collections::HashMap;

use ethers_core::types::U256;
use tracing::debug;

use super::model::{ModelType, TextModel};
use super::xml::parse_key_value_xml;
use crate::blockchain::{
    models::{PoolId, PoolKey, PositionId},
    ChainEntry, ChainRegistry,
};
use crate::error::ExtractionError;
use crate::validation::{self, RawPoolKey};

/// Sends `prompt` to the small model and returns the parsed tag map.
pub async fn request_fields(
    model: &dyn TextModel,
    prompt: &str,
) -> Result<HashMap<String, String>, ExtractionError> {
    let reply = model.use_model(ModelType::TextSmall, prompt).await?;
    debug!("Model reply: {}", reply);
    Ok(parse_key_value_xml(&reply).unwrap_or_default())
}

pub fn pool_id_prompt(message: &str) -> String {
    format!(
        r#"Extract the poolId from the user's message. The poolId is a hexadecimal value that starts with 0x. The message is: {message}

Return an XML block containing only the extracted value:

<response>
  <poolId>
    extracted_pool_id_or_null
  </poolId>
</response>"#
    )
}

pub fn position_id_prompt(message: &str) -> String {
    format!(
        r#"Extract the positionId from the user's message. The positionId is a bytes32 hexadecimal value that starts with 0x. The message is: {message}

Return an XML block containing only the extracted value:

<response>
  <positionId>
    extracted_position_id_or_null
  </positionId>
</response>"#
    )
}

pub fn pool_key_prompt(message: &str) -> String {
    format!(
        r#"Extract the pool keys from the user's message. The pool keys are defined as {{
  currency0: address;
  currency1: address;
  fee: number;
  tickSpacing: number;
  hooks: address;
}}. The message is: {message}

Return an XML block containing only the extracted values in the following form:

<response>
  <currency0>extracted_currency0_or_null</currency0>
  <currency1>extracted_currency1_or_null</currency1>
  <fee>extracted_fee_or_null</fee>
  <tickSpacing>extracted_tickSpacing_or_null</tickSpacing>
  <hooks>extracted_hooks_or_null</hooks>
</response>"#
    )
}

pub fn starting_price_prompt(message: &str) -> String {
    format!(
        r#"Extract the starting price of the new pool from the user's message. The starting price is a sqrtPriceX96 value: a positive integer written in decimal. The message is: {message}

Return an XML block containing only the extracted value:

<response>
  <startingPrice>
    extracted_starting_price_or_null
  </startingPrice>
</response>"#
    )
}

/// Only chain ids and names go into the prompt; provider URLs never leave
/// the process.
pub fn chain_prompt(message: &str, registry: &ChainRegistry) -> String {
    format!(
        r#"Figure out which chain the user's message refers to for a blockchain API call and pick the match from this list of supported chains: {chains}. Keep in mind that Ethereum is also called 'mainnet'. The message is: {message}

Return an XML block containing only the chainId:

<response>
  <chainId>
    chainId_or_null
  </chainId>
</response>"#,
        chains = registry.prompt_listing(),
    )
}

pub async fn extract_pool_id(model: &dyn TextModel, message: &str) -> Result<PoolId, ExtractionError> {
    let fields = request_fields(model, &pool_id_prompt(message)).await?;
    let raw = fields
        .get("poolId")
        .ok_or(ExtractionError::MissingField { field: "poolId" })?;
    validation::validate_pool_id(raw)
}

pub async fn extract_position_id(
    model: &dyn TextModel,
    message: &str,
) -> Result<PositionId, ExtractionError> {
    let fields = request_fields(model, &position_id_prompt(message)).await?;
    let raw = fields
        .get("positionId")
        .ok_or(ExtractionError::MissingField { field: "positionId" })?;
    validation::validate_position_id(raw)
}

pub async fn extract_pool_key(model: &dyn TextModel, message: &str) -> Result<PoolKey, ExtractionError> {
    let mut fields = request_fields(model, &pool_key_prompt(message)).await?;
    let raw = RawPoolKey {
        currency0: fields.remove("currency0"),
        currency1: fields.remove("currency1"),
        fee: fields.remove("fee"),
        tick_spacing: fields.remove("tickSpacing"),
        hooks: fields.remove("hooks"),
    };
    validation::validate_pool_key(&raw)
}

pub async fn extract_starting_price(model: &dyn TextModel, message: &str) -> Result<U256, ExtractionError> {
    let fields = request_fields(model, &starting_price_prompt(message)).await?;
    validation::validate_starting_price(fields.get("startingPrice").map(String::as_str))
}

pub async fn extract_chain<'a>(
    model: &dyn TextModel,
    registry: &'a ChainRegistry,
    message: &str,
) -> Result<&'a ChainEntry, ExtractionError> {
    let fields = request_fields(model, &chain_prompt(message, registry)).await?;
    validation::validate_chain(registry, fields.get("chainId").map(String::as_str))
}
