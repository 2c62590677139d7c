// src/blockchain/services/erc20.rs

use std::sync::Arc;

use anyhow::{Context, Result};
use ethers_core::types::Address;
use ethers_providers::Middleware;

use crate::blockchain::{
    abi,
    client::{bind_contract, output, token_string},
    models::PairNames,
    registry::ChainEntry,
};

/// `name()` of an ERC-20 token.
pub async fn get_token_name<M: Middleware>(client: Arc<M>, token: Address) -> Result<String> {
    let contract = bind_contract(token, abi::erc20()?, client);
    let out = contract
        .read("name", &[])
        .await
        .with_context(|| format!("Error fetching ERC20 token name. The address is {:?}", token))?;
    token_string(output(&out, 0, "name")?)
}

/// Display name of a pool currency: the native currency for the zero address,
/// the token's `name()` otherwise.
pub async fn currency_name<M: Middleware>(
    client: Arc<M>,
    chain: &ChainEntry,
    currency: Address,
) -> Result<String> {
    if currency.is_zero() {
        Ok(chain.native_currency.clone())
    } else {
        get_token_name(client, currency).await
    }
}

pub async fn get_pair_names<M: Middleware>(
    client: Arc<M>,
    chain: &ChainEntry,
    currency0: Address,
    currency1: Address,
) -> Result<PairNames> {
    Ok(PairNames {
        currency0: currency_name(client.clone(), chain, currency0).await?,
        currency1: currency_name(client, chain, currency1).await?,
    })
}
