// src/blockchain/services/position_manager.rs

use anyhow::{Context, Result};
use ethers_core::abi::Token;
use ethers_providers::Middleware;

use crate::blockchain::{
    client::{output, token_address, token_u256, token_uint24, ContractHandle},
    models::{word_to_i32, PoolKey, TruncatedPoolId},
};

/// Looks up the key of a pool the position manager has seen.
pub async fn get_pool_keys<M: Middleware>(
    position_manager: &ContractHandle<M>,
    pool_id: TruncatedPoolId,
) -> Result<PoolKey> {
    let out = position_manager
        .read("poolKeys", &[Token::FixedBytes(pool_id.0.to_vec())])
        .await
        .context("Error fetching pool keys")?;

    Ok(PoolKey {
        currency0: token_address(output(&out, 0, "poolKeys")?)?,
        currency1: token_address(output(&out, 1, "poolKeys")?)?,
        fee: token_uint24(output(&out, 2, "poolKeys")?, "poolKeys")?,
        tick_spacing: word_to_i32(token_u256(output(&out, 3, "poolKeys")?)?),
        hooks: token_address(output(&out, 4, "poolKeys")?)?,
    })
}
