// src/blockchain/services/state_view.rs

use anyhow::{Context, Result};
use ethers_core::abi::Token;
use ethers_providers::Middleware;

use crate::blockchain::{
    client::{output, token_u128, token_u256, token_uint24, ContractHandle},
    models::{word_to_i32, PoolId, PoolState, PositionId, PositionInfo},
};

/// Total in-range liquidity of the pool.
pub async fn get_pool_liquidity<M: Middleware>(
    state_view: &ContractHandle<M>,
    pool_id: PoolId,
) -> Result<u128> {
    let out = state_view
        .read("getLiquidity", &[Token::FixedBytes(pool_id.0.as_bytes().to_vec())])
        .await
        .context("Error fetching pool liquidity")?;
    token_u128(output(&out, 0, "getLiquidity")?, "getLiquidity")
}

/// Price, tick and fees from the pool's slot0.
pub async fn get_pool_state<M: Middleware>(
    state_view: &ContractHandle<M>,
    pool_id: PoolId,
) -> Result<PoolState> {
    let out = state_view
        .read("getSlot0", &[Token::FixedBytes(pool_id.0.as_bytes().to_vec())])
        .await
        .context("Error fetching pool state")?;

    Ok(PoolState {
        sqrt_price_x96: token_u256(output(&out, 0, "getSlot0")?)?,
        tick: word_to_i32(token_u256(output(&out, 1, "getSlot0")?)?),
        protocol_fee: token_uint24(output(&out, 2, "getSlot0")?, "getSlot0")?,
        lp_fee: token_uint24(output(&out, 3, "getSlot0")?, "getSlot0")?,
    })
}

/// Liquidity and fee-growth snapshots of a position in the pool.
pub async fn get_position_info<M: Middleware>(
    state_view: &ContractHandle<M>,
    pool_id: PoolId,
    position_id: PositionId,
) -> Result<PositionInfo> {
    let out = state_view
        .read(
            "getPositionInfo",
            &[
                Token::FixedBytes(pool_id.0.as_bytes().to_vec()),
                Token::FixedBytes(position_id.0.as_bytes().to_vec()),
            ],
        )
        .await
        .context("Error fetching position info")?;

    Ok(PositionInfo {
        liquidity: token_u128(output(&out, 0, "getPositionInfo")?, "getPositionInfo")?,
        fee_growth_inside0_last_x128: token_u256(output(&out, 1, "getPositionInfo")?)?,
        fee_growth_inside1_last_x128: token_u256(output(&out, 2, "getPositionInfo")?)?,
    })
}
