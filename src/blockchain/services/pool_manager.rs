// src/blockchain/services/pool_manager.rs

use anyhow::{Context, Result};
use ethers_core::abi::Token;
use ethers_core::types::{TxHash, U256};
use ethers_providers::Middleware;

use crate::blockchain::{client::ContractHandle, models::PoolKey};

/// Lowest `sqrtPriceX96` a pool can be initialized with (`TickMath.MIN_SQRT_PRICE`).
pub const MIN_SQRT_PRICE: u64 = 4_295_128_739;
/// Exclusive upper bound for `sqrtPriceX96` (`TickMath.MAX_SQRT_PRICE`).
pub const MAX_SQRT_PRICE: &str = "1461446703485210103287273052203988822378723970342";

/// Calldata arguments of `PoolManager.initialize(PoolKey, uint160)`.
pub fn initialize_args(key: &PoolKey, sqrt_price_x96: U256) -> Vec<Token> {
    vec![Token::Tuple(key.to_tokens()), Token::Uint(sqrt_price_x96)]
}

/// Submits `initialize` for a new pool and returns the transaction hash.
pub async fn create_pool<M: Middleware>(
    pool_manager: &ContractHandle<M>,
    key: &PoolKey,
    sqrt_price_x96: U256,
) -> Result<TxHash> {
    pool_manager
        .write("initialize", &initialize_args(key, sqrt_price_x96))
        .await
        .context("Error creating pool")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::abi;
    use ethers_core::types::Address;

    #[test]
    fn initialize_args_encode_against_abi() {
        let key = PoolKey {
            currency0: Address::zero(),
            currency1: Address::repeat_byte(0x11),
            fee: 3000,
            tick_spacing: 60,
            hooks: Address::zero(),
        };
        let abi = abi::pool_manager().unwrap();
        let data = abi
            .function("initialize")
            .unwrap()
            .encode_input(&initialize_args(&key, U256::from(MIN_SQRT_PRICE)))
            .unwrap();
        // selector + five key words + price word
        assert_eq!(data.len(), 4 + 6 * 32);
    }
}
