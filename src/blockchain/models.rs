// src/blockchain/models.rs

use std::fmt;

use ethers_core::abi::{encode, Token};
use ethers_core::types::{Address, H256, U256};
use ethers_core::utils::keccak256;
use serde::Serialize;

/// Length in bytes of the pool id prefix the position manager keys pools by.
pub const TRUNCATED_POOL_ID_LEN: usize = 25;

// --- Pool identity ---

/// Parameters that uniquely identify a Uniswap v4 pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolKey {
    pub currency0: Address,
    pub currency1: Address,
    /// Fee in hundredths of a bip (500 = 0.05%).
    pub fee: u32,
    pub tick_spacing: i32,
    pub hooks: Address,
}

impl PoolKey {
    /// ABI encoding of the key in the order the pool manager hashes it.
    pub fn abi_encode(&self) -> Vec<u8> {
        encode(&self.to_tokens())
    }

    /// Tokens in `(currency0, currency1, fee, tickSpacing, hooks)` order.
    pub fn to_tokens(&self) -> Vec<Token> {
        vec![
            Token::Address(self.currency0),
            Token::Address(self.currency1),
            Token::Uint(U256::from(self.fee)),
            Token::Int(signed_word(self.tick_spacing)),
            Token::Address(self.hooks),
        ]
    }

    /// Full 32-byte id, as the pool manager and state view know the pool.
    pub fn pool_id(&self) -> PoolId {
        PoolId(H256::from(keccak256(self.abi_encode())))
    }

    /// The 25-byte id the position manager's `poolKeys` mapping is keyed by.
    pub fn truncated_pool_id(&self) -> TruncatedPoolId {
        self.pool_id().truncated()
    }
}

/// Two's complement 256-bit word for a signed ABI integer.
pub fn signed_word(value: i32) -> U256 {
    if value >= 0 {
        U256::from(value as u64)
    } else {
        !U256::from((-(value as i64) - 1) as u64)
    }
}

/// Reads a sign-extended `int24` word back into an `i32`.
pub fn word_to_i32(word: U256) -> i32 {
    word.low_u32() as i32
}

/// 32-byte pool id accepted by the state view contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PoolId(pub H256);

impl PoolId {
    /// Leading 25 bytes, i.e. Solidity's `bytes25(poolId)`.
    pub fn truncated(&self) -> TruncatedPoolId {
        let mut out = [0u8; TRUNCATED_POOL_ID_LEN];
        out.copy_from_slice(&self.0.as_bytes()[..TRUNCATED_POOL_ID_LEN]);
        TruncatedPoolId(out)
    }
}

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0.as_bytes()))
    }
}

/// `bytes25` pool id accepted by the position manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TruncatedPoolId(pub [u8; TRUNCATED_POOL_ID_LEN]);

impl fmt::Display for TruncatedPoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

/// Opaque 32-byte position id, scoped to a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PositionId(pub H256);

impl fmt::Display for PositionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0.as_bytes()))
    }
}

// --- Contract read results ---

/// `StateView.getSlot0` result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolState {
    pub sqrt_price_x96: U256,
    pub tick: i32,
    pub protocol_fee: u32,
    pub lp_fee: u32,
}

/// `StateView.getPositionInfo` result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionInfo {
    pub liquidity: u128,
    pub fee_growth_inside0_last_x128: U256,
    pub fee_growth_inside1_last_x128: U256,
}

/// Display names of a pool's two currencies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairNames {
    pub currency0: String,
    pub currency1: String,
}

/// Formats a fee in hundredths of a bip as a percentage (500 -> "0.05%").
pub fn fee_to_percent(fee: u32) -> String {
    format!("{}%", f64::from(fee) / 10_000.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn key(currency0: &str, currency1: &str) -> PoolKey {
        PoolKey {
            currency0: Address::from_str(currency0).unwrap(),
            currency1: Address::from_str(currency1).unwrap(),
            fee: 3000,
            tick_spacing: 60,
            hooks: Address::zero(),
        }
    }

    const USDC: &str = "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48";
    const WETH: &str = "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2";

    #[test]
    fn pool_id_is_deterministic() {
        let a = key(USDC, WETH);
        assert_eq!(a.pool_id(), a.pool_id());
        assert_eq!(a.truncated_pool_id(), key(USDC, WETH).truncated_pool_id());
    }

    #[test]
    fn currency_order_changes_the_id() {
        assert_ne!(key(USDC, WETH).pool_id(), key(WETH, USDC).pool_id());
        assert_ne!(
            key(USDC, WETH).truncated_pool_id(),
            key(WETH, USDC).truncated_pool_id()
        );
    }

    #[test]
    fn truncated_id_is_the_leading_25_bytes() {
        let id = key(USDC, WETH).pool_id();
        let truncated = id.truncated();
        assert_eq!(&truncated.0[..], &id.0.as_bytes()[..25]);
        assert_eq!(truncated.to_string().len(), 2 + 50);
        assert!(id.to_string().starts_with(&truncated.to_string()));
    }

    #[test]
    fn encoding_uses_five_words() {
        let encoded = key(USDC, WETH).abi_encode();
        assert_eq!(encoded.len(), 5 * 32);
        // fee word
        assert_eq!(U256::from_big_endian(&encoded[64..96]), U256::from(3000));
    }

    #[test]
    fn negative_tick_spacing_is_sign_extended() {
        let mut k = key(USDC, WETH);
        k.tick_spacing = -1;
        let encoded = k.abi_encode();
        assert!(encoded[96..128].iter().all(|b| *b == 0xff));
    }

    #[test]
    fn signed_words_round_trip() {
        for v in [-887_272, -200, -1, 0, 1, 60, 887_272] {
            assert_eq!(word_to_i32(signed_word(v)), v);
        }
        assert_eq!(signed_word(-1), U256::MAX);
    }

    #[test]
    fn fee_percentages() {
        assert_eq!(fee_to_percent(500), "0.05%");
        assert_eq!(fee_to_percent(3000), "0.3%");
        assert_eq!(fee_to_percent(10_000), "1%");
        assert_eq!(fee_to_percent(0), "0%");
    }
}
