// src/blockchain/abi.rs
//
// Contract interfaces as human-readable ABI data. Only the members the
// actions call are declared.

use anyhow::{Context, Result};
use ethers_core::abi::{parse_abi, Abi};

pub const STATE_VIEW_ABI: &[&str] = &[
    "function getLiquidity(bytes32 poolId) external view returns (uint128 liquidity)",
    "function getSlot0(bytes32 poolId) external view returns (uint160 sqrtPriceX96, int24 tick, uint24 protocolFee, uint24 lpFee)",
    "function getPositionInfo(bytes32 poolId, bytes32 positionId) external view returns (uint128 liquidity, uint256 feeGrowthInside0LastX128, uint256 feeGrowthInside1LastX128)",
];

pub const POSITION_MANAGER_ABI: &[&str] = &[
    "function poolKeys(bytes25 poolId) external view returns (address currency0, address currency1, uint24 fee, int24 tickSpacing, address hooks)",
];

pub const POOL_MANAGER_ABI: &[&str] = &[
    "struct PoolKey { address currency0; address currency1; uint24 fee; int24 tickSpacing; address hooks; }",
    "function initialize(PoolKey key, uint160 sqrtPriceX96) external returns (int24 tick)",
];

pub const ERC20_ABI: &[&str] = &["function name() external view returns (string)"];

pub fn state_view() -> Result<Abi> {
    parse_abi(STATE_VIEW_ABI).context("invalid state view ABI")
}

pub fn position_manager() -> Result<Abi> {
    parse_abi(POSITION_MANAGER_ABI).context("invalid position manager ABI")
}

pub fn pool_manager() -> Result<Abi> {
    parse_abi(POOL_MANAGER_ABI).context("invalid pool manager ABI")
}

pub fn erc20() -> Result<Abi> {
    parse_abi(ERC20_ABI).context("invalid ERC-20 ABI")
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers_core::abi::ParamType;

    #[test]
    fn state_view_declares_reads() {
        let abi = state_view().unwrap();
        assert_eq!(abi.function("getSlot0").unwrap().outputs.len(), 4);
        assert_eq!(abi.function("getPositionInfo").unwrap().inputs.len(), 2);
        assert_eq!(
            abi.function("getLiquidity").unwrap().outputs[0].kind,
            ParamType::Uint(128)
        );
    }

    #[test]
    fn position_manager_takes_bytes25() {
        let abi = position_manager().unwrap();
        let f = abi.function("poolKeys").unwrap();
        assert_eq!(f.inputs[0].kind, ParamType::FixedBytes(25));
        assert_eq!(f.outputs.len(), 5);
    }

    #[test]
    fn initialize_takes_pool_key_tuple() {
        let abi = pool_manager().unwrap();
        let f = abi.function("initialize").unwrap();
        assert_eq!(
            f.inputs[0].kind,
            ParamType::Tuple(vec![
                ParamType::Address,
                ParamType::Address,
                ParamType::Uint(24),
                ParamType::Int(24),
                ParamType::Address,
            ])
        );
        assert_eq!(f.inputs[1].kind, ParamType::Uint(160));
    }
}
