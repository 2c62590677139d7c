//! Format and range checks applied to every value extracted from a message.
//!
//! All checks are pure. The first failing rule wins.

use std::str::FromStr;

use ethers_core::types::{Address, H256, U256};
use ethers_core::utils::to_checksum;
use lazy_static::lazy_static;
use regex::Regex;

use crate::blockchain::{
    models::{PoolId, PoolKey, PositionId},
    services::pool_manager::{MAX_SQRT_PRICE, MIN_SQRT_PRICE},
    ChainEntry, ChainRegistry,
};
use crate::error::ExtractionError;

pub const MAX_FEE: i128 = 1_000_000;
pub const MIN_TICK_SPACING: i128 = 1;
pub const MAX_TICK_SPACING: i128 = 32_767;
pub const BYTES32_HEX_LEN: usize = 66;

lazy_static! {
    static ref ADDRESS_RE: Regex = Regex::new(r"^0x[0-9a-fA-F]{40}$").unwrap();
}

/// Pool key fields as they came out of the model, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawPoolKey {
    pub currency0: Option<String>,
    pub currency1: Option<String>,
    pub fee: Option<String>,
    pub tick_spacing: Option<String>,
    pub hooks: Option<String>,
}

fn required<'a>(field: &'static str, value: Option<&'a str>) -> Result<&'a str, ExtractionError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(ExtractionError::MissingField { field })
}

/// A 0x-prefixed, 66-character hex string.
pub fn validate_bytes32(field: &'static str, value: &str) -> Result<H256, ExtractionError> {
    let digits = value
        .strip_prefix("0x")
        .filter(|d| d.chars().all(|c| c.is_ascii_hexdigit()))
        .ok_or(ExtractionError::InvalidHex { field })?;

    if value.len() != BYTES32_HEX_LEN {
        return Err(ExtractionError::InvalidLength { field });
    }

    let bytes = hex::decode(digits).map_err(|_| ExtractionError::InvalidHex { field })?;
    Ok(H256::from_slice(&bytes))
}

pub fn validate_pool_id(value: &str) -> Result<PoolId, ExtractionError> {
    validate_bytes32("poolId", value).map(PoolId)
}

pub fn validate_position_id(value: &str) -> Result<PositionId, ExtractionError> {
    validate_bytes32("positionId", value).map(PositionId)
}

/// An EVM address. All-lowercase and all-uppercase hex are accepted as-is;
/// mixed case must carry a valid EIP-55 checksum.
pub fn validate_address(field: &'static str, value: &str) -> Result<Address, ExtractionError> {
    let invalid = || ExtractionError::InvalidAddress {
        field,
        value: value.to_string(),
    };

    if !ADDRESS_RE.is_match(value) {
        return Err(invalid());
    }
    let address = Address::from_str(value).map_err(|_| invalid())?;

    let digits = &value[2..];
    let mixed_case = digits.chars().any(|c| c.is_ascii_lowercase())
        && digits.chars().any(|c| c.is_ascii_uppercase());
    if mixed_case && to_checksum(&address, None) != value {
        return Err(invalid());
    }

    Ok(address)
}

/// Parses an integer, tolerating `_` and `,` digit separators.
pub fn parse_integer(field: &'static str, value: &str) -> Result<i128, ExtractionError> {
    let cleaned: String = value.chars().filter(|c| *c != '_' && *c != ',').collect();
    cleaned.parse::<i128>().map_err(|_| ExtractionError::NotAnInteger {
        field,
        value: value.to_string(),
    })
}

pub fn validate_fee(fee: i128) -> Result<u32, ExtractionError> {
    if !(0..=MAX_FEE).contains(&fee) {
        return Err(ExtractionError::FeeOutOfRange(fee));
    }
    Ok(fee as u32)
}

pub fn validate_tick_spacing(tick_spacing: i128) -> Result<i32, ExtractionError> {
    if !(MIN_TICK_SPACING..=MAX_TICK_SPACING).contains(&tick_spacing) {
        return Err(ExtractionError::TickSpacingOutOfRange(tick_spacing));
    }
    Ok(tick_spacing as i32)
}

/// Checks the fields in order: currency0, currency1, fee, tickSpacing, hooks.
pub fn validate_pool_key(raw: &RawPoolKey) -> Result<PoolKey, ExtractionError> {
    let currency0 = validate_address("currency0", required("currency0", raw.currency0.as_deref())?)?;
    let currency1 = validate_address("currency1", required("currency1", raw.currency1.as_deref())?)?;
    let fee = validate_fee(parse_integer("fee", required("fee", raw.fee.as_deref())?)?)?;
    let tick_spacing = validate_tick_spacing(parse_integer(
        "tickSpacing",
        required("tickSpacing", raw.tick_spacing.as_deref())?,
    )?)?;
    let hooks = validate_address("hooks", required("hooks", raw.hooks.as_deref())?)?;

    Ok(PoolKey {
        currency0,
        currency1,
        fee,
        tick_spacing,
        hooks,
    })
}

/// Resolves an extracted chain id against the registry.
pub fn validate_chain<'a>(
    registry: &'a ChainRegistry,
    chain_id: Option<&str>,
) -> Result<&'a ChainEntry, ExtractionError> {
    let raw = chain_id
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(ExtractionError::InvalidChainId)?;
    let id = raw.parse::<u64>().map_err(|_| ExtractionError::InvalidChainId)?;
    if id == 0 {
        return Err(ExtractionError::InvalidChainId);
    }

    registry.resolve(id).ok_or(ExtractionError::NoMatchingChain(id))
}

/// A `sqrtPriceX96` within `[MIN_SQRT_PRICE, MAX_SQRT_PRICE)`.
pub fn validate_starting_price(value: Option<&str>) -> Result<U256, ExtractionError> {
    let raw = required("startingPrice", value)?;
    let cleaned: String = raw.chars().filter(|c| *c != '_' && *c != ',').collect();
    let out_of_range = || ExtractionError::StartingPriceOutOfRange(raw.to_string());

    let price = U256::from_dec_str(&cleaned).map_err(|_| out_of_range())?;
    let max = U256::from_dec_str(MAX_SQRT_PRICE).map_err(|_| out_of_range())?;
    if price < U256::from(MIN_SQRT_PRICE) || price >= max {
        return Err(out_of_range());
    }
    Ok(price)
}
