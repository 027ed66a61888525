use alloy::primitives::utils::{parse_units, ParseUnits};
use alloy::primitives::{Address, U256};
use anyhow::{Context, Result};
use std::str::FromStr;

use crate::config::RegistrationConfig;

/// Fixed-point precision of the chain's native value unit
pub const NATIVE_DECIMALS: u8 = 18;

/// Fully parsed arguments for one `registerDlp` call
#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationParams {
    pub proxy_address: Address,
    pub dlp_address: Address,
    pub dlp_owner_address: Address,
    pub stakers_percentage: U256,
    pub value: U256,
    pub gas_limit: u64,
}

impl RegistrationParams {
    pub fn from_config(config: &RegistrationConfig) -> Result<Self> {
        Ok(Self {
            proxy_address: parse_address("proxy_address", &config.proxy_address)?,
            dlp_address: parse_address("dlp_address", &config.dlp_address)?,
            dlp_owner_address: parse_address("dlp_owner_address", &config.dlp_owner_address)?,
            stakers_percentage: scale_amount(&config.stakers_percentage)
                .context("Invalid stakers_percentage")?,
            value: scale_amount(&config.value).context("Invalid value")?,
            gas_limit: config.gas_limit,
        })
    }
}

fn parse_address(field: &str, raw: &str) -> Result<Address> {
    Address::from_str(raw.trim()).map_err(|e| anyhow::anyhow!("Invalid {} '{}': {}", field, raw, e))
}

/// Scale a decimal literal to 18-decimal integer units
///
/// Parsing is exact string arithmetic: "100.0" becomes 100 * 10^18 with no
/// float rounding. Negative amounts are rejected.
pub fn scale_amount(literal: &str) -> Result<U256> {
    let parsed = parse_units(literal.trim(), NATIVE_DECIMALS)
        .map_err(|e| anyhow::anyhow!("Cannot scale '{}' to {} decimals: {}", literal, NATIVE_DECIMALS, e))?;

    match parsed {
        ParseUnits::U256(amount) => Ok(amount),
        ParseUnits::I256(_) => Err(anyhow::anyhow!("Amount must not be negative: {}", literal)),
    }
}
