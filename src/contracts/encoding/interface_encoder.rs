use alloy::dyn_abi::DynSolValue;
use alloy::primitives::{Address, U256};
use std::sync::Arc;

use crate::contracts::abi::{format_value, AbiError, InterfaceDescription};

/// Arguments of `registerDlp(address,address,uint256)`
#[derive(Debug, Clone, PartialEq)]
pub struct RegisterDlpArgs {
    pub dlp_address: Address,
    pub dlp_owner_address: Address,
    pub stakers_percentage: U256,
}

/// Typed call-data encoding on top of the loaded interface description
///
/// All encoding goes through the JSON ABI read at startup, so a file that
/// disagrees with the deployed contract surfaces as a remote error rather
/// than being masked by compiled-in bindings.
#[derive(Debug, Clone)]
pub struct InterfaceEncoder {
    interface: Arc<InterfaceDescription>,
}

impl InterfaceEncoder {
    pub fn new(interface: Arc<InterfaceDescription>) -> Self {
        Self { interface }
    }

    pub fn interface(&self) -> &InterfaceDescription {
        &self.interface
    }

    pub fn encode_min_dlp_stake_amount(&self) -> Result<Vec<u8>, AbiError> {
        self.interface.encode_call("minDlpStakeAmount", &[])
    }

    pub fn encode_paused(&self) -> Result<Vec<u8>, AbiError> {
        self.interface.encode_call("paused", &[])
    }

    pub fn encode_get_dlp_status(&self, dlp_address: Address) -> Result<Vec<u8>, AbiError> {
        self.interface
            .encode_call("getDlpStatus", &[DynSolValue::Address(dlp_address)])
    }

    pub fn encode_register_dlp(&self, args: &RegisterDlpArgs) -> Result<Vec<u8>, AbiError> {
        self.interface.encode_call(
            "registerDlp",
            &[
                DynSolValue::Address(args.dlp_address),
                DynSolValue::Address(args.dlp_owner_address),
                DynSolValue::Uint(args.stakers_percentage, 256),
            ],
        )
    }

    pub fn decode_min_dlp_stake_amount(&self, data: &[u8]) -> Result<U256, AbiError> {
        match self.first_output("minDlpStakeAmount", data)? {
            DynSolValue::Uint(amount, _) => Ok(amount),
            other => Err(unexpected("minDlpStakeAmount", "uint", &other)),
        }
    }

    pub fn decode_paused(&self, data: &[u8]) -> Result<bool, AbiError> {
        match self.first_output("paused", data)? {
            DynSolValue::Bool(paused) => Ok(paused),
            other => Err(unexpected("paused", "bool", &other)),
        }
    }

    /// The status shape varies between contract versions; render whatever comes back
    pub fn decode_dlp_status(&self, data: &[u8]) -> Result<String, AbiError> {
        let values = self.interface.decode_output("getDlpStatus", data)?;
        let rendered: Vec<String> = values.iter().map(format_value).collect();
        Ok(rendered.join(", "))
    }

    fn first_output(&self, function: &str, data: &[u8]) -> Result<DynSolValue, AbiError> {
        self.interface
            .decode_output(function, data)?
            .into_iter()
            .next()
            .ok_or_else(|| AbiError::Decode {
                function: function.to_string(),
                reason: "no return value".to_string(),
            })
    }
}

fn unexpected(function: &str, expected: &str, got: &DynSolValue) -> AbiError {
    AbiError::Decode {
        function: function.to_string(),
        reason: format!("expected {}, got {:?}", expected, got),
    }
}
