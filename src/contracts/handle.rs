use alloy::primitives::{Address, TxHash, U256};
use anyhow::Result;
use std::sync::Arc;

use crate::contracts::abi::InterfaceDescription;
use crate::contracts::encoding::{InterfaceEncoder, RegisterDlpArgs};
use crate::contracts::execution::{CallRequest, ExecutionEngine, ExecutionError};
use crate::models::{ReceiptSummary, SubmittedTransaction};

/// The proxy contract bound to its interface and a signing engine
///
/// Read-only after construction. Nothing here checks that the address holds a
/// contract of the expected shape; a mismatch shows up on the first call.
pub struct ContractHandle {
    address: Address,
    encoder: InterfaceEncoder,
    executor: Arc<dyn ExecutionEngine>,
}

impl ContractHandle {
    pub fn new(
        address: Address,
        interface: Arc<InterfaceDescription>,
        executor: Arc<dyn ExecutionEngine>,
    ) -> Self {
        tracing::info!("🏗️ Creating contract handle for {}", address);
        tracing::info!("  Executor: {}", executor.description());

        Self {
            address,
            encoder: InterfaceEncoder::new(interface),
            executor,
        }
    }

    pub fn interface(&self) -> &InterfaceDescription {
        self.encoder.interface()
    }

    pub async fn min_dlp_stake_amount(&self) -> Result<U256> {
        let call_data = self.encoder.encode_min_dlp_stake_amount()?;
        let output = self.executor.static_call(&CallRequest::new(self.address, call_data)).await?;
        Ok(self.encoder.decode_min_dlp_stake_amount(&output)?)
    }

    pub async fn paused(&self) -> Result<bool> {
        let call_data = self.encoder.encode_paused()?;
        let output = self.executor.static_call(&CallRequest::new(self.address, call_data)).await?;
        Ok(self.encoder.decode_paused(&output)?)
    }

    pub async fn get_dlp_status(&self, dlp_address: Address) -> Result<String> {
        let call_data = self.encoder.encode_get_dlp_status(dlp_address)?;
        let output = self.executor.static_call(&CallRequest::new(self.address, call_data)).await?;
        Ok(self.encoder.decode_dlp_status(&output)?)
    }

    pub async fn estimate_register_dlp(&self, args: &RegisterDlpArgs, value: U256) -> Result<u64> {
        let request = self.register_dlp_request(args, value)?;
        Ok(self.executor.estimate_gas(&request).await?)
    }

    pub async fn send_register_dlp(
        &self,
        args: &RegisterDlpArgs,
        value: U256,
        gas_limit: u64,
    ) -> Result<SubmittedTransaction> {
        let request = self.register_dlp_request(args, value)?;
        Ok(self.executor.send_transaction(&request, gas_limit).await?)
    }

    pub async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<ReceiptSummary, ExecutionError> {
        self.executor.wait_for_receipt(tx_hash).await
    }

    fn register_dlp_request(&self, args: &RegisterDlpArgs, value: U256) -> Result<CallRequest> {
        let call_data = self.encoder.encode_register_dlp(args)?;
        Ok(CallRequest::new(self.address, call_data).with_value(value))
    }
}
