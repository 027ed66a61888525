use anyhow::Result;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::contracts::abi::InterfaceDescription;
use crate::contracts::encoding::RegisterDlpArgs;
use crate::contracts::execution::{ExecutionEngine, ExecutionError};
use crate::contracts::handle::ContractHandle;
use crate::models::{RegistrationOutcome, RegistrationParams};

/// Drives one `registerDlp` call from diagnostics to confirmation
///
/// Diagnostic reads and gas estimation are best effort: their failures are
/// logged and never change what happens next. Submission and confirmation
/// failures are returned to the caller. Exactly one transaction is sent per
/// call to [`RegisterOrchestrator::execute`] and nothing is retried.
pub struct RegisterOrchestrator {
    handle: ContractHandle,
    params: RegistrationParams,
}

impl RegisterOrchestrator {
    pub fn new(
        interface: Arc<InterfaceDescription>,
        executor: Arc<dyn ExecutionEngine>,
        params: RegistrationParams,
    ) -> Self {
        info!("🏗️ Creating RegisterOrchestrator");
        info!("  Signer: {:?}", executor.signer_address());

        let handle = ContractHandle::new(params.proxy_address, interface, executor);

        Self { handle, params }
    }

    pub async fn execute(&self) -> Result<RegistrationOutcome> {
        info!("Using addresses:");
        info!("  Proxy: {}", self.params.proxy_address);
        info!("  DLP: {}", self.params.dlp_address);
        info!("  DLP Owner: {}", self.params.dlp_owner_address);

        self.check_contract_state().await;

        let args = RegisterDlpArgs {
            dlp_address: self.params.dlp_address,
            dlp_owner_address: self.params.dlp_owner_address,
            stakers_percentage: self.params.stakers_percentage,
        };

        info!("Parameters:");
        info!("  Stakers Percentage: {}", args.stakers_percentage);
        info!("  Value: {}", self.params.value);

        let gas_estimate = self.estimate_gas(&args).await;

        info!("📡 Sending transaction...");
        let transaction = self
            .handle
            .send_register_dlp(&args, self.params.value, self.params.gas_limit)
            .await?;

        info!("Transaction sent!");
        info!("  Hash: {}", transaction.tx_hash);
        info!("  Data: 0x{}", hex::encode(&transaction.input));

        info!("⏳ Waiting for confirmation...");
        let receipt = self.handle.wait_for_receipt(transaction.tx_hash).await?;

        if !receipt.status {
            error!("❌ Transaction failed");
            error!("  Transaction hash: {}", receipt.tx_hash);
            error!("  Block number: {:?}", receipt.block_number);
            return Err(ExecutionError::Reverted {
                tx_hash: receipt.tx_hash,
                block_number: receipt.block_number,
            }
            .into());
        }

        info!("✅ Transaction confirmed!");
        match receipt.block_number {
            Some(block) => info!("  Block: {}", block),
            None => info!("  Block: pending"),
        }
        info!("  Gas used: {}", receipt.gas_used);

        Ok(RegistrationOutcome {
            transaction,
            receipt,
            gas_estimate,
        })
    }

    /// Best-effort state reads; each one is isolated from the others
    async fn check_contract_state(&self) {
        info!("🔍 Checking contract state...");

        match self.handle.min_dlp_stake_amount().await {
            Ok(min_stake) => info!("  Min DLP Stake Amount: {}", min_stake),
            Err(e) => warn!("⚠️ Could not get min DLP stake amount: {}", e),
        }

        match self.handle.paused().await {
            Ok(paused) => info!("  Contract paused: {}", paused),
            Err(e) => warn!("⚠️ Could not get paused state: {}", e),
        }

        match self.handle.get_dlp_status(self.params.dlp_address).await {
            Ok(status) => info!("  DLP Status: {}", status),
            Err(e) => warn!("⚠️ Could not get DLP status: {}", e),
        }
    }

    async fn estimate_gas(&self, args: &RegisterDlpArgs) -> Option<u64> {
        info!("⛽ Estimating gas...");

        match self.handle.estimate_register_dlp(args, self.params.value).await {
            Ok(gas) => {
                info!("  Estimated gas: {}", gas);
                Some(gas)
            }
            Err(e) => {
                error!("❌ Gas estimation failed. Error: {}", e);

                let revert_data = e
                    .downcast_ref::<ExecutionError>()
                    .and_then(ExecutionError::revert_data);

                if let Some(data) = revert_data {
                    match self.handle.interface().revert_reason(data) {
                        Some(reason) => error!("  Decoded error: {}", reason),
                        None => warn!("  Could not decode error"),
                    }
                }

                warn!("⚠️ Continuing with submission despite failed estimate");
                None
            }
        }
    }
}
