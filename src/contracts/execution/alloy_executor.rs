use crate::config::AppConfig;
use crate::contracts::execution::traits::{CallRequest, ExecutionEngine, ExecutionError};
use crate::models::{ReceiptSummary, SubmittedTransaction};
use alloy::{
    network::EthereumWallet,
    primitives::{Address, Bytes, TxHash},
    providers::{PendingTransactionBuilder, Provider, ProviderBuilder},
    rpc::types::{TransactionInput, TransactionRequest},
    signers::local::PrivateKeySigner,
    transports::TransportError,
};
use anyhow::Result;
use async_trait::async_trait;
use tracing::{error, info};

pub struct AlloyExecutor {
    provider: Box<dyn Provider + Send + Sync>,
    signer_address: Address,
}

impl AlloyExecutor {
    /// Acquire the signing identity and bind it to an HTTP provider
    ///
    /// Fails before any provider exists when no usable key is configured.
    /// Building the provider itself performs no network round trip.
    pub fn new(config: &AppConfig) -> Result<Self> {
        info!("🔧 Initializing AlloyExecutor with configuration");

        let private_key = config
            .signer
            .private_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| anyhow::anyhow!("No signer available: set PRIVATE_KEY or signer.private_key"))?;

        let signer: PrivateKeySigner = private_key
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("Failed to parse private key: {}", e))?;
        let signer_address = signer.address();

        let wallet = EthereumWallet::from(signer);
        let provider = ProviderBuilder::new()
            .wallet(wallet)
            .connect_http(config.network.rpc_url.parse()?);

        info!("✅ AlloyExecutor initialized");
        info!("  Signer address: {:?}", signer_address);
        info!("  RPC URL: {}", config.network.rpc_url);

        Ok(Self {
            provider: Box::new(provider),
            signer_address,
        })
    }

    /// Build transaction request from call data and parameters
    fn build_transaction_request(&self, request: &CallRequest, gas_limit: Option<u64>) -> TransactionRequest {
        let mut tx_request = TransactionRequest::default()
            .from(self.signer_address)
            .to(request.to)
            .value(request.value)
            .input(TransactionInput::from(request.call_data.clone()));

        tx_request.gas = gas_limit;

        tx_request
    }

    /// Log detailed transaction information for debugging
    fn log_transaction_debug_info(&self, tx_request: &TransactionRequest, call_data: &[u8]) {
        info!("🔍 ALLOY EXECUTOR DEBUG INFO:");
        info!("  To address: {:?}", tx_request.to);
        info!("  Gas limit: {:?}", tx_request.gas);
        info!("  Value: {:?}", tx_request.value);
        info!("  Input data length: {} bytes", call_data.len());
        info!(
            "  Call data preview (first 100 bytes): 0x{}",
            hex::encode(&call_data[..100.min(call_data.len())])
        );
    }
}

/// Split a transport error into the node's message and any revert payload
fn map_transport_error(e: TransportError) -> ExecutionError {
    match e.as_error_resp() {
        Some(payload) => ExecutionError::Rpc {
            message: payload.message.to_string(),
            data: payload.as_revert_data(),
        },
        None => ExecutionError::Transport(e.to_string()),
    }
}

#[async_trait]
impl ExecutionEngine for AlloyExecutor {
    async fn static_call(&self, request: &CallRequest) -> Result<Vec<u8>, ExecutionError> {
        let call_request = self.build_transaction_request(request, None);

        let result = self.provider.call(call_request).await.map_err(|e| {
            let mapped = map_transport_error(e);
            error!("❌ Static call to {} failed: {}", request.to, mapped);
            mapped
        })?;

        Ok(result.to_vec())
    }

    async fn estimate_gas(&self, request: &CallRequest) -> Result<u64, ExecutionError> {
        info!("⛽ AlloyExecutor: Estimating gas");
        info!("  To: {}", request.to);
        info!("  From: {}", self.signer_address);
        info!("  Value: {}", request.value);

        let estimation_request = self.build_transaction_request(request, None);

        let gas_estimate = self
            .provider
            .estimate_gas(estimation_request)
            .await
            .map_err(map_transport_error)?;

        Ok(gas_estimate)
    }

    async fn send_transaction(
        &self,
        request: &CallRequest,
        gas_limit: u64,
    ) -> Result<SubmittedTransaction, ExecutionError> {
        info!("🚀 AlloyExecutor: Sending transaction to {}", request.to);

        let tx_request = self.build_transaction_request(request, Some(gas_limit));
        self.log_transaction_debug_info(&tx_request, &request.call_data);

        let pending_tx = self.provider.send_transaction(tx_request).await.map_err(|e| {
            let mapped = map_transport_error(e);
            error!("❌ ALLOY EXECUTOR TRANSACTION FAILED:");
            error!("  Error: {}", mapped);
            error!("  Contract address: {:?}", request.to);
            error!("  Signer address: {:?}", self.signer_address);
            mapped
        })?;

        Ok(SubmittedTransaction {
            tx_hash: *pending_tx.tx_hash(),
            input: Bytes::from(request.call_data.clone()),
        })
    }

    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<ReceiptSummary, ExecutionError> {
        info!("⏳ Waiting for {} to be mined...", tx_hash);

        let receipt = PendingTransactionBuilder::new(self.provider.root().clone(), tx_hash)
            .get_receipt()
            .await
            .map_err(|e| ExecutionError::Transport(format!("Failed to get transaction receipt: {}", e)))?;

        Ok(ReceiptSummary {
            tx_hash: receipt.transaction_hash,
            status: receipt.status(),
            block_number: receipt.block_number,
            gas_used: receipt.gas_used,
        })
    }

    fn signer_address(&self) -> Address {
        self.signer_address
    }

    fn description(&self) -> &str {
        "AlloyExecutor: Uses an Alloy HTTP provider with a local private-key wallet"
    }
}
