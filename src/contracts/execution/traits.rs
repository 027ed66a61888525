use alloy::primitives::{Address, Bytes, TxHash, U256};
use async_trait::async_trait;

use crate::models::{ReceiptSummary, SubmittedTransaction};

/// Errors raised at the network boundary
///
/// `Rpc` keeps the node's message and any revert payload apart so callers can
/// decode the payload against the contract's declared error types.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ExecutionError {
    #[error("RPC error: {message}")]
    Rpc { message: String, data: Option<Bytes> },
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Transaction failed: {tx_hash} reverted in block {block_number:?}")]
    Reverted {
        tx_hash: TxHash,
        block_number: Option<u64>,
    },
}

impl ExecutionError {
    /// Raw revert payload returned by the node, if any
    pub fn revert_data(&self) -> Option<&Bytes> {
        match self {
            ExecutionError::Rpc { data, .. } => data.as_ref(),
            _ => None,
        }
    }

    /// The node's own error message, without the variant prefix
    pub fn rpc_message(&self) -> Option<&str> {
        match self {
            ExecutionError::Rpc { message, .. } => Some(message),
            _ => None,
        }
    }
}

/// A contract call: target, ABI-encoded input and attached native value
#[derive(Debug, Clone, PartialEq)]
pub struct CallRequest {
    pub to: Address,
    pub call_data: Vec<u8>,
    pub value: U256,
}

impl CallRequest {
    pub fn new(to: Address, call_data: Vec<u8>) -> Self {
        Self {
            to,
            call_data,
            value: U256::ZERO,
        }
    }

    pub fn with_value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }
}

/// Network boundary used by the registration workflow
///
/// Every method is a single round trip; implementations never retry.
#[async_trait]
pub trait ExecutionEngine: Send + Sync {
    /// Perform a read-only call and return the raw return data
    ///
    /// # Arguments
    /// * `request` - Target, call data and value of the call
    async fn static_call(&self, request: &CallRequest) -> Result<Vec<u8>, ExecutionError>;

    /// Estimate gas for a call sent from the signer's address
    ///
    /// # Arguments
    /// * `request` - Target, call data and value of the call
    async fn estimate_gas(&self, request: &CallRequest) -> Result<u64, ExecutionError>;

    /// Sign and broadcast a transaction with an explicit gas limit
    ///
    /// Returns as soon as the node accepts the transaction.
    async fn send_transaction(
        &self,
        request: &CallRequest,
        gas_limit: u64,
    ) -> Result<SubmittedTransaction, ExecutionError>;

    /// Block until the transaction is mined and return its receipt
    ///
    /// A mined transaction with a failed status is returned as `Ok`; judging the
    /// status is the caller's job.
    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<ReceiptSummary, ExecutionError>;

    /// Get the address of the signing identity
    fn signer_address(&self) -> Address;

    /// Get a human-readable description of this executor
    fn description(&self) -> &str;
}
