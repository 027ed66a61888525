use alloy::primitives::{Bytes, TxHash};

/// A transaction accepted by the node but not yet mined
#[derive(Debug, Clone, PartialEq)]
pub struct SubmittedTransaction {
    pub tx_hash: TxHash,
    pub input: Bytes,
}

/// The parts of a transaction receipt the workflow reports on
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptSummary {
    pub tx_hash: TxHash,
    /// `true` when the transaction executed successfully; mined alone is not enough
    pub status: bool,
    pub block_number: Option<u64>,
    pub gas_used: u64,
}

/// Result of a successful registration run
#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationOutcome {
    pub transaction: SubmittedTransaction,
    pub receipt: ReceiptSummary,
    pub gas_estimate: Option<u64>,
}

impl RegistrationOutcome {
    pub fn block_number(&self) -> Option<u64> {
        self.receipt.block_number
    }
}
