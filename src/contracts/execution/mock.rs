use alloy::primitives::{address, keccak256, Address, Bytes, TxHash, B256, U256};
use async_trait::async_trait;
use std::collections::HashMap;
use std::io;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

use crate::contracts::execution::traits::{CallRequest, ExecutionEngine, ExecutionError};
use crate::models::{ReceiptSummary, SubmittedTransaction};

/// Scripted engine that records every call it receives
///
/// Defaults to a healthy node: stake 1000e18, unpaused, status 1, a 210000 gas
/// estimate and a successful receipt in block 42 using 195000 gas.
pub struct MockExecutor {
    reads: HashMap<[u8; 4], Result<Vec<u8>, ExecutionError>>,
    gas_estimate: Result<u64, ExecutionError>,
    send_result: Result<TxHash, ExecutionError>,
    receipt: Result<ReceiptSummary, ExecutionError>,
    calls: Mutex<Vec<String>>,
}

pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

pub fn word(value: U256) -> Vec<u8> {
    value.to_be_bytes::<32>().to_vec()
}

pub fn rpc_error(message: &str) -> ExecutionError {
    ExecutionError::Rpc {
        message: message.to_string(),
        data: None,
    }
}

/// In-memory sink for formatted `tracing` output
///
/// Install with [`LogCapture::install`]; the returned guard keeps it as the
/// thread's default subscriber, which covers `#[tokio::test]` bodies since
/// they run on a single thread.
#[derive(Clone, Default)]
pub struct LogCapture {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    pub fn install() -> (Self, tracing::subscriber::DefaultGuard) {
        let capture = Self::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(capture.clone())
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .finish();
        let guard = tracing::subscriber::set_default(subscriber);
        (capture, guard)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = LogCapture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

impl MockExecutor {
    pub const SIGNER: Address = address!("abc0000000000000000000000000000000000001");
    pub const TX_HASH: B256 = B256::repeat_byte(0x42);

    pub fn new() -> Self {
        let stake = U256::from(1000u64) * U256::from(10u64).pow(U256::from(18u64));

        let mut reads = HashMap::new();
        reads.insert(selector("minDlpStakeAmount()"), Ok(word(stake)));
        reads.insert(selector("paused()"), Ok(word(U256::ZERO)));
        reads.insert(selector("getDlpStatus(address)"), Ok(word(U256::from(1u8))));

        Self {
            reads,
            gas_estimate: Ok(210_000),
            send_result: Ok(Self::TX_HASH),
            receipt: Ok(ReceiptSummary {
                tx_hash: Self::TX_HASH,
                status: true,
                block_number: Some(42),
                gas_used: 195_000,
            }),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_read(mut self, signature: &str, result: Result<Vec<u8>, ExecutionError>) -> Self {
        self.reads.insert(selector(signature), result);
        self
    }

    pub fn with_gas_estimate(mut self, result: Result<u64, ExecutionError>) -> Self {
        self.gas_estimate = result;
        self
    }

    pub fn with_send_result(mut self, result: Result<TxHash, ExecutionError>) -> Self {
        self.send_result = result;
        self
    }

    pub fn with_receipt_status(mut self, status: bool) -> Self {
        if let Ok(receipt) = self.receipt.as_mut() {
            receipt.status = status;
        }
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ExecutionEngine for MockExecutor {
    async fn static_call(&self, request: &CallRequest) -> Result<Vec<u8>, ExecutionError> {
        if request.call_data.len() < 4 {
            self.record("static_call:short".to_string());
            return Err(rpc_error("call data shorter than a selector"));
        }
        let mut key = [0u8; 4];
        key.copy_from_slice(&request.call_data[..4]);
        self.record(format!("static_call:0x{}", hex::encode(key)));

        self.reads
            .get(&key)
            .cloned()
            .unwrap_or_else(|| Err(rpc_error("execution reverted")))
    }

    async fn estimate_gas(&self, request: &CallRequest) -> Result<u64, ExecutionError> {
        self.record(format!("estimate_gas:{}", request.value));
        self.gas_estimate.clone()
    }

    async fn send_transaction(
        &self,
        request: &CallRequest,
        gas_limit: u64,
    ) -> Result<SubmittedTransaction, ExecutionError> {
        self.record(format!("send_transaction:{}:{}", request.value, gas_limit));
        let tx_hash = self.send_result.clone()?;
        Ok(SubmittedTransaction {
            tx_hash,
            input: Bytes::from(request.call_data.clone()),
        })
    }

    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<ReceiptSummary, ExecutionError> {
        self.record(format!("wait_for_receipt:{}", tx_hash));
        self.receipt.clone()
    }

    fn signer_address(&self) -> Address {
        Self::SIGNER
    }

    fn description(&self) -> &str {
        "MockExecutor: scripted responses for tests"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_short_call_data_is_rejected() {
        let executor = MockExecutor::new();
        let request = CallRequest::new(Address::ZERO, vec![0x01, 0x02]);

        let result = executor.static_call(&request).await;

        assert!(matches!(result, Err(ExecutionError::Rpc { .. })));
        assert_eq!(executor.calls(), vec!["static_call:short"]);
    }
}
