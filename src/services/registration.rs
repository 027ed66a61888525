use alloy::primitives::Bytes;
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{error, info};

use crate::config::AppConfig;
use crate::contracts::{AlloyExecutor, ExecutionEngine, ExecutionError, InterfaceDescription, RegisterOrchestrator};
use crate::models::{RegistrationOutcome, RegistrationParams};

/// Nested error fields worth showing an operator before the process exits
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FailureDetails {
    pub message: Option<String>,
    pub reason: Option<String>,
    pub data: Option<Bytes>,
}

impl FailureDetails {
    /// Walk the error chain for the first network-boundary error and pull out its parts
    pub fn extract(error: &anyhow::Error, interface: Option<&InterfaceDescription>) -> Self {
        let Some(execution_error) = error
            .chain()
            .find_map(|cause| cause.downcast_ref::<ExecutionError>())
        else {
            return Self::default();
        };

        let data = execution_error.revert_data().cloned();
        let reason = data.as_ref().and_then(|data| match interface {
            Some(interface) => interface.revert_reason(data),
            None => alloy::sol_types::decode_revert_reason(data),
        });

        Self {
            message: execution_error.rpc_message().map(str::to_string),
            reason,
            data,
        }
    }
}

pub struct RegistrationService {
    config: AppConfig,
}

impl RegistrationService {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Run the registration against the configured node
    pub async fn run(&self) -> Result<RegistrationOutcome> {
        self.run_with(|config| {
            let executor = AlloyExecutor::new(config)?;
            Ok(Arc::new(executor) as Arc<dyn ExecutionEngine>)
        })
        .await
    }

    /// Run the registration with a caller-supplied way to acquire the signing engine
    ///
    /// `connect` is only invoked once the interface description and the
    /// registration parameters are known to be valid. Any fatal error is
    /// reported once here and then returned.
    pub async fn run_with<F>(&self, connect: F) -> Result<RegistrationOutcome>
    where
        F: FnOnce(&AppConfig) -> Result<Arc<dyn ExecutionEngine>>,
    {
        let mut interface = None;

        let result = self.execute(connect, &mut interface).await;

        if let Err(e) = &result {
            report_failure(e, interface.as_deref());
        }

        result
    }

    async fn execute<F>(
        &self,
        connect: F,
        interface_slot: &mut Option<Arc<InterfaceDescription>>,
    ) -> Result<RegistrationOutcome>
    where
        F: FnOnce(&AppConfig) -> Result<Arc<dyn ExecutionEngine>>,
    {
        let interface = Arc::new(
            InterfaceDescription::load(&self.config.abi_path)
                .context("Failed to load interface description")?,
        );
        *interface_slot = Some(interface.clone());

        let params = RegistrationParams::from_config(&self.config.registration)
            .context("Invalid registration parameters")?;

        info!("🔑 Getting signer...");
        let executor = connect(&self.config).context("Failed to acquire signer")?;
        info!("  Signer obtained: {:?}", executor.signer_address());

        RegisterOrchestrator::new(interface, executor, params)
            .execute()
            .await
    }
}

/// Log whatever nested details the error carries
pub fn report_failure(error: &anyhow::Error, interface: Option<&InterfaceDescription>) {
    error!("💥 Failed during execution: {:#}", error);

    let details = FailureDetails::extract(error, interface);
    if let Some(message) = &details.message {
        error!("  Error message: {}", message);
    }
    if let Some(reason) = &details.reason {
        error!("  Reason: {}", reason);
    }
    if let Some(data) = &details.data {
        error!("  Error data: 0x{}", hex::encode(data));
    }
}

/// Process exit status for a finished run
pub fn exit_code<T>(result: &Result<T>) -> u8 {
    match result {
        Ok(_) => 0,
        Err(_) => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SignerConfig;
    use crate::contracts::abi::tests::TEST_ABI;
    use crate::contracts::execution::mock::{selector, LogCapture, MockExecutor};
    use alloy::primitives::U256;
    use alloy::sol_types::{Revert, SolError};
    use std::cell::Cell;
    use std::io::Write;

    fn config_with_abi(file: &tempfile::NamedTempFile) -> AppConfig {
        AppConfig {
            abi_path: file.path().to_string_lossy().into_owned(),
            ..AppConfig::default()
        }
    }

    fn abi_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_end_to_end_success() {
        let file = abi_file(TEST_ABI);
        let service = RegistrationService::new(config_with_abi(&file));
        let executor = Arc::new(MockExecutor::new());

        let (logs, _guard) = LogCapture::install();

        let engine = executor.clone();
        let result = service.run_with(move |_| Ok(engine as Arc<dyn ExecutionEngine>)).await;

        assert_eq!(exit_code(&result), 0);
        assert_eq!(result.unwrap().block_number(), Some(42));

        let output = logs.contents();
        assert!(output.contains(&format!("Signer obtained: {:?}", MockExecutor::SIGNER)));
        assert!(output.contains("Min DLP Stake Amount: 1000000000000000000000"));
        assert!(output.contains("Contract paused: false"));
        assert!(output.contains("Estimated gas: 210000"));
        assert!(output.contains("Block: 42"));
        assert!(output.contains("Gas used: 195000"));
        assert!(!output.contains("Transaction failed"));
    }

    #[tokio::test]
    async fn test_end_to_end_failed_status() {
        let file = abi_file(TEST_ABI);
        let service = RegistrationService::new(config_with_abi(&file));
        let executor = Arc::new(MockExecutor::new().with_receipt_status(false));

        let (logs, _guard) = LogCapture::install();

        let engine = executor.clone();
        let result = service.run_with(move |_| Ok(engine as Arc<dyn ExecutionEngine>)).await;

        assert_eq!(exit_code(&result), 1);
        assert!(result.unwrap_err().to_string().contains("Transaction failed"));

        let output = logs.contents();
        assert!(output.contains("❌ Transaction failed"));
        assert!(output.contains("Failed during execution"));
        assert!(!output.contains("Transaction confirmed"));
    }

    #[tokio::test]
    async fn test_missing_interface_fails_before_connecting() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            abi_path: dir.path().join("abi.json").to_string_lossy().into_owned(),
            ..AppConfig::default()
        };
        let connected = Cell::new(false);

        let result = RegistrationService::new(config)
            .run_with(|_| {
                connected.set(true);
                Ok(Arc::new(MockExecutor::new()) as Arc<dyn ExecutionEngine>)
            })
            .await;

        assert_eq!(exit_code(&result), 1);
        assert!(!connected.get());
    }

    #[tokio::test]
    async fn test_malformed_interface_fails_before_connecting() {
        let file = abi_file("{ not an abi");
        let connected = Cell::new(false);

        let result = RegistrationService::new(config_with_abi(&file))
            .run_with(|_| {
                connected.set(true);
                Ok(Arc::new(MockExecutor::new()) as Arc<dyn ExecutionEngine>)
            })
            .await;

        assert!(result.is_err());
        assert!(!connected.get());
    }

    #[tokio::test]
    async fn test_missing_signer_stops_before_network() {
        let file = abi_file(TEST_ABI);
        let config = AppConfig {
            signer: SignerConfig { private_key: None },
            ..config_with_abi(&file)
        };

        // The real connector: no key means no executor, so nothing can reach the network
        let result = RegistrationService::new(config).run().await;

        assert_eq!(exit_code(&result), 1);
        assert!(format!("{:#}", result.unwrap_err()).contains("No signer available"));
    }

    #[test]
    fn test_failure_details_decode_custom_error() {
        let interface = crate::contracts::abi::tests::test_interface();
        let mut data = selector("InvalidDlpStatus(uint8)").to_vec();
        data.extend_from_slice(&U256::from(2u8).to_be_bytes::<32>());

        let error = anyhow::Error::from(ExecutionError::Rpc {
            message: "execution reverted".to_string(),
            data: Some(Bytes::from(data.clone())),
        })
        .context("Failed to send transaction");

        let details = FailureDetails::extract(&error, Some(&interface));

        assert_eq!(details.message.as_deref(), Some("execution reverted"));
        assert_eq!(details.reason.as_deref(), Some("InvalidDlpStatus(2)"));
        assert_eq!(details.data, Some(Bytes::from(data)));
    }

    #[test]
    fn test_failure_details_without_interface_use_revert_string() {
        let data = Revert::from("DLP already registered".to_string()).abi_encode();
        let error = anyhow::Error::from(ExecutionError::Rpc {
            message: "execution reverted".to_string(),
            data: Some(Bytes::from(data)),
        });

        let details = FailureDetails::extract(&error, None);

        assert!(details.reason.unwrap().contains("DLP already registered"));
    }

    #[test]
    fn test_failure_details_empty_for_plain_errors() {
        let error = anyhow::anyhow!("Failed to read configuration sources");

        assert_eq!(FailureDetails::extract(&error, None), FailureDetails::default());
    }
}
