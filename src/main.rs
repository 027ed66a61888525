mod config;
mod contracts;
mod models;
mod services;

use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::services::registration::{exit_code, report_failure, RegistrationService};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting DLP registration");

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            report_failure(&e, None);
            return ExitCode::from(1);
        }
    };
    info!("Configuration loaded successfully");

    let service = RegistrationService::new(config);
    let result = service.run().await;

    match &result {
        Ok(outcome) => {
            info!("🎉 DLP registered in block {:?}", outcome.block_number());
            info!("  Transaction hash: {}", outcome.transaction.tx_hash);
            if let Some(estimate) = outcome.gas_estimate {
                info!("  Gas estimated / used: {} / {}", estimate, outcome.receipt.gas_used);
            }
        }
        Err(_) => error!("DLP registration failed"),
    }

    ExitCode::from(exit_code(&result))
}
