use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub network: NetworkConfig,
    pub signer: SignerConfig,
    pub registration: RegistrationConfig,
    pub abi_path: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct NetworkConfig {
    pub rpc_url: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct SignerConfig {
    pub private_key: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RegistrationConfig {
    pub proxy_address: String,
    pub dlp_address: String,
    pub dlp_owner_address: String,
    /// Decimal string, scaled by 10^18 before use
    pub stakers_percentage: String,
    /// Native value attached to the call, decimal string scaled by 10^18
    pub value: String,
    pub gas_limit: u64,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        tracing::info!("Loading configuration...");

        let settings = config::Config::builder()
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(environment())
            .build()
            .context("Failed to read configuration sources")?;

        let mut config: AppConfig = settings
            .try_deserialize()
            .context("Invalid configuration")?;

        config.apply_env_overrides();

        tracing::info!("Final configuration:");
        tracing::info!("  RPC URL: {}", config.network.rpc_url);
        tracing::info!("  ABI path: {}", config.abi_path);
        tracing::info!("  Signer configured: {}", config.signer.private_key.is_some());
        tracing::info!("  Gas limit: {}", config.registration.gas_limit);

        Ok(config)
    }

    /// Override with the short environment variables operators usually export
    fn apply_env_overrides(&mut self) {
        if let Ok(private_key) = std::env::var("PRIVATE_KEY") {
            self.signer.private_key = Some(private_key);
        }

        if let Ok(rpc_url) = std::env::var("RPC_URL") {
            self.network.rpc_url = rpc_url;
        }

        if let Ok(abi_path) = std::env::var("ABI_PATH") {
            self.abi_path = abi_path;
        }
    }
}

/// `DLP_REGISTRAR_<SECTION>__<KEY>` variables
///
/// Values stay strings: amounts are scaled from their exact decimal text, and
/// numeric fields such as `gas_limit` are converted during deserialization.
fn environment() -> config::Environment {
    config::Environment::with_prefix("DLP_REGISTRAR")
        .prefix_separator("_")
        .separator("__")
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            network: NetworkConfig::default(),
            signer: SignerConfig::default(),
            registration: RegistrationConfig::default(),
            abi_path: "abi/abi.json".to_string(),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://localhost:8545".to_string(),
        }
    }
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            proxy_address: "0xff14346dF2B8Fd0c95BF34f1c92e49417b508AD5".to_string(),
            dlp_address: "0xB973069d8977173f55Aaa8101A3F7f2bDaffD1C9".to_string(),
            dlp_owner_address: "0x0388B9f99EafDe4EdBbB3053baf9c9fCf4493bFE".to_string(),
            stakers_percentage: "50".to_string(),
            value: "100.0".to_string(),
            gas_limit: 500_000,
        }
    }
}
