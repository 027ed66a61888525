use alloy::dyn_abi::{DynSolValue, FunctionExt, JsonAbiExt};
use alloy::json_abi::{Function, JsonAbi};
use std::fmt;
use std::path::{Path, PathBuf};

/// Functions the registration workflow calls on the proxy
pub const REQUIRED_FUNCTIONS: [&str; 4] = [
    "minDlpStakeAmount",
    "paused",
    "getDlpStatus",
    "registerDlp",
];

#[derive(Debug, thiserror::Error)]
pub enum AbiError {
    #[error("Failed to read interface description {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed interface description: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Interface description is missing function: {0}")]
    MissingFunction(String),
    #[error("Interface description declares no error types")]
    NoErrors,
    #[error("Failed to encode {function} call: {reason}")]
    Encode { function: String, reason: String },
    #[error("Failed to decode {function} result: {reason}")]
    Decode { function: String, reason: String },
}

/// A custom error decoded from revert data using the loaded interface
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedError {
    pub name: String,
    pub args: Vec<DynSolValue>,
}

impl fmt::Display for DecodedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let args: Vec<String> = self.args.iter().map(format_value).collect();
        write!(f, "{}({})", self.name, args.join(", "))
    }
}

/// The proxy's interface description, loaded once from a JSON ABI file
///
/// Immutable after load. Loading validates that every function in
/// [`REQUIRED_FUNCTIONS`] is present and that at least one error type is
/// declared, so a bad file is rejected before the network is touched.
#[derive(Debug, Clone)]
pub struct InterfaceDescription {
    abi: JsonAbi,
}

impl InterfaceDescription {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AbiError> {
        let path = path.as_ref();
        tracing::info!("📄 Loading interface description from {}", path.display());

        let json = std::fs::read_to_string(path).map_err(|source| AbiError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let description = Self::from_json(&json)?;

        tracing::info!(
            "✅ Interface description loaded: {} functions, {} events",
            description.abi.functions().count(),
            description.abi.events().count()
        );
        tracing::info!("  Declared errors: {}", description.error_names().join(", "));

        Ok(description)
    }

    pub fn from_json(json: &str) -> Result<Self, AbiError> {
        let abi: JsonAbi = serde_json::from_str(json)?;
        let description = Self { abi };
        description.validate()?;
        Ok(description)
    }

    fn validate(&self) -> Result<(), AbiError> {
        for name in REQUIRED_FUNCTIONS {
            self.function(name)?;
        }

        if self.abi.errors().next().is_none() {
            return Err(AbiError::NoErrors);
        }

        Ok(())
    }

    /// First overload of the named function
    pub fn function(&self, name: &str) -> Result<&Function, AbiError> {
        self.abi
            .function(name)
            .and_then(|overloads| overloads.first())
            .ok_or_else(|| AbiError::MissingFunction(name.to_string()))
    }

    pub fn error_names(&self) -> Vec<&str> {
        self.abi.errors().map(|e| e.name.as_str()).collect()
    }

    pub fn encode_call(&self, name: &str, args: &[DynSolValue]) -> Result<Vec<u8>, AbiError> {
        let function = self.function(name)?;
        function.abi_encode_input(args).map_err(|e| AbiError::Encode {
            function: name.to_string(),
            reason: e.to_string(),
        })
    }

    pub fn decode_output(&self, name: &str, data: &[u8]) -> Result<Vec<DynSolValue>, AbiError> {
        let function = self.function(name)?;
        function.abi_decode_output(data).map_err(|e| AbiError::Decode {
            function: name.to_string(),
            reason: e.to_string(),
        })
    }

    /// Match the 4-byte selector against the declared error types and decode the arguments
    pub fn decode_error(&self, data: &[u8]) -> Option<DecodedError> {
        if data.len() < 4 {
            return None;
        }
        let (selector, payload) = data.split_at(4);

        let error = self
            .abi
            .errors()
            .find(|error| error.selector().as_slice() == selector)?;

        let args = error.abi_decode_input(payload).ok()?;

        Some(DecodedError {
            name: error.name.clone(),
            args,
        })
    }

    /// Human-readable reason for a revert payload
    ///
    /// Custom errors declared in the interface win; otherwise falls back to the
    /// standard `Error(string)` and `Panic(uint256)` encodings.
    pub fn revert_reason(&self, data: &[u8]) -> Option<String> {
        self.decode_error(data)
            .map(|decoded| decoded.to_string())
            .or_else(|| alloy::sol_types::decode_revert_reason(data))
    }
}

/// Render a decoded ABI value for log output
pub fn format_value(value: &DynSolValue) -> String {
    match value {
        DynSolValue::Bool(b) => b.to_string(),
        DynSolValue::Uint(v, _) => v.to_string(),
        DynSolValue::Int(v, _) => v.to_string(),
        DynSolValue::Address(a) => a.to_string(),
        DynSolValue::String(s) => format!("{:?}", s),
        DynSolValue::Bytes(b) => format!("0x{}", hex::encode(b)),
        DynSolValue::FixedBytes(word, size) => format!("0x{}", hex::encode(&word[..*size])),
        DynSolValue::Array(items) | DynSolValue::FixedArray(items) | DynSolValue::Tuple(items) => {
            let inner: Vec<String> = items.iter().map(format_value).collect();
            format!("[{}]", inner.join(", "))
        }
        other => format!("{:?}", other),
    }
}
