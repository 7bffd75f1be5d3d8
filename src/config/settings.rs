//! Runtime configuration
//!
//! Settings are read once from the process environment (optionally seeded from a
//! `.env` file) and never change for the lifetime of a command.

use alloy::primitives::Address;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Default JSON-RPC endpoint (local development node)
pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545";

/// Default compiler binary
pub const DEFAULT_VYPER_BIN: &str = "vyper";

/// Default EVM version passed to the compiler
pub const DEFAULT_EVM_VERSION: &str = "istanbul";

/// Default upper bound on waiting for a transaction receipt
pub const DEFAULT_RECEIPT_TIMEOUT_SECS: u64 = 120;

/// Environment variable names
pub mod keys {
    pub const RPC_URL: &str = "BLOCKCHAIN_RPC_URL";
    pub const PRIVATE_KEY: &str = "PRIVATE_KEY";
    pub const CONTRACT_ADDRESS: &str = "CONTRACT_ADDRESS";
    pub const VYPER_BIN: &str = "VYPER_BIN";
    pub const EVM_VERSION: &str = "EVM_VERSION";
    pub const RECEIPT_TIMEOUT_SECS: &str = "RECEIPT_TIMEOUT_SECS";
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("PRIVATE_KEY not found in environment variables (set it in the .env file)")]
    MissingPrivateKey,
    #[error("CONTRACT_ADDRESS not found in environment variables (run the deployer first)")]
    MissingContractAddress,
    #[error("Invalid CONTRACT_ADDRESS: {0}")]
    InvalidContractAddress(String),
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

/// Load a `.env` file into the process environment, if one can be found.
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => log::debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => log::debug!("No .env file found"),
        Err(e) => log::warn!("Ignoring unreadable .env file: {}", e),
    }
}

/// Settings shared by both command-line tools
#[derive(Debug, Clone)]
pub struct Settings {
    /// JSON-RPC endpoint
    pub rpc_url: String,
    /// Hex-encoded signing key
    pub private_key: Option<String>,
    /// Address of the deployed contract
    pub contract_address: Option<String>,
    /// Compiler binary name or path
    pub vyper_bin: PathBuf,
    /// EVM version targeted by the compiler
    pub evm_version: String,
    /// `None` waits for receipts indefinitely
    pub receipt_timeout: Option<Duration>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            private_key: None,
            contract_address: None,
            vyper_bin: PathBuf::from(DEFAULT_VYPER_BIN),
            evm_version: DEFAULT_EVM_VERSION.to_string(),
            receipt_timeout: Some(Duration::from_secs(DEFAULT_RECEIPT_TIMEOUT_SECS)),
        }
    }
}

impl Settings {
    /// Read settings from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through an arbitrary key lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let defaults = Self::default();

        let receipt_timeout = match get(keys::RECEIPT_TIMEOUT_SECS) {
            None => defaults.receipt_timeout,
            Some(raw) => {
                let secs: u64 = raw.parse().map_err(|_| ConfigError::InvalidValue {
                    key: keys::RECEIPT_TIMEOUT_SECS,
                    value: raw.clone(),
                })?;
                (secs > 0).then(|| Duration::from_secs(secs))
            }
        };

        Ok(Self {
            rpc_url: get(keys::RPC_URL).unwrap_or(defaults.rpc_url),
            private_key: get(keys::PRIVATE_KEY),
            contract_address: get(keys::CONTRACT_ADDRESS),
            vyper_bin: get(keys::VYPER_BIN)
                .map(PathBuf::from)
                .unwrap_or(defaults.vyper_bin),
            evm_version: get(keys::EVM_VERSION).unwrap_or(defaults.evm_version),
            receipt_timeout,
        })
    }

    /// The signing key, or an error if it is not configured
    pub fn require_private_key(&self) -> Result<&str, ConfigError> {
        self.private_key
            .as_deref()
            .ok_or(ConfigError::MissingPrivateKey)
    }

    /// The deployed contract address, or an error if it is missing or malformed
    pub fn require_contract_address(&self) -> Result<Address, ConfigError> {
        let raw = self
            .contract_address
            .as_deref()
            .ok_or(ConfigError::MissingContractAddress)?;
        raw.parse()
            .map_err(|_| ConfigError::InvalidContractAddress(raw.to_string()))
    }
}

/// Fixed file locations inside the project tree
#[derive(Debug, Clone)]
pub struct ProjectLayout {
    pub root: PathBuf,
    pub contract_source: PathBuf,
    pub env_file: PathBuf,
    pub abi_file: PathBuf,
}

impl ProjectLayout {
    /// Resolve the standard layout under `root`
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        Self {
            contract_source: root.join("contracts").join("DigitalEvidence.vy"),
            env_file: root.join("backend").join(".env"),
            abi_file: root
                .join("backend")
                .join("src")
                .join("config")
                .join("contractABI.json"),
            root,
        }
    }
}

impl Default for ProjectLayout {
    fn default() -> Self {
        Self::new(".")
    }
}
