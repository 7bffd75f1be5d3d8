//! Configuration for the deployment and role management tools

pub mod settings;

pub use settings::{
    keys, load_dotenv, ConfigError, ProjectLayout, Settings, DEFAULT_EVM_VERSION,
    DEFAULT_RECEIPT_TIMEOUT_SECS, DEFAULT_RPC_URL, DEFAULT_VYPER_BIN,
};
