//! Digital Evidence tools: deployment and role administration for the
//! Digital Evidence smart contract
//!
//! This crate provides:
//! - Vyper compilation through the `vyper` command-line compiler
//! - Contract deployment with a gas safety margin and receipt tracking
//! - Persistence of the contract address (`.env`) and ABI for the backend
//! - Bitmask role management (grant, revoke, check) over JSON-RPC
//!
//! # Example
//!
//! ```rust
//! use digital_evidence_tools::roles::{Role, Roles};
//! use alloy::primitives::U256;
//!
//! let held = Roles::from_bitmap(U256::from(0b0101));
//! assert_eq!(held.members(), vec![Role::Admin, Role::Lab]);
//! assert_eq!(Role::Judge.value(), 8);
//! ```

pub mod chain;
pub mod cli;
pub mod config;
pub mod contract;
pub mod deploy;
pub mod roles;
pub mod storage;

// Re-export commonly used types
pub use chain::{ChainClient, ChainError, OutgoingTx, Receipt, RpcClient};
pub use config::{ConfigError, ProjectLayout, Settings};
pub use contract::{AbiError, CompiledContract, CompilerError, ContractAbi, ContractCompiler, VyperCompiler};
pub use deploy::{apply_gas_margin, DeployError, Deployer, Deployment};
pub use roles::{Role, RoleBitmap, RoleChange, RoleError, RoleManager, Roles};
pub use storage::StorageError;
