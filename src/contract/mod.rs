//! Smart contract artifacts
//!
//! This module provides:
//! - The contract interface description (JSON ABI) with call encoding
//! - A driver for the external Vyper compiler
//!
//! # Example
//!
//! ```rust
//! use digital_evidence_tools::contract::ContractAbi;
//!
//! let abi = ContractAbi::from_json(r#"[
//!     {"type":"function","name":"roles","stateMutability":"view",
//!      "inputs":[{"name":"arg0","type":"address"}],
//!      "outputs":[{"name":"","type":"uint256"}]}
//! ]"#).unwrap();
//!
//! assert!(abi.function("roles").is_ok());
//! ```

pub mod abi;
pub mod compiler;

pub use abi::{AbiError, ContractAbi};
pub use compiler::{parse_bytecode, CompiledContract, CompilerError, ContractCompiler, VyperCompiler};
