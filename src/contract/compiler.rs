//! Vyper compiler driver
//!
//! Runs the external `vyper` binary to produce the ABI and creation bytecode
//! of a contract source file.

use crate::contract::abi::{AbiError, ContractAbi};
use alloy::primitives::Bytes;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use thiserror::Error;

/// Compiler errors
#[derive(Error, Debug)]
pub enum CompilerError {
    #[error("Compiler not found: {0} (install it with `pip install vyper`)")]
    NotFound(PathBuf),
    #[error("Contract source not found: {0}")]
    SourceNotFound(PathBuf),
    #[error("Compiler exited with {status}: {stderr}")]
    Failed { status: ExitStatus, stderr: String },
    #[error("Compiler produced an invalid ABI: {0}")]
    InvalidAbi(#[from] AbiError),
    #[error("Compiler produced invalid bytecode: {0}")]
    InvalidBytecode(String),
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

/// Output of a successful compilation
#[derive(Debug, Clone)]
pub struct CompiledContract {
    /// Interface description
    pub abi: ContractAbi,
    /// Creation bytecode
    pub bytecode: Bytes,
}

/// Anything that can turn a contract source file into deployable artifacts
pub trait ContractCompiler {
    fn compile(&self, source: &Path) -> Result<CompiledContract, CompilerError>;
}

/// Compiler backed by the `vyper` command-line tool
#[derive(Debug, Clone)]
pub struct VyperCompiler {
    binary: PathBuf,
    evm_version: String,
}

impl VyperCompiler {
    /// Create a compiler that invokes `binary`
    pub fn new(binary: impl Into<PathBuf>, evm_version: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            evm_version: evm_version.into(),
        }
    }

    /// Run the compiler with a single output format and return its stdout
    fn run_format(&self, format: &str, source: &Path) -> Result<String, CompilerError> {
        log::debug!(
            "Running {} -f {} --evm-version {} {}",
            self.binary.display(),
            format,
            self.evm_version,
            source.display()
        );

        let output = Command::new(&self.binary)
            .arg("-f")
            .arg(format)
            .arg("--evm-version")
            .arg(&self.evm_version)
            .arg(source)
            .output()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => CompilerError::NotFound(self.binary.clone()),
                _ => CompilerError::IoError(e),
            })?;

        if !output.status.success() {
            return Err(CompilerError::Failed {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Default for VyperCompiler {
    fn default() -> Self {
        Self::new(
            crate::config::DEFAULT_VYPER_BIN,
            crate::config::DEFAULT_EVM_VERSION,
        )
    }
}

impl ContractCompiler for VyperCompiler {
    fn compile(&self, source: &Path) -> Result<CompiledContract, CompilerError> {
        if !source.is_file() {
            return Err(CompilerError::SourceNotFound(source.to_path_buf()));
        }

        let abi = ContractAbi::from_json(self.run_format("abi", source)?.trim())?;
        let bytecode = parse_bytecode(&self.run_format("bytecode", source)?)?;

        log::info!(
            "Compiled {} ({} functions, {} bytes of bytecode)",
            source.display(),
            abi.function_count(),
            bytecode.len()
        );

        Ok(CompiledContract { abi, bytecode })
    }
}

/// Parse hex bytecode as printed by the compiler
pub fn parse_bytecode(raw: &str) -> Result<Bytes, CompilerError> {
    let trimmed = raw.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    if digits.is_empty() {
        return Err(CompilerError::InvalidBytecode("empty output".to_string()));
    }

    hex::decode(digits)
        .map(Bytes::from)
        .map_err(|e| CompilerError::InvalidBytecode(e.to_string()))
}
