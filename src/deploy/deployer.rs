//! Contract deployment
//!
//! Compiles the contract, submits a creation transaction with a gas safety
//! margin, and, once the chain confirms it, records the new address and ABI
//! where the backend expects them.

use crate::chain::{ChainClient, ChainError, OutgoingTx, Receipt};
use crate::config::{keys, ProjectLayout};
use crate::contract::{CompiledContract, CompilerError, ContractCompiler};
use crate::storage::{self, StorageError};
use alloy::primitives::{Address, TxHash};
use thiserror::Error;

/// Safety margin added on top of the node's gas estimate
pub const GAS_MARGIN_PERCENT: u64 = 20;

/// Deployment errors
#[derive(Error, Debug)]
pub enum DeployError {
    #[error("Compiler error: {0}")]
    CompilerError(#[from] CompilerError),
    #[error("Chain error: {0}")]
    ChainError(#[from] ChainError),
    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),
    #[error("Deployment transaction failed: {0}")]
    Reverted(Box<Receipt>),
    #[error("Receipt for {0} carries no contract address")]
    MissingContractAddress(TxHash),
}

/// Gas limit for an estimate, including the safety margin (rounded down)
pub fn apply_gas_margin(estimate: u64) -> u64 {
    let padded = u128::from(estimate) * u128::from(100 + GAS_MARGIN_PERCENT) / 100;
    u64::try_from(padded).unwrap_or(u64::MAX)
}

/// A confirmed deployment
#[derive(Debug, Clone)]
pub struct Deployment {
    /// Address of the new contract
    pub address: Address,
    /// Gas limit the creation transaction was sent with
    pub gas_limit: u64,
    pub receipt: Receipt,
}

/// Drives a single deployment
pub struct Deployer<'a, C: ChainClient, K: ContractCompiler> {
    client: &'a C,
    compiler: &'a K,
    layout: &'a ProjectLayout,
}

impl<'a, C: ChainClient, K: ContractCompiler> Deployer<'a, C, K> {
    pub fn new(client: &'a C, compiler: &'a K, layout: &'a ProjectLayout) -> Self {
        Self {
            client,
            compiler,
            layout,
        }
    }

    /// Compile, deploy, and persist the artifacts of a successful deployment
    pub fn run(&self) -> Result<Deployment, DeployError> {
        log::info!("Compiling contract: {}", self.layout.contract_source.display());
        let compiled = self.compiler.compile(&self.layout.contract_source)?;

        let deployment = self.deploy(&compiled)?;
        self.persist(&compiled, &deployment)?;
        Ok(deployment)
    }

    /// Submit the creation transaction and wait for it to be mined.
    ///
    /// A receipt with a failed status is returned as [`DeployError::Reverted`].
    pub fn deploy(&self, compiled: &CompiledContract) -> Result<Deployment, DeployError> {
        let creation = OutgoingTx::create(compiled.bytecode.clone());

        let estimate = self.client.estimate_gas(&creation)?;
        let gas_limit = apply_gas_margin(estimate);
        log::info!("Estimated gas: {} (sending with limit {})", estimate, gas_limit);

        let hash = self.client.send(creation.with_gas_limit(gas_limit))?;
        log::info!("Transaction hash: {}", hash);
        log::info!("Waiting for confirmation...");

        let receipt = self.client.wait_for_receipt(hash)?;
        if !receipt.success {
            return Err(DeployError::Reverted(Box::new(receipt)));
        }

        let address = receipt
            .contract_address
            .ok_or(DeployError::MissingContractAddress(hash))?;

        Ok(Deployment {
            address,
            gas_limit,
            receipt,
        })
    }

    /// Write the ABI, then point the env file's contract address at the new
    /// contract. The address is only updated once the ABI is in place.
    pub fn persist(&self, compiled: &CompiledContract, deployment: &Deployment) -> Result<(), DeployError> {
        storage::write_abi(&self.layout.abi_file, &compiled.abi)?;
        log::info!("ABI saved to {}", self.layout.abi_file.display());

        storage::upsert_env_var(
            &self.layout.env_file,
            keys::CONTRACT_ADDRESS,
            &deployment.address.to_string(),
        )?;
        log::info!(
            "Contract address saved to {}",
            self.layout.env_file.display()
        );
        Ok(())
    }
}
