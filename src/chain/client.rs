//! Chain client interface
//!
//! All command logic talks to the network through [`ChainClient`], so it can
//! run against the JSON-RPC implementation or an in-memory stand-in.

use alloy::primitives::{Address, Bytes, TxHash, TxKind, U256};
use alloy::transports::TransportError;
use serde::Serialize;
use std::fmt;
use std::io;
use std::time::Duration;
use thiserror::Error;

/// Chain client errors
#[derive(Error, Debug)]
pub enum ChainError {
    #[error("Invalid private key")]
    InvalidPrivateKey,
    #[error("Invalid RPC endpoint: {0}")]
    InvalidEndpoint(String),
    #[error("Could not connect to blockchain at {url}")]
    Unreachable {
        url: String,
        #[source]
        source: TransportError,
    },
    #[error("RPC error: {0}")]
    Rpc(#[from] TransportError),
    #[error("No receipt for transaction {hash} after {}s", .waited.as_secs())]
    ReceiptTimeout { hash: TxHash, waited: Duration },
    #[error("Runtime error: {0}")]
    Runtime(#[from] io::Error),
}

/// A transaction to be signed and submitted (or simulated with `eth_call`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingTx {
    /// Contract creation or call to an address
    pub kind: TxKind,
    /// Creation bytecode or calldata
    pub input: Bytes,
    /// Explicit gas limit; `None` leaves it to the node
    pub gas_limit: Option<u64>,
}

impl OutgoingTx {
    /// A contract creation carrying `bytecode`
    pub fn create(bytecode: Bytes) -> Self {
        Self {
            kind: TxKind::Create,
            input: bytecode,
            gas_limit: None,
        }
    }

    /// A call to `to` carrying `calldata`
    pub fn call(to: Address, calldata: Bytes) -> Self {
        Self {
            kind: TxKind::Call(to),
            input: calldata,
            gas_limit: None,
        }
    }

    /// Set the gas limit
    pub fn with_gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = Some(gas_limit);
        self
    }

    /// Whether this transaction creates a contract
    pub fn is_create(&self) -> bool {
        self.kind.is_create()
    }
}

/// The parts of a transaction receipt the tools report on
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub transaction_hash: TxHash,
    pub contract_address: Option<Address>,
    pub gas_used: u64,
    pub block_number: Option<u64>,
    /// Receipt status flag (`status == 1`)
    pub success: bool,
}

impl fmt::Display for Receipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "tx {} status={} gas_used={}",
            self.transaction_hash,
            u8::from(self.success),
            self.gas_used
        )?;
        if let Some(block) = self.block_number {
            write!(f, " block={}", block)?;
        }
        if let Some(address) = self.contract_address {
            write!(f, " contract={}", address)?;
        }
        Ok(())
    }
}

/// Blocking access to an EVM chain on behalf of a single signing account
pub trait ChainClient {
    /// Chain id reported by the node
    fn chain_id(&self) -> Result<u64, ChainError>;

    /// Address of the signing account
    fn sender(&self) -> Address;

    /// Balance of `account` in wei
    fn balance(&self, account: Address) -> Result<U256, ChainError>;

    /// Gas the node expects `tx` to consume when sent from [`Self::sender`]
    fn estimate_gas(&self, tx: &OutgoingTx) -> Result<u64, ChainError>;

    /// Sign and submit `tx`, returning its hash without waiting for inclusion
    fn send(&self, tx: OutgoingTx) -> Result<TxHash, ChainError>;

    /// Block until the receipt for `hash` is available
    fn wait_for_receipt(&self, hash: TxHash) -> Result<Receipt, ChainError>;

    /// Execute `tx` read-only and return the raw return data
    fn call(&self, tx: &OutgoingTx) -> Result<Bytes, ChainError>;
}
