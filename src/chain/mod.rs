//! Blockchain access
//!
//! This module provides:
//! - The [`ChainClient`] interface used by the deployer and the role manager
//! - A JSON-RPC implementation backed by `alloy`

pub mod client;
pub mod rpc;

#[cfg(test)]
pub(crate) mod fake;

pub use client::{ChainClient, ChainError, OutgoingTx, Receipt};
pub use rpc::{RpcClient, CONNECT_TIMEOUT, RECEIPT_POLL_INTERVAL};
