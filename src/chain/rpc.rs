//! JSON-RPC chain client
//!
//! Wraps an `alloy` HTTP provider with a local private-key wallet. Every call
//! blocks on a private tokio runtime, so the tools stay strictly sequential.

use crate::chain::client::{ChainClient, ChainError, OutgoingTx, Receipt};
use alloy::network::EthereumWallet;
use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::{TransactionInput, TransactionReceipt, TransactionRequest};
use alloy::signers::local::PrivateKeySigner;
use alloy::transports::TransportErrorKind;
use std::time::Duration;
use tokio::runtime::Runtime;

/// Delay between receipt polls
pub const RECEIPT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// How long `connect` waits for the endpoint to answer `eth_chainId`
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Chain client backed by a JSON-RPC endpoint
pub struct RpcClient {
    runtime: Runtime,
    provider: DynProvider,
    sender: Address,
    receipt_timeout: Option<Duration>,
}

impl RpcClient {
    /// Connect to `rpc_url`, signing with `private_key`.
    ///
    /// Fails fast if the endpoint does not answer `eth_chainId` within
    /// [`CONNECT_TIMEOUT`].
    pub fn connect(
        rpc_url: &str,
        private_key: &str,
        receipt_timeout: Option<Duration>,
    ) -> Result<Self, ChainError> {
        Self::connect_within(rpc_url, private_key, receipt_timeout, CONNECT_TIMEOUT)
    }

    /// [`RpcClient::connect`] with an explicit limit on the initial handshake
    pub fn connect_within(
        rpc_url: &str,
        private_key: &str,
        receipt_timeout: Option<Duration>,
        connect_timeout: Duration,
    ) -> Result<Self, ChainError> {
        let signer: PrivateKeySigner = private_key
            .trim()
            .parse()
            .map_err(|_| ChainError::InvalidPrivateKey)?;
        let sender = signer.address();

        let url = rpc_url
            .parse()
            .map_err(|_| ChainError::InvalidEndpoint(rpc_url.to_string()))?;

        let runtime = Runtime::new()?;
        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer))
            .connect_http(url)
            .erased();

        let client = Self {
            runtime,
            provider,
            sender,
            receipt_timeout,
        };

        let answered = client
            .runtime
            .block_on(async {
                tokio::time::timeout(connect_timeout, client.fetch_chain_id()).await
            })
            .unwrap_or_else(|_| {
                Err(TransportErrorKind::custom_str(&format!(
                    "no answer within {}ms",
                    connect_timeout.as_millis()
                )))
            });
        answered.map_err(|source| ChainError::Unreachable {
            url: rpc_url.to_string(),
            source,
        })?;

        log::debug!("Connected to {} as {}", rpc_url, sender);
        Ok(client)
    }

    /// Translate an outgoing transaction into an RPC request from the sender
    fn request(&self, tx: &OutgoingTx) -> TransactionRequest {
        TransactionRequest {
            from: Some(self.sender),
            to: Some(tx.kind),
            input: TransactionInput::new(tx.input.clone()),
            gas: tx.gas_limit,
            ..Default::default()
        }
    }

    async fn fetch_chain_id(&self) -> Result<u64, alloy::transports::TransportError> {
        self.provider.get_chain_id().await
    }

    async fn submit(&self, tx: OutgoingTx) -> Result<TxHash, ChainError> {
        let nonce = self.provider.get_transaction_count(self.sender).await?;
        let gas_price = self.provider.get_gas_price().await?;

        let mut request = self.request(&tx);
        request.nonce = Some(nonce);
        request.gas_price = Some(gas_price);

        log::debug!(
            "Sending transaction nonce={} gas={:?} gas_price={}",
            nonce,
            tx.gas_limit,
            gas_price
        );

        let pending = self.provider.send_transaction(request).await?;
        Ok(*pending.tx_hash())
    }

    async fn poll_receipt(&self, hash: TxHash) -> Result<Receipt, ChainError> {
        loop {
            if let Some(receipt) = self.provider.get_transaction_receipt(hash).await? {
                return Ok(Receipt::from(&receipt));
            }
            tokio::time::sleep(RECEIPT_POLL_INTERVAL).await;
        }
    }

    async fn await_receipt(&self, hash: TxHash) -> Result<Receipt, ChainError> {
        match self.receipt_timeout {
            Some(limit) => tokio::time::timeout(limit, self.poll_receipt(hash))
                .await
                .map_err(|_| ChainError::ReceiptTimeout {
                    hash,
                    waited: limit,
                })?,
            None => self.poll_receipt(hash).await,
        }
    }
}

impl ChainClient for RpcClient {
    fn chain_id(&self) -> Result<u64, ChainError> {
        Ok(self.runtime.block_on(self.fetch_chain_id())?)
    }

    fn sender(&self) -> Address {
        self.sender
    }

    fn balance(&self, account: Address) -> Result<U256, ChainError> {
        let balance = self
            .runtime
            .block_on(async { self.provider.get_balance(account).await })?;
        Ok(balance)
    }

    fn estimate_gas(&self, tx: &OutgoingTx) -> Result<u64, ChainError> {
        let request = self.request(tx);
        let gas = self
            .runtime
            .block_on(async { self.provider.estimate_gas(request).await })?;
        Ok(gas)
    }

    fn send(&self, tx: OutgoingTx) -> Result<TxHash, ChainError> {
        self.runtime.block_on(self.submit(tx))
    }

    fn wait_for_receipt(&self, hash: TxHash) -> Result<Receipt, ChainError> {
        self.runtime.block_on(self.await_receipt(hash))
    }

    fn call(&self, tx: &OutgoingTx) -> Result<Bytes, ChainError> {
        let request = self.request(tx);
        let output = self
            .runtime
            .block_on(async { self.provider.call(request).await })?;
        Ok(output)
    }
}

impl From<&TransactionReceipt> for Receipt {
    fn from(receipt: &TransactionReceipt) -> Self {
        Self {
            transaction_hash: receipt.transaction_hash,
            contract_address: receipt.contract_address,
            gas_used: receipt.gas_used,
            block_number: receipt.block_number,
            success: receipt.status(),
        }
    }
}
