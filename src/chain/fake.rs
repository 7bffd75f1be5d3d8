//! In-memory chain used by unit tests
//!
//! Understands the role entry points of the Digital Evidence contract through
//! its ABI and counts every request that would have reached the network.

use crate::chain::client::{ChainClient, ChainError, OutgoingTx, Receipt};
use crate::contract::ContractAbi;
use alloy::dyn_abi::DynSolValue;
use alloy::primitives::{Address, Bytes, TxHash, TxKind, U256};
use alloy::transports::TransportErrorKind;
use std::cell::RefCell;
use std::collections::HashMap;
use std::time::Duration;

pub(crate) const FAKE_CHAIN_ID: u64 = 31337;

#[derive(Default)]
struct FakeState {
    roles: HashMap<Address, U256>,
    receipts: HashMap<TxHash, Receipt>,
    sent: Vec<OutgoingTx>,
    requests: usize,
    nonce: u64,
    revert_next: bool,
}

pub(crate) struct FakeChain {
    abi: ContractAbi,
    sender: Address,
    balance: U256,
    gas_estimate: u64,
    state: RefCell<FakeState>,
}

impl FakeChain {
    pub(crate) fn new(abi: ContractAbi) -> Self {
        Self {
            abi,
            sender: Address::repeat_byte(0xd3),
            balance: U256::from(10u64).pow(U256::from(18)),
            gas_estimate: 100_000,
            state: RefCell::new(FakeState::default()),
        }
    }

    pub(crate) fn with_gas_estimate(mut self, gas: u64) -> Self {
        self.gas_estimate = gas;
        self
    }

    pub(crate) fn with_balance(mut self, balance: U256) -> Self {
        self.balance = balance;
        self
    }

    /// Make the next submitted transaction fail on-chain
    pub(crate) fn revert_next(&self) {
        self.state.borrow_mut().revert_next = true;
    }

    /// Number of requests that reached the "network"
    pub(crate) fn requests(&self) -> usize {
        self.state.borrow().requests
    }

    pub(crate) fn sent(&self) -> Vec<OutgoingTx> {
        self.state.borrow().sent.clone()
    }

    pub(crate) fn set_roles(&self, account: Address, bitmap: U256) {
        self.state.borrow_mut().roles.insert(account, bitmap);
    }

    pub(crate) fn roles_of(&self, account: Address) -> U256 {
        self.state
            .borrow()
            .roles
            .get(&account)
            .copied()
            .unwrap_or_default()
    }

    fn touch(&self) {
        self.state.borrow_mut().requests += 1;
    }

    fn role_args(args: &[DynSolValue]) -> Option<(Address, U256)> {
        let account = args.first()?.as_address()?;
        let (role, _) = args.get(1)?.as_uint()?;
        Some((account, role))
    }

    /// Apply a state-changing call, returning whether it succeeded
    fn execute(&self, calldata: &[u8]) -> bool {
        let Ok((function, args)) = self.abi.decode_call(calldata) else {
            return false;
        };
        let Some((account, role)) = Self::role_args(&args) else {
            return false;
        };

        let mut state = self.state.borrow_mut();
        let entry = state.roles.entry(account).or_default();
        match function.name.as_str() {
            "grant_role" => *entry |= role,
            "revoke_role" => *entry &= !role,
            _ => return false,
        }
        true
    }
}

impl ChainClient for FakeChain {
    fn chain_id(&self) -> Result<u64, ChainError> {
        self.touch();
        Ok(FAKE_CHAIN_ID)
    }

    fn sender(&self) -> Address {
        self.sender
    }

    fn balance(&self, _account: Address) -> Result<U256, ChainError> {
        self.touch();
        Ok(self.balance)
    }

    fn estimate_gas(&self, _tx: &OutgoingTx) -> Result<u64, ChainError> {
        self.touch();
        Ok(self.gas_estimate)
    }

    fn send(&self, tx: OutgoingTx) -> Result<TxHash, ChainError> {
        self.touch();

        let (nonce, revert) = {
            let mut state = self.state.borrow_mut();
            state.sent.push(tx.clone());
            let nonce = state.nonce;
            state.nonce += 1;
            (nonce, std::mem::take(&mut state.revert_next))
        };

        let hash = TxHash::from(U256::from(nonce + 1).to_be_bytes::<32>());
        let (success, contract_address) = match tx.kind {
            _ if revert => (false, None),
            TxKind::Create => (true, Some(self.sender.create(nonce))),
            TxKind::Call(_) => (self.execute(&tx.input), None),
        };

        let receipt = Receipt {
            transaction_hash: hash,
            contract_address,
            gas_used: tx.gas_limit.unwrap_or(self.gas_estimate).min(self.gas_estimate),
            block_number: Some(nonce + 1),
            success,
        };
        self.state.borrow_mut().receipts.insert(hash, receipt);
        Ok(hash)
    }

    fn wait_for_receipt(&self, hash: TxHash) -> Result<Receipt, ChainError> {
        self.touch();
        self.state
            .borrow()
            .receipts
            .get(&hash)
            .cloned()
            .ok_or(ChainError::ReceiptTimeout {
                hash,
                waited: Duration::ZERO,
            })
    }

    fn call(&self, tx: &OutgoingTx) -> Result<Bytes, ChainError> {
        self.touch();

        let (function, args) = self
            .abi
            .decode_call(&tx.input)
            .map_err(|e| ChainError::Rpc(TransportErrorKind::custom_str(&e.to_string())))?;
        let account = args
            .first()
            .and_then(DynSolValue::as_address)
            .unwrap_or_default();
        let bitmap = self.roles_of(account);

        let output = match function.name.as_str() {
            "has_role" => {
                let role = args
                    .get(1)
                    .and_then(DynSolValue::as_uint)
                    .map(|(v, _)| v)
                    .unwrap_or_default();
                DynSolValue::Bool(bitmap & role != U256::ZERO)
            }
            "roles" => DynSolValue::Uint(bitmap, 256),
            other => {
                return Err(ChainError::Rpc(TransportErrorKind::custom_str(&format!(
                    "unsupported call {}",
                    other
                ))))
            }
        };

        Ok(Bytes::from(output.abi_encode()))
    }
}
