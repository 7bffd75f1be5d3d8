//! Role management against the deployed contract
//!
//! Encodes the contract's role entry points from its ABI and drives them
//! through a [`ChainClient`].

use crate::chain::{ChainClient, ChainError, OutgoingTx, Receipt};
use crate::contract::{AbiError, ContractAbi};
use crate::roles::role::{Role, Roles};
use alloy::dyn_abi::DynSolValue;
use alloy::primitives::{Address, TxHash, U256};
use thiserror::Error;

/// Gas limit for grant/revoke transactions
pub const ROLE_TX_GAS_LIMIT: u64 = 200_000;

/// Contract entry point reading a single role
pub const HAS_ROLE_FN: &str = "has_role";

/// Contract entry point reading the full bitmap
pub const ROLES_FN: &str = "roles";

/// Role manager errors
#[derive(Error, Debug)]
pub enum RoleError {
    #[error("Chain error: {0}")]
    ChainError(#[from] ChainError),
    #[error("ABI error: {0}")]
    AbiError(#[from] AbiError),
    #[error("Unexpected return value from {0}")]
    UnexpectedOutput(&'static str),
}

/// A state-changing role operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleChange {
    Grant,
    Revoke,
}

impl RoleChange {
    /// Contract function implementing this change
    pub fn entry_point(self) -> &'static str {
        match self {
            RoleChange::Grant => "grant_role",
            RoleChange::Revoke => "revoke_role",
        }
    }
}

/// Roles held by an address, as read from the contract
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleBitmap {
    /// Raw on-chain value
    pub raw: U256,
    /// Known roles set in `raw`
    pub roles: Roles,
}

impl RoleBitmap {
    pub fn new(raw: U256) -> Self {
        Self {
            raw,
            roles: Roles::from_bitmap(raw),
        }
    }

    pub fn members(&self) -> Vec<Role> {
        self.roles.members()
    }
}

/// Grants, revokes, and checks roles on one contract
pub struct RoleManager<'a, C: ChainClient> {
    client: &'a C,
    contract: Address,
    abi: &'a ContractAbi,
}

impl<'a, C: ChainClient> RoleManager<'a, C> {
    pub fn new(client: &'a C, contract: Address, abi: &'a ContractAbi) -> Self {
        Self {
            client,
            contract,
            abi,
        }
    }

    /// Address of the managed contract
    pub fn contract(&self) -> Address {
        self.contract
    }

    /// Sign and submit a grant or revoke, returning the transaction hash
    pub fn submit(&self, change: RoleChange, account: Address, role: Role) -> Result<TxHash, RoleError> {
        let calldata = self
            .abi
            .encode_call(change.entry_point(), &role_args(account, role))?;

        let tx = OutgoingTx::call(self.contract, calldata).with_gas_limit(ROLE_TX_GAS_LIMIT);
        let hash = self.client.send(tx)?;

        log::info!(
            "{} {} for {} submitted in {}",
            change.entry_point(),
            role,
            account,
            hash
        );
        Ok(hash)
    }

    /// Block until the receipt of a submitted change is available
    pub fn confirm(&self, hash: TxHash) -> Result<Receipt, RoleError> {
        Ok(self.client.wait_for_receipt(hash)?)
    }

    /// Submit a change and wait for its receipt
    pub fn apply(&self, change: RoleChange, account: Address, role: Role) -> Result<Receipt, RoleError> {
        let hash = self.submit(change, account, role)?;
        self.confirm(hash)
    }

    /// Whether `account` currently holds `role`
    pub fn has_role(&self, account: Address, role: Role) -> Result<bool, RoleError> {
        let output = self.read(HAS_ROLE_FN, &role_args(account, role))?;
        output
            .first()
            .and_then(DynSolValue::as_bool)
            .ok_or(RoleError::UnexpectedOutput(HAS_ROLE_FN))
    }

    /// The full role bitmap of `account`
    pub fn roles_of(&self, account: Address) -> Result<RoleBitmap, RoleError> {
        let output = self.read(ROLES_FN, &[DynSolValue::Address(account)])?;
        output
            .first()
            .and_then(DynSolValue::as_uint)
            .map(|(raw, _)| RoleBitmap::new(raw))
            .ok_or(RoleError::UnexpectedOutput(ROLES_FN))
    }

    fn read(&self, function: &str, args: &[DynSolValue]) -> Result<Vec<DynSolValue>, RoleError> {
        let calldata = self.abi.encode_call(function, args)?;
        let data = self.client.call(&OutgoingTx::call(self.contract, calldata))?;
        Ok(self.abi.decode_output(function, &data)?)
    }
}

fn role_args(account: Address, role: Role) -> [DynSolValue; 2] {
    [
        DynSolValue::Address(account),
        DynSolValue::Uint(U256::from(role.value()), 256),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::fake::FakeChain;
    use crate::contract::abi::tests::EVIDENCE_ABI;

    fn setup() -> (FakeChain, ContractAbi) {
        let abi = ContractAbi::from_json(EVIDENCE_ABI).unwrap();
        (FakeChain::new(abi.clone()), abi)
    }

    #[test]
    fn test_grant_then_revoke() {
        let (chain, abi) = setup();
        let manager = RoleManager::new(&chain, Address::repeat_byte(0xcc), &abi);
        let officer = Address::repeat_byte(0x01);

        assert!(!manager.has_role(officer, Role::Police).unwrap());

        let receipt = manager.apply(RoleChange::Grant, officer, Role::Police).unwrap();
        assert!(receipt.success);
        assert!(manager.has_role(officer, Role::Police).unwrap());

        let receipt = manager.apply(RoleChange::Revoke, officer, Role::Police).unwrap();
        assert!(receipt.success);
        assert!(!manager.has_role(officer, Role::Police).unwrap());
    }

    #[test]
    fn test_grant_uses_fixed_gas_limit_and_role_value() {
        let (chain, abi) = setup();
        let contract = Address::repeat_byte(0xcc);
        let manager = RoleManager::new(&chain, contract, &abi);
        let analyst = Address::repeat_byte(0x02);

        manager.apply(RoleChange::Grant, analyst, Role::Lab).unwrap();

        let sent = chain.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].gas_limit, Some(ROLE_TX_GAS_LIMIT));
        assert_eq!(sent[0].kind.to(), Some(&contract));

        let (function, args) = abi.decode_call(&sent[0].input).unwrap();
        assert_eq!(function.name, "grant_role");
        assert_eq!(args[1].as_uint().map(|(v, _)| v), Some(U256::from(4)));
        assert_eq!(chain.roles_of(analyst), U256::from(4));
    }

    #[test]
    fn test_roles_accumulate() {
        let (chain, abi) = setup();
        let manager = RoleManager::new(&chain, Address::repeat_byte(0xcc), &abi);
        let judge = Address::repeat_byte(0x03);

        manager.apply(RoleChange::Grant, judge, Role::Admin).unwrap();
        manager.apply(RoleChange::Grant, judge, Role::Judge).unwrap();

        let bitmap = manager.roles_of(judge).unwrap();
        assert_eq!(bitmap.raw, U256::from(9));
        assert_eq!(bitmap.members(), vec![Role::Admin, Role::Judge]);
    }

    #[test]
    fn test_roles_of_reports_only_set_bits() {
        let (chain, abi) = setup();
        let manager = RoleManager::new(&chain, Address::repeat_byte(0xcc), &abi);
        let account = Address::repeat_byte(0x04);

        chain.set_roles(account, U256::from(0b0110));
        let bitmap = manager.roles_of(account).unwrap();
        assert_eq!(bitmap.members(), vec![Role::Police, Role::Lab]);

        let nobody = manager.roles_of(Address::repeat_byte(0x05)).unwrap();
        assert_eq!(nobody.raw, U256::ZERO);
        assert!(nobody.members().is_empty());
    }

    #[test]
    fn test_failed_transaction_reported_in_receipt() {
        let (chain, abi) = setup();
        let manager = RoleManager::new(&chain, Address::repeat_byte(0xcc), &abi);
        let account = Address::repeat_byte(0x06);

        chain.revert_next();
        let receipt = manager.apply(RoleChange::Grant, account, Role::Admin).unwrap();
        assert!(!receipt.success);
        assert!(!manager.has_role(account, Role::Admin).unwrap());
    }

    #[test]
    fn test_missing_entry_point_fails_before_network() {
        let abi = ContractAbi::from_json(
            r#"[{"type":"function","name":"roles","stateMutability":"view",
                 "inputs":[{"name":"arg0","type":"address"}],
                 "outputs":[{"name":"","type":"uint256"}]}]"#,
        )
        .unwrap();
        let chain = FakeChain::new(abi.clone());
        let manager = RoleManager::new(&chain, Address::repeat_byte(0xcc), &abi);

        let result = manager.submit(RoleChange::Grant, Address::repeat_byte(0x07), Role::Judge);
        assert!(matches!(
            result,
            Err(RoleError::AbiError(AbiError::UnknownFunction(_)))
        ));
        assert_eq!(chain.requests(), 0);
    }
}
