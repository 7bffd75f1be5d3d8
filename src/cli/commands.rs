//! CLI commands for deployment and role management
//!
//! Implements all command handlers for both binaries.

use crate::chain::{ChainClient, ChainError, Receipt};
use crate::cli::args::RoleCommand;
use crate::config::{ProjectLayout, Settings};
use crate::contract::{ContractAbi, ContractCompiler};
use crate::deploy::{DeployError, Deployer, Deployment};
use crate::roles::{Role, RoleBitmap, RoleChange, RoleManager};
use crate::storage;
use alloy::primitives::utils::format_ether;
use alloy::primitives::{Address, U256};
use std::error::Error;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

const RULE_WIDTH: usize = 60;

/// Print a title between two horizontal rules
pub fn print_banner(title: &str) {
    println!("\n{}", "=".repeat(RULE_WIDTH));
    println!("{}", title);
    println!("{}\n", "=".repeat(RULE_WIDTH));
}

/// Print an error and its chain of causes
pub fn report_error(err: &dyn Error) {
    println!("\n❌ Error: {}", err);
    let mut source = err.source();
    while let Some(cause) = source {
        println!("   caused by: {}", cause);
        source = cause.source();
    }
}

/// Run the deployer: validate configuration, connect, then deploy.
///
/// `connect` receives the settings and the signing key and is only called
/// once the configuration is known to be complete.
pub fn run_deploy<C, K, F>(
    settings: &Settings,
    layout: &ProjectLayout,
    compiler: &K,
    connect: F,
) -> CliResult<Deployment>
where
    C: ChainClient,
    K: ContractCompiler,
    F: FnOnce(&Settings, &str) -> Result<C, ChainError>,
{
    let private_key = settings.require_private_key()?;

    print_banner("🚀 Deploying Digital Evidence contract");
    println!("🔗 Connecting to {}...", settings.rpc_url);
    let client = connect(settings, private_key)?;

    cmd_deploy(&client, compiler, layout)
}

/// Run a role command: validate configuration, load the ABI, connect, then
/// dispatch.
pub fn run_manage_roles<C, F>(
    settings: &Settings,
    layout: &ProjectLayout,
    command: &RoleCommand,
    connect: F,
) -> CliResult<()>
where
    C: ChainClient,
    F: FnOnce(&Settings, &str) -> Result<C, ChainError>,
{
    let contract = settings.require_contract_address()?;
    let private_key = settings.require_private_key()?;
    let abi = storage::read_abi(&layout.abi_file)?;

    let client = connect(settings, private_key)?;
    log::debug!("Managing roles on {}", contract);

    run_role_command(&client, contract, &abi, command)
}

/// Compile and deploy the contract, then persist its address and ABI
pub fn cmd_deploy<C, K>(client: &C, compiler: &K, layout: &ProjectLayout) -> CliResult<Deployment>
where
    C: ChainClient,
    K: ContractCompiler,
{
    let chain_id = client.chain_id()?;
    println!("✅ Connected to network (Chain ID: {})", chain_id);

    let deployer_address = client.sender();
    println!("📍 Deployer address: {}", deployer_address);

    let balance = client.balance(deployer_address)?;
    println!("💰 Balance: {} ETH", format_ether(balance));
    if balance == U256::ZERO {
        println!("⚠️  Warning: Account balance is 0. Deployment may fail.");
        log::warn!("Deployer {} has no funds", deployer_address);
    }

    println!("\n📦 Building deployment transaction...");
    let deployment = match Deployer::new(client, compiler, layout).run() {
        Ok(deployment) => deployment,
        Err(DeployError::Reverted(receipt)) => {
            println!("\n❌ Deployment failed!");
            print_receipt(&receipt);
            return Err(DeployError::Reverted(receipt).into());
        }
        Err(e) => return Err(e.into()),
    };

    print_banner("✅ CONTRACT DEPLOYED SUCCESSFULLY!");
    println!("📍 Contract Address: {}", deployment.address);
    println!("🧾 Transaction Hash: {}", deployment.receipt.transaction_hash);
    println!("⛽ Gas Used: {}", deployment.receipt.gas_used);
    if let Some(block) = deployment.receipt.block_number {
        println!("📦 Block Number: {}", block);
    }

    println!("\n💾 Contract address saved to {}", layout.env_file.display());
    println!("💾 ABI saved to {}", layout.abi_file.display());

    println!("\n🎉 Deployment complete!");
    println!("\nNext steps:");
    println!("  1. Grant roles to addresses: manage-roles grant 0xADDRESS police");
    println!("  2. Start IPFS daemon: ipfs daemon");
    println!("  3. Start backend: cd backend && npm start");
    println!("  4. Start frontend: cd frontend && npm start");

    Ok(deployment)
}

fn print_receipt(receipt: &Receipt) {
    match serde_json::to_string_pretty(receipt) {
        Ok(json) => println!("Transaction receipt: {}", json),
        Err(_) => println!("Transaction receipt: {}", receipt),
    }
}

/// Dispatch a parsed role command
pub fn run_role_command<C: ChainClient>(
    client: &C,
    contract: Address,
    abi: &ContractAbi,
    command: &RoleCommand,
) -> CliResult<()> {
    let manager = RoleManager::new(client, contract, abi);

    match *command {
        RoleCommand::Grant { address, role } => {
            cmd_grant(&manager, address, role)?;
        }
        RoleCommand::Revoke { address, role } => {
            cmd_revoke(&manager, address, role)?;
        }
        RoleCommand::Check {
            address,
            role: Some(role),
        } => {
            cmd_check_role(&manager, address, role)?;
        }
        RoleCommand::Check {
            address,
            role: None,
        } => {
            cmd_check_all(&manager, address)?;
        }
    }

    Ok(())
}

/// Grant a role
pub fn cmd_grant<C: ChainClient>(manager: &RoleManager<C>, address: Address, role: Role) -> CliResult<Receipt> {
    println!("🔐 Granting {} role to {}", role.label(), address);
    let receipt = submit_change(manager, RoleChange::Grant, address, role)?;
    println!("✅ Role granted successfully!");
    Ok(receipt)
}

/// Revoke a role
pub fn cmd_revoke<C: ChainClient>(manager: &RoleManager<C>, address: Address, role: Role) -> CliResult<Receipt> {
    println!("🔓 Revoking {} role from {}", role.label(), address);
    let receipt = submit_change(manager, RoleChange::Revoke, address, role)?;
    println!("✅ Role revoked successfully!");
    Ok(receipt)
}

fn submit_change<C: ChainClient>(
    manager: &RoleManager<C>,
    change: RoleChange,
    address: Address,
    role: Role,
) -> CliResult<Receipt> {
    let hash = manager.submit(change, address, role)?;
    println!("⏳ Transaction sent: {}", hash);

    let receipt = manager.confirm(hash)?;
    if !receipt.success {
        println!("❌ Transaction failed");
        return Err(format!("{} reverted: {}", change.entry_point(), receipt).into());
    }
    Ok(receipt)
}

/// Check a single role
pub fn cmd_check_role<C: ChainClient>(manager: &RoleManager<C>, address: Address, role: Role) -> CliResult<bool> {
    let held = manager.has_role(address, role)?;
    if held {
        println!("✅ {} HAS {} role", address, role.label());
    } else {
        println!("❌ {} does NOT have {} role", address, role.label());
    }
    Ok(held)
}

/// List every role held by an address
pub fn cmd_check_all<C: ChainClient>(manager: &RoleManager<C>, address: Address) -> CliResult<RoleBitmap> {
    let bitmap = manager.roles_of(address)?;

    println!("\n📋 Roles for {}:", address);
    println!("   Raw bitmap: {}", bitmap.raw);
    println!("\n   Active roles:");

    let members = bitmap.members();
    if members.is_empty() {
        println!("   ❌ No roles assigned");
    }
    for role in members {
        println!("   ✅ {}", role.label());
    }

    Ok(bitmap)
}
