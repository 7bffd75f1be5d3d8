//! Digital Evidence contract deployer
//!
//! Compiles the Vyper contract, deploys it, and records the address and ABI
//! for the backend.

use digital_evidence_tools::chain::RpcClient;
use digital_evidence_tools::cli::{self, CliResult, DeployCli};
use digital_evidence_tools::config::{self, ProjectLayout, Settings};
use digital_evidence_tools::contract::VyperCompiler;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    config::load_dotenv();

    let args: DeployCli = cli::parse_or_exit();

    if let Err(e) = run(args) {
        cli::report_error(e.as_ref());
        std::process::exit(1);
    }
}

fn run(args: DeployCli) -> CliResult<()> {
    let settings = Settings::from_env()?;
    let layout = ProjectLayout::new(&args.root);
    let compiler = VyperCompiler::new(&settings.vyper_bin, &settings.evm_version);

    cli::run_deploy(&settings, &layout, &compiler, |settings, private_key| {
        RpcClient::connect(&settings.rpc_url, private_key, settings.receipt_timeout)
    })?;
    Ok(())
}
