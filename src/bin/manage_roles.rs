//! Role administration for the deployed Digital Evidence contract

use digital_evidence_tools::chain::RpcClient;
use digital_evidence_tools::cli::{self, CliResult, RolesCli};
use digital_evidence_tools::config::{self, ProjectLayout, Settings};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    config::load_dotenv();

    let args: RolesCli = cli::parse_or_exit();

    if let Err(e) = run(args) {
        cli::report_error(e.as_ref());
        std::process::exit(1);
    }
}

fn run(args: RolesCli) -> CliResult<()> {
    let settings = Settings::from_env()?;
    let layout = ProjectLayout::new(&args.root);

    cli::run_manage_roles(&settings, &layout, &args.command, |settings, private_key| {
        RpcClient::connect(&settings.rpc_url, private_key, settings.receipt_timeout)
    })
}
