//! CLI module for the deployment and role management tools

pub mod args;
pub mod commands;

pub use args::{parse_or_exit, usage_exit_code, usage_message, DeployCli, RoleCommand, RolesCli};
pub use commands::{
    cmd_check_all, cmd_check_role, cmd_deploy, cmd_grant, cmd_revoke, print_banner,
    report_error, run_deploy, run_manage_roles, run_role_command, CliResult,
};
