//! Command-line argument definitions for both tools

use crate::roles::Role;
use alloy::primitives::Address;
use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// `deploy`: compile and deploy the contract
#[derive(Parser, Debug)]
#[command(name = "deploy")]
#[command(author = "Darshan")]
#[command(version)]
#[command(about = "Compile and deploy the Digital Evidence smart contract", long_about = None)]
pub struct DeployCli {
    /// Project root containing contracts/ and backend/
    #[arg(short, long, default_value = ".")]
    pub root: PathBuf,
}

/// `manage-roles`: administer roles on the deployed contract
#[derive(Parser, Debug)]
#[command(name = "manage-roles")]
#[command(author = "Darshan")]
#[command(version)]
#[command(about = "Grant, revoke, and check roles on the Digital Evidence contract", long_about = None)]
#[command(arg_required_else_help = true)]
#[command(after_help = "Available roles: admin, police, lab, judge")]
pub struct RolesCli {
    /// Project root containing backend/src/config/contractABI.json
    #[arg(short, long, global = true, default_value = ".")]
    pub root: PathBuf,

    #[command(subcommand)]
    pub command: RoleCommand,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum RoleCommand {
    /// Grant a role to an address
    Grant {
        /// Account receiving the role
        address: Address,
        /// Role name
        #[arg(ignore_case = true)]
        role: Role,
    },

    /// Revoke a role from an address
    Revoke {
        /// Account losing the role
        address: Address,
        /// Role name
        #[arg(ignore_case = true)]
        role: Role,
    },

    /// Check one role, or list every role when none is given
    Check {
        /// Account to inspect
        address: Address,
        /// Role name
        #[arg(ignore_case = true)]
        role: Option<Role>,
    },
}

/// Process exit code for an argument parsing failure
pub fn usage_exit_code(err: &clap::Error) -> i32 {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => 1,
    }
}

/// Plain-text rendering of a parse failure, help, or version output
pub fn usage_message(err: &clap::Error) -> String {
    err.render().to_string()
}

/// Parse the process arguments, printing usage to stdout and exiting on failure
pub fn parse_or_exit<P: Parser>() -> P {
    match P::try_parse() {
        Ok(parsed) => parsed,
        Err(err) => {
            print!("{}", usage_message(&err));
            std::process::exit(usage_exit_code(&err));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    const ACCOUNT: &str = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";

    fn parse(args: &[&str]) -> Result<RolesCli, clap::Error> {
        RolesCli::try_parse_from(std::iter::once("manage-roles").chain(args.iter().copied()))
    }

    #[test]
    fn test_cli_definitions_are_valid() {
        RolesCli::command().debug_assert();
        DeployCli::command().debug_assert();
    }

    #[test]
    fn test_parse_grant() {
        let cli = parse(&["grant", ACCOUNT, "police"]).unwrap();
        assert_eq!(
            cli.command,
            RoleCommand::Grant {
                address: ACCOUNT.parse().unwrap(),
                role: Role::Police,
            }
        );
        assert_eq!(cli.root, PathBuf::from("."));
    }

    #[test]
    fn test_role_names_are_case_insensitive() {
        let cli = parse(&["revoke", ACCOUNT, "JUDGE"]).unwrap();
        assert!(matches!(cli.command, RoleCommand::Revoke { role: Role::Judge, .. }));
    }

    #[test]
    fn test_check_with_and_without_role() {
        let single = parse(&["check", ACCOUNT, "lab"]).unwrap();
        assert!(matches!(single.command, RoleCommand::Check { role: Some(Role::Lab), .. }));

        let all = parse(&["--root", "/srv/app", "check", ACCOUNT]).unwrap();
        assert!(matches!(all.command, RoleCommand::Check { role: None, .. }));
        assert_eq!(all.root, PathBuf::from("/srv/app"));
    }

    #[test]
    fn test_unknown_role_is_a_usage_error() {
        let err = parse(&["grant", ACCOUNT, "detective"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidValue);
        assert_eq!(usage_exit_code(&err), 1);
    }

    #[test]
    fn test_wrong_argument_counts_are_usage_errors() {
        for args in [
            &[][..],
            &["grant", ACCOUNT][..],
            &["revoke"][..],
            &["check"][..],
            &["grant", ACCOUNT, "police", "extra"][..],
            &["check", ACCOUNT, "police", "extra"][..],
            &["promote", ACCOUNT, "police"][..],
        ] {
            let err = parse(args).unwrap_err();
            assert_eq!(usage_exit_code(&err), 1, "args: {:?}", args);
        }
    }

    #[test]
    fn test_malformed_address_is_a_usage_error() {
        let err = parse(&["check", "0x1234", "admin"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }

    #[test]
    fn test_usage_message_names_the_problem() {
        let err = parse(&["grant", ACCOUNT, "detective"]).unwrap_err();
        let message = usage_message(&err);
        assert!(message.contains("detective"));
        assert!(!message.contains('\u{1b}'));

        let help = usage_message(&parse(&["--help"]).unwrap_err());
        assert!(help.contains("grant"));
        assert!(help.contains("Available roles: admin, police, lab, judge"));
    }

    #[test]
    fn test_help_exits_zero() {
        let err = parse(&["--help"]).unwrap_err();
        assert_eq!(usage_exit_code(&err), 0);
    }

    #[test]
    fn test_deploy_root() {
        let cli = DeployCli::try_parse_from(["deploy", "--root", "/srv/app"]).unwrap();
        assert_eq!(cli.root, PathBuf::from("/srv/app"));
        assert!(DeployCli::try_parse_from(["deploy", "unexpected"]).is_err());
    }
}
