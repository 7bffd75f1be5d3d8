//! Role definitions
//!
//! Each role occupies one bit of the per-address bitmask stored by the
//! contract. Multiple roles combine with bitwise OR.

use alloy::primitives::U256;
use bitflags::bitflags;
use clap::ValueEnum;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

bitflags! {
    /// A set of roles, laid out exactly like the on-chain bitmask
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Roles: u64 {
        const ADMIN = 1;
        const POLICE = 1 << 1;
        const LAB = 1 << 2;
        const JUDGE = 1 << 3;
    }
}

/// Role name parsing error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid role: {name} (available roles: {})", available_roles())]
pub struct UnknownRole {
    pub name: String,
}

/// A single named role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Role {
    Admin,
    Police,
    Lab,
    Judge,
}

impl Role {
    /// All roles in bit order
    pub const ALL: [Role; 4] = [Role::Admin, Role::Police, Role::Lab, Role::Judge];

    /// Lowercase name used on the command line
    pub fn name(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Police => "police",
            Role::Lab => "lab",
            Role::Judge => "judge",
        }
    }

    /// The bit this role occupies
    pub fn flag(self) -> Roles {
        match self {
            Role::Admin => Roles::ADMIN,
            Role::Police => Roles::POLICE,
            Role::Lab => Roles::LAB,
            Role::Judge => Roles::JUDGE,
        }
    }

    /// Numeric value passed to the contract
    pub fn value(self) -> u64 {
        self.flag().bits()
    }

    /// Uppercase label for display
    pub fn label(self) -> String {
        self.name().to_uppercase()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Role::ALL
            .into_iter()
            .find(|role| role.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownRole {
                name: s.to_string(),
            })
    }
}

impl From<Role> for Roles {
    fn from(role: Role) -> Self {
        role.flag()
    }
}

impl Roles {
    /// Interpret an on-chain bitmap; bits above the known roles are ignored
    pub fn from_bitmap(bitmap: U256) -> Self {
        Self::from_bits_truncate(bitmap.as_limbs()[0])
    }

    /// The named roles contained in this set, in bit order
    pub fn members(self) -> Vec<Role> {
        Role::ALL
            .into_iter()
            .filter(|role| self.contains(role.flag()))
            .collect()
    }
}

/// Comma-separated list of role names
pub fn available_roles() -> String {
    Role::ALL
        .iter()
        .map(|role| role.name())
        .collect::<Vec<_>>()
        .join(", ")
}
