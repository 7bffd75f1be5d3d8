//! Bitmask roles of the Digital Evidence contract
//!
//! | role   | bit |
//! |--------|-----|
//! | admin  | 1   |
//! | police | 2   |
//! | lab    | 4   |
//! | judge  | 8   |

pub mod manager;
pub mod role;

pub use manager::{
    RoleBitmap, RoleChange, RoleError, RoleManager, HAS_ROLE_FN, ROLES_FN, ROLE_TX_GAS_LIMIT,
};
pub use role::{available_roles, Role, Roles, UnknownRole};
