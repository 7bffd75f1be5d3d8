//! Storage module for deployment artifacts

pub mod persistence;

pub use persistence::{
    read_abi, read_env_var, upsert_env_line, upsert_env_var, write_abi, StorageError,
};
