//! File persistence for deployment artifacts
//!
//! Writes the contract ABI consumed by the backend and keeps the
//! `CONTRACT_ADDRESS` entry of the backend env file up to date.

use crate::contract::ContractAbi;
use std::fs;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Create the parent directory of `path` if it does not exist yet
fn ensure_parent(path: &Path) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Sibling temporary file used for atomic replacement
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Replace `path` with the bytes produced by `write`
fn write_atomic<F>(path: &Path, write: F) -> Result<(), StorageError>
where
    F: FnOnce(&mut BufWriter<fs::File>) -> Result<(), StorageError>,
{
    ensure_parent(path)?;

    let temp = temp_path(path);
    {
        let file = fs::File::create(&temp)?;
        let mut writer = BufWriter::new(file);
        write(&mut writer)?;
        writer.flush()?;
    }

    fs::rename(&temp, path)?;
    Ok(())
}

/// Save the compiler's ABI document as pretty-printed JSON
pub fn write_abi(path: &Path, abi: &ContractAbi) -> Result<(), StorageError> {
    write_atomic(path, |writer| {
        serde_json::to_writer_pretty(&mut *writer, abi.raw())?;
        writer.write_all(b"\n")?;
        Ok(())
    })
}

/// Load a contract ABI written by [`write_abi`] (or by the compiler)
pub fn read_abi(path: &Path) -> Result<ContractAbi, StorageError> {
    if !path.exists() {
        return Err(StorageError::InvalidData(format!(
            "ABI file not found: {}",
            path.display()
        )));
    }

    let file = fs::File::open(path)?;
    let reader = BufReader::new(file);
    let raw = serde_json::from_reader(reader)?;
    ContractAbi::from_value(raw).map_err(|e| StorageError::InvalidData(e.to_string()))
}

/// Set `key=value` in a dotenv-style file.
///
/// The first line starting with `key=` is replaced; otherwise the entry is
/// appended. All other lines are kept as they are.
pub fn upsert_env_var(path: &Path, key: &str, value: &str) -> Result<(), StorageError> {
    if key.is_empty() || key.contains('=') || key.contains('\n') {
        return Err(StorageError::InvalidData(format!("Invalid env key: {:?}", key)));
    }

    let existing = if path.exists() {
        fs::read_to_string(path)?
    } else {
        String::new()
    };

    let updated = upsert_env_line(&existing, key, value);
    write_atomic(path, |writer| {
        writer.write_all(updated.as_bytes())?;
        Ok(())
    })
}

/// Pure form of [`upsert_env_var`] operating on file contents
pub fn upsert_env_line(contents: &str, key: &str, value: &str) -> String {
    let prefix = format!("{}=", key);
    let entry = format!("{}{}", prefix, value);

    let mut replaced = false;

    let mut out = String::with_capacity(contents.len() + entry.len() + 1);
    for line in contents.split_inclusive('\n') {
        if !replaced && line.starts_with(&prefix) {
            out.push_str(&entry);
            out.push('\n');
            replaced = true;
        } else {
            out.push_str(line);
        }
    }

    if !replaced {
        if !out.is_empty() && !out.ends_with('\n') {
            out.push('\n');
        }
        out.push_str(&entry);
        out.push('\n');
    }

    out
}

/// Read a single value back from a dotenv-style file
pub fn read_env_var(path: &Path, key: &str) -> Result<Option<String>, StorageError> {
    if !path.exists() {
        return Ok(None);
    }
    let prefix = format!("{}=", key);
    let contents = fs::read_to_string(path)?;
    Ok(contents
        .lines()
        .find_map(|line| line.strip_prefix(&prefix))
        .map(|v| v.trim().to_string()))
}
