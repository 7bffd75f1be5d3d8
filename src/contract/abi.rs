//! Contract interface description
//!
//! Thin wrapper around the compiler's JSON ABI that encodes calls and decodes
//! return data by function name. The compiler's document is kept as printed so
//! it can be handed on to the backend unchanged.

use alloy::dyn_abi::{DynSolValue, FunctionExt, JsonAbiExt};
use alloy::json_abi::{Function, JsonAbi};
use alloy::primitives::Bytes;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// ABI errors
#[derive(Error, Debug)]
pub enum AbiError {
    #[error("Invalid ABI JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("Function not found in ABI: {0}")]
    UnknownFunction(String),
    #[error("No function matches selector 0x{0}")]
    UnknownSelector(String),
    #[error("Calldata too short: {0} bytes")]
    ShortCalldata(usize),
    #[error("ABI encoding error: {0}")]
    Codec(#[from] alloy::dyn_abi::Error),
}

/// A parsed contract ABI
#[derive(Debug, Clone, PartialEq)]
pub struct ContractAbi {
    abi: JsonAbi,
    raw: Value,
}

impl ContractAbi {
    /// Parse an ABI from an already decoded JSON document
    pub fn from_value(raw: Value) -> Result<Self, AbiError> {
        let abi = JsonAbi::deserialize(&raw)?;
        Ok(Self { abi, raw })
    }

    /// Parse an ABI from its JSON representation
    pub fn from_json(json: &str) -> Result<Self, AbiError> {
        Self::from_value(serde_json::from_str(json)?)
    }

    /// The typed ABI used for encoding
    pub fn json_abi(&self) -> &JsonAbi {
        &self.abi
    }

    /// The JSON document exactly as it was parsed
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// Number of callable functions
    pub fn function_count(&self) -> usize {
        self.abi.functions().count()
    }

    /// Look up a function by name (first overload wins)
    pub fn function(&self, name: &str) -> Result<&Function, AbiError> {
        self.abi
            .function(name)
            .and_then(|overloads| overloads.first())
            .ok_or_else(|| AbiError::UnknownFunction(name.to_string()))
    }

    /// Encode a call to `name` (selector followed by arguments)
    pub fn encode_call(&self, name: &str, args: &[DynSolValue]) -> Result<Bytes, AbiError> {
        let function = self.function(name)?;
        let data = function.abi_encode_input(args)?;
        Ok(Bytes::from(data))
    }

    /// Decode the return data of a call to `name`
    pub fn decode_output(&self, name: &str, data: &[u8]) -> Result<Vec<DynSolValue>, AbiError> {
        let function = self.function(name)?;
        Ok(function.abi_decode_output(data)?)
    }

    /// Resolve calldata back into the called function and its arguments
    pub fn decode_call(&self, calldata: &[u8]) -> Result<(&Function, Vec<DynSolValue>), AbiError> {
        if calldata.len() < 4 {
            return Err(AbiError::ShortCalldata(calldata.len()));
        }
        let (selector, params) = calldata.split_at(4);

        let function = self
            .abi
            .functions()
            .find(|f| f.selector().as_slice() == selector)
            .ok_or_else(|| AbiError::UnknownSelector(hex::encode(selector)))?;

        let args = function.abi_decode_input(params)?;
        Ok((function, args))
    }
}
