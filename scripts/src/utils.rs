//! Utilities for the deploy scripts.

use std::str::FromStr;

use alloy::primitives::{Address, B256};

use crate::errors::ScriptError;

/// Length in bytes of an account address
pub const ADDRESS_LENGTH: usize = 20;

/// Length in bytes of a bytecode hash
pub const HASH_LENGTH: usize = 32;

/// Checks that `value` is a `0x` prefixed hex string encoding exactly `len` bytes
pub fn is_prefixed_hex(value: &str, len: usize) -> bool {
    match value.strip_prefix("0x") {
        Some(digits) => digits.len() == len * 2 && digits.bytes().all(|b| b.is_ascii_hexdigit()),
        None => false,
    }
}

/// Parses a hard-coded address field, naming the field on failure
pub fn parse_address(field: &str, value: &str) -> Result<Address, ScriptError> {
    if !is_prefixed_hex(value, ADDRESS_LENGTH) {
        return Err(ScriptError::InvalidConfig(format!(
            "{} is not a 20 byte hex address: {}",
            field, value
        )));
    }

    Address::from_str(value).map_err(|e| ScriptError::InvalidConfig(format!("{}: {}", field, e)))
}

/// Parses a hard-coded 32 byte hash field, naming the field on failure
pub fn parse_hash(field: &str, value: &str) -> Result<B256, ScriptError> {
    if !is_prefixed_hex(value, HASH_LENGTH) {
        return Err(ScriptError::InvalidConfig(format!(
            "{} is not a 32 byte hex hash: {}",
            field, value
        )));
    }

    B256::from_str(value).map_err(|e| ScriptError::InvalidConfig(format!("{}: {}", field, e)))
}
