use alloy::primitives::B256;
use sha2::{Digest, Sha256};

use crate::errors::ScriptError;

/// Size of a zkSync bytecode word
const WORD_SIZE: usize = 32;

/// Version byte of the current bytecode hash format
const BYTECODE_HASH_VERSION: u8 = 1;

/// Compute the hash zkSync uses to identify a bytecode.
///
/// It is the sha256 of the bytecode where the first 4 bytes are replaced by
/// the format version, a zero byte and the big endian length of the bytecode in words.
/// The bytecode must be made of an odd number of 32 bytes words, less than 2^16 of them.
pub fn zksync_bytecode_hash(bytecode: &[u8]) -> Result<B256, ScriptError> {
    if bytecode.len() % WORD_SIZE != 0 {
        return Err(ScriptError::InvalidBytecode(format!(
            "length {} is not a multiple of {}",
            bytecode.len(),
            WORD_SIZE
        )));
    }

    let words = bytecode.len() / WORD_SIZE;
    if words % 2 == 0 {
        return Err(ScriptError::InvalidBytecode(format!(
            "word count {} must be odd",
            words
        )));
    }
    let words = u16::try_from(words).map_err(|_| {
        ScriptError::InvalidBytecode(format!("word count {} exceeds {}", words, u16::MAX))
    })?;

    let mut hash: [u8; 32] = Sha256::digest(bytecode).into();
    hash[0] = BYTECODE_HASH_VERSION;
    hash[1] = 0;
    hash[2..4].copy_from_slice(&words.to_be_bytes());

    Ok(B256::from(hash))
}
