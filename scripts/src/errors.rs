//! Definitions of errors that can occur during the execution of the deployment scripts

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

/// Errors that can occur during the execution of the deployment scripts
#[derive(Debug)]
pub enum ScriptError {
    /// Error when building output file
    JsonOutputError(String),
    /// Error when creating the client
    ClientInitialization(String),
    /// Error deploying a contract
    ContractDeployment(String),
    /// Error calling a contract method or reading chain state
    ContractInteraction(String),
    /// A compiled artifact could not be located
    ArtifactNotFound(String),
    /// A compiled artifact could not be parsed
    ArtifactParsing(String),
    /// A library placeholder could not be linked
    LibraryLinking(String),
    /// Bytecode is not a valid zkSync bytecode
    InvalidBytecode(String),
    /// A configuration value is malformed
    InvalidConfig(String),
    /// The RPC endpoint serves a different chain than the selected network
    ChainIdMismatch {
        /// Chain id of the selected network
        expected: u64,
        /// Chain id reported by the endpoint
        actual: u64,
    },
    /// Expected contracts have no code on chain
    MissingContracts(Vec<String>),
}

impl Display for ScriptError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::JsonOutputError(s) => write!(f, "error writing json output: {}", s),
            ScriptError::ClientInitialization(s) => write!(f, "error during client init: {}", s),
            ScriptError::ContractDeployment(s) => write!(f, "error deploying contract: {}", s),
            ScriptError::ContractInteraction(s) => {
                write!(f, "error interacting with contract: {}", s)
            }
            ScriptError::ArtifactNotFound(s) => write!(f, "artifact not found: {}", s),
            ScriptError::ArtifactParsing(s) => write!(f, "error parsing artifact: {}", s),
            ScriptError::LibraryLinking(s) => write!(f, "error linking library: {}", s),
            ScriptError::InvalidBytecode(s) => write!(f, "invalid bytecode: {}", s),
            ScriptError::InvalidConfig(s) => write!(f, "invalid configuration: {}", s),
            ScriptError::ChainIdMismatch { expected, actual } => write!(
                f,
                "chain id mismatch: network expects {} but endpoint reports {}",
                expected, actual
            ),
            ScriptError::MissingContracts(names) => {
                write!(f, "no code deployed for: {}", names.join(", "))
            }
        }
    }
}

impl Error for ScriptError {}
