//! Compiled artifacts handling: lookup, library linking and zkSync bytecode hashes

/// Artifact files and linking
mod artifact;
/// zkSync bytecode hashing
mod bytecode_hash;

pub use artifact::{Artifact, ArtifactStore, DeployableContract, LinkReference};
pub use bytecode_hash::zksync_bytecode_hash;
