//! Chain interactions: client setup, constructor encoding and on-chain reads

pub mod abi;
pub mod client;
pub mod reader;
