//! Scripts for deploying the email recovery module and its supporting contracts on zkSync Era.

#![deny(clippy::missing_docs_in_private_items)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod constants;
pub mod errors;
pub mod utils;

/// Our artifact utils
pub mod build;

/// Our deploy utils
pub mod deploy;

/// Our output utils
pub mod output_writer;

pub mod tx;
