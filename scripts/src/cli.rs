//! Definitions of CLI arguments and commands for deploy scripts

use std::path::PathBuf;

use alloy::primitives::Address;
use clap::{Args, Parser, Subcommand};
use tracing::level_filters::LevelFilter;

use crate::{
    commands::{bytecode_hash, check_profile, deploy_contracts, show_config, ScriptContext},
    config::{Network, Profile},
    constants::DEFAULT_ARTIFACTS_DIR,
    errors::ScriptError,
};

/// Scripts for deploying the email recovery module on zkSync Era
#[derive(Parser)]
#[command(name = "email-recovery-scripts", version)]
pub struct Cli {
    /// Private key of the deployer
    #[arg(short, long, env = "PRIVATE_KEY", hide_env_values = true)]
    pub priv_key: Option<String>,

    /// Network RPC URL, defaults to the endpoint of the selected network
    #[arg(short, long, env = "RPC_URL")]
    pub rpc_url: Option<String>,

    /// The network to run against
    #[arg(short, long, env = "NETWORK", value_enum, default_value_t = Network::default())]
    pub network: Network,

    /// The verbosity level
    #[arg(short, long, env = "VERBOSITY", default_value_t = LevelFilter::INFO)]
    pub verbosity: LevelFilter,

    /// The command to run
    #[command(subcommand)]
    pub command: Command,
}

/// The possible CLI commands
#[derive(Subcommand)]
pub enum Command {
    /// Deploy the command handler, the email auth proxy and the recovery module
    Deploy(DeployArgs),
    /// Check the pre-deployed contracts of a profile exist on chain
    Check(CheckArgs),
    /// Print the network and compiler settings
    ShowConfig(ShowConfigArgs),
    /// Print the zkSync bytecode hash of an artifact
    BytecodeHash(BytecodeHashArgs),
}

impl Command {
    /// Run the command
    pub async fn run(self, ctx: &ScriptContext) -> Result<(), ScriptError> {
        match self {
            Command::Deploy(args) => {
                deploy_contracts(args, ctx).await?;
                Ok(())
            }
            Command::Check(args) => check_profile(args, ctx).await,
            Command::ShowConfig(args) => show_config(args, ctx),
            Command::BytecodeHash(args) => bytecode_hash(args, ctx),
        }
    }
}

/// Deploy contracts
#[derive(Args)]
pub struct DeployArgs {
    /// Set of pre-deployed contracts to use, defaults to the one matching the network
    #[arg(long, value_enum)]
    pub profile: Option<Profile>,

    /// Directory holding the compiled artifacts
    #[arg(long, default_value = DEFAULT_ARTIFACTS_DIR)]
    pub artifacts: PathBuf,

    /// Address allowed to disable the module, replaces the profile value
    #[arg(long)]
    pub kill_switch_authorizer: Option<Address>,

    /// Minimum recovery delay in seconds, replaces the profile value
    #[arg(long)]
    pub minimum_delay: Option<u64>,

    /// Json file to record the deployed addresses in
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Load and link everything, print predicted addresses, send nothing
    #[arg(long)]
    pub dry_run: bool,

    /// Nonce of the first deployment, for dry runs
    #[arg(long, default_value_t = 0, requires = "dry_run")]
    pub nonce: u64,
}

/// Check a profile
#[derive(Args)]
pub struct CheckArgs {
    /// Profile to check, defaults to the one matching the network
    #[arg(long, value_enum)]
    pub profile: Option<Profile>,
}

/// Show the configuration
#[derive(Args)]
pub struct ShowConfigArgs {
    /// Profile whose libraries are shown, defaults to the one matching the network
    #[arg(long, value_enum)]
    pub profile: Option<Profile>,
}

/// Hash an artifact
#[derive(Args)]
pub struct BytecodeHashArgs {
    /// Artifact name, bare or fully qualified (`path/File.sol:Name`)
    pub artifact: String,

    /// Directory holding the compiled artifacts
    #[arg(long, default_value = DEFAULT_ARTIFACTS_DIR)]
    pub artifacts: PathBuf,

    /// Profile whose libraries are linked, defaults to the one matching the network
    #[arg(long, value_enum)]
    pub profile: Option<Profile>,
}
