//! Bodies of the script commands

use alloy::{network::Network as ChainNetwork, primitives::Address, providers::Provider};
use json::JsonValue;
use tracing::{info, warn};

use crate::{
    build::{zksync_bytecode_hash, ArtifactStore},
    cli::{BytecodeHashArgs, CheckArgs, DeployArgs, ShowConfigArgs},
    config::{CompilerSettings, Network, NetworkConfig, Profile, RecoveryParams},
    constants::PROXY_ARTIFACT,
    deploy::{deploy_recovery_module, DryRunDeployer, RecoveryDeployment, RpcDeployer},
    errors::ScriptError,
    output_writer::{read_output_file, write_deployment, RECOVERY_MODULE_KEY},
    tx::{
        client::{create_read_provider, create_rpc_provider, ensure_chain_id, parse_signer},
        reader::ensure_contracts_deployed,
    },
    utils::parse_address,
};

/// Settings shared by every command
#[derive(Debug, Clone)]
pub struct ScriptContext {
    /// Selected network
    pub network: Network,
    /// Endpoint to talk to
    pub rpc_url: String,
    /// Deployer key, only needed to send transactions
    pub priv_key: Option<String>,
}

impl ScriptContext {
    /// Build the context, falling back to the network endpoint when no RPC url is given
    pub fn new(network: Network, rpc_url: Option<String>, priv_key: Option<String>) -> Self {
        Self {
            network,
            rpc_url: rpc_url.unwrap_or_else(|| network.config().url.to_string()),
            priv_key,
        }
    }

    /// The requested profile, or the one matching the network
    fn profile(&self, requested: Option<Profile>) -> Profile {
        let default = Profile::for_network(self.network);
        match requested {
            Some(profile) if profile != default => {
                warn!(
                    network = %self.network,
                    %profile,
                    "Profile does not match the network"
                );
                profile
            }
            Some(profile) => profile,
            None => default,
        }
    }
}

/// Deploy the email recovery contracts
pub async fn deploy_contracts(
    args: DeployArgs,
    ctx: &ScriptContext,
) -> Result<RecoveryDeployment, ScriptError> {
    let network = ctx.network.config();
    let profile = ctx.profile(args.profile);
    info!(network = %ctx.network, %profile, "Deploying the email recovery module...");

    let params = profile
        .deployment()
        .resolve()?
        .with_overrides(args.kill_switch_authorizer, args.minimum_delay);
    params.warn_on_placeholders();

    let artifacts = ArtifactStore::new(&args.artifacts, profile.libraries());
    check_proxy_bytecode_hash(&artifacts, &params)?;

    let deployment = if args.dry_run {
        let sender = match ctx.priv_key.as_deref() {
            Some(priv_key) => parse_signer(priv_key)?.address(),
            None => Address::ZERO,
        };
        info!(%sender, nonce = args.nonce, "Dry run, nothing will be sent");

        let mut deployer = DryRunDeployer::new(artifacts, sender, args.nonce, network.zksync);
        let deployment = deploy_recovery_module(&mut deployer, &params).await?;

        let sizes = deployer.creation_sizes();
        info!(
            contracts = sizes.len(),
            bytes = sizes.iter().map(|(_, size)| size).sum::<usize>(),
            "Dry run done"
        );
        deployment
    } else {
        let priv_key = ctx.priv_key.as_deref().ok_or_else(|| {
            ScriptError::ClientInitialization(String::from(
                "a private key is required to deploy",
            ))
        })?;
        let signer = parse_signer(priv_key)?;
        let sender = signer.address();

        // Build our RPC client with signer
        let client = create_rpc_provider(&ctx.rpc_url, signer)?;
        ensure_chain_id(&client, network).await?;

        let mut deployer = RpcDeployer::new(client, sender, artifacts);
        deploy_recovery_module(&mut deployer, &params).await?
    };

    match (&args.out, args.dry_run) {
        (Some(_), true) => warn!("Dry run, the output file is left untouched"),
        (Some(out), false) => {
            if let Ok(previous) = read_output_file(out, network.name, RECOVERY_MODULE_KEY) {
                info!(%previous, "Replacing the recorded recovery module");
            }
            write_deployment(out, network.name, &deployment)?;
            info!(path = %out.display(), "Deployed addresses written");
        }
        (None, _) => {}
    }

    Ok(deployment)
}

/// Compare the proxy artifact with the bytecode hash given to the factory
fn check_proxy_bytecode_hash(
    artifacts: &ArtifactStore,
    params: &RecoveryParams,
) -> Result<(), ScriptError> {
    let bytecode = artifacts.linked_bytecode(PROXY_ARTIFACT)?;

    match zksync_bytecode_hash(&bytecode) {
        Ok(hash) if hash == params.bytecode_hash => {
            info!(%hash, "Proxy bytecode hash matches the profile")
        }
        Ok(hash) => warn!(
            artifact = %hash,
            profile = %params.bytecode_hash,
            "Proxy bytecode hash differs from the profile, the factory won't deploy this proxy"
        ),
        Err(e) => warn!(error = %e, "Could not hash the proxy bytecode"),
    }
    Ok(())
}

/// Check the pre-deployed contracts of a profile have code on chain
pub async fn check_profile(args: CheckArgs, ctx: &ScriptContext) -> Result<(), ScriptError> {
    let profile = ctx.profile(args.profile);
    let client = create_read_provider(&ctx.rpc_url)?;

    let checked = verify_profile(&client, ctx.network.config(), profile).await?;
    info!(
        network = %ctx.network,
        %profile,
        checked,
        "Every pre-deployed contract is on chain"
    );
    Ok(())
}

/// Check the endpoint chain, then the code of every contract the profile relies on.
/// Returns how many contracts were checked
async fn verify_profile<N, P>(
    client: &P,
    network: &NetworkConfig,
    profile: Profile,
) -> Result<usize, ScriptError>
where
    N: ChainNetwork,
    P: Provider<N>,
{
    let table = profile.deployment();
    table.validate()?;
    let params = table.resolve()?;
    params.warn_on_placeholders();

    ensure_chain_id(client, network).await?;

    let expected = expected_contracts(profile, &params)?;
    ensure_contracts_deployed(client, &expected).await?;
    Ok(expected.len())
}

/// Contracts a profile expects on chain, with their address
fn expected_contracts(
    profile: Profile,
    params: &RecoveryParams,
) -> Result<Vec<(String, Address)>, ScriptError> {
    let mut expected = vec![
        (String::from("dkimRegistry"), params.dkim_registry),
        (String::from("verifier"), params.verifier),
        (String::from("emailAuthImpl"), params.email_auth_impl),
        (String::from("factoryAddress"), params.factory),
    ];
    for lib in profile.libraries().entries() {
        expected.push((lib.name.to_string(), parse_address(lib.name, lib.address)?));
    }
    Ok(expected)
}

/// Print the network and compiler settings
pub fn show_config(args: ShowConfigArgs, ctx: &ScriptContext) -> Result<(), ScriptError> {
    let profile = ctx.profile(args.profile);
    let out = config_json(ctx, profile, CompilerSettings::from_env(profile));

    println!("{}", json::stringify_pretty(out, 4));
    Ok(())
}

/// Json view of the selected network, profile and compiler settings
fn config_json(ctx: &ScriptContext, profile: Profile, compiler: CompilerSettings) -> JsonValue {
    let mut network = ctx.network.config().to_json();
    network["url"] = ctx.rpc_url.as_str().into();

    let mut out = JsonValue::new_object();
    out["defaultNetwork"] = Network::default().config().name.into();
    out["network"] = network;
    out["profile"] = profile.to_string().into();
    out["compiler"] = compiler.to_json();
    out
}

/// Print the zkSync bytecode hash of an artifact
pub fn bytecode_hash(args: BytecodeHashArgs, ctx: &ScriptContext) -> Result<(), ScriptError> {
    let profile = ctx.profile(args.profile);
    let artifacts = ArtifactStore::new(&args.artifacts, profile.libraries());

    let bytecode = artifacts.linked_bytecode(&args.artifact)?;
    let hash = zksync_bytecode_hash(&bytecode)?;
    println!("{}", hash);

    if hash.to_string().eq_ignore_ascii_case(profile.deployment().bytecode_hash) {
        info!(%profile, "Matches the profile bytecode hash");
    }
    Ok(())
}
