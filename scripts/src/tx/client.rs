//! RPC clients and signer setup

use alloy::{
    hex,
    network::Network,
    providers::{DynProvider, Provider},
    signers::local::PrivateKeySigner,
};
use alloy_zksync::{network::Zksync, provider::zksync_provider, wallet::ZksyncWallet};
use reqwest::Url;
use tracing::info;

use crate::{config::NetworkConfig, errors::ScriptError};

/// A zkSync provider that uses a local signer to sign transactions
/// & interfaces with the RPC endpoint over HTTP
pub type RpcProvider = DynProvider<Zksync>;

/// Build a signer from a hex encoded private key, with or without `0x` prefix
pub fn parse_signer(priv_key: &str) -> Result<PrivateKeySigner, ScriptError> {
    let key_bytes = hex::decode(priv_key.trim())
        .map_err(|e| ScriptError::ClientInitialization(format!("invalid private key: {}", e)))?;
    if key_bytes.len() != 32 {
        return Err(ScriptError::ClientInitialization(format!(
            "private key must be 32 bytes, got {}",
            key_bytes.len()
        )));
    }

    PrivateKeySigner::from_slice(&key_bytes)
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))
}

/// Parse an RPC endpoint
fn parse_rpc_url(rpc_url: &str) -> Result<Url, ScriptError> {
    rpc_url
        .parse::<Url>()
        .map_err(|e| ScriptError::ClientInitialization(format!("invalid rpc url {}: {}", rpc_url, e)))
}

/// Build a zkSync provider signing with the given signer
pub fn create_rpc_provider(
    rpc_url: &str,
    signer: PrivateKeySigner,
) -> Result<RpcProvider, ScriptError> {
    let wallet = ZksyncWallet::from(signer);

    // Create our provider with the rpc client + signer
    let provider = zksync_provider()
        .with_recommended_fillers()
        .wallet(wallet)
        .connect_http(parse_rpc_url(rpc_url)?);

    Ok(provider.erased())
}

/// Build a read-only zkSync provider
pub fn create_read_provider(rpc_url: &str) -> Result<RpcProvider, ScriptError> {
    let provider = zksync_provider().connect_http(parse_rpc_url(rpc_url)?);
    Ok(provider.erased())
}

/// Make sure the endpoint serves the chain of the selected network
pub async fn ensure_chain_id<N, P>(client: &P, network: &NetworkConfig) -> Result<u64, ScriptError>
where
    N: Network,
    P: Provider<N>,
{
    let chain_id = client
        .get_chain_id()
        .await
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;

    if chain_id != network.chain_id {
        return Err(ScriptError::ChainIdMismatch {
            expected: network.chain_id,
            actual: chain_id,
        });
    }

    info!("Build client on chain ID: {}", chain_id);
    Ok(chain_id)
}
