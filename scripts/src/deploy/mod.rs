//! Deployment of the email recovery contracts

/// Offline deployer
mod dry_run;
/// The recovery module deployment sequence
mod plan;
/// Deployer sending transactions
mod rpc;

use alloy::primitives::{keccak256, Address, Bytes, U256};

use crate::errors::ScriptError;

pub use dry_run::DryRunDeployer;
pub use plan::{deploy_recovery_module, RecoveryDeployment};
pub use rpc::RpcDeployer;

/// Seed of the zkSync `CREATE` address derivation
const ZKSYNC_CREATE_PREFIX: &[u8] = b"zksyncCreate";

/// One contract to deploy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentRequest {
    /// Human readable name, used in the logs
    pub label: &'static str,
    /// Name of the artifact to deploy
    pub artifact: &'static str,
    /// ABI encoded constructor arguments
    pub constructor_args: Vec<u8>,
    /// Skip the progress logs
    pub silent: bool,
}

/// Something able to deploy a contract and return its address
#[allow(async_fn_in_trait)]
pub trait ContractDeployer {
    /// Deploy the requested contract, resolving once it's on chain
    async fn deploy(&mut self, request: &DeploymentRequest) -> Result<Address, ScriptError>;
}

/// Creation code of a contract: its bytecode followed by the constructor arguments
pub fn creation_code(bytecode: &[u8], constructor_args: &[u8]) -> Bytes {
    let mut code = Vec::with_capacity(bytecode.len() + constructor_args.len());
    code.extend_from_slice(bytecode);
    code.extend_from_slice(constructor_args);
    code.into()
}

/// Predict the address of a contract created by `sender` with `nonce`.
///
/// zkSync derives it from the deployment nonce:
/// `keccak256(keccak256("zksyncCreate") ++ sender ++ nonce)`, other chains use the usual RLP rule.
pub fn predict_create_address(sender: Address, nonce: u64, zksync: bool) -> Address {
    if !zksync {
        return sender.create(nonce);
    }

    let mut preimage = Vec::with_capacity(96);
    preimage.extend_from_slice(keccak256(ZKSYNC_CREATE_PREFIX).as_slice());
    preimage.extend_from_slice(sender.into_word().as_slice());
    preimage.extend_from_slice(&U256::from(nonce).to_be_bytes::<32>());

    Address::from_word(keccak256(preimage))
}
