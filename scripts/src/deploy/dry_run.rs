use alloy::primitives::Address;
use tracing::info;

use crate::{
    build::ArtifactStore,
    deploy::{creation_code, predict_create_address, ContractDeployer, DeploymentRequest},
    errors::ScriptError,
};

/// Walk through a deployment without sending anything.
///
/// Artifacts are loaded and linked as for a real deployment, and each contract gets the
/// address it would be created at by `sender`, starting from `nonce`.
pub struct DryRunDeployer {
    /// Where the bytecode is read from
    artifacts: ArtifactStore,
    /// Deployer the addresses are derived from
    sender: Address,
    /// Nonce of the next deployment
    nonce: u64,
    /// Whether addresses follow the zkSync derivation
    zksync: bool,
    /// Size of the creation code of each visited contract
    creation_sizes: Vec<(&'static str, usize)>,
}

impl DryRunDeployer {
    /// Dry deployer predicting addresses for `sender`, starting at `nonce`
    pub fn new(artifacts: ArtifactStore, sender: Address, nonce: u64, zksync: bool) -> Self {
        Self {
            artifacts,
            sender,
            nonce,
            zksync,
            creation_sizes: Vec::new(),
        }
    }

    /// Creation code sizes of the visited contracts, in deployment order
    pub fn creation_sizes(&self) -> &[(&'static str, usize)] {
        &self.creation_sizes
    }
}

impl ContractDeployer for DryRunDeployer {
    async fn deploy(&mut self, request: &DeploymentRequest) -> Result<Address, ScriptError> {
        let contract = self.artifacts.deployable(request.artifact)?;
        let code = creation_code(&contract.bytecode, &request.constructor_args);

        let address = predict_create_address(self.sender, self.nonce, self.zksync);
        self.nonce += 1;
        self.creation_sizes.push((request.label, code.len()));

        if !request.silent {
            info!(
                label = request.label,
                %address,
                size = code.len(),
                factory_deps = contract.factory_deps.len(),
                "Dry run deployment"
            );
        }

        Ok(address)
    }
}
