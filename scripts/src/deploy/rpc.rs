use alloy::{
    network::{ReceiptResponse, TransactionBuilder},
    primitives::{Address, TxHash},
    providers::Provider,
};
use alloy_zksync::network::transaction_request::TransactionRequest;
use tracing::info;

use crate::{
    build::ArtifactStore,
    deploy::{ContractDeployer, DeploymentRequest},
    errors::ScriptError,
    tx::client::RpcProvider,
};

/// Deploy contracts by sending zkSync EIP-712 deployment transactions through an RPC endpoint
pub struct RpcDeployer {
    /// Signing client
    client: RpcProvider,
    /// Address of the signer, sending the transactions
    sender: Address,
    /// Where the bytecode is read from
    artifacts: ArtifactStore,
}

impl RpcDeployer {
    /// Deployer sending from `sender` through `client`, which must sign for it
    pub fn new(client: RpcProvider, sender: Address, artifacts: ArtifactStore) -> Self {
        Self {
            client,
            sender,
            artifacts,
        }
    }
}

impl ContractDeployer for RpcDeployer {
    async fn deploy(&mut self, request: &DeploymentRequest) -> Result<Address, ScriptError> {
        let contract = self.artifacts.deployable(request.artifact)?;

        // Build the tx, the bytecode and its factory deps travel as `factory_deps`
        let tx_request = TransactionRequest::default()
            .with_from(self.sender)
            .with_create_params(
                contract.bytecode.to_vec(),
                request.constructor_args.clone(),
                contract
                    .factory_deps
                    .iter()
                    .map(|dep| dep.to_vec())
                    .collect(),
            )
            .map_err(|e| {
                ScriptError::InvalidBytecode(format!("{}: {}", request.label, e))
            })?;

        // Send it
        let pending_tx = self
            .client
            .send_transaction(tx_request)
            .await
            .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?;
        if !request.silent {
            info!(
                "Pending {} deployment... {}",
                request.label,
                pending_tx.tx_hash()
            );
        }

        // Wait for the transaction to be included.
        let receipt = pending_tx
            .get_receipt()
            .await
            .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?;

        let outcome = DeploymentOutcome::from_receipt(&receipt);
        let address = outcome.deployed_address(request.label)?;
        if !request.silent {
            info!(
                "{} deployed on block: {:?}",
                request.label, outcome.block_number
            );
        }

        Ok(address)
    }
}

/// What a deployment receipt tells about the deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DeploymentOutcome {
    /// Hash of the deployment transaction
    pub tx_hash: TxHash,
    /// Block including it
    pub block_number: Option<u64>,
    /// Whether the transaction succeeded
    pub status: bool,
    /// Address of the created contract
    pub contract_address: Option<Address>,
}

impl DeploymentOutcome {
    /// Extract the outcome from any network receipt
    pub fn from_receipt<R: ReceiptResponse>(receipt: &R) -> Self {
        Self {
            tx_hash: receipt.transaction_hash(),
            block_number: receipt.block_number(),
            status: receipt.status(),
            contract_address: receipt.contract_address(),
        }
    }

    /// Address of the deployed contract, failing on reverted or address-less receipts
    pub fn deployed_address(&self, label: &str) -> Result<Address, ScriptError> {
        if !self.status {
            return Err(ScriptError::ContractDeployment(format!(
                "{} deployment reverted in tx {}",
                label, self.tx_hash
            )));
        }

        self.contract_address.ok_or_else(|| {
            ScriptError::ContractDeployment(format!(
                "no contract address in the {} deployment receipt (tx {})",
                label, self.tx_hash
            ))
        })
    }
}
