use alloy::primitives::{Address, Bytes};
use tracing::info;

use crate::{
    config::RecoveryParams,
    constants::{COMMAND_HANDLER_ARTIFACT, PROXY_ARTIFACT, RECOVERY_MODULE_ARTIFACT},
    deploy::{ContractDeployer, DeploymentRequest},
    errors::ScriptError,
    tx::abi::{proxy_args, recovery_module_args},
};

/// Addresses of a recovery module deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecoveryDeployment {
    /// Command handler of the module
    pub command_handler: Address,
    /// Published email auth proxy, only used for its bytecode
    pub email_auth_proxy: Address,
    /// The email recovery module
    pub recovery_module: Address,
}

/// Deploy the command handler, the email auth proxy and the recovery module, in that order
pub async fn deploy_recovery_module<D: ContractDeployer>(
    deployer: &mut D,
    params: &RecoveryParams,
) -> Result<RecoveryDeployment, ScriptError> {
    let command_handler = deployer
        .deploy(&DeploymentRequest {
            label: "command handler",
            artifact: COMMAND_HANDLER_ARTIFACT,
            constructor_args: Vec::new(),
            silent: false,
        })
        .await?;
    println!("Command handler deployed at: {}", command_handler);

    // Publishes the proxy bytecode, the factory deploys it by hash
    let email_auth_proxy = deployer
        .deploy(&DeploymentRequest {
            label: "email auth proxy",
            artifact: PROXY_ARTIFACT,
            constructor_args: proxy_args(params.email_auth_impl, Bytes::new()),
            silent: true,
        })
        .await?;

    let recovery_module = deployer
        .deploy(&DeploymentRequest {
            label: "email recovery module",
            artifact: RECOVERY_MODULE_ARTIFACT,
            constructor_args: recovery_module_args(params, command_handler),
            silent: false,
        })
        .await?;
    println!("Email recovery module deployed at: {}", recovery_module);

    info!(
        %command_handler,
        %email_auth_proxy,
        %recovery_module,
        "Recovery module deployment done"
    );

    Ok(RecoveryDeployment {
        command_handler,
        email_auth_proxy,
        recovery_module,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Profile;

    /// Records the requests and hands out sequential addresses
    #[derive(Default)]
    struct RecordingDeployer {
        requests: Vec<DeploymentRequest>,
        fail_at: Option<usize>,
    }

    impl ContractDeployer for RecordingDeployer {
        async fn deploy(&mut self, request: &DeploymentRequest) -> Result<Address, ScriptError> {
            if self.fail_at == Some(self.requests.len()) {
                return Err(ScriptError::ContractDeployment("reverted".to_string()));
            }
            self.requests.push(request.clone());
            Ok(Address::with_last_byte(self.requests.len() as u8))
        }
    }

    #[tokio::test]
    async fn test_sequence_is_profile_independent() {
        for profile in [Profile::Mainnet, Profile::Testnet] {
            let params = profile.deployment().resolve().unwrap();
            let mut deployer = RecordingDeployer::default();

            deploy_recovery_module(&mut deployer, &params).await.unwrap();

            let artifacts: Vec<_> = deployer.requests.iter().map(|r| r.artifact).collect();
            assert_eq!(
                artifacts,
                vec![COMMAND_HANDLER_ARTIFACT, PROXY_ARTIFACT, RECOVERY_MODULE_ARTIFACT]
            );
            let silent: Vec<_> = deployer.requests.iter().map(|r| r.silent).collect();
            assert_eq!(silent, vec![false, true, false]);
        }
    }

    #[tokio::test]
    async fn test_forwards_profile_fields() {
        let params = Profile::Testnet.deployment().resolve().unwrap();
        let mut deployer = RecordingDeployer::default();

        let deployment = deploy_recovery_module(&mut deployer, &params).await.unwrap();

        assert_eq!(deployment.command_handler, Address::with_last_byte(1));
        assert_eq!(deployment.email_auth_proxy, Address::with_last_byte(2));
        assert_eq!(deployment.recovery_module, Address::with_last_byte(3));

        assert!(deployer.requests[0].constructor_args.is_empty());
        assert_eq!(
            deployer.requests[1].constructor_args,
            proxy_args(params.email_auth_impl, Bytes::new())
        );
        // The module receives the freshly deployed command handler
        assert_eq!(
            deployer.requests[2].constructor_args,
            recovery_module_args(&params, deployment.command_handler)
        );
    }

    #[tokio::test]
    async fn test_failure_stops_the_sequence() {
        let params = Profile::Testnet.deployment().resolve().unwrap();
        let mut deployer = RecordingDeployer {
            fail_at: Some(1),
            ..Default::default()
        };

        let err = deploy_recovery_module(&mut deployer, &params).await.unwrap_err();

        assert!(matches!(err, ScriptError::ContractDeployment(_)));
        assert_eq!(deployer.requests.len(), 1);
    }
}
