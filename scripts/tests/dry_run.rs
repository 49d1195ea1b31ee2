use std::{fs, path::Path};

use alloy::primitives::Address;
use email_recovery_scripts::{
    build::ArtifactStore,
    cli::DeployArgs,
    commands::{deploy_contracts, ScriptContext},
    config::{Network, Profile},
    constants::{COMMAND_HANDLER_ARTIFACT, PROXY_ARTIFACT, RECOVERY_MODULE_ARTIFACT},
    deploy::{deploy_recovery_module, predict_create_address, DryRunDeployer},
    errors::ScriptError,
};
use tempdir::TempDir;

/// First account of the local development nodes
const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

/// Write a minimal artifact for `name` from `source`
fn write_artifact(root: &Path, source: &str, name: &str, bytecode: &str) {
    let dir = root.join(source);
    fs::create_dir_all(&dir).unwrap();
    let content = format!(
        r#"{{
            "_format": "hh-zksolc-artifact-1",
            "contractName": "{}",
            "sourceName": "{}",
            "abi": [],
            "bytecode": "{}",
            "deployedBytecode": "0x",
            "linkReferences": {{}},
            "deployedLinkReferences": {{}},
            "factoryDeps": {{}}
        }}"#,
        name, source, bytecode
    );
    fs::write(dir.join(format!("{}.json", name)), content).unwrap();
}

/// Artifacts directory holding the three deployed contracts
fn artifacts_dir() -> TempDir {
    let dir = TempDir::new("artifacts-zk").unwrap();
    let word = "00".repeat(32);

    write_artifact(
        dir.path(),
        "contracts/handlers/EmailRecoveryCommandHandler.sol",
        COMMAND_HANDLER_ARTIFACT,
        &format!("0x{}", word),
    );
    let (proxy_source, proxy_name) = PROXY_ARTIFACT.split_once(':').unwrap();
    write_artifact(
        dir.path(),
        proxy_source,
        proxy_name,
        &format!("0x{}", word.repeat(3)),
    );
    write_artifact(
        dir.path(),
        "contracts/modules/EmailRecoveryModule.sol",
        RECOVERY_MODULE_ARTIFACT,
        &format!("0x{}", word.repeat(5)),
    );
    dir
}

fn deploy_args(artifacts: &Path) -> DeployArgs {
    DeployArgs {
        profile: None,
        artifacts: artifacts.to_path_buf(),
        kill_switch_authorizer: None,
        minimum_delay: None,
        out: None,
        dry_run: true,
        nonce: 0,
    }
}

#[tokio::test]
async fn test_dry_run_predicts_sequential_addresses() {
    let dir = artifacts_dir();
    let store = ArtifactStore::new(dir.path(), Profile::Testnet.libraries());
    let params = Profile::Testnet.deployment().resolve().unwrap();
    let sender = Address::repeat_byte(0x5e);

    let mut deployer = DryRunDeployer::new(store, sender, 7, true);
    let deployment = deploy_recovery_module(&mut deployer, &params).await.unwrap();

    assert_eq!(deployment.command_handler, predict_create_address(sender, 7, true));
    assert_eq!(deployment.email_auth_proxy, predict_create_address(sender, 8, true));
    assert_eq!(deployment.recovery_module, predict_create_address(sender, 9, true));

    // Bytecode plus the encoded constructor arguments
    let sizes: Vec<usize> = deployer.creation_sizes().iter().map(|(_, s)| *s).collect();
    assert_eq!(sizes, vec![32, 3 * 32 + 3 * 32, 5 * 32 + 8 * 32]);
}

#[tokio::test]
async fn test_dry_run_command_uses_signer_address() {
    let dir = artifacts_dir();
    let out = dir.path().join("deployed.json");
    let ctx = ScriptContext::new(Network::InMemoryNode, None, Some(DEV_KEY.to_string()));
    let args = DeployArgs {
        out: Some(out.clone()),
        ..deploy_args(dir.path())
    };

    let deployment = deploy_contracts(args, &ctx).await.unwrap();

    let sender: Address = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".parse().unwrap();
    assert_eq!(deployment.command_handler, predict_create_address(sender, 0, true));
    // Predicted addresses are never recorded
    assert!(!out.exists());
}

#[tokio::test]
async fn test_deploy_requires_private_key() {
    let dir = artifacts_dir();
    let ctx = ScriptContext::new(Network::InMemoryNode, None, None);
    let args = DeployArgs {
        dry_run: false,
        ..deploy_args(dir.path())
    };

    let err = deploy_contracts(args, &ctx).await.unwrap_err();
    assert!(matches!(err, ScriptError::ClientInitialization(_)));
}

#[tokio::test]
async fn test_deploy_fails_on_missing_artifacts() {
    let dir = TempDir::new("empty").unwrap();
    let ctx = ScriptContext::new(Network::ZkSyncSepolia, None, None);

    let err = deploy_contracts(deploy_args(dir.path()), &ctx)
        .await
        .unwrap_err();
    assert!(matches!(err, ScriptError::ArtifactNotFound(_)));
}

#[test]
fn test_context_defaults_to_network_endpoint() {
    let ctx = ScriptContext::new(Network::DockerizedNode, None, None);
    assert_eq!(ctx.rpc_url, "http://localhost:3050");

    let ctx = ScriptContext::new(
        Network::DockerizedNode,
        Some("http://10.0.0.2:3050".to_string()),
        None,
    );
    assert_eq!(ctx.rpc_url, "http://10.0.0.2:3050");
}
