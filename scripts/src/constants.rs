//! Constants used in the deploy scripts

use crate::config::{DeploymentProfile, LibraryAddresses, NetworkConfig};

/* -------------------------------------------------------------------------- */
/*                                  Networks                                  */
/* -------------------------------------------------------------------------- */

/// zkSync Era mainnet
pub const ZKSYNC_MAINNET: NetworkConfig = NetworkConfig {
    name: "zkSyncMainnet",
    url: "https://mainnet.era.zksync.io",
    eth_network: "mainnet",
    zksync: true,
    verify_url: Some("https://zksync2-mainnet-explorer.zksync.io/contract_verification"),
    chain_id: 324,
};

/// zkSync Era Sepolia testnet
pub const ZKSYNC_SEPOLIA: NetworkConfig = NetworkConfig {
    name: "zkSyncSepolia",
    url: "https://sepolia.era.zksync.dev",
    eth_network: "sepolia",
    zksync: true,
    verify_url: Some("https://explorer.sepolia.era.zksync.dev/contract_verification"),
    chain_id: 300,
};

/// Local in-memory node, it has no L1 behind it
pub const IN_MEMORY_NODE: NetworkConfig = NetworkConfig {
    name: "inMemoryNode",
    url: "http://127.0.0.1:8011",
    eth_network: "",
    zksync: true,
    verify_url: None,
    chain_id: 260,
};

/// Local dockerized node, backed by a local L1 node
pub const DOCKERIZED_NODE: NetworkConfig = NetworkConfig {
    name: "dockerizedNode",
    url: "http://localhost:3050",
    eth_network: "http://localhost:8545",
    zksync: true,
    verify_url: None,
    chain_id: 270,
};

/* -------------------------------------------------------------------------- */
/*                             Deployment profiles                            */
/* -------------------------------------------------------------------------- */

/// Contracts already deployed on mainnet
pub const MAINNET_PROFILE: DeploymentProfile = DeploymentProfile {
    dkim_registry: "0x25c67a2313FCE68D741f3ab31C851EBCdFFfBd4C",
    verifier: "0x0679f14d91c9519a1376C1b65Dc731FE25Bd4272",
    email_auth_impl: "0x2a5F70E28C1bF0d5cBA6EC6d170F9a36f905366F",
    factory: "0x10959669CF1c92B4cf14D9F925f5F2Df488Ce4C4",
    bytecode_hash: "0x010000817949717e7168c684f6dbb83a7051fa4c28e9e2b04784b6a6d4df360a",
    minimum_delay: 0,
    // Should be replaced by the real authorizer, or overridden from the CLI
    kill_switch_authorizer: "0x0000000000000000000000000000000000000000",
};

/// Contracts already deployed on testnet
pub const TESTNET_PROFILE: DeploymentProfile = DeploymentProfile {
    dkim_registry: "0x07284efbc9A44eDE8Cf61daE96298FA16bf5591e",
    verifier: "0xCf619836B8fb82C9cAdF52d81644dd59Ed520DaE",
    email_auth_impl: "0x398316B211BeEe5238BB34f8a4e565cCbA790ADC",
    factory: "0x934D44cD16a25C7Ef93583674cDb5F303bC8d393",
    bytecode_hash: "0x01000081183d2be3ef5a61113657f87b159436fbccec981e966ffd26816c2c34",
    minimum_delay: 0,
    kill_switch_authorizer: "0x0000000000000000000000000000000000000000",
};

/// Linked libraries on mainnet
pub const MAINNET_LIBRARIES: LibraryAddresses = LibraryAddresses {
    decimal_utils: "0x64c7C15d135C77A4A5f1D8bB8371f21e94782C06",
    command_utils: "0x8B0ee5573f93706D7a3f2eC10B4670BF6d295B7c",
    string_utils: "0xbB924a1116b9EBCff19A6C83B97B06B8Aa3BF918",
};

/// Linked libraries on testnet
pub const TESTNET_LIBRARIES: LibraryAddresses = LibraryAddresses {
    decimal_utils: "0x0b5900C91Cb1683182c6d279C22706e6a6C65Bfb",
    command_utils: "0x9821b97F3b585738648cfB50F3EfF9c5DB490Cc2",
    string_utils: "0x86E65d11ef3C99ABb34a8C903552906E906661FE",
};

/// Source of the `DecimalUtils` library
pub const DECIMAL_UTILS_SOURCE: &str =
    "@zk-email/ether-email-auth-contracts/src/libraries/DecimalUtils.sol";

/// Source of the `CommandUtils` library
pub const COMMAND_UTILS_SOURCE: &str =
    "@zk-email/ether-email-auth-contracts/src/libraries/CommandUtils.sol";

/// Source of the `StringUtils` library
pub const STRING_UTILS_SOURCE: &str =
    "@zk-email/ether-email-auth-contracts/src/libraries/StringUtils.sol";

/* -------------------------------------------------------------------------- */
/*                                  Artifacts                                 */
/* -------------------------------------------------------------------------- */

/// Default directory holding the compiled artifacts
pub const DEFAULT_ARTIFACTS_DIR: &str = "artifacts-zk";

/// Artifact of the command handler
pub const COMMAND_HANDLER_ARTIFACT: &str = "EmailRecoveryCommandHandler";

/// Artifact of the email auth proxy
pub const PROXY_ARTIFACT: &str =
    "@openzeppelin/contracts/proxy/ERC1967/ERC1967Proxy.sol:ERC1967Proxy";

/// Artifact of the recovery module
pub const RECOVERY_MODULE_ARTIFACT: &str = "EmailRecoveryModule";

/* -------------------------------------------------------------------------- */
/*                                  Compiler                                  */
/* -------------------------------------------------------------------------- */

/// zksolc version used to build the artifacts
pub const ZKSOLC_VERSION: &str = "latest";

/// solc version used to build the artifacts
pub const SOLC_VERSION: &str = "0.8.26";

/// Environment variable switching the compiler to size optimisation
pub const TEST_ENV_VAR: &str = "TEST";

/// Optimizer mode used when [`TEST_ENV_VAR`] is set
pub const SIZE_OPTIMIZER_MODE: &str = "z";
