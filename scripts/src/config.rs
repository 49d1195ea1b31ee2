//! Network and deployment profiles the scripts can be run against

use std::{env, fmt};

use alloy::primitives::{Address, B256, U256};
use clap::ValueEnum;
use json::JsonValue;
use tracing::warn;

use crate::{
    constants::{
        COMMAND_UTILS_SOURCE, DECIMAL_UTILS_SOURCE, DOCKERIZED_NODE, IN_MEMORY_NODE,
        MAINNET_LIBRARIES, MAINNET_PROFILE, SIZE_OPTIMIZER_MODE, SOLC_VERSION,
        STRING_UTILS_SOURCE, TESTNET_LIBRARIES, TESTNET_PROFILE, TEST_ENV_VAR, ZKSOLC_VERSION,
        ZKSYNC_MAINNET, ZKSYNC_SEPOLIA,
    },
    errors::ScriptError,
    utils::{is_prefixed_hex, parse_address, parse_hash, ADDRESS_LENGTH, HASH_LENGTH},
};

/// Connection settings of a network
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkConfig {
    /// Name of the network
    pub name: &'static str,
    /// RPC endpoint
    pub url: &'static str,
    /// Underlying L1 network, either a name or an RPC url. Empty when there is none
    pub eth_network: &'static str,
    /// Whether the network is a zkSync chain
    pub zksync: bool,
    /// Contract verification endpoint
    pub verify_url: Option<&'static str>,
    /// Expected chain id
    pub chain_id: u64,
}

impl NetworkConfig {
    /// Json view of the network settings
    pub fn to_json(&self) -> JsonValue {
        let mut out = JsonValue::new_object();
        out["name"] = self.name.into();
        out["url"] = self.url.into();
        out["ethNetwork"] = self.eth_network.into();
        out["zksync"] = self.zksync.into();
        out["verifyURL"] = match self.verify_url {
            Some(url) => url.into(),
            None => JsonValue::Null,
        };
        out["chainId"] = self.chain_id.into();
        out
    }
}

/// The networks the scripts know about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum)]
pub enum Network {
    /// zkSync Era mainnet
    #[value(alias = "zkSyncMainnet")]
    ZkSyncMainnet,
    /// zkSync Era Sepolia
    #[default]
    #[value(alias = "zkSyncSepolia")]
    ZkSyncSepolia,
    /// Local in-memory node
    #[value(alias = "inMemoryNode")]
    InMemoryNode,
    /// Local dockerized node
    #[value(alias = "dockerizedNode")]
    DockerizedNode,
}

impl Network {
    /// Every declared network
    pub const ALL: [Network; 4] = [
        Network::ZkSyncMainnet,
        Network::ZkSyncSepolia,
        Network::InMemoryNode,
        Network::DockerizedNode,
    ];

    /// Connection settings of the network
    pub fn config(&self) -> &'static NetworkConfig {
        match self {
            Network::ZkSyncMainnet => &ZKSYNC_MAINNET,
            Network::ZkSyncSepolia => &ZKSYNC_SEPOLIA,
            Network::InMemoryNode => &IN_MEMORY_NODE,
            Network::DockerizedNode => &DOCKERIZED_NODE,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.config().name)
    }
}

/// Which set of pre-deployed contracts to wire the module to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Profile {
    /// Contracts deployed on mainnet
    Mainnet,
    /// Contracts deployed on testnet
    Testnet,
}

impl Profile {
    /// Default profile for a network, only mainnet uses the mainnet contracts
    pub fn for_network(network: Network) -> Self {
        match network {
            Network::ZkSyncMainnet => Profile::Mainnet,
            _ => Profile::Testnet,
        }
    }

    /// The deployment table of this profile
    pub fn deployment(&self) -> &'static DeploymentProfile {
        match self {
            Profile::Mainnet => &MAINNET_PROFILE,
            Profile::Testnet => &TESTNET_PROFILE,
        }
    }

    /// The linked libraries of this profile
    pub fn libraries(&self) -> &'static LibraryAddresses {
        match self {
            Profile::Mainnet => &MAINNET_LIBRARIES,
            Profile::Testnet => &TESTNET_LIBRARIES,
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Profile::Mainnet => f.write_str("mainnet"),
            Profile::Testnet => f.write_str("testnet"),
        }
    }
}

/// Hard-coded addresses and parameters forwarded to the recovery module
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeploymentProfile {
    /// DKIM registry
    pub dkim_registry: &'static str,
    /// Email proof verifier
    pub verifier: &'static str,
    /// Email auth implementation, used behind the proxies
    pub email_auth_impl: &'static str,
    /// Factory deploying the email auth proxies
    pub factory: &'static str,
    /// zkSync bytecode hash of the email auth proxy
    pub bytecode_hash: &'static str,
    /// Minimum delay before a recovery can be completed
    pub minimum_delay: u64,
    /// Address allowed to disable the module
    pub kill_switch_authorizer: &'static str,
}

impl DeploymentProfile {
    /// The address fields, keyed by their name
    pub fn addresses(&self) -> [(&'static str, &'static str); 5] {
        [
            ("dkimRegistry", self.dkim_registry),
            ("verifier", self.verifier),
            ("emailAuthImpl", self.email_auth_impl),
            ("factoryAddress", self.factory),
            ("killSwitchAuthorizer", self.kill_switch_authorizer),
        ]
    }

    /// Check every field is well formed
    pub fn validate(&self) -> Result<(), ScriptError> {
        for (field, value) in self.addresses() {
            if !is_prefixed_hex(value, ADDRESS_LENGTH) {
                return Err(ScriptError::InvalidConfig(format!(
                    "{} is not a 20 byte hex address: {}",
                    field, value
                )));
            }
        }
        if !is_prefixed_hex(self.bytecode_hash, HASH_LENGTH) {
            return Err(ScriptError::InvalidConfig(format!(
                "bytecodeHash is not a 32 byte hex hash: {}",
                self.bytecode_hash
            )));
        }
        Ok(())
    }

    /// Parse the table into typed parameters
    pub fn resolve(&self) -> Result<RecoveryParams, ScriptError> {
        Ok(RecoveryParams {
            dkim_registry: parse_address("dkimRegistry", self.dkim_registry)?,
            verifier: parse_address("verifier", self.verifier)?,
            email_auth_impl: parse_address("emailAuthImpl", self.email_auth_impl)?,
            factory: parse_address("factoryAddress", self.factory)?,
            bytecode_hash: parse_hash("bytecodeHash", self.bytecode_hash)?,
            minimum_delay: U256::from(self.minimum_delay),
            kill_switch_authorizer: parse_address(
                "killSwitchAuthorizer",
                self.kill_switch_authorizer,
            )?,
        })
    }
}

/// Typed parameters of a recovery module deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecoveryParams {
    /// DKIM registry checking the email signatures
    pub dkim_registry: Address,
    /// Groth16 verifier of the email proofs
    pub verifier: Address,
    /// Email auth implementation behind each proxy
    pub email_auth_impl: Address,
    /// Factory deploying the email auth proxies
    pub factory: Address,
    /// zkSync bytecode hash of the proxy the factory deploys
    pub bytecode_hash: B256,
    /// Minimum recovery delay, in seconds
    pub minimum_delay: U256,
    /// Account allowed to toggle the kill switch
    pub kill_switch_authorizer: Address,
}

impl RecoveryParams {
    /// Replace the values given on the command line
    pub fn with_overrides(
        mut self,
        kill_switch_authorizer: Option<Address>,
        minimum_delay: Option<u64>,
    ) -> Self {
        if let Some(authorizer) = kill_switch_authorizer {
            self.kill_switch_authorizer = authorizer;
        }
        if let Some(delay) = minimum_delay {
            self.minimum_delay = U256::from(delay);
        }
        self
    }

    /// Log the parameters that are most likely placeholders
    pub fn warn_on_placeholders(&self) {
        if self.kill_switch_authorizer == Address::ZERO {
            warn!("Kill switch authorizer is the zero address, the module can't be disabled");
        }
    }
}

/// A library linked into the deployed contracts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkedLibrary {
    /// Source file of the library
    pub source: &'static str,
    /// Name of the library
    pub name: &'static str,
    /// Deployed address
    pub address: &'static str,
}

/// Addresses of the libraries used by the email auth contracts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LibraryAddresses {
    /// `DecimalUtils` address
    pub decimal_utils: &'static str,
    /// `CommandUtils` address
    pub command_utils: &'static str,
    /// `StringUtils` address
    pub string_utils: &'static str,
}

impl LibraryAddresses {
    /// All the libraries with their sources
    pub fn entries(&self) -> [LinkedLibrary; 3] {
        [
            LinkedLibrary {
                source: STRING_UTILS_SOURCE,
                name: "StringUtils",
                address: self.string_utils,
            },
            LinkedLibrary {
                source: DECIMAL_UTILS_SOURCE,
                name: "DecimalUtils",
                address: self.decimal_utils,
            },
            LinkedLibrary {
                source: COMMAND_UTILS_SOURCE,
                name: "CommandUtils",
                address: self.command_utils,
            },
        ]
    }

    /// Find the address of a library from its source and name
    pub fn find(&self, source: &str, name: &str) -> Option<&'static str> {
        self.entries()
            .into_iter()
            .find(|lib| lib.source == source && lib.name == name)
            .map(|lib| lib.address)
    }

    /// `libraries` section of the compiler settings
    pub fn to_json(&self) -> JsonValue {
        let mut out = JsonValue::new_object();
        for lib in self.entries() {
            out[lib.source][lib.name] = lib.address.into();
        }
        out
    }
}

/// Settings the artifacts are expected to be compiled with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompilerSettings {
    /// zksolc release
    pub zksolc_version: &'static str,
    /// solc release zksolc wraps
    pub solc_version: &'static str,
    /// Whether EraVM extensions are allowed
    pub enable_era_vm_extensions: bool,
    /// Optimizer mode, `None` keeps the compiler default
    pub optimizer_mode: Option<&'static str>,
    /// Libraries linked at compile time
    pub libraries: &'static LibraryAddresses,
}

impl CompilerSettings {
    /// Settings for the given profile, size optimised when testing
    pub fn new(profile: Profile, testing: bool) -> Self {
        Self {
            zksolc_version: ZKSOLC_VERSION,
            solc_version: SOLC_VERSION,
            enable_era_vm_extensions: true,
            optimizer_mode: testing.then_some(SIZE_OPTIMIZER_MODE),
            libraries: profile.libraries(),
        }
    }

    /// Settings for the given profile, reading the test flag from the environment
    pub fn from_env(profile: Profile) -> Self {
        let testing = env::var(TEST_ENV_VAR).is_ok_and(|v| !v.is_empty());
        Self::new(profile, testing)
    }

    /// Json view of the settings, shaped like a zksolc configuration
    pub fn to_json(&self) -> JsonValue {
        let mut settings = JsonValue::new_object();
        settings["enableEraVMExtensions"] = self.enable_era_vm_extensions.into();
        settings["optimizer"] = match self.optimizer_mode {
            Some(mode) => {
                let mut optimizer = JsonValue::new_object();
                optimizer["mode"] = mode.into();
                optimizer
            }
            None => JsonValue::Null,
        };
        settings["libraries"] = self.libraries.to_json();

        let mut out = JsonValue::new_object();
        out["zksolc"]["version"] = self.zksolc_version.into();
        out["zksolc"]["settings"] = settings;
        out["solidity"]["version"] = self.solc_version.into();
        out
    }
}
