//! Constructor ABIs of the deployed contracts

use alloy::{
    primitives::{Address, Bytes},
    sol,
    sol_types::SolConstructor,
};

use crate::config::RecoveryParams;

sol! {
contract EmailRecoveryModule {
    constructor(
        address verifier,
        address dkimRegistry,
        address emailAuthImpl,
        address commandHandler,
        uint256 minimumDelay,
        address killSwitchAuthorizer,
        address factoryAddr,
        bytes32 proxyBytecodeHash
    );
}

contract ERC1967Proxy {
    constructor(address implementation, bytes data);
}

}

/// Constructor arguments of the recovery module
pub fn recovery_module_args(params: &RecoveryParams, command_handler: Address) -> Vec<u8> {
    EmailRecoveryModule::constructorCall {
        verifier: params.verifier,
        dkimRegistry: params.dkim_registry,
        emailAuthImpl: params.email_auth_impl,
        commandHandler: command_handler,
        minimumDelay: params.minimum_delay,
        killSwitchAuthorizer: params.kill_switch_authorizer,
        factoryAddr: params.factory,
        proxyBytecodeHash: params.bytecode_hash,
    }
    .abi_encode()
}

/// Constructor arguments of an ERC1967 proxy
pub fn proxy_args(implementation: Address, data: Bytes) -> Vec<u8> {
    ERC1967Proxy::constructorCall {
        implementation,
        data,
    }
    .abi_encode()
}
