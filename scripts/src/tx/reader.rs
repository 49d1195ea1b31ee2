//! Read-only checks against deployed contracts

use alloy::{network::Network, primitives::Address, providers::Provider};
use tracing::debug;

use crate::errors::ScriptError;

/// Whether some code is deployed at the given address
pub async fn has_code<N, P>(client: &P, address: Address) -> Result<bool, ScriptError>
where
    N: Network,
    P: Provider<N>,
{
    let code = client
        .get_code_at(address)
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

    Ok(!code.is_empty())
}

/// Return the names of the expected contracts without code on chain
pub async fn find_missing_contracts<N, P>(
    client: &P,
    expected: &[(String, Address)],
) -> Result<Vec<String>, ScriptError>
where
    N: Network,
    P: Provider<N>,
{
    let mut missing = Vec::new();
    for (name, address) in expected {
        let deployed = has_code(client, *address).await?;
        debug!(contract = %name, %address, deployed, "Checked contract code");
        if !deployed {
            missing.push(format!("{} ({})", name, address));
        }
    }
    Ok(missing)
}

/// Fail with the list of expected contracts that have no code on chain
pub async fn ensure_contracts_deployed<N, P>(
    client: &P,
    expected: &[(String, Address)],
) -> Result<(), ScriptError>
where
    N: Network,
    P: Provider<N>,
{
    let missing = find_missing_contracts(client, expected).await?;
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ScriptError::MissingContracts(missing))
    }
}
