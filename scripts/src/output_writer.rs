//! JSON record of the deployed addresses

use std::{fmt::LowerHex, fs, fs::File, io::Read, path::Path};

use json::JsonValue;

use crate::{deploy::RecoveryDeployment, errors::ScriptError};

/// Key of the command handler in the output file
pub const COMMAND_HANDLER_KEY: &str = "commandHandler";
/// Key of the email auth proxy in the output file
pub const EMAIL_AUTH_PROXY_KEY: &str = "emailAuthProxy";
/// Key of the recovery module in the output file
pub const RECOVERY_MODULE_KEY: &str = "emailRecoveryModule";

/// Read a deployed address
pub fn read_output_file(
    file_path: &Path,
    network: &str,
    contract: &str,
) -> Result<String, ScriptError> {
    if !file_path.exists() {
        return Err(ScriptError::JsonOutputError(String::from(
            "Deployed addresses file not found",
        )));
    }

    let parsed_json = get_json_from_file(file_path)?;
    parsed_json[network][contract]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| {
            ScriptError::JsonOutputError(format!("no {} entry for {}", contract, network))
        })
}

/// Writes the given address for the deployed contract
pub fn write_output_file<T: LowerHex>(
    file_path: &Path,
    network: &str,
    contract: &str,
    value: T,
) -> Result<(), ScriptError> {
    // If the file doesn't exist, create it
    if !file_path.exists() {
        fs::write(file_path, "{}").map_err(|e| ScriptError::JsonOutputError(e.to_string()))?;
    }

    // Parse it's json content into objects
    let mut parsed_json = get_json_from_file(file_path)?;

    // Update the right key
    parsed_json[network][contract] = JsonValue::String(format!("{value:#x}"));

    // Write the updated json back to the file
    fs::write(file_path, json::stringify_pretty(parsed_json, 4))
        .map_err(|e| ScriptError::JsonOutputError(e.to_string()))?;

    Ok(())
}

/// Writes every address of a recovery module deployment
pub fn write_deployment(
    file_path: &Path,
    network: &str,
    deployment: &RecoveryDeployment,
) -> Result<(), ScriptError> {
    write_output_file(file_path, network, COMMAND_HANDLER_KEY, deployment.command_handler)?;
    write_output_file(file_path, network, EMAIL_AUTH_PROXY_KEY, deployment.email_auth_proxy)?;
    write_output_file(file_path, network, RECOVERY_MODULE_KEY, deployment.recovery_module)
}

/// Parses the JSON file at the given path
fn get_json_from_file(file_path: &Path) -> Result<JsonValue, ScriptError> {
    let mut file_contents = String::new();
    File::open(file_path)
        .map_err(|e| ScriptError::JsonOutputError(e.to_string()))?
        .read_to_string(&mut file_contents)
        .map_err(|e| ScriptError::JsonOutputError(e.to_string()))?;

    json::parse(&file_contents).map_err(|e| ScriptError::JsonOutputError(e.to_string()))
}
