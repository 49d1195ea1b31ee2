use clap::Parser;
use dotenv::dotenv;
use email_recovery_scripts::{
    cli::Cli,
    commands::ScriptContext,
    errors::ScriptError,
};

#[tokio::main]
async fn main() -> Result<(), ScriptError> {
    // Load .env file
    dotenv().ok();

    let Cli {
        priv_key,
        rpc_url,
        network,
        verbosity,
        command,
    } = Cli::parse();

    tracing_subscriber::fmt()
        .pretty()
        .with_max_level(verbosity)
        .init();

    let ctx = ScriptContext::new(network, rpc_url, priv_key);
    command.run(&ctx).await
}
