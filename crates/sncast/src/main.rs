use std::collections::HashMap;
use std::process::ExitCode;

use anyhow::Context;
use cast_config::dumping::SerializeConfig;
use cast_config::validators::ParsedValidationErrors;
use cast_config::ConfigError;
use serde_json::{json, Value};
use sncast::account::SingleOwnerAccount;
use sncast::artifacts::{get_contracts_artifacts, ContractArtifacts};
use sncast::cli::{load_and_process, Commands};
use sncast::config::CastConfig;
use sncast::errors::handle_starknet_command_error;
use sncast::response::format_command_result;
use sncast::script::runner::ScriptRunner;
use sncast::script::Script;
use sncast::starknet_commands::declare::{declare, Declare, DeclareParams};
use sncast::starknet_commands::nonce::{get_nonce, GetNonce};
use starknet_rpc_client::JsonRpcClient;
use tracing::metadata::LevelFilter;
use tracing::{error, info};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};
use validator::Validate;

const DEFAULT_LEVEL: LevelFilter = LevelFilter::INFO;

async fn connect(config: &CastConfig) -> anyhow::Result<SingleOwnerAccount<JsonRpcClient>> {
    let provider = JsonRpcClient::new(
        &config.rpc.url,
        config.rpc.http_headers.clone(),
        config.rpc.request_timeout_millis,
        config.rpc.retry_config,
    )
    .context("Failed to create the RPC client")?;
    SingleOwnerAccount::from_accounts_file(
        provider,
        &config.account.accounts_file,
        &config.account.name,
    )
    .await
}

fn load_contracts(config: &CastConfig) -> anyhow::Result<HashMap<String, ContractArtifacts>> {
    get_contracts_artifacts(&config.artifacts.target_dir, config.artifacts.package.as_deref())
}

fn declare_params(config: &CastConfig) -> DeclareParams {
    DeclareParams {
        fee_multiplier_percent: config.fee.estimate_multiplier_percent,
        wait_params: config.wait.params(),
    }
}

async fn run(command: Commands, config: &CastConfig) -> anyhow::Result<Value> {
    let response = match command {
        Commands::Declare(Declare { contract, max_fee, nonce }) => {
            let account = connect(config).await?;
            let contracts = load_contracts(config)?;
            let params = declare_params(config);
            let response = declare(&contract, max_fee, nonce, &account, &contracts, &params)
                .await
                .map_err(handle_starknet_command_error)?;
            serde_json::to_value(response)?
        }
        Commands::Nonce(GetNonce { block_id }) => {
            let account = connect(config).await?;
            let response =
                get_nonce(&account, block_id).await.map_err(handle_starknet_command_error)?;
            serde_json::to_value(response)?
        }
        Commands::Script { path } => {
            let script = Script::from_file(&path)?;
            let account = connect(config).await?;
            let contracts = load_contracts(config)?;
            let mut stdout = std::io::stdout();
            let runner =
                ScriptRunner::new(&account, &contracts, declare_params(config), &mut stdout);
            let response = runner.run(&script).await?;
            serde_json::to_value(response)?
        }
        Commands::DumpConfig { output } => {
            config
                .dump_to_file(&output)
                .with_context(|| format!("Failed to write the config to {output:?}"))?;
            json!({ "output": output })
        }
    };
    Ok(response)
}

#[tokio::main]
async fn main() -> ExitCode {
    let (cli, config) = match load_and_process(std::env::args().collect()) {
        Ok(loaded) => loaded,
        Err(ConfigError::CommandInput(clap_err)) => clap_err.exit(),
        Err(err) => {
            eprintln!("Failed to load the configuration: {err}");
            return ExitCode::FAILURE;
        }
    };
    configure_tracing();
    // Dumping the config doesn't need an accounts file.
    if !matches!(cli.command, Commands::DumpConfig { .. }) {
        if let Err(errors) = config.validate() {
            error!("{}", ParsedValidationErrors::from(errors));
            return ExitCode::FAILURE;
        }
    }

    let command_name = cli.command.name();
    info!("Running {command_name}.");
    let result = run(cli.command, &config).await;
    let exit_code = if result.is_ok() { ExitCode::SUCCESS } else { ExitCode::FAILURE };
    match format_command_result(command_name, &result, cli.json) {
        Ok(output) => println!("{output}"),
        Err(err) => {
            error!("Failed to format the output of {command_name}: {err}");
            return ExitCode::FAILURE;
        }
    }
    exit_code
}

fn configure_tracing() {
    let fmt_layer = fmt::layer().compact().with_target(false).with_writer(std::io::stderr);
    let level_filter_layer =
        EnvFilter::builder().with_default_directive(DEFAULT_LEVEL.into()).from_env_lossy();

    tracing_subscriber::registry().with(fmt_layer).with(level_filter_layer).init();
}
