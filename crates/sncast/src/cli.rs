#[cfg(test)]
#[path = "cli_test.rs"]
mod cli_test;

use std::path::PathBuf;

use cast_config::command::get_command_args;
use cast_config::dumping::SerializeConfig;
use cast_config::loading::load_and_process_config;
use cast_config::ConfigError;
use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};

use crate::config::{CastConfig, DEFAULT_CONFIG_PATH};
use crate::starknet_commands::declare::Declare;
use crate::starknet_commands::nonce::GetNonce;

/// Every config param can also be given as `--<param.path> <value>` before the command.
#[derive(Parser, Debug)]
#[command(name = "sncast", version, about = "Declare contract classes on Starknet.")]
pub struct Cli {
    /// Optionally sets a config file to use, of the form {"param.path": value}
    #[arg(long = "config_file")]
    pub config_file: Option<PathBuf>,

    /// Print the output of the command as JSON
    #[arg(long)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Declare(Declare),
    Nonce(GetNonce),
    /// Run the steps of a YAML script
    Script {
        path: PathBuf,
    },
    /// Write the loaded configuration to a file
    DumpConfig {
        #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
        output: PathBuf,
    },
}

impl Commands {
    /// The name shown in the command output.
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Declare(_) => "declare",
            Commands::Nonce(_) => "nonce",
            Commands::Script { .. } => "script",
            Commands::DumpConfig { .. } => "dump-config",
        }
    }
}

/// Parses the command line, and loads the configuration: the defaults, updated by the config file
/// and then by the config params of the command line.
pub fn load_and_process(args: Vec<String>) -> Result<(Cli, CastConfig), ConfigError> {
    let default_config_dump = CastConfig::default().dump();
    let arg_matches = Cli::command()
        .args(get_command_args(&default_config_dump))
        .try_get_matches_from(args)?;
    let cli = Cli::from_arg_matches(&arg_matches)?;
    let config =
        load_and_process_config(default_config_dump, cli.config_file.as_deref(), &arg_matches)?;
    Ok((cli, config))
}
