//! Configuration utilities for sncast.
//!
//! A configuration is a tree of structs. Every struct flattens itself into a map from a dotted
//! param path (e.g. `rpc.url`) to a [`SerializedParam`], see [`dumping::SerializeConfig`]. The
//! map of the default configuration is then updated, in the following order of priority, by:
//! * Command line arguments (or the matching environment variables).
//! * A custom config file.
//!
//! and finally deserialized back into the configuration struct, see
//! [`loading::load_and_process_config`].

use clap::parser::MatchesError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub mod command;
pub mod converters;
pub mod dumping;
pub mod loading;
pub mod validators;


/// A dotted path of a param in the configuration tree.
pub type ParamPath = String;
pub type Description = String;

/// The suffix of the flag that marks an optional param (or sub-config) as `None`.
pub const IS_NONE_MARK: &str = "#is_none";

/// A single flattened param: its description and current value.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct SerializedParam {
    pub description: Description,
    pub value: Value,
}

/// Errors at the configuration dumping and loading process.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    CommandInput(#[from] clap::error::Error),
    #[error(transparent)]
    MissingParam(#[from] serde_json::Error),
    #[error(transparent)]
    CommandMatches(#[from] MatchesError),
    #[error("Insert a new param is not allowed: {param_path}.")]
    ParamNotFound { param_path: ParamPath },
    #[error("Changing {param_path} from {before} to {after} is not allowed.")]
    ChangeParamType { param_path: ParamPath, before: Value, after: Value },
    #[error(transparent)]
    ReadFile(#[from] std::io::Error),
}
