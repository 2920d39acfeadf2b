//! Declarative scripts: a list of steps run one after the other against the node, where each
//! step can check the error a command fails with.


pub mod runner;

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use starknet_rpc_client::objects::block_id::{BlockId, BlockTag};
use starknet_rpc_client::objects::felt::Felt;

use crate::errors::ScriptCommandError;

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Script {
    // Enums are written as `variant: value` maps.
    #[serde(with = "serde_yaml::with::singleton_map_recursive")]
    pub steps: Vec<Step>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub enum Step {
    /// Fetches the nonce of the account and binds it to `bind`.
    GetNonce {
        #[serde(default = "latest")]
        block_id: BlockId,
        bind: String,
    },
    Declare {
        contract_name: String,
        #[serde(default)]
        max_fee: Option<Felt>,
        /// The name of a bound nonce.
        #[serde(default)]
        nonce: Option<String>,
        /// If set, the declare must fail with this error.
        #[serde(default)]
        expect_error: Option<ExpectedError>,
    },
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ExpectedError {
    pub error: ScriptCommandError,
    /// Shown when the command fails with another error.
    pub message: String,
}

fn latest() -> BlockId {
    BlockId::Tag(BlockTag::Latest)
}

#[derive(thiserror::Error, Debug)]
pub enum ScriptError {
    #[error("Failed to read script {path:?}: {source}")]
    Read { path: PathBuf, source: std::io::Error },
    #[error("Failed to parse script {path:?}: {source}")]
    Parse { path: PathBuf, source: serde_yaml::Error },
    #[error("Step {step}: unknown binding `{name}`")]
    UnknownBinding { step: usize, name: String },
    #[error("Step {step} failed: {error:?}")]
    CommandFailed { step: usize, error: ScriptCommandError },
    #[error("Step {step}: expected {expected:?}, but the command succeeded")]
    UnexpectedSuccess { step: usize, expected: ScriptCommandError },
    #[error("Step {step}: {message}. Expected {expected:?}, got {actual:?}")]
    AssertionFailed {
        step: usize,
        message: String,
        expected: ScriptCommandError,
        actual: ScriptCommandError,
    },
    #[error("Failed to write the script output: {0}")]
    Output(#[from] std::io::Error),
}

impl Script {
    pub fn from_file(path: &Path) -> Result<Self, ScriptError> {
        let contents = fs::read_to_string(path)
            .map_err(|source| ScriptError::Read { path: path.to_owned(), source })?;
        serde_yaml::from_str(&contents)
            .map_err(|source| ScriptError::Parse { path: path.to_owned(), source })
    }
}
