//! The errors of the Starknet commands, as shown to users and as compared by scripts.

#[cfg(test)]
#[path = "errors_test.rs"]
mod errors_test;

use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use starknet_rpc_client::{ClientError, StarknetError};

use crate::account::AccountError;
use crate::wait::WaitForTransactionError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractArtifactsNotFoundData {
    pub contract_name: String,
}

/// The failure of a command that talks to the node.
#[derive(thiserror::Error, Debug)]
pub enum StarknetCommandError {
    /// Anything the user can't fix by changing the command input.
    #[error(transparent)]
    Unhandleable(#[from] anyhow::Error),
    #[error("Failed to find {} artifact", .0.contract_name)]
    ContractArtifactsNotFound(ContractArtifactsNotFoundData),
    #[error(transparent)]
    WaitForTransactionError(WaitForTransactionError),
    #[error(transparent)]
    ProviderError(#[from] ClientError),
}

impl From<WaitForTransactionError> for StarknetCommandError {
    fn from(error: WaitForTransactionError) -> Self {
        match error {
            WaitForTransactionError::Provider(error) => StarknetCommandError::ProviderError(error),
            error => StarknetCommandError::WaitForTransactionError(error),
        }
    }
}

impl From<AccountError> for StarknetCommandError {
    fn from(error: AccountError) -> Self {
        match error {
            AccountError::Provider(error) => StarknetCommandError::ProviderError(error),
            error => StarknetCommandError::Unhandleable(error.into()),
        }
    }
}

/// Turns a command error into the message the user sees.
pub fn handle_starknet_command_error(error: StarknetCommandError) -> anyhow::Error {
    match error {
        StarknetCommandError::Unhandleable(error) => error,
        StarknetCommandError::ContractArtifactsNotFound(ContractArtifactsNotFoundData {
            contract_name,
        }) => anyhow!(
            "Failed to find {contract_name} artifact in starknet_artifacts.json file. Please make \
             sure you have specified correct package using `--package` flag and that you have \
             enabled sierra and casm code generation in Scarb.toml"
        ),
        StarknetCommandError::WaitForTransactionError(error) => anyhow!(error),
        StarknetCommandError::ProviderError(ClientError::StarknetError(error)) => {
            anyhow!(starknet_error_message(&error))
        }
        StarknetCommandError::ProviderError(error) => anyhow!(error),
    }
}

fn starknet_error_message(error: &StarknetError) -> String {
    match error {
        StarknetError::FailedToReceiveTransaction => "Node failed to receive transaction".into(),
        StarknetError::ContractNotFound => "There is no contract at the specified address".into(),
        StarknetError::BlockNotFound => "Block was not found".into(),
        StarknetError::InvalidTransactionHash => "Invalid transaction hash".into(),
        StarknetError::InvalidBlockHash => "Invalid block hash".into(),
        StarknetError::TransactionHashNotFound => {
            "Transaction with provided hash was not found (does not exist)".into()
        }
        StarknetError::InvalidTransactionIndex => {
            "There is no transaction with such an index".into()
        }
        StarknetError::ClassHashNotFound => "Provided class hash does not exist".into(),
        StarknetError::ContractError(data) => {
            format!("An error occurred in the called contract = {}", data.revert_error)
        }
        StarknetError::TransactionExecutionError(data) => format!(
            "Transaction execution error at index {} = {}",
            data.transaction_index, data.execution_error
        ),
        StarknetError::ClassAlreadyDeclared => {
            "Contract with the same class hash is already declared".into()
        }
        StarknetError::InvalidTransactionNonce => "Invalid transaction nonce".into(),
        StarknetError::InsufficientMaxFee => {
            "Max fee is smaller than the minimal transaction cost".into()
        }
        StarknetError::InsufficientAccountBalance => {
            "Account balance is too small to cover transaction fee".into()
        }
        StarknetError::ValidationFailure(reason) => {
            format!("Contract failed the validation = {reason}")
        }
        StarknetError::CompilationFailed => "Contract failed to compile in starknet".into(),
        StarknetError::ContractClassSizeIsTooLarge => "Contract class size is too large".into(),
        StarknetError::NonAccount => "No account".into(),
        StarknetError::DuplicateTx => "Transaction already exists".into(),
        StarknetError::CompiledClassHashMismatch => "Compiled class hash mismatch".into(),
        StarknetError::UnsupportedTxVersion => "Unsupported transaction version".into(),
        StarknetError::UnsupportedContractClassVersion => {
            "Unsupported contract class version".into()
        }
        // Not expected from a declare.
        StarknetError::PageSizeTooBig
        | StarknetError::NoBlocks
        | StarknetError::InvalidContinuationToken
        | StarknetError::TooManyKeysInFilter
        | StarknetError::UnexpectedError(_) => format!("Unknown RPC error: {error}"),
    }
}

/// A failed RPC call, as seen by scripts.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub enum RPCError {
    StarknetError(StarknetError),
    UnexpectedError(String),
}

/// The error a script gets back from a command. Scripts compare it against the error they
/// expect, so every variant only holds comparable data.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub enum ScriptCommandError {
    RPCError(RPCError),
    ContractArtifactsNotFound { contract_name: String },
    WaitForTransactionError(String),
    Unknown(String),
}

impl From<StarknetCommandError> for ScriptCommandError {
    fn from(error: StarknetCommandError) -> Self {
        match error {
            StarknetCommandError::Unhandleable(error) => {
                ScriptCommandError::Unknown(format!("{error:#}"))
            }
            StarknetCommandError::ContractArtifactsNotFound(ContractArtifactsNotFoundData {
                contract_name,
            }) => ScriptCommandError::ContractArtifactsNotFound { contract_name },
            StarknetCommandError::WaitForTransactionError(error) => {
                ScriptCommandError::WaitForTransactionError(error.to_string())
            }
            StarknetCommandError::ProviderError(ClientError::StarknetError(error)) => {
                ScriptCommandError::RPCError(RPCError::StarknetError(error))
            }
            StarknetCommandError::ProviderError(error) => {
                ScriptCommandError::RPCError(RPCError::UnexpectedError(error.to_string()))
            }
        }
    }
}
