//! The errors a Starknet node returns through the JSON-RPC, by their error code.

#[cfg(test)]
#[path = "starknet_error_test.rs"]
mod starknet_error_test;

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Deserialize, Serialize, Eq, PartialEq)]
pub struct ContractErrorData {
    pub revert_error: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, Eq, PartialEq)]
pub struct TransactionExecutionErrorData {
    pub transaction_index: usize,
    pub execution_error: String,
}

/// An error returned by a Starknet node.
#[derive(thiserror::Error, Debug, Clone, Deserialize, Serialize, Eq, PartialEq)]
pub enum StarknetError {
    #[error("Failed to write transaction")]
    FailedToReceiveTransaction,
    #[error("Contract not found")]
    ContractNotFound,
    #[error("Block not found")]
    BlockNotFound,
    #[error("Invalid transaction hash")]
    InvalidTransactionHash,
    #[error("Invalid block hash")]
    InvalidBlockHash,
    #[error("Invalid transaction index in a block")]
    InvalidTransactionIndex,
    #[error("Class hash not found")]
    ClassHashNotFound,
    #[error("Transaction hash not found")]
    TransactionHashNotFound,
    #[error("Requested page size is too big")]
    PageSizeTooBig,
    #[error("There are no blocks")]
    NoBlocks,
    #[error("The supplied continuation token is invalid or unknown")]
    InvalidContinuationToken,
    #[error("Too many keys provided in a filter")]
    TooManyKeysInFilter,
    #[error("Contract error: {}", .0.revert_error)]
    ContractError(ContractErrorData),
    #[error("Transaction execution error: {}", .0.execution_error)]
    TransactionExecutionError(TransactionExecutionErrorData),
    #[error("Class already declared")]
    ClassAlreadyDeclared,
    #[error("Invalid transaction nonce")]
    InvalidTransactionNonce,
    #[error("Max fee is smaller than the minimal transaction cost (validation plus fee transfer)")]
    InsufficientMaxFee,
    #[error("Account balance is smaller than the transaction's max_fee")]
    InsufficientAccountBalance,
    #[error("Account validation failed: {0}")]
    ValidationFailure(String),
    #[error("Compilation failed")]
    CompilationFailed,
    #[error("Contract class size it too large")]
    ContractClassSizeIsTooLarge,
    #[error("Sender address in not an account contract")]
    NonAccount,
    #[error("A transaction with the same hash already exists in the mempool")]
    DuplicateTx,
    #[error("the compiled class hash did not match the one supplied in the transaction")]
    CompiledClassHashMismatch,
    #[error("the transaction version is not supported")]
    UnsupportedTxVersion,
    #[error("the contract class version is not supported")]
    UnsupportedContractClassVersion,
    #[error("An unexpected error occurred: {0}")]
    UnexpectedError(String),
}

impl StarknetError {
    /// Builds the error that matches a JSON-RPC error object. Returns `None` for codes that are not
    /// Starknet errors.
    pub fn from_rpc_error(code: i64, message: &str, data: Option<&Value>) -> Option<Self> {
        // Errors that carry a string usually put it in `data`, some nodes only fill `message`.
        let data_or_message = || {
            data.and_then(Value::as_str).map(ToOwned::to_owned).unwrap_or_else(|| message.to_owned())
        };
        let error = match code {
            1 => StarknetError::FailedToReceiveTransaction,
            20 => StarknetError::ContractNotFound,
            24 => StarknetError::BlockNotFound,
            25 => StarknetError::InvalidTransactionHash,
            26 => StarknetError::InvalidBlockHash,
            27 => StarknetError::InvalidTransactionIndex,
            28 => StarknetError::ClassHashNotFound,
            29 => StarknetError::TransactionHashNotFound,
            31 => StarknetError::PageSizeTooBig,
            32 => StarknetError::NoBlocks,
            33 => StarknetError::InvalidContinuationToken,
            34 => StarknetError::TooManyKeysInFilter,
            40 => StarknetError::ContractError(
                data.and_then(|data| serde_json::from_value(data.clone()).ok())
                    .unwrap_or_else(|| ContractErrorData { revert_error: data_or_message() }),
            ),
            41 => StarknetError::TransactionExecutionError(
                data.and_then(|data| serde_json::from_value(data.clone()).ok()).unwrap_or_else(
                    || TransactionExecutionErrorData {
                        transaction_index: 0,
                        execution_error: data_or_message(),
                    },
                ),
            ),
            51 => StarknetError::ClassAlreadyDeclared,
            52 => StarknetError::InvalidTransactionNonce,
            53 => StarknetError::InsufficientMaxFee,
            54 => StarknetError::InsufficientAccountBalance,
            55 => StarknetError::ValidationFailure(data_or_message()),
            56 => StarknetError::CompilationFailed,
            57 => StarknetError::ContractClassSizeIsTooLarge,
            58 => StarknetError::NonAccount,
            59 => StarknetError::DuplicateTx,
            60 => StarknetError::CompiledClassHashMismatch,
            61 => StarknetError::UnsupportedTxVersion,
            62 => StarknetError::UnsupportedContractClassVersion,
            63 => StarknetError::UnexpectedError(data_or_message()),
            _ => return None,
        };
        Some(error)
    }

    /// The JSON-RPC error code of the error.
    pub fn code(&self) -> i64 {
        match self {
            StarknetError::FailedToReceiveTransaction => 1,
            StarknetError::ContractNotFound => 20,
            StarknetError::BlockNotFound => 24,
            StarknetError::InvalidTransactionHash => 25,
            StarknetError::InvalidBlockHash => 26,
            StarknetError::InvalidTransactionIndex => 27,
            StarknetError::ClassHashNotFound => 28,
            StarknetError::TransactionHashNotFound => 29,
            StarknetError::PageSizeTooBig => 31,
            StarknetError::NoBlocks => 32,
            StarknetError::InvalidContinuationToken => 33,
            StarknetError::TooManyKeysInFilter => 34,
            StarknetError::ContractError(_) => 40,
            StarknetError::TransactionExecutionError(_) => 41,
            StarknetError::ClassAlreadyDeclared => 51,
            StarknetError::InvalidTransactionNonce => 52,
            StarknetError::InsufficientMaxFee => 53,
            StarknetError::InsufficientAccountBalance => 54,
            StarknetError::ValidationFailure(_) => 55,
            StarknetError::CompilationFailed => 56,
            StarknetError::ContractClassSizeIsTooLarge => 57,
            StarknetError::NonAccount => 58,
            StarknetError::DuplicateTx => 59,
            StarknetError::CompiledClassHashMismatch => 60,
            StarknetError::UnsupportedTxVersion => 61,
            StarknetError::UnsupportedContractClassVersion => 62,
            StarknetError::UnexpectedError(_) => 63,
        }
    }
}
