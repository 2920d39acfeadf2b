use serde::{Deserialize, Serialize};

use crate::objects::felt::{ClassHash, Felt, TransactionHash};

/// The result of `starknet_addDeclareTransaction`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DeclareTransactionResult {
    pub transaction_hash: TransactionHash,
    pub class_hash: ClassHash,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FeeEstimate {
    pub gas_consumed: Felt,
    pub gas_price: Felt,
    pub overall_fee: Felt,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionFinalityStatus {
    Received,
    Rejected,
    AcceptedOnL2,
    AcceptedOnL1,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionExecutionStatus {
    Succeeded,
    Reverted,
}

/// The result of `starknet_getTransactionStatus`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TransactionStatus {
    pub finality_status: TransactionFinalityStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_status: Option<TransactionExecutionStatus>,
}

/// The fields of `starknet_getTransactionReceipt` that are common to all transaction types.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TransactionReceipt {
    pub transaction_hash: TransactionHash,
    pub execution_status: TransactionExecutionStatus,
    pub finality_status: TransactionFinalityStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revert_reason: Option<String>,
}
