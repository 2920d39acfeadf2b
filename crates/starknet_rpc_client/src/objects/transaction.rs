//! Transactions that can be broadcasted to Starknet through the JSON-RPC.
//!
//! Each transaction serializes into the JSON object that the `starknet_add*Transaction` and
//! `starknet_estimateFee` methods receive.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use starknet_core::types::FlattenedSierraClass;

use crate::objects::felt::{CompiledClassHash, ContractAddress, Fee, Felt, Nonce, TransactionVersion};

/// The type field of a declare transaction. This enum serializes/deserializes into a constant
/// string.
#[derive(Debug, Deserialize, Serialize, Default, Clone, Copy, Eq, PartialEq)]
pub enum DeclareType {
    #[serde(rename = "DECLARE")]
    #[default]
    Declare,
}

/// A declare transaction of a Cairo-v1 contract class, signed by the sender account.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BroadcastedDeclareTransactionV2 {
    pub r#type: DeclareType,
    pub sender_address: ContractAddress,
    pub compiled_class_hash: CompiledClassHash,
    pub max_fee: Fee,
    pub version: TransactionVersion,
    pub signature: Vec<Felt>,
    pub nonce: Nonce,
    pub contract_class: Arc<FlattenedSierraClass>,
}

impl BroadcastedDeclareTransactionV2 {
    /// Whether the transaction is only meant for fee estimation.
    pub fn is_query(&self) -> bool {
        self.version != TransactionVersion::TWO
    }
}
