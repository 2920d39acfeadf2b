//! Polls the node until a transaction is accepted, rejected or reverted.

#[cfg(test)]
#[path = "wait_test.rs"]
mod wait_test;

use std::time::Duration;

use starknet_rpc_client::objects::felt::TransactionHash;
use starknet_rpc_client::objects::response::{
    TransactionExecutionStatus,
    TransactionFinalityStatus,
};
use starknet_rpc_client::{ClientError, StarknetProvider};
use tracing::{debug, info};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WaitParams {
    pub timeout: Duration,
    pub retry_interval: Duration,
}

impl WaitParams {
    // At least one query, even if the interval is longer than the timeout.
    fn max_attempts(&self) -> u64 {
        let interval = self.retry_interval.as_millis().max(1);
        u64::try_from(self.timeout.as_millis() / interval).unwrap_or(u64::MAX).max(1)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ErrorData {
    pub data: String,
}

/// A transaction that the node refused or whose execution failed.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum TransactionError {
    #[error("Transaction has been rejected")]
    Rejected,
    #[error("Transaction has been reverted = {}", .0.data)]
    Reverted(ErrorData),
}

#[derive(thiserror::Error, Debug)]
pub enum WaitForTransactionError {
    #[error(transparent)]
    TransactionError(#[from] TransactionError),
    #[error("Transaction {transaction_hash} was not accepted within {} seconds", timeout.as_secs())]
    TimedOut { transaction_hash: TransactionHash, timeout: Duration },
    #[error(transparent)]
    Provider(#[from] ClientError),
}

/// Waits until `transaction_hash` is accepted on L2 (or L1).
pub async fn wait_for_tx<P: StarknetProvider + ?Sized>(
    provider: &P,
    transaction_hash: TransactionHash,
    params: WaitParams,
) -> Result<(), WaitForTransactionError> {
    info!("Waiting for transaction {transaction_hash}.");
    let max_attempts = params.max_attempts();
    for attempt in 1..=max_attempts {
        let status = provider.get_transaction_status(transaction_hash).await?;
        debug!(attempt, ?status, "Polled transaction {transaction_hash}.");
        match status {
            Some(status) if status.finality_status == TransactionFinalityStatus::Rejected => {
                return Err(TransactionError::Rejected.into());
            }
            Some(status)
                if status.execution_status == Some(TransactionExecutionStatus::Reverted) =>
            {
                let revert_reason = provider
                    .get_transaction_receipt(transaction_hash)
                    .await?
                    .and_then(|receipt| receipt.revert_reason)
                    .unwrap_or_default();
                return Err(TransactionError::Reverted(ErrorData { data: revert_reason }).into());
            }
            Some(status)
                if matches!(
                    status.finality_status,
                    TransactionFinalityStatus::AcceptedOnL2 | TransactionFinalityStatus::AcceptedOnL1
                ) =>
            {
                info!("Transaction {transaction_hash} accepted.");
                return Ok(());
            }
            // Unknown or only received.
            _ if attempt < max_attempts => tokio::time::sleep(params.retry_interval).await,
            _ => {}
        }
    }
    Err(WaitForTransactionError::TimedOut { transaction_hash, timeout: params.timeout })
}
