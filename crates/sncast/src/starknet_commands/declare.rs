#[cfg(test)]
#[path = "declare_test.rs"]
mod declare_test;

use clap::Args;
use starknet_rpc_client::objects::block_id::{BlockId, BlockTag};
use starknet_rpc_client::objects::felt::{Fee, Felt, Nonce};
use starknet_rpc_client::StarknetProvider;
use tracing::info;

use crate::account::SingleOwnerAccount;
use crate::artifacts::ContractClasses;
use crate::errors::{ContractArtifactsNotFoundData, StarknetCommandError};
use crate::response::DeclareResponse;
use crate::wait::{wait_for_tx, WaitParams};

#[derive(Args, Debug, Clone, PartialEq)]
#[command(about = "Declare a contract to starknet", long_about = None)]
pub struct Declare {
    /// Contract name
    #[arg(short = 'c', long = "contract-name")]
    pub contract: String,

    /// Max fee for the transaction. If not provided, max fee will be automatically estimated
    #[arg(short, long)]
    pub max_fee: Option<Felt>,

    /// Nonce of the transaction. If not provided, nonce will be set automatically
    #[arg(short, long)]
    pub nonce: Option<Nonce>,
}

/// The declare settings that come from the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeclareParams {
    pub fee_multiplier_percent: u64,
    /// If set, wait for the transaction to be accepted.
    pub wait_params: Option<WaitParams>,
}

pub async fn declare<P: StarknetProvider>(
    contract_name: &str,
    max_fee: Option<Felt>,
    nonce: Option<Nonce>,
    account: &SingleOwnerAccount<P>,
    contracts: &impl ContractClasses,
    params: &DeclareParams,
) -> Result<DeclareResponse, StarknetCommandError> {
    let class = contracts.declarable_class(contract_name)?.ok_or_else(|| {
        StarknetCommandError::ContractArtifactsNotFound(ContractArtifactsNotFoundData {
            contract_name: contract_name.to_owned(),
        })
    })?;

    let nonce = match nonce {
        Some(nonce) => nonce,
        None => account.get_nonce(BlockId::Tag(BlockTag::Pending)).await?,
    };
    let max_fee = match max_fee {
        Some(max_fee) => Fee(max_fee),
        None => account.declare_max_fee(&class, nonce, params.fee_multiplier_percent).await?,
    };

    info!("Declaring {contract_name} with nonce {nonce} and max fee {max_fee}.");
    let result = account.declare(&class, nonce, max_fee).await?;
    info!(
        "Declare transaction {} sent, class hash {}.",
        result.transaction_hash, result.class_hash
    );

    if let Some(wait_params) = params.wait_params {
        wait_for_tx(account.provider(), result.transaction_hash, wait_params).await?;
    }

    Ok(DeclareResponse { class_hash: result.class_hash, transaction_hash: result.transaction_hash })
}
