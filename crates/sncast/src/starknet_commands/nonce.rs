use clap::Args;
use starknet_rpc_client::objects::block_id::BlockId;
use starknet_rpc_client::StarknetProvider;

use crate::account::SingleOwnerAccount;
use crate::errors::StarknetCommandError;
use crate::response::NonceResponse;

#[derive(Args, Debug, Clone, PartialEq)]
#[command(about = "Get the nonce of the account", long_about = None)]
pub struct GetNonce {
    /// Block identifier: latest, pending, a block number or a block hash
    #[arg(short, long, default_value = "latest")]
    pub block_id: BlockId,
}

pub async fn get_nonce<P: StarknetProvider>(
    account: &SingleOwnerAccount<P>,
    block_id: BlockId,
) -> Result<NonceResponse, StarknetCommandError> {
    Ok(NonceResponse { nonce: account.get_nonce(block_id).await? })
}
