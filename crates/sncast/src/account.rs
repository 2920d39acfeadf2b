#[cfg(test)]
#[path = "account_test.rs"]
mod account_test;

use std::path::Path;

use anyhow::Context;
use starknet_core::types::FieldElement;
use starknet_rpc_client::objects::block_id::{BlockId, BlockTag};
use starknet_rpc_client::objects::felt::{
    ChainId,
    ContractAddress,
    Fee,
    Felt,
    Nonce,
    TransactionVersion,
};
use starknet_rpc_client::objects::response::{DeclareTransactionResult, FeeEstimate};
use starknet_rpc_client::objects::transaction::{BroadcastedDeclareTransactionV2, DeclareType};
use starknet_rpc_client::{ClientError, ClientResult, StarknetProvider};
use tracing::debug;

use crate::accounts::load_account_data;
use crate::artifacts::DeclarableClass;
use crate::signing::{
    declare_v2_transaction_hash,
    sign_transaction_hash,
    DeclareHashInput,
    SigningError,
};

#[derive(thiserror::Error, Debug)]
pub enum AccountError {
    #[error(transparent)]
    Provider(#[from] ClientError),
    #[error(transparent)]
    Signing(#[from] SigningError),
    #[error("The node returned no fee estimate.")]
    MissingFeeEstimate,
    #[error("Estimated fee {estimated_fee} times {multiplier_percent}% does not fit in 128 bits.")]
    FeeOverflow { estimated_fee: Felt, multiplier_percent: u64 },
}

/// An account contract controlled by a single private key.
pub struct SingleOwnerAccount<P> {
    provider: P,
    address: ContractAddress,
    private_key: FieldElement,
    chain_id: ChainId,
}

impl<P: StarknetProvider> SingleOwnerAccount<P> {
    pub fn new(
        provider: P,
        address: ContractAddress,
        private_key: FieldElement,
        chain_id: ChainId,
    ) -> Self {
        SingleOwnerAccount { provider, address, private_key, chain_id }
    }

    /// Connects to the account `name` of the accounts file, on the chain of `provider`.
    pub async fn from_accounts_file(
        provider: P,
        accounts_file: &Path,
        name: &str,
    ) -> anyhow::Result<Self> {
        let chain_id = provider.chain_id().await.context("Failed to get the chain id")?;
        let account_data = load_account_data(accounts_file, name, &chain_id)?;
        Ok(Self::new(provider, account_data.address, account_data.private_key.0, chain_id))
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn address(&self) -> ContractAddress {
        self.address
    }

    pub fn chain_id(&self) -> ChainId {
        self.chain_id
    }

    pub async fn get_nonce(&self, block_id: BlockId) -> ClientResult<Nonce> {
        self.provider.get_nonce(block_id, self.address).await
    }

    /// Builds a signed declare v2 transaction. A query transaction can only be used for fee
    /// estimation.
    pub fn prepare_declare(
        &self,
        class: &DeclarableClass,
        nonce: Nonce,
        max_fee: Fee,
        query: bool,
    ) -> Result<BroadcastedDeclareTransactionV2, SigningError> {
        let version =
            if query { TransactionVersion::query_two() } else { TransactionVersion::TWO };
        let transaction_hash = declare_v2_transaction_hash(&DeclareHashInput {
            version,
            sender_address: self.address,
            class_hash: class.class_hash,
            max_fee,
            chain_id: self.chain_id,
            nonce,
            compiled_class_hash: class.compiled_class_hash,
        });
        debug!("Declare transaction hash: {transaction_hash}.");
        Ok(BroadcastedDeclareTransactionV2 {
            r#type: DeclareType::Declare,
            sender_address: self.address,
            compiled_class_hash: class.compiled_class_hash,
            max_fee,
            version,
            signature: sign_transaction_hash(&self.private_key, transaction_hash)?,
            nonce,
            contract_class: class.contract_class.clone(),
        })
    }

    /// Estimates the fee of declaring `class` at the pending block.
    pub async fn estimate_declare_fee(
        &self,
        class: &DeclarableClass,
        nonce: Nonce,
    ) -> Result<FeeEstimate, AccountError> {
        let query_transaction = self.prepare_declare(class, nonce, Fee::default(), true)?;
        self.provider
            .estimate_fee(vec![query_transaction], BlockId::Tag(BlockTag::Pending))
            .await?
            .into_iter()
            .next()
            .ok_or(AccountError::MissingFeeEstimate)
    }

    /// Returns the max fee to declare `class` with: its estimated fee, scaled by
    /// `multiplier_percent`.
    pub async fn declare_max_fee(
        &self,
        class: &DeclarableClass,
        nonce: Nonce,
        multiplier_percent: u64,
    ) -> Result<Fee, AccountError> {
        let estimated_fee = self.estimate_declare_fee(class, nonce).await?.overall_fee;
        let overflow = || AccountError::FeeOverflow { estimated_fee, multiplier_percent };
        let max_fee = estimated_fee
            .to_u128()
            .and_then(|fee| fee.checked_mul(u128::from(multiplier_percent)))
            .ok_or_else(overflow)?
            / 100;
        debug!("Estimated fee {estimated_fee}, using max fee {max_fee}.");
        Ok(Fee(Felt::from(max_fee)))
    }

    pub async fn declare(
        &self,
        class: &DeclarableClass,
        nonce: Nonce,
        max_fee: Fee,
    ) -> Result<DeclareTransactionResult, AccountError> {
        let transaction = self.prepare_declare(class, nonce, max_fee, false)?;
        Ok(self.provider.add_declare_transaction(transaction).await?)
    }
}
