use std::io::Write;

use assert_matches::assert_matches;
use pretty_assertions::assert_eq;
use serde_json::json;
use starknet_core::types::FieldElement;
use starknet_rpc_client::objects::block_id::{BlockId, BlockTag};
use starknet_rpc_client::objects::felt::{ContractAddress, Fee, Felt, Nonce, TransactionVersion};
use starknet_rpc_client::objects::response::FeeEstimate;
use starknet_rpc_client::MockStarknetProvider;
use tempfile::NamedTempFile;

use super::{AccountError, SingleOwnerAccount};
use crate::signing::{declare_v2_transaction_hash, DeclareHashInput};
use crate::test_utils::{
    account,
    dummy_class,
    fake_node,
    goerli,
    ACCOUNT_ADDRESS,
    BALANCE,
    ESTIMATED_FEE,
    PRIVATE_KEY,
};

#[test]
fn prepare_declare_signs_the_transaction() {
    let account = account(MockStarknetProvider::new());
    let class = dummy_class(1);
    let nonce = Nonce(Felt::from(4_u64));
    let max_fee = Fee(Felt::from(99999999999999999_u64));

    let transaction = account.prepare_declare(&class, nonce, max_fee, false).unwrap();
    assert_eq!(transaction.version, TransactionVersion::TWO);
    assert_eq!(transaction.sender_address, account.address());
    assert_eq!(transaction.compiled_class_hash, class.compiled_class_hash);

    let hash = declare_v2_transaction_hash(&DeclareHashInput {
        version: TransactionVersion::TWO,
        sender_address: account.address(),
        class_hash: class.class_hash,
        max_fee,
        chain_id: goerli(),
        nonce,
        compiled_class_hash: class.compiled_class_hash,
    });
    let public_key =
        starknet_crypto::get_public_key(&FieldElement::from_hex_be(PRIVATE_KEY).unwrap());
    let [r, s] = transaction.signature[..] else { panic!("Expected an [r, s] signature.") };
    assert!(starknet_crypto::verify(&public_key, &hash.0, &r.0, &s.0).unwrap());

    let query = account.prepare_declare(&class, nonce, max_fee, true).unwrap();
    assert!(query.is_query());
    assert_ne!(query.signature, transaction.signature);
}

#[tokio::test]
async fn declare_max_fee_scales_the_estimate() {
    let account = account(fake_node(BALANCE));
    let max_fee = account.declare_max_fee(&dummy_class(1), Nonce::default(), 150).await.unwrap();
    assert_eq!(max_fee, Fee(Felt::from(ESTIMATED_FEE * 3 / 2)));
}

#[tokio::test]
async fn declare_max_fee_errors() {
    let mut provider = MockStarknetProvider::new();
    provider.expect_estimate_fee().times(1).returning(|_, _| Ok(vec![]));
    let account = account(provider);
    assert_matches!(
        account.declare_max_fee(&dummy_class(1), Nonce::default(), 150).await,
        Err(AccountError::MissingFeeEstimate)
    );

    let mut provider = MockStarknetProvider::new();
    provider.expect_estimate_fee().times(1).returning(|_, _| {
        let huge_fee = Felt::from(u128::MAX);
        Ok(vec![FeeEstimate { gas_consumed: Felt::ONE, gas_price: huge_fee, overall_fee: huge_fee }])
    });
    let account = SingleOwnerAccount::new(
        provider,
        account_address(),
        FieldElement::from_hex_be(PRIVATE_KEY).unwrap(),
        goerli(),
    );
    assert_matches!(
        account.declare_max_fee(&dummy_class(1), Nonce::default(), 150).await,
        Err(AccountError::FeeOverflow { multiplier_percent: 150, .. })
    );
}

#[tokio::test]
async fn get_nonce_of_the_account() {
    let mut provider = MockStarknetProvider::new();
    provider
        .expect_get_nonce()
        .withf(|block_id, address| {
            *block_id == BlockId::Tag(BlockTag::Latest) && *address == account_address()
        })
        .times(1)
        .returning(|_, _| Ok(Nonce(Felt::from(5_u64))));
    let account = account(provider);
    assert_eq!(
        account.get_nonce(BlockId::Tag(BlockTag::Latest)).await.unwrap(),
        Nonce(Felt::from(5_u64))
    );
}

fn account_address() -> ContractAddress {
    ContractAddress(Felt::from(ACCOUNT_ADDRESS))
}

#[tokio::test]
async fn from_accounts_file() {
    let public_key =
        starknet_crypto::get_public_key(&FieldElement::from_hex_be(PRIVATE_KEY).unwrap());
    let mut file = NamedTempFile::new().unwrap();
    let accounts = json!({
        "SN_GOERLI": {
            "user1": {"private_key": PRIVATE_KEY, "public_key": Felt(public_key), "address": "0x1234"},
        },
    });
    file.write_all(accounts.to_string().as_bytes()).unwrap();

    let account =
        SingleOwnerAccount::from_accounts_file(fake_node(BALANCE), file.path(), "user1")
            .await
            .unwrap();
    assert_eq!(account.address(), account_address());
    assert_eq!(account.chain_id(), goerli());

    let err = SingleOwnerAccount::from_accounts_file(fake_node(BALANCE), file.path(), "user2")
        .await
        .err()
        .unwrap();
    assert_eq!(err.to_string(), "Account user2 not found under network SN_GOERLI");
}
