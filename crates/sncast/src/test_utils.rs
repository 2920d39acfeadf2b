use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use starknet_core::types::{EntryPointsByType, FieldElement, FlattenedSierraClass};
use starknet_rpc_client::objects::felt::{
    ChainId,
    ClassHash,
    CompiledClassHash,
    ContractAddress,
    Felt,
    Nonce,
    TransactionHash,
};
use starknet_rpc_client::objects::response::{
    DeclareTransactionResult,
    FeeEstimate,
    TransactionExecutionStatus,
    TransactionFinalityStatus,
    TransactionStatus,
};
use starknet_rpc_client::{ClientError, MockStarknetProvider, StarknetError};

use crate::account::SingleOwnerAccount;
use crate::artifacts::DeclarableClass;

pub const PRIVATE_KEY: &str = "0x1800000000300000180000000000030000000000003006001800006600";
pub const ACCOUNT_ADDRESS: u64 = 0x1234;
/// The balance of the account on the fake node, in Wei.
pub const BALANCE: u128 = 1_000_000_000_000_000_000;
pub const ESTIMATED_FEE: u64 = 100_000;

pub fn goerli() -> ChainId {
    ChainId("0x534e5f474f45524c49".parse().unwrap())
}

/// A class that is only good for hashing, its program is `[seed]`.
pub fn dummy_class(seed: u64) -> DeclarableClass {
    let contract_class = FlattenedSierraClass {
        sierra_program: vec![FieldElement::from(seed)],
        contract_class_version: "0.1.0".to_owned(),
        entry_points_by_type: EntryPointsByType {
            constructor: vec![],
            external: vec![],
            l1_handler: vec![],
        },
        abi: "[]".to_owned(),
    };
    DeclarableClass {
        class_hash: ClassHash(Felt(contract_class.class_hash())),
        compiled_class_hash: CompiledClassHash(Felt::from(seed)),
        contract_class: Arc::new(contract_class),
    }
}

pub fn dummy_contracts() -> HashMap<String, DeclarableClass> {
    HashMap::from([("Mapa".to_owned(), dummy_class(1)), ("Mapa2".to_owned(), dummy_class(2))])
}

#[derive(Default)]
struct NodeState {
    nonce: u64,
    declared: Vec<CompiledClassHash>,
}

/// A provider that behaves like a node for a single account holding `balance` Wei: it checks the
/// nonce and the balance of every declare transaction, and refuses to declare a class twice.
pub fn fake_node(balance: u128) -> MockStarknetProvider {
    let state = Arc::new(Mutex::new(NodeState::default()));
    let mut provider = MockStarknetProvider::new();

    provider.expect_chain_id().returning(|| Ok(goerli()));

    let nonce_state = state.clone();
    provider
        .expect_get_nonce()
        .returning(move |_, _| Ok(Nonce(Felt::from(nonce_state.lock().unwrap().nonce))));

    provider.expect_estimate_fee().returning(|transactions, _| {
        Ok(transactions
            .iter()
            .map(|_| FeeEstimate {
                gas_consumed: Felt::from(1000_u64),
                gas_price: Felt::from(ESTIMATED_FEE / 1000),
                overall_fee: Felt::from(ESTIMATED_FEE),
            })
            .collect())
    });

    provider.expect_add_declare_transaction().returning(move |transaction| {
        let mut state = state.lock().unwrap();
        let rejection = if transaction.is_query() {
            Some(StarknetError::UnsupportedTxVersion)
        } else if transaction.nonce != Nonce(Felt::from(state.nonce)) {
            Some(StarknetError::InvalidTransactionNonce)
        } else if transaction.max_fee.0.to_u128().map_or(true, |max_fee| max_fee > balance) {
            Some(StarknetError::InsufficientAccountBalance)
        } else if state.declared.contains(&transaction.compiled_class_hash) {
            Some(StarknetError::ClassAlreadyDeclared)
        } else {
            None
        };
        if let Some(starknet_error) = rejection {
            return Err(ClientError::StarknetError(starknet_error));
        }
        state.declared.push(transaction.compiled_class_hash);
        state.nonce += 1;
        Ok(DeclareTransactionResult {
            transaction_hash: TransactionHash(Felt::from(0x1000 + state.nonce)),
            class_hash: ClassHash(Felt(transaction.contract_class.class_hash())),
        })
    });

    provider.expect_get_transaction_status().returning(|_| {
        Ok(Some(TransactionStatus {
            finality_status: TransactionFinalityStatus::AcceptedOnL2,
            execution_status: Some(TransactionExecutionStatus::Succeeded),
        }))
    });

    provider
}

pub fn account(provider: MockStarknetProvider) -> SingleOwnerAccount<MockStarknetProvider> {
    SingleOwnerAccount::new(
        provider,
        ContractAddress(Felt::from(ACCOUNT_ADDRESS)),
        FieldElement::from_hex_be(PRIVATE_KEY).unwrap(),
        goerli(),
    )
}
