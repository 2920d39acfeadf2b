//! Hashing and signing of declare v2 transactions.

#[cfg(test)]
#[path = "signing_test.rs"]
mod signing_test;

use starknet_core::crypto::{compute_hash_on_elements, ecdsa_sign, EcdsaSignError};
use starknet_core::types::FieldElement;
use starknet_core::utils::cairo_short_string_to_felt;
use starknet_rpc_client::objects::felt::{
    ChainId,
    ClassHash,
    CompiledClassHash,
    ContractAddress,
    Fee,
    Felt,
    Nonce,
    TransactionVersion,
};

/// The fields of a declare v2 transaction that its hash commits to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeclareHashInput {
    pub version: TransactionVersion,
    pub sender_address: ContractAddress,
    pub class_hash: ClassHash,
    pub max_fee: Fee,
    pub chain_id: ChainId,
    pub nonce: Nonce,
    pub compiled_class_hash: CompiledClassHash,
}

#[derive(thiserror::Error, Debug)]
pub enum SigningError {
    #[error(transparent)]
    Ecdsa(#[from] EcdsaSignError),
}

fn declare_prefix() -> FieldElement {
    cairo_short_string_to_felt("declare").expect("'declare' is a valid short string.")
}

/// The hash of a declare v2 transaction:
/// `h("declare", version, sender_address, 0, h(class_hash), max_fee, chain_id, nonce,
/// compiled_class_hash)`, where `h` is the Pedersen hash on elements.
pub fn declare_v2_transaction_hash(input: &DeclareHashInput) -> Felt {
    Felt(compute_hash_on_elements(&[
        declare_prefix(),
        input.version.0 .0,
        input.sender_address.0 .0,
        FieldElement::ZERO,
        compute_hash_on_elements(&[input.class_hash.0 .0]),
        input.max_fee.0 .0,
        input.chain_id.0 .0,
        input.nonce.0 .0,
        input.compiled_class_hash.0 .0,
    ]))
}

/// Signs a transaction hash, returning the `[r, s]` signature the account contract expects.
pub fn sign_transaction_hash(
    private_key: &FieldElement,
    transaction_hash: Felt,
) -> Result<Vec<Felt>, SigningError> {
    let signature = ecdsa_sign(private_key, &transaction_hash.0)?;
    Ok(vec![Felt(signature.r), Felt(signature.s)])
}
