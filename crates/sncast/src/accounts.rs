//! The accounts file: `{"<network>": {"<account name>": {...}}}`, where the network is the chain id
//! as a short string (e.g. `SN_GOERLI`).

#[cfg(test)]
#[path = "accounts_test.rs"]
mod accounts_test;

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use starknet_rpc_client::objects::felt::{ChainId, ClassHash, ContractAddress, Felt};

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct AccountData {
    pub private_key: Felt,
    pub public_key: Felt,
    pub address: ContractAddress,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salt: Option<Felt>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_hash: Option<ClassHash>,
}

pub type AccountsFile = HashMap<String, HashMap<String, AccountData>>;

#[derive(thiserror::Error, Debug)]
pub enum AccountsError {
    #[error("Failed to read accounts file {path:?}: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("Failed to parse accounts file {path:?}: {source}")]
    Parse { path: PathBuf, source: serde_json::Error },
    #[error("Chain id {0} is not a valid short string")]
    InvalidChainId(ChainId),
    #[error("No accounts defined for network {network} in {path:?}")]
    UnknownNetwork { network: String, path: PathBuf },
    #[error("Account {name} not found under network {network}")]
    AccountNotFound { name: String, network: String },
    #[error("Public key of account {name} doesn't match its private key")]
    PublicKeyMismatch { name: String },
}

/// Loads account `name` of the network of `chain_id` from the accounts file at `path`.
pub fn load_account_data(
    path: &Path,
    name: &str,
    chain_id: &ChainId,
) -> Result<AccountData, AccountsError> {
    let raw_accounts = fs::read_to_string(path)
        .map_err(|source| AccountsError::ReadFile { path: path.to_owned(), source })?;
    let mut accounts: AccountsFile = serde_json::from_str(&raw_accounts)
        .map_err(|source| AccountsError::Parse { path: path.to_owned(), source })?;

    let network = chain_id.as_short_string().ok_or(AccountsError::InvalidChainId(*chain_id))?;
    let mut network_accounts = accounts.remove(&network).ok_or_else(|| {
        AccountsError::UnknownNetwork { network: network.clone(), path: path.to_owned() }
    })?;
    let account = network_accounts
        .remove(name)
        .ok_or_else(|| AccountsError::AccountNotFound { name: name.to_owned(), network })?;

    if starknet_crypto::get_public_key(&account.private_key.0) != account.public_key.0 {
        return Err(AccountsError::PublicKeyMismatch { name: name.to_owned() });
    }
    Ok(account)
}
