//! Client implementation for the [`Starknet`] JSON-RPC, covering what is needed in order to declare
//! contract classes and follow the resulting transactions.
//!
//! [`Starknet`]: https://starknet.io/

pub mod objects;
pub mod retry;
pub mod starknet_error;
#[cfg(test)]
#[path = "starknet_client_test.rs"]
mod starknet_client_test;
#[cfg(test)]
mod test_utils;

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
#[cfg(any(feature = "testing", test))]
use mockall::automock;
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, instrument, trace};
use url::Url;

use crate::objects::block_id::BlockId;
use crate::objects::felt::{ChainId, ContractAddress, Nonce, TransactionHash};
use crate::objects::response::{
    DeclareTransactionResult,
    FeeEstimate,
    TransactionReceipt,
    TransactionStatus,
};
use crate::objects::transaction::BroadcastedDeclareTransactionV2;
use crate::retry::Retry;
pub use crate::retry::RetryConfig;
pub use crate::starknet_error::StarknetError;

/// A [`Result`] in which the error is a [`ClientError`].
pub type ClientResult<T> = Result<T, ClientError>;

const JSON_RPC_VERSION: &str = "2.0";

/// Methods for talking to a Starknet node.
#[cfg_attr(any(test, feature = "testing"), automock)]
#[async_trait]
pub trait StarknetProvider: Send + Sync {
    /// Returns the chain the node is following.
    async fn chain_id(&self) -> ClientResult<ChainId>;
    /// Returns the nonce of `contract_address` at `block_id`.
    async fn get_nonce(
        &self,
        block_id: BlockId,
        contract_address: ContractAddress,
    ) -> ClientResult<Nonce>;
    /// Estimates the fee of each of the given transactions, executed one after the other on top of
    /// `block_id`.
    async fn estimate_fee(
        &self,
        transactions: Vec<BroadcastedDeclareTransactionV2>,
        block_id: BlockId,
    ) -> ClientResult<Vec<FeeEstimate>>;
    /// Submits a declare transaction.
    async fn add_declare_transaction(
        &self,
        transaction: BroadcastedDeclareTransactionV2,
    ) -> ClientResult<DeclareTransactionResult>;
    /// Returns the status of a transaction, or [`None`] if the node doesn't know it.
    async fn get_transaction_status(
        &self,
        transaction_hash: TransactionHash,
    ) -> ClientResult<Option<TransactionStatus>>;
    /// Returns the receipt of a transaction, or [`None`] if the node doesn't know it.
    async fn get_transaction_receipt(
        &self,
        transaction_hash: TransactionHash,
    ) -> ClientResult<Option<TransactionReceipt>>;
}

/// Errors that might be encountered while creating the client.
#[derive(thiserror::Error, Debug)]
pub enum ClientCreationError {
    #[error(transparent)]
    BadUrl(#[from] url::ParseError),
    #[error(transparent)]
    BuildError(#[from] reqwest::Error),
    #[error(transparent)]
    HttpHeaderError(#[from] http::Error),
}

/// Errors that might be solved by retrying mechanism.
#[derive(Debug, Eq, PartialEq)]
pub enum RetryErrorCode {
    Redirect,
    Timeout,
    TooManyRequests,
    ServiceUnavailable,
    Disconnect,
}

/// Errors that may be returned by the client.
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    /// A client error representing bad status http responses.
    #[error("Bad response status code: {:?} message: {:?}.", code, message)]
    BadResponseStatus { code: StatusCode, message: String },
    /// A client error representing http request errors.
    #[error(transparent)]
    RequestError(#[from] reqwest::Error),
    /// A client error representing errors that might be solved by retrying mechanism.
    #[error("Retry error code: {:?}, message: {:?}.", code, message)]
    RetryError { code: RetryErrorCode, message: String },
    /// A client error representing deserialisation errors.
    #[error(transparent)]
    SerdeError(#[from] serde_json::Error),
    /// An error the node returned with a known Starknet error code.
    #[error(transparent)]
    StarknetError(#[from] StarknetError),
    /// An error the node returned with a code that isn't a Starknet error.
    #[error("JSON-RPC error {code}: {message}.")]
    JsonRpcError { code: i64, message: String, data: Option<Value> },
}

#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<JsonRpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcErrorObject {
    code: i64,
    message: String,
    #[serde(default)]
    data: Option<Value>,
}

impl From<JsonRpcErrorObject> for ClientError {
    fn from(error: JsonRpcErrorObject) -> Self {
        match StarknetError::from_rpc_error(error.code, &error.message, error.data.as_ref()) {
            Some(starknet_error) => ClientError::StarknetError(starknet_error),
            None => ClientError::JsonRpcError {
                code: error.code,
                message: error.message,
                data: error.data,
            },
        }
    }
}

/// A client for the JSON-RPC of a Starknet node.
pub struct JsonRpcClient {
    url: Url,
    http_headers: HeaderMap,
    internal_client: Client,
    retry_config: RetryConfig,
    next_request_id: AtomicU64,
}

impl JsonRpcClient {
    /// Creates a new client for the node at `url_str`. Each HTTP request is given up after
    /// `request_timeout`, and then retried according to `retry_config`.
    pub fn new(
        url_str: &str,
        http_headers: Option<HashMap<String, String>>,
        request_timeout: Duration,
        retry_config: RetryConfig,
    ) -> Result<Self, ClientCreationError> {
        let header_map = match http_headers {
            Some(inner) => (&inner).try_into()?,
            None => HeaderMap::new(),
        };
        Ok(JsonRpcClient {
            url: Url::parse(url_str)?,
            http_headers: header_map,
            internal_client: Client::builder().timeout(request_timeout).build()?,
            retry_config,
            next_request_id: AtomicU64::new(1),
        })
    }

    fn get_retry_error_code(err: &ClientError) -> Option<RetryErrorCode> {
        match err {
            ClientError::BadResponseStatus { code, message: _ } => match *code {
                StatusCode::TEMPORARY_REDIRECT => Some(RetryErrorCode::Redirect),
                StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
                    Some(RetryErrorCode::Timeout)
                }
                StatusCode::TOO_MANY_REQUESTS => Some(RetryErrorCode::TooManyRequests),
                StatusCode::SERVICE_UNAVAILABLE => Some(RetryErrorCode::ServiceUnavailable),
                _ => None,
            },

            ClientError::RequestError(internal_err) => {
                if internal_err.is_timeout() {
                    Some(RetryErrorCode::Timeout)
                } else if internal_err.is_connect() {
                    Some(RetryErrorCode::Disconnect)
                } else if internal_err.is_redirect() {
                    Some(RetryErrorCode::Redirect)
                } else {
                    None
                }
            }

            _ => None,
        }
    }

    fn should_retry(err: &ClientError) -> bool {
        Self::get_retry_error_code(err).is_some()
    }

    async fn request_with_retry(&self, body: String) -> ClientResult<String> {
        Retry::new(&self.retry_config)
            .start_with_condition(|| self.request(body.clone()), Self::should_retry)
            .await
            .map_err(|err| {
                Self::get_retry_error_code(&err)
                    .map(|code| ClientError::RetryError { code, message: err.to_string() })
                    .unwrap_or(err)
            })
    }

    async fn request(&self, body: String) -> ClientResult<String> {
        let res = self
            .internal_client
            .post(self.url.clone())
            .headers(self.http_headers.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await;
        let (code, message) = match res {
            Ok(response) => (response.status(), response.text().await?),
            Err(err) => {
                let msg = err.to_string();
                (err.status().ok_or(err)?, msg)
            }
        };
        match code {
            StatusCode::OK => {
                serde_json::from_str::<JsonRpcResponse>(&message)?;
                Ok(message)
            }
            // Some nodes report JSON-RPC errors with an internal server error status.
            StatusCode::INTERNAL_SERVER_ERROR
                if serde_json::from_str::<JsonRpcResponse>(&message).is_ok() =>
            {
                Ok(message)
            }
            _ => Err(ClientError::BadResponseStatus { code, message }),
        }
    }

    /// Sends a JSON-RPC request and deserializes its result.
    async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> ClientResult<T> {
        let request = JsonRpcRequest {
            jsonrpc: JSON_RPC_VERSION,
            id: self.next_request_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };
        trace!("Sending {method} request {}.", request.id);
        let raw_response = self.request_with_retry(serde_json::to_string(&request)?).await?;
        let response: JsonRpcResponse = serde_json::from_str(&raw_response)?;
        if let Some(error) = response.error {
            debug!("{method} request {} failed with code {}.", request.id, error.code);
            return Err(error.into());
        }
        Ok(serde_json::from_value(response.result.unwrap_or(Value::Null))?)
    }

    /// Like [`JsonRpcClient::call`], but an unknown transaction hash is [`None`].
    async fn call_for_transaction<T: DeserializeOwned>(
        &self,
        method: &str,
        transaction_hash: TransactionHash,
    ) -> ClientResult<Option<T>> {
        match self.call(method, json!({ "transaction_hash": transaction_hash })).await {
            Ok(result) => Ok(Some(result)),
            Err(ClientError::StarknetError(StarknetError::TransactionHashNotFound)) => Ok(None),
            Err(err) => Err(err),
        }
    }
}

#[async_trait]
impl StarknetProvider for JsonRpcClient {
    #[instrument(skip(self), level = "debug")]
    async fn chain_id(&self) -> ClientResult<ChainId> {
        self.call("starknet_chainId", json!([])).await
    }

    #[instrument(skip(self), level = "debug")]
    async fn get_nonce(
        &self,
        block_id: BlockId,
        contract_address: ContractAddress,
    ) -> ClientResult<Nonce> {
        self.call(
            "starknet_getNonce",
            json!({ "block_id": block_id, "contract_address": contract_address }),
        )
        .await
    }

    #[instrument(skip(self, transactions), level = "debug")]
    async fn estimate_fee(
        &self,
        transactions: Vec<BroadcastedDeclareTransactionV2>,
        block_id: BlockId,
    ) -> ClientResult<Vec<FeeEstimate>> {
        self.call("starknet_estimateFee", json!({ "request": transactions, "block_id": block_id }))
            .await
    }

    #[instrument(skip(self, transaction), fields(sender = %transaction.sender_address), level = "debug")]
    async fn add_declare_transaction(
        &self,
        transaction: BroadcastedDeclareTransactionV2,
    ) -> ClientResult<DeclareTransactionResult> {
        self.call("starknet_addDeclareTransaction", json!({ "declare_transaction": transaction }))
            .await
    }

    #[instrument(skip(self), level = "debug")]
    async fn get_transaction_status(
        &self,
        transaction_hash: TransactionHash,
    ) -> ClientResult<Option<TransactionStatus>> {
        self.call_for_transaction("starknet_getTransactionStatus", transaction_hash).await
    }

    #[instrument(skip(self), level = "debug")]
    async fn get_transaction_receipt(
        &self,
        transaction_hash: TransactionHash,
    ) -> ClientResult<Option<TransactionReceipt>> {
        self.call_for_transaction("starknet_getTransactionReceipt", transaction_hash).await
    }
}
