use std::collections::HashMap;
use std::time::Duration;

use assert_matches::assert_matches;
use mockito::{mock, Matcher};
use pretty_assertions::assert_eq;
use reqwest::StatusCode;
use serde_json::json;

use crate::objects::block_id::{BlockId, BlockTag};
use crate::objects::felt::{ContractAddress, Fee, Felt, Nonce, TransactionHash, TransactionVersion};
use crate::objects::response::{TransactionExecutionStatus, TransactionFinalityStatus};
use crate::objects::transaction::{BroadcastedDeclareTransactionV2, DeclareType};
use crate::test_utils::retry::{get_test_config, MAX_RETRIES};
use crate::test_utils::{dummy_contract_class, read_json_file};
use crate::{ClientError, JsonRpcClient, RetryErrorCode, StarknetError, StarknetProvider};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

fn client() -> JsonRpcClient {
    JsonRpcClient::new(&mockito::server_url(), None, REQUEST_TIMEOUT, get_test_config()).unwrap()
}

fn rpc_result(result: serde_json::Value) -> String {
    json!({"jsonrpc": "2.0", "id": 1, "result": result}).to_string()
}

fn rpc_error(code: i64, message: &str) -> String {
    json!({"jsonrpc": "2.0", "id": 1, "error": {"code": code, "message": message}}).to_string()
}

fn declare_transaction(max_fee: Fee) -> BroadcastedDeclareTransactionV2 {
    BroadcastedDeclareTransactionV2 {
        r#type: DeclareType::Declare,
        sender_address: ContractAddress(Felt::from(0x1234_u64)),
        compiled_class_hash: Default::default(),
        max_fee,
        version: TransactionVersion::TWO,
        signature: vec![Felt::ONE, Felt::TWO],
        nonce: Nonce(Felt::ZERO),
        contract_class: dummy_contract_class(),
    }
}

#[tokio::test]
async fn request_with_retry_max_retries_reached() {
    let client = client();
    for (status_code, error_code) in [
        (StatusCode::TEMPORARY_REDIRECT, RetryErrorCode::Redirect),
        (StatusCode::REQUEST_TIMEOUT, RetryErrorCode::Timeout),
        (StatusCode::TOO_MANY_REQUESTS, RetryErrorCode::TooManyRequests),
        (StatusCode::SERVICE_UNAVAILABLE, RetryErrorCode::ServiceUnavailable),
        (StatusCode::GATEWAY_TIMEOUT, RetryErrorCode::Timeout),
    ] {
        let mock = mock("POST", "/")
            .with_status(status_code.as_u16().into())
            .expect(MAX_RETRIES + 1)
            .create();
        let result = client.chain_id().await;
        assert_matches!(
            result, Err(ClientError::RetryError { code, message: _ }) if code == error_code
        );
        mock.assert();
    }
}

#[tokio::test]
async fn bad_status_is_not_retried() {
    let mock = mock("POST", "/").with_status(404).with_body("Not found").expect(1).create();
    let result = client().chain_id().await;
    assert_matches!(
        result,
        Err(ClientError::BadResponseStatus { code: StatusCode::NOT_FOUND, message }) if message == "Not found"
    );
    mock.assert();
}

#[tokio::test]
async fn chain_id() {
    let mock = mock("POST", "/")
        .match_header("content-type", "application/json")
        .match_body(Matcher::PartialJson(json!({"jsonrpc": "2.0", "method": "starknet_chainId"})))
        .with_status(200)
        .with_body(rpc_result(json!("0x534e5f474f45524c49")))
        .create();
    let chain_id = client().chain_id().await.unwrap();
    assert_eq!(chain_id.as_short_string().unwrap(), "SN_GOERLI");
    mock.assert();
}

#[tokio::test]
async fn get_nonce() {
    let mock = mock("POST", "/")
        .match_body(Matcher::PartialJson(json!({
            "method": "starknet_getNonce",
            "params": {"block_id": "pending", "contract_address": "0x1234"},
        })))
        .with_status(200)
        .with_body(rpc_result(json!("0x7")))
        .create();
    let nonce = client()
        .get_nonce(BlockId::Tag(BlockTag::Pending), ContractAddress(Felt::from(0x1234_u64)))
        .await
        .unwrap();
    assert_eq!(nonce, Nonce(Felt::from(7_u64)));
    mock.assert();
}

#[tokio::test]
async fn http_headers_are_sent() {
    let http_headers = HashMap::from([("x-api-key".to_owned(), "secret".to_owned())]);
    let client =
        JsonRpcClient::new(
            &mockito::server_url(),
            Some(http_headers),
            REQUEST_TIMEOUT,
            get_test_config(),
        )
        .unwrap();
    let mock = mock("POST", "/")
        .match_header("x-api-key", "secret")
        .with_status(200)
        .with_body(rpc_result(json!("0x1")))
        .create();
    client.chain_id().await.unwrap();
    mock.assert();
}

#[tokio::test]
async fn estimate_fee() {
    let mock = mock("POST", "/")
        .match_body(Matcher::PartialJson(json!({
            "method": "starknet_estimateFee",
            "params": {"block_id": "latest"},
        })))
        .with_status(200)
        .with_body(rpc_result(json!([read_json_file("fee_estimate.json")])))
        .create();
    let estimates = client()
        .estimate_fee(vec![declare_transaction(Fee::default())], BlockId::Tag(BlockTag::Latest))
        .await
        .unwrap();
    assert_eq!(estimates.len(), 1);
    assert_eq!(estimates[0].overall_fee, "0x618a8c3a2c00".parse().unwrap());
    mock.assert();
}

#[tokio::test]
async fn declare_errors_are_starknet_errors() {
    for (code, message, expected_error) in [
        (54, "Account balance is smaller than max fee", StarknetError::InsufficientAccountBalance),
        (51, "Class already declared", StarknetError::ClassAlreadyDeclared),
        (53, "Max fee is too small", StarknetError::InsufficientMaxFee),
    ] {
        let mock = mock("POST", "/")
            .match_body(Matcher::PartialJson(json!({"method": "starknet_addDeclareTransaction"})))
            .with_status(200)
            .with_body(rpc_error(code, message))
            .expect(1)
            .create();
        let result = client().add_declare_transaction(declare_transaction(Fee(Felt::ONE))).await;
        assert_matches!(result, Err(ClientError::StarknetError(error)) if error == expected_error);
        mock.assert();
    }
}

#[tokio::test]
async fn ok_status_without_json_rpc_body() {
    let mock = mock("POST", "/").with_status(200).with_body("<html></html>").expect(1).create();
    let result = client().chain_id().await;
    assert_matches!(result, Err(ClientError::SerdeError(_)));
    mock.assert();
}

#[tokio::test]
async fn internal_server_error_without_json_rpc_body() {
    let mock = mock("POST", "/").with_status(500).with_body("Internal error").expect(1).create();
    let result = client().chain_id().await;
    assert_matches!(
        result,
        Err(ClientError::BadResponseStatus { code: StatusCode::INTERNAL_SERVER_ERROR, message })
            if message == "Internal error"
    );
    mock.assert();
}

#[tokio::test]
async fn starknet_error_with_internal_server_error_status() {
    let mock = mock("POST", "/")
        .with_status(500)
        .with_body(rpc_error(51, "Class already declared"))
        .expect(1)
        .create();
    let result = client().add_declare_transaction(declare_transaction(Fee(Felt::ONE))).await;
    assert_matches!(result, Err(ClientError::StarknetError(StarknetError::ClassAlreadyDeclared)));
    mock.assert();
}

#[tokio::test]
async fn add_declare_transaction() {
    let mock = mock("POST", "/")
        .match_body(Matcher::PartialJson(json!({
            "method": "starknet_addDeclareTransaction",
            "params": {"declare_transaction": {"sender_address": "0x1234", "version": "0x2"}},
        })))
        .with_status(200)
        .with_body(rpc_result(json!({"transaction_hash": "0xabc", "class_hash": "0xdef"})))
        .create();
    let result =
        client().add_declare_transaction(declare_transaction(Fee(Felt::ONE))).await.unwrap();
    assert_eq!(result.transaction_hash, TransactionHash(Felt::from(0xabc_u64)));
    assert_eq!(result.class_hash.to_string(), "0xdef");
    mock.assert();
}

#[tokio::test]
async fn unknown_error_code() {
    let mock =
        mock("POST", "/").with_status(200).with_body(rpc_error(-32601, "Method not found")).create();
    let result = client().chain_id().await;
    assert_matches!(
        result,
        Err(ClientError::JsonRpcError { code: -32601, message, data: None }) if message == "Method not found"
    );
    mock.assert();
}

#[tokio::test]
async fn transaction_status() {
    let hash = TransactionHash(Felt::from(0xabc_u64));

    {
        let not_found = mock("POST", "/")
            .match_body(Matcher::PartialJson(json!({"method": "starknet_getTransactionStatus"})))
            .with_status(200)
            .with_body(rpc_error(29, "Transaction hash not found"))
            .create();
        assert_eq!(client().get_transaction_status(hash).await.unwrap(), None);
        not_found.assert();
    }

    let accepted = mock("POST", "/")
        .match_body(Matcher::PartialJson(json!({
            "method": "starknet_getTransactionStatus",
            "params": {"transaction_hash": "0xabc"},
        })))
        .with_status(200)
        .with_body(rpc_result(
            json!({"finality_status": "ACCEPTED_ON_L2", "execution_status": "SUCCEEDED"}),
        ))
        .create();
    let status = client().get_transaction_status(hash).await.unwrap().unwrap();
    assert_eq!(status.finality_status, TransactionFinalityStatus::AcceptedOnL2);
    assert_eq!(status.execution_status, Some(TransactionExecutionStatus::Succeeded));
    accepted.assert();
}

#[tokio::test]
async fn transaction_receipt() {
    let mock = mock("POST", "/")
        .match_body(Matcher::PartialJson(json!({"method": "starknet_getTransactionReceipt"})))
        .with_status(200)
        .with_body(rpc_result(read_json_file("transaction_receipt_reverted.json")))
        .create();
    let receipt = client()
        .get_transaction_receipt(TransactionHash(Felt::from(0xabc_u64)))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(receipt.execution_status, TransactionExecutionStatus::Reverted);
    mock.assert();
}
