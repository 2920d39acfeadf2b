use anyhow::anyhow;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use starknet_rpc_client::objects::felt::{ClassHash, Felt, Nonce, TransactionHash};

use super::{format_command_result, DeclareResponse, NonceResponse, ScriptResponse};

fn declare_response() -> anyhow::Result<DeclareResponse> {
    Ok(DeclareResponse {
        class_hash: ClassHash(Felt::from(0xabc_u64)),
        transaction_hash: TransactionHash(Felt::from(0x1001_u64)),
    })
}

#[test]
fn human_readable() {
    assert_eq!(
        format_command_result("declare", &declare_response(), false).unwrap(),
        "command: declare\nclass_hash: 0xabc\ntransaction_hash: 0x1001"
    );

    let script = Ok(ScriptResponse { steps_run: 3 });
    assert_eq!(
        format_command_result("script", &script, false).unwrap(),
        "command: script\nsteps_run: 3"
    );
}

#[test]
fn json() {
    let output = format_command_result("declare", &declare_response(), true).unwrap();
    assert_eq!(
        serde_json::from_str::<Value>(&output).unwrap(),
        json!({"command": "declare", "class_hash": "0xabc", "transaction_hash": "0x1001"})
    );

    let nonce = Ok(NonceResponse { nonce: Nonce(Felt::from(7_u64)) });
    let output = format_command_result("nonce", &nonce, true).unwrap();
    assert_eq!(
        serde_json::from_str::<Value>(&output).unwrap(),
        json!({"command": "nonce", "nonce": "0x7"})
    );
}

#[test]
fn errors() {
    let error: anyhow::Result<NonceResponse> =
        Err(anyhow!("Account balance is too small to cover transaction fee"));
    assert_eq!(
        format_command_result("declare", &error, false).unwrap(),
        "command: declare\nerror: Account balance is too small to cover transaction fee"
    );

    let error: anyhow::Result<NonceResponse> = Err(anyhow!("Block was not found"));
    let output = format_command_result("nonce", &error, true).unwrap();
    assert_eq!(
        serde_json::from_str::<Value>(&output).unwrap(),
        json!({"command": "nonce", "error": "Block was not found"})
    );
}
