//! What the commands print.

#[cfg(test)]
#[path = "response_test.rs"]
mod response_test;

use itertools::Itertools;
use serde::Serialize;
use serde_json::{Map, Value};
use starknet_rpc_client::objects::felt::{ClassHash, Nonce, TransactionHash};

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeclareResponse {
    pub class_hash: ClassHash,
    pub transaction_hash: TransactionHash,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct NonceResponse {
    pub nonce: Nonce,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptResponse {
    pub steps_run: usize,
}

/// Renders the result of `command` as `key: value` lines, or as a single JSON object.
pub fn format_command_result<T: Serialize>(
    command: &str,
    result: &anyhow::Result<T>,
    json: bool,
) -> anyhow::Result<String> {
    let mut fields = vec![("command".to_owned(), Value::String(command.to_owned()))];
    match result {
        Ok(response) => match serde_json::to_value(response)? {
            Value::Object(response) => fields.extend(response),
            Value::Null => {}
            response => fields.push(("response".to_owned(), response)),
        },
        Err(error) => fields.push(("error".to_owned(), Value::String(format!("{error:#}")))),
    }

    if json {
        return Ok(serde_json::to_string(&fields.into_iter().collect::<Map<_, _>>())?);
    }
    Ok(fields
        .into_iter()
        .map(|(key, value)| match value {
            Value::String(value) => format!("{key}: {value}"),
            value => format!("{key}: {value}"),
        })
        .join("\n"))
}
