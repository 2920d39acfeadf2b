//! sncast declares Cairo contract classes on Starknet through a node's JSON-RPC, and runs
//! declarative scripts that check how the node answers.

pub mod account;
pub mod accounts;
pub mod artifacts;
pub mod cli;
pub mod config;
pub mod errors;
pub mod response;
pub mod script;
pub mod signing;
pub mod starknet_commands;
#[cfg(test)]
mod test_utils;
pub mod wait;
