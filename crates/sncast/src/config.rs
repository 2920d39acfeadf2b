#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::time::Duration;

use cast_config::converters::{
    deserialize_milliseconds_to_duration,
    deserialize_optional_map,
    deserialize_seconds_to_duration,
    duration_as_millis,
    serialize_duration_as_millis,
    serialize_duration_as_seconds,
    serialize_optional_map,
};
use cast_config::dumping::{append_sub_config_name, ser_optional_param, ser_param, SerializeConfig};
use cast_config::validators::{validate_ascii, validate_file_exists};
use cast_config::{ParamPath, SerializedParam};
use itertools::chain;
use serde::{Deserialize, Serialize};
use starknet_rpc_client::RetryConfig;
use url::Url;
use validator::{Validate, ValidationError};

use crate::wait::WaitParams;

/// The path of the default configuration file, provided as part of the repository.
pub const DEFAULT_CONFIG_PATH: &str = "config/default_config.json";

/// The configuration of sncast.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Validate)]
pub struct CastConfig {
    #[validate]
    pub rpc: RpcConfig,
    #[validate]
    pub account: AccountConfig,
    pub artifacts: ArtifactsConfig,
    pub wait: WaitConfig,
    #[validate]
    pub fee: FeeConfig,
}

impl SerializeConfig for CastConfig {
    fn dump(&self) -> BTreeMap<ParamPath, SerializedParam> {
        chain!(
            append_sub_config_name(self.rpc.dump(), "rpc"),
            append_sub_config_name(self.account.dump(), "account"),
            append_sub_config_name(self.artifacts.dump(), "artifacts"),
            append_sub_config_name(self.wait.dump(), "wait"),
            append_sub_config_name(self.fee.dump(), "fee"),
        )
        .collect()
    }
}

/// How to reach the Starknet node.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Validate)]
pub struct RpcConfig {
    #[validate(custom = "validate_url")]
    pub url: String,
    #[serde(deserialize_with = "deserialize_optional_map")]
    pub http_headers: Option<HashMap<String, String>>,
    #[serde(
        deserialize_with = "deserialize_milliseconds_to_duration",
        serialize_with = "serialize_duration_as_millis"
    )]
    pub request_timeout_millis: Duration,
    pub retry_config: RetryConfig,
}

impl Default for RpcConfig {
    fn default() -> Self {
        RpcConfig {
            url: String::from("http://127.0.0.1:5050/rpc"),
            http_headers: None,
            request_timeout_millis: Duration::from_secs(30),
            retry_config: RetryConfig::default(),
        }
    }
}

impl SerializeConfig for RpcConfig {
    fn dump(&self) -> BTreeMap<ParamPath, SerializedParam> {
        let self_params_dump = BTreeMap::from_iter([
            ser_param("url", &self.url, "The URL of the JSON-RPC of a Starknet node."),
            ser_param(
                "http_headers",
                &serialize_optional_map(&self.http_headers),
                "'k1:v1 k2:v2 ...' headers to attach to every request to the node.",
            ),
            ser_param(
                "request_timeout_millis",
                &duration_as_millis(&self.request_timeout_millis),
                "Timeout in milliseconds of a single request to the node.",
            ),
        ]);
        chain!(self_params_dump, append_sub_config_name(self.retry_config.dump(), "retry_config"))
            .collect()
    }
}

fn validate_url(url: &str) -> Result<(), ValidationError> {
    Url::parse(url).map(|_| ()).map_err(|_| ValidationError::new("invalid url"))
}

/// The account that signs and pays for the transactions.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Validate)]
pub struct AccountConfig {
    #[validate(custom = "validate_ascii")]
    pub name: String,
    #[validate(custom = "validate_file_exists")]
    pub accounts_file: PathBuf,
}

impl Default for AccountConfig {
    fn default() -> Self {
        AccountConfig {
            name: String::from("user1"),
            accounts_file: PathBuf::from("accounts/accounts.json"),
        }
    }
}

impl SerializeConfig for AccountConfig {
    fn dump(&self) -> BTreeMap<ParamPath, SerializedParam> {
        BTreeMap::from_iter([
            ser_param("name", &self.name, "The name of the account in the accounts file."),
            ser_param(
                "accounts_file",
                &self.accounts_file,
                "Path to the accounts file, keyed by network and then by account name.",
            ),
        ])
    }
}

/// Where Scarb put the compiled contracts.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct ArtifactsConfig {
    pub target_dir: PathBuf,
    /// Limits the artifacts to the ones of a single package.
    pub package: Option<String>,
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        ArtifactsConfig { target_dir: PathBuf::from("target/dev"), package: None }
    }
}

impl SerializeConfig for ArtifactsConfig {
    fn dump(&self) -> BTreeMap<ParamPath, SerializedParam> {
        chain!(
            [ser_param(
                "target_dir",
                &self.target_dir,
                "The directory of the *.starknet_artifacts.json files Scarb generates.",
            )],
            ser_optional_param(
                &self.package,
                String::new(),
                "package",
                "The package whose contracts are used. If unset, the artifacts of all the \
                 packages in the target directory are merged.",
            ),
        )
        .collect()
    }
}

/// Whether and how long to wait for a transaction to be accepted.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct WaitConfig {
    pub enabled: bool,
    #[serde(
        deserialize_with = "deserialize_seconds_to_duration",
        serialize_with = "serialize_duration_as_seconds"
    )]
    pub timeout: Duration,
    #[serde(
        deserialize_with = "deserialize_seconds_to_duration",
        serialize_with = "serialize_duration_as_seconds"
    )]
    pub retry_interval: Duration,
}

impl Default for WaitConfig {
    fn default() -> Self {
        WaitConfig {
            enabled: false,
            timeout: Duration::from_secs(60),
            retry_interval: Duration::from_secs(5),
        }
    }
}

impl WaitConfig {
    /// The waiting parameters, or `None` if waiting is disabled.
    pub fn params(&self) -> Option<WaitParams> {
        self.enabled
            .then_some(WaitParams { timeout: self.timeout, retry_interval: self.retry_interval })
    }
}

impl SerializeConfig for WaitConfig {
    fn dump(&self) -> BTreeMap<ParamPath, SerializedParam> {
        BTreeMap::from_iter([
            ser_param(
                "enabled",
                &self.enabled,
                "If true, wait until a sent transaction is accepted or rejected.",
            ),
            ser_param(
                "timeout",
                &self.timeout.as_secs(),
                "Maximal time in seconds to wait for a transaction.",
            ),
            ser_param(
                "retry_interval",
                &self.retry_interval.as_secs(),
                "Time in seconds between two queries of the transaction status.",
            ),
        ])
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Validate)]
pub struct FeeConfig {
    /// The max fee of a transaction without an explicit one is its estimated fee times this
    /// percentage.
    #[validate(range(min = 100))]
    pub estimate_multiplier_percent: u64,
}

impl Default for FeeConfig {
    fn default() -> Self {
        FeeConfig { estimate_multiplier_percent: 150 }
    }
}

impl SerializeConfig for FeeConfig {
    fn dump(&self) -> BTreeMap<ParamPath, SerializedParam> {
        BTreeMap::from_iter([ser_param(
            "estimate_multiplier_percent",
            &self.estimate_multiplier_percent,
            "Percentage of the estimated fee to use as max fee, when no max fee is given.",
        )])
    }
}
