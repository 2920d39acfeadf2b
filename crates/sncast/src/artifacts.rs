//! Reads the contracts Scarb compiled, as listed in its `*.starknet_artifacts.json` files.

#[cfg(test)]
#[path = "artifacts_test.rs"]
mod artifacts_test;

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use starknet_core::types::contract::{CompiledClass, SierraClass};
use starknet_core::types::FlattenedSierraClass;
use starknet_rpc_client::objects::felt::{ClassHash, CompiledClassHash, Felt};
use tracing::debug;

const ARTIFACTS_FILE_SUFFIX: &str = ".starknet_artifacts.json";
// Scarb test targets get their own artifact files, which are never declared.
const TEST_TARGET_SUFFIXES: [&str; 2] = ["_unittest", "_integrationtest"];

#[derive(Deserialize, Debug, PartialEq, Clone)]
struct StarknetArtifacts {
    version: u32,
    contracts: Vec<StarknetContract>,
}

#[derive(Deserialize, Debug, PartialEq, Clone)]
struct StarknetContract {
    id: String,
    package_name: String,
    contract_name: String,
    artifacts: StarknetContractArtifactPaths,
}

#[derive(Deserialize, Debug, PartialEq, Clone)]
struct StarknetContractArtifactPaths {
    sierra: PathBuf,
    #[serde(default)]
    casm: Option<PathBuf>,
}

/// The compiled code of a contract.
#[derive(Debug, PartialEq, Clone)]
pub struct ContractArtifacts {
    /// Sierra contract class JSON.
    pub sierra: String,
    /// CASM compiled class JSON.
    pub casm: String,
}

/// Everything a declare transaction needs from a contract class.
#[derive(Debug, Clone)]
pub struct DeclarableClass {
    pub contract_class: Arc<FlattenedSierraClass>,
    pub class_hash: ClassHash,
    pub compiled_class_hash: CompiledClassHash,
}

impl ContractArtifacts {
    pub fn declarable_class(&self) -> Result<DeclarableClass> {
        let sierra_class: SierraClass =
            serde_json::from_str(&self.sierra).context("Failed to parse sierra artifact")?;
        let compiled_class: CompiledClass =
            serde_json::from_str(&self.casm).context("Failed to parse casm artifact")?;
        let compiled_class_hash =
            compiled_class.class_hash().context("Failed to compute the compiled class hash")?;
        let contract_class =
            sierra_class.flatten().context("Failed to flatten the sierra contract class")?;
        Ok(DeclarableClass {
            class_hash: ClassHash(Felt(contract_class.class_hash())),
            compiled_class_hash: CompiledClassHash(Felt(compiled_class_hash)),
            contract_class: Arc::new(contract_class),
        })
    }
}

/// A source of the classes that can be declared, by contract name.
pub trait ContractClasses {
    /// Returns `None` if there is no contract named `contract_name`.
    fn declarable_class(&self, contract_name: &str) -> Result<Option<DeclarableClass>>;
}

impl ContractClasses for HashMap<String, ContractArtifacts> {
    fn declarable_class(&self, contract_name: &str) -> Result<Option<DeclarableClass>> {
        self.get(contract_name).map(ContractArtifacts::declarable_class).transpose()
    }
}

impl ContractClasses for HashMap<String, DeclarableClass> {
    fn declarable_class(&self, contract_name: &str) -> Result<Option<DeclarableClass>> {
        Ok(self.get(contract_name).cloned())
    }
}

fn artifacts_for_package(path: &Path) -> Result<StarknetArtifacts> {
    let starknet_artifacts =
        fs::read_to_string(path).with_context(|| format!("Failed to read {path:?} contents"))?;
    let starknet_artifacts: StarknetArtifacts = serde_json::from_str(&starknet_artifacts)
        .with_context(|| {
            format!(
                "Failed to parse {path:?} contents. Make sure you have enabled sierra code \
                 generation in Scarb.toml"
            )
        })?;
    Ok(starknet_artifacts)
}

fn load_contracts_artifacts(
    path: &Path,
    package: Option<&str>,
) -> Result<HashMap<String, ContractArtifacts>> {
    let base_path =
        path.parent().ok_or_else(|| anyhow!("Failed to get the parent directory of {path:?}"))?;
    let starknet_artifacts = artifacts_for_package(path)?;
    debug!(
        "Read {} contracts from {path:?} (format version {}).",
        starknet_artifacts.contracts.len(),
        starknet_artifacts.version
    );

    let mut contracts = HashMap::new();
    for contract in starknet_artifacts.contracts {
        if package.map_or(false, |package| package != contract.package_name) {
            continue;
        }
        let sierra_path = base_path.join(&contract.artifacts.sierra);
        let sierra = fs::read_to_string(&sierra_path)
            .with_context(|| format!("Failed to read {sierra_path:?}"))?;
        let casm_path = contract.artifacts.casm.as_ref().ok_or_else(|| {
            anyhow!(
                "Contract {} ({}) has no casm artifact. Make sure you have enabled casm code \
                 generation in Scarb.toml",
                contract.contract_name,
                contract.id
            )
        })?;
        let casm_path = base_path.join(casm_path);
        let casm = fs::read_to_string(&casm_path)
            .with_context(|| format!("Failed to read {casm_path:?}"))?;
        debug!("Loaded contract {} of package {}.", contract.contract_name, contract.package_name);
        contracts.insert(contract.contract_name, ContractArtifacts { sierra, casm });
    }
    Ok(contracts)
}

fn is_test_target_artifacts(file_name: &str) -> bool {
    file_name
        .strip_suffix(ARTIFACTS_FILE_SUFFIX)
        .map_or(false, |target| TEST_TARGET_SUFFIXES.iter().any(|suffix| target.ends_with(suffix)))
}

/// Loads the contracts Scarb compiled into `target_dir`, keeping only those of `package` if one is
/// given. Artifact files are named after their starknet-contract target, which may differ from
/// the package name, so every file is read. On contract name clashes the file that sorts first
/// wins.
pub fn get_contracts_artifacts(
    target_dir: &Path,
    package: Option<&str>,
) -> Result<HashMap<String, ContractArtifacts>> {
    let mut artifact_files = fs::read_dir(target_dir)
        .with_context(|| format!("Failed to read directory {target_dir:?}"))?
        .map(|entry| entry.map(|entry| entry.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    artifact_files.retain(|path| {
        path.file_name().and_then(|name| name.to_str()).map_or(false, |name| {
            name.ends_with(ARTIFACTS_FILE_SUFFIX) && !is_test_target_artifacts(name)
        })
    });
    artifact_files.sort();

    let mut contracts = HashMap::new();
    for path in artifact_files {
        for (contract_name, artifacts) in load_contracts_artifacts(&path, package)? {
            contracts.entry(contract_name).or_insert(artifacts);
        }
    }
    if let Some(package) = package {
        if contracts.is_empty() {
            return Err(anyhow!("No contracts of package {package} found in {target_dir:?}"));
        }
    }
    Ok(contracts)
}
