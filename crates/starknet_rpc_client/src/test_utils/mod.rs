pub mod retry;

use std::env;
use std::fs::read_to_string;
use std::path::Path;
use std::sync::Arc;

use starknet_core::types::{EntryPointsByType, FieldElement, FlattenedSierraClass};

/// Reads a json file from the `resources` directory of the crate.
pub fn read_json_file(path_in_resource_dir: &str) -> serde_json::Value {
    let path = Path::new(&env::var("CARGO_MANIFEST_DIR").unwrap())
        .join("resources")
        .join(path_in_resource_dir);
    let json_str = read_to_string(path.to_str().unwrap()).unwrap();
    serde_json::from_str(&json_str).unwrap()
}

/// A small contract class, good enough for anything that doesn't hash it.
pub fn dummy_contract_class() -> Arc<FlattenedSierraClass> {
    Arc::new(FlattenedSierraClass {
        sierra_program: vec![FieldElement::ONE, FieldElement::TWO],
        contract_class_version: "0.1.0".to_owned(),
        entry_points_by_type: EntryPointsByType {
            constructor: vec![],
            external: vec![],
            l1_handler: vec![],
        },
        abi: "[]".to_owned(),
    })
}
