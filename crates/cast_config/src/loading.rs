//! Loads a configuration object, and set values for the fields in the following order of priority:
//! * Command line arguments (or environment variables).
//! * Custom config file.
//! * Default config.

use std::collections::BTreeMap;
use std::fs::File;
use std::mem::discriminant;
use std::ops::IndexMut;
use std::path::Path;

use clap::ArgMatches;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::command::update_config_map_by_command_args;
use crate::{ConfigError, ParamPath, SerializedParam, IS_NONE_MARK};

/// Applies the custom config file and the command line arguments on top of `config_map` and
/// deserializes the result.
pub fn load_and_process_config<T: for<'a> Deserialize<'a>>(
    mut config_map: BTreeMap<ParamPath, SerializedParam>,
    custom_config_path: Option<&Path>,
    arg_matches: &ArgMatches,
) -> Result<T, ConfigError> {
    if let Some(custom_config_path) = custom_config_path {
        update_config_map_by_custom_config(&mut config_map, custom_config_path)?;
    }
    update_config_map_by_command_args(&mut config_map, arg_matches)?;
    load(&config_map)
}

/// Deserializes config from flatten JSON.
/// For an explanation of `for<'a> Deserialize<'a>` see
/// `<https://doc.rust-lang.org/nomicon/hrtb.html>`.
pub fn load<T: for<'a> Deserialize<'a>>(
    config_map: &BTreeMap<ParamPath, SerializedParam>,
) -> Result<T, ConfigError> {
    let mut nested_map = json!({});
    for (param_path, serialized_param) in config_map {
        if is_none_flag(param_path).is_some() {
            continue;
        }
        *entry_at(&mut nested_map, param_path) = serialized_param.value.clone();
    }
    // A param marked as none replaces whatever was written under its path.
    for (param_path, serialized_param) in config_map {
        if let Some(target_param_path) = is_none_flag(param_path) {
            if serialized_param.value == json!(true) {
                *entry_at(&mut nested_map, target_param_path) = Value::Null;
            }
        }
    }
    Ok(serde_json::from_value(nested_map)?)
}

/// Updates the config map by a custom json file of the form `{"param.path": value}`.
pub fn update_config_map_by_custom_config(
    config_map: &mut BTreeMap<ParamPath, SerializedParam>,
    custom_config_path: &Path,
) -> Result<(), ConfigError> {
    let file = File::open(custom_config_path)?;
    let custom_config: Map<String, Value> = serde_json::from_reader(file)?;
    for (param_path, json_value) in custom_config {
        update_config_map(config_map, param_path.as_str(), json_value)?;
    }
    Ok(())
}

/// Sets a new value for an existing param. Setting a value of an optional param also clears its
/// "#is_none" flag.
pub fn update_config_map(
    config_map: &mut BTreeMap<ParamPath, SerializedParam>,
    param_path: &str,
    new_value: Value,
) -> Result<(), ConfigError> {
    let Some(serialized_param) = config_map.get_mut(param_path) else {
        return Err(ConfigError::ParamNotFound { param_path: param_path.to_string() });
    };
    if discriminant(&serialized_param.value) != discriminant(&new_value) {
        return Err(ConfigError::ChangeParamType {
            param_path: param_path.to_string(),
            before: serialized_param.value.to_owned(),
            after: new_value,
        });
    }
    serialized_param.value = new_value;

    if is_none_flag(param_path).is_none() {
        if let Some(flag) = config_map.get_mut(&format!("{param_path}.{IS_NONE_MARK}")) {
            flag.value = json!(false);
        }
    }
    Ok(())
}

// Returns the path of the param that `param_path` flags, if it is an "#is_none" flag.
fn is_none_flag(param_path: &str) -> Option<&str> {
    param_path.strip_suffix(IS_NONE_MARK)?.strip_suffix('.')
}

fn entry_at<'a>(json: &'a mut Value, param_path: &str) -> &'a mut Value {
    param_path.split('.').fold(json, |entry, config_name| entry.index_mut(config_name))
}
