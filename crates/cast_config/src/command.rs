use std::collections::BTreeMap;

use clap::{Arg, ArgMatches};
use serde_json::{json, Value};

use crate::loading::update_config_map;
use crate::{ConfigError, ParamPath, SerializedParam, IS_NONE_MARK};

/// The prefix of the environment variables that can set config params.
pub const ENV_PREFIX: &str = "SNCAST";

/// Builds a command line argument for every scalar param in the config map. Each argument is
/// named after its param path (`--rpc.url`) and can also be set by an environment variable, see
/// [`env_var_name`]. Supports numbers (as `usize`), booleans and strings.
pub fn get_command_args(config_map: &BTreeMap<ParamPath, SerializedParam>) -> Vec<Arg> {
    let mut args_parser = Vec::new();
    for (param_path, serialized_param) in config_map.iter() {
        if param_path.ends_with(IS_NONE_MARK) {
            continue;
        }
        let value_parser = match serialized_param.value {
            Value::Number(_) => clap::value_parser!(usize).into(),
            Value::Bool(_) => clap::value_parser!(bool),
            Value::String(_) => clap::value_parser!(String),
            Value::Array(_) | Value::Object(_) | Value::Null => continue,
        };
        let arg = Arg::new(param_path.to_owned())
            .long(param_path.to_owned())
            .env(env_var_name(param_path))
            .help(serialized_param.description.to_owned())
            .value_parser(value_parser);
        args_parser.push(arg);
    }
    args_parser
}

/// The environment variable of a param: `rpc.url` is read from `SNCAST_RPC__URL`.
pub fn env_var_name(param_path: &str) -> String {
    format!("{ENV_PREFIX}_{}", param_path.replace('.', "__").to_uppercase())
}

/// Updates the config map with the params given on the command line. Matches of arguments that
/// were not created by [`get_command_args`] are ignored.
pub fn update_config_map_by_command_args(
    config_map: &mut BTreeMap<ParamPath, SerializedParam>,
    arg_matches: &ArgMatches,
) -> Result<(), ConfigError> {
    let mut updates = Vec::new();
    for param_path_id in arg_matches.ids() {
        let param_path = param_path_id.as_str();
        let Some(serialized_param) = config_map.get(param_path) else {
            continue;
        };
        if let Some(new_value) = get_arg_by_type(&serialized_param.value, arg_matches, param_path)? {
            updates.push((param_path.to_owned(), new_value));
        }
    }
    for (param_path, new_value) in updates {
        update_config_map(config_map, &param_path, new_value)?;
    }
    Ok(())
}

// Converts a clap match into a json value of the same type as the current value.
fn get_arg_by_type(
    current_value: &Value,
    arg_matches: &ArgMatches,
    param_path: &str,
) -> Result<Option<Value>, ConfigError> {
    Ok(match current_value {
        Value::Number(_) => arg_matches.try_get_one::<usize>(param_path)?.map(|value| json!(value)),
        Value::Bool(_) => arg_matches.try_get_one::<bool>(param_path)?.map(|value| json!(value)),
        Value::String(_) => {
            arg_matches.try_get_one::<String>(param_path)?.map(|value| json!(value))
        }
        _ => None,
    })
}
