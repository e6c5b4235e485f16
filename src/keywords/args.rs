//! Argument-list to parameter-struct conversion
//!
//! The remote transport delivers every argument as a string. This module
//! turns a positional list plus `key=value` option tail into a JSON object
//! according to the keyword's [`ArgSpec`], and provides the flexible
//! deserializers that coerce string-encoded numbers and booleans while
//! the typed parameter structs are populated.

use crate::error::{KeywordError, Result};
use crate::keywords::{ArgSpec, TailMode};
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt::Display;
use std::str::FromStr;

/// Parameter struct for keywords taking no arguments
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct NoParams {}

/// Build the JSON parameter object for one keyword invocation.
///
/// Positional values are zipped with their declared names. Tail elements
/// are split on the first `=` only (values keep embedded `=` characters)
/// and their keys lowercased so option matching is case-insensitive; a
/// pair whose key names one of the positional arguments is ignored, so
/// an option can never replace a positional value. In raw mode the tail
/// is passed through untouched under `"args"`. Unrecognized option keys
/// are dropped silently during deserialization, matching the documented
/// contract.
pub(crate) fn build_params<S: AsRef<str>>(
    name: &str,
    spec: ArgSpec,
    raw_args: &[S],
) -> Result<Value> {
    if raw_args.len() < spec.positional.len() {
        return Err(KeywordError::InvalidArgument(format!(
            "keyword '{}' expects at least {} argument(s), got {}",
            name,
            spec.positional.len(),
            raw_args.len()
        )));
    }

    let mut object = Map::new();
    for (key, value) in spec.positional.iter().zip(raw_args) {
        object.insert(
            (*key).to_string(),
            Value::String(value.as_ref().to_string()),
        );
    }

    let tail = &raw_args[spec.positional.len()..];
    match spec.tail {
        TailMode::None => {
            if !tail.is_empty() {
                return Err(KeywordError::InvalidArgument(format!(
                    "keyword '{}' takes exactly {} argument(s), got {}",
                    name,
                    spec.positional.len(),
                    raw_args.len()
                )));
            }
        }
        TailMode::Options => {
            for option in tail {
                let option = option.as_ref();
                let (key, value) = option.split_once('=').ok_or_else(|| {
                    KeywordError::InvalidArgument(format!(
                        "keyword '{}': option '{}' is not of the form key=value",
                        name, option
                    ))
                })?;
                let key = key.to_ascii_lowercase();
                // A tail pair must never replace a positional value
                if spec.positional.contains(&key.as_str()) {
                    log::debug!(
                        "keyword '{}': ignoring option '{}' shadowing a positional argument",
                        name,
                        key
                    );
                    continue;
                }
                object.insert(key, Value::String(value.to_string()));
            }
        }
        TailMode::Raw => {
            let values: Vec<Value> = tail
                .iter()
                .map(|s| Value::String(s.as_ref().to_string()))
                .collect();
            object.insert("args".to_string(), Value::Array(values));
        }
    }

    Ok(Value::Object(object))
}

/// Deserialize a value that may arrive either in its native JSON type or
/// as a string to be parsed
pub(crate) fn flex<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + Deserialize<'de>,
    T::Err: Display,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flex<T> {
        Typed(T),
        Text(String),
    }

    match Flex::<T>::deserialize(deserializer)? {
        Flex::Typed(value) => Ok(value),
        Flex::Text(text) => text.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// Optional-field variant of [`flex`]; combine with `#[serde(default)]`
pub(crate) fn flex_opt<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + Deserialize<'de>,
    T::Err: Display,
{
    flex(deserializer).map(Some)
}

/// Boolean coercion with the loose remote-caller semantics: the string
/// "true" in any casing is true, every other string is false
pub(crate) fn flex_bool<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flex {
        Typed(bool),
        Text(String),
    }

    Ok(match Flex::deserialize(deserializer)? {
        Flex::Typed(value) => value,
        Flex::Text(text) => text.trim().eq_ignore_ascii_case("true"),
    })
}
