//! Core clause-set types
//!
//! This module defines the data structures that represent the `when` block of
//! a task definition, along with its decoding shims and diagnostic rendering.

use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// Placeholder used when rendering an absence-marker entry
const NULL_ENTRY: &str = "null";

/// The set of preconditions attached to a task
///
/// Each field is one condition category. An empty category is "not specified"
/// and never blocks a task on its own; a non-empty category holds when any of
/// its entries matches. The set is read-only once decoded, so it can be shared
/// freely between concurrent evaluations.
#[derive(Debug, Clone, Default, Serialize)]
pub struct When {
    /// Shell commands, any of which exiting 0 satisfies the category
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub command: Vec<String>,

    /// Filesystem paths, any of which existing satisfies the category
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exists: Vec<String>,

    /// OS identifiers, any of which matching the host satisfies the category
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub os: Vec<String>,

    /// Environment variable name to accepted values; a `None` entry means the
    /// variable being unset satisfies that entry
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub environment: BTreeMap<String, Vec<Option<String>>>,

    /// Option name to values it must equal one of
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub equal: BTreeMap<String, Vec<String>>,

    /// Option name to values it must differ from one of
    #[serde(rename = "not-equal", skip_serializing_if = "BTreeMap::is_empty")]
    pub not_equal: BTreeMap<String, Vec<String>>,
}

impl When {
    /// Option names this clause set reads through `equal` / `not-equal`
    ///
    /// A scheduler resolves these options before evaluation. Environment,
    /// OS, exists, and command categories reference no options and are
    /// excluded. The result is deduplicated and unordered.
    pub fn dependencies(&self) -> HashSet<String> {
        self.equal
            .keys()
            .chain(self.not_equal.keys())
            .cloned()
            .collect()
    }
}

impl<'de> Deserialize<'de> for When {
    /// Decode a clause set, accepting the deprecated bare-key shorthand
    ///
    /// Decoding walks an order-preserving mapping once, so a bare
    /// `environment` key (or an explicit null) can be told apart from an
    /// explicit empty list: the former becomes a single absence-marker
    /// entry, the latter stays empty.
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error;

        let value = Value::deserialize(deserializer)?;

        let mapping = match value {
            Value::Null => return Ok(When::default()),
            Value::Mapping(mapping) => mapping,
            _ => return Err(D::Error::custom("when clause must be a mapping")),
        };

        let mut when = When::default();

        for (key, value) in &mapping {
            let clause = key
                .as_str()
                .ok_or_else(|| D::Error::custom("clause name must be a string"))?;

            match clause {
                "command" => when.command = string_list(clause, value).map_err(D::Error::custom)?,
                "exists" => when.exists = string_list(clause, value).map_err(D::Error::custom)?,
                "os" => when.os = string_list(clause, value).map_err(D::Error::custom)?,
                "environment" => {
                    when.environment = environment_map(value).map_err(D::Error::custom)?;
                }
                "equal" => when.equal = string_list_map(clause, value).map_err(D::Error::custom)?,
                "not-equal" => {
                    when.not_equal = string_list_map(clause, value).map_err(D::Error::custom)?;
                }
                other => {
                    return Err(D::Error::custom(format!("unknown clause \"{}\"", other)));
                }
            }
        }

        Ok(when)
    }
}

impl fmt::Display for When {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut output = Vec::with_capacity(6);

        if !self.command.is_empty() {
            output.push(format!("command:{}", bracket_list(&self.command)));
        }
        if !self.exists.is_empty() {
            output.push(format!("exists:{}", bracket_list(&self.exists)));
        }
        if !self.os.is_empty() {
            output.push(format!("os:{}", bracket_list(&self.os)));
        }
        if !self.environment.is_empty() {
            output.push(format!(
                "environment:{}",
                sprint_nullable_map(&self.environment)
            ));
        }
        if !self.equal.is_empty() {
            output.push(format!("equal:{}", sprint_map(&self.equal)));
        }
        if !self.not_equal.is_empty() {
            output.push(format!("not-equal:{}", sprint_map(&self.not_equal)));
        }

        write!(f, "When{{{}}}", output.join(","))
    }
}

/// Render a list of strings as `[a,b,c]`
pub(crate) fn bracket_list(items: &[String]) -> String {
    format!("[{}]", items.join(","))
}

/// Render an option-to-values map as `{name:[a,b],...}`
fn sprint_map(map: &BTreeMap<String, Vec<String>>) -> String {
    let entries: Vec<String> = map
        .iter()
        .map(|(name, values)| format!("{}:{}", name, bracket_list(values)))
        .collect();

    format!("{{{}}}", entries.join(","))
}

/// Render an environment map, substituting the placeholder for absence markers
fn sprint_nullable_map(map: &BTreeMap<String, Vec<Option<String>>>) -> String {
    let entries: Vec<String> = map
        .iter()
        .map(|(name, values)| {
            let rendered: Vec<&str> = values
                .iter()
                .map(|value| value.as_deref().unwrap_or(NULL_ENTRY))
                .collect();
            format!("{}:[{}]", name, rendered.join(","))
        })
        .collect();

    format!("{{{}}}", entries.join(","))
}

/// Decode a `<string | [string]>` position into a list
fn string_list(clause: &str, value: &Value) -> std::result::Result<Vec<String>, String> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::String(s) => Ok(vec![s.clone()]),
        Value::Sequence(items) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| format!("{} entries must be strings", clause))
            })
            .collect(),
        _ => Err(format!("{} must be a string or a list of strings", clause)),
    }
}

/// Decode a `<string | [string] | null>` environment entry
fn nullable_string_list(value: &Value) -> std::result::Result<Vec<Option<String>>, String> {
    match value {
        // A bare key decodes as null: the variable being unset is accepted
        Value::Null => Ok(vec![None]),
        Value::String(s) => Ok(vec![Some(s.clone())]),
        Value::Sequence(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => Ok(None),
                Value::String(s) => Ok(Some(s.clone())),
                _ => Err("environment entries must be strings or null".to_string()),
            })
            .collect(),
        _ => Err("environment values must be a string, a list, or null".to_string()),
    }
}

/// Decode the `environment` clause mapping
fn environment_map(
    value: &Value,
) -> std::result::Result<BTreeMap<String, Vec<Option<String>>>, String> {
    match value {
        Value::Null => Ok(BTreeMap::new()),
        Value::Mapping(entries) => {
            let mut map = BTreeMap::new();
            for (key, value) in entries {
                let name = key
                    .as_str()
                    .ok_or_else(|| format!("invalid environment variable name {:?}", key))?;
                map.insert(name.to_string(), nullable_string_list(value)?);
            }
            Ok(map)
        }
        _ => Err("environment must be a mapping".to_string()),
    }
}

/// Decode an `equal` / `not-equal` clause mapping
fn string_list_map(
    clause: &str,
    value: &Value,
) -> std::result::Result<BTreeMap<String, Vec<String>>, String> {
    match value {
        Value::Null => Ok(BTreeMap::new()),
        Value::Mapping(entries) => {
            let mut map = BTreeMap::new();
            for (key, value) in entries {
                let name = key
                    .as_str()
                    .ok_or_else(|| format!("invalid option name {:?} in {}", key, clause))?;
                map.insert(name.to_string(), string_list(clause, value)?);
            }
            Ok(map)
        }
        _ => Err(format!("{} must be a mapping of option names to values", clause)),
    }
}
