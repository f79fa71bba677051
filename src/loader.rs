//! JSON rule files.
//!
//! A rule file is either a bare array of rule objects or an object wrapping
//! that array under `"rules"`:
//!
//! ```json
//! [
//!   {
//!     "name": "hair-alt",
//!     "priority": 10,
//!     "section_pattern": "^TextureOverrideHair",
//!     "action_key": "run",
//!     "action_value": "CommandListHairAlt",
//!     "conditions": [{ "key": "hash", "value": "1a2b", "match_type": "startswith" }]
//!   }
//! ]
//! ```
//!
//! Defaults are filled in here, not by the engine: `action_key` falls back
//! to `"run"` (also when empty), `priority` to 0, `match_type` to
//! `"contains"`. Priorities may be written as numbers or numeric strings, and
//! values may be any JSON scalar (`0` is read as `"0"`).
//! Conditions with an empty key or value are dropped.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer};
use tracing::{debug, warn};

use crate::error::RuleditError;
use crate::rules::{MatchType, Rule, RuleCondition};

/// Action key used when a rule does not name one.
pub const DEFAULT_ACTION_KEY: &str = "run";

#[derive(Deserialize)]
#[serde(untagged)]
enum RuleFile {
    List(Vec<serde_json::Value>),
    Wrapped {
        #[serde(default)]
        rules: Vec<serde_json::Value>,
    },
}

#[derive(Deserialize)]
struct RawRule {
    name: String,
    section_pattern: String,
    #[serde(default)]
    action_key: Option<String>,
    #[serde(deserialize_with = "scalar_string")]
    action_value: String,
    #[serde(default, deserialize_with = "number_or_numeric_string")]
    priority: i64,
    #[serde(default)]
    conditions: Vec<RawCondition>,
}

#[derive(Deserialize)]
struct RawCondition {
    #[serde(default)]
    key: String,
    #[serde(default, deserialize_with = "optional_scalar_string")]
    value: String,
    #[serde(default)]
    match_type: Option<String>,
}

/// Accept `5` as well as `"5"`.
fn number_or_numeric_string<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Priority {
        Number(i64),
        Text(String),
    }

    match Priority::deserialize(deserializer)? {
        Priority::Number(n) => Ok(n),
        Priority::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("priority '{s}' is not an integer"))),
    }
}

/// Accept `"0"`, `0`, `0.5` or `true` and keep their JSON text.
fn scalar_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Bool(b) => Ok(b.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a string, number or boolean, got {other}"
        ))),
    }
}

/// Like [`scalar_string`], with `null` read as empty.
fn optional_scalar_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    match value {
        None => Ok(String::new()),
        Some(value) => scalar_string(value).map_err(serde::de::Error::custom),
    }
}

impl RawRule {
    fn into_rule(self) -> Rule {
        let action_key = match self.action_key {
            Some(key) if !key.trim().is_empty() => key,
            _ => DEFAULT_ACTION_KEY.to_string(),
        };

        let conditions = self
            .conditions
            .into_iter()
            .filter_map(|raw| {
                if raw.key.is_empty() || raw.value.is_empty() {
                    warn!(rule = %self.name, key = %raw.key, "dropping condition with empty key or value");
                    return None;
                }
                let match_type = match raw.match_type.as_deref() {
                    None => MatchType::default(),
                    Some(name) => name.parse().unwrap_or_else(|_| {
                        warn!(rule = %self.name, match_type = name, "unknown match type, using contains");
                        MatchType::Contains
                    }),
                };
                Some(RuleCondition {
                    key: raw.key,
                    value: raw.value,
                    match_type,
                })
            })
            .collect();

        Rule {
            priority: self.priority,
            name: self.name,
            section_pattern: self.section_pattern,
            action_key,
            action_value: self.action_value,
            conditions,
        }
    }
}

/// Pure function: decode the rules in `content`. `path` is only used for
/// error messages.
pub fn rules_from_str(content: &str, path: &Path) -> Result<Vec<Rule>, RuleditError> {
    let file: RuleFile = serde_json::from_str(content).map_err(|source| RuleditError::RuleFile {
        path: path.to_path_buf(),
        source,
    })?;
    let entries = match file {
        RuleFile::List(entries) | RuleFile::Wrapped { rules: entries } => entries,
    };

    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            RawRule::deserialize(entry)
                .map(RawRule::into_rule)
                .map_err(|e| RuleditError::InvalidRule {
                    path: path.to_path_buf(),
                    index,
                    reason: e.to_string(),
                })
        })
        .collect()
}

/// I/O wrapper: read and decode one rule file.
pub fn load_rules_from_file(path: &Path) -> Result<Vec<Rule>, RuleditError> {
    let content = std::fs::read_to_string(path).map_err(|e| RuleditError::IoError {
        path: path.to_path_buf(),
        source: e,
    })?;
    let rules = rules_from_str(&content, path)?;
    debug!(path = %path.display(), count = rules.len(), "loaded rule file");
    Ok(rules)
}

/// Load several rule files, concatenated in the order given. Declaration
/// order, and with it the tie-break between equal priorities, spans files.
pub fn load_rules(paths: &[PathBuf]) -> Result<Vec<Rule>, RuleditError> {
    let mut rules = Vec::new();
    for path in paths {
        rules.extend(load_rules_from_file(path)?);
    }
    Ok(rules)
}
