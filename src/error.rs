use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuleditError {
    #[error("Rule '{rule}' has an invalid section pattern '{pattern}': {source}")]
    InvalidPattern {
        rule: String,
        pattern: String,
        source: regex::Error,
    },

    #[error("Cannot update a value on a line without a key: {line:?}")]
    NotKeyValueLine { line: String },

    #[error("Failed to parse rule file {path}: {source}")]
    RuleFile {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid rule #{index} in {path}: {reason}")]
    InvalidRule {
        path: PathBuf,
        index: usize,
        reason: String,
    },

    #[error("No rule files configured. Pass --rules or set `rules` in ruledit.toml")]
    NoRules,

    #[error("Unknown key '{key}' in {path} (line {line})")]
    UnknownKey {
        key: String,
        path: PathBuf,
        line: usize,
    },

    #[error("Unknown keys in settings file")]
    UnknownKeys(Vec<RuleditError>),

    #[error("Failed to parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to read {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Unknown text encoding '{label}'")]
    UnknownEncoding { label: String },

    #[error("{origin} is not valid {encoding} text")]
    Decode {
        origin: String,
        encoding: &'static str,
    },

    #[error("Cannot write {target} as {encoding}: it has characters the encoding lacks")]
    Encode {
        target: String,
        encoding: &'static str,
    },

    #[error("Failed to {action} standard streams: {source}")]
    Stdio {
        action: &'static str,
        source: std::io::Error,
    },

    #[error("Settings error: {0}")]
    ConfigError(#[from] confique::Error),

    #[error("Invalid value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },
}
