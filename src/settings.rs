//! Layered settings for the `ruledit` tool.
//!
//! Settings come from, lowest priority first:
//!
//! 1. compiled defaults (`#[config(default = ...)]`),
//! 2. `ruledit.toml` in the platform config directory,
//! 3. `ruledit.toml` in the current directory,
//! 4. an explicit settings file, if given,
//! 5. `RULEDIT__*` environment variables (`__` separates nesting levels, so
//!    `RULEDIT__REPORT__STDERR=false` sets `report.stderr`).
//!
//! Every layer is sparse and missing files are skipped. Unknown keys in a
//! settings file are rejected with their line number unless strict mode is
//! off. Resolution itself ([`resolve`]) does no I/O so it can be tested with
//! synthetic input.

use std::path::{Path, PathBuf};

use confique::Config;
use serde::{Deserialize, Serialize};
use toml::{Table, Value};
use tracing::debug;

use crate::error::RuleditError;

pub const SETTINGS_FILE: &str = "ruledit.toml";
pub const ENV_PREFIX: &str = "RULEDIT";

/// Keys whose env-var form is a comma-separated list.
const LIST_KEYS: &[&str] = &["rules"];

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Settings {
    /// Rule files applied when none are given on the command line, in order.
    #[config(default = [])]
    pub rules: Vec<PathBuf>,

    /// Text encoding of input and output documents, as a label such as
    /// "windows-1252" or "shift_jis".
    #[config(default = "utf-8")]
    pub encoding: String,

    /// How modifications are reported.
    #[config(nested)]
    pub report: ReportSettings,
}

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ReportSettings {
    /// Print one line per modification on stderr when no JSON log is written.
    #[config(default = true)]
    pub stderr: bool,

    /// Write the modification log as JSON to this file.
    pub log_file: Option<PathBuf>,

    /// Indent the JSON log.
    #[config(default = true)]
    pub pretty: bool,
}

/// Everything [`resolve`] needs, already read from disk and the environment.
pub struct SettingsInput {
    /// File contents, lowest priority first.
    pub files: Vec<(PathBuf, String)>,
    pub env_vars: Vec<(String, String)>,
    pub strict: bool,
}

impl Settings {
    /// Load from the standard locations, plus `explicit` on top of them.
    pub fn load(explicit: Option<&Path>) -> Result<Self, RuleditError> {
        let mut paths: Vec<PathBuf> = search_dirs()
            .into_iter()
            .map(|dir| dir.join(SETTINGS_FILE))
            .collect();
        let mut files = read_existing(&paths)?;

        if let Some(path) = explicit {
            let content = std::fs::read_to_string(path).map_err(|e| RuleditError::IoError {
                path: path.to_path_buf(),
                source: e,
            })?;
            files.push((path.to_path_buf(), content));
            paths.push(path.to_path_buf());
        }
        debug!(searched = ?paths, found = files.len(), "settings files");

        resolve(SettingsInput {
            files,
            env_vars: std::env::vars().collect(),
            strict: true,
        })
    }

    /// A commented `ruledit.toml` listing every setting and its default.
    pub fn template() -> String {
        confique::toml::template::<Settings>(confique::toml::FormatOptions::default())
    }
}

/// Directories searched for [`SETTINGS_FILE`], lowest priority first.
pub fn search_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    if let Some(proj) = directories::ProjectDirs::from("", "", "ruledit") {
        dirs.push(proj.config_dir().to_path_buf());
    }
    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd);
    }
    dirs
}

/// Read the files that exist. Only real I/O failures are errors.
fn read_existing(paths: &[PathBuf]) -> Result<Vec<(PathBuf, String)>, RuleditError> {
    let mut found = Vec::new();
    for path in paths {
        match std::fs::read_to_string(path) {
            Ok(content) => found.push((path.clone(), content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(RuleditError::IoError {
                    path: path.clone(),
                    source: e,
                });
            }
        }
    }
    Ok(found)
}

/// Merge the layers in `input` and let confique fill in defaults.
pub fn resolve(input: SettingsInput) -> Result<Settings, RuleditError> {
    let mut merged = Table::new();
    for (path, content) in &input.files {
        if input.strict {
            reject_unknown_keys(content, path)?;
        }
        let table: Table = toml::from_str(content).map_err(|e| RuleditError::ParseError {
            path: path.clone(),
            source: e,
        })?;
        merged = deep_merge(merged, table);
    }
    merged = deep_merge(merged, env_to_table(ENV_PREFIX, input.env_vars));

    let layer: <Settings as Config>::Layer =
        Value::Table(merged)
            .try_into()
            .map_err(|e: toml::de::Error| RuleditError::InvalidValue {
                key: "<merged>".into(),
                reason: e.to_string(),
            })?;

    Settings::builder()
        .preloaded(layer)
        .load()
        .map_err(RuleditError::from)
}

/// Overlay `overlay` on `base`; tables merge key by key, anything else is
/// replaced.
fn deep_merge(mut base: Table, overlay: Table) -> Table {
    for (key, value) in overlay {
        let merged = match (base.remove(&key), value) {
            (Some(Value::Table(lower)), Value::Table(upper)) => {
                Value::Table(deep_merge(lower, upper))
            }
            (_, upper) => upper,
        };
        base.insert(key, merged);
    }
    base
}

/// Build a table from `{prefix}__*` variables. Segments are lowercased;
/// values become bools or integers when they parse as such.
fn env_to_table(prefix: &str, vars: impl IntoIterator<Item = (String, String)>) -> Table {
    let needle = format!("{prefix}__");
    let mut table = Table::new();

    for (name, raw) in vars {
        let Some(rest) = name.strip_prefix(&needle) else {
            continue;
        };
        let segments: Vec<String> = rest.split("__").map(str::to_lowercase).collect();
        if segments.iter().any(String::is_empty) {
            continue;
        }
        let dotted = segments.join(".");
        let value = if LIST_KEYS.contains(&dotted.as_str()) {
            Value::Array(
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(|s| Value::String(s.to_string()))
                    .collect(),
            )
        } else {
            scalar(&raw)
        };

        insert_at(&mut table, &segments, value);
    }

    table
}

/// Insert `value` under a key path, creating tables on the way. A scalar
/// already sitting on the path wins over the deeper key.
fn insert_at(table: &mut Table, path: &[String], value: Value) {
    match path {
        [] => {}
        [leaf] => {
            table.insert(leaf.clone(), value);
        }
        [head, rest @ ..] => {
            let sub = table
                .entry(head.clone())
                .or_insert_with(|| Value::Table(Table::new()));
            if let Value::Table(sub) = sub {
                insert_at(sub, rest, value);
            }
        }
    }
}

fn scalar(raw: &str) -> Value {
    if raw.eq_ignore_ascii_case("true") {
        return Value::Boolean(true);
    }
    if raw.eq_ignore_ascii_case("false") {
        return Value::Boolean(false);
    }
    if let Ok(i) = raw.parse::<i64>() {
        return Value::Integer(i);
    }
    Value::String(raw.to_string())
}

/// Fail if `content` has keys [`Settings`] does not know about.
fn reject_unknown_keys(content: &str, path: &Path) -> Result<(), RuleditError> {
    let mut unknown: Vec<String> = Vec::new();
    let deserializer = toml::Deserializer::new(content);
    let _layer: <Settings as Config>::Layer =
        serde_ignored::deserialize(deserializer, |ignored| unknown.push(ignored.to_string()))
            .map_err(|e| RuleditError::ParseError {
                path: path.to_path_buf(),
                source: e,
            })?;

    if unknown.is_empty() {
        return Ok(());
    }
    let errors = unknown
        .into_iter()
        .map(|key| RuleditError::UnknownKey {
            line: key_line(content, &key),
            key,
            path: path.to_path_buf(),
        })
        .collect();
    Err(RuleditError::UnknownKeys(errors))
}

/// Best-effort 1-indexed line of a dotted key; 0 when not found. Tracks
/// `[table]` headers so `report.typo` is only matched under `[report]`.
fn key_line(content: &str, dotted: &str) -> usize {
    let (table, leaf) = match dotted.rsplit_once('.') {
        Some((table, leaf)) => (table, leaf),
        None => ("", dotted),
    };
    let mut current = String::new();

    for (i, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if let Some(header) = trimmed.strip_prefix('[').and_then(|t| t.strip_suffix(']')) {
            current = header.trim().to_string();
            continue;
        }
        if current != table {
            continue;
        }
        if let Some((key, _)) = trimmed.split_once('=')
            && key.trim() == leaf
        {
            return i + 1;
        }
    }
    0
}
