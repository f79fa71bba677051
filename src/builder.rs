use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use encoding_rs::Encoding;
use tracing::{debug, info};

use crate::codec;
use crate::error::RuleditError;
use crate::loader;
use crate::ops::{self, EditResult, Output};
use crate::rules::Rule;
use crate::settings::Settings;
use crate::types::EditAction;

/// Entry point for building an edit run.
pub struct Ruledit;

impl Ruledit {
    pub fn builder() -> RuleditBuilder {
        RuleditBuilder::new()
    }
}

/// Collects rule sources and settings, then runs an [`EditAction`].
///
/// Rule sources, in declaration order:
///
/// - rule files from [`rules_path()`](Self::rules_path), or from
///   [`Settings::rules`] when no path was given;
/// - rules added in code with [`rule()`](Self::rule), after the file rules.
pub struct RuleditBuilder {
    rule_paths: Vec<PathBuf>,
    inline_rules: Vec<Rule>,
    settings: Option<Settings>,
    report: Option<bool>,
    encoding: Option<String>,
}

impl RuleditBuilder {
    fn new() -> Self {
        Self {
            rule_paths: Vec::new(),
            inline_rules: Vec::new(),
            settings: None,
            report: None,
            encoding: None,
        }
    }

    /// Add a rule file. Explicit files replace `rules` from the settings.
    pub fn rules_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.rule_paths.push(path.into());
        self
    }

    /// Add several rule files, in order.
    pub fn rules_paths(mut self, paths: impl IntoIterator<Item = PathBuf>) -> Self {
        self.rule_paths.extend(paths);
        self
    }

    /// Add a rule built in code.
    pub fn rule(mut self, rule: Rule) -> Self {
        self.inline_rules.push(rule);
        self
    }

    /// Use resolved settings for rule files and reporting defaults.
    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Override `report.stderr` from the settings.
    pub fn report(mut self, enabled: bool) -> Self {
        self.report = Some(enabled);
        self
    }

    /// Read and write documents in this encoding instead of the settings'
    /// `encoding`.
    pub fn encoding(mut self, label: impl Into<String>) -> Self {
        self.encoding = Some(label.into());
        self
    }

    fn effective_encoding(&self) -> Result<&'static Encoding, RuleditError> {
        let label = match (&self.encoding, &self.settings) {
            (Some(label), _) => label.as_str(),
            (None, Some(settings)) => settings.encoding.as_str(),
            (None, None) => codec::DEFAULT_ENCODING,
        };
        codec::encoding_for(label)
    }

    fn effective_rule_paths(&self) -> Vec<PathBuf> {
        if !self.rule_paths.is_empty() {
            return self.rule_paths.clone();
        }
        self.settings
            .as_ref()
            .map(|s| s.rules.clone())
            .unwrap_or_default()
    }

    fn effective_log(&self, requested: Option<&Path>) -> Option<PathBuf> {
        requested
            .map(Path::to_path_buf)
            .or_else(|| self.settings.as_ref()?.report.log_file.clone())
    }

    fn effective_pretty(&self) -> bool {
        self.settings.as_ref().is_none_or(|s| s.report.pretty)
    }

    fn effective_report(&self) -> bool {
        self.report
            .unwrap_or_else(|| self.settings.as_ref().is_none_or(|s| s.report.stderr))
    }

    /// Load every rule source. Having none at all is an error.
    pub fn load_rules(&self) -> Result<Vec<Rule>, RuleditError> {
        let paths = self.effective_rule_paths();
        if paths.is_empty() && self.inline_rules.is_empty() {
            return Err(RuleditError::NoRules);
        }
        let mut rules = loader::load_rules(&paths)?;
        rules.extend(self.inline_rules.iter().cloned());
        debug!(files = paths.len(), rules = rules.len(), "rules loaded");
        Ok(rules)
    }

    /// Handle an [`EditAction`], print its result to stdout and the
    /// modification report to stderr.
    pub fn handle_and_print(self, action: &EditAction) -> Result<(), RuleditError> {
        let report = self.effective_report();
        let encoding = self.effective_encoding();
        let result = self.handle(action)?;

        let rendered = result.to_string();
        let bytes = match &result {
            EditResult::Applied {
                output: Output::Text(_),
                ..
            } => codec::encode(&rendered, encoding?, "stdout")?,
            _ => rendered.into_bytes(),
        };

        let mut stdout = std::io::stdout().lock();
        stdout
            .write_all(&bytes)
            .and_then(|_| stdout.flush())
            .map_err(|source| RuleditError::Stdio {
                action: "write",
                source,
            })?;

        if let EditResult::Applied {
            modifications,
            log: None,
            ..
        } = &result
            && report
        {
            if modifications.is_empty() {
                eprintln!("No modifications applied.");
            }
            for modification in modifications {
                eprintln!("{modification}");
            }
        }
        Ok(())
    }

    /// Handle an [`EditAction`].
    ///
    /// For `Apply`, nothing is written unless the transform, the output
    /// encoding and the log serialization all succeed. The log is written
    /// before the output and removed again if the output cannot be written.
    /// The JSON log goes to the action's `log` path, or to
    /// `report.log_file` from the settings.
    pub fn handle(self, action: &EditAction) -> Result<EditResult, RuleditError> {
        match action {
            EditAction::ListRules => Ok(ops::list_rules(&self.load_rules()?)),
            EditAction::SettingsTemplate => Ok(EditResult::Template(Settings::template())),
            EditAction::Apply { input, output, log } => {
                let encoding = self.effective_encoding()?;
                let rules = self.load_rules()?;
                let text = read_input(input.as_deref(), encoding)?;
                let transformed = ops::transform(&text, &rules)?;

                let encoded = match output {
                    Some(path) => Some(codec::encode(
                        &transformed.text,
                        encoding,
                        &path.display().to_string(),
                    )?),
                    None => None,
                };
                let log = self.effective_log(log.as_deref());
                let json = match &log {
                    Some(_) => Some(ops::modifications_to_json(
                        &transformed.modifications,
                        self.effective_pretty(),
                    )?),
                    None => None,
                };

                if let (Some(path), Some(json)) = (&log, &json) {
                    write_file(path, json.as_bytes())?;
                }
                let output = match (output, encoded) {
                    (Some(path), Some(bytes)) => {
                        if let Err(e) = write_file(path, &bytes) {
                            if let Some(log_path) = &log
                                && std::fs::remove_file(log_path).is_err()
                            {
                                debug!(path = %log_path.display(), "could not remove log");
                            }
                            return Err(e);
                        }
                        Output::Written(path.clone())
                    }
                    _ => Output::Text(transformed.text),
                };

                if transformed.modifications.is_empty() {
                    debug!("no rule matched any section");
                }
                info!(
                    modifications = transformed.modifications.len(),
                    "document rewritten"
                );
                Ok(EditResult::Applied {
                    output,
                    modifications: transformed.modifications,
                    log,
                })
            }
        }
    }
}

fn read_input(path: Option<&Path>, encoding: &'static Encoding) -> Result<String, RuleditError> {
    match path {
        Some(path) => {
            let bytes = std::fs::read(path).map_err(|e| RuleditError::IoError {
                path: path.to_path_buf(),
                source: e,
            })?;
            codec::decode(&bytes, encoding, &path.display().to_string())
        }
        None => {
            let mut bytes = Vec::new();
            std::io::stdin()
                .read_to_end(&mut bytes)
                .map_err(|source| RuleditError::Stdio {
                    action: "read",
                    source,
                })?;
            codec::decode(&bytes, encoding, "stdin")
        }
    }
}

/// Write `content`, creating parent directories as needed.
fn write_file(path: &Path, content: &[u8]) -> Result<(), RuleditError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| RuleditError::IoError {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    std::fs::write(path, content).map_err(|e| RuleditError::IoError {
        path: path.to_path_buf(),
        source: e,
    })
}
