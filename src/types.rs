use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

/// Audit record of one rule writing one key in one section.
///
/// Serializes as `{section, rule, key, previous_value, new_value}`, with
/// `previous_value: null` when the key was appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Modification {
    #[serde(rename = "section")]
    pub section_name: String,
    #[serde(rename = "rule")]
    pub rule_name: String,
    pub key: String,
    pub previous_value: Option<String>,
    pub new_value: String,
}

/// `[<section>] <rule>: <key> <previous|<none>> -> <new>`
impl fmt::Display for Modification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {} {} -> {}",
            self.section_name,
            self.rule_name,
            self.key,
            self.previous_value.as_deref().unwrap_or("<none>"),
            self.new_value
        )
    }
}

/// An edit operation, independent of any CLI framework.
/// The CLI layer converts parsed clap args into this.
#[derive(Debug, Clone, PartialEq)]
pub enum EditAction {
    /// Rewrite a document. `None` input reads stdin, `None` output returns
    /// the text to the caller, `None` log defers to the settings.
    Apply {
        input: Option<PathBuf>,
        output: Option<PathBuf>,
        log: Option<PathBuf>,
    },
    /// Show the loaded rules in execution order.
    ListRules,
    /// Print a commented settings file with every default.
    SettingsTemplate,
}

impl EditAction {
    /// Whether the action depends on the settings files. The template does
    /// not, so it can still be printed when a settings file is broken.
    pub fn reads_settings(&self) -> bool {
        !matches!(self, EditAction::SettingsTemplate)
    }
}
