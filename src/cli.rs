//! Clap adapter for ruledit.
//!
//! Compiled only with the `clap` Cargo feature (on by default). [`EditArgs`]
//! is a clap derive struct you can flatten into your own parser, or use as
//! the whole command line as the `ruledit` binary does. The only bridge to
//! the core is [`EditArgs::into_action()`]; everything after that goes
//! through the clap-free [`RuleditBuilder`](crate::RuleditBuilder).

use std::path::PathBuf;

use clap::Args;

use crate::types::EditAction;

/// Arguments for applying prioritized rules to a sectioned config file.
#[derive(Debug, Args)]
pub struct EditArgs {
    /// Input file. Reads stdin when omitted.
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output file. Writes to stdout when omitted.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// JSON rule file. Repeat to load several files in order.
    #[arg(short, long = "rules", value_name = "FILE")]
    pub rules: Vec<PathBuf>,

    /// Write a JSON log of every modification to this file.
    #[arg(long, value_name = "FILE")]
    pub log: Option<PathBuf>,

    /// List the loaded rules in execution order and exit.
    #[arg(long, conflicts_with_all = ["input", "output", "log"])]
    pub list_rules: bool,

    /// Print a commented ruledit.toml with every default and exit.
    #[arg(long, conflicts_with_all = ["input", "output", "log", "list_rules"])]
    pub settings_template: bool,

    /// Do not report modifications on stderr.
    #[arg(long)]
    pub no_report: bool,

    /// Text encoding of the input and output, e.g. windows-1252 or shift_jis.
    /// Defaults to the settings' `encoding`, or utf-8.
    #[arg(long, value_name = "LABEL")]
    pub encoding: Option<String>,

    /// Settings file read on top of the standard locations.
    #[arg(long, value_name = "FILE")]
    pub settings: Option<PathBuf>,
}

impl EditArgs {
    /// Convert clap-parsed args into a framework-agnostic [`EditAction`].
    ///
    /// Rule paths, `--encoding`, `--no-report` and `--settings` configure
    /// the builder
    /// rather than the action; read them from the struct before calling
    /// this.
    pub fn into_action(self) -> EditAction {
        if self.settings_template {
            return EditAction::SettingsTemplate;
        }
        if self.list_rules {
            return EditAction::ListRules;
        }
        EditAction::Apply {
            input: self.input,
            output: self.output,
            log: self.log,
        }
    }
}
