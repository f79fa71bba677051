//! `ruledit`: apply prioritized rules to a sectioned config file.
//!
//! ```sh
//! ruledit -i mod.ini -r rules.json -o mod.out.ini
//! ruledit -r base.json -r overrides.json --log changes.json < mod.ini
//! ruledit -r rules.json --list-rules
//! ruledit --encoding windows-1252 -i mod.ini -r rules.json -o mod.out.ini
//! RULEDIT_LOG=ruledit=debug ruledit -i mod.ini -r rules.json
//! ```

use std::process::ExitCode;

use clap::Parser;
use ruledit::{EditArgs, Ruledit, RuleditError, Settings};

/// Apply prioritized rules to sectioned `key = value` files.
#[derive(Parser, Debug)]
#[command(name = "ruledit", version)]
struct Cli {
    #[command(flatten)]
    edit: EditArgs,
}

/// Log to stderr, filtered by `RULEDIT_LOG` (default `ruledit=warn`).
fn init_tracing() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter =
        EnvFilter::try_from_env("RULEDIT_LOG").unwrap_or_else(|_| EnvFilter::new("ruledit=warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

fn run(cli: Cli) -> Result<(), RuleditError> {
    let edit = cli.edit;
    let mut builder = Ruledit::builder().rules_paths(edit.rules.clone());
    if let Some(label) = edit.encoding.clone() {
        builder = builder.encoding(label);
    }
    if edit.no_report {
        builder = builder.report(false);
    }

    let settings_path = edit.settings.clone();
    let action = edit.into_action();
    if action.reads_settings() {
        builder = builder.settings(Settings::load(settings_path.as_deref())?);
    }

    builder.handle_and_print(&action)
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(RuleditError::UnknownKeys(errors)) => {
            for e in errors {
                eprintln!("ruledit: {e}");
            }
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("ruledit: {e}");
            ExitCode::FAILURE
        }
    }
}
