//! Rule-driven rewriting of sectioned `key = value` configuration files.
//!
//! Ruledit reads a document made of bracketed sections:
//!
//! ```text
//! ; generated by some tool
//!
//! [TextureOverrideHair]
//! hash = 1a2b3c4d
//! run = CommandListHair
//! ```
//!
//! applies an ordered set of prioritized [`Rule`]s to it, and writes the
//! document back with every untouched line byte for byte as it was. Each
//! change is recorded as a [`Modification`].
//!
//! ```ignore
//! let rules = vec![
//!     Rule::new("hair-alt", "Hair", "run", "CommandListHairAlt").with_priority(10),
//! ];
//! let out = ruledit::transform(&text, &rules)?;
//! for m in &out.modifications {
//!     eprintln!("{m}");
//! }
//! ```
//!
//! # Pipeline
//!
//! ```text
//! text ── parse_sections ──▶ Vec<Section>
//!                              │
//!        rules ── apply ───────┤──▶ Vec<Modification>
//!                              ▼
//!      text ◀── render_sections
//! ```
//!
//! - **Parsing** never fails. A trimmed line that starts with `[` and ends
//!   with `]` opens a section; anything else is a line of the current
//!   section. Lines before the first header go to a headerless preamble
//!   that rules never see.
//! - **Matching**: a rule's `section_pattern` is a regular expression
//!   searched anywhere in the section name (`"Hair"` matches
//!   `TextureOverrideHairIB`). Each condition must find at least one line
//!   with its key whose value passes the condition's [`MatchType`].
//! - **Conflicts** are settled by priority alone. Rules run highest priority
//!   first, ties in declaration order, and within a section each key is
//!   written by the first matching rule only.
//! - **Writing** replaces the first line with the rule's key, regenerating
//!   it as `key = value`, or appends such a line at the end of the section.
//! - **Rendering** reproduces every other line exactly.
//!
//! # Rule files
//!
//! The [`loader`] reads JSON rule files and fills in the defaults
//! (`action_key = "run"`, `priority = 0`, `match_type = "contains"`).
//!
//! # Running edits
//!
//! [`Ruledit::builder()`] gathers rule files, in-code rules, and
//! [`Settings`], then [`handle()`](RuleditBuilder::handle) runs an
//! [`EditAction`]: rewrite a file or stdin, list rules, or print a settings
//! template. With the default `clap` feature, [`EditArgs`] turns a command
//! line into an `EditAction`; the `ruledit` binary is built on it.
//!
//! # Settings
//!
//! `ruledit.toml` in the platform config directory and in the current
//! directory, plus `RULEDIT__*` environment variables, supply default rule
//! files, the document encoding, and reporting options. See the
//! [`settings`] module.
//!
//! # Encodings
//!
//! Documents are UTF-8 unless an encoding label (`windows-1252`,
//! `shift_jis`, ...) is given on the builder, the command line
//! (`--encoding`) or in the settings. Input that is not valid in the chosen
//! encoding is an error, as is output the encoding cannot represent.
//! Rule files are always UTF-8 JSON.
//!
//! # Error handling
//!
//! All fallible operations return [`RuleditError`]. A malformed section
//! pattern aborts the whole run before anything is modified or written.

pub mod document;
pub mod error;
pub mod loader;
pub mod settings;
pub mod types;

mod builder;
#[cfg(feature = "clap")]
mod cli;
mod codec;
mod engine;
mod ops;
mod parse;
mod render;
mod rules;

#[cfg(test)]
mod fixtures;

pub use builder::{Ruledit, RuleditBuilder};
#[cfg(feature = "clap")]
pub use cli::EditArgs;
pub use document::{Line, PREAMBLE, Section};
pub use engine::apply;
pub use error::RuleditError;
pub use ops::{EditResult, Output, Transformed, list_rules, modifications_to_json, transform};
pub use parse::parse_sections;
pub use render::render_sections;
pub use rules::{MatchType, Rule, RuleCondition};
pub use settings::Settings;
pub use types::{EditAction, Modification};
