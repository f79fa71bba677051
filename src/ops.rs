//! Edit operations: the pure transform pipeline, rule listing, log
//! serialization, and the result types callers display.

use std::fmt;
use std::path::PathBuf;

use crate::engine;
use crate::error::RuleditError;
use crate::parse::parse_sections;
use crate::render::render_sections;
use crate::rules::Rule;
use crate::types::Modification;

/// A rewritten document and the changes that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Transformed {
    pub text: String,
    pub modifications: Vec<Modification>,
}

/// Where the rewritten document went.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    /// Returned to the caller, usually for stdout.
    Text(String),
    /// Written to this file.
    Written(PathBuf),
}

/// Result of an edit operation. Returned to the caller for display.
#[derive(Debug, Clone, PartialEq)]
pub enum EditResult {
    /// Rules in execution order.
    RuleListing { rules: Vec<Rule> },
    /// A generated settings template.
    Template(String),
    /// A document was rewritten.
    Applied {
        output: Output,
        modifications: Vec<Modification>,
        /// JSON log file, when one was written.
        log: Option<PathBuf>,
    },
}

impl fmt::Display for EditResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditResult::RuleListing { rules } => {
                for rule in rules {
                    writeln!(
                        f,
                        "{:>5} | {} | {} -> {}",
                        rule.priority, rule.name, rule.section_pattern, rule.action_value
                    )?;
                }
                Ok(())
            }
            EditResult::Template(t) => write!(f, "{t}"),
            EditResult::Applied {
                output: Output::Text(text),
                ..
            } => {
                write!(f, "{text}")?;
                if !text.is_empty() && !text.ends_with('\n') {
                    writeln!(f)?;
                }
                Ok(())
            }
            EditResult::Applied {
                output: Output::Written(_),
                ..
            } => Ok(()),
        }
    }
}

/// Parse `text`, apply `rules`, render the result.
///
/// Fails only on a malformed section pattern, in which case nothing is
/// produced.
pub fn transform(text: &str, rules: &[Rule]) -> Result<Transformed, RuleditError> {
    let mut sections = parse_sections(text);
    let modifications = engine::apply(&mut sections, rules)?;
    Ok(Transformed {
        text: render_sections(&sections),
        modifications,
    })
}

/// Rules sorted the way the engine runs them: by descending priority, ties
/// in declaration order.
pub fn list_rules(rules: &[Rule]) -> EditResult {
    let mut rules = rules.to_vec();
    rules.sort_by_key(|rule| std::cmp::Reverse(rule.priority));
    EditResult::RuleListing { rules }
}

/// Serialize a modification log as a JSON array.
pub fn modifications_to_json(
    modifications: &[Modification],
    pretty: bool,
) -> Result<String, RuleditError> {
    let json = if pretty {
        serde_json::to_string_pretty(modifications)
    } else {
        serde_json::to_string(modifications)
    };
    json.map_err(|e| RuleditError::InvalidValue {
        key: "<log>".into(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::{TEXTURE_INI, texture_rules};
    use crate::rules::{MatchType, RuleCondition};

    #[test]
    fn scenario_overwrite() {
        let out = transform("[A]\nfoo = 1\n", &[Rule::new("r1", "A", "foo", "2")]).unwrap();
        assert_eq!(out.text, "[A]\nfoo = 2");
        assert_eq!(out.modifications.len(), 1);
        assert_eq!(out.modifications[0].previous_value.as_deref(), Some("1"));
        assert_eq!(out.modifications[0].new_value, "2");
    }

    #[test]
    fn scenario_append() {
        let out = transform("[A]\nfoo = 1\n", &[Rule::new("r1", "A", "bar", "9")]).unwrap();
        assert_eq!(out.text, "[A]\nfoo = 1\nbar = 9");
        assert_eq!(out.modifications[0].previous_value, None);
    }

    #[test]
    fn scenario_priority() {
        let rules = [
            Rule::new("five", "A", "foo", "5").with_priority(5),
            Rule::new("ten", "A", "foo", "10").with_priority(10),
        ];
        let out = transform("[A]\nfoo = 1\n", &rules).unwrap();
        assert_eq!(out.text, "[A]\nfoo = 10");
        assert_eq!(out.modifications.len(), 1);
    }

    #[test]
    fn scenario_condition() {
        let rule = Rule::new("r1", "A", "foo", "3")
            .with_condition(RuleCondition::new("foo", "1", MatchType::Equals));
        let out = transform("[A]\nfoo = 2\n", &[rule]).unwrap();
        assert!(out.modifications.is_empty());
        assert_eq!(out.text, "[A]\nfoo = 2");
    }

    #[test]
    fn scenario_preamble() {
        let text = "; generated\n; do not edit\n[A]\nfoo = 1";
        let out = transform(text, &[Rule::new("all", ".*", "foo", "2")]).unwrap();
        assert!(out.text.starts_with("; generated\n; do not edit\n[A]"));
        assert_eq!(out.modifications.len(), 1);
        assert_eq!(out.modifications[0].section_name, "A");
    }

    #[test]
    fn transform_without_rules_round_trips() {
        let text = TEXTURE_INI.trim_end_matches('\n');
        let out = transform(text, &[]).unwrap();
        assert_eq!(out.text, text);
    }

    #[test]
    fn transform_rejects_bad_pattern() {
        let result = transform("[A]", &[Rule::new("bad", "[", "run", "x")]);
        assert!(matches!(result, Err(RuleditError::InvalidPattern { .. })));
    }

    #[test]
    fn listing_is_priority_sorted_and_stable() {
        let rules = vec![
            Rule::new("a", "A", "run", "1"),
            Rule::new("b", "B", "run", "2").with_priority(3),
            Rule::new("c", "C", "run", "3"),
        ];
        let result = list_rules(&rules);
        assert_eq!(
            result.to_string(),
            "    3 | b | B -> 2\n    0 | a | A -> 1\n    0 | c | C -> 3\n"
        );
    }

    #[test]
    fn applied_text_gets_trailing_newline() {
        let result = EditResult::Applied {
            output: Output::Text("[A]\nfoo = 2".into()),
            modifications: vec![],
            log: None,
        };
        assert_eq!(result.to_string(), "[A]\nfoo = 2\n");
    }

    #[test]
    fn applied_empty_text_stays_empty() {
        let result = EditResult::Applied {
            output: Output::Text(String::new()),
            modifications: vec![],
            log: None,
        };
        assert_eq!(result.to_string(), "");
    }

    #[test]
    fn written_output_displays_nothing() {
        let result = EditResult::Applied {
            output: Output::Written("out.ini".into()),
            modifications: vec![],
            log: None,
        };
        assert_eq!(result.to_string(), "");
    }

    #[test]
    fn log_json_shape() {
        let out = transform(TEXTURE_INI, &texture_rules()).unwrap();
        let json = modifications_to_json(&out.modifications, false).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let entries = value.as_array().unwrap();
        assert_eq!(entries.len(), out.modifications.len());
        assert_eq!(entries[0]["section"], "TextureOverrideHair");
        assert_eq!(entries[0]["rule"], "hair-alt");
        assert_eq!(entries[0]["previous_value"], "CommandListHair");
    }

    #[test]
    fn pretty_log_is_indented() {
        let out = transform("[A]", &[Rule::new("r", "A", "k", "v")]).unwrap();
        let json = modifications_to_json(&out.modifications, true).unwrap();
        assert!(json.contains("\n  {"));
    }
}
