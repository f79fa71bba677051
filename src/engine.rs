//! Apply rules to parsed sections.
//!
//! Rules run in descending priority order. Within one section a key is
//! written by at most one rule, the first matching one in that order, so a
//! lower-priority rule never overwrites what a higher-priority rule wrote.
//! Rules targeting different keys do not interfere.
//!
//! Every section pattern is compiled before any section is touched: a
//! malformed pattern aborts the whole call and leaves the sections as they
//! were.

use std::cmp::Reverse;
use std::collections::HashSet;

use regex::Regex;
use tracing::{debug, info};

use crate::document::Section;
use crate::error::RuleditError;
use crate::rules::Rule;
use crate::types::Modification;

/// Apply `rules` to `sections` in place and return the modification log.
///
/// Records come out in section order, then rule-priority order within a
/// section. The preamble is never touched. Calling this twice on the same
/// sections applies the rules twice; the second pass reports the values the
/// first pass wrote as `previous_value`.
pub fn apply(sections: &mut [Section], rules: &[Rule]) -> Result<Vec<Modification>, RuleditError> {
    let ordered = prioritize(rules)?;
    let mut modifications = Vec::new();

    for section in sections.iter_mut().filter(|s| !s.is_preamble()) {
        let mut modified_keys: HashSet<&str> = HashSet::new();

        for (rule, pattern) in &ordered {
            if !rule.matches_with(pattern, section) {
                continue;
            }
            if modified_keys.contains(rule.action_key.as_str()) {
                debug!(
                    section = %section.name,
                    rule = %rule.name,
                    key = %rule.action_key,
                    "key already written by a higher-priority rule"
                );
                continue;
            }

            let previous_value = write_key(section, &rule.action_key, &rule.action_value)?;
            debug!(
                section = %section.name,
                rule = %rule.name,
                key = %rule.action_key,
                "rule applied"
            );

            modified_keys.insert(&rule.action_key);
            modifications.push(Modification {
                section_name: section.name.clone(),
                rule_name: rule.name.clone(),
                key: rule.action_key.clone(),
                previous_value,
                new_value: rule.action_value.clone(),
            });
        }
    }

    info!(
        sections = sections.len(),
        rules = rules.len(),
        modifications = modifications.len(),
        "rules applied"
    );
    Ok(modifications)
}

/// Stable sort by descending priority, pairing each rule with its pattern.
fn prioritize(rules: &[Rule]) -> Result<Vec<(&Rule, Regex)>, RuleditError> {
    let mut ordered: Vec<&Rule> = rules.iter().collect();
    ordered.sort_by_key(|rule| Reverse(rule.priority));
    ordered
        .into_iter()
        .map(|rule| rule.compile_pattern().map(|pattern| (rule, pattern)))
        .collect()
}

/// Overwrite the first `key` line or append a new one. Returns the value
/// that was replaced, if any.
fn write_key(section: &mut Section, key: &str, value: &str) -> Result<Option<String>, RuleditError> {
    match section.position(key) {
        Some(index) => {
            let line = &mut section.lines[index];
            let previous = line.value().map(str::to_string);
            line.set_value(value)?;
            Ok(previous)
        }
        None => {
            section.append_line(key, value);
            Ok(None)
        }
    }
}
