//! Rule model and the section matcher.
//!
//! A [`Rule`] fires on a section when its `section_pattern` is found anywhere
//! in the section name (unanchored regex search, so `"Hair"` matches
//! `TextureOverrideHairIB`) and every [`RuleCondition`] holds. A condition
//! holds when at least one line with the condition's key has a value that
//! passes the condition's [`MatchType`] test. A missing key fails the
//! condition; it is not an error.
//!
//! Defaults such as `action_key = "run"` belong to the loader. Values built
//! here are taken as given.

use std::fmt;
use std::str::FromStr;

use regex::Regex;

use crate::document::Section;
use crate::error::RuleditError;

/// How a condition compares a line value against its operand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum MatchType {
    #[default]
    Contains,
    Equals,
    StartsWith,
    EndsWith,
}

impl MatchType {
    /// Resolve a match-type name. Unrecognized names fall back to
    /// [`MatchType::Contains`]; use [`FromStr`] to detect them.
    pub fn from_name(name: &str) -> Self {
        name.parse().unwrap_or_default()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MatchType::Contains => "contains",
            MatchType::Equals => "equals",
            MatchType::StartsWith => "startswith",
            MatchType::EndsWith => "endswith",
        }
    }

    /// Test `candidate` against `operand`.
    pub fn test(self, candidate: &str, operand: &str) -> bool {
        match self {
            MatchType::Contains => candidate.contains(operand),
            MatchType::Equals => candidate == operand,
            MatchType::StartsWith => candidate.starts_with(operand),
            MatchType::EndsWith => candidate.ends_with(operand),
        }
    }
}

impl FromStr for MatchType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "contains" => Ok(MatchType::Contains),
            "equals" => Ok(MatchType::Equals),
            "startswith" => Ok(MatchType::StartsWith),
            "endswith" => Ok(MatchType::EndsWith),
            other => Err(format!("unknown match type '{other}'")),
        }
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A test on the value of one key inside the candidate section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleCondition {
    pub key: String,
    pub value: String,
    pub match_type: MatchType,
}

impl RuleCondition {
    pub fn new(key: &str, value: &str, match_type: MatchType) -> Self {
        Self {
            key: key.to_string(),
            value: value.to_string(),
            match_type,
        }
    }

    /// Test a single candidate value.
    pub fn matches(&self, candidate: &str) -> bool {
        self.match_type.test(candidate, &self.value)
    }

    /// True when some line keyed `self.key` in `section` passes.
    pub fn holds_in(&self, section: &Section) -> bool {
        section
            .find_lines(&self.key)
            .any(|line| self.matches(line.value().unwrap_or_default()))
    }
}

/// A prioritized pattern-plus-conditions predicate with one key/value write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// Higher runs first. Equal priorities keep declaration order.
    pub priority: i64,
    /// Used in logs and modification records; need not be unique.
    pub name: String,
    pub section_pattern: String,
    pub action_key: String,
    pub action_value: String,
    pub conditions: Vec<RuleCondition>,
}

impl Rule {
    pub fn new(name: &str, section_pattern: &str, action_key: &str, action_value: &str) -> Self {
        Self {
            priority: 0,
            name: name.to_string(),
            section_pattern: section_pattern.to_string(),
            action_key: action_key.to_string(),
            action_value: action_value.to_string(),
            conditions: Vec::new(),
        }
    }

    pub fn with_priority(mut self, priority: i64) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_condition(mut self, condition: RuleCondition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Compile `section_pattern`.
    pub fn compile_pattern(&self) -> Result<Regex, RuleditError> {
        Regex::new(&self.section_pattern).map_err(|source| RuleditError::InvalidPattern {
            rule: self.name.clone(),
            pattern: self.section_pattern.clone(),
            source,
        })
    }

    /// Decide whether this rule applies to `section`.
    ///
    /// Compiles the pattern on every call; the engine compiles once per run
    /// and goes through [`Rule::matches_with`] instead.
    pub fn matches(&self, section: &Section) -> Result<bool, RuleditError> {
        let pattern = self.compile_pattern()?;
        Ok(self.matches_with(&pattern, section))
    }

    /// Like [`Rule::matches`] with an already compiled pattern.
    pub fn matches_with(&self, pattern: &Regex, section: &Section) -> bool {
        if section.is_preamble() || !pattern.is_match(&section.name) {
            return false;
        }
        self.conditions.iter().all(|condition| condition.holds_in(section))
    }
}
