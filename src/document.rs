//! In-memory model of a sectioned `key = value` document.
//!
//! A document is an ordered list of [`Section`]s. Each section owns its lines
//! in source order, and each [`Line`] keeps the exact text it was parsed from
//! so that untouched lines render back byte for byte. Only a value update
//! rewrites a line, and it rewrites that one line alone.

use crate::error::RuleditError;

/// Name of the pseudo-section that holds lines found before the first header.
pub const PREAMBLE: &str = "__preamble__";

/// One physical line of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    original: String,
    pair: Option<(String, String)>,
}

impl Line {
    /// Parse a raw line. The line carries a key/value pair only when its
    /// trimmed text contains `=`; the split happens on the first `=` and both
    /// halves are trimmed.
    pub fn parse(text: &str) -> Self {
        let pair = text
            .trim()
            .split_once('=')
            .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()));
        Self {
            original: text.to_string(),
            pair,
        }
    }

    /// A fresh `key = value` line, as appended by the engine.
    pub fn key_value(key: &str, value: &str) -> Self {
        Self {
            original: format!("{key} = {value}"),
            pair: Some((key.to_string(), value.to_string())),
        }
    }

    /// The text this line renders as.
    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn key(&self) -> Option<&str> {
        self.pair.as_ref().map(|(k, _)| k.as_str())
    }

    pub fn value(&self) -> Option<&str> {
        self.pair.as_ref().map(|(_, v)| v.as_str())
    }

    /// Replace the value and regenerate the text as `"<key> = <value>"`.
    ///
    /// Prior spacing and inline comments on the line are discarded.
    pub fn set_value(&mut self, value: &str) -> Result<(), RuleditError> {
        let Some((key, current)) = self.pair.as_mut() else {
            return Err(RuleditError::NotKeyValueLine {
                line: self.original.clone(),
            });
        };
        *current = value.to_string();
        self.original = format!("{key} = {value}");
        Ok(())
    }
}

/// A bracketed header and the lines that follow it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Text between `[` and `]`, exactly as written.
    pub name: String,
    /// Raw header line, rendered verbatim.
    pub header: String,
    pub lines: Vec<Line>,
}

impl Section {
    pub fn new(name: &str, header: &str) -> Self {
        Self {
            name: name.to_string(),
            header: header.to_string(),
            lines: Vec::new(),
        }
    }

    /// The headerless pseudo-section for lines before the first header.
    pub fn preamble() -> Self {
        Self::new(PREAMBLE, "")
    }

    /// True for the pseudo-section created by the parser. A real
    /// `[__preamble__]` header is an ordinary section.
    pub fn is_preamble(&self) -> bool {
        self.name == PREAMBLE && self.header.is_empty()
    }

    /// All lines whose key is exactly `key`, in order.
    pub fn find_lines<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a Line> + 'a {
        self.lines.iter().filter(move |line| line.key() == Some(key))
    }

    /// Index of the first line whose key is exactly `key`.
    pub fn position(&self, key: &str) -> Option<usize> {
        self.lines.iter().position(|line| line.key() == Some(key))
    }

    /// Append a `key = value` line at the end of the section.
    pub fn append_line(&mut self, key: &str, value: &str) -> &Line {
        self.lines.push(Line::key_value(key, value));
        &self.lines[self.lines.len() - 1]
    }
}
