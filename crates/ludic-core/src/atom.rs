//! Head atoms: the conditions of a rule

use crate::error::{Error, Result};
use crate::{Fact, FactKind, FactValue};
use regex_lite::Regex;
use std::fmt;

/// A compiled regular expression tested against text facts
///
/// The expression must match the whole stored text.
#[derive(Clone)]
pub struct TextPattern {
    source: String,
    regex: Regex,
}

impl TextPattern {
    /// Compile a pattern; `name` is only used for error reporting
    pub fn new(name: &str, source: impl Into<String>) -> Result<Self> {
        let source = source.into();
        let regex = Regex::new(&format!("^(?:{})$", source)).map_err(|e| Error::InvalidPattern {
            name: name.to_string(),
            pattern: source.clone(),
            reason: e.to_string(),
        })?;
        Ok(Self { source, regex })
    }

    /// The expression as written
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Test a text against the pattern
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

impl fmt::Debug for TextPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TextPattern").field(&self.source).finish()
    }
}

impl PartialEq for TextPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

/// How a head atom compares against the stored fact
#[derive(Debug, Clone, PartialEq)]
pub enum MatchMode {
    /// Any fact of the same name and kind, whatever its value
    Presence,
    /// A fact of the same name whose value is equal
    Exact(FactValue),
    /// A text fact of the same name satisfying the expression
    Regex(TextPattern),
}

/// One condition of a rule
#[derive(Debug, Clone, PartialEq)]
pub struct HeadAtom {
    pub name: String,
    pub kind: FactKind,
    pub mode: MatchMode,
}

impl HeadAtom {
    /// Exact match on value equality
    pub fn exact(name: impl Into<String>, value: impl Into<FactValue>) -> Self {
        let value = value.into();
        Self {
            name: name.into(),
            kind: value.kind(),
            mode: MatchMode::Exact(value),
        }
    }

    /// Exact match taken from an existing fact
    pub fn from_fact(fact: Fact) -> Self {
        Self::exact(fact.name, fact.value)
    }

    /// Presence of a fact of this name and kind
    pub fn presence(name: impl Into<String>, kind: FactKind) -> Self {
        Self {
            name: name.into(),
            kind,
            mode: MatchMode::Presence,
        }
    }

    /// Regular expression test on a text fact
    pub fn regex(name: impl Into<String>, pattern: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let pattern = TextPattern::new(&name, pattern)?;
        Ok(Self {
            name,
            kind: FactKind::Text,
            mode: MatchMode::Regex(pattern),
        })
    }

    /// Test this atom against a stored value of the same name
    ///
    /// A kind mismatch is an ordinary non-match.
    pub fn accepts(&self, value: &FactValue) -> bool {
        if value.kind() != self.kind {
            return false;
        }
        match &self.mode {
            MatchMode::Presence => true,
            MatchMode::Exact(expected) => expected == value,
            MatchMode::Regex(pattern) => value.as_text().is_some_and(|t| pattern.is_match(t)),
        }
    }
}

impl fmt::Display for HeadAtom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.mode {
            MatchMode::Presence => f.write_str(&self.name),
            MatchMode::Exact(value) => write!(f, "{}:{}({})", self.kind, self.name, value),
            MatchMode::Regex(pattern) => write!(f, "Regex:{}[{}]", self.name, pattern.as_str()),
        }
    }
}
