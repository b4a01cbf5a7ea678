//! Typed facts held in the store

use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of a fact value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FactKind {
    Integer,
    Boolean,
    Text,
}

impl FactKind {
    /// Short tag used in the diagnostic notation (`Int:name(1)`)
    pub fn tag(&self) -> &'static str {
        match self {
            FactKind::Integer => "Int",
            FactKind::Boolean => "Bool",
            FactKind::Text => "Text",
        }
    }
}

impl fmt::Display for FactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A typed fact value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FactValue {
    /// Integer value (sections, seek offsets, counters)
    Integer(i64),
    /// Boolean value (flags such as `Play_next_section`)
    Boolean(bool),
    /// Text value (recognized speech, media references)
    Text(String),
}

impl FactValue {
    /// Get the kind of this value
    pub fn kind(&self) -> FactKind {
        match self {
            FactValue::Integer(_) => FactKind::Integer,
            FactValue::Boolean(_) => FactKind::Boolean,
            FactValue::Text(_) => FactKind::Text,
        }
    }

    /// Try to get this value as an integer
    pub fn as_int(&self) -> Option<i64> {
        match self {
            FactValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get this value as a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FactValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get this value as text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FactValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for FactValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FactValue::Integer(i) => write!(f, "{}", i),
            FactValue::Boolean(b) => write!(f, "{}", b),
            FactValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<bool> for FactValue {
    fn from(b: bool) -> Self {
        FactValue::Boolean(b)
    }
}

impl From<i64> for FactValue {
    fn from(i: i64) -> Self {
        FactValue::Integer(i)
    }
}

impl From<i32> for FactValue {
    fn from(i: i32) -> Self {
        FactValue::Integer(i as i64)
    }
}

impl From<String> for FactValue {
    fn from(s: String) -> Self {
        FactValue::Text(s)
    }
}

impl From<&str> for FactValue {
    fn from(s: &str) -> Self {
        FactValue::Text(s.to_string())
    }
}

/// A named, typed value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fact {
    pub name: String,
    pub value: FactValue,
}

impl Fact {
    /// Create a new fact
    pub fn new(name: impl Into<String>, value: impl Into<FactValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Create an integer fact
    pub fn int(name: impl Into<String>, value: i64) -> Self {
        Self::new(name, FactValue::Integer(value))
    }

    /// Create a boolean fact
    pub fn bool(name: impl Into<String>, value: bool) -> Self {
        Self::new(name, FactValue::Boolean(value))
    }

    /// Create a text fact
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, FactValue::Text(value.into()))
    }

    /// Get the kind of this fact
    pub fn kind(&self) -> FactKind {
        self.value.kind()
    }
}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}({})", self.kind(), self.name, self.value)
    }
}
