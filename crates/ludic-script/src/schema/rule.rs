//! Rule definition schema

use super::program::FactDef;
use ludic_core::FactKind;
use serde::{Deserialize, Serialize};

/// Definition of a rule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleDef {
    /// Diagnostic label
    pub label: String,
    /// Head atoms, all of which must hold
    pub head: Vec<AtomDef>,
    /// Actions run in order when the rule fires
    #[serde(default)]
    pub actions: Vec<ActionDef>,
}

/// A head atom as written in a program file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AtomDef {
    /// Fact present with exactly this value
    Exact(FactDef),
    /// Fact present with this kind, any value
    Presence(String, FactKind),
    /// Text fact fully matching a pattern
    Regex(String, String),
}

/// An action as written in a program file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ActionDef {
    Add(FactDef),
    Remove(String),
    Announce(String),
    PrettyPrint(String),
    /// Media reference and whether playback continues on its own
    PlayMedia(String, bool),
    AnnounceHelp(String),
    /// A custom action registered with the loader, by label
    Custom(String),
}
