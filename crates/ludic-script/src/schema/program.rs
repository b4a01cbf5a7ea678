//! Program definition schema

use super::rule::RuleDef;
use ludic_core::Fact;
use serde::{Deserialize, Serialize};

/// A fact as written in a program file
///
/// ```text
/// Int("QR_section", 1)
/// Bool("Play_next_section", true)
/// Text("SR_text", "France")
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FactDef {
    Int(String, i64),
    Bool(String, bool),
    Text(String, String),
}

impl FactDef {
    /// Name of the fact
    pub fn name(&self) -> &str {
        match self {
            FactDef::Int(name, _) | FactDef::Bool(name, _) | FactDef::Text(name, _) => name,
        }
    }

    /// Convert to an engine fact
    pub fn to_fact(&self) -> Fact {
        match self {
            FactDef::Int(name, v) => Fact::int(name.clone(), *v),
            FactDef::Bool(name, v) => Fact::bool(name.clone(), *v),
            FactDef::Text(name, v) => Fact::text(name.clone(), v.clone()),
        }
    }
}

/// A whole program: initial facts and rules in match order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgramDef {
    /// Facts seeded when the program is installed
    #[serde(default)]
    pub facts: Vec<FactDef>,
    /// Rules, first match wins
    #[serde(default)]
    pub rules: Vec<RuleDef>,
}
