//! Rules: ordered head atoms and an ordered action list

use crate::error::{Error, Result};
use crate::{Action, FactKind, HeadAtom};
use std::fmt;

/// Which list a rule is registered in
///
/// System rules are installed once by the host and survive program reloads;
/// user rules belong to the loaded program. System rules are matched first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleTier {
    System,
    User,
}

impl RuleTier {
    /// Prefix used in rule listings
    pub fn prefix(&self) -> &'static str {
        match self {
            RuleTier::System => "_s_",
            RuleTier::User => "_u_",
        }
    }
}

/// An immutable condition/action rule
///
/// The label is only used for diagnostics; several rules may share one.
#[derive(Debug, Clone)]
pub struct Rule {
    pub label: String,
    pub head: Vec<HeadAtom>,
    pub actions: Vec<Action>,
}

impl Rule {
    /// Create a rule with no head atoms and no actions
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            head: Vec::new(),
            actions: Vec::new(),
        }
    }

    /// Add a head atom
    pub fn when(mut self, atom: HeadAtom) -> Self {
        self.head.push(atom);
        self
    }

    /// Add a presence head atom
    pub fn when_present(self, name: impl Into<String>, kind: FactKind) -> Self {
        self.when(HeadAtom::presence(name, kind))
    }

    /// Add an action
    pub fn then(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    /// Add several actions
    pub fn then_all(mut self, actions: impl IntoIterator<Item = Action>) -> Self {
        self.actions.extend(actions);
        self
    }

    /// Check the construction contract
    ///
    /// A rule needs at least one head atom, and every name a custom action
    /// reads must be bound by one of the head atoms.
    pub fn validate(&self) -> Result<()> {
        if self.head.is_empty() {
            return Err(Error::EmptyHead {
                rule: self.label.clone(),
            });
        }
        for action in &self.actions {
            for name in action.reads() {
                if !self.head.iter().any(|atom| &atom.name == name) {
                    return Err(Error::UnboundReference {
                        rule: self.label.clone(),
                        name: name.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ ", self.label)?;
        for (i, atom) in self.head.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", atom)?;
        }
        write!(f, " --> ")?;
        for (i, action) in self.actions.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", action)?;
        }
        Ok(())
    }
}
