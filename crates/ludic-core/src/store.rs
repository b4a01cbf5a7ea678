//! The fact store
//!
//! A mapping from fact name to a single typed value. Insertion order is
//! preserved so that diagnostics and the journal are deterministic.

use crate::{Fact, FactValue};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Mutable mapping from name to a single typed value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FactStore {
    facts: IndexMap<String, FactValue>,
}

impl FactStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fact, replacing any fact with the same name
    ///
    /// Returns true when the stored value actually changed (a new name, a
    /// different value, or a different kind).
    pub fn insert(&mut self, fact: Fact) -> bool {
        match self.facts.get_mut(&fact.name) {
            Some(current) if *current == fact.value => false,
            Some(current) => {
                *current = fact.value;
                true
            }
            None => {
                self.facts.insert(fact.name, fact.value);
                true
            }
        }
    }

    /// Remove a fact by name; removing an absent name is a no-op
    ///
    /// Returns true when something was removed.
    pub fn remove(&mut self, name: &str) -> bool {
        self.facts.shift_remove(name).is_some()
    }

    /// Get a fact by name
    pub fn get(&self, name: &str) -> Option<Fact> {
        self.facts
            .get_key_value(name)
            .map(|(name, value)| Fact::new(name.clone(), value.clone()))
    }

    /// Get the value of a fact by name
    pub fn value(&self, name: &str) -> Option<&FactValue> {
        self.facts.get(name)
    }

    /// Check whether a fact with this name exists
    pub fn contains(&self, name: &str) -> bool {
        self.facts.contains_key(name)
    }

    /// Remove every fact
    pub fn clear(&mut self) {
        self.facts.clear();
    }

    /// Number of facts in the store
    pub fn len(&self) -> usize {
        self.facts.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    /// Iterate over all facts in insertion order
    pub fn iter(&self) -> impl Iterator<Item = Fact> + '_ {
        self.facts
            .iter()
            .map(|(name, value)| Fact::new(name.clone(), value.clone()))
    }
}

impl fmt::Display for FactStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, fact) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, " {}", fact)?;
        }
        write!(f, " }}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_replaces() {
        let mut store = FactStore::new();
        assert!(store.insert(Fact::int("section", 1)));
        assert!(store.insert(Fact::int("section", 2)));

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("section"), Some(Fact::int("section", 2)));
    }

    #[test]
    fn test_insert_same_value_is_unchanged() {
        let mut store = FactStore::new();
        assert!(store.insert(Fact::bool("advance", true)));
        assert!(!store.insert(Fact::bool("advance", true)));
    }

    #[test]
    fn test_insert_other_kind_replaces() {
        let mut store = FactStore::new();
        store.insert(Fact::int("reply", 1));
        assert!(store.insert(Fact::text("reply", "1")));

        assert_eq!(store.len(), 1);
        assert_eq!(store.value("reply"), Some(&FactValue::Text("1".into())));
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut store = FactStore::new();
        assert!(!store.remove("missing"));

        store.insert(Fact::int("section", 1));
        assert!(store.remove("section"));
        assert!(!store.remove("section"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_display() {
        let mut store = FactStore::new();
        assert_eq!(store.to_string(), "{ }");

        store.insert(Fact::int("QR_section", 1));
        store.insert(Fact::bool("Play_next_section", true));
        assert_eq!(
            store.to_string(),
            "{ Int:QR_section(1), Bool:Play_next_section(true) }"
        );
    }
}
