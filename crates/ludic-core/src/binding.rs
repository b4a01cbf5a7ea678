//! Bindings captured when a rule head matches

use crate::{Fact, FactValue};

/// The facts that satisfied a rule's head atoms, in head-atom order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bindings {
    facts: Vec<Fact>,
}

impl Bindings {
    /// Create empty bindings
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a matched fact
    pub(crate) fn push(&mut self, fact: Fact) {
        self.facts.push(fact);
    }

    /// Get the matched fact bound to a head-atom name
    pub fn get(&self, name: &str) -> Option<&Fact> {
        self.facts.iter().find(|f| f.name == name)
    }

    /// Get the matched value bound to a head-atom name
    pub fn value(&self, name: &str) -> Option<&FactValue> {
        self.get(name).map(|f| &f.value)
    }

    /// Get an integer binding
    pub fn int(&self, name: &str) -> Option<i64> {
        self.value(name).and_then(FactValue::as_int)
    }

    /// Get a boolean binding
    pub fn bool(&self, name: &str) -> Option<bool> {
        self.value(name).and_then(FactValue::as_bool)
    }

    /// Get a text binding
    pub fn text(&self, name: &str) -> Option<&str> {
        self.value(name).and_then(FactValue::as_text)
    }

    /// Number of bound facts
    pub fn len(&self) -> usize {
        self.facts.len()
    }

    /// Check if nothing is bound
    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    /// Iterate over the bound facts in head-atom order
    pub fn iter(&self) -> impl Iterator<Item = &Fact> {
        self.facts.iter()
    }
}

impl FromIterator<Fact> for Bindings {
    fn from_iter<I: IntoIterator<Item = Fact>>(iter: I) -> Self {
        Self {
            facts: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_lookup() {
        let bindings: Bindings = vec![Fact::int("seek_section", -1), Fact::int("QR_section", 2)]
            .into_iter()
            .collect();

        assert_eq!(bindings.len(), 2);
        assert_eq!(bindings.int("seek_section"), Some(-1));
        assert_eq!(bindings.int("QR_section"), Some(2));
        assert_eq!(bindings.bool("QR_section"), None);
        assert!(bindings.get("SR_text").is_none());
    }

    #[test]
    fn test_order_preserved() {
        let bindings: Bindings = vec![Fact::text("b", "x"), Fact::bool("a", true)]
            .into_iter()
            .collect();
        let names: Vec<_> = bindings.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
    }
}
