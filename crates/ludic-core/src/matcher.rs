//! Rule selection
//!
//! Rules are scanned in registration order and the first rule whose whole
//! head is satisfied wins. Later rules therefore act as fallbacks for the
//! cases earlier, more specific rules do not cover.

use crate::{Bindings, FactStore, Rule};

/// A selected rule with its bindings
#[derive(Debug, Clone)]
pub struct Match<'r> {
    /// Position of the rule in the scanned sequence
    pub position: usize,
    /// The rule whose head matched
    pub rule: &'r Rule,
    /// Facts that satisfied each head atom, in head order
    pub bindings: Bindings,
}

/// Try to satisfy every head atom of a rule against the store
///
/// Stops at the first atom that fails: absent fact, kind mismatch, or value or
/// pattern mismatch.
pub fn match_rule(rule: &Rule, store: &FactStore) -> Option<Bindings> {
    let mut bindings = Bindings::new();
    for atom in &rule.head {
        let fact = store.get(&atom.name)?;
        if !atom.accepts(&fact.value) {
            return None;
        }
        bindings.push(fact);
    }
    Some(bindings)
}

/// Select the first firable rule, in scan order
pub fn find_firable<'r, I>(rules: I, store: &FactStore) -> Option<Match<'r>>
where
    I: IntoIterator<Item = &'r Rule>,
{
    rules
        .into_iter()
        .enumerate()
        .find_map(|(position, rule)| {
            match_rule(rule, store).map(|bindings| Match {
                position,
                rule,
                bindings,
            })
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Action, Fact, FactKind, HeadAtom};

    fn store_with(facts: Vec<Fact>) -> FactStore {
        let mut store = FactStore::new();
        for fact in facts {
            store.insert(fact);
        }
        store
    }

    fn quiz_rules() -> Vec<Rule> {
        vec![
            Rule::new("Check_right_answer")
                .when(HeadAtom::regex("reply", "(France|F)").unwrap())
                .then(Action::remove("reply")),
            Rule::new("Check_wrong_answer")
                .when(HeadAtom::regex("reply", "(Belgique|B)").unwrap())
                .then(Action::remove("reply")),
            Rule::new("Say_unknown_answer")
                .when_present("reply", FactKind::Text)
                .then(Action::remove("reply")),
        ]
    }

    #[test]
    fn test_first_match_wins() {
        let rules = quiz_rules();
        let store = store_with(vec![Fact::text("reply", "France")]);

        let m = find_firable(&rules, &store).unwrap();
        assert_eq!(m.position, 0);
        assert_eq!(m.rule.label, "Check_right_answer");
        assert_eq!(m.bindings.text("reply"), Some("France"));
    }

    #[test]
    fn test_fallback_when_specific_rules_fail() {
        let rules = quiz_rules();
        let store = store_with(vec![Fact::text("reply", "Espagne")]);

        let m = find_firable(&rules, &store).unwrap();
        assert_eq!(m.rule.label, "Say_unknown_answer");
    }

    #[test]
    fn test_absence_never_satisfies_presence() {
        let rules = quiz_rules();
        let store = store_with(vec![Fact::text("other", "France")]);

        assert!(find_firable(&rules, &store).is_none());
    }

    #[test]
    fn test_kind_mismatch_is_non_match() {
        let rules = quiz_rules();
        let store = store_with(vec![Fact::int("reply", 3)]);

        assert!(find_firable(&rules, &store).is_none());
    }

    #[test]
    fn test_deterministic() {
        let rules = quiz_rules();
        let store = store_with(vec![Fact::text("reply", "B")]);

        let first = find_firable(&rules, &store).unwrap();
        let second = find_firable(&rules, &store).unwrap();
        assert_eq!(first.position, second.position);
        assert_eq!(first.bindings, second.bindings);
        assert_eq!(first.rule.label, "Check_wrong_answer");
    }

    #[test]
    fn test_bindings_follow_head_order() {
        let rule = Rule::new("Play_seek")
            .when_present("seek_section", FactKind::Integer)
            .when_present("QR_section", FactKind::Integer);
        let store = store_with(vec![Fact::int("QR_section", 2), Fact::int("seek_section", -1)]);

        let bindings = match_rule(&rule, &store).unwrap();
        let names: Vec<_> = bindings.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["seek_section", "QR_section"]);
    }

    #[test]
    fn test_short_circuit_on_missing_atom() {
        let rule = Rule::new("Play_section_clear")
            .when(HeadAtom::exact("QR_section", 2i64))
            .when_present("Play_next_section", FactKind::Boolean);
        let store = store_with(vec![Fact::int("QR_section", 2)]);

        assert!(match_rule(&rule, &store).is_none());
    }
}
