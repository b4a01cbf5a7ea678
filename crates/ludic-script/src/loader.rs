//! RON program loader

use crate::error::{Error, Result};
use crate::schema::{ActionDef, AtomDef, ProgramDef, RuleDef};
use ludic_core::{Action, CustomAction, Engine, EngineConfig, Fact, HeadAtom, PumpOutcome, Rule};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// A program ready for the engine
#[derive(Debug, Clone, Default)]
pub struct Program {
    /// Rules in match order
    pub rules: Vec<Rule>,
    /// Initial facts
    pub facts: Vec<Fact>,
}

impl Program {
    /// Replace the engine's current program with this one
    pub fn install(self, engine: &mut Engine) -> Result<PumpOutcome> {
        Ok(engine.load(self.rules, self.facts)?)
    }
}

/// Loader for RON programs
///
/// Holds the custom actions that programs may refer to by label.
pub struct Loader {
    customs: HashMap<String, CustomAction>,
}

impl Loader {
    /// Create a loader with no custom actions
    pub fn new() -> Self {
        Self {
            customs: HashMap::new(),
        }
    }

    /// Create a loader knowing the quiz navigation actions
    pub fn with_standard_actions() -> Self {
        let mut loader = Self::new();
        for action in crate::actions::standard_actions() {
            loader.register_custom(action);
        }
        loader
    }

    /// Make a custom action available under its label
    pub fn register_custom(&mut self, action: CustomAction) {
        self.customs.insert(action.label().to_string(), action);
    }

    /// Check if a custom action is registered
    pub fn has_custom(&self, name: &str) -> bool {
        self.customs.contains_key(name)
    }

    /// Parse a program from a RON string
    pub fn load_program_str(&self, content: &str) -> Result<ProgramDef> {
        Ok(ron::from_str(content)?)
    }

    /// Parse a program from a RON file
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<ProgramDef> {
        let content = fs::read_to_string(path)?;
        self.load_program_str(&content)
    }

    /// Parse an engine configuration from a RON string
    pub fn load_config_str(content: &str) -> Result<EngineConfig> {
        Ok(ron::from_str(content)?)
    }

    /// Turn a parsed program into engine rules and facts
    ///
    /// Every rule is checked here, so nothing malformed reaches the engine.
    pub fn build(&self, program: &ProgramDef) -> Result<Program> {
        let facts = program
            .facts
            .iter()
            .map(|def| {
                if def.name().is_empty() {
                    return Err(Error::InvalidSchema("fact with an empty name".to_string()));
                }
                Ok(def.to_fact())
            })
            .collect::<Result<Vec<_>>>()?;

        let rules = program
            .rules
            .iter()
            .map(|def| self.build_rule(def))
            .collect::<Result<Vec<_>>>()?;

        Ok(Program { rules, facts })
    }

    /// Build and install a parsed program
    pub fn install(&self, engine: &mut Engine, program: &ProgramDef) -> Result<PumpOutcome> {
        self.build(program)?.install(engine)
    }

    fn build_rule(&self, def: &RuleDef) -> Result<Rule> {
        if def.label.is_empty() {
            return Err(Error::MissingField("label".to_string()));
        }

        let mut rule = Rule::new(def.label.clone());
        for atom in &def.head {
            rule = rule.when(match atom {
                AtomDef::Exact(fact) => HeadAtom::from_fact(fact.to_fact()),
                AtomDef::Presence(name, kind) => HeadAtom::presence(name.clone(), *kind),
                AtomDef::Regex(name, pattern) => HeadAtom::regex(name.clone(), pattern.clone())?,
            });
        }
        for action in &def.actions {
            rule = rule.then(self.build_action(&def.label, action)?);
        }

        rule.validate()?;
        Ok(rule)
    }

    fn build_action(&self, rule: &str, def: &ActionDef) -> Result<Action> {
        Ok(match def {
            ActionDef::Add(fact) => Action::add(fact.to_fact()),
            ActionDef::Remove(name) => Action::remove(name.clone()),
            ActionDef::Announce(text) => Action::announce(text.clone()),
            ActionDef::PrettyPrint(text) => Action::pretty_print(text.clone()),
            ActionDef::PlayMedia(reference, auto_continue) => {
                Action::play_media(reference.clone(), *auto_continue)
            }
            ActionDef::AnnounceHelp(text) => Action::announce_help(text.clone()),
            ActionDef::Custom(name) => {
                let custom = self
                    .customs
                    .get(name)
                    .ok_or_else(|| Error::UnknownCustomAction {
                        rule: rule.to_string(),
                        name: name.clone(),
                    })?;
                Action::Custom(custom.clone())
            }
        })
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}
