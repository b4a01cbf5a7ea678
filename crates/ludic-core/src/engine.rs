//! The evaluation loop
//!
//! The engine owns the fact store, the rule lists and the device bundle. Every
//! store mutation coming from the host goes through it; after a mutation it
//! pumps: match, fire, re-match, until no rule's head is satisfied.
//!
//! ```text
//! IDLE -> MATCHING -> FIRING -> (MATCHING | IDLE)
//! ```
//!
//! A firing that suspends on a device keeps the engine in `FIRING`. Mutations
//! arriving meanwhile are applied to the store and picked up by the match that
//! follows the firing; the host resumes the loop with
//! [`Engine::process_completions`] once a device has signalled.

use crate::error::{Error, Result};
use crate::executor::{CompletionChannel, Firing, Progress};
use crate::matcher::find_firable;
use crate::{ActionContext, Devices, EngineConfig, Fact, FactStore, FiringId, Rule, RuleTier};
use std::sync::Arc;

#[cfg(feature = "journal")]
use crate::journal::Journal;

/// Observable state of the evaluation loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Quiescent, waiting for the next external mutation
    Idle,
    /// Selecting the next rule
    Matching,
    /// A firing is open
    Firing,
}

/// What a mutation or resume did to the loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpOutcome {
    /// Nothing changed, no pump ran
    Unchanged,
    /// Recorded while a firing is open; matched once that firing completes
    Deferred,
    /// The loop ran to quiescence
    Quiescent { firings: usize },
    /// The loop is waiting on a device signal
    Suspended { firings: usize },
}

impl PumpOutcome {
    /// Number of firings started during this pump
    pub fn firings(&self) -> usize {
        match self {
            PumpOutcome::Quiescent { firings } | PumpOutcome::Suspended { firings } => *firings,
            _ => 0,
        }
    }

    /// Whether the loop is idle afterwards
    pub fn is_quiescent(&self) -> bool {
        matches!(self, PumpOutcome::Quiescent { .. })
    }
}

enum Phase {
    Idle,
    Matching,
    Firing(Firing),
}

/// The rule engine: one instance per host, one program at a time
pub struct Engine {
    store: FactStore,
    system_rules: Vec<Arc<Rule>>,
    user_rules: Vec<Arc<Rule>>,
    devices: Devices,
    config: EngineConfig,
    channel: CompletionChannel,
    phase: Phase,
    next_firing: FiringId,
    /// Firings started since the loop last left `Idle`
    firings: usize,
    #[cfg(feature = "journal")]
    journal: Journal,
}

impl Engine {
    /// Create an engine with null devices and default configuration
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Create an engine with a configuration
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            store: FactStore::new(),
            system_rules: Vec::new(),
            user_rules: Vec::new(),
            devices: Devices::default(),
            #[cfg(feature = "journal")]
            journal: Journal::with_config(config.journal.clone()),
            config,
            channel: CompletionChannel::new(),
            phase: Phase::Idle,
            next_firing: FiringId::new(1),
            firings: 0,
        }
    }

    /// Replace the device bundle
    pub fn with_devices(mut self, devices: Devices) -> Self {
        self.devices = devices;
        self
    }

    // === Program lifecycle ===

    /// Append a user rule
    pub fn register_rule(&mut self, rule: Rule) -> Result<()> {
        self.register(RuleTier::User, rule)
    }

    /// Append a system rule; system rules survive program reloads
    pub fn register_system_rule(&mut self, rule: Rule) -> Result<()> {
        self.register(RuleTier::System, rule)
    }

    fn register(&mut self, tier: RuleTier, rule: Rule) -> Result<()> {
        rule.validate()?;
        tracing::debug!(rule = %rule.label, ?tier, "rule registered");
        match tier {
            RuleTier::System => self.system_rules.push(Arc::new(rule)),
            RuleTier::User => self.user_rules.push(Arc::new(rule)),
        }
        Ok(())
    }

    /// Remove every user rule
    pub fn clear_rules(&mut self) {
        self.user_rules.clear();
    }

    /// Remove every system rule
    pub fn clear_system_rules(&mut self) {
        self.system_rules.clear();
    }

    /// Remove every fact, without pumping
    pub fn clear_store(&mut self) {
        self.store.clear();
    }

    /// Drop the loaded program: user rules, facts and any open firing
    pub fn reset(&mut self) {
        if let Phase::Firing(firing) = &self.phase {
            tracing::warn!(
                firing = %firing.id(),
                rule = %firing.rule().label,
                "abandoning open firing on reset"
            );
        }
        self.phase = Phase::Idle;
        self.firings = 0;
        self.channel.discard_pending();
        self.clear_rules();
        self.clear_store();
    }

    /// Load a program: reset, register its rules, seed its facts and pump
    ///
    /// Every rule is checked before anything is changed, so a rejected
    /// program leaves the current one in place.
    pub fn load(
        &mut self,
        rules: impl IntoIterator<Item = Rule>,
        facts: impl IntoIterator<Item = Fact>,
    ) -> Result<PumpOutcome> {
        let rules: Vec<Rule> = rules.into_iter().collect();
        for rule in &rules {
            rule.validate()?;
        }

        self.reset();
        let rule_count = rules.len();
        self.user_rules
            .extend(rules.into_iter().map(Arc::new));
        for fact in facts {
            self.apply_insert(fact);
        }
        tracing::info!(
            rules = rule_count,
            facts = self.store.len(),
            "program loaded"
        );
        tracing::debug!(rules = %self.rules_to_string(), store = %self.store, "program contents");

        self.pump()
    }

    // === Store mutation ===

    /// Insert or replace a fact and pump if the store changed
    pub fn insert(&mut self, fact: Fact) -> Result<PumpOutcome> {
        if !self.apply_insert(fact) {
            return Ok(PumpOutcome::Unchanged);
        }
        self.wake()
    }

    /// Remove a fact and pump if something was removed
    pub fn remove(&mut self, name: &str) -> Result<PumpOutcome> {
        if !self.apply_remove(name) {
            return Ok(PumpOutcome::Unchanged);
        }
        self.wake()
    }

    fn apply_insert(&mut self, fact: Fact) -> bool {
        tracing::debug!(fact = %fact, "insert");
        #[cfg(feature = "journal")]
        let recorded = fact.clone();
        let changed = self.store.insert(fact);
        #[cfg(feature = "journal")]
        if changed {
            self.journal.record_insert(recorded);
        }
        changed
    }

    fn apply_remove(&mut self, name: &str) -> bool {
        let removed = self.store.remove(name);
        if removed {
            tracing::debug!(name, "remove");
            #[cfg(feature = "journal")]
            self.journal.record_remove(name);
        }
        removed
    }

    fn wake(&mut self) -> Result<PumpOutcome> {
        match self.phase {
            Phase::Idle => self.pump(),
            _ => {
                tracing::debug!("mutation recorded while firing");
                Ok(PumpOutcome::Deferred)
            }
        }
    }

    // === Evaluation loop ===

    /// Match and fire until quiescence or suspension
    ///
    /// Does nothing while a firing is open. If the firing cap is exceeded the
    /// cycle is halted, the engine returns to idle and the error is returned;
    /// the engine stays usable for later mutations.
    pub fn pump(&mut self) -> Result<PumpOutcome> {
        match self.phase {
            Phase::Idle => {
                self.phase = Phase::Matching;
                self.drive()
            }
            _ => Ok(PumpOutcome::Deferred),
        }
    }

    /// Resume the open firing after devices signalled completion
    pub fn process_completions(&mut self) -> Result<PumpOutcome> {
        match self.phase {
            Phase::Firing(_) => self.drive(),
            _ => {
                self.channel.discard_pending();
                Ok(PumpOutcome::Unchanged)
            }
        }
    }

    fn drive(&mut self) -> Result<PumpOutcome> {
        loop {
            match std::mem::replace(&mut self.phase, Phase::Idle) {
                Phase::Idle => return Ok(PumpOutcome::Quiescent { firings: 0 }),
                Phase::Matching => {
                    let Some(firing) = self.select()? else {
                        let firings = std::mem::take(&mut self.firings);
                        tracing::debug!(firings, "quiescent");
                        return Ok(PumpOutcome::Quiescent { firings });
                    };
                    self.phase = Phase::Firing(firing);
                }
                Phase::Firing(mut firing) => {
                    let progress = {
                        let mut ctx = ActionContext {
                            firing: firing.id(),
                            store: &mut self.store,
                            devices: &mut self.devices,
                            config: &self.config,
                            #[cfg(feature = "journal")]
                            journal: &mut self.journal,
                        };
                        firing.run(&mut ctx, &self.channel)
                    };
                    match progress {
                        Progress::Completed => {
                            tracing::debug!(firing = %firing.id(), rule = %firing.rule().label, "firing completed");
                            #[cfg(feature = "journal")]
                            self.journal.record_completed(firing.id());
                            self.phase = Phase::Matching;
                        }
                        Progress::Suspended => {
                            tracing::debug!(firing = %firing.id(), "firing suspended");
                            self.phase = Phase::Firing(firing);
                            return Ok(PumpOutcome::Suspended {
                                firings: self.firings,
                            });
                        }
                    }
                }
            }
        }
    }

    /// Pick the next rule to fire, enforcing the firing cap
    fn select(&mut self) -> Result<Option<Firing>> {
        let found = find_firable(
            self.system_rules
                .iter()
                .chain(self.user_rules.iter())
                .map(|rule| rule.as_ref()),
            &self.store,
        )
        .map(|m| (m.position, m.bindings));

        let Some((position, bindings)) = found else {
            return Ok(None);
        };
        let rule = if position < self.system_rules.len() {
            self.system_rules[position].clone()
        } else {
            self.user_rules[position - self.system_rules.len()].clone()
        };

        let limit = self.config.max_firings_per_pump();
        if self.firings >= limit {
            self.firings = 0;
            tracing::error!(limit, rule = %rule.label, "runaway firing cycle halted");
            #[cfg(feature = "journal")]
            self.journal.record_halted(limit, &rule.label);
            return Err(Error::RunawayFiring {
                limit,
                last_rule: rule.label.clone(),
            });
        }

        self.firings += 1;
        let id = self.next_firing;
        self.next_firing = id.next();
        tracing::info!(firing = %id, rule = %rule.label, "rule fired");
        #[cfg(feature = "journal")]
        self.journal.record_fired(id, &rule.label, &bindings);

        Ok(Some(Firing::new(id, rule, bindings)))
    }

    // === Inspection ===

    /// Current loop state
    pub fn state(&self) -> EngineState {
        match self.phase {
            Phase::Idle => EngineState::Idle,
            Phase::Matching => EngineState::Matching,
            Phase::Firing(_) => EngineState::Firing,
        }
    }

    /// Get a fact by name
    pub fn get(&self, name: &str) -> Option<Fact> {
        self.store.get(name)
    }

    /// Read-only view of the store
    pub fn store(&self) -> &FactStore {
        &self.store
    }

    /// All rules in match order, with their tier
    pub fn rules(&self) -> impl Iterator<Item = (RuleTier, &Rule)> {
        self.system_rules
            .iter()
            .map(|r| (RuleTier::System, r.as_ref()))
            .chain(self.user_rules.iter().map(|r| (RuleTier::User, r.as_ref())))
    }

    /// Human-readable listing of the rules, one per line
    pub fn rules_to_string(&self) -> String {
        self.rules()
            .map(|(tier, rule)| format!(" {}<{}>", tier.prefix(), rule))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Human-readable form of the store
    pub fn store_to_string(&self) -> String {
        self.store.to_string()
    }

    /// Engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Mutable access to the devices
    pub fn devices_mut(&mut self) -> &mut Devices {
        &mut self.devices
    }

    /// The journal
    #[cfg(feature = "journal")]
    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    /// Mutable access to the journal
    #[cfg(feature = "journal")]
    pub fn journal_mut(&mut self) -> &mut Journal {
        &mut self.journal
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
