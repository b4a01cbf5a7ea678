//! Journal of store mutations and firings for auditing and debugging
//!
//! The journal keeps an ordered trail of fact insertions, removals, rule
//! firings and halted cycles, each tagged with a sequence number.
//!
//! # Example
//!
//! ```rust,ignore
//! use ludic_core::{Engine, Fact};
//!
//! let mut engine = Engine::new();
//! engine.journal_mut().start_recording();
//! engine.insert(Fact::int("QR_section", 1))?;
//!
//! for entry in engine.journal().entries() {
//!     println!("{:?}", entry);
//! }
//! ```

use crate::{Fact, FiringId};
use serde::{Deserialize, Serialize};

/// A journal entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum JournalEntry {
    /// A fact was inserted or replaced
    FactInserted { seq: u64, fact: Fact },
    /// A fact was removed
    FactRemoved { seq: u64, name: String },
    /// A rule started firing
    RuleFired {
        seq: u64,
        firing: FiringId,
        rule: String,
        bindings: Vec<Fact>,
    },
    /// A firing's action chain completed
    FiringCompleted { seq: u64, firing: FiringId },
    /// The runaway guard halted a pump cycle
    CycleHalted {
        seq: u64,
        limit: usize,
        last_rule: String,
    },
}

impl JournalEntry {
    /// Sequence number of this entry
    pub fn seq(&self) -> u64 {
        match self {
            JournalEntry::FactInserted { seq, .. }
            | JournalEntry::FactRemoved { seq, .. }
            | JournalEntry::RuleFired { seq, .. }
            | JournalEntry::FiringCompleted { seq, .. }
            | JournalEntry::CycleHalted { seq, .. } => *seq,
        }
    }
}

/// Configuration for the journal
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JournalConfig {
    /// Whether recording is enabled
    pub recording_enabled: bool,
    /// Maximum number of entries to keep (0 = unlimited)
    pub max_entries: usize,
}

/// The journal
#[derive(Debug, Clone, Default)]
pub struct Journal {
    config: JournalConfig,
    entries: Vec<JournalEntry>,
    next_seq: u64,
}

impl Journal {
    /// Create a new journal (recording disabled)
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom configuration
    pub fn with_config(config: JournalConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Start recording
    pub fn start_recording(&mut self) {
        self.config.recording_enabled = true;
    }

    /// Stop recording
    pub fn stop_recording(&mut self) {
        self.config.recording_enabled = false;
    }

    /// Check if recording is enabled
    pub fn is_recording(&self) -> bool {
        self.config.recording_enabled
    }

    pub(crate) fn record_insert(&mut self, fact: Fact) {
        self.push(|seq| JournalEntry::FactInserted { seq, fact });
    }

    pub(crate) fn record_remove(&mut self, name: &str) {
        self.push(|seq| JournalEntry::FactRemoved {
            seq,
            name: name.to_string(),
        });
    }

    pub(crate) fn record_fired(&mut self, firing: FiringId, rule: &str, bindings: &crate::Bindings) {
        self.push(|seq| JournalEntry::RuleFired {
            seq,
            firing,
            rule: rule.to_string(),
            bindings: bindings.iter().cloned().collect(),
        });
    }

    pub(crate) fn record_completed(&mut self, firing: FiringId) {
        self.push(|seq| JournalEntry::FiringCompleted { seq, firing });
    }

    pub(crate) fn record_halted(&mut self, limit: usize, last_rule: &str) {
        self.push(|seq| JournalEntry::CycleHalted {
            seq,
            limit,
            last_rule: last_rule.to_string(),
        });
    }

    fn push(&mut self, entry: impl FnOnce(u64) -> JournalEntry) {
        if !self.config.recording_enabled {
            return;
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(entry(seq));
        self.enforce_limits();
    }

    /// Get all entries
    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    /// Get entries with a sequence number at or after `seq`
    pub fn entries_since(&self, seq: u64) -> impl Iterator<Item = &JournalEntry> {
        self.entries.iter().filter(move |e| e.seq() >= seq)
    }

    /// Labels of the rules fired, in firing order
    pub fn fired_rules(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter_map(|e| match e {
                JournalEntry::RuleFired { rule, .. } => Some(rule.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Clear all entries
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn enforce_limits(&mut self) {
        if self.config.max_entries > 0 && self.entries.len() > self.config.max_entries {
            let excess = self.entries.len() - self.config.max_entries;
            self.entries.drain(0..excess);
        }
    }
}
