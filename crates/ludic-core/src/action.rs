//! Actions run when a rule fires
//!
//! Every action follows the same contract: given the bindings captured at
//! match time and a [`Continuation`], perform the effect and eventually resume
//! the continuation exactly once. Built-in store and text actions resume before
//! returning; media playback and custom actions may resume later.

use crate::device::{Announcer, Playback, Recognition};
use crate::{Bindings, Continuation, EngineConfig, Fact, FactStore, FiringId};
use std::fmt;
use std::sync::Arc;

#[cfg(feature = "journal")]
use crate::journal::Journal;

/// Signature of a custom action body
pub type CustomFn = dyn Fn(&mut ActionContext<'_>, &Bindings, Continuation) + Send + Sync;

/// Device-specific behavior supplied as a closure
#[derive(Clone)]
pub struct CustomAction {
    label: String,
    reads: Vec<String>,
    run: Arc<CustomFn>,
}

impl CustomAction {
    /// Create a custom action
    pub fn new(
        label: impl Into<String>,
        run: impl Fn(&mut ActionContext<'_>, &Bindings, Continuation) + Send + Sync + 'static,
    ) -> Self {
        Self {
            label: label.into(),
            reads: Vec::new(),
            run: Arc::new(run),
        }
    }

    /// Declare a head-atom name the body reads from its bindings
    ///
    /// Declared names are checked against the rule head at registration.
    pub fn reading(mut self, name: impl Into<String>) -> Self {
        self.reads.push(name.into());
        self
    }

    /// Diagnostic label
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Names read from the bindings
    pub fn reads(&self) -> &[String] {
        &self.reads
    }
}

impl fmt::Debug for CustomAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomAction")
            .field("label", &self.label)
            .field("reads", &self.reads)
            .finish_non_exhaustive()
    }
}

/// An action of a rule
#[derive(Debug, Clone)]
pub enum Action {
    /// Insert (or replace) a fact
    AddFact(Fact),
    /// Remove a fact by name
    RemoveFact(String),
    /// Speak a text
    Announce(String),
    /// Show a text
    PrettyPrint(String),
    /// Play a media reference, completing when playback ends
    PlayMedia {
        reference: String,
        auto_continue: bool,
    },
    /// Speak a help text, only when beginner help is enabled
    AnnounceHelp(String),
    /// Closure with access to the store and devices
    Custom(CustomAction),
}

impl Action {
    /// Create an add fact action
    pub fn add(fact: Fact) -> Self {
        Action::AddFact(fact)
    }

    /// Create a remove fact action
    pub fn remove(name: impl Into<String>) -> Self {
        Action::RemoveFact(name.into())
    }

    /// Create an announce action
    pub fn announce(text: impl Into<String>) -> Self {
        Action::Announce(text.into())
    }

    /// Create a pretty print action
    pub fn pretty_print(text: impl Into<String>) -> Self {
        Action::PrettyPrint(text.into())
    }

    /// Create a play media action
    pub fn play_media(reference: impl Into<String>, auto_continue: bool) -> Self {
        Action::PlayMedia {
            reference: reference.into(),
            auto_continue,
        }
    }

    /// Create an announce help action
    pub fn announce_help(text: impl Into<String>) -> Self {
        Action::AnnounceHelp(text.into())
    }

    /// Create a custom action
    pub fn custom(
        label: impl Into<String>,
        run: impl Fn(&mut ActionContext<'_>, &Bindings, Continuation) + Send + Sync + 'static,
    ) -> Self {
        Action::Custom(CustomAction::new(label, run))
    }

    /// Names this action reads from the bindings
    pub fn reads(&self) -> &[String] {
        match self {
            Action::Custom(custom) => custom.reads(),
            _ => &[],
        }
    }

    /// Perform the action and hand over the continuation
    pub fn perform(&self, ctx: &mut ActionContext<'_>, bindings: &Bindings, k: Continuation) {
        match self {
            Action::AddFact(fact) => {
                ctx.insert(fact.clone());
                k.resume();
            }
            Action::RemoveFact(name) => {
                ctx.remove(name);
                k.resume();
            }
            Action::Announce(text) => {
                ctx.announcer().announce(text);
                k.resume();
            }
            Action::PrettyPrint(text) => {
                ctx.announcer().pretty_print(text);
                k.resume();
            }
            Action::AnnounceHelp(text) => {
                if ctx.config().beginner_help {
                    ctx.announcer().announce(text);
                }
                k.resume();
            }
            Action::PlayMedia {
                reference,
                auto_continue,
            } => {
                ctx.playback().play(reference, *auto_continue, k);
            }
            Action::Custom(custom) => (custom.run)(ctx, bindings, k),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::AddFact(fact) => write!(f, "Add({})", fact),
            Action::RemoveFact(name) => write!(f, "Remove({})", name),
            Action::Announce(text) => write!(f, "Announce({})", text),
            Action::PrettyPrint(text) => write!(f, "PrettyPrint({})", text),
            Action::PlayMedia { reference, .. } => write!(f, "PlayMedia({})", reference),
            Action::AnnounceHelp(text) => write!(f, "AnnounceHelp({})", text),
            Action::Custom(custom) => write!(f, "{}()", custom.label),
        }
    }
}

/// What an action can reach while it runs
///
/// Store mutations made here are applied immediately but never start a new
/// pump cycle; the next match happens once the whole firing completes.
pub struct ActionContext<'a> {
    pub(crate) firing: FiringId,
    pub(crate) store: &'a mut FactStore,
    pub(crate) devices: &'a mut crate::Devices,
    pub(crate) config: &'a EngineConfig,
    #[cfg(feature = "journal")]
    pub(crate) journal: &'a mut Journal,
}

impl<'a> ActionContext<'a> {
    /// The firing this action belongs to
    pub fn firing(&self) -> FiringId {
        self.firing
    }

    /// Insert a fact; returns true if the store changed
    pub fn insert(&mut self, fact: Fact) -> bool {
        #[cfg(feature = "journal")]
        let recorded = fact.clone();
        let changed = self.store.insert(fact);
        #[cfg(feature = "journal")]
        if changed {
            self.journal.record_insert(recorded);
        }
        changed
    }

    /// Remove a fact; returns true if something was removed
    pub fn remove(&mut self, name: &str) -> bool {
        let removed = self.store.remove(name);
        #[cfg(feature = "journal")]
        if removed {
            self.journal.record_remove(name);
        }
        removed
    }

    /// Read-only view of the store
    pub fn store(&self) -> &FactStore {
        self.store
    }

    /// The recognition subsystem
    pub fn recognition(&mut self) -> &mut dyn Recognition {
        self.devices.recognition.as_mut()
    }

    /// The playback subsystem
    pub fn playback(&mut self) -> &mut dyn Playback {
        self.devices.playback.as_mut()
    }

    /// The text output
    pub fn announcer(&mut self) -> &mut dyn Announcer {
        self.devices.announcer.as_mut()
    }

    /// Engine configuration
    pub fn config(&self) -> &EngineConfig {
        self.config
    }
}
