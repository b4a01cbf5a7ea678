//! Ludic Core - Rule engine for interactive, event-driven programs
//!
//! This crate provides the core types and the evaluation loop:
//! - Typed facts and the fact store (`Fact`, `FactValue`, `FactStore`)
//! - Head atoms matching by value, by presence or by text pattern
//! - Rules with ordered actions, selected first-match-wins
//! - Continuation-sequenced actions, so media playback can hold a firing open
//! - Device contracts for recognition, playback and text output
//!
//! ## Example
//!
//! ```
//! use ludic_core::{Action, Engine, Fact, FactKind, HeadAtom, Rule};
//!
//! let mut engine = Engine::new();
//! engine.register_rule(
//!     Rule::new("Check_right_answer")
//!         .when(HeadAtom::regex("SR_text", "(France|F)").unwrap())
//!         .then(Action::remove("SR_text"))
//!         .then(Action::announce("Bien joué")),
//! ).unwrap();
//! engine.register_rule(
//!     Rule::new("Say_unknown_answer")
//!         .when_present("SR_text", FactKind::Text)
//!         .then(Action::remove("SR_text")),
//! ).unwrap();
//!
//! let outcome = engine.insert(Fact::text("SR_text", "F")).unwrap();
//! assert_eq!(outcome.firings(), 1);
//! assert!(engine.get("SR_text").is_none());
//! ```
//!
//! ## Journal Feature
//!
//! Enable the `journal` feature to record mutations and firings:
//! ```toml
//! ludic-core = { version = "0.1", features = ["journal"] }
//! ```

mod action;
mod atom;
mod binding;
mod config;
mod continuation;
pub mod device;
pub mod engine;
mod error;
mod executor;
mod fact;
mod identity;
pub mod matcher;
mod rule;
mod store;

#[cfg(feature = "journal")]
pub mod journal;

pub use action::{Action, ActionContext, CustomAction, CustomFn};
pub use atom::{HeadAtom, MatchMode, TextPattern};
pub use binding::Bindings;
pub use config::{EngineConfig, DEFAULT_MAX_FIRINGS};
pub use continuation::{Completion, Continuation};
pub use device::{Announcer, Devices, NullAnnouncer, NullPlayback, NullRecognition, Playback, Recognition};
pub use engine::{Engine, EngineState, PumpOutcome};
pub use error::{Error, Result};
pub use fact::{Fact, FactKind, FactValue};
pub use identity::FiringId;
pub use matcher::{find_firable, match_rule, Match};
pub use rule::{Rule, RuleTier};
pub use store::FactStore;

#[cfg(feature = "journal")]
pub use journal::{Journal, JournalConfig, JournalEntry};
