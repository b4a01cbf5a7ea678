//! Ludic Script - RON program loader and program builders
//!
//! Loads rule programs from RON files:
//! - Initial facts and rules with exact, presence and pattern head atoms
//! - Custom actions referenced by label from a loader registry
//! - Engine configuration
//!
//! Also generates the vocal multiple-choice question program from a
//! [`QcmDef`].

pub mod actions;
mod error;
mod loader;
pub mod qcm;
mod schema;

pub use error::{Error, Result};
pub use loader::{Loader, Program};
pub use qcm::{AnswerDef, Messages, QcmDef};
pub use schema::{ActionDef, AtomDef, FactDef, ProgramDef, RuleDef};
