//! Schema definitions for RON programs

pub mod program;
pub mod rule;

pub use program::{FactDef, ProgramDef};
pub use rule::{ActionDef, AtomDef, RuleDef};
