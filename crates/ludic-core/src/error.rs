//! Error types for ludic-core

use thiserror::Error;

/// Core error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid pattern for '{name}': {pattern} ({reason})")]
    InvalidPattern {
        name: String,
        pattern: String,
        reason: String,
    },

    #[error("Rule '{rule}' reads '{name}' which is not one of its head atoms")]
    UnboundReference { rule: String, name: String },

    #[error("Rule '{rule}' has no head atoms")]
    EmptyHead { rule: String },

    #[error("Runaway firing: more than {limit} firings in one pump (last rule: {last_rule})")]
    RunawayFiring { limit: usize, last_rule: String },
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
