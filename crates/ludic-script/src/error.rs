//! Error types for ludic-script

use thiserror::Error;

/// Program loading error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("RON parse error: {0}")]
    Ron(#[from] ron::error::SpannedError),

    #[error("Engine error: {0}")]
    Core(#[from] ludic_core::Error),

    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Unknown custom action '{name}' in rule '{rule}'")]
    UnknownCustomAction { rule: String, name: String },
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
