//! Identity types for firings

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of one rule firing, unique for the lifetime of an engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FiringId(pub u64);

impl FiringId {
    /// Create a new firing ID
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw ID value
    pub fn raw(&self) -> u64 {
        self.0
    }

    /// The ID that follows this one
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for FiringId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "firing:{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_firing_id() {
        let id = FiringId::new(41).next();
        assert_eq!(id.raw(), 42);
        assert_eq!(format!("{}", id), "firing:42");
    }
}
