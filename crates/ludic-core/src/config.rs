//! Engine configuration
//!
//! Controls the runaway guard of the evaluation loop and the behavior of
//! text actions. Hosts usually deserialize this from a RON file.

use serde::{Deserialize, Serialize};

#[cfg(feature = "journal")]
use crate::journal::JournalConfig;

/// Default cap on firings within one pump invocation
pub const DEFAULT_MAX_FIRINGS: usize = 1000;

/// Configuration for the engine
///
/// # Example
///
/// ```
/// use ludic_core::EngineConfig;
///
/// let config = EngineConfig::default();
/// assert_eq!(config.max_firings_per_pump(), 1000);
/// assert!(config.beginner_help);
///
/// // The guard never drops below one firing
/// let config = EngineConfig::with_max_firings(0);
/// assert_eq!(config.max_firings_per_pump(), 1);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Firings allowed in one pump before the cycle is halted
    ///
    /// Clamped to at least 1.
    max_firings_per_pump: usize,
    /// Whether `AnnounceHelp` actions speak their text
    pub beginner_help: bool,
    /// Journal settings
    #[cfg(feature = "journal")]
    pub journal: JournalConfig,
}

impl EngineConfig {
    /// Create a configuration with the given firing cap
    pub fn with_max_firings(max: usize) -> Self {
        Self {
            max_firings_per_pump: max.max(1),
            ..Self::default()
        }
    }

    /// Get the firing cap
    pub fn max_firings_per_pump(&self) -> usize {
        self.max_firings_per_pump.max(1)
    }

    /// Set the firing cap (clamped to at least 1)
    pub fn set_max_firings_per_pump(&mut self, max: usize) {
        self.max_firings_per_pump = max.max(1);
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_firings_per_pump: DEFAULT_MAX_FIRINGS,
            beginner_help: true,
            #[cfg(feature = "journal")]
            journal: JournalConfig::default(),
        }
    }
}
