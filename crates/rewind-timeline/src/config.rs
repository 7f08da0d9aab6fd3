//! Timeline configuration
//!
//! Configuration is plain data and can be written in RON:
//!
//! ```
//! use rewind_timeline::TimelineConfig;
//!
//! let config = TimelineConfig::from_ron("(max_records: 20, rewind_uses: 5)").unwrap();
//! assert_eq!(config.max_records(), 20);
//! assert_eq!(config.rewind_uses, 5);
//! ```

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Default capacity bound on visible history
pub const DEFAULT_MAX_RECORDS: usize = 64;

/// Default number of rewinds a session may spend
pub const DEFAULT_REWIND_USES: u32 = 3;

/// Configuration for a session timeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// Capacity bound on the record list
    ///
    /// When an append pushes the list past this bound the two oldest
    /// records are compacted into one. Clamped to at least 1.
    max_records: usize,
    /// Initial use-count budget handed to the UI layer
    pub rewind_uses: u32,
}

impl TimelineConfig {
    /// Create a configuration with the given capacity bound
    pub fn with_max_records(max_records: usize) -> Self {
        Self {
            max_records: max_records.max(1),
            ..Self::default()
        }
    }

    /// Parse a configuration from RON text; missing fields take defaults
    pub fn from_ron(text: &str) -> Result<Self> {
        let mut config: TimelineConfig = ron::from_str(text)?;
        config.max_records = config.max_records.max(1);
        Ok(config)
    }

    pub fn max_records(&self) -> usize {
        self.max_records
    }

    /// Set the capacity bound (clamped to at least 1)
    pub fn set_max_records(&mut self, max_records: usize) {
        self.max_records = max_records.max(1);
    }
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            max_records: DEFAULT_MAX_RECORDS,
            rewind_uses: DEFAULT_REWIND_USES,
        }
    }
}
