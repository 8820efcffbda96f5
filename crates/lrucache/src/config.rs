//! Cache configuration

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default number of entries when no capacity is configured
pub const DEFAULT_CAPACITY: usize = 1024;

/// Settings applied when a cache is constructed
///
/// Deserializes with defaults for missing fields, so a host can embed it in
/// its own config file:
///
/// ```
/// let config: lrucache::CacheConfig = serde_json::from_str(r#"{"capacity": 64}"#).unwrap();
/// assert_eq!(config.capacity, 64);
/// assert!(config.record_stats);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of entries
    pub capacity: usize,

    /// Whether the shared cache records hit/miss statistics
    pub record_stats: bool,
}

impl CacheConfig {
    /// Create a config with the given capacity and default settings
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    /// Set the capacity
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Enable or disable statistics
    pub fn with_stats(mut self, record_stats: bool) -> Self {
        self.record_stats = record_stats;
        self
    }

    /// Check the config before building a cache from it
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(Error::ZeroCapacity);
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            record_stats: true,
        }
    }
}
