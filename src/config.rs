//! Graph configuration.
//!
//! Which field carries the parent relation, how deep queries go when the
//! caller does not say, and how many cycle-detection results are memoized.

use serde::{Deserialize, Serialize};

use crate::canonical::canonical_hash_hex;
use crate::{DEFAULT_MAX_DEPTH, DEFAULT_PARENT_FIELD, LINEAGE_SCHEMA_VERSION};

/// Error type for configuration handling.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The parent field name is empty or whitespace.
    #[error("Parent field name must not be empty")]
    EmptyParentField,
    /// The cycle cache is enabled with zero capacity.
    #[error("Cycle cache is enabled but max_entries is 0")]
    ZeroCacheCapacity,
    /// The configuration document could not be parsed.
    #[error("Invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Configuration for the cycle-detection result cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CycleCacheConfig {
    /// Whether to memoize per-node cycle results.
    pub enabled: bool,
    /// Maximum number of memoized start nodes.
    pub max_entries: usize,
}

impl Default for CycleCacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_entries: 1024,
        }
    }
}

/// Relationship graph configuration.
///
/// ## Parameters
///
/// - `parent_field`: document field whose values declare parents
/// - `max_depth`: generations returned when a query gives no depth
/// - `cycle_cache`: memoization of single-node cycle detection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Field name holding parent references.
    pub parent_field: String,
    /// Default traversal depth.
    pub max_depth: usize,
    /// Cycle cache settings.
    pub cycle_cache: CycleCacheConfig,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            parent_field: DEFAULT_PARENT_FIELD.to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
            cycle_cache: CycleCacheConfig::default(),
        }
    }
}

/// Hashed view of the configuration.
#[derive(Serialize)]
struct ConfigParams<'a> {
    schema_version: &'a str,
    parent_field: &'a str,
    max_depth: usize,
}

impl GraphConfig {
    /// Default configuration tracking `field`.
    pub fn with_parent_field(field: impl Into<String>) -> Self {
        Self {
            parent_field: field.into(),
            ..Self::default()
        }
    }

    /// Set the default traversal depth.
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Disable the cycle cache.
    pub fn without_cycle_cache(mut self) -> Self {
        self.cycle_cache.enabled = false;
        self
    }

    /// Check the configuration for values the graph cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.parent_field.trim().is_empty() {
            return Err(ConfigError::EmptyParentField);
        }
        if self.cycle_cache.enabled && self.cycle_cache.max_entries == 0 {
            return Err(ConfigError::ZeroCacheCapacity);
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration. Missing keys take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Deterministic hash of the settings that affect query results.
    ///
    /// Cache settings are excluded: they never change an answer.
    pub fn params_hash(&self) -> String {
        canonical_hash_hex(&ConfigParams {
            schema_version: LINEAGE_SCHEMA_VERSION,
            parent_field: &self.parent_field,
            max_depth: self.max_depth,
        })
    }
}
