//! Configuration for lifecycle computations.
//!
//! Defaults carry the canonical rates: 16% tax, a 98% payment gate for
//! termination, and a 2% guarantee holdback released after 365 days.

use serde::{Deserialize, Serialize};

/// Configuration for a [`crate::LifecycleEngine`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifecycleConfig {
    /// Tax configuration
    pub tax: TaxConfig,
    /// Termination workflow configuration
    pub termination: TerminationConfig,
    /// Guarantee retention configuration
    pub retention: RetentionConfig,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            tax: TaxConfig::default(),
            termination: TerminationConfig::default(),
            retention: RetentionConfig::default(),
        }
    }
}

impl LifecycleConfig {
    /// Load config from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}

/// Tax configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxConfig {
    /// Flat value-added tax rate applied to the base amount
    pub rate: f64,
}

impl Default for TaxConfig {
    fn default() -> Self {
        Self { rate: 0.16 }
    }
}

/// Termination workflow configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerminationConfig {
    /// Payment-completeness ratio required before the termination
    /// workflow becomes available
    pub threshold: f64,
}

impl Default for TerminationConfig {
    fn default() -> Self {
        Self { threshold: 0.98 }
    }
}

/// Guarantee retention configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetentionConfig {
    /// Share of the tax-inclusive total retained as guarantee
    pub rate: f64,
    /// Days after termination before the holdback becomes releasable
    pub period_days: i64,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            rate: 0.02,
            period_days: 365,
        }
    }
}
