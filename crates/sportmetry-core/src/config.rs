//! # Engine Configuration
//!
//! Tunable parameters passed explicitly into every computation. There is
//! no global state: callers build an [`EngineConfig`] (usually deserialized
//! from the application's TOML file) and hand it to the engines.

use crate::primitives::{
    DEFAULT_CORRECTION_CONSTANT, PRIMARY_SIGNIFICANCE, SECONDARY_SIGNIFICANCE,
};
use serde::{Deserialize, Serialize};

/// Top-level configuration for all engines.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub anthropometry: AnthropometryConfig,
    pub reference: ReferenceColumns,
    pub layout: LayoutConfig,
    pub significance: SignificanceConfig,
}

// =============================================================================
// ANTHROPOMETRY
// =============================================================================

/// Constants of the anthropometric pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnthropometryConfig {
    /// Offset blended three times into the raw skeletal-age average.
    pub correction_constant: f64,
}

impl Default for AnthropometryConfig {
    fn default() -> Self {
        Self {
            correction_constant: DEFAULT_CORRECTION_CONSTANT,
        }
    }
}

// =============================================================================
// REFERENCE COLUMNS
// =============================================================================

/// A (key, value) column pair: lookups match on `key` and return `value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnPair {
    pub key: String,
    pub value: String,
}

impl ColumnPair {
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Which reference-table columns feed which lookup.
///
/// Column identity is configuration; nothing is inferred from the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceColumns {
    /// PLX composite -> assigned age.
    pub plx: ColumnPair,
    /// Body mass -> assigned age.
    pub mass: ColumnPair,
    /// Stature -> assigned age.
    pub stature: ColumnPair,
    /// Age -> percentage of adult stature. `None` disables the
    /// predicted adult stature estimate.
    pub percentile: Option<ColumnPair>,
}

impl Default for ReferenceColumns {
    fn default() -> Self {
        Self {
            plx: ColumnPair::new("plx_ref", "age"),
            mass: ColumnPair::new("weight_ref", "age"),
            stature: ColumnPair::new("height_ref", "age"),
            percentile: Some(ColumnPair::new("age", "%")),
        }
    }
}

// =============================================================================
// LAYOUT
// =============================================================================

/// Parameters of the force-directed sociogram layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Fixed number of relaxation steps.
    pub iterations: usize,
    /// Radius of the initial circle.
    pub initial_radius: f64,
    /// Strength of the pairwise repulsion (force = repulsion / distance).
    pub repulsion: f64,
    /// Spring constant pulling connected members toward their target separation.
    pub attraction: f64,
    /// Target separation of a pair with edge weight zero; shrinks as
    /// `base_separation / (1 + weight)`.
    pub base_separation: f64,
    /// Maximum displacement per step at the first iteration; cools linearly.
    pub max_step: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            iterations: 300,
            initial_radius: 1.0,
            repulsion: 0.05,
            attraction: 0.2,
            base_separation: 1.2,
            max_step: 0.1,
        }
    }
}

// =============================================================================
// SIGNIFICANCE
// =============================================================================

/// Score thresholds of the member significance tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignificanceConfig {
    pub primary: u32,
    pub secondary: u32,
}

impl Default for SignificanceConfig {
    fn default() -> Self {
        Self {
            primary: PRIMARY_SIGNIFICANCE,
            secondary: SECONDARY_SIGNIFICANCE,
        }
    }
}
