//! Categorical classification of derived anthropometric values.
//!
//! Every category is a language-neutral tag. Rendering a tag as text is a
//! presentation concern.

use crate::primitives::{SOMATOTYPE_HIGH, SOMATOTYPE_MODERATE};
use serde::{Deserialize, Serialize};

// =============================================================================
// SKELETAL-AGE CORRECTION
// =============================================================================

/// Map the raw-minus-chronological age delta to a multiplicative correction.
///
/// | delta              | factor |
/// |--------------------|--------|
/// | `< -1.99`          | 1.08   |
/// | `[-1.99, -0.99)`   | 1.05   |
/// | `[-0.99, 0.99]`    | 1.00   |
/// | `(0.99, 1.99]`     | 0.95   |
/// | `> 1.99`           | 0.92   |
///
/// A NaN delta yields a NaN factor.
#[must_use]
pub fn correction_factor(delta: f64) -> f64 {
    if delta.is_nan() {
        f64::NAN
    } else if delta < -1.99 {
        1.08
    } else if delta < -0.99 {
        1.05
    } else if delta <= 0.99 {
        1.00
    } else if delta <= 1.99 {
        0.95
    } else {
        0.92
    }
}

// =============================================================================
// BMI
// =============================================================================

/// Five ordered body-mass-index categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BmiCategory {
    SevereThinness,
    ModerateThinness,
    MildThinness,
    Normal,
    Overweight,
}

impl BmiCategory {
    /// Classify a BMI value; boundary values belong to the higher category.
    #[must_use]
    pub fn classify(bmi: f64) -> Option<Self> {
        if bmi.is_nan() {
            None
        } else if bmi >= 25.0 {
            Some(BmiCategory::Overweight)
        } else if bmi >= 18.0 {
            Some(BmiCategory::Normal)
        } else if bmi >= 17.0 {
            Some(BmiCategory::MildThinness)
        } else if bmi >= 16.0 {
            Some(BmiCategory::ModerateThinness)
        } else {
            Some(BmiCategory::SevereThinness)
        }
    }
}

// =============================================================================
// PEAK HEIGHT VELOCITY
// =============================================================================

/// Proximity to the adolescent growth spurt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhvCategory {
    High,
    Normal,
    Low,
    Undefined,
}

impl PhvCategory {
    #[must_use]
    pub fn classify(phv: f64) -> Self {
        if phv.is_nan() {
            PhvCategory::Undefined
        } else if phv > 1.0 {
            PhvCategory::High
        } else if phv < -1.5 {
            PhvCategory::Low
        } else {
            PhvCategory::Normal
        }
    }
}

// =============================================================================
// SOMATOTYPE
// =============================================================================

/// The three somatotype components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SomatotypeComponent {
    Endomorphy,
    Mesomorphy,
    Ectomorphy,
}

/// Qualitative tier of one somatotype component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SomatotypeTier {
    Low,
    Moderate,
    High,
}

impl SomatotypeTier {
    #[must_use]
    pub fn classify(value: f64) -> Option<Self> {
        if value.is_nan() {
            None
        } else if value >= SOMATOTYPE_HIGH {
            Some(SomatotypeTier::High)
        } else if value >= SOMATOTYPE_MODERATE {
            Some(SomatotypeTier::Moderate)
        } else {
            Some(SomatotypeTier::Low)
        }
    }
}

/// A classified somatotype component: the tag pair a label table keys on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SomatotypeClass {
    pub component: SomatotypeComponent,
    pub tier: SomatotypeTier,
}

impl SomatotypeClass {
    #[must_use]
    pub fn classify(component: SomatotypeComponent, value: f64) -> Option<Self> {
        SomatotypeTier::classify(value).map(|tier| Self { component, tier })
    }
}
