//! Heath-Carter style somatotype components and body composition.
//!
//! All functions are total over `f64`: NaN inputs and non-positive
//! divisors produce NaN, never infinities.

use crate::primitives::ENDOMORPHY_REFERENCE_STATURE;
use crate::record::{Measure, Measurements};
use crate::Sex;

/// Division that yields NaN for a zero, negative or NaN divisor.
#[must_use]
pub fn guarded_div(numerator: f64, divisor: f64) -> f64 {
    if divisor.is_nan() || divisor <= 0.0 {
        f64::NAN
    } else {
        numerator / divisor
    }
}

/// Skinfold sum over the seven recorded sites.
#[must_use]
pub fn skinfold_sum(m: &Measurements) -> f64 {
    [
        Measure::TricepsSkinfold,
        Measure::SubscapularSkinfold,
        Measure::BicepsSkinfold,
        Measure::SupraspinaleSkinfold,
        Measure::AbdominalSkinfold,
        Measure::ThighSkinfold,
        Measure::CalfSkinfold,
    ]
    .iter()
    .map(|site| m.get(*site))
    .sum()
}

/// Sex-specific linear body-fat estimate from the skinfold sum.
#[must_use]
pub fn body_fat_percent(sex: Sex, skinfold_sum: f64) -> f64 {
    match sex {
        Sex::Boy => 0.1051 * skinfold_sum + 2.585,
        Sex::Girl => 0.1548 * skinfold_sum + 3.58,
    }
}

/// Endomorphy: cubic in the stature-normalized three-site skinfold composite.
#[must_use]
pub fn endomorphy(m: &Measurements) -> f64 {
    let sites = m.get(Measure::TricepsSkinfold)
        + m.get(Measure::SubscapularSkinfold)
        + m.get(Measure::SupraspinaleSkinfold);
    let s = guarded_div(sites * ENDOMORPHY_REFERENCE_STATURE, m.get(Measure::Stature));
    -0.7182 + 0.1451 * s - 0.00068 * s.powi(2) + 0.000_001_4 * s.powi(3)
}

/// Mesomorphy: breadths and skinfold-corrected girths minus a stature term.
#[must_use]
pub fn mesomorphy(m: &Measurements) -> f64 {
    let corrected_arm = m.get(Measure::ArmGirth) - m.get(Measure::TricepsSkinfold) / 10.0;
    let corrected_calf = m.get(Measure::CalfGirth) - m.get(Measure::CalfSkinfold) / 10.0;
    0.858 * m.get(Measure::HumerusBreadth)
        + 0.601 * m.get(Measure::FemurBreadth)
        + 0.188 * corrected_arm
        + 0.161 * corrected_calf
        - 0.131 * m.get(Measure::Stature)
        + 4.5
}

/// Height-weight ratio: stature over the cube root of mass.
#[must_use]
pub fn height_weight_ratio(m: &Measurements) -> f64 {
    let mass = m.get(Measure::Mass);
    let root = if mass > 0.0 { mass.cbrt() } else { f64::NAN };
    guarded_div(m.get(Measure::Stature), root)
}

/// Ectomorphy: piecewise in the height-weight ratio.
#[must_use]
pub fn ectomorphy(hwr: f64) -> f64 {
    if hwr.is_nan() {
        f64::NAN
    } else if hwr > 40.75 {
        0.732 * hwr - 28.58
    } else if hwr > 38.28 {
        0.463 * hwr - 17.63
    } else {
        0.1
    }
}

/// Body-mass index, kg/m².
#[must_use]
pub fn bmi(m: &Measurements) -> f64 {
    let metres = m.get(Measure::Stature) / 100.0;
    let squared = if metres > 0.0 { metres * metres } else { f64::NAN };
    guarded_div(m.get(Measure::Mass), squared)
}

/// Peak-height-velocity estimate (maturity offset, years).
#[must_use]
pub fn peak_height_velocity(sex: Sex, m: &Measurements, chronological_age: f64) -> f64 {
    let stature = m.get(Measure::Stature);
    let sitting = m.get(Measure::SittingHeight);
    let legs = stature - sitting;
    let age = chronological_age;
    let sitting_ratio = guarded_div(sitting, stature);

    match sex {
        Sex::Boy => {
            -9.236 + 0.000_270_8 * (legs * sitting) - 0.001_663 * age * legs
                + 0.007_216 * age * sitting
                + 0.02292 * sitting_ratio
        }
        Sex::Girl => {
            -9.376 + 0.000_188_2 * (legs * sitting) + 0.0022 * age * legs
                + 0.005_841 * age * sitting
                - 0.002_658 * age * sitting
                + 0.07693 * sitting_ratio
        }
    }
}
