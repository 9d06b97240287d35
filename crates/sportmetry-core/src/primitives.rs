//! # Fixed Constants
//!
//! Hardcoded constants of the Sportmetry engines.
//!
//! These values are compiled into the binary. Anything a deployment may
//! legitimately tune (the skeletal-age correction constant, reference
//! column names, layout parameters) lives in [`crate::config`] instead.

/// Days per year used to turn a date difference into a chronological age.
pub const DAYS_PER_YEAR: f64 = 365.25;

/// Default correction constant blended into the raw skeletal-age average.
pub const DEFAULT_CORRECTION_CONSTANT: f64 = 0.125;

/// Offset (years) of the second percentile lookup in the adult stature estimate.
pub const PERCENTILE_LOOKAHEAD_YEARS: f64 = 0.25;

/// Reference stature (cm) that normalizes the endomorphy skinfold composite.
pub const ENDOMORPHY_REFERENCE_STATURE: f64 = 170.18;

/// Lower bound for the "high" tier of every somatotype component.
pub const SOMATOTYPE_HIGH: f64 = 5.5;

/// Lower bound for the "moderate" tier of every somatotype component.
pub const SOMATOTYPE_MODERATE: f64 = 2.6;

/// Spreadsheet day serial of 1970-01-01 (serials count from 1899-12-30).
pub const SPREADSHEET_EPOCH_OFFSET: i64 = 25_569;

// =============================================================================
// SOCIOMETRY
// =============================================================================

/// Minimum number of unique names in a roster.
pub const MIN_ROSTER_SIZE: usize = 4;

/// Number of distinct choices each respondent makes per question.
pub const CHOICES_PER_QUESTION: usize = 3;

/// Score at or above which a member is a primary figure of the group.
pub const PRIMARY_SIGNIFICANCE: u32 = 8;

/// Score at or above which a member is a secondary figure of the group.
pub const SECONDARY_SIGNIFICANCE: u32 = 4;

/// Minimum pairwise distance used by the layout, preventing division by zero.
pub const LAYOUT_MIN_DISTANCE: f64 = 1e-6;

// =============================================================================
// QUESTIONNAIRES
// =============================================================================

/// Number of items in the I-PRRS readiness instrument.
pub const IPRRS_ITEM_COUNT: usize = 6;

/// I-PRRS totals strictly above this value count as ready to return.
pub const READINESS_THRESHOLD: u32 = 50;

/// Number of items in the AFAQ fear-avoidance instrument.
pub const AFAQ_ITEM_COUNT: usize = 10;

/// AFAQ totals at or below this value are a low fear-avoidance level.
pub const AFAQ_LOW_MAX: u32 = 20;

/// AFAQ totals at or below this value (and above the low bound) are moderate.
pub const AFAQ_MODERATE_MAX: u32 = 35;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn significance_tiers_are_ordered() {
        assert!(PRIMARY_SIGNIFICANCE > SECONDARY_SIGNIFICANCE);
    }

    #[test]
    fn spreadsheet_epoch_matches_unix_epoch() {
        let epoch = chrono::NaiveDate::from_ymd_opt(1899, 12, 30);
        let unix = chrono::NaiveDate::from_ymd_opt(1970, 1, 1);
        let days = epoch.zip(unix).map(|(e, u)| (u - e).num_days());
        assert_eq!(days, Some(SPREADSHEET_EPOCH_OFFSET));
    }
}
