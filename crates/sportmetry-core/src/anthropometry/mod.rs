//! # Anthropometric Metrics Engine
//!
//! Derives a [`MetricsBundle`] from one normalized [`SubjectRecord`].
//!
//! ## Pipeline
//!
//! 1. Chronological age from the two dates
//! 2. PLX composite (forearm girth + hand girth + biacromial breadth)
//! 3. Three sex-specific reference lookups (PLX, mass, stature -> age)
//! 4. Raw skeletal age: `(plx_age + mass_age + stature_age + CA + 3c) / 4`
//! 5. Step-function correction of the raw estimate against CA
//! 6. Predicted adult stature from the percentile-by-age column
//! 7. Skinfold sum and body-fat estimate
//! 8. Somatotype components with their tiers
//! 9. BMI with category
//! 10. Peak-height-velocity estimate with category
//!
//! ## Missing Data
//!
//! A NaN measurement only poisons the fields that consume it. Identity
//! failures (sex, dates) happen earlier, at normalization, and reject the
//! whole record.

pub mod classify;
pub mod somatotype;

pub use classify::{
    BmiCategory, PhvCategory, SomatotypeClass, SomatotypeComponent, SomatotypeTier,
    correction_factor,
};

use crate::config::EngineConfig;
use crate::lookup::{ReferenceTable, ReferenceTables};
use crate::primitives::PERCENTILE_LOOKAHEAD_YEARS;
use crate::record::{Field, Measure, RawRecord, RawValue, SubjectRecord, resolve_aliases};
use crate::{Sex, SportmetryError};
use serde::{Deserialize, Serialize};

// =============================================================================
// METRICS BUNDLE
// =============================================================================

/// The full, immutable output of one anthropometric computation.
///
/// NaN marks a value that could not be computed from the available
/// measurements. `Option` marks lookup-dependent values and categories
/// whose underlying value is NaN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsBundle {
    pub chronological_age: f64,
    pub plx: f64,
    pub plx_age: Option<f64>,
    pub mass_age: Option<f64>,
    pub stature_age: Option<f64>,
    pub raw_skeletal_age: f64,
    pub age_delta: f64,
    pub correction_factor: f64,
    pub skeletal_age: f64,
    pub predicted_adult_stature: Option<f64>,
    pub skinfold_sum: f64,
    pub body_fat_percent: f64,
    pub endomorphy: f64,
    pub endomorphy_class: Option<SomatotypeClass>,
    pub mesomorphy: f64,
    pub mesomorphy_class: Option<SomatotypeClass>,
    pub height_weight_ratio: f64,
    pub ectomorphy: f64,
    pub ectomorphy_class: Option<SomatotypeClass>,
    pub bmi: f64,
    pub bmi_category: Option<BmiCategory>,
    pub phv: f64,
    pub phv_category: PhvCategory,
}

impl MetricsBundle {
    /// Names of fields that came out NaN or unavailable.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let numeric = [
            ("chronological_age", self.chronological_age),
            ("plx", self.plx),
            ("raw_skeletal_age", self.raw_skeletal_age),
            ("age_delta", self.age_delta),
            ("correction_factor", self.correction_factor),
            ("skeletal_age", self.skeletal_age),
            ("skinfold_sum", self.skinfold_sum),
            ("body_fat_percent", self.body_fat_percent),
            ("endomorphy", self.endomorphy),
            ("mesomorphy", self.mesomorphy),
            ("height_weight_ratio", self.height_weight_ratio),
            ("ectomorphy", self.ectomorphy),
            ("bmi", self.bmi),
            ("phv", self.phv),
        ];
        let lookups = [
            ("plx_age", self.plx_age),
            ("mass_age", self.mass_age),
            ("stature_age", self.stature_age),
            ("predicted_adult_stature", self.predicted_adult_stature),
        ];

        numeric
            .iter()
            .filter(|(_, value)| value.is_nan())
            .map(|(name, _)| *name)
            .chain(
                lookups
                    .iter()
                    .filter(|(_, value)| value.is_none())
                    .map(|(name, _)| *name),
            )
            .collect()
    }

    /// Check if every field was computed.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }
}

// =============================================================================
// PIPELINE
// =============================================================================

fn or_nan(value: Option<f64>) -> f64 {
    value.unwrap_or(f64::NAN)
}

/// Stature over the mean of two adult-stature percentiles around the
/// skeletal age. Unavailable without a configured percentile column, or
/// when either percentile is absent or non-positive.
fn predicted_adult_stature(
    table: &ReferenceTable,
    config: &EngineConfig,
    skeletal_age: f64,
    stature: f64,
) -> Option<f64> {
    let columns = config.reference.percentile.as_ref()?;
    let current = table.lookup(skeletal_age, columns)?;
    let ahead = table.lookup(skeletal_age + PERCENTILE_LOOKAHEAD_YEARS, columns)?;
    if current <= 0.0 || ahead <= 0.0 {
        return None;
    }
    let estimate = stature * 100.0 / ((current + ahead) / 2.0);
    estimate.is_finite().then_some(estimate)
}

/// Run the full pipeline for one subject.
///
/// Infallible: every structural check already happened when the record
/// was normalized.
#[must_use]
pub fn compute_metrics(
    record: &SubjectRecord,
    tables: &ReferenceTables,
    config: &EngineConfig,
) -> MetricsBundle {
    let m = &record.measurements;
    let table = tables.for_sex(record.sex);
    let columns = &config.reference;

    let chronological_age = record.chronological_age();
    let plx = m.get(Measure::ForearmGirth) + m.get(Measure::HandGirth)
        + m.get(Measure::BiacromialBreadth);

    let plx_age = table.lookup(plx, &columns.plx);
    let mass_age = table.lookup(m.get(Measure::Mass), &columns.mass);
    let stature_age = table.lookup(m.get(Measure::Stature), &columns.stature);

    let c = config.anthropometry.correction_constant;
    let raw_skeletal_age = (or_nan(plx_age) + or_nan(mass_age) + or_nan(stature_age)
        + chronological_age
        + 3.0 * c)
        / 4.0;
    let age_delta = raw_skeletal_age - chronological_age;
    let factor = correction_factor(age_delta);
    let skeletal_age = raw_skeletal_age * factor;

    let predicted_adult_stature =
        predicted_adult_stature(table, config, skeletal_age, m.get(Measure::Stature));

    let skinfold_sum = somatotype::skinfold_sum(m);
    let body_fat_percent = somatotype::body_fat_percent(record.sex, skinfold_sum);

    let endomorphy = somatotype::endomorphy(m);
    let mesomorphy = somatotype::mesomorphy(m);
    let height_weight_ratio = somatotype::height_weight_ratio(m);
    let ectomorphy = somatotype::ectomorphy(height_weight_ratio);

    let bmi = somatotype::bmi(m);
    let phv = somatotype::peak_height_velocity(record.sex, m, chronological_age);

    MetricsBundle {
        chronological_age,
        plx,
        plx_age,
        mass_age,
        stature_age,
        raw_skeletal_age,
        age_delta,
        correction_factor: factor,
        skeletal_age,
        predicted_adult_stature,
        skinfold_sum,
        body_fat_percent,
        endomorphy,
        endomorphy_class: SomatotypeClass::classify(SomatotypeComponent::Endomorphy, endomorphy),
        mesomorphy,
        mesomorphy_class: SomatotypeClass::classify(SomatotypeComponent::Mesomorphy, mesomorphy),
        height_weight_ratio,
        ectomorphy,
        ectomorphy_class: SomatotypeClass::classify(SomatotypeComponent::Ectomorphy, ectomorphy),
        bmi,
        bmi_category: BmiCategory::classify(bmi),
        phv,
        phv_category: PhvCategory::classify(phv),
    }
}

// =============================================================================
// COHORT
// =============================================================================

/// One successfully computed subject of a cohort.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectReport {
    /// Position of the record in the input.
    pub index: usize,
    pub name: Option<String>,
    pub sport: Option<String>,
    pub team: Option<String>,
    pub sex: Sex,
    pub metrics: MetricsBundle,
}

/// A record rejected during normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordFailure {
    pub index: usize,
    pub name: Option<String>,
    pub error: SportmetryError,
}

impl std::fmt::Display for RecordFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.name {
            Some(name) => write!(f, "record {} ({}): {}", self.index, name, self.error),
            None => write!(f, "record {}: {}", self.index, self.error),
        }
    }
}

/// Result of a batch computation. Failures never abort the batch.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CohortReport {
    pub subjects: Vec<SubjectReport>,
    pub failures: Vec<RecordFailure>,
}

impl CohortReport {
    /// Total number of records processed.
    #[must_use]
    pub fn total(&self) -> usize {
        self.subjects.len() + self.failures.len()
    }
}

/// Normalize and compute one raw record.
pub fn compute_record(
    index: usize,
    raw: &RawRecord,
    sex_override: Option<&str>,
    tables: &ReferenceTables,
    config: &EngineConfig,
) -> Result<SubjectReport, RecordFailure> {
    let record = SubjectRecord::from_raw(raw, sex_override).map_err(|error| RecordFailure {
        index,
        name: resolve_aliases(raw)
            .get(&Field::Name)
            .and_then(RawValue::as_token),
        error,
    })?;

    let metrics = compute_metrics(&record, tables, config);
    Ok(SubjectReport {
        index,
        name: record.name,
        sport: record.sport,
        team: record.team,
        sex: record.sex,
        metrics,
    })
}

/// Compute every record of a cohort, collecting per-record failures.
#[must_use]
pub fn compute_cohort(
    records: &[RawRecord],
    tables: &ReferenceTables,
    config: &EngineConfig,
) -> CohortReport {
    let mut report = CohortReport::default();
    for (index, raw) in records.iter().enumerate() {
        match compute_record(index, raw, None, tables, config) {
            Ok(subject) => report.subjects.push(subject),
            Err(failure) => report.failures.push(failure),
        }
    }
    report
}

// =============================================================================
// TESTS
// =============================================================================
