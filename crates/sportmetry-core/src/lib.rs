//! # sportmetry-core
//!
//! The deterministic computation engines of Sportmetry.
//!
//! This crate turns plain measurement records into plain result structures:
//! - `lookup`: spreadsheet-style approximate range lookup on reference tables
//! - `anthropometry`: skeletal age, somatotype, body composition, BMI, PHV
//! - `sociometry`: directed choice networks, their statistics and layout
//! - `questionnaire`: readiness, fear-avoidance and motivation scoring
//!
//! ## Architectural Constraints
//!
//! - Pure and synchronous: NO I/O, NO async, NO logging
//! - No global state: tables, rosters and constants arrive as parameters
//! - `BTreeMap`/`BTreeSet` only, so every output is reproducible
//! - Category outputs are language-neutral tags; rendering is the caller's job

// =============================================================================
// MODULES
// =============================================================================

pub mod anthropometry;
pub mod config;
pub mod export;
pub mod lookup;
pub mod primitives;
pub mod questionnaire;
pub mod record;
pub mod sociometry;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{MemberId, QuestionId, Sex, SportmetryError};

// =============================================================================
// RE-EXPORTS: Engines
// =============================================================================

pub use anthropometry::{
    BmiCategory, CohortReport, MetricsBundle, PhvCategory, RecordFailure, SomatotypeClass,
    SomatotypeComponent, SomatotypeTier, SubjectReport, compute_cohort, compute_metrics,
    compute_record,
};
pub use config::{ColumnPair, EngineConfig, LayoutConfig, ReferenceColumns, SignificanceConfig};
pub use lookup::{ReferenceTable, ReferenceTables, approx_lookup};
pub use questionnaire::{
    FearAvoidanceLevel, ForcedChoiceItem, MotivationLevel, MotivationProfile, MotivationScale,
    ReadinessAnswers, ReadinessReport, score_motivation, score_readiness,
};
pub use record::{Measure, Measurements, RawRecord, RawValue, SubjectRecord};
pub use sociometry::{
    ChoiceGraph, ChoiceResponse, MemberSignificance, NetworkMetrics, Position, Roster,
    SignificanceTier, SociogramRequest, SociometricReport, Submissions, analyze,
};

// =============================================================================
// RE-EXPORTS: Canonical Export
// =============================================================================

pub use export::{
    CanonicalCohort, CanonicalHeader, CanonicalReport, ReportKind, export_canonical,
    import_canonical, inspect_canonical,
};
