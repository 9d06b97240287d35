//! # Subject Records
//!
//! Normalization of raw spreadsheet rows into canonical subject records.
//!
//! Alias resolution runs exactly once per record, before any formula sees
//! the data. The anthropometric pipeline only ever reads canonical
//! [`Measure`] codes from a [`SubjectRecord`].
//!
//! ## Leniency Rules
//!
//! - Numbers: locale decimal commas accepted; blank, missing or garbled
//!   cells become NaN and propagate through arithmetic
//! - Dates and sex: strict; failure rejects the whole record

use crate::primitives::{DAYS_PER_YEAR, SPREADSHEET_EPOCH_OFFSET};
use crate::{Sex, SportmetryError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// RAW INPUT
// =============================================================================

/// One raw spreadsheet cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
    Missing,
}

impl RawValue {
    /// A cell is empty when it is missing, contains only whitespace or
    /// holds a non-finite number.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            RawValue::Missing => true,
            RawValue::Text(s) => s.trim().is_empty(),
            RawValue::Number(n) => !n.is_finite(),
        }
    }

    /// Render the cell as a token, integers without a fractional part.
    #[must_use]
    pub fn as_token(&self) -> Option<String> {
        match self {
            RawValue::Missing => None,
            RawValue::Number(n) if !n.is_finite() => None,
            RawValue::Text(s) => Some(s.trim().to_string()),
            RawValue::Number(n) if n.fract() == 0.0 => {
                Some(format!("{}", *n as i64))
            }
            RawValue::Number(n) => Some(n.to_string()),
        }
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

/// One raw row: column header -> cell, exactly as the record source supplied it.
pub type RawRecord = BTreeMap<String, RawValue>;

// =============================================================================
// CANONICAL FIELDS
// =============================================================================

/// Canonical anthropometric measurements (cm, kg, mm for skinfolds).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Measure {
    /// Body mass (TTS), kg.
    Mass,
    /// Stature (TTM), cm.
    Stature,
    /// Sitting height (ÜLŐ), cm.
    SittingHeight,
    /// Triceps skinfold (TR).
    TricepsSkinfold,
    /// Subscapular skinfold (LPR).
    SubscapularSkinfold,
    /// Biceps skinfold (BR).
    BicepsSkinfold,
    /// Supraspinale skinfold (eCSR).
    SupraspinaleSkinfold,
    /// Abdominal skinfold (HR).
    AbdominalSkinfold,
    /// Front thigh skinfold (COR).
    ThighSkinfold,
    /// Medial calf skinfold (MSR).
    CalfSkinfold,
    /// Flexed upper arm girth (FFK).
    ArmGirth,
    /// Forearm girth (AKK).
    ForearmGirth,
    /// Hand girth (KZK).
    HandGirth,
    /// Calf girth (ASK).
    CalfGirth,
    /// Biacromial breadth (VAS).
    BiacromialBreadth,
    /// Humerus breadth (HUS).
    HumerusBreadth,
    /// Femur breadth (TDS).
    FemurBreadth,
}

impl Measure {
    pub const ALL: [Measure; 17] = [
        Measure::Mass,
        Measure::Stature,
        Measure::SittingHeight,
        Measure::TricepsSkinfold,
        Measure::SubscapularSkinfold,
        Measure::BicepsSkinfold,
        Measure::SupraspinaleSkinfold,
        Measure::AbdominalSkinfold,
        Measure::ThighSkinfold,
        Measure::CalfSkinfold,
        Measure::ArmGirth,
        Measure::ForearmGirth,
        Measure::HandGirth,
        Measure::CalfGirth,
        Measure::BiacromialBreadth,
        Measure::HumerusBreadth,
        Measure::FemurBreadth,
    ];

    /// Canonical column code.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Measure::Mass => "TTS",
            Measure::Stature => "TTM",
            Measure::SittingHeight => "ÜLŐ",
            Measure::TricepsSkinfold => "TR",
            Measure::SubscapularSkinfold => "LPR",
            Measure::BicepsSkinfold => "BR",
            Measure::SupraspinaleSkinfold => "eCSR",
            Measure::AbdominalSkinfold => "HR",
            Measure::ThighSkinfold => "COR",
            Measure::CalfSkinfold => "MSR",
            Measure::ArmGirth => "FFK",
            Measure::ForearmGirth => "AKK",
            Measure::HandGirth => "KZK",
            Measure::CalfGirth => "ASK",
            Measure::BiacromialBreadth => "VAS",
            Measure::HumerusBreadth => "HUS",
            Measure::FemurBreadth => "TDS",
        }
    }

    /// Resolve a canonical column code.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|m| m.code() == code)
    }
}

/// Every logical field a record may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Name,
    Sex,
    Sport,
    Team,
    BirthDate,
    MeasurementDate,
    Measure(Measure),
}

impl Field {
    /// Canonical header of the field.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Field::Name => "Név",
            Field::Sex => "Nem",
            Field::Sport => "Sportág",
            Field::Team => "Csapat",
            Field::BirthDate => "Születési dátum",
            Field::MeasurementDate => "Mérés dátuma",
            Field::Measure(m) => m.code(),
        }
    }

    fn from_label(label: &str) -> Option<Self> {
        match label {
            "Név" => Some(Field::Name),
            "Nem" => Some(Field::Sex),
            "Sportág" => Some(Field::Sport),
            "Csapat" => Some(Field::Team),
            "Születési dátum" => Some(Field::BirthDate),
            "Mérés dátuma" => Some(Field::MeasurementDate),
            other => Measure::from_code(other).map(Field::Measure),
        }
    }
}

/// Alternative headers, English and Hungarian, for canonical fields.
pub const FIELD_ALIASES: &[(&str, Field)] = &[
    ("Name", Field::Name),
    ("Sex", Field::Sex),
    ("Gender", Field::Sex),
    ("Sport", Field::Sport),
    ("Team", Field::Team),
    ("Birth date", Field::BirthDate),
    ("Date of birth", Field::BirthDate),
    ("Measurement date", Field::MeasurementDate),
    ("Height", Field::Measure(Measure::Stature)),
    ("Stature", Field::Measure(Measure::Stature)),
    ("Testmagasság", Field::Measure(Measure::Stature)),
    ("Weight", Field::Measure(Measure::Mass)),
    ("Body mass", Field::Measure(Measure::Mass)),
    ("Testsúly", Field::Measure(Measure::Mass)),
    ("Sitting height", Field::Measure(Measure::SittingHeight)),
    ("Sitting Height", Field::Measure(Measure::SittingHeight)),
    ("Sitting height (cm)", Field::Measure(Measure::SittingHeight)),
    ("Ülőmagasság", Field::Measure(Measure::SittingHeight)),
    ("ULO", Field::Measure(Measure::SittingHeight)),
];

/// Extract a trailing parenthesized code: `"Height (TTM)"` -> `"TTM"`.
fn parenthesized_code(header: &str) -> Option<&str> {
    let trimmed = header.trim_end().strip_suffix(')')?;
    let open = trimmed.rfind('(')?;
    let code = trimmed.get(open + 1..)?.trim();
    (!code.is_empty()).then_some(code)
}

/// Resolve every header of a raw record onto canonical fields.
///
/// Precedence: canonical headers, then trailing parenthesized codes, then
/// the alias table. Within one tier the first non-empty cell wins.
#[must_use]
pub fn resolve_aliases(raw: &RawRecord) -> BTreeMap<Field, RawValue> {
    let mut resolved: BTreeMap<Field, RawValue> = BTreeMap::new();

    let mut offer = |field: Field, value: &RawValue| {
        if !value.is_empty() {
            resolved.entry(field).or_insert_with(|| value.clone());
        }
    };

    for (header, value) in raw {
        if let Some(field) = Field::from_label(header.trim()) {
            offer(field, value);
        }
    }
    for (header, value) in raw {
        if let Some(field) = parenthesized_code(header).and_then(Field::from_label) {
            offer(field, value);
        }
    }
    for (header, value) in raw {
        let header = header.trim();
        if let Some((_, field)) = FIELD_ALIASES.iter().find(|(alias, _)| *alias == header) {
            offer(*field, value);
        }
    }

    resolved
}

// =============================================================================
// LENIENT PARSING
// =============================================================================

/// Parse a numeric cell; anything unusable becomes NaN.
///
/// Non-finite values (`inf`, `NaN` text or numbers) count as unusable.
#[must_use]
pub fn parse_number(value: &RawValue) -> f64 {
    let parsed = match value {
        RawValue::Number(n) => *n,
        RawValue::Text(s) => s.trim().replace(',', ".").parse().unwrap_or(f64::NAN),
        RawValue::Missing => f64::NAN,
    };
    if parsed.is_finite() { parsed } else { f64::NAN }
}

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y.%m.%d", "%d.%m.%Y", "%Y/%m/%d", "%d/%m/%Y"];

fn parse_date_text(text: &str) -> Option<NaiveDate> {
    let try_formats = |candidate: &str| {
        DATE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(candidate, fmt).ok())
    };

    let text = text.trim();
    if let Some(date) = try_formats(text) {
        return Some(date);
    }

    // "2010-05-12T00:00:00" / "2010-05-12 00:00:00"
    if let Some(date_part) = text.split(['T', ' ']).next()
        && let Some(date) = try_formats(date_part)
    {
        return Some(date);
    }

    // "2010. 05. 12."
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    try_formats(compact.trim_end_matches('.'))
}

fn parse_date_serial(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 {
        return None;
    }
    let days_since_unix = (serial.floor() as i64).checked_sub(SPREADSHEET_EPOCH_OFFSET)?;
    NaiveDate::from_ymd_opt(1970, 1, 1)?.checked_add_signed(chrono::Duration::try_days(days_since_unix)?)
}

/// Parse a date cell. Numbers are spreadsheet day serials.
pub fn parse_date(field: &str, value: &RawValue) -> Result<NaiveDate, SportmetryError> {
    let parsed = match value {
        RawValue::Text(s) => parse_date_text(s),
        RawValue::Number(n) => parse_date_serial(*n),
        RawValue::Missing => None,
    };
    parsed.ok_or_else(|| SportmetryError::InvalidDate {
        field: field.to_string(),
        raw: value.as_token().unwrap_or_default(),
    })
}

/// Chronological age in years: `|measured - born|` days / 365.25.
#[must_use]
pub fn years_between(born: NaiveDate, measured: NaiveDate) -> f64 {
    (measured - born).num_days().abs() as f64 / DAYS_PER_YEAR
}

// =============================================================================
// CANONICAL RECORD
// =============================================================================

/// Canonical measurement set. Absent measures read as NaN.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Measurements {
    values: BTreeMap<Measure, f64>,
}

impl Measurements {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from (measure, value) pairs.
    #[must_use]
    pub fn from_pairs(pairs: &[(Measure, f64)]) -> Self {
        Self {
            values: pairs.iter().copied().collect(),
        }
    }

    /// Set one measure, replacing any previous value.
    pub fn set(&mut self, measure: Measure, value: f64) {
        self.values.insert(measure, value);
    }

    /// Read one measure; NaN when absent.
    #[must_use]
    pub fn get(&self, measure: Measure) -> f64 {
        self.values.get(&measure).copied().unwrap_or(f64::NAN)
    }

    /// Measures that are absent or NaN, in canonical order.
    #[must_use]
    pub fn missing(&self) -> Vec<Measure> {
        Measure::ALL
            .iter()
            .copied()
            .filter(|m| self.get(*m).is_nan())
            .collect()
    }
}

/// A normalized subject record: identity, dates and canonical measurements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectRecord {
    pub name: Option<String>,
    pub sport: Option<String>,
    pub team: Option<String>,
    pub sex: Sex,
    pub birth_date: NaiveDate,
    pub measurement_date: NaiveDate,
    pub measurements: Measurements,
}

impl SubjectRecord {
    /// Normalize a raw row.
    ///
    /// `sex_override` takes precedence over the record's own sex column.
    pub fn from_raw(raw: &RawRecord, sex_override: Option<&str>) -> Result<Self, SportmetryError> {
        let fields = resolve_aliases(raw);
        let text = |field: Field| fields.get(&field).and_then(RawValue::as_token);

        let sex_token = match sex_override {
            Some(token) => token.to_string(),
            None => text(Field::Sex).unwrap_or_default(),
        };
        let sex = Sex::parse(&sex_token)?;

        let date = |field: Field| {
            parse_date(
                field.label(),
                fields.get(&field).unwrap_or(&RawValue::Missing),
            )
        };
        let birth_date = date(Field::BirthDate)?;
        let measurement_date = date(Field::MeasurementDate)?;

        let mut measurements = Measurements::new();
        for measure in Measure::ALL {
            if let Some(value) = fields.get(&Field::Measure(measure)) {
                measurements.set(measure, parse_number(value));
            }
        }

        Ok(Self {
            name: text(Field::Name),
            sport: text(Field::Sport),
            team: text(Field::Team),
            sex,
            birth_date,
            measurement_date,
            measurements,
        })
    }

    /// Chronological age at the measurement date, in years.
    #[must_use]
    pub fn chronological_age(&self) -> f64 {
        years_between(self.birth_date, self.measurement_date)
    }

    /// Read one canonical measure.
    #[must_use]
    pub fn get(&self, measure: Measure) -> f64 {
        self.measurements.get(measure)
    }
}

// =============================================================================
// TESTS
// =============================================================================
