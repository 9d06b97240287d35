//! # Core Type Definitions
//!
//! This module contains the types shared by every Sportmetry engine:
//! - Identity tokens (`Sex`)
//! - Graph identifiers (`MemberId`, `QuestionId`)
//! - Error types (`SportmetryError`)
//!
//! ## Determinism Guarantees
//!
//! Identifier types implement `Ord` so they can key `BTreeMap`/`BTreeSet`
//! and every iteration order in the engine is reproducible.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// SEX
// =============================================================================

/// Accepted spellings for boys, compared after trimming and lowercasing.
pub const BOY_TOKENS: &[&str] = &[
    "fiú", "fiu", "f", "boy", "b", "m", "male", "1", "ferfi", "férfi",
];

/// Accepted spellings for girls, compared after trimming and lowercasing.
pub const GIRL_TOKENS: &[&str] = &[
    "lány", "lany", "l", "girl", "g", "fem", "female", "0", "2", "no", "nő",
];

/// Sex of a measured subject. Selects the reference table and the
/// sex-specific coefficients of the anthropometric formulas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Boy,
    Girl,
}

impl Sex {
    /// Resolve a raw sex token against the enumerated spellings.
    ///
    /// Returns `SportmetryError::UnknownSex` for anything else; this is a
    /// hard input error because every downstream lookup depends on it.
    pub fn parse(raw: &str) -> Result<Self, SportmetryError> {
        let token = raw.trim().to_lowercase();
        if BOY_TOKENS.contains(&token.as_str()) {
            Ok(Sex::Boy)
        } else if GIRL_TOKENS.contains(&token.as_str()) {
            Ok(Sex::Girl)
        } else {
            Err(SportmetryError::UnknownSex(raw.to_string()))
        }
    }

    /// Check if this is the boys partition.
    #[must_use]
    pub fn is_boy(self) -> bool {
        matches!(self, Sex::Boy)
    }
}

impl std::str::FromStr for Sex {
    type Err = SportmetryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for Sex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sex::Boy => write!(f, "boy"),
            Sex::Girl => write!(f, "girl"),
        }
    }
}

// =============================================================================
// GRAPH IDENTIFIERS
// =============================================================================

/// Position of a member in a roster. Stable for the lifetime of the roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MemberId(pub usize);

/// Index of a question in a sociometric questionnaire.
///
/// Opaque to the engine: callers decide whether indices are 0- or 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QuestionId(pub u32);

impl std::fmt::Display for QuestionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Q{}", self.0)
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the Sportmetry engines.
///
/// - Structurally invalid identity input (sex, dates, roster size) fails fast
/// - Missing or garbled measurements never produce an error; they propagate
///   as NaN through the affected fields only
/// - The engine never panics; all errors are recoverable
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SportmetryError {
    /// The sex token matched none of the accepted spellings.
    #[error("Unknown sex token: {0:?}")]
    UnknownSex(String),

    /// A required date field is missing or cannot be parsed.
    #[error("Invalid date in field '{field}': {raw:?}")]
    InvalidDate { field: String, raw: String },

    /// The roster has fewer unique members than required.
    #[error("Roster too small: {found} unique names, at least {required} required")]
    RosterTooSmall { found: usize, required: usize },

    /// The respondent is not a member of the roster.
    #[error("Unknown respondent: {0}")]
    UnknownRespondent(String),

    /// The respondent has already submitted for this measurement.
    #[error("Respondent has already submitted: {0}")]
    DuplicateSubmission(String),

    /// A submission violates the choice rules for one question.
    #[error("Invalid submission from {respondent} for {question}: {reason}")]
    InvalidSubmission {
        respondent: String,
        question: QuestionId,
        reason: String,
    },

    /// The sympathy and functional question groups share a question.
    #[error("Question {0} belongs to both sympathy and functional groups")]
    OverlappingQuestionGroups(QuestionId),

    /// A questionnaire is missing answers (1-based item indices).
    #[error("Missing answers for items: {0:?}")]
    IncompleteQuestionnaire(Vec<usize>),

    /// A questionnaire answer is outside the accepted range.
    #[error("Invalid answer for item {item}: {reason}")]
    InvalidAnswer { item: usize, reason: String },

    /// A serialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// A deserialization error occurred.
    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),
}

// =============================================================================
// TESTS
// =============================================================================
