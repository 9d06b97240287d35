//! # Canonical Report Export
//!
//! Deterministic, bit-exact serialization of engine reports.
//!
//! ```text
//! [header_len: u32 LE] [CanonicalHeader (postcard)] [report body (postcard)]
//! ```
//!
//! The header carries the report kind, an item count and a checksum of the
//! body bytes. Every collection in a report is ordered, so identical inputs
//! always export to identical bytes.

use crate::anthropometry::{CohortReport, SubjectReport};
use crate::sociometry::SociometricReport;
use crate::SportmetryError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

// =============================================================================
// CANONICAL FORMAT
// =============================================================================

/// Magic bytes for canonical export files.
pub const CANONICAL_MAGIC: [u8; 4] = *b"SPMX";

/// Current canonical format version.
pub const CANONICAL_VERSION: u8 = 1;

/// Maximum item count accepted on import.
pub const MAX_IMPORT_ITEM_COUNT: u64 = 1_000_000;

/// What a canonical file contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportKind {
    Cohort,
    Sociogram,
}

impl std::fmt::Display for ReportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportKind::Cohort => write!(f, "cohort"),
            ReportKind::Sociogram => write!(f, "sociogram"),
        }
    }
}

/// Header for canonical export files.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CanonicalHeader {
    pub magic: [u8; 4],
    pub version: u8,
    pub kind: ReportKind,
    /// Subjects of a cohort, members of a sociogram.
    pub item_count: u64,
    /// Checksum of the body bytes.
    pub checksum: u64,
}

impl CanonicalHeader {
    #[must_use]
    pub fn new(kind: ReportKind, item_count: u64, checksum: u64) -> Self {
        Self {
            magic: CANONICAL_MAGIC,
            version: CANONICAL_VERSION,
            kind,
            item_count,
            checksum,
        }
    }

    /// Validate magic, version and size limit.
    pub fn validate(&self) -> Result<(), SportmetryError> {
        if self.magic != CANONICAL_MAGIC {
            return Err(SportmetryError::DeserializationError(
                "Invalid file format".to_string(),
            ));
        }
        if self.version != CANONICAL_VERSION {
            return Err(SportmetryError::DeserializationError(
                "Unsupported file version".to_string(),
            ));
        }
        if self.item_count > MAX_IMPORT_ITEM_COUNT {
            return Err(SportmetryError::DeserializationError(format!(
                "Item count {} exceeds maximum allowed {}",
                self.item_count, MAX_IMPORT_ITEM_COUNT
            )));
        }
        Ok(())
    }
}

/// Rotate-XOR checksum over a byte stream.
///
/// Detects accidental corruption only; not a cryptographic hash.
#[must_use]
pub fn checksum(bytes: &[u8]) -> u64 {
    let mut hash = (bytes.len() as u64).rotate_left(3);
    for byte in bytes {
        hash = hash.rotate_left(5) ^ u64::from(*byte);
    }
    hash
}

// =============================================================================
// EXPORTABLE REPORTS
// =============================================================================

/// A report that has a canonical binary form.
pub trait CanonicalReport: Serialize + DeserializeOwned {
    const KIND: ReportKind;

    /// Number of top-level items, recorded in the header.
    fn item_count(&self) -> u64;
}

/// A failed record, as recorded in a canonical cohort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalFailure {
    pub index: usize,
    pub name: Option<String>,
    pub error: String,
}

/// Serializable form of a [`CohortReport`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalCohort {
    /// Subjects sorted by input index.
    pub subjects: Vec<SubjectReport>,
    /// Failures sorted by input index.
    pub failures: Vec<CanonicalFailure>,
}

impl From<&CohortReport> for CanonicalCohort {
    fn from(report: &CohortReport) -> Self {
        let mut subjects = report.subjects.clone();
        subjects.sort_by_key(|s| s.index);

        let mut failures: Vec<CanonicalFailure> = report
            .failures
            .iter()
            .map(|f| CanonicalFailure {
                index: f.index,
                name: f.name.clone(),
                error: f.error.to_string(),
            })
            .collect();
        failures.sort_by_key(|f| f.index);

        Self { subjects, failures }
    }
}

impl CanonicalReport for CanonicalCohort {
    const KIND: ReportKind = ReportKind::Cohort;

    fn item_count(&self) -> u64 {
        self.subjects.len() as u64
    }
}

impl CanonicalReport for SociometricReport {
    const KIND: ReportKind = ReportKind::Sociogram;

    fn item_count(&self) -> u64 {
        self.members.len() as u64
    }
}

// =============================================================================
// EXPORT / IMPORT
// =============================================================================

/// Export a report to canonical postcard format.
pub fn export_canonical<R: CanonicalReport>(report: &R) -> Result<Vec<u8>, SportmetryError> {
    let body = postcard::to_allocvec(report)
        .map_err(|e| SportmetryError::SerializationError(format!("Body: {}", e)))?;
    let header = CanonicalHeader::new(R::KIND, report.item_count(), checksum(&body));
    let header_bytes = postcard::to_allocvec(&header)
        .map_err(|e| SportmetryError::SerializationError(format!("Header: {}", e)))?;

    let mut result = Vec::with_capacity(4 + header_bytes.len() + body.len());
    result.extend_from_slice(&(header_bytes.len() as u32).to_le_bytes());
    result.extend_from_slice(&header_bytes);
    result.extend_from_slice(&body);
    Ok(result)
}

/// Split a canonical file into its validated header and body bytes.
fn split(data: &[u8]) -> Result<(CanonicalHeader, &[u8]), SportmetryError> {
    let too_short = || SportmetryError::DeserializationError("Data too short".to_string());

    let (len_bytes, rest) = data.split_at_checked(4).ok_or_else(too_short)?;
    let mut len = [0u8; 4];
    len.copy_from_slice(len_bytes);
    let header_len = u32::from_le_bytes(len) as usize;

    let (header_bytes, body) = rest.split_at_checked(header_len).ok_or_else(too_short)?;
    let header: CanonicalHeader = postcard::from_bytes(header_bytes)
        .map_err(|e| SportmetryError::DeserializationError(format!("Header: {}", e)))?;
    header.validate()?;

    let computed = checksum(body);
    if computed != header.checksum {
        return Err(SportmetryError::DeserializationError(format!(
            "Checksum mismatch: expected {}, got {}",
            header.checksum, computed
        )));
    }
    Ok((header, body))
}

/// Validate a canonical file without decoding its body.
pub fn inspect_canonical(data: &[u8]) -> Result<CanonicalHeader, SportmetryError> {
    split(data).map(|(header, _)| header)
}

/// Import a report from canonical postcard format.
pub fn import_canonical<R: CanonicalReport>(data: &[u8]) -> Result<R, SportmetryError> {
    let (header, body) = split(data)?;
    if header.kind != R::KIND {
        return Err(SportmetryError::DeserializationError(format!(
            "Expected a {} report, found {}",
            R::KIND,
            header.kind
        )));
    }

    let report: R = postcard::from_bytes(body)
        .map_err(|e| SportmetryError::DeserializationError(format!("Body: {}", e)))?;
    if report.item_count() != header.item_count {
        return Err(SportmetryError::DeserializationError(
            "Item count mismatch".to_string(),
        ));
    }
    Ok(report)
}

// =============================================================================
// CRYPTOGRAPHIC HASH SUPPORT
// =============================================================================

/// BLAKE3 digest (hex) of canonical export bytes.
#[cfg(feature = "crypto-hash")]
#[must_use]
pub fn canonical_crypto_hash(data: &[u8]) -> String {
    blake3::hash(data).to_hex().to_string()
}

/// Check canonical export bytes against a BLAKE3 hex digest.
#[cfg(feature = "crypto-hash")]
#[must_use]
pub fn verify_crypto_hash(data: &[u8], expected_hash: &str) -> bool {
    canonical_crypto_hash(data).eq_ignore_ascii_case(expected_hash.trim())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::sociometry::{ChoiceResponse, Roster, SociogramRequest, analyze};
    use crate::QuestionId;

    fn sociogram() -> SociometricReport {
        let roster = Roster::new(["A", "B", "C", "D"]).expect("roster");
        let responses = vec![
            ChoiceResponse::new("A").with_choices(QuestionId(1), ["B", "C", "D"]),
            ChoiceResponse::new("B").with_choices(QuestionId(1), ["A", "C", "D"]),
        ];
        let request = SociogramRequest {
            questions: [QuestionId(1)].into_iter().collect(),
            ..SociogramRequest::default()
        };
        analyze(&roster, &responses, &request, &EngineConfig::default()).expect("analyze")
    }

    #[test]
    fn export_is_deterministic() {
        let report = sociogram();
        let first = export_canonical(&report).expect("export");
        let second = export_canonical(&report).expect("export");
        assert_eq!(first, second);
    }

    #[test]
    fn import_restores_report() {
        let report = sociogram();
        let bytes = export_canonical(&report).expect("export");
        let restored: SociometricReport = import_canonical(&bytes).expect("import");
        assert_eq!(restored, report);

        let header = inspect_canonical(&bytes).expect("inspect");
        assert_eq!(header.kind, ReportKind::Sociogram);
        assert_eq!(header.item_count, 4);
    }

    #[test]
    fn corrupted_body_fails_checksum() {
        let mut bytes = export_canonical(&sociogram()).expect("export");
        if let Some(last) = bytes.last_mut() {
            *last ^= 0xFF;
        }
        assert!(matches!(
            inspect_canonical(&bytes),
            Err(SportmetryError::DeserializationError(_))
        ));
    }

    #[test]
    fn wrong_kind_is_rejected() {
        let bytes = export_canonical(&sociogram()).expect("export");
        let result: Result<CanonicalCohort, _> = import_canonical(&bytes);
        assert!(result.is_err());
    }

    #[test]
    fn truncated_input_is_rejected() {
        assert!(inspect_canonical(&[1, 0]).is_err());
        assert!(inspect_canonical(&[200, 0, 0, 0, 1]).is_err());
    }

    #[test]
    fn checksum_depends_on_order() {
        assert_ne!(checksum(&[1, 2]), checksum(&[2, 1]));
        assert_ne!(checksum(&[]), checksum(&[0]));
    }

    #[cfg(feature = "crypto-hash")]
    #[test]
    fn blake3_digest_verifies() {
        let bytes = export_canonical(&sociogram()).expect("export");
        let digest = canonical_crypto_hash(&bytes);
        assert_eq!(digest.len(), 64);
        assert!(verify_crypto_hash(&bytes, &digest.to_uppercase()));
        assert!(!verify_crypto_hash(&bytes[1..], &digest));
    }
}
