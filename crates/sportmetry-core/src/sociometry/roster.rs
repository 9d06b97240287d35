//! Ordered, case-insensitively unique participant roster.

use crate::primitives::MIN_ROSTER_SIZE;
use crate::{MemberId, SportmetryError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The members of one sociometric measurement.
///
/// Member order is the input order; a [`MemberId`] is a position in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Roster {
    names: Vec<String>,
    /// Lowercased name -> member.
    index: BTreeMap<String, MemberId>,
}

fn fold(name: &str) -> String {
    name.trim().to_lowercase()
}

impl Roster {
    /// Build a roster from raw names.
    ///
    /// Names are trimmed, blanks dropped and case-insensitive duplicates
    /// collapsed onto their first spelling. Fails below the minimum size.
    pub fn new<I, S>(names: I) -> Result<Self, SportmetryError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut roster = Self {
            names: Vec::new(),
            index: BTreeMap::new(),
        };

        for name in names {
            let trimmed = name.as_ref().trim();
            if trimmed.is_empty() {
                continue;
            }
            let key = fold(trimmed);
            if roster.index.contains_key(&key) {
                continue;
            }
            roster.index.insert(key, MemberId(roster.names.len()));
            roster.names.push(trimmed.to_string());
        }

        if roster.names.len() < MIN_ROSTER_SIZE {
            return Err(SportmetryError::RosterTooSmall {
                found: roster.names.len(),
                required: MIN_ROSTER_SIZE,
            });
        }
        Ok(roster)
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// A valid roster is never empty; kept for API symmetry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Resolve a name, case-insensitively.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<MemberId> {
        self.index.get(&fold(name)).copied()
    }

    /// Display name of a member.
    #[must_use]
    pub fn name(&self, id: MemberId) -> Option<&str> {
        self.names.get(id.0).map(String::as_str)
    }

    /// All member ids in roster order.
    pub fn members(&self) -> impl Iterator<Item = MemberId> + '_ {
        (0..self.names.len()).map(MemberId)
    }

    /// All names in roster order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }
}

impl TryFrom<Vec<String>> for Roster {
    type Error = SportmetryError;

    fn try_from(names: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(names)
    }
}

impl From<Roster> for Vec<String> {
    fn from(roster: Roster) -> Self {
        roster.names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_trimmed_and_deduplicated() {
        let roster = Roster::new([" Anna", "bence", "ANNA", "", "Csilla ", "Dani", "  "])
            .expect("roster");
        assert_eq!(roster.names(), &["Anna", "bence", "Csilla", "Dani"]);
        assert_eq!(roster.resolve("anna"), Some(MemberId(0)));
        assert_eq!(roster.resolve(" BENCE "), Some(MemberId(1)));
        assert_eq!(roster.resolve("Ede"), None);
    }

    #[test]
    fn small_roster_is_rejected() {
        let result = Roster::new(["A", "B", "a", "C"]);
        assert_eq!(
            result,
            Err(SportmetryError::RosterTooSmall {
                found: 3,
                required: 4
            })
        );
    }

    #[test]
    fn roster_deserializes_through_validation() {
        let ok: Result<Roster, _> = serde_json::from_str(r#"["A","B","C","D"]"#);
        assert_eq!(ok.map(|r| r.len()).ok(), Some(4));

        let too_small: Result<Roster, _> = serde_json::from_str(r#"["A","B"]"#);
        assert!(too_small.is_err());
    }
}
