//! # Reference Lookup
//!
//! Approximate range lookup against monotonic reference tables, equivalent
//! to a spreadsheet approximate-match lookup:
//!
//! - rows lacking either column are dropped
//! - remaining rows are sorted ascending on the key column (stable, so
//!   duplicate keys keep their table order)
//! - the result is the value of the last row whose key is `<=` the query
//! - a query below every key returns the value of the smallest-key row
//!
//! Tables are immutable once built; any number of concurrent lookups
//! against the same table are safe.

use crate::Sex;
use crate::config::ColumnPair;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// REFERENCE TABLE
// =============================================================================

/// A reference table: ordered rows of named numeric cells.
///
/// Cells may be missing or null; a row only takes part in a lookup when
/// both the key and the value column are present and finite.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReferenceTable {
    rows: Vec<BTreeMap<String, Option<f64>>>,
}

impl ReferenceTable {
    /// Create a table from rows of named cells.
    #[must_use]
    pub fn new(rows: Vec<BTreeMap<String, Option<f64>>>) -> Self {
        Self { rows }
    }

    /// Build a table from a key column and a value column.
    #[must_use]
    pub fn from_pairs(key: &str, value: &str, pairs: &[(f64, f64)]) -> Self {
        let rows = pairs
            .iter()
            .map(|&(k, v)| {
                let mut row = BTreeMap::new();
                row.insert(key.to_string(), Some(k));
                row.insert(value.to_string(), Some(v));
                row
            })
            .collect();
        Self { rows }
    }

    /// Number of rows, including rows with missing cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Check if any row carries the named column.
    #[must_use]
    pub fn has_column(&self, column: &str) -> bool {
        self.rows.iter().any(|row| row.contains_key(column))
    }

    /// Extract the sorted lookup curve for a column pair.
    ///
    /// Returns `None` if no row has both columns.
    #[must_use]
    pub fn curve(&self, key: &str, value: &str) -> Option<LookupCurve> {
        let mut points: Vec<(f64, f64)> = self
            .rows
            .iter()
            .filter_map(|row| {
                let k = (*row.get(key)?)?;
                let v = (*row.get(value)?)?;
                (k.is_finite() && v.is_finite()).then_some((k, v))
            })
            .collect();

        if points.is_empty() {
            return None;
        }

        // Stable: equal keys keep table order, so the last one wins below.
        points.sort_by(|a, b| a.0.total_cmp(&b.0));
        Some(LookupCurve { points })
    }

    /// Approximate lookup through a configured column pair.
    #[must_use]
    pub fn lookup(&self, query: f64, columns: &ColumnPair) -> Option<f64> {
        approx_lookup(query, self, &columns.key, &columns.value)
    }
}

/// A key-sorted sequence of (key, value) points.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupCurve {
    points: Vec<(f64, f64)>,
}

impl LookupCurve {
    /// Find the value of the last point whose key is `<=` the query.
    ///
    /// Queries below the first key fall back to the first point.
    /// A NaN query has no match.
    #[must_use]
    pub fn lookup(&self, query: f64) -> Option<f64> {
        if query.is_nan() {
            return None;
        }
        let upper = self.points.partition_point(|&(key, _)| key <= query);
        let index = upper.saturating_sub(1);
        self.points.get(index).map(|&(_, value)| value)
    }

    /// Number of usable points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the curve has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// `lookup(queryValue, table, keyColumn, valueColumn) -> value | absent`.
///
/// Absent when the query is NaN or no row has both columns present.
#[must_use]
pub fn approx_lookup(query: f64, table: &ReferenceTable, key: &str, value: &str) -> Option<f64> {
    if query.is_nan() {
        return None;
    }
    table.curve(key, value)?.lookup(query)
}

// =============================================================================
// SEX-PARTITIONED TABLES
// =============================================================================

/// The pair of reference tables, one per sex.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReferenceTables {
    pub boys: ReferenceTable,
    pub girls: ReferenceTable,
}

impl ReferenceTables {
    #[must_use]
    pub fn new(boys: ReferenceTable, girls: ReferenceTable) -> Self {
        Self { boys, girls }
    }

    /// Select the table for a sex.
    #[must_use]
    pub fn for_sex(&self, sex: Sex) -> &ReferenceTable {
        match sex {
            Sex::Boy => &self.boys,
            Sex::Girl => &self.girls,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn abc_table() -> ReferenceTable {
        // Values A, B, C encoded as 100, 200, 300.
        ReferenceTable::from_pairs("k", "v", &[(5.0, 200.0), (1.0, 100.0), (10.0, 300.0)])
    }

    #[test]
    fn range_lookup_matches_spreadsheet_semantics() {
        let table = abc_table();
        let cases = [
            (0.0, 100.0),
            (1.0, 100.0),
            (3.0, 100.0),
            (5.0, 200.0),
            (7.0, 200.0),
            (10.0, 300.0),
            (99.0, 300.0),
        ];
        for (query, expected) in cases {
            assert_eq!(approx_lookup(query, &table, "k", "v"), Some(expected), "query {query}");
        }
    }

    #[test]
    fn nan_query_is_absent() {
        assert_eq!(approx_lookup(f64::NAN, &abc_table(), "k", "v"), None);
    }

    #[test]
    fn missing_column_is_absent() {
        assert_eq!(approx_lookup(3.0, &abc_table(), "k", "missing"), None);
        assert_eq!(approx_lookup(3.0, &ReferenceTable::default(), "k", "v"), None);
    }

    #[test]
    fn duplicate_keys_resolve_to_last_occurrence() {
        let table = ReferenceTable::from_pairs("k", "v", &[(1.0, 10.0), (2.0, 20.0), (2.0, 21.0)]);
        assert_eq!(approx_lookup(2.5, &table, "k", "v"), Some(21.0));
    }

    #[test]
    fn rows_with_missing_cells_are_skipped() {
        let mut sparse = BTreeMap::new();
        sparse.insert("k".to_string(), Some(4.0));
        sparse.insert("v".to_string(), None);
        let mut full = BTreeMap::new();
        full.insert("k".to_string(), Some(2.0));
        full.insert("v".to_string(), Some(7.0));
        let table = ReferenceTable::new(vec![sparse, full]);

        assert_eq!(approx_lookup(5.0, &table, "k", "v"), Some(7.0));
        assert_eq!(table.curve("k", "v").map(|c| c.len()), Some(1));
    }

    #[test]
    fn tables_select_by_sex() {
        let tables = ReferenceTables::new(
            ReferenceTable::from_pairs("k", "v", &[(0.0, 1.0)]),
            ReferenceTable::from_pairs("k", "v", &[(0.0, 2.0)]),
        );
        assert_eq!(tables.for_sex(Sex::Boy).lookup(1.0, &ColumnPair::new("k", "v")), Some(1.0));
        assert_eq!(tables.for_sex(Sex::Girl).lookup(1.0, &ColumnPair::new("k", "v")), Some(2.0));
    }

    #[test]
    fn table_deserializes_from_row_objects() {
        let json = r#"[{"age": 10.0, "plx_ref": 80.0, "%": null}, {"age": 11.0, "plx_ref": 84.5}]"#;
        let table: ReferenceTable = serde_json::from_str(json).expect("parse");
        assert_eq!(table.len(), 2);
        assert!(table.has_column("plx_ref"));
        assert_eq!(approx_lookup(85.0, &table, "plx_ref", "age"), Some(11.0));
    }
}
