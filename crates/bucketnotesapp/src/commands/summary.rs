//! Per-test-number summary.
//!
//! Groups every note by test number. A test number recorded more than once is
//! flagged as a duplicate, which usually means the same failure was filed twice,
//! possibly into different buckets. The CSV export is built from this view.

use crate::error::Result;
use crate::model::Document;
use crate::store::DataStore;
use serde::Serialize;
use std::collections::BTreeMap;

use super::helpers::current;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestNumberSummary {
    pub test_number: String,
    pub count: usize,
    /// Distinct bucket names, in the order they were first seen.
    pub buckets: Vec<String>,
    pub duplicate: bool,
}

/// Summaries sorted by test number.
pub fn test_numbers(doc: &Document) -> Vec<TestNumberSummary> {
    let mut grouped: BTreeMap<&str, TestNumberSummary> = BTreeMap::new();

    for note in &doc.notes {
        let entry = grouped
            .entry(note.test_number.as_str())
            .or_insert_with(|| TestNumberSummary {
                test_number: note.test_number.clone(),
                count: 0,
                buckets: Vec::new(),
                duplicate: false,
            });
        entry.count += 1;
        if !entry.buckets.contains(&note.bucket_name) {
            entry.buckets.push(note.bucket_name.clone());
        }
    }

    grouped
        .into_values()
        .map(|mut s| {
            s.duplicate = s.count > 1;
            s
        })
        .collect()
}

pub fn run<S: DataStore + ?Sized>(store: &S) -> Result<Vec<TestNumberSummary>> {
    Ok(test_numbers(&current(store)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UNCATEGORIZED;
    use crate::store::memory::fixtures::StoreFixture;

    #[test]
    fn empty_document_has_no_test_numbers() {
        let fixture = StoreFixture::new();
        assert!(run(&fixture.store).unwrap().is_empty());
    }

    #[test]
    fn same_test_number_in_two_buckets() {
        let fixture = StoreFixture::new()
            .with_bucket("Regression", "")
            .with_note("T9", "a", "Regression")
            .with_note("T9", "b", UNCATEGORIZED);

        let rows = run(&fixture.store).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].test_number, "T9");
        assert_eq!(rows[0].count, 2);
        assert_eq!(rows[0].buckets, vec!["Regression", UNCATEGORIZED]);
        assert!(rows[0].duplicate);
    }

    #[test]
    fn sorted_by_test_number_with_distinct_buckets() {
        let fixture = StoreFixture::new()
            .with_note("T2", "a", UNCATEGORIZED)
            .with_note("T10", "b", UNCATEGORIZED)
            .with_note("T1", "c", UNCATEGORIZED)
            .with_note("T1", "d", UNCATEGORIZED);

        let rows = run(&fixture.store).unwrap();
        let order: Vec<&str> = rows.iter().map(|r| r.test_number.as_str()).collect();
        assert_eq!(order, vec!["T1", "T10", "T2"]);
        assert_eq!(rows[0].count, 2);
        assert_eq!(rows[0].buckets, vec![UNCATEGORIZED]);
        assert!(!rows[2].duplicate);
    }
}
