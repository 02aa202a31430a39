use crate::error::Result;
use crate::model::{Document, Note};
use crate::store::DataStore;
use serde::Serialize;

use super::helpers::current;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    /// Bucket to navigate to from the result row.
    pub bucket: String,
    pub note: Note,
}

/// Case-insensitive substring match on test numbers, in insertion order.
/// A blank query matches every note.
pub fn search_notes(doc: &Document, query: &str) -> Vec<SearchHit> {
    let needle = query.trim().to_lowercase();
    doc.notes
        .iter()
        .filter(|n| n.test_number.to_lowercase().contains(&needle))
        .map(|n| SearchHit {
            bucket: n.bucket_name.clone(),
            note: n.clone(),
        })
        .collect()
}

pub fn run<S: DataStore + ?Sized>(store: &S, query: &str) -> Result<Vec<SearchHit>> {
    Ok(search_notes(&current(store)?, query))
}
