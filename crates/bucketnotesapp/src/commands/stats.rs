use crate::error::Result;
use crate::model::Document;
use crate::store::DataStore;
use serde::Serialize;

use super::helpers::current;

/// Note count for one active bucket, the data behind the bar and pie charts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketCount {
    pub name: String,
    pub count: usize,
}

/// Counts per active bucket, in bucket order.
pub fn bucket_counts(doc: &Document) -> Vec<BucketCount> {
    doc.buckets
        .iter()
        .map(|b| BucketCount {
            name: b.name.clone(),
            count: doc.notes_in(&b.name).count(),
        })
        .collect()
}

pub fn run<S: DataStore + ?Sized>(store: &S) -> Result<Vec<BucketCount>> {
    Ok(bucket_counts(&current(store)?))
}
