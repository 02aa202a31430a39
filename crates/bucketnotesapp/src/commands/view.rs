use crate::error::{NotesError, Result};
use crate::model::{Document, Note};
use crate::store::DataStore;

use super::helpers::current;

/// Notes filed under `bucket_name`, oldest first.
pub fn bucket_notes(doc: &Document, bucket_name: &str) -> Vec<Note> {
    let mut notes: Vec<Note> = doc.notes_in(bucket_name).cloned().collect();
    // Stable, so notes with equal timestamps keep insertion order.
    notes.sort_by_key(|n| n.timestamp);
    notes
}

/// Like [`bucket_notes`] but fails for a bucket that is not active.
pub fn run<S: DataStore + ?Sized>(store: &S, bucket_name: &str) -> Result<Vec<Note>> {
    let doc = current(store)?;
    if !doc.has_bucket(bucket_name) {
        return Err(NotesError::BucketNotFound(bucket_name.to_string()));
    }
    Ok(bucket_notes(&doc, bucket_name))
}
