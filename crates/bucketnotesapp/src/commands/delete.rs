use crate::commands::{CmdMessage, CmdResult, WriteOptions};
use crate::error::{NotesError, Result};
use crate::model::{DeletedBucket, Note, UNCATEGORIZED};
use crate::store::DataStore;
use tracing::info;

use super::helpers::mutate;

/// Deletes an active bucket by exact name.
///
/// The bucket's notes are copied into a [`DeletedBucket`] record and then moved
/// to Uncategorized; the bucket itself is removed. All of it lands in one save.
pub fn run<S: DataStore + ?Sized>(
    store: &S,
    options: WriteOptions,
    bucket_name: &str,
) -> Result<CmdResult> {
    if bucket_name == UNCATEGORIZED {
        return Err(NotesError::ProtectedBucket(UNCATEGORIZED.to_string()));
    }

    let (moved, document) = mutate(store, options, |doc| {
        let index = doc
            .buckets
            .iter()
            .position(|b| b.name == bucket_name)
            .ok_or_else(|| NotesError::BucketNotFound(bucket_name.to_string()))?;

        let snapshot: Vec<Note> = doc.notes_in(bucket_name).cloned().collect();
        let moved = snapshot.len();
        doc.deleted_buckets
            .push(DeletedBucket::from_bucket(&doc.buckets[index], snapshot));

        for note in doc.notes.iter_mut().filter(|n| n.bucket_name == bucket_name) {
            note.bucket_name = UNCATEGORIZED.to_string();
        }

        doc.buckets.remove(index);
        Ok(moved)
    })?;

    info!(bucket = bucket_name, moved, "bucket deleted");
    Ok(CmdResult::new(document).with_message(CmdMessage::success(format!(
        "Bucket deleted: {} ({} note(s) moved to {})",
        bucket_name, moved, UNCATEGORIZED
    ))))
}
