use crate::commands::WriteOptions;
use crate::error::{NotesError, Result};
use crate::model::Document;
use crate::store::DataStore;
use tracing::debug;

/// Runs `apply` against a fresh copy of the document and persists the result.
///
/// If the store rejects the save because another writer got there first, the
/// whole cycle is repeated from a new read, up to `options.max_attempts` times.
/// An error from `apply` aborts without writing. Returns the value produced by
/// `apply` and the document as it was saved.
pub fn mutate<S, T, F>(store: &S, options: WriteOptions, mut apply: F) -> Result<(T, Document)>
where
    S: DataStore + ?Sized,
    F: FnMut(&mut Document) -> Result<T>,
{
    let attempts = options.max_attempts.max(1);
    let mut last_conflict = None;

    for attempt in 1..=attempts {
        let snapshot = store.load()?;
        let mut document = snapshot.document;
        let value = apply(&mut document)?;

        match store.save(&document, snapshot.revision) {
            Ok(_) => return Ok((value, document)),
            Err(err @ NotesError::Conflict { .. }) => {
                debug!(attempt, error = %err, "write conflict, retrying");
                last_conflict = Some(err);
            }
            Err(err) => return Err(err),
        }
    }

    Err(last_conflict.unwrap_or(NotesError::Store(
        "write abandoned without an attempt".to_string(),
    )))
}

/// Whole document, read without writing.
pub fn current<S: DataStore + ?Sized>(store: &S) -> Result<Document> {
    Ok(store.load()?.document)
}
