use crate::commands::{CmdMessage, WriteOptions};
use crate::error::{NotesError, Result};
use crate::model::{Note, UNCATEGORIZED};
use crate::store::DataStore;
use serde::Serialize;
use tracing::info;

use super::helpers::mutate;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteCreated {
    /// Bucket the note actually landed in.
    pub assigned_bucket: String,
    #[serde(skip)]
    pub note: Note,
    #[serde(skip)]
    pub messages: Vec<CmdMessage>,
}

/// Creates a note. An unknown bucket silently falls back to Uncategorized.
pub fn run<S: DataStore + ?Sized>(
    store: &S,
    options: WriteOptions,
    test_number: &str,
    note_text: &str,
    bucket_name: &str,
) -> Result<NoteCreated> {
    let test_number = test_number.trim();
    let note_text = note_text.trim();
    if test_number.is_empty() || note_text.is_empty() {
        return Err(NotesError::EmptyNote);
    }

    let (note, _) = mutate(store, options, |doc| {
        let assigned = if doc.has_bucket(bucket_name) {
            bucket_name
        } else {
            UNCATEGORIZED
        };
        let note = Note::new(test_number, note_text, assigned);
        doc.notes.push(note.clone());
        Ok(note)
    })?;

    let mut messages = vec![CmdMessage::success(format!(
        "Note for {} filed under {}",
        note.test_number, note.bucket_name
    ))];
    if note.bucket_name != bucket_name {
        info!(
            test_number,
            requested = bucket_name,
            "unknown bucket, note filed under {}",
            UNCATEGORIZED
        );
        messages.push(CmdMessage::warning(format!(
            "No active bucket named '{}'",
            bucket_name
        )));
    }
    info!(test_number, bucket = %note.bucket_name, "note created");

    Ok(NoteCreated {
        assigned_bucket: note.bucket_name.clone(),
        note,
        messages,
    })
}
