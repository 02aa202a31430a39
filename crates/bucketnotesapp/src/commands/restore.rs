use crate::commands::{CmdMessage, CmdResult, WriteOptions};
use crate::error::{NotesError, Result};
use crate::store::DataStore;
use tracing::info;
use uuid::Uuid;

use super::helpers::mutate;

/// Which deleted bucket to bring back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreTarget {
    /// First deleted entry with exactly this name.
    Name(String),
    /// The deleted entry with this id.
    Id(Uuid),
}

impl RestoreTarget {
    /// Builds a target from loosely-typed client input. An id wins over a name.
    pub fn from_parts(name: Option<&str>, id: Option<Uuid>) -> Result<Self> {
        if let Some(id) = id {
            return Ok(RestoreTarget::Id(id));
        }
        match name {
            Some(name) if !name.trim().is_empty() => Ok(RestoreTarget::Name(name.to_string())),
            _ => Err(NotesError::MissingRestoreTarget),
        }
    }

    fn describe(&self) -> String {
        match self {
            RestoreTarget::Name(name) => name.clone(),
            RestoreTarget::Id(id) => id.to_string(),
        }
    }
}

/// Restores a deleted bucket.
///
/// The bucket is re-added with its original id and keyword, and every live note
/// matching a snapshot note on `(testNumber, timestamp)` is moved back into it.
/// Restoring onto a name that is active again (ignoring case) is refused.
pub fn run<S: DataStore + ?Sized>(
    store: &S,
    options: WriteOptions,
    target: &RestoreTarget,
) -> Result<CmdResult> {
    let ((name, reassigned), document) = mutate(store, options, |doc| {
        let index = doc
            .deleted_buckets
            .iter()
            .position(|d| match target {
                RestoreTarget::Name(name) => &d.name == name,
                RestoreTarget::Id(id) => &d.id == id,
            })
            .ok_or_else(|| NotesError::DeletedBucketNotFound(target.describe()))?;

        let restored = &doc.deleted_buckets[index];
        if let Some(active) = doc.bucket_ignore_case(&restored.name) {
            return Err(NotesError::BucketExists(active.name.clone()));
        }

        let restored = doc.deleted_buckets.remove(index);
        doc.buckets.push(restored.to_bucket());

        let mut reassigned = 0;
        for note in doc.notes.iter_mut() {
            if restored.notes.iter().any(|saved| saved.same_note(note)) {
                note.bucket_name = restored.name.clone();
                reassigned += 1;
            }
        }

        Ok((restored.name, reassigned))
    })?;

    info!(bucket = %name, reassigned, "bucket restored");
    Ok(CmdResult::new(document).with_message(CmdMessage::success(format!(
        "Bucket restored: {} ({} note(s) moved back)",
        name, reassigned
    ))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{create, delete, helpers::current, notes};
    use crate::model::UNCATEGORIZED;
    use crate::store::memory::fixtures::StoreFixture;
    use crate::store::memory::InMemoryStore;

    fn opts() -> WriteOptions {
        WriteOptions::default()
    }

    fn name(n: &str) -> RestoreTarget {
        RestoreTarget::Name(n.to_string())
    }

    #[test]
    fn delete_then_restore_round_trips_membership() {
        let fixture = StoreFixture::new()
            .with_bucket("Regression", "reg")
            .with_note("T1", "a", "Regression")
            .with_note("T2", "b", UNCATEGORIZED)
            .with_note("T3", "c", "Regression");
        let original = fixture.document();

        delete::run(&fixture.store, opts(), "Regression").unwrap();
        let doc = run(&fixture.store, opts(), &name("Regression"))
            .unwrap()
            .document;

        assert!(doc.deleted_buckets.is_empty());
        let restored = doc.bucket("Regression").unwrap();
        assert_eq!(restored.id, original.bucket("Regression").unwrap().id);
        assert_eq!(restored.keyword, "reg");

        let buckets: Vec<&str> = doc.notes.iter().map(|n| n.bucket_name.as_str()).collect();
        assert_eq!(buckets, vec!["Regression", UNCATEGORIZED, "Regression"]);
        assert_eq!(current(&fixture.store).unwrap(), doc);
    }

    #[test]
    fn notes_added_after_delete_stay_uncategorized() {
        let earlier = chrono::Utc::now() - chrono::Duration::minutes(5);
        let fixture = StoreFixture::new()
            .with_bucket("Smoke", "")
            .with_note_at("T1", "Smoke", earlier);
        delete::run(&fixture.store, opts(), "Smoke").unwrap();
        notes::run(&fixture.store, opts(), "T1", "later", UNCATEGORIZED).unwrap();

        let doc = run(&fixture.store, opts(), &name("Smoke")).unwrap().document;
        assert_eq!(doc.notes[0].bucket_name, "Smoke");
        assert_eq!(doc.notes[1].bucket_name, UNCATEGORIZED);
    }

    #[test]
    fn missing_target_is_bad_request() {
        assert!(matches!(
            RestoreTarget::from_parts(Some("  "), None),
            Err(NotesError::MissingRestoreTarget)
        ));
        assert!(matches!(
            RestoreTarget::from_parts(None, None),
            Err(NotesError::MissingRestoreTarget)
        ));
        let id = Uuid::new_v4();
        assert_eq!(
            RestoreTarget::from_parts(Some("x"), Some(id)).unwrap(),
            RestoreTarget::Id(id)
        );
    }

    #[test]
    fn unknown_deleted_bucket_is_not_found() {
        let store = InMemoryStore::new();
        assert!(matches!(
            run(&store, opts(), &name("Ghost")),
            Err(NotesError::DeletedBucketNotFound(_))
        ));
        assert_eq!(store.load().unwrap().revision, 0);
    }

    #[test]
    fn restore_onto_recreated_name_is_refused() {
        let fixture = StoreFixture::new().with_bucket("Regression", "");
        delete::run(&fixture.store, opts(), "Regression").unwrap();
        create::run(&fixture.store, opts(), "regression", "").unwrap();
        let before = fixture.store.load().unwrap();

        assert!(matches!(
            run(&fixture.store, opts(), &name("Regression")),
            Err(NotesError::BucketExists(_))
        ));
        assert_eq!(fixture.store.load().unwrap(), before);
    }

    #[test]
    fn duplicate_deleted_names_restore_first_then_by_id() {
        let fixture = StoreFixture::new()
            .with_bucket("Flaky", "first")
            .with_note("T1", "a", "Flaky");
        delete::run(&fixture.store, opts(), "Flaky").unwrap();
        create::run(&fixture.store, opts(), "Flaky", "second").unwrap();
        notes::run(&fixture.store, opts(), "T2", "b", "Flaky").unwrap();
        delete::run(&fixture.store, opts(), "Flaky").unwrap();

        let doc = fixture.document();
        assert_eq!(doc.deleted_buckets.len(), 2);
        let second_id = doc.deleted_buckets[1].id;

        let doc = run(&fixture.store, opts(), &RestoreTarget::Id(second_id))
            .unwrap()
            .document;
        assert_eq!(doc.bucket("Flaky").unwrap().keyword, "second");
        assert_eq!(doc.deleted_buckets.len(), 1);
        assert_eq!(doc.deleted_buckets[0].keyword, "first");
        assert_eq!(doc.notes[0].bucket_name, UNCATEGORIZED);
        assert_eq!(doc.notes[1].bucket_name, "Flaky");
    }

    #[test]
    fn name_restore_picks_first_entry() {
        let fixture = StoreFixture::new().with_bucket("Flaky", "first");
        delete::run(&fixture.store, opts(), "Flaky").unwrap();
        create::run(&fixture.store, opts(), "Flaky", "second").unwrap();
        delete::run(&fixture.store, opts(), "Flaky").unwrap();

        let doc = run(&fixture.store, opts(), &name("Flaky")).unwrap().document;
        assert_eq!(doc.bucket("Flaky").unwrap().keyword, "first");
    }
}
