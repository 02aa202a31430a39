use crate::commands::{CmdMessage, CmdResult, WriteOptions};
use crate::error::{NotesError, Result};
use crate::model::Bucket;
use crate::store::DataStore;
use tracing::info;

use super::helpers::mutate;

/// Creates a bucket. Names are trimmed and must be unique ignoring case; the
/// keyword is stored as given.
pub fn run<S: DataStore + ?Sized>(
    store: &S,
    options: WriteOptions,
    name: &str,
    keyword: &str,
) -> Result<CmdResult> {
    let name = name.trim();
    if name.is_empty() {
        return Err(NotesError::EmptyBucketName);
    }

    let ((), document) = mutate(store, options, |doc| {
        if let Some(existing) = doc.bucket_ignore_case(name) {
            return Err(NotesError::BucketExists(existing.name.clone()));
        }
        doc.buckets.push(Bucket::new(name, keyword));
        Ok(())
    })?;

    info!(bucket = name, "bucket created");
    Ok(CmdResult::new(document).with_message(CmdMessage::success(format!(
        "Bucket created: {}",
        name
    ))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::helpers::current;
    use crate::model::UNCATEGORIZED;
    use crate::store::memory::InMemoryStore;

    #[test]
    fn appends_bucket_and_returns_full_document() {
        let store = InMemoryStore::new();
        let result = run(&store, WriteOptions::default(), "Regression", "reg").unwrap();

        let names: Vec<&str> = result.document.buckets.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec![UNCATEGORIZED, "Regression"]);
        assert_eq!(result.document.buckets[1].keyword, "reg");
        assert_eq!(current(&store).unwrap(), result.document);
        assert!(result.messages[0].content.contains("Regression"));
    }

    #[test]
    fn trims_name_but_keeps_keyword_verbatim() {
        let store = InMemoryStore::new();
        run(&store, WriteOptions::default(), "  Smoke  ", " smoke, quick ").unwrap();
        let doc = current(&store).unwrap();
        assert_eq!(doc.bucket("Smoke").unwrap().keyword, " smoke, quick ");
    }

    #[test]
    fn empty_name_is_rejected() {
        let store = InMemoryStore::new();
        assert!(matches!(
            run(&store, WriteOptions::default(), "   ", "kw"),
            Err(NotesError::EmptyBucketName)
        ));
        assert_eq!(store.load().unwrap().revision, 0);
    }

    #[test]
    fn duplicate_name_ignoring_case_is_rejected_without_writing() {
        let store = InMemoryStore::new();
        run(&store, WriteOptions::default(), "Regression", "").unwrap();
        let before = store.load().unwrap();

        match run(&store, WriteOptions::default(), "REGRESSION", "other") {
            Err(NotesError::BucketExists(name)) => assert_eq!(name, "Regression"),
            other => panic!("Expected BucketExists, got {:?}", other),
        }

        assert_eq!(store.load().unwrap(), before);
    }

    #[test]
    fn uncategorized_cannot_be_created_twice() {
        let store = InMemoryStore::new();
        assert!(matches!(
            run(&store, WriteOptions::default(), "uncategorized", ""),
            Err(NotesError::BucketExists(_))
        ));
    }
}
