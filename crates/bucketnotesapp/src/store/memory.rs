use super::doc_store::DocStore;
use super::mem_backend::MemBackend;

pub type InMemoryStore = DocStore<MemBackend>;

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        DocStore::with_backend(MemBackend::new())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::{Bucket, Document, Note};
    use crate::store::DataStore;

    pub struct StoreFixture {
        pub store: InMemoryStore,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: InMemoryStore::new(),
            }
        }

        fn edit(self, f: impl FnOnce(&mut Document)) -> Self {
            let snap = self.store.load().unwrap();
            let mut doc = snap.document;
            f(&mut doc);
            self.store.save(&doc, snap.revision).unwrap();
            self
        }

        pub fn with_bucket(self, name: &str, keyword: &str) -> Self {
            self.edit(|doc| doc.buckets.push(Bucket::new(name, keyword)))
        }

        pub fn with_note(self, test_number: &str, text: &str, bucket: &str) -> Self {
            self.edit(|doc| doc.notes.push(Note::new(test_number, text, bucket)))
        }

        /// Adds a note with an explicit timestamp, for ordering tests.
        pub fn with_note_at(
            self,
            test_number: &str,
            bucket: &str,
            timestamp: chrono::DateTime<chrono::Utc>,
        ) -> Self {
            self.edit(|doc| {
                let mut note = Note::new(test_number, "body", bucket);
                note.timestamp = timestamp;
                doc.notes.push(note);
            })
        }

        pub fn document(&self) -> Document {
            self.store.load().unwrap().document
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::StoreFixture;
    use super::*;
    use crate::model::UNCATEGORIZED;
    use crate::store::DataStore;

    #[test]
    fn test_memory_location_is_virtual() {
        let store = InMemoryStore::new();
        assert_eq!(store.location().to_str(), Some("memory://data.json"));
    }

    #[test]
    fn test_fixtures_coverage() {
        let fixture = StoreFixture::default()
            .with_bucket("Regression", "reg")
            .with_note("T1", "<div>a</div>", "Regression")
            .with_note("T2", "b", UNCATEGORIZED);

        let doc = fixture.document();
        assert_eq!(doc.buckets.len(), 2);
        assert_eq!(doc.notes.len(), 2);
        assert_eq!(doc.bucket("Regression").unwrap().keyword, "reg");
        assert_eq!(fixture.store.load().unwrap().revision, 3);
    }
}
