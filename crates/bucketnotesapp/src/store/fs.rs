use super::doc_store::DocStore;
use super::fs_backend::FsBackend;
use std::path::PathBuf;

pub type FileStore = DocStore<FsBackend>;

impl FileStore {
    /// Store backed by `<root>/data.json`.
    pub fn new_fs(root: PathBuf) -> Self {
        DocStore::with_backend(FsBackend::new(root))
    }

    /// Store backed by `<root>/<file_name>`.
    pub fn with_file(root: PathBuf, file_name: &str) -> Self {
        DocStore::with_backend(FsBackend::new(root).with_file_name(file_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Bucket, Note, UNCATEGORIZED};
    use crate::store::DataStore;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_loads_default() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new_fs(dir.path().to_path_buf());
        let snap = store.load().unwrap();
        assert_eq!(snap.revision, 0);
        assert_eq!(snap.document.buckets[0].name, UNCATEGORIZED);
        assert!(!dir.path().join("data.json").exists());
    }

    #[test]
    fn test_save_writes_pretty_json_with_revision() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new_fs(dir.path().join("nested"));
        let mut doc = store.load().unwrap().document;
        doc.notes.push(Note::new("T1", "x", UNCATEGORIZED));
        store.save(&doc, 0).unwrap();

        let raw = fs::read_to_string(dir.path().join("nested").join("data.json")).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["revision"], 1);
        assert_eq!(json["notes"][0]["testNumber"], "T1");
        assert!(json["deletedBuckets"].as_array().unwrap().is_empty());
        assert!(raw.contains("\n  "));
    }

    #[test]
    fn test_no_tmp_files_left_behind() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new_fs(dir.path().to_path_buf());
        let snap = store.load().unwrap();
        store.save(&snap.document, snap.revision).unwrap();

        for entry in fs::read_dir(dir.path()).unwrap() {
            let path = entry.unwrap().path();
            let name = path.file_name().unwrap().to_str().unwrap().to_string();
            assert!(!name.ends_with(".tmp"), "Found leftover tmp file: {}", name);
        }
    }

    #[test]
    fn test_reads_legacy_file_without_revision() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("data.json"),
            r#"{"buckets":[{"name":"Uncategorized","keyword":""},{"name":"Smoke","keyword":"s"}],"notes":[]}"#,
        )
        .unwrap();
        let store = FileStore::new_fs(dir.path().to_path_buf());
        let snap = store.load().unwrap();
        assert_eq!(snap.revision, 0);
        assert!(snap.document.has_bucket("Smoke"));
        assert!(snap.document.deleted_buckets.is_empty());

        let mut doc = snap.document;
        doc.buckets.push(Bucket::new("New", ""));
        assert_eq!(store.save(&doc, 0).unwrap(), 1);
    }

    #[test]
    fn test_two_stores_on_same_file_detect_each_other() {
        let dir = TempDir::new().unwrap();
        let a = FileStore::new_fs(dir.path().to_path_buf());
        let b = FileStore::new_fs(dir.path().to_path_buf());

        let snap_a = a.load().unwrap();
        let snap_b = b.load().unwrap();
        a.save(&snap_a.document, snap_a.revision).unwrap();
        assert!(b.save(&snap_b.document, snap_b.revision).is_err());
    }

    #[test]
    fn test_custom_file_name() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::with_file(dir.path().to_path_buf(), "notes.json");
        let snap = store.load().unwrap();
        store.save(&snap.document, 0).unwrap();
        assert!(dir.path().join("notes.json").exists());
        assert_eq!(store.location(), dir.path().join("notes.json"));
    }
}
