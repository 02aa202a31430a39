use crate::api::NotesApi;
use crate::store::fs::FileStore;
use std::path::PathBuf;
use tempfile::TempDir;

/// A file-backed api in a throwaway directory.
pub struct TestEnv {
    // Keeps the directory alive until the test is done
    pub _temp_dir: TempDir,
    pub api: NotesApi<FileStore>,
    pub root: PathBuf,
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl TestEnv {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("failed to create temp dir");
        let root = temp_dir.path().to_path_buf();
        let api = NotesApi::new(FileStore::new_fs(root.clone()));
        Self {
            _temp_dir: temp_dir,
            api,
            root,
        }
    }

    /// A second api over the same file, as another process would see it.
    pub fn second_client(&self) -> NotesApi<FileStore> {
        NotesApi::new(FileStore::new_fs(self.root.clone()))
    }

    pub fn raw_json(&self) -> serde_json::Value {
        let content = std::fs::read_to_string(self.root.join("data.json")).expect("read data.json");
        serde_json::from_str(&content).expect("parse data.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UNCATEGORIZED;

    #[test]
    fn delete_and_restore_round_trip_on_disk() {
        let env = TestEnv::new();
        env.api.create_bucket("Smoke", "").unwrap();
        env.api.create_note("T1", "x", "Smoke").unwrap();

        env.api.delete_bucket("Smoke").unwrap();
        let raw = env.raw_json();
        assert_eq!(raw["deletedBuckets"][0]["name"], "Smoke");
        assert_eq!(raw["notes"][0]["bucketName"], UNCATEGORIZED);

        env.api.restore_bucket(Some("Smoke"), None).unwrap();
        let raw = env.raw_json();
        assert_eq!(raw["deletedBuckets"].as_array().unwrap().len(), 0);
        assert_eq!(raw["notes"][0]["bucketName"], "Smoke");
        assert_eq!(raw["revision"], 4);
    }

    #[test]
    fn two_clients_never_lose_each_others_writes() {
        let env = TestEnv::new();
        let other = env.second_client();

        env.api.create_bucket("A", "").unwrap();
        other.create_bucket("B", "").unwrap();
        env.api.create_note("T1", "x", "B").unwrap();

        let doc = other.data().unwrap();
        assert!(doc.has_bucket("A"));
        assert!(doc.has_bucket("B"));
        assert_eq!(doc.notes[0].bucket_name, "B");
    }
}
