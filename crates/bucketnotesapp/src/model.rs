//! # Domain Model: Buckets, Notes and the Document
//!
//! Everything the application knows lives in a single [`Document`]:
//!
//! ```text
//! {
//!   "buckets":        [ { "id", "name", "keyword" } ],
//!   "notes":          [ { "testNumber", "noteText", "bucketName", "timestamp" } ],
//!   "deletedBuckets": [ { "id", "name", "keyword", "deletedAt", "notes": [...] } ]
//! }
//! ```
//!
//! ## Ownership by Name
//!
//! Notes point at their bucket by **name**, not by id. The wire format is shared
//! with the browser client, so the name stays the reference. Buckets still carry
//! a stable [`Uuid`] so a deleted bucket keeps its identity through a restore and
//! can be addressed unambiguously when several deleted entries share a name.
//!
//! ## The Uncategorized Bucket
//!
//! [`UNCATEGORIZED`] is the fallback home for notes. It must always exist:
//! [`Document::ensure_uncategorized`] re-inserts it when a stored document lacks
//! it, and the delete command refuses to remove it.
//!
//! ## Note Identity
//!
//! Notes have no identifier. The `(testNumber, timestamp)` pair is the
//! correlation key used when restoring a deleted bucket ([`Note::same_note`]).
//! Timestamps are truncated to milliseconds at creation and always written with
//! three fractional digits (`2024-03-01T10:15:30.000Z`), the form the browser's
//! `toISOString` produces, so they survive a round trip unchanged.
//!
//! ## Legacy Documents
//!
//! Documents written before buckets had ids parse with nil ids.
//! [`Document::assign_missing_ids`] derives ids for them from kind, position and
//! name, so repeated loads of an unchanged file hand out the same ids.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Name of the bucket that can never be deleted.
pub const UNCATEGORIZED: &str = "Uncategorized";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bucket {
    // Nil until `Document::assign_missing_ids` runs.
    #[serde(default)]
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub keyword: String,
}

impl Bucket {
    pub fn new(name: impl Into<String>, keyword: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            keyword: keyword.into(),
        }
    }

    /// Fixed id, equal to the one a legacy document derives for its first bucket.
    pub fn uncategorized() -> Self {
        Self {
            id: derived_id("bucket", 0, UNCATEGORIZED),
            ..Self::new(UNCATEGORIZED, "")
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub test_number: String,
    /// Rich text as produced by the browser editor (simple `<div>` markup).
    pub note_text: String,
    pub bucket_name: String,
    #[serde(with = "millis")]
    pub timestamp: DateTime<Utc>,
}

impl Note {
    /// Creates a note stamped with the current time.
    pub fn new(
        test_number: impl Into<String>,
        note_text: impl Into<String>,
        bucket_name: impl Into<String>,
    ) -> Self {
        Self {
            test_number: test_number.into(),
            note_text: note_text.into(),
            bucket_name: bucket_name.into(),
            timestamp: Utc::now().trunc_subsecs(3),
        }
    }

    /// True when both records describe the same note.
    pub fn same_note(&self, other: &Note) -> bool {
        self.test_number == other.test_number && self.timestamp == other.timestamp
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedBucket {
    #[serde(default)]
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub keyword: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
    /// Frozen copy of the notes the bucket held when it was deleted.
    #[serde(default)]
    pub notes: Vec<Note>,
}

impl DeletedBucket {
    pub fn from_bucket(bucket: &Bucket, notes: Vec<Note>) -> Self {
        Self {
            id: bucket.id,
            name: bucket.name.clone(),
            keyword: bucket.keyword.clone(),
            deleted_at: Some(Utc::now()),
            notes,
        }
    }

    pub fn to_bucket(&self) -> Bucket {
        Bucket {
            id: self.id,
            name: self.name.clone(),
            keyword: self.keyword.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default)]
    pub buckets: Vec<Bucket>,
    #[serde(default)]
    pub notes: Vec<Note>,
    #[serde(default)]
    pub deleted_buckets: Vec<DeletedBucket>,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            buckets: vec![Bucket::uncategorized()],
            notes: Vec::new(),
            deleted_buckets: Vec::new(),
        }
    }
}

impl Document {
    /// Exact-name lookup among active buckets.
    pub fn bucket(&self, name: &str) -> Option<&Bucket> {
        self.buckets.iter().find(|b| b.name == name)
    }

    pub fn has_bucket(&self, name: &str) -> bool {
        self.bucket(name).is_some()
    }

    /// Case-insensitive lookup, used for uniqueness checks.
    pub fn bucket_ignore_case(&self, name: &str) -> Option<&Bucket> {
        let lower = name.to_lowercase();
        self.buckets.iter().find(|b| b.name.to_lowercase() == lower)
    }

    pub fn notes_in<'a>(&'a self, bucket_name: &'a str) -> impl Iterator<Item = &'a Note> + 'a {
        self.notes.iter().filter(move |n| n.bucket_name == bucket_name)
    }

    /// Re-inserts the Uncategorized bucket at the front if it is missing.
    /// Returns true when the document was changed.
    pub fn ensure_uncategorized(&mut self) -> bool {
        if self.has_bucket(UNCATEGORIZED) {
            return false;
        }
        self.buckets.insert(0, Bucket::uncategorized());
        true
    }

    /// Gives every bucket and deleted bucket with a nil id a name-based id.
    /// The same document always gets the same ids. Returns how many were set.
    pub fn assign_missing_ids(&mut self) -> usize {
        let mut assigned = 0;
        for (index, bucket) in self.buckets.iter_mut().enumerate() {
            if bucket.id.is_nil() {
                bucket.id = derived_id("bucket", index, &bucket.name);
                assigned += 1;
            }
        }
        for (index, entry) in self.deleted_buckets.iter_mut().enumerate() {
            if entry.id.is_nil() {
                entry.id = derived_id("deleted", index, &entry.name);
                assigned += 1;
            }
        }
        assigned
    }

    /// Notes whose bucket is neither active nor Uncategorized.
    pub fn dangling_notes(&self) -> Vec<&Note> {
        self.notes
            .iter()
            .filter(|n| n.bucket_name != UNCATEGORIZED && !self.has_bucket(&n.bucket_name))
            .collect()
    }
}

fn derived_id(kind: &str, index: usize, name: &str) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_OID, format!("bucketnotes:{kind}:{index}:{name}").as_bytes())
}

/// Note timestamps on the wire: RFC 3339, UTC, always three fractional digits.
mod millis {
    use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        DateTime::<Utc>::deserialize(deserializer).map(|ts| ts.trunc_subsecs(3))
    }
}
