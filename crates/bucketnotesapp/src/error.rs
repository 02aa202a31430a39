use thiserror::Error;

#[derive(Error, Debug)]
pub enum NotesError {
    #[error("Bucket name cannot be empty.")]
    EmptyBucketName,

    #[error("Bucket already exists: {0}")]
    BucketExists(String),

    #[error("Cannot remove '{0}'.")]
    ProtectedBucket(String),

    #[error("Bucket not found: {0}")]
    BucketNotFound(String),

    #[error("Bucket name required to restore.")]
    MissingRestoreTarget,

    #[error("Deleted bucket not found: {0}")]
    DeletedBucketNotFound(String),

    #[error("Test Number and Note cannot be empty.")]
    EmptyNote,

    #[error("Note not found: {0}")]
    NoteNotFound(String),

    #[error("Document was modified concurrently (expected revision {expected}, found {found})")]
    Conflict { expected: u64, found: u64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),
}

/// Coarse classification used by clients to pick a status code or exit message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    Internal,
}

impl NotesError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            NotesError::EmptyBucketName
            | NotesError::BucketExists(_)
            | NotesError::ProtectedBucket(_)
            | NotesError::MissingRestoreTarget
            | NotesError::EmptyNote => ErrorKind::Validation,
            NotesError::BucketNotFound(_)
            | NotesError::DeletedBucketNotFound(_)
            | NotesError::NoteNotFound(_) => ErrorKind::NotFound,
            NotesError::Conflict { .. } => ErrorKind::Conflict,
            NotesError::Io(_) | NotesError::Serialization(_) | NotesError::Store(_) => {
                ErrorKind::Internal
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, NotesError>;
