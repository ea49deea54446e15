//! Error types for the notes service

use thiserror::Error;

/// Result type alias for note operations
pub type Result<T> = std::result::Result<T, NoteError>;

/// Main error type for note operations
#[derive(Error, Debug)]
pub enum NoteError {
    /// No note exists with the requested identifier
    #[error("Note not found")]
    NotFound,

    /// SQLite error
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A thread panicked while holding the connection
    #[error("database connection lock poisoned")]
    Poisoned,

    /// The blocking task running the operation failed
    #[error("task failed: {0}")]
    Task(String),
}

impl NoteError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, NoteError::NotFound)
    }
}

impl From<tokio::task::JoinError> for NoteError {
    fn from(err: tokio::task::JoinError) -> Self {
        NoteError::Task(err.to_string())
    }
}
