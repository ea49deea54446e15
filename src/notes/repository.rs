//! Note persistence.
//!
//! # Responsibilities
//! - Map `Note` to the single `note` table
//! - Create the schema on open
//!
//! # Design Decisions
//! - One connection behind a mutex; SQLite serializes writers anyway
//! - `save` inserts when the note has no id and updates otherwise
//! - No transactions beyond the implicit one per statement

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::{NoteError, Result};
use crate::notes::model::Note;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS note (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    content TEXT NOT NULL
)";

/// Storage operations over notes.
pub trait NoteRepository: Send + Sync {
    /// Insert a note without id, or overwrite the row matching its id.
    fn save(&self, note: &Note) -> Result<Note>;

    fn find_by_id(&self, id: i64) -> Result<Option<Note>>;

    /// All notes ordered by id.
    fn find_all(&self) -> Result<Vec<Note>>;

    fn exists_by_id(&self, id: i64) -> Result<bool>;

    fn delete_by_id(&self, id: i64) -> Result<()>;
}

/// SQLite-backed repository.
pub struct SqliteNoteRepository {
    conn: Mutex<Connection>,
}

impl SqliteNoteRepository {
    /// Open (or create) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_connection(Connection::open(path)?)
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute(SCHEMA, [])?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| NoteError::Poisoned)
    }
}

fn note_from_row(row: &Row<'_>) -> rusqlite::Result<Note> {
    Ok(Note {
        id: Some(row.get(0)?),
        title: row.get(1)?,
        content: row.get(2)?,
    })
}

impl NoteRepository for SqliteNoteRepository {
    fn save(&self, note: &Note) -> Result<Note> {
        let conn = self.conn()?;
        match note.id {
            None => {
                conn.execute(
                    "INSERT INTO note (title, content) VALUES (?1, ?2)",
                    params![note.title, note.content],
                )?;
                Ok(note.with_id(conn.last_insert_rowid()))
            }
            Some(id) => {
                let updated = conn.execute(
                    "UPDATE note SET title = ?1, content = ?2 WHERE id = ?3",
                    params![note.title, note.content, id],
                )?;
                if updated == 0 {
                    return Err(NoteError::NotFound);
                }
                Ok(note.clone())
            }
        }
    }

    fn find_by_id(&self, id: i64) -> Result<Option<Note>> {
        let conn = self.conn()?;
        let note = conn
            .query_row(
                "SELECT id, title, content FROM note WHERE id = ?1",
                params![id],
                note_from_row,
            )
            .optional()?;
        Ok(note)
    }

    fn find_all(&self) -> Result<Vec<Note>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT id, title, content FROM note ORDER BY id")?;
        let notes = stmt
            .query_map([], note_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(notes)
    }

    fn exists_by_id(&self, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let exists = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM note WHERE id = ?1)",
            params![id],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    fn delete_by_id(&self, id: i64) -> Result<()> {
        self.conn()?
            .execute("DELETE FROM note WHERE id = ?1", params![id])?;
        Ok(())
    }
}
