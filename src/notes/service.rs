//! Note use cases.
//!
//! Every operation runs inside a `DEBUG` scope so the storage work is
//! bracketed by Started/Finished records carrying the handler's context.
//! Operations are blocking; call them from a blocking thread.

use std::sync::Arc;

use crate::error::{NoteError, Result};
use crate::notes::model::Note;
use crate::notes::repository::NoteRepository;
use crate::mdc_scope;

pub struct NoteService {
    repository: Arc<dyn NoteRepository>,
}

impl NoteService {
    pub fn new(repository: Arc<dyn NoteRepository>) -> Self {
        Self { repository }
    }

    /// Save `note` as a new row. Any id on the input is ignored.
    pub fn create_note(&self, note: Note) -> Result<Note> {
        let mut mdc = mdc_scope!(debug, "creating a new note", "title" => note.title);
        let saved = self.repository.save(&Note { id: None, ..note })?;
        if let Some(id) = saved.id {
            mdc.put("id", id.to_string());
        }
        Ok(saved)
    }

    pub fn get_all_notes(&self) -> Result<Vec<Note>> {
        let mut mdc = mdc_scope!(debug, "fetching all notes");
        let notes = self.repository.find_all()?;
        mdc.put("notes", notes.len().to_string());
        Ok(notes)
    }

    pub fn get_note_by_id(&self, id: i64) -> Result<Note> {
        let _mdc = mdc_scope!(debug, "getting a note");
        self.repository.find_by_id(id)?.ok_or_else(not_found)
    }

    /// Overwrite the note with `id`. Fails with `NotFound` instead of creating it.
    pub fn update_note(&self, id: i64, note: Note) -> Result<Note> {
        let _mdc = mdc_scope!(debug, "updating a note");
        if !self.repository.exists_by_id(id)? {
            return Err(not_found());
        }
        self.repository.save(&note.with_id(id))
    }

    pub fn delete_note(&self, id: i64) -> Result<()> {
        let _mdc = mdc_scope!(debug, "deleting a note");
        if !self.repository.exists_by_id(id)? {
            return Err(not_found());
        }
        self.repository.delete_by_id(id)
    }
}

fn not_found() -> NoteError {
    let err = NoteError::NotFound;
    tracing::error!("{}", err);
    err
}
