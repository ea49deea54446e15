//! Notes subsystem.
//!
//! # Data Flow
//! ```text
//! http handler (INFO scope)
//!     → service.rs (DEBUG scope, not-found checks)
//!     → repository.rs (SQLite, one table)
//!     → model.rs (Note)
//! ```

pub mod model;
pub mod repository;
pub mod service;

pub use model::Note;
pub use repository::{NoteRepository, SqliteNoteRepository};
pub use service::NoteService;
