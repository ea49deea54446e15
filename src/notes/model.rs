//! Note entity.

use serde::{Deserialize, Serialize};

/// A note as stored in the `note` table and exchanged over the API.
///
/// `id` is `None` until the note has been saved.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Note {
    #[serde(default)]
    pub id: Option<i64>,
    pub title: String,
    pub content: String,
}

impl Note {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            content: content.into(),
        }
    }

    /// Copy of this note carrying `id`.
    pub fn with_id(&self, id: i64) -> Self {
        Self {
            id: Some(id),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_without_id() {
        let note: Note = serde_json::from_str(r#"{"title":"a","content":"b"}"#).unwrap();
        assert_eq!(note, Note::new("a", "b"));
    }

    #[test]
    fn serializes_id() {
        let json = serde_json::to_value(Note::new("a", "b").with_id(4)).unwrap();
        assert_eq!(json, serde_json::json!({"id": 4, "title": "a", "content": "b"}));
    }
}
