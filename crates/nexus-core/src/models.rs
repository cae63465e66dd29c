//! Data models for the knowledge base.

use serde::{Deserialize, Serialize};

/// A titled text record in the knowledge base.
///
/// `id` is assigned by the store on insert and is `0` before persistence.
/// Ids are handed out monotonically, so ordering by id is ordering by
/// creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: i64,
    pub title: String,
    pub body: String,
}

impl Note {
    pub fn is_persisted(&self) -> bool {
        self.id != 0
    }

    /// Case-insensitive substring match against title or body.
    pub fn matches(&self, term: &str) -> bool {
        let needle = term.to_lowercase();
        self.title.to_lowercase().contains(&needle) || self.body.to_lowercase().contains(&needle)
    }
}

/// Metadata linking a note to an attached image file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    pub id: i64,
    pub note_id: i64,
    /// Relative or absolute filesystem location.
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ImageRef {
    /// Description if present and not blank.
    pub fn described(&self) -> Option<&str> {
        self.description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
    }
}

impl std::fmt::Display for ImageRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.described() {
            Some(description) => write!(f, "{} ({})", description, self.path),
            None => f.write_str(&self.path),
        }
    }
}

/// Request for attaching an image to a note.
#[derive(Debug, Clone)]
pub struct CreateImageRequest {
    pub note_id: i64,
    pub path: String,
    pub description: Option<String>,
}
