//! Core traits for nexus abstractions.
//!
//! These traits define the interfaces that concrete implementations
//! must satisfy, enabling pluggable backends and testability.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::*;

// =============================================================================
// STORE TRAITS
// =============================================================================

/// Repository for note CRUD and substring search.
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// Insert a new note and return it with its assigned id.
    async fn insert(&self, title: &str, body: &str) -> Result<Note>;

    /// Overwrite title and body of an existing note.
    async fn update(&self, note: &Note) -> Result<()>;

    /// Delete a note together with its image references.
    async fn delete(&self, id: i64) -> Result<()>;

    /// Fetch a single note.
    async fn fetch(&self, id: i64) -> Result<Note>;

    /// Case-insensitive substring search over title and body.
    ///
    /// Ordered by descending id and capped at
    /// [`SEARCH_LIMIT`](crate::defaults::SEARCH_LIMIT).
    async fn search(&self, term: &str) -> Result<Vec<Note>>;

    /// Every note, ordered by descending id. Uncapped.
    async fn list_all(&self) -> Result<Vec<Note>>;
}

/// Repository for image references attached to notes.
#[async_trait]
pub trait ImageRepository: Send + Sync {
    /// Images attached to a note, ordered by ascending id.
    async fn list_for_note(&self, note_id: i64) -> Result<Vec<ImageRef>>;

    /// Record a new image reference.
    async fn insert(&self, req: CreateImageRequest) -> Result<ImageRef>;

    /// Fetch a single image reference.
    async fn fetch(&self, id: i64) -> Result<ImageRef>;

    /// Delete an image reference. The file itself is left alone.
    async fn delete(&self, id: i64) -> Result<()>;
}

// =============================================================================
// INFERENCE TRAITS
// =============================================================================

/// Backend answering a single prompt with a chat completion.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Send one prompt and return the extracted answer text.
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Get the model name being used.
    fn model_name(&self) -> &str;
}
