//! Note retrieval by substring term.

use std::sync::Arc;

use tracing::{debug, trace};

use nexus_core::defaults::SEARCH_LIMIT;
use nexus_core::logging::{preview, QUERY_PREVIEW_CHARS};
use nexus_core::{Note, NoteRepository, Result};

/// Finds the notes relevant to a term.
///
/// Relevance is binary: a note either contains the term in its title or body
/// (ignoring case) or it does not. Matches come newest first, at most
/// [`SEARCH_LIMIT`] of them. A blank term lists every note instead.
#[derive(Clone)]
pub struct Retriever {
    notes: Arc<dyn NoteRepository>,
}

impl Retriever {
    pub fn new(notes: Arc<dyn NoteRepository>) -> Self {
        Self { notes }
    }

    pub async fn find_relevant(&self, term: &str) -> Result<Vec<Note>> {
        if term.trim().is_empty() {
            let all = self.notes.list_all().await?;
            debug!(
                subsystem = "rag",
                component = "retrieval",
                op = "list_all",
                result_count = all.len(),
                "Blank term, listing every note"
            );
            return Ok(all);
        }

        let mut matches = self.notes.search(term).await?;
        // the store already caps; keep the bound even for stores that do not
        matches.truncate(SEARCH_LIMIT as usize);

        debug!(
            subsystem = "rag",
            component = "retrieval",
            op = "search",
            query = %preview(term, QUERY_PREVIEW_CHARS),
            result_count = matches.len(),
            "Retrieved notes"
        );
        for note in &matches {
            trace!(note_id = note.id, title = %note.title, "Matched note");
        }

        Ok(matches)
    }
}
