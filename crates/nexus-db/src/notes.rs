//! Note repository implementation.

use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::{debug, trace};

use nexus_core::defaults::SEARCH_LIMIT;
use nexus_core::{Error, Note, NoteRepository, Result};

use crate::escape_like;

/// SQLite implementation of NoteRepository.
#[derive(Clone)]
pub struct SqliteNoteRepository {
    pool: SqlitePool,
}

impl SqliteNoteRepository {
    /// Create a new SqliteNoteRepository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn map_row_to_note(row: SqliteRow) -> Note {
    Note {
        id: row.get("id"),
        title: row.get("title"),
        body: row.get("body"),
    }
}

#[async_trait]
impl NoteRepository for SqliteNoteRepository {
    async fn insert(&self, title: &str, body: &str) -> Result<Note> {
        let result = sqlx::query("INSERT INTO notes (title, body) VALUES (?, ?)")
            .bind(title)
            .bind(body)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        let id = result.last_insert_rowid();
        debug!(subsystem = "db", component = "notes", op = "insert", note_id = id, "Note stored");

        Ok(Note {
            id,
            title: title.to_string(),
            body: body.to_string(),
        })
    }

    async fn update(&self, note: &Note) -> Result<()> {
        let result = sqlx::query("UPDATE notes SET title = ?, body = ? WHERE id = ?")
            .bind(&note.title)
            .bind(&note.body)
            .bind(note.id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::NoteNotFound(note.id));
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        let images = sqlx::query("DELETE FROM images WHERE note_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;

        let notes = sqlx::query("DELETE FROM notes WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;

        if notes.rows_affected() == 0 {
            tx.rollback().await.map_err(Error::Database)?;
            return Err(Error::NoteNotFound(id));
        }

        tx.commit().await.map_err(Error::Database)?;
        debug!(
            subsystem = "db",
            component = "notes",
            op = "delete",
            note_id = id,
            images_removed = images.rows_affected(),
            "Note deleted"
        );
        Ok(())
    }

    async fn fetch(&self, id: i64) -> Result<Note> {
        sqlx::query("SELECT id, title, body FROM notes WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?
            .map(map_row_to_note)
            .ok_or(Error::NoteNotFound(id))
    }

    /// SQLite `LIKE` folds case for ASCII letters only: `REBOOT` finds
    /// `reboot`, but `ação` does not find `AÇÃO`.
    async fn search(&self, term: &str) -> Result<Vec<Note>> {
        let pattern = format!("%{}%", escape_like(term));
        let rows = sqlx::query(
            "SELECT id, title, body FROM notes \
             WHERE title LIKE ? ESCAPE '\\' OR body LIKE ? ESCAPE '\\' \
             ORDER BY id DESC LIMIT ?",
        )
        .bind(&pattern)
        .bind(&pattern)
        .bind(SEARCH_LIMIT)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        let notes: Vec<Note> = rows.into_iter().map(map_row_to_note).collect();
        trace!(
            subsystem = "db",
            component = "notes",
            op = "search",
            result_count = notes.len(),
            "Substring search complete"
        );
        Ok(notes)
    }

    async fn list_all(&self) -> Result<Vec<Note>> {
        let rows = sqlx::query("SELECT id, title, body FROM notes ORDER BY id DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(rows.into_iter().map(map_row_to_note).collect())
    }
}
