//! Image reference repository implementation.

use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use nexus_core::{CreateImageRequest, Error, ImageRef, ImageRepository, Result};

/// SQLite implementation of ImageRepository.
#[derive(Clone)]
pub struct SqliteImageRepository {
    pool: SqlitePool,
}

impl SqliteImageRepository {
    /// Create a new SqliteImageRepository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn map_row_to_image(row: SqliteRow) -> ImageRef {
    ImageRef {
        id: row.get("id"),
        note_id: row.get("note_id"),
        path: row.get("path"),
        description: row.get("description"),
    }
}

#[async_trait]
impl ImageRepository for SqliteImageRepository {
    async fn list_for_note(&self, note_id: i64) -> Result<Vec<ImageRef>> {
        let rows = sqlx::query(
            "SELECT id, note_id, path, description FROM images WHERE note_id = ? ORDER BY id",
        )
        .bind(note_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;
        Ok(rows.into_iter().map(map_row_to_image).collect())
    }

    async fn insert(&self, req: CreateImageRequest) -> Result<ImageRef> {
        let result = sqlx::query("INSERT INTO images (note_id, path, description) VALUES (?, ?, ?)")
            .bind(req.note_id)
            .bind(&req.path)
            .bind(&req.description)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        let id = result.last_insert_rowid();
        debug!(
            subsystem = "db",
            component = "images",
            op = "insert",
            image_id = id,
            note_id = req.note_id,
            "Image reference stored"
        );

        Ok(ImageRef {
            id,
            note_id: req.note_id,
            path: req.path,
            description: req.description,
        })
    }

    async fn fetch(&self, id: i64) -> Result<ImageRef> {
        sqlx::query("SELECT id, note_id, path, description FROM images WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?
            .map(map_row_to_image)
            .ok_or(Error::ImageNotFound(id))
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM images WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::ImageNotFound(id));
        }
        Ok(())
    }
}
