//! # nexus-db
//!
//! SQLite storage layer for nexus.
//!
//! This crate provides:
//! - Connection pool management
//! - Embedded schema migrations
//! - Note and image repository implementations
//! - Image file storage
//!
//! ## Example
//!
//! ```rust,ignore
//! use nexus_db::{Database, NoteRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("sqlite://data/nexus.db").await?;
//!
//!     let note = db.notes.insert("Server reboot", "Restart the service weekly").await?;
//!     println!("Created note: {}", note.id);
//!     Ok(())
//! }
//! ```
pub mod file_storage;
pub mod images;
pub mod notes;
pub mod pool;

// Re-export core types
pub use nexus_core::*;

pub use file_storage::ImageFileStore;
pub use images::SqliteImageRepository;
pub use notes::SqliteNoteRepository;
pub use pool::{create_pool, create_pool_with_config, PoolConfig, IN_MEMORY_URL};

/// Escape LIKE wildcard characters (`%`, `_`, `\`) in user input.
pub fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Combined database context with all repositories.
#[derive(Clone)]
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::SqlitePool,
    /// Note repository for CRUD and substring search.
    pub notes: SqliteNoteRepository,
    /// Image reference repository.
    pub images: SqliteImageRepository,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::SqlitePool) -> Self {
        Self {
            notes: SqliteNoteRepository::new(pool.clone()),
            images: SqliteImageRepository::new(pool.clone()),
            pool,
        }
    }

    /// Connect to the given URL and bring the schema up to date.
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_config(url, PoolConfig::default()).await
    }

    /// Create with custom pool configuration.
    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool_with_config(url, config).await?;
        let db = Self::new(pool);
        db.migrate().await?;
        Ok(db)
    }

    /// Fresh, migrated in-memory database (tests and dry runs).
    pub async fn connect_in_memory() -> Result<Self> {
        Self::connect_with_config(IN_MEMORY_URL, PoolConfig::in_memory()).await
    }

    /// Run pending migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like_wildcards() {
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("snake_case"), "snake\\_case");
        assert_eq!(escape_like("C:\\temp"), "C:\\\\temp");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[tokio::test]
    async fn test_migrate_is_idempotent() {
        let db = Database::connect_in_memory().await.unwrap();
        db.migrate().await.unwrap();
    }
}
