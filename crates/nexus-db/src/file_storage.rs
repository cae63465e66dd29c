//! Filesystem storage for image files attached to notes.
//!
//! Imported images are copied into a single directory and named after the
//! owning note plus the import time, keeping the source extension:
//! `{images_dir}/note-{note_id}-{unix_millis}{.ext}`. The returned path is
//! what gets recorded in the `images` table.
//!
//! ## Example
//!
//! ```rust,ignore
//! use nexus_db::ImageFileStore;
//!
//! let store = ImageFileStore::new("data/images");
//! let stored = store.import(Path::new("/tmp/rack.png"), note.id).await?;
//! // stored == "data/images/note-7-1718000000000.png"
//! ```

use std::path::{Path, PathBuf};

use chrono::Utc;
use tokio::fs;
use tracing::{debug, warn};

use nexus_core::{Error, Result};

/// Image file store rooted at one directory.
#[derive(Debug, Clone)]
pub struct ImageFileStore {
    base_path: PathBuf,
}

impl ImageFileStore {
    /// Create a new store that copies files into `base_path`.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Copy `source` into the images directory for `note_id`.
    ///
    /// Returns the stored location, relative when the store root is relative.
    pub async fn import(&self, source: &Path, note_id: i64) -> Result<String> {
        if !fs::try_exists(source).await? {
            return Err(Error::InvalidInput(format!(
                "Image file does not exist: {}",
                source.display()
            )));
        }

        fs::create_dir_all(&self.base_path).await.map_err(|e| {
            warn!(dir = %self.base_path.display(), error = %e, "file_storage: create_dir_all failed");
            e
        })?;

        let file_name = stored_file_name(source, note_id, Utc::now().timestamp_millis());
        let destination = self.base_path.join(&file_name);

        fs::copy(source, &destination).await.map_err(|e| {
            warn!(
                from = %source.display(),
                to = %destination.display(),
                error = %e,
                "file_storage: copy failed"
            );
            e
        })?;

        debug!(
            subsystem = "db",
            component = "file_storage",
            op = "import",
            note_id,
            stored = %destination.display(),
            "Image copied"
        );
        Ok(destination.to_string_lossy().into_owned())
    }

    /// Delete a stored image file. Missing files are not an error.
    pub async fn remove(&self, stored_path: &str) -> Result<()> {
        let full_path = resolve(stored_path)?;
        if fs::try_exists(&full_path).await? {
            fs::remove_file(&full_path).await?;
            debug!(
                subsystem = "db",
                component = "file_storage",
                op = "remove",
                path = %full_path.display(),
                "Image file removed"
            );
        }
        Ok(())
    }
}

/// Turn a stored image path into an absolute one.
///
/// Relative paths are resolved against the current working directory, which
/// is where the default images directory lives.
pub fn resolve(stored_path: &str) -> Result<PathBuf> {
    let path = Path::new(stored_path);
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

/// `note-{id}-{millis}{.ext}`; no extension when the source has none.
fn stored_file_name(source: &Path, note_id: i64, millis: i64) -> String {
    match source.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("note-{}-{}.{}", note_id, millis, ext),
        None => format!("note-{}-{}", note_id, millis),
    }
}
