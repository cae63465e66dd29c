//! Runtime configuration read from the environment.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `DATABASE_URL` | `sqlite://data/nexus.db` |
//! | `NEXUS_IMAGES_DIR` | `data/images` |
//! | `LOG_FORMAT` | `text` (`json` for structured output) |
//! | `LOG_FILE` | unset (stderr only) |
//! | `LOG_ANSI` | auto |
//!
//! Completion settings (`OPENAI_*`) are described on
//! [`CompletionConfig::from_env`].

use std::path::PathBuf;

use nexus_core::defaults::{DATABASE_URL, IMAGES_DIR};
use nexus_inference::CompletionConfig;

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub json: bool,
    pub file: Option<PathBuf>,
    pub ansi: Option<bool>,
}

/// Everything the `nexus` binary needs to start.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub images_dir: PathBuf,
    pub completion: CompletionConfig,
    pub log: LogConfig,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Self {
            database_url: non_blank("DATABASE_URL").unwrap_or_else(|| DATABASE_URL.to_string()),
            images_dir: non_blank("NEXUS_IMAGES_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(IMAGES_DIR)),
            completion: CompletionConfig::from_lookup(&lookup),
            log: LogConfig {
                json: non_blank("LOG_FORMAT").is_some_and(|f| f == "json"),
                file: non_blank("LOG_FILE").map(PathBuf::from),
                ansi: non_blank("LOG_ANSI").map(|v| v == "true" || v == "1"),
            },
        }
    }
}
