//! Centralized default constants for nexus.
//!
//! Every crate and the CLI reference these constants instead of defining
//! their own magic numbers.

// =============================================================================
// RETRIEVAL
// =============================================================================

/// Maximum number of notes returned by a substring search.
pub const SEARCH_LIMIT: i64 = 50;

// =============================================================================
// COMPLETION
// =============================================================================

/// Default OpenAI-compatible API base URL.
pub const OPENAI_URL: &str = "https://api.openai.com/v1";

/// Chat completion path appended to the base URL.
pub const CHAT_COMPLETIONS_PATH: &str = "/chat/completions";

/// Default generation model.
pub const GEN_MODEL: &str = "gpt-4.1-mini";

/// Sampling temperature sent with every completion request.
pub const TEMPERATURE: f32 = 0.3;

/// Default request deadline in seconds.
pub const TIMEOUT_SECS: u64 = 300;

// =============================================================================
// STORAGE
// =============================================================================

/// Default SQLite database location.
pub const DATABASE_URL: &str = "sqlite://data/nexus.db";

/// Default directory that attached images are copied into.
pub const IMAGES_DIR: &str = "data/images";
