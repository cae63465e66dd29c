//! Structured logging conventions for nexus.
//!
//! All crates log through `tracing` with the same structured field names so
//! JSON log output can be queried by the same keys across subsystems:
//!
//! | Field | Meaning |
//! |-------|---------|
//! | `request_id` | UUIDv7 correlating everything done for one question |
//! | `subsystem` | "rag", "db", "inference", "cli" |
//! | `component` | "retrieval", "completion", "pool", "file_storage", ... |
//! | `op` | logical operation: "answer_question", "search", "complete", ... |
//! | `note_id`, `image_id` | entity being operated on |
//! | `query` | search term or question, shortened with [`preview`] |
//! | `result_count`, `image_count` | sizes of retrieved sets |
//! | `prompt_len`, `response_len` | byte lengths of prompt and answer |
//! | `duration_ms` | wall-clock duration, from [`elapsed_ms`] |
//! | `model`, `status` | completion model and upstream HTTP status |
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Operation failed and the caller gets an error |
//! | WARN  | Recoverable issue, fallback applied |
//! | INFO  | Lifecycle events, query completions |
//! | DEBUG | Decision points, sizes, config choices |
//! | TRACE | Per-item iteration (matched notes, images) |

use std::borrow::Cow;
use std::time::Instant;

/// Longest query text written to a log line, in characters.
pub const QUERY_PREVIEW_CHARS: usize = 80;

/// Shorten free text for a log field, cutting on a char boundary.
pub fn preview(text: &str, max_chars: usize) -> Cow<'_, str> {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => Cow::Owned(format!("{}…", &text[..cut])),
        None => Cow::Borrowed(text),
    }
}

/// Milliseconds elapsed since `start`, for the `duration_ms` field.
pub fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}
