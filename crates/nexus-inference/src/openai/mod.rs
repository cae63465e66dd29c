//! OpenAI-compatible chat completion backend.

mod backend;
mod error;
mod types;

pub use backend::{CompletionConfig, OpenAIClient};
pub use error::UpstreamErrorCode;
pub use types::{ChatCompletionRequest, ChatMessage, ChatRole, SYSTEM_PERSONA};
