//! # nexus-inference
//!
//! Chat completion client for the nexus knowledge base.
//!
//! One prompt in, one answer out: the client renders a fixed request body,
//! posts it with bearer authentication, and scans the raw response for the
//! first `"content":` string value.
//!
//! ## Features
//!
//! - `openai` (default): OpenAI-compatible `/chat/completions` backend
//!
//! ## Example
//!
//! ```rust,ignore
//! use nexus_core::CompletionBackend;
//! use nexus_inference::OpenAIClient;
//!
//! let client = OpenAIClient::from_env()?;
//! let answer = client.complete("Como reinicio o servidor?").await?;
//! ```

pub mod escape;
pub mod extract;

#[cfg(feature = "openai")]
pub mod openai;

pub use escape::escape_json;
pub use extract::extract_answer;

#[cfg(feature = "openai")]
pub use openai::{CompletionConfig, OpenAIClient, UpstreamErrorCode};

// Re-export core types
pub use nexus_core::{CompletionBackend, Error, Result};
