//! # nexus-rag
//!
//! Question answering over the nexus knowledge base.
//!
//! A question flows through four steps:
//!
//! 1. [`Retriever`] finds the notes containing the question text
//! 2. [`build_context`] lays those notes and their images out as text
//! 3. [`assemble_prompt`] wraps the context in fixed instructions
//! 4. a [`CompletionBackend`](nexus_core::CompletionBackend) answers it
//!
//! [`KnowledgeService`] composes the steps and also carries the note
//! management operations used by front ends.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use nexus_db::Database;
//! use nexus_inference::OpenAIClient;
//! use nexus_rag::KnowledgeService;
//!
//! let db = Database::connect("sqlite://data/nexus.db").await?;
//! let service = KnowledgeService::new(
//!     Arc::new(db.notes.clone()),
//!     Arc::new(db.images.clone()),
//!     Arc::new(OpenAIClient::from_env()?),
//! );
//! let answer = service.answer_question("Como reinicio o servidor?").await?;
//! ```

pub mod context;
pub mod prompt;
pub mod retrieval;
pub mod service;

#[cfg(test)]
mod test_support;

pub use context::{build_context, ContextBlock};
pub use prompt::{assemble_prompt, INSTRUCTIONS};
pub use retrieval::Retriever;
pub use service::KnowledgeService;
