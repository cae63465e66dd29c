//! # nexus-core
//!
//! Core types, traits, and abstractions for the nexus knowledge base.
//!
//! This crate provides the data model, the error taxonomy, and the store and
//! completion traits that the other nexus crates implement or consume.

pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use models::*;
pub use traits::*;
