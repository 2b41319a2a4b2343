//! Domain types and DTOs
//!
//! These types define the data exchanged between the shell, the generators
//! and the LLM provider.

pub mod ai;
pub mod context;
pub mod document;
pub mod request;

// Re-export commonly used types
pub use context::*;
pub use document::*;
pub use request::*;

// Wire types are accessed via crate::domain::ai:: to avoid namespace pollution
