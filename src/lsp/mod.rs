//! LSP Protocol Implementation
//!
//! Publishes validation findings as diagnostics and answers hover/completion.

pub mod backend;
pub mod document;
pub mod handlers;
pub mod server;

pub use backend::Backend;
