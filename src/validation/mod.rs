//! Validation Engine
//!
//! Structural checks, type-specific caps and complexity integration.

pub mod checks;
pub mod engine;
pub mod finding;

pub use engine::{validate, validate_with, ValidationResult};
pub use finding::{Category, Finding, Findings, Severity};
