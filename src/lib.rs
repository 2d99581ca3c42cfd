//! Mermaid Check
//!
//! Heuristic validation and complexity scoring for Mermaid diagram documents.
//!
//! This library provides:
//! - Diagram-type detection and metric extraction
//! - Weighted complexity scoring with split recommendations
//! - Structural validation findings (errors, warnings, info)
//! - A language server publishing those findings as diagnostics

pub mod complexity;
pub mod config;
pub mod diagram;
pub mod lsp;
pub mod output;
pub mod validation;

pub use complexity::{check_complexity, ComplexityReport, Level, Thresholds};
pub use config::Config;
pub use diagram::{detect_diagram_type, extract_metrics, DiagramType, MetricSet};
pub use validation::{validate, validate_with, Finding, ValidationResult};
