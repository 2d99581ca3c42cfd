//! Diagram Model
//!
//! Diagram-type detection and per-type metric extraction, shared by the
//! complexity and validation engines.

pub mod detect;
pub mod metrics;

pub use detect::{detect_diagram_type, DiagramType};
pub use metrics::{count_nesting, extract_metrics, MetricSet};
