//! Complexity Scoring
//!
//! Fixed per-type linear weights over a [`MetricSet`] and threshold-based
//! level classification.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::diagram::{DiagramType, MetricSet};

pub const DEFAULT_SIMPLE_THRESHOLD: u32 = 25;
pub const DEFAULT_MODERATE_THRESHOLD: u32 = 40;

/// Score boundaries between the complexity levels.
///
/// `moderate` is expected to exceed `simple`; this is not enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thresholds {
    pub simple: u32,
    pub moderate: u32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            simple: DEFAULT_SIMPLE_THRESHOLD,
            moderate: DEFAULT_MODERATE_THRESHOLD,
        }
    }
}

impl Thresholds {
    pub fn new(simple: u32, moderate: u32) -> Self {
        Self { simple, moderate }
    }
}

/// Complexity level of a diagram
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Simple,
    Moderate,
    Complex,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Simple => "simple",
            Level::Moderate => "moderate",
            Level::Complex => "complex",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Score and level of a diagram.
///
/// `score` is the rounded display value; `raw_score` is what the level was
/// classified from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ComplexityResult {
    pub score: u64,
    pub level: Level,
    #[serde(skip)]
    pub raw_score: f64,
}

impl ComplexityResult {
    pub fn new(raw_score: f64, thresholds: &Thresholds) -> Self {
        Self {
            score: raw_score.round() as u64,
            level: classify(raw_score, thresholds),
            raw_score,
        }
    }
}

/// Weighted sum of the metrics relevant to `diagram_type`
pub fn score(metrics: &MetricSet, diagram_type: DiagramType) -> f64 {
    let m = |count: usize| count as f64;

    match diagram_type {
        DiagramType::Class => {
            m(metrics.elements)
                + m(metrics.attributes) * 0.3
                + m(metrics.methods) * 0.3
                + m(metrics.relationships) * 0.5
        }
        DiagramType::Sequence => {
            m(metrics.elements) * 2.0
                + m(metrics.relationships)
                + m(metrics.nesting) * 5.0
                + m(metrics.branches) * 3.0
        }
        DiagramType::State | DiagramType::StateOld => {
            m(metrics.elements) * 1.5 + m(metrics.relationships) + m(metrics.nesting) * 5.0
        }
        DiagramType::Er => {
            m(metrics.elements) * 1.5 + m(metrics.attributes) * 0.3 + m(metrics.relationships)
        }
        DiagramType::Flowchart | DiagramType::Graph => {
            m(metrics.elements)
                + m(metrics.relationships) * 0.8
                + m(metrics.subgraphs) * 3.0
                + m(metrics.branches) * 2.0
        }
        DiagramType::Undetected => 0.0,
    }
}

/// Classify an unrounded score against the thresholds
pub fn classify(score: f64, thresholds: &Thresholds) -> Level {
    if score < f64::from(thresholds.simple) {
        Level::Simple
    } else if score < f64::from(thresholds.moderate) {
        Level::Moderate
    } else {
        Level::Complex
    }
}
