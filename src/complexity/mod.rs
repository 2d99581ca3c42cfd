//! Complexity Engine
//!
//! detect type -> extract metrics -> weighted score -> level -> recommendations.

pub mod recommend;
pub mod score;

pub use recommend::{generate_recommendations, Recommendation, RecommendationKind};
pub use score::{classify, score, ComplexityResult, Level, Thresholds};

use serde::Serialize;

use crate::diagram::{detect_diagram_type, extract_metrics, DiagramType, MetricSet};

pub const UNDETECTED_TYPE_ERROR: &str = "Could not detect the diagram type";

/// Score, level and the thresholds they were classified against
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplexitySummary {
    pub score: u64,
    pub level: Level,
    pub threshold: Thresholds,
    #[serde(skip)]
    pub raw_score: f64,
}

/// Full complexity analysis of a document with a recognised declaration
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplexityAnalysis {
    pub valid: bool,
    pub diagram_type: DiagramType,
    pub metrics: MetricSet,
    pub complexity: ComplexitySummary,
    pub recommendations: Vec<Recommendation>,
}

/// Outcome of [`check_complexity`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ComplexityReport {
    Analyzed(ComplexityAnalysis),
    /// No declaration was found; no metrics are computed
    Undetected { valid: bool, error: String },
}

impl ComplexityReport {
    pub fn is_valid(&self) -> bool {
        matches!(self, ComplexityReport::Analyzed(_))
    }

    pub fn analysis(&self) -> Option<&ComplexityAnalysis> {
        match self {
            ComplexityReport::Analyzed(analysis) => Some(analysis),
            ComplexityReport::Undetected { .. } => None,
        }
    }

    pub fn level(&self) -> Option<Level> {
        self.analysis().map(|a| a.complexity.level)
    }
}

/// Analyse the complexity of a Mermaid document
pub fn check_complexity(content: &str, thresholds: &Thresholds) -> ComplexityReport {
    let diagram_type = detect_diagram_type(content);

    if !diagram_type.is_detected() {
        log::debug!("complexity check skipped: no diagram declaration");
        return ComplexityReport::Undetected {
            valid: false,
            error: UNDETECTED_TYPE_ERROR.to_string(),
        };
    }

    let metrics = extract_metrics(content, diagram_type);
    let raw_score = score(&metrics, diagram_type);
    let result = ComplexityResult::new(raw_score, thresholds);
    let recommendations = generate_recommendations(raw_score, &metrics, diagram_type, thresholds);

    log::debug!(
        "{} diagram scored {:.1} ({})",
        diagram_type,
        raw_score,
        result.level
    );

    ComplexityReport::Analyzed(ComplexityAnalysis {
        valid: true,
        diagram_type,
        metrics,
        complexity: ComplexitySummary {
            score: result.score,
            level: result.level,
            threshold: *thresholds,
            raw_score,
        },
        recommendations,
    })
}
