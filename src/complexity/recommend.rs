//! Recommendation Generation
//!
//! Turns a score and raw metric counts into an ordered list of advice.

use serde::Serialize;

use super::score::{classify, Level, Thresholds};
use crate::diagram::{DiagramType, MetricSet};

/// Kind of recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationKind {
    Success,
    Warning,
    Error,
    Suggestion,
}

/// A single piece of advice for the diagram author
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub kind: RecommendationKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}

impl Recommendation {
    fn new(kind: RecommendationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            action: None,
        }
    }

    fn suggestion(message: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            kind: RecommendationKind::Suggestion,
            message: message.into(),
            action: Some(action.into()),
        }
    }
}

/// Per-type caps on raw metric counts, shared with the validation engine
pub mod limits {
    pub const CLASS_ELEMENTS: usize = 12;
    pub const CLASS_ATTRIBUTES_PER_ELEMENT: usize = 5;
    pub const CLASS_RELATIONSHIPS: usize = 15;
    pub const SEQUENCE_ELEMENTS: usize = 7;
    pub const SEQUENCE_NESTING: usize = 2;
    pub const SEQUENCE_RELATIONSHIPS: usize = 15;
    pub const STATE_ELEMENTS: usize = 10;
    pub const STATE_NESTING: usize = 1;
    pub const ER_ELEMENTS: usize = 10;
    pub const ER_ATTRIBUTES_PER_ELEMENT: usize = 8;
    pub const FLOWCHART_ELEMENTS: usize = 15;
    pub const FLOWCHART_SUBGRAPHS: usize = 3;
}

/// Build the recommendation list for a scored diagram.
///
/// The first entry always reflects the overall level. Simple diagrams get
/// only that entry; otherwise every triggered type-specific suggestion
/// follows, in a fixed order.
pub fn generate_recommendations(
    score: f64,
    metrics: &MetricSet,
    diagram_type: DiagramType,
    thresholds: &Thresholds,
) -> Vec<Recommendation> {
    let level = classify(score, thresholds);
    let mut recommendations = vec![level_recommendation(level)];

    if level == Level::Simple {
        return recommendations;
    }

    recommendations.extend(type_suggestions(metrics, diagram_type));
    recommendations
}

fn level_recommendation(level: Level) -> Recommendation {
    match level {
        Level::Simple => Recommendation::new(
            RecommendationKind::Success,
            "Complexity is appropriate. No changes needed.",
        ),
        Level::Moderate => Recommendation::new(
            RecommendationKind::Warning,
            "Complexity is somewhat high. Consider the improvements below.",
        ),
        Level::Complex => Recommendation::new(
            RecommendationKind::Error,
            "Complexity is too high. Splitting the diagram is strongly recommended.",
        ),
    }
}

fn type_suggestions(metrics: &MetricSet, diagram_type: DiagramType) -> Vec<Recommendation> {
    use limits::*;

    let mut out = Vec::new();

    match diagram_type {
        DiagramType::Class => {
            if metrics.elements > CLASS_ELEMENTS {
                out.push(Recommendation::suggestion(
                    format!(
                        "Reduce classes (current: {}, recommended: {} or fewer)",
                        metrics.elements, CLASS_ELEMENTS
                    ),
                    "Group related classes and split them across several diagrams",
                ));
            }
            if metrics.attributes > metrics.elements * CLASS_ATTRIBUTES_PER_ELEMENT {
                out.push(Recommendation::suggestion(
                    format!(
                        "Too many attributes (current: {}, recommended: {} or fewer)",
                        metrics.attributes,
                        metrics.elements * CLASS_ATTRIBUTES_PER_ELEMENT
                    ),
                    "Show only the key attributes and move details to a separate diagram",
                ));
            }
            if metrics.relationships > CLASS_RELATIONSHIPS {
                out.push(Recommendation::suggestion(
                    format!(
                        "Reduce relationships (current: {}, recommended: {} or fewer)",
                        metrics.relationships, CLASS_RELATIONSHIPS
                    ),
                    "Show only the primary relationships",
                ));
            }
        }
        DiagramType::Sequence => {
            if metrics.elements > SEQUENCE_ELEMENTS {
                out.push(Recommendation::suggestion(
                    format!(
                        "Reduce participants (current: {}, recommended: {} or fewer)",
                        metrics.elements, SEQUENCE_ELEMENTS
                    ),
                    "Group related participants or split the scenario",
                ));
            }
            if metrics.nesting > SEQUENCE_NESTING {
                out.push(Recommendation::suggestion(
                    format!(
                        "Reduce nesting (current: {} levels, recommended: {} or fewer)",
                        metrics.nesting, SEQUENCE_NESTING
                    ),
                    "Flatten nested alt/loop/opt blocks",
                ));
            }
            if metrics.relationships > SEQUENCE_RELATIONSHIPS {
                out.push(Recommendation::suggestion(
                    format!(
                        "Reduce messages (current: {}, recommended: {} or fewer)",
                        metrics.relationships, SEQUENCE_RELATIONSHIPS
                    ),
                    "Show only the main message flow",
                ));
            }
        }
        DiagramType::State | DiagramType::StateOld => {
            if metrics.elements > STATE_ELEMENTS {
                out.push(Recommendation::suggestion(
                    format!(
                        "Reduce states (current: {}, recommended: {} or fewer)",
                        metrics.elements, STATE_ELEMENTS
                    ),
                    "Group related states",
                ));
            }
            if metrics.nesting > STATE_NESTING {
                out.push(Recommendation::suggestion(
                    format!(
                        "Reduce nesting (current: {} levels, recommended: {} or fewer)",
                        metrics.nesting, STATE_NESTING
                    ),
                    "Keep composite states to a minimum",
                ));
            }
        }
        DiagramType::Er => {
            if metrics.elements > ER_ELEMENTS {
                out.push(Recommendation::suggestion(
                    format!(
                        "Reduce entities (current: {}, recommended: {} or fewer)",
                        metrics.elements, ER_ELEMENTS
                    ),
                    "Split the data model along logical boundaries",
                ));
            }
            if metrics.attributes > metrics.elements * ER_ATTRIBUTES_PER_ELEMENT {
                out.push(Recommendation::suggestion(
                    format!(
                        "Too many attributes (current: {}, recommended: {} or fewer)",
                        metrics.attributes,
                        metrics.elements * ER_ATTRIBUTES_PER_ELEMENT
                    ),
                    "Show only the key attributes",
                ));
            }
        }
        DiagramType::Flowchart | DiagramType::Graph => {
            if metrics.elements > FLOWCHART_ELEMENTS {
                out.push(Recommendation::suggestion(
                    format!(
                        "Reduce nodes (current: {}, recommended: {} or fewer)",
                        metrics.elements, FLOWCHART_ELEMENTS
                    ),
                    "Split the process into several flowcharts",
                ));
            }
            if metrics.subgraphs > FLOWCHART_SUBGRAPHS {
                out.push(Recommendation::suggestion(
                    format!(
                        "Reduce subgraphs (current: {}, recommended: {} or fewer)",
                        metrics.subgraphs, FLOWCHART_SUBGRAPHS
                    ),
                    "Keep subgraph nesting shallow",
                ));
            }
        }
        DiagramType::Undetected => {}
    }

    out
}
