//! Diagram-Type Detector
//!
//! Finds the first line carrying a known declaration prefix.

use serde::Serialize;
use std::fmt;

/// Kind of Mermaid diagram a document declares
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DiagramType {
    #[serde(rename = "class")]
    Class,
    #[serde(rename = "sequence")]
    Sequence,
    /// `stateDiagram-v2`
    #[serde(rename = "state")]
    State,
    /// Legacy bare `stateDiagram`
    #[serde(rename = "state-old")]
    StateOld,
    #[serde(rename = "er")]
    Er,
    #[serde(rename = "flowchart")]
    Flowchart,
    #[serde(rename = "graph")]
    Graph,
    /// No declaration found anywhere in the document
    #[serde(rename = "none")]
    Undetected,
}

/// Declaration prefixes in match order.
///
/// `stateDiagram-v2` must precede `stateDiagram`, the latter being a prefix of the former.
const DECLARATION_PREFIXES: [(&str, DiagramType); 7] = [
    ("classDiagram", DiagramType::Class),
    ("sequenceDiagram", DiagramType::Sequence),
    ("stateDiagram-v2", DiagramType::State),
    ("stateDiagram", DiagramType::StateOld),
    ("erDiagram", DiagramType::Er),
    ("flowchart", DiagramType::Flowchart),
    ("graph", DiagramType::Graph),
];

impl DiagramType {
    /// Short name used in reports ("class", "state-old", "none", ...)
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagramType::Class => "class",
            DiagramType::Sequence => "sequence",
            DiagramType::State => "state",
            DiagramType::StateOld => "state-old",
            DiagramType::Er => "er",
            DiagramType::Flowchart => "flowchart",
            DiagramType::Graph => "graph",
            DiagramType::Undetected => "none",
        }
    }

    pub fn is_detected(&self) -> bool {
        *self != DiagramType::Undetected
    }
}

impl fmt::Display for DiagramType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Detect the diagram type of a document.
///
/// Lines are scanned top to bottom and the first one starting with a known
/// declaration wins. Never fails: returns [`DiagramType::Undetected`] when
/// nothing matches.
pub fn detect_diagram_type(content: &str) -> DiagramType {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .find_map(|line| {
            DECLARATION_PREFIXES
                .iter()
                .find(|(prefix, _)| line.starts_with(prefix))
                .map(|(_, diagram_type)| *diagram_type)
        })
        .unwrap_or(DiagramType::Undetected)
}
