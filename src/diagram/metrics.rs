//! Metric Extraction
//!
//! Line and pattern heuristics that count the structural units of a diagram.
//! This is deliberately not a grammar: every counter is the number of
//! non-overlapping matches of a fixed pattern over the whole document.

use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::LazyLock;

use super::detect::DiagramType;

/// Structural counters for one document.
///
/// Only the counters relevant to the detected diagram type are populated,
/// the rest stay at zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricSet {
    pub elements: usize,
    pub relationships: usize,
    pub nesting: usize,
    pub attributes: usize,
    pub methods: usize,
    pub branches: usize,
    pub subgraphs: usize,
}

impl MetricSet {
    /// Named counters in display order, zeros included
    pub fn entries(&self) -> [(&'static str, usize); 7] {
        [
            ("elements", self.elements),
            ("relationships", self.relationships),
            ("nesting", self.nesting),
            ("attributes", self.attributes),
            ("methods", self.methods),
            ("branches", self.branches),
            ("subgraphs", self.subgraphs),
        ]
    }
}

fn pattern(source: &str) -> Regex {
    Regex::new(source).expect("metric pattern must compile")
}

// class
static CLASS_DECLARATION: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?m)^\s*class\s+\w+"));
static CLASS_ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| pattern(r"[+\-#~]\w+:"));
static CLASS_METHOD: LazyLock<Regex> = LazyLock::new(|| pattern(r"[+\-#~]\w+\("));
static CLASS_ARROW: LazyLock<Regex> = LazyLock::new(|| pattern(r"--[>o*|]"));
static CLASS_DOTTED_ARROW: LazyLock<Regex> = LazyLock::new(|| pattern(r"\.\.[>|]"));

// sequence
static PARTICIPANT: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?m)^\s*participant\s+"));
static MESSAGE_ENDPOINTS: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(\w+)\s*-[->]+\s*(\w+)"));
static MESSAGE_ARROW: LazyLock<Regex> = LazyLock::new(|| pattern(r"-[->]+"));
static SEQUENCE_BRANCH: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?m)^\s*(alt|opt)"));

// state
static STATE_DECLARATION: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(?m)^\s*(?:\[\*\]\s*)?\w[\w\s]*:"));
static STATE_TRANSITION: LazyLock<Regex> = LazyLock::new(|| pattern(r"-->"));

// er
static ENTITY_BLOCK: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?m)^\s*\w+\s*\{"));
static ENTITY_ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?m)^\s+\w+\s+\w+"));
static CROWS_FOOT_BAR: LazyLock<Regex> = LazyLock::new(|| pattern(r"\|[|o]-"));
static CROWS_FOOT_BRACE: LazyLock<Regex> = LazyLock::new(|| pattern(r"\}[|o]-"));

// flowchart / graph
static SQUARE_NODE: LazyLock<Regex> = LazyLock::new(|| pattern(r"\w+\[[^\]]+\]"));
static ROUND_NODE: LazyLock<Regex> = LazyLock::new(|| pattern(r"\w+\([^)]+\)"));
static EDGE: LazyLock<Regex> = LazyLock::new(|| pattern(r"--[->]"));
static DOTTED_EDGE: LazyLock<Regex> = LazyLock::new(|| pattern(r"\.\.-[->]"));
static SUBGRAPH: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?m)^\s*subgraph"));
static LABELED_EDGE: LazyLock<Regex> = LazyLock::new(|| pattern(r"-->\|"));

const SEQUENCE_BLOCKS: [&str; 4] = ["alt", "loop", "opt", "par"];
const STATE_BLOCKS: [&str; 1] = ["state"];

fn count(re: &Regex, content: &str) -> usize {
    re.find_iter(content).count()
}

/// Extract the metric set for a document of the given type.
///
/// Pure and total: unknown types yield an all-zero set.
pub fn extract_metrics(content: &str, diagram_type: DiagramType) -> MetricSet {
    let mut metrics = MetricSet::default();

    match diagram_type {
        DiagramType::Class => {
            metrics.elements = count(&CLASS_DECLARATION, content);
            metrics.attributes = count(&CLASS_ATTRIBUTE, content);
            metrics.methods = count(&CLASS_METHOD, content);
            metrics.relationships =
                count(&CLASS_ARROW, content) + count(&CLASS_DOTTED_ARROW, content);
        }
        DiagramType::Sequence => {
            metrics.elements = count(&PARTICIPANT, content);
            if metrics.elements == 0 {
                metrics.elements = count_implicit_participants(content);
            }
            metrics.relationships = count(&MESSAGE_ARROW, content);
            metrics.nesting = count_nesting(content, &SEQUENCE_BLOCKS);
            metrics.branches = count(&SEQUENCE_BRANCH, content);
        }
        DiagramType::State | DiagramType::StateOld => {
            metrics.elements = count(&STATE_DECLARATION, content);
            metrics.relationships = count(&STATE_TRANSITION, content);
            metrics.nesting = count_nesting(content, &STATE_BLOCKS);
        }
        DiagramType::Er => {
            metrics.elements = count(&ENTITY_BLOCK, content);
            metrics.attributes = count(&ENTITY_ATTRIBUTE, content);
            metrics.relationships =
                count(&CROWS_FOOT_BAR, content) + count(&CROWS_FOOT_BRACE, content);
        }
        DiagramType::Flowchart | DiagramType::Graph => {
            metrics.elements = count(&SQUARE_NODE, content) + count(&ROUND_NODE, content);
            metrics.relationships = count(&EDGE, content) + count(&DOTTED_EDGE, content);
            metrics.subgraphs = count(&SUBGRAPH, content);
            metrics.branches = count(&LABELED_EDGE, content);
        }
        DiagramType::Undetected => {}
    }

    log::debug!("extracted {} metrics: {:?}", diagram_type, metrics);
    metrics
}

/// Distinct endpoints of `A -> B` style messages, used when no participant is declared
fn count_implicit_participants(content: &str) -> usize {
    let mut participants = HashSet::new();
    for caps in MESSAGE_ENDPOINTS.captures_iter(content) {
        participants.insert(caps[1].to_string());
        participants.insert(caps[2].to_string());
    }
    participants.len()
}

/// Maximum depth of keyword-opened, `end`-closed blocks.
///
/// A line opens a block when its trimmed form starts with one of `keywords`,
/// so `participant` opens a `par` block and the `stateDiagram-v2` header opens
/// a `state` block. A line that is exactly `end` closes one. Depth is clamped
/// at zero, so stray `end` lines and unclosed blocks are tolerated.
pub fn count_nesting(content: &str, keywords: &[&str]) -> usize {
    let mut current_depth = 0usize;
    let mut max_depth = 0usize;

    for line in content.lines() {
        let trimmed = line.trim();

        for keyword in keywords {
            if trimmed.starts_with(keyword) {
                current_depth += 1;
                max_depth = max_depth.max(current_depth);
            }
        }

        if trimmed == "end" {
            current_depth = current_depth.saturating_sub(1);
        }
    }

    max_depth
}
