//! Validation Engine
//!
//! Runs every structural check, then the type-specific caps, then the shared
//! complexity scoring, and collects the findings into a fresh result.

use serde::Serialize;

use super::checks;
use super::finding::{Category, Finding, Findings, Severity};
use crate::complexity::{score, ComplexityResult, Level, Thresholds};
use crate::diagram::{detect_diagram_type, extract_metrics, DiagramType};

/// Result of validating a document
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub valid: bool,
    pub diagram_type: DiagramType,
    pub complexity: ComplexityResult,
    pub errors: Vec<Finding>,
    pub warnings: Vec<Finding>,
    pub info: Vec<Finding>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Every finding paired with its severity, errors first
    pub fn diagnostics(&self) -> impl Iterator<Item = (Severity, &Finding)> {
        self.errors
            .iter()
            .map(|f| (Severity::Error, f))
            .chain(self.warnings.iter().map(|f| (Severity::Warning, f)))
            .chain(self.info.iter().map(|f| (Severity::Info, f)))
    }
}

/// Validate a document with the default complexity thresholds
pub fn validate(content: &str) -> ValidationResult {
    validate_with(content, &Thresholds::default())
}

/// Validate a document.
///
/// Never fails: malformed input only produces findings. `valid` depends on
/// errors alone, so a document may be valid yet complex.
pub fn validate_with(content: &str, thresholds: &Thresholds) -> ValidationResult {
    let mut findings = Findings::new();

    checks::check_code_fence(content, &mut findings);
    checks::check_declaration(content, &mut findings);
    checks::check_comments(content, &mut findings);
    checks::check_quotes_and_brackets(content, &mut findings);
    checks::check_arrows(content, &mut findings);
    checks::check_special_chars(content, &mut findings);

    let diagram_type = detect_diagram_type(content);
    let metrics = extract_metrics(content, diagram_type);
    checks::check_diagram_specific(content, diagram_type, &metrics, &mut findings);

    let complexity = ComplexityResult::new(score(&metrics, diagram_type), thresholds);
    if complexity.level != Level::Simple {
        let suggestion = if complexity.level == Level::Complex {
            "Splitting the diagram is strongly recommended"
        } else {
            "Consider simplifying the diagram"
        };
        findings.add_warning(
            Finding::new(
                Category::Complexity,
                format!(
                    "Diagram complexity is {} (score: {})",
                    complexity.level, complexity.score
                ),
            )
            .with_suggestion(suggestion),
        );
    }

    log::debug!(
        "validated {} diagram: {} errors, {} warnings, {} info",
        diagram_type,
        findings.errors.len(),
        findings.warnings.len(),
        findings.info.len()
    );

    ValidationResult {
        valid: findings.is_valid(),
        diagram_type,
        complexity,
        errors: findings.errors,
        warnings: findings.warnings,
        info: findings.info,
    }
}
