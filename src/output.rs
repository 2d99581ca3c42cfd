//! Report rendering
//!
//! Human-readable and JSON renderings of complexity and validation results.

use anyhow::Result;
use serde::Serialize;

use crate::complexity::{ComplexityAnalysis, RecommendationKind};
use crate::validation::{Finding, ValidationResult};

/// Pretty-printed JSON of any result record
pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Text report for the `complexity` command
pub fn render_complexity(analysis: &ComplexityAnalysis, file: &str) -> String {
    let mut out = String::from("\n=== Mermaid Complexity Analysis ===\n\n");
    out.push_str(&format!("File: {}\n", file));
    out.push_str(&format!("Diagram Type: {}\n", analysis.diagram_type));

    out.push_str("\nMetrics:\n");
    out.push_str(&format!("  Elements: {}\n", analysis.metrics.elements));
    for (name, value) in analysis.metrics.entries().into_iter().skip(1) {
        if value > 0 {
            out.push_str(&format!("  {}: {}\n", capitalize(name), value));
        }
    }

    let complexity = &analysis.complexity;
    out.push_str("\nComplexity:\n");
    out.push_str(&format!("  Score: {}\n", complexity.score));
    out.push_str(&format!(
        "  Level: {}\n",
        complexity.level.as_str().to_uppercase()
    ));
    out.push_str(&format!(
        "  Thresholds: Simple < {}, Moderate < {}\n",
        complexity.threshold.simple, complexity.threshold.moderate
    ));

    out.push_str("\nRecommendations:\n");
    for rec in &analysis.recommendations {
        let marker = match rec.kind {
            RecommendationKind::Success => "[ok]",
            RecommendationKind::Warning => "[warn]",
            RecommendationKind::Error => "[error]",
            RecommendationKind::Suggestion => "[hint]",
        };
        out.push_str(&format!("  {} {}\n", marker, rec.message));
        if let Some(action) = &rec.action {
            out.push_str(&format!("     -> {}\n", action));
        }
    }

    out
}

fn render_bucket(out: &mut String, title: &str, findings: &[Finding], detailed: bool) {
    if findings.is_empty() {
        return;
    }

    out.push_str(&format!("{}:\n", title));
    for (i, finding) in findings.iter().enumerate() {
        out.push_str(&format!(
            "  {}. [{}] {}\n",
            i + 1,
            finding.category,
            finding.message
        ));
        if !detailed {
            continue;
        }
        if let Some(line) = finding.line {
            out.push_str(&format!("     Line: {}\n", line));
        }
        if let Some(content) = &finding.content {
            out.push_str(&format!("     Content: {}\n", content));
        }
        if let Some(expected) = &finding.expected {
            out.push_str(&format!("     Expected: {}\n", expected));
        }
        if let Some(suggestion) = &finding.suggestion {
            out.push_str(&format!("     Suggestion: {}\n", suggestion));
        }
    }
    out.push('\n');
}

/// Text report for the `validate` command
pub fn render_validation(result: &ValidationResult, file: &str) -> String {
    let mut out = String::from("\n=== Mermaid Diagram Validation ===\n\n");
    out.push_str(&format!("File: {}\n", file));
    out.push_str(&format!("Diagram Type: {}\n", result.diagram_type));
    out.push_str(&format!(
        "Complexity: {} (score: {})\n",
        result.complexity.level, result.complexity.score
    ));
    out.push_str(&format!(
        "Status: {}\n\n",
        if result.valid { "VALID" } else { "INVALID" }
    ));

    render_bucket(&mut out, "ERRORS", &result.errors, true);
    render_bucket(&mut out, "WARNINGS", &result.warnings, true);
    render_bucket(&mut out, "INFO", &result.info, false);

    if result.valid && result.warnings.is_empty() {
        out.push_str("Validation passed: all checks succeeded.\n");
    }

    out
}
