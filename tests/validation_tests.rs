//! End-to-end checks of the validation engine
use mermaid_check::validation::{Category, Severity};
use mermaid_check::{
    check_complexity, validate, validate_with, ComplexityReport, DiagramType, Level, Thresholds,
};

fn fenced(body: &str) -> String {
    format!("```mermaid\n{}\n```\n", body)
}

#[test]
fn test_clean_flowchart_passes() {
    let result = validate(&fenced("flowchart LR\n    A[Start] --> B[End]"));

    assert!(result.valid);
    assert_eq!(result.diagram_type, DiagramType::Flowchart);
    assert!(result.errors.is_empty());
    assert!(result.warnings.is_empty());
    assert_eq!(result.info[0].category, Category::ElementCount);
    assert_eq!(result.info[0].message, "Nodes: 2");
}

#[test]
fn test_missing_fence() {
    let result = validate("flowchart LR\n    A[Start] --> B[End]\n");

    assert!(!result.valid);
    let fences: Vec<_> = result
        .errors
        .iter()
        .filter(|e| e.category == Category::CodeBlock)
        .collect();
    assert_eq!(fences.len(), 2);
    assert_eq!(fences[0].line, Some(1));
}

#[test]
fn test_slash_comment_reported_once_with_line() {
    let content = fenced("flowchart TD\n    A[Start] --> B[End]\n    // note");
    let result = validate(&content);

    let comments: Vec<_> = result
        .errors
        .iter()
        .filter(|e| e.category == Category::InvalidComment)
        .collect();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].line, Some(4));
    assert_eq!(comments[0].content.as_deref(), Some("// note"));
    assert!(!result.valid);
}

#[test]
fn test_legacy_state_diagram_scored_but_rejected() {
    let content = fenced("stateDiagram\n    [*] --> Idle\n    Idle : waiting");

    // The complexity engine still analyses the legacy form
    let report = check_complexity(&content, &Thresholds::default());
    let ComplexityReport::Analyzed(analysis) = &report else {
        panic!("legacy state diagram should be analysed");
    };
    assert_eq!(analysis.diagram_type, DiagramType::StateOld);
    assert_eq!(analysis.metrics.elements, 1);

    // Validation rejects it outright
    let result = validate(&content);
    assert_eq!(result.diagram_type, DiagramType::StateOld);
    assert!(!result.valid);
    assert!(result
        .errors
        .iter()
        .any(|e| e.category == Category::InvalidVersion));
}

#[test]
fn test_too_many_described_states() {
    let mut body = String::from("stateDiagram-v2\n    [*] --> S1");
    for i in 1..=11 {
        body.push_str(&format!("\n    S{} : state number {}", i, i));
    }
    let result = validate(&fenced(&body));

    assert!(result.valid);
    let caps: Vec<_> = result
        .warnings
        .iter()
        .filter(|w| w.category == Category::TooManyElements)
        .collect();
    assert_eq!(caps.len(), 1);
    assert_eq!(caps[0].message, "Too many states (11). Recommended: 10 or fewer");
    assert!(result.info.iter().any(|i| i.message == "States: 11"));
}

#[test]
fn test_state_v2_accepted() {
    let result = validate(&fenced("stateDiagram-v2\n    [*] --> Idle\n    Idle --> [*]"));

    assert_eq!(result.diagram_type, DiagramType::State);
    assert!(result.valid);
}

#[test]
fn test_deprecated_graph_is_only_a_warning() {
    let result = validate(&fenced("graph TD\n    A[Start] --> B[End]"));

    assert!(result.valid);
    assert!(result
        .warnings
        .iter()
        .any(|w| w.category == Category::Deprecated && w.line == Some(2)));
}

#[test]
fn test_large_flowchart_warns_but_stays_valid() {
    let mut body = String::from("flowchart TD");
    for i in 0..20 {
        body.push_str(&format!("\n    N{}[Step {}] --> N{}[Step {}]", i, i, i + 1, i + 1));
    }
    let result = validate(&fenced(&body));

    assert!(result.valid);
    assert_eq!(result.complexity.level, Level::Complex);
    let categories: Vec<_> = result.warnings.iter().map(|w| w.category).collect();
    assert!(categories.contains(&Category::TooManyElements));
    assert!(categories.contains(&Category::Complexity));
}

#[test]
fn test_thresholds_change_complexity_warning() {
    let content = fenced("flowchart LR\n    A[Start] --> B[End]");

    let relaxed = validate(&content);
    assert!(relaxed.warnings.is_empty());

    let strict = validate_with(&content, &Thresholds::new(1, 2));
    assert_eq!(strict.complexity.level, Level::Complex);
    assert!(strict
        .warnings
        .iter()
        .any(|w| w.category == Category::Complexity));
}

#[test]
fn test_validation_is_idempotent() {
    let content = fenced("sequenceDiagram\n    Alice->>Bob: hi\n    // oops");

    assert_eq!(validate(&content), validate(&content));
}

#[test]
fn test_diagnostics_cover_every_bucket() {
    let result = validate("graph LR\n    A[Start] --> B[End]");
    let total = result.errors.len() + result.warnings.len() + result.info.len();

    assert_eq!(result.diagnostics().count(), total);
    assert!(result
        .diagnostics()
        .any(|(severity, _)| severity == Severity::Warning));
}
