//! Structural checks
//!
//! Each check scans the document independently and appends findings. None of
//! them stops the others, so a single run reports as much as possible.

use regex::Regex;
use std::sync::LazyLock;

use super::finding::{Category, Finding, Findings};
use crate::complexity::recommend::limits;
use crate::diagram::{DiagramType, MetricSet};

/// Declarations accepted on the first significant line
pub const VALID_DECLARATIONS: [&str; 12] = [
    "classDiagram",
    "sequenceDiagram",
    "stateDiagram-v2",
    "erDiagram",
    "flowchart TB",
    "flowchart TD",
    "flowchart LR",
    "flowchart RL",
    "graph TB",
    "graph TD",
    "graph LR",
    "graph RL",
];

const FENCE_OPEN: &str = "```mermaid";
const FENCE: &str = "```";
const COMMENT: &str = "%%";
const MAX_LABEL_CHARS: usize = 30;

static LONE_DASH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s-\s").expect("lone dash pattern must compile"));
static FIRST_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"["\[]([^"\]]*)["\]]"#).expect("label pattern must compile"));

/// Lines paired with their 1-based number
fn numbered_lines(content: &str) -> impl Iterator<Item = (usize, &str)> {
    content.split('\n').enumerate().map(|(idx, line)| (idx + 1, line))
}

fn is_comment(line: &str) -> bool {
    line.trim().starts_with(COMMENT)
}

fn is_comment_or_fence(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.starts_with(COMMENT) || trimmed.starts_with(FENCE)
}

/// The document must be wrapped in a ```` ```mermaid ```` fence
pub fn check_code_fence(content: &str, findings: &mut Findings) {
    let trimmed = content.trim();

    if !trimmed.starts_with(FENCE_OPEN) {
        findings.add_error(
            Finding::new(Category::CodeBlock, "Code block does not start with ```mermaid")
                .at_line(1),
        );
    }

    if !trimmed.ends_with(FENCE) {
        findings.add_error(
            Finding::new(Category::CodeBlock, "Code block does not end with ```")
                .at_line(content.split('\n').count()),
        );
    }
}

/// The first significant line must be an allowed declaration
pub fn check_declaration(content: &str, findings: &mut Findings) {
    let first = numbered_lines(content)
        .map(|(number, line)| (number, line.trim()))
        .filter(|(_, line)| !line.starts_with(FENCE) && !line.starts_with(COMMENT))
        .find(|(_, line)| !line.is_empty());

    let Some((number, line)) = first else {
        findings.add_error(
            Finding::new(Category::DiagramDeclaration, "Diagram declaration not found").at_line(1),
        );
        return;
    };

    if !VALID_DECLARATIONS.iter().any(|decl| line.starts_with(decl)) {
        findings.add_error(
            Finding::new(
                Category::DiagramDeclaration,
                format!("Invalid diagram declaration: \"{}\"", line),
            )
            .at_line(number)
            .with_expected(VALID_DECLARATIONS.join(", ")),
        );
    }

    if line.starts_with("graph ") {
        findings.add_warning(
            Finding::new(
                Category::Deprecated,
                "`graph` is deprecated. Use `flowchart` instead",
            )
            .at_line(number),
        );
    }
}

/// `%%` is the only comment marker
pub fn check_comments(content: &str, findings: &mut Findings) {
    for (number, line) in numbered_lines(content) {
        let trimmed = line.trim();

        if trimmed.starts_with("//") {
            findings.add_error(
                Finding::new(
                    Category::InvalidComment,
                    "JavaScript-style comments (//) are invalid. Use %% instead",
                )
                .at_line(number)
                .with_content(line),
            );
        }

        // A line opening with "-->" is a dangling HTML comment close; elsewhere it is an arrow
        if line.contains("<!--") || trimmed.starts_with("-->") {
            findings.add_error(
                Finding::new(
                    Category::InvalidComment,
                    "HTML-style comments (<!-- -->) are invalid. Use %% instead",
                )
                .at_line(number)
                .with_content(line),
            );
        }
    }
}

/// Per-line double quote and square bracket balance
pub fn check_quotes_and_brackets(content: &str, findings: &mut Findings) {
    for (number, line) in numbered_lines(content) {
        if is_comment(line) {
            continue;
        }

        if line.matches('"').count() % 2 != 0 {
            findings.add_error(
                Finding::new(Category::UnclosedQuote, "Unclosed double quote (\")")
                    .at_line(number)
                    .with_content(line),
            );
        }

        if line.matches('[').count() != line.matches(']').count() {
            findings.add_error(
                Finding::new(Category::UnclosedBracket, "Unclosed bracket ([])")
                    .at_line(number)
                    .with_content(line),
            );
        }
    }
}

/// Heuristic arrow checks; warnings only
pub fn check_arrows(content: &str, findings: &mut Findings) {
    for (number, line) in numbered_lines(content) {
        if is_comment_or_fence(line) {
            continue;
        }

        if has_bare_gt(line) {
            findings.add_warning(
                Finding::new(
                    Category::InvalidArrow,
                    "Possibly invalid arrow: a lone > was found",
                )
                .at_line(number)
                .with_content(line)
                .with_suggestion("Use --> or ..>"),
            );
        }

        if LONE_DASH.is_match(line) && !line.contains("--") {
            findings.add_warning(
                Finding::new(
                    Category::InvalidArrow,
                    "Possibly invalid arrow: a lone - was found",
                )
                .at_line(number)
                .with_content(line)
                .with_suggestion("Use -- or -->"),
            );
        }
    }
}

/// True when a run of `>` is not the head of an arrow body (`-`, `=`, `.` or `|`)
fn has_bare_gt(line: &str) -> bool {
    let bytes = line.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'>' {
            i += 1;
            continue;
        }

        let attached = i > 0 && matches!(bytes[i - 1], b'-' | b'=' | b'.' | b'|');
        if !attached {
            return true;
        }

        while i < bytes.len() && bytes[i] == b'>' {
            i += 1;
        }
    }

    false
}

/// Special characters and length of the first label on each line
pub fn check_special_chars(content: &str, findings: &mut Findings) {
    for (number, line) in numbered_lines(content) {
        if is_comment_or_fence(line) {
            continue;
        }

        let Some(label) = FIRST_LABEL
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
            .filter(|label| !label.is_empty())
        else {
            continue;
        };

        if label.contains('<') || label.contains('>') {
            findings.add_warning(
                Finding::new(Category::SpecialChar, "Label contains special characters < >")
                    .at_line(number)
                    .with_content(line)
                    .with_suggestion("Remove the special characters or wrap the label in quotes"),
            );
        }

        if label.contains('{') || label.contains('}') {
            findings.add_warning(
                Finding::new(Category::SpecialChar, "Label contains special characters { }")
                    .at_line(number)
                    .with_content(line)
                    .with_suggestion("Remove the special characters"),
            );
        }

        let length = label.chars().count();
        if length > MAX_LABEL_CHARS {
            findings.add_warning(
                Finding::new(
                    Category::LongLabel,
                    format!("Label is too long ({} characters)", length),
                )
                .at_line(number)
                .with_content(line)
                .with_suggestion(format!("Shorten it to {} characters or fewer", MAX_LABEL_CHARS)),
            );
        }
    }
}

fn too_many(noun: &str, actual: usize, cap: usize, suggestion: &str) -> Finding {
    Finding::new(
        Category::TooManyElements,
        format!(
            "Too many {} ({}). Recommended: {} or fewer",
            noun, actual, cap
        ),
    )
    .with_suggestion(suggestion)
}

/// Element caps per diagram type, plus one summary info finding
pub fn check_diagram_specific(
    content: &str,
    diagram_type: DiagramType,
    metrics: &MetricSet,
    findings: &mut Findings,
) {
    const SPLIT: &str = "Split the diagram";

    match diagram_type {
        DiagramType::Class => {
            if metrics.elements > limits::CLASS_ELEMENTS {
                findings.add_warning(too_many(
                    "classes",
                    metrics.elements,
                    limits::CLASS_ELEMENTS,
                    SPLIT,
                ));
            }
            findings.add_info(Finding::new(
                Category::ElementCount,
                format!("Classes: {}", metrics.elements),
            ));
        }
        DiagramType::Sequence => {
            if metrics.elements > limits::SEQUENCE_ELEMENTS {
                findings.add_warning(too_many(
                    "participants",
                    metrics.elements,
                    limits::SEQUENCE_ELEMENTS,
                    SPLIT,
                ));
            }
            if metrics.relationships > limits::SEQUENCE_RELATIONSHIPS {
                findings.add_warning(too_many(
                    "messages",
                    metrics.relationships,
                    limits::SEQUENCE_RELATIONSHIPS,
                    "Remove unnecessary messages",
                ));
            }
            findings.add_info(Finding::new(
                Category::ElementCount,
                format!(
                    "Participants: {}, messages: {}",
                    metrics.elements, metrics.relationships
                ),
            ));
        }
        DiagramType::State | DiagramType::StateOld => {
            // Unlike the complexity engine, validation rejects the legacy form
            if !content.contains("stateDiagram-v2") {
                findings.add_error(Finding::new(
                    Category::InvalidVersion,
                    "stateDiagram is deprecated. Use stateDiagram-v2",
                ));
            }
            if metrics.elements > limits::STATE_ELEMENTS {
                findings.add_warning(too_many(
                    "states",
                    metrics.elements,
                    limits::STATE_ELEMENTS,
                    SPLIT,
                ));
            }
            findings.add_info(Finding::new(
                Category::ElementCount,
                format!("States: {}", metrics.elements),
            ));
        }
        DiagramType::Er => {
            if metrics.elements > limits::ER_ELEMENTS {
                findings.add_warning(too_many(
                    "entities",
                    metrics.elements,
                    limits::ER_ELEMENTS,
                    SPLIT,
                ));
            }
            findings.add_info(Finding::new(
                Category::ElementCount,
                format!("Entities: {}", metrics.elements),
            ));
        }
        DiagramType::Flowchart | DiagramType::Graph => {
            if metrics.elements > limits::FLOWCHART_ELEMENTS {
                findings.add_warning(too_many(
                    "nodes",
                    metrics.elements,
                    limits::FLOWCHART_ELEMENTS,
                    SPLIT,
                ));
            }
            findings.add_info(Finding::new(
                Category::ElementCount,
                format!("Nodes: {}", metrics.elements),
            ));
        }
        DiagramType::Undetected => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(check: fn(&str, &mut Findings), content: &str) -> Findings {
        let mut findings = Findings::new();
        check(content, &mut findings);
        findings
    }

    #[test]
    fn test_code_fence() {
        let ok = run(check_code_fence, "```mermaid\nflowchart LR\n```\n");
        assert!(ok.errors.is_empty());

        let missing_both = run(check_code_fence, "flowchart LR\nA --> B\n");
        assert_eq!(missing_both.errors.len(), 2);
        assert_eq!(missing_both.errors[0].line, Some(1));
        assert_eq!(missing_both.errors[1].line, Some(3));
    }

    #[test]
    fn test_declaration_skips_fence_and_comments() {
        let findings = run(
            check_declaration,
            "```mermaid\n%% title\n\nflowchart TD\nA --> B\n```",
        );
        assert!(findings.errors.is_empty());
        assert!(findings.warnings.is_empty());
    }

    #[test]
    fn test_invalid_declaration() {
        let findings = run(check_declaration, "```mermaid\nflowchart BT\n```");
        assert_eq!(findings.errors.len(), 1);
        assert_eq!(findings.errors[0].line, Some(2));
        assert!(findings.errors[0]
            .expected
            .as_deref()
            .is_some_and(|e| e.contains("flowchart TD")));
    }

    #[test]
    fn test_graph_is_deprecated() {
        let findings = run(check_declaration, "graph LR\nA --> B");
        assert!(findings.errors.is_empty());
        assert_eq!(findings.warnings.len(), 1);
        assert_eq!(findings.warnings[0].category, Category::Deprecated);
    }

    #[test]
    fn test_missing_declaration() {
        let findings = run(check_declaration, "```mermaid\n%% only a comment\n```");
        assert_eq!(findings.errors.len(), 1);
        assert_eq!(findings.errors[0].message, "Diagram declaration not found");
    }

    #[test]
    fn test_comments() {
        let findings = run(
            check_comments,
            "flowchart LR\n  // js comment\nA --> B\n<!-- html -->\n%% fine",
        );
        assert_eq!(findings.errors.len(), 2);
        assert_eq!(findings.errors[0].line, Some(2));
        assert_eq!(findings.errors[0].content.as_deref(), Some("// js comment"));
        assert_eq!(findings.errors[1].line, Some(4));
    }

    #[test]
    fn test_quotes_and_brackets() {
        let findings = run(
            check_quotes_and_brackets,
            "A[\"ok\"] --> B[\"broken]\nC[open --> D\n%% \" ignored [",
        );
        assert_eq!(findings.errors.len(), 2);
        assert_eq!(findings.errors[0].category, Category::UnclosedQuote);
        assert_eq!(findings.errors[0].line, Some(1));
        assert_eq!(findings.errors[1].category, Category::UnclosedBracket);
        assert_eq!(findings.errors[1].line, Some(2));
    }

    #[test]
    fn test_bare_gt() {
        assert!(!has_bare_gt("A --> B"));
        assert!(!has_bare_gt("Alice->>Bob: hi"));
        assert!(!has_bare_gt("A ==> B"));
        assert!(!has_bare_gt("Duck ..|> Animal"));
        assert!(has_bare_gt("A > B"));
        assert!(has_bare_gt("A >> B"));
        assert!(has_bare_gt("A[x > y]"));
    }

    #[test]
    fn test_arrows() {
        let findings = run(check_arrows, "```mermaid\nA > B\nA - B\nA -- text --> B\n```");
        assert!(findings.errors.is_empty());
        assert_eq!(findings.warnings.len(), 2);
        assert_eq!(findings.warnings[0].line, Some(2));
        assert_eq!(findings.warnings[1].line, Some(3));
        assert!(findings.warnings.iter().all(|w| w.suggestion.is_some()));
    }

    #[test]
    fn test_special_chars() {
        let findings = run(
            check_special_chars,
            "A[a <b>] --> B\nC[{json}]\nD[This label is definitely longer than thirty]",
        );
        let categories: Vec<_> = findings.warnings.iter().map(|w| w.category).collect();
        assert_eq!(
            categories,
            vec![Category::SpecialChar, Category::SpecialChar, Category::LongLabel]
        );
        assert_eq!(findings.warnings[2].line, Some(3));
    }

    #[test]
    fn test_only_first_label_is_inspected() {
        let findings = run(check_special_chars, "A[short] --> B[has <angle>]");
        assert!(findings.warnings.is_empty());
    }

    #[test]
    fn test_state_version_error() {
        let mut findings = Findings::new();
        check_diagram_specific(
            "stateDiagram\n[*] --> A",
            DiagramType::StateOld,
            &MetricSet::default(),
            &mut findings,
        );
        assert_eq!(findings.errors.len(), 1);
        assert_eq!(findings.errors[0].category, Category::InvalidVersion);
        assert_eq!(findings.info.len(), 1);
    }

    #[test]
    fn test_element_caps() {
        let metrics = MetricSet {
            elements: 16,
            ..Default::default()
        };
        let mut findings = Findings::new();
        check_diagram_specific("", DiagramType::Flowchart, &metrics, &mut findings);
        assert_eq!(findings.warnings.len(), 1);
        assert_eq!(
            findings.warnings[0].message,
            "Too many nodes (16). Recommended: 15 or fewer"
        );
        assert_eq!(findings.info[0].message, "Nodes: 16");
    }

    #[test]
    fn test_undetected_type_adds_nothing() {
        let mut findings = Findings::new();
        check_diagram_specific("", DiagramType::Undetected, &MetricSet::default(), &mut findings);
        assert_eq!(findings, Findings::new());
    }
}
