//! Validation findings

use serde::Serialize;
use std::fmt;

/// Severity bucket of a finding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// What a finding is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    CodeBlock,
    DiagramDeclaration,
    Deprecated,
    InvalidComment,
    UnclosedQuote,
    UnclosedBracket,
    InvalidArrow,
    SpecialChar,
    LongLabel,
    TooManyElements,
    InvalidVersion,
    ElementCount,
    Complexity,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::CodeBlock => "CODE_BLOCK",
            Category::DiagramDeclaration => "DIAGRAM_DECLARATION",
            Category::Deprecated => "DEPRECATED",
            Category::InvalidComment => "INVALID_COMMENT",
            Category::UnclosedQuote => "UNCLOSED_QUOTE",
            Category::UnclosedBracket => "UNCLOSED_BRACKET",
            Category::InvalidArrow => "INVALID_ARROW",
            Category::SpecialChar => "SPECIAL_CHAR",
            Category::LongLabel => "LONG_LABEL",
            Category::TooManyElements => "TOO_MANY_ELEMENTS",
            Category::InvalidVersion => "INVALID_VERSION",
            Category::ElementCount => "ELEMENT_COUNT",
            Category::Complexity => "COMPLEXITY",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single validation issue or note
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    #[serde(rename = "type")]
    pub category: Category,
    pub message: String,
    /// 1-based source line
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
}

impl Finding {
    pub fn new(category: Category, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
            line: None,
            content: None,
            suggestion: None,
            expected: None,
        }
    }

    pub fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    /// Attach the offending source line, trimmed
    pub fn with_content(mut self, content: &str) -> Self {
        self.content = Some(content.trim().to_string());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn with_expected(mut self, expected: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self
    }
}

/// Accumulator for the three severity buckets of one validation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Findings {
    pub errors: Vec<Finding>,
    pub warnings: Vec<Finding>,
    pub info: Vec<Finding>,
}

impl Findings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, severity: Severity, finding: Finding) {
        match severity {
            Severity::Error => self.errors.push(finding),
            Severity::Warning => self.warnings.push(finding),
            Severity::Info => self.info.push(finding),
        }
    }

    pub fn add_error(&mut self, finding: Finding) {
        self.add(Severity::Error, finding);
    }

    pub fn add_warning(&mut self, finding: Finding) {
        self.add(Severity::Warning, finding);
    }

    pub fn add_info(&mut self, finding: Finding) {
        self.add(Severity::Info, finding);
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}
