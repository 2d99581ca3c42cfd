use tower_lsp::jsonrpc::Result as LspResult;
use tower_lsp::lsp_types::*;

use crate::complexity::{check_complexity, Thresholds};
use crate::diagram::detect_diagram_type;
use crate::lsp::backend::Backend;
use crate::validation::checks::VALID_DECLARATIONS;
use crate::validation::{Finding, Severity};

const SOURCE: &str = "mermaid-check";

/// Trait for handling hover requests
#[tower_lsp::async_trait]
pub trait HandleHover {
    async fn handle_hover(&self, params: HoverParams) -> LspResult<Option<Hover>>;
}

/// Trait for handling completion requests
#[tower_lsp::async_trait]
pub trait HandleCompletion {
    async fn handle_completion(
        &self,
        params: CompletionParams,
    ) -> LspResult<Option<CompletionResponse>>;
}

/// Trait for handling diagnostics
#[tower_lsp::async_trait]
pub trait HandleDiagnostics {
    async fn publish_diagnostics(&self, uri: Url);
}

#[tower_lsp::async_trait]
impl HandleHover for Backend {
    async fn handle_hover(&self, params: HoverParams) -> LspResult<Option<Hover>> {
        let uri = params.text_document_position_params.text_document.uri;

        let docs = self.documents.lock().await;
        let doc_state = match docs.get(&uri) {
            Some(state) => state,
            None => return Ok(None),
        };

        Ok(
            complexity_summary(&doc_state.content, &self.config.thresholds).map(|value| Hover {
                contents: HoverContents::Markup(MarkupContent {
                    kind: MarkupKind::Markdown,
                    value,
                }),
                range: None,
            }),
        )
    }
}

#[tower_lsp::async_trait]
impl HandleCompletion for Backend {
    async fn handle_completion(
        &self,
        params: CompletionParams,
    ) -> LspResult<Option<CompletionResponse>> {
        let uri = params.text_document_position.text_document.uri;
        let pos = params.text_document_position.position;

        let docs = self.documents.lock().await;
        let doc_state = match docs.get(&uri) {
            Some(state) => state,
            None => return Ok(None),
        };

        let completions = declaration_completions(&doc_state.content, pos);
        if completions.is_empty() {
            Ok(None)
        } else {
            Ok(Some(CompletionResponse::Array(completions)))
        }
    }
}

#[tower_lsp::async_trait]
impl HandleDiagnostics for Backend {
    /// Publish diagnostics for a document
    async fn publish_diagnostics(&self, uri: Url) {
        let docs = self.documents.lock().await;
        let doc_state = match docs.get(&uri) {
            Some(state) => state,
            None => return,
        };

        let diagnostics = doc_state
            .validation
            .diagnostics()
            .map(|(severity, finding)| to_lsp_diagnostic(&doc_state.content, severity, finding))
            .collect();
        drop(docs);

        self.client
            .publish_diagnostics(uri, diagnostics, None)
            .await;
    }
}

/// Convert a validation finding into an LSP diagnostic spanning its whole line
pub fn to_lsp_diagnostic(content: &str, severity: Severity, finding: &Finding) -> Diagnostic {
    let severity = match severity {
        Severity::Error => DiagnosticSeverity::ERROR,
        Severity::Warning => DiagnosticSeverity::WARNING,
        Severity::Info => DiagnosticSeverity::INFORMATION,
    };

    // Findings without a line are document-level; anchor them to the top
    let line_idx = finding.line.map(|l| l.saturating_sub(1)).unwrap_or(0);
    let line_len = content
        .split('\n')
        .nth(line_idx)
        .map(|l| l.trim_end_matches('\r').encode_utf16().count())
        .unwrap_or(0);

    let message = match &finding.suggestion {
        Some(suggestion) => format!("{} ({})", finding.message, suggestion),
        None => finding.message.clone(),
    };

    Diagnostic::new(
        Range::new(
            Position::new(line_idx as u32, 0),
            Position::new(line_idx as u32, line_len as u32),
        ),
        Some(severity),
        Some(NumberOrString::String(finding.category.to_string())),
        Some(SOURCE.to_string()),
        message,
        None,
        None,
    )
}

/// Markdown summary of the document's type, metrics and complexity
pub fn complexity_summary(content: &str, thresholds: &Thresholds) -> Option<String> {
    let report = check_complexity(content, thresholds);
    let analysis = report.analysis()?;

    let mut text = format!("**{}** diagram", analysis.diagram_type);
    text.push_str(&format!(
        "\n\n**Complexity:** {} ({})",
        analysis.complexity.score, analysis.complexity.level
    ));

    let metrics: Vec<_> = analysis
        .metrics
        .entries()
        .into_iter()
        .filter(|(_, value)| *value > 0)
        .collect();
    if !metrics.is_empty() {
        text.push_str("\n\n**Metrics:**");
        for (name, value) in metrics {
            text.push_str(&format!("\n- {}: {}", name, value));
        }
    }

    Some(text)
}

/// Declaration keywords, offered until the document declares a diagram type
pub fn declaration_completions(content: &str, pos: Position) -> Vec<CompletionItem> {
    if detect_diagram_type(content).is_detected() {
        return Vec::new();
    }

    let line = content.lines().nth(pos.line as usize).unwrap_or("");
    let typed: String = line.chars().take(pos.character as usize).collect();
    let typed = typed.trim_start();

    VALID_DECLARATIONS
        .iter()
        .filter(|decl| decl.starts_with(typed))
        .map(|decl| CompletionItem {
            label: decl.to_string(),
            kind: Some(CompletionItemKind::KEYWORD),
            detail: Some("Mermaid diagram declaration".to_string()),
            deprecated: None,
            tags: decl
                .starts_with("graph")
                .then(|| vec![CompletionItemTag::DEPRECATED]),
            ..Default::default()
        })
        .collect()
}
