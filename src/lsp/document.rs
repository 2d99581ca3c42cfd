use crate::complexity::Thresholds;
use crate::validation::{validate_with, ValidationResult};

/// State for each open document
#[derive(Debug)]
pub struct DocumentState {
    pub content: String,
    pub validation: ValidationResult, // Recomputed on every full-text sync
}

impl DocumentState {
    pub fn new(content: String, thresholds: &Thresholds) -> Self {
        let validation = validate_with(&content, thresholds);
        Self {
            content,
            validation,
        }
    }
}
