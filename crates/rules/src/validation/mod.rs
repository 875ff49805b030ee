//! Policy document validation with structured errors and suggestions.
//!
//! Checks group structure (names, intervals, rule lists) and every rule
//! expression: that it parses, that its threshold is numeric and that its
//! left operand can be resolved against the sample store.
//! Returns a [`ValidationResult`] with errors (the rule can never fire) and
//! warnings (advisory). Validation reports only; nothing is removed from the
//! document.

mod expr_checks;
mod group_checks;

mod fuzzy;

use crate::schema::PolicyDocument;
use serde::{Deserialize, Serialize};

// ── Result types ────────────────────────────────────────────────────

/// Overall validation outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

/// A blocking validation error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationError {
    /// Location in the document, e.g. `"groups[0].rules[1].expr"`.
    pub path: String,
    pub message: String,
    /// Optional "Did you mean …?" suggestion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// A non-blocking advisory warning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl ValidationResult {
    pub(crate) fn new() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub(crate) fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.valid = false;
        self.errors.push(ValidationError {
            path: path.into(),
            message: message.into(),
            suggestion: None,
        });
    }

    pub(crate) fn error_with_suggestion(
        &mut self,
        path: impl Into<String>,
        message: impl Into<String>,
        suggestion: impl Into<String>,
    ) {
        self.valid = false;
        self.errors.push(ValidationError {
            path: path.into(),
            message: message.into(),
            suggestion: Some(suggestion.into()),
        });
    }

    pub(crate) fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ValidationWarning {
            path: path.into(),
            message: message.into(),
            suggestion: None,
        });
    }

    pub(crate) fn warn_with_suggestion(
        &mut self,
        path: impl Into<String>,
        message: impl Into<String>,
        suggestion: impl Into<String>,
    ) {
        self.warnings.push(ValidationWarning {
            path: path.into(),
            message: message.into(),
            suggestion: Some(suggestion.into()),
        });
    }

    /// Whether any error or warning was recorded.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}

// ── Public API ──────────────────────────────────────────────────────

/// Validate a parsed [`PolicyDocument`].
pub fn validate_document(doc: &PolicyDocument) -> ValidationResult {
    let mut result = ValidationResult::new();
    group_checks::validate_group_names(doc, &mut result);

    for (gi, group) in doc.groups.iter().enumerate() {
        let path = format!("groups[{gi}]");
        group_checks::validate_group(group, &path, &mut result);

        for (ri, rule) in group.rules.iter().enumerate() {
            expr_checks::validate_expr(&rule.expr, &format!("{path}.rules[{ri}].expr"), &mut result);
        }
    }

    result
}

/// Parse raw YAML and validate. Returns parse errors merged with validation errors.
pub fn validate_yaml(yaml: &str) -> ValidationResult {
    match serde_yaml::from_str::<PolicyDocument>(yaml) {
        Ok(doc) => validate_document(&doc),
        Err(e) => {
            let mut result = ValidationResult::new();
            result.error("", format!("YAML parse error: {e}"));
            result
        }
    }
}
