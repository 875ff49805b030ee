//! Expression validation: syntax, numeric threshold, resolvable left operand.

use policy_store::VariableRef;

use crate::evaluator::ThresholdEvaluator;
use crate::expr::{self, Condition, ExprError, Symbol, SymbolKind};

use super::fuzzy::fuzzy_match;
use super::ValidationResult;

const SAMPLE_FIELDS: &[&str] = &["rx", "tx"];

pub(super) fn validate_expr(text: &str, path: &str, result: &mut ValidationResult) {
    let cond = match expr::parse(text) {
        Ok(cond) => cond,
        Err(ExprError::Syntax(e)) => {
            result.error(
                path,
                format!(
                    "Expression does not parse: expected {} at position {} in '{}'",
                    e.rule, e.position, text
                ),
            );
            return;
        }
        Err(e) => {
            result.error(path, format!("Invalid expression '{text}': {e}"));
            return;
        }
    };

    if let Err(e) = ThresholdEvaluator::threshold(&cond) {
        let message = format!("Right operand must be a numeric literal: {e}");
        match unquoted_threshold(&cond) {
            Some(fixed) => result.error_with_suggestion(path, message, format!("Did you mean '{fixed}'?")),
            None => result.error(path, message),
        }
    }

    match cond.left.as_variable() {
        None => result.warn(
            path,
            format!(
                "Left operand {} is a {} literal; no samples can be fetched for it",
                cond.left, cond.left.kind
            ),
        ),
        Some(var) => validate_variable(var, path, result),
    }
}

/// Warn when the store cannot resolve `var`, suggesting the closest field name.
fn validate_variable(var: &str, path: &str, result: &mut ValidationResult) {
    if VariableRef::parse(var).is_ok() {
        return;
    }

    let message = format!("Variable '{var}' is not a 'vm[.<resource>[.<interface>]].{{rx|tx}}' reference");
    let last = var.rsplit('.').next().unwrap_or(var);
    let fixed = fuzzy_match(last, SAMPLE_FIELDS)
        .filter(|field| last != *field)
        .map(|field| format!("{}{}", &var[..var.len() - last.len()], field))
        .filter(|fixed| VariableRef::parse(fixed).is_ok());
    match fixed {
        Some(fixed) => result.warn_with_suggestion(path, message, format!("Did you mean '{fixed}'?")),
        None => result.warn(path, message),
    }
}

/// The condition rewritten with a quoted numeric threshold unquoted, if that
/// yields a valid expression.
fn unquoted_threshold(cond: &Condition) -> Option<String> {
    if cond.right.kind != SymbolKind::String {
        return None;
    }
    let fixed = Condition {
        right: Symbol::number(cond.right.text.trim()),
        ..cond.clone()
    }
    .to_string();
    let reparsed = expr::parse(&fixed).ok()?;
    ThresholdEvaluator::threshold(&reparsed).ok()?;
    Some(fixed)
}
