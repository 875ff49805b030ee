//! Error taxonomy for parsing, assembling and evaluating expressions.

use super::ast::{Operator, SymbolKind};
use super::grammar::Rule;

/// Expression text does not match the grammar.
///
/// Carries the farthest position the parser reached and the rule it was
/// matching there.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("parse error near {rule} at position {position}: unexpected {}", describe_found(.found))]
pub struct SyntaxError {
    /// Byte offset into the expression text.
    pub position: usize,
    pub rule: Rule,
    /// Offending character, `None` at end of input.
    pub found: Option<char>,
}

fn describe_found(found: &Option<char>) -> String {
    match found {
        Some(c) => format!("{:?}", c),
        None => "end of input".to_string(),
    }
}

/// The condition builder was driven into an invalid state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StructuralError {
    /// A third operand arrived after both slots were filled.
    #[error("too many operands: '{0}' arrived after both sides were set")]
    TooManySymbols(String),

    /// An operator arrived when one was already set.
    #[error("duplicate operator: '{new}' after '{existing}'")]
    DuplicateOperator { existing: Operator, new: Operator },

    /// The condition was finished without two operands and an operator.
    #[error("incomplete condition: {0}")]
    Incomplete(&'static str),
}

/// The right-hand side cannot be used as a numeric threshold.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueError {
    #[error("right-hand side must be a number, found {kind} '{text}'")]
    NonNumericThreshold { kind: SymbolKind, text: String },

    #[error("'{0}' is not a valid number")]
    InvalidNumber(String),
}

/// Any failure turning expression text into a usable condition.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExprError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error(transparent)]
    Structural(#[from] StructuralError),

    #[error(transparent)]
    Value(#[from] ValueError),
}
