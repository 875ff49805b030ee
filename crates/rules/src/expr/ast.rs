//! Parsed form of a policy expression: one binary comparison.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Kind of a parsed operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    Number,
    Variable,
    String,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolKind::Number => write!(f, "number"),
            SymbolKind::Variable => write!(f, "variable"),
            SymbolKind::String => write!(f, "string"),
        }
    }
}

/// A parsed operand with its raw matched text.
///
/// Numbers keep their literal text; conversion happens at evaluation time.
/// For strings, `text` is the content between the quotes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Symbol {
    pub kind: SymbolKind,
    pub text: String,
}

impl Symbol {
    pub fn number(text: impl Into<String>) -> Self {
        Self { kind: SymbolKind::Number, text: text.into() }
    }

    pub fn variable(text: impl Into<String>) -> Self {
        Self { kind: SymbolKind::Variable, text: text.into() }
    }

    pub fn string(text: impl Into<String>) -> Self {
        Self { kind: SymbolKind::String, text: text.into() }
    }

    /// The variable name, if this symbol is a variable reference.
    pub fn as_variable(&self) -> Option<&str> {
        match self.kind {
            SymbolKind::Variable => Some(&self.text),
            _ => None,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            SymbolKind::String => write!(f, "\"{}\"", self.text),
            SymbolKind::Number | SymbolKind::Variable => write!(f, "{}", self.text),
        }
    }
}

/// Comparison operator of a condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Equal,
    NotEqual,
    LessOrEqual,
    GreaterOrEqual,
    Less,
    Greater,
}

impl Operator {
    /// All operators in grammar alternation order (two-character forms first).
    pub const ALL: [Operator; 6] = [
        Operator::Equal,
        Operator::NotEqual,
        Operator::LessOrEqual,
        Operator::GreaterOrEqual,
        Operator::Less,
        Operator::Greater,
    ];

    /// Source text of the operator.
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Equal => "==",
            Operator::NotEqual => "!=",
            Operator::LessOrEqual => "<=",
            Operator::GreaterOrEqual => ">=",
            Operator::Less => "<",
            Operator::Greater => ">",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operator::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| format!("unknown operator: '{}'", s))
    }
}

/// A complete comparison: `left operator right`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Condition {
    pub left: Symbol,
    pub operator: Operator,
    pub right: Symbol,
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.left, self.operator, self.right)
    }
}
