//! Policy expression language.
//!
//! An expression is a single binary comparison such as `vm.rx > 1000`.
//! Text is parsed into a [`SyntaxTree`] of matched rule spans, then
//! [`ConditionBuilder`] walks those spans in order to assemble a [`Condition`].

mod ast;
mod builder;
mod error;
mod grammar;

#[cfg(test)]
mod tests;

pub use self::ast::{Condition, Operator, Symbol, SymbolKind};
pub use self::builder::ConditionBuilder;
pub use self::error::{ExprError, StructuralError, SyntaxError, ValueError};
pub use self::grammar::{parse_tree, Node, Rule, SyntaxTree, Token};

/// Parse expression text into a complete [`Condition`].
///
/// Partial results are never returned: any failure is an error.
pub fn parse(text: &str) -> Result<Condition, ExprError> {
    let tree = parse_tree(text)?;
    Ok(ConditionBuilder::from_tree(&tree)?)
}
