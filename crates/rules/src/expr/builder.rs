//! Assembles a [`Condition`] from the parser's matched spans.

use super::ast::{Condition, Operator, Symbol};
use super::error::StructuralError;
use super::grammar::{Rule, SyntaxTree};

/// Operand slots, filled left first.
#[derive(Debug, Clone, Default)]
enum Operands {
    #[default]
    Empty,
    LeftSet(Symbol),
    Complete(Symbol, Symbol),
}

/// Two-slot accumulator for operands plus an independently tracked operator.
#[derive(Debug, Clone, Default)]
pub struct ConditionBuilder {
    operands: Operands,
    operator: Option<Operator>,
}

impl ConditionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Walk the tree's spans in order and assemble the condition.
    pub fn from_tree(tree: &SyntaxTree<'_>) -> Result<Condition, StructuralError> {
        let mut builder = Self::new();
        for token in tree.tokens() {
            match token.rule {
                Rule::Number => builder.add_number(token.text)?,
                Rule::Variable => builder.add_variable(token.text)?,
                Rule::StringText => builder.add_string(token.text)?,
                rule => {
                    if let Some(op) = rule.operator() {
                        builder.add_operator(op)?;
                    }
                }
            }
        }
        builder.finish()
    }

    pub fn add_number(&mut self, text: &str) -> Result<(), StructuralError> {
        self.add_symbol(Symbol::number(text))
    }

    pub fn add_variable(&mut self, text: &str) -> Result<(), StructuralError> {
        self.add_symbol(Symbol::variable(text))
    }

    pub fn add_string(&mut self, text: &str) -> Result<(), StructuralError> {
        self.add_symbol(Symbol::string(text))
    }

    pub fn add_operator(&mut self, op: Operator) -> Result<(), StructuralError> {
        match self.operator {
            Some(existing) => Err(StructuralError::DuplicateOperator { existing, new: op }),
            None => {
                self.operator = Some(op);
                Ok(())
            }
        }
    }

    /// Whether both operands and the operator are set.
    pub fn is_complete(&self) -> bool {
        matches!(self.operands, Operands::Complete(..)) && self.operator.is_some()
    }

    pub fn finish(self) -> Result<Condition, StructuralError> {
        let operator = self.operator.ok_or(StructuralError::Incomplete("missing operator"))?;
        match self.operands {
            Operands::Complete(left, right) => Ok(Condition { left, operator, right }),
            Operands::LeftSet(_) => Err(StructuralError::Incomplete("missing right operand")),
            Operands::Empty => Err(StructuralError::Incomplete("missing operands")),
        }
    }

    fn add_symbol(&mut self, symbol: Symbol) -> Result<(), StructuralError> {
        self.operands = match std::mem::take(&mut self.operands) {
            Operands::Empty => Operands::LeftSet(symbol),
            Operands::LeftSet(left) => Operands::Complete(left, symbol),
            complete @ Operands::Complete(..) => {
                self.operands = complete;
                return Err(StructuralError::TooManySymbols(symbol.to_string()));
            }
        };
        Ok(())
    }
}
