//! Recursive-descent parser for the policy expression grammar.
//!
//! ```text
//! root       <- sp expression !.
//! expression <- condition
//! condition  <- symbol ops symbol
//! symbol     <- (number sp) / (string sp) / (variable sp)
//! number     <- '-'? [0-9]+ ('.' [0-9]+)?
//! variable   <- idchar+            idchar <- [a-zA-Z0-9_.-]
//! string     <- '"' (!('"' / '\n' / '\\') .)* '"' sp
//! ops        <- ("==" / "!=" / "<=" / ">=" / "<" / ">") sp
//! sp         <- (' ' / '\t')*
//! ```
//!
//! Alternatives are ordered: once an alternative matches, later ones are not
//! tried, so a leading digit always starts a number and two-character
//! operators win over their one-character prefixes.

use serde::Serialize;
use std::fmt;
use std::ops::Range;

use super::ast::Operator;
use super::error::SyntaxError;

/// Grammar rules that appear in the syntax tree or in errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    Root,
    Expression,
    Condition,
    Symbol,
    Number,
    Variable,
    String,
    /// Content of a string literal, without the quotes.
    StringText,
    Ops,
    OpEq,
    OpNe,
    OpLe,
    OpGe,
    OpLt,
    OpGt,
    EndOfInput,
}

impl Rule {
    /// Operator produced by an operator rule.
    pub fn operator(self) -> Option<Operator> {
        match self {
            Rule::OpEq => Some(Operator::Equal),
            Rule::OpNe => Some(Operator::NotEqual),
            Rule::OpLe => Some(Operator::LessOrEqual),
            Rule::OpGe => Some(Operator::GreaterOrEqual),
            Rule::OpLt => Some(Operator::Less),
            Rule::OpGt => Some(Operator::Greater),
            _ => None,
        }
    }

    fn for_operator(op: Operator) -> Rule {
        match op {
            Operator::Equal => Rule::OpEq,
            Operator::NotEqual => Rule::OpNe,
            Operator::LessOrEqual => Rule::OpLe,
            Operator::GreaterOrEqual => Rule::OpGe,
            Operator::Less => Rule::OpLt,
            Operator::Greater => Rule::OpGt,
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Rule::Root => "root",
            Rule::Expression => "expression",
            Rule::Condition => "condition",
            Rule::Symbol => "symbol",
            Rule::Number => "number",
            Rule::Variable => "variable",
            Rule::String => "string",
            Rule::StringText => "string text",
            Rule::Ops => "operator",
            Rule::OpEq => "'=='",
            Rule::OpNe => "'!='",
            Rule::OpLe => "'<='",
            Rule::OpGe => "'>='",
            Rule::OpLt => "'<'",
            Rule::OpGt => "'>'",
            Rule::EndOfInput => "end of input",
        };
        f.write_str(name)
    }
}

/// A matched rule and the byte span it covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub rule: Rule,
    pub span: Range<usize>,
    pub children: Vec<Node>,
}

impl Node {
    fn leaf(rule: Rule, span: Range<usize>) -> Self {
        Self { rule, span, children: Vec::new() }
    }

    fn branch(rule: Rule, span: Range<usize>, children: Vec<Node>) -> Self {
        Self { rule, span, children }
    }
}

/// One matched span in left-to-right order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub rule: Rule,
    pub span: (usize, usize),
    pub text: &'a str,
}

/// Result of a successful parse: the rule spans over the input text.
#[derive(Debug, Clone)]
pub struct SyntaxTree<'a> {
    input: &'a str,
    root: Node,
}

impl<'a> SyntaxTree<'a> {
    /// Text covered by `node`.
    pub fn text(&self, node: &Node) -> &'a str {
        &self.input[node.span.clone()]
    }

    /// All matched spans in pre-order, i.e. in the order their text starts.
    pub fn tokens(&self) -> Vec<Token<'a>> {
        let mut out = Vec::new();
        self.collect(&self.root, &mut out);
        out
    }

    fn collect(&self, node: &Node, out: &mut Vec<Token<'a>>) {
        out.push(Token {
            rule: node.rule,
            span: (node.span.start, node.span.end),
            text: self.text(node),
        });
        for child in &node.children {
            self.collect(child, out);
        }
    }
}

/// Parse `input` into a syntax tree.
pub fn parse_tree(input: &str) -> Result<SyntaxTree<'_>, SyntaxError> {
    let mut grammar = Grammar::new(input);
    match grammar.root() {
        Some(root) => Ok(SyntaxTree { input, root }),
        None => Err(grammar.error()),
    }
}

// ── Parser state ────────────────────────────────────────────────────

struct Grammar<'a> {
    input: &'a str,
    pos: usize,
    /// Farthest failure seen so far.
    farthest: Option<(usize, Rule)>,
}

impl<'a> Grammar<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0, farthest: None }
    }

    fn error(&self) -> SyntaxError {
        let (position, rule) = self.farthest.unwrap_or((self.pos, Rule::Root));
        SyntaxError {
            position,
            rule,
            found: self.input[position..].chars().next(),
        }
    }

    /// Record a failure. At equal positions the later (outer) rule wins.
    fn fail(&mut self, rule: Rule, at: usize) {
        match self.farthest {
            Some((pos, _)) if pos > at => {}
            _ => self.farthest = Some((at, rule)),
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn eat(&mut self, expected: char) -> bool {
        match self.peek() {
            Some(c) if c == expected => {
                self.pos += c.len_utf8();
                true
            }
            _ => false,
        }
    }

    fn eat_while(&mut self, pred: impl Fn(char) -> bool) -> usize {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
        self.pos - start
    }

    // ── Rules ───────────────────────────────────────────────────────

    fn root(&mut self) -> Option<Node> {
        let start = self.pos;
        self.sp();
        let expression = self.expression()?;
        if self.pos < self.input.len() {
            self.fail(Rule::EndOfInput, self.pos);
            self.pos = start;
            return None;
        }
        Some(Node::branch(Rule::Root, start..self.pos, vec![expression]))
    }

    fn expression(&mut self) -> Option<Node> {
        let start = self.pos;
        let condition = self.condition()?;
        Some(Node::branch(Rule::Expression, start..self.pos, vec![condition]))
    }

    fn condition(&mut self) -> Option<Node> {
        let start = self.pos;
        match self.condition_parts() {
            Some(children) => Some(Node::branch(Rule::Condition, start..self.pos, children)),
            None => {
                self.fail(Rule::Condition, start);
                self.pos = start;
                None
            }
        }
    }

    fn condition_parts(&mut self) -> Option<Vec<Node>> {
        let left = self.symbol()?;
        let ops = self.ops()?;
        let right = self.symbol()?;
        Some(vec![left, ops, right])
    }

    fn symbol(&mut self) -> Option<Node> {
        let start = self.pos;
        let operand = self
            .number()
            .or_else(|| self.string())
            .or_else(|| self.variable());

        match operand {
            Some(node) => {
                self.sp();
                Some(Node::branch(Rule::Symbol, start..self.pos, vec![node]))
            }
            None => {
                self.fail(Rule::Symbol, start);
                None
            }
        }
    }

    fn number(&mut self) -> Option<Node> {
        let start = self.pos;
        self.eat('-');
        if self.eat_while(|c| c.is_ascii_digit()) == 0 {
            self.fail(Rule::Number, self.pos);
            self.pos = start;
            return None;
        }

        let fraction = self.pos;
        if self.eat('.') && self.eat_while(|c| c.is_ascii_digit()) == 0 {
            self.pos = fraction;
        }

        Some(Node::leaf(Rule::Number, start..self.pos))
    }

    fn variable(&mut self) -> Option<Node> {
        let start = self.pos;
        if self.eat_while(is_idchar) == 0 {
            self.fail(Rule::Variable, start);
            return None;
        }
        Some(Node::leaf(Rule::Variable, start..self.pos))
    }

    fn string(&mut self) -> Option<Node> {
        let start = self.pos;
        if !self.eat('"') {
            self.fail(Rule::String, start);
            return None;
        }

        let text_start = self.pos;
        self.eat_while(|c| c != '"' && c != '\n' && c != '\\');
        let text_end = self.pos;

        if !self.eat('"') {
            self.fail(Rule::String, self.pos);
            self.pos = start;
            return None;
        }
        self.sp();

        let text = Node::leaf(Rule::StringText, text_start..text_end);
        Some(Node::branch(Rule::String, start..self.pos, vec![text]))
    }

    fn ops(&mut self) -> Option<Node> {
        let start = self.pos;
        for op in Operator::ALL {
            if self.input[self.pos..].starts_with(op.as_str()) {
                self.pos += op.as_str().len();
                let op_node = Node::leaf(Rule::for_operator(op), start..self.pos);
                self.sp();
                return Some(Node::branch(Rule::Ops, start..self.pos, vec![op_node]));
            }
        }
        self.fail(Rule::Ops, start);
        None
    }

    fn sp(&mut self) {
        self.eat_while(|c| c == ' ' || c == '\t');
    }
}

fn is_idchar(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '.' || c == '-'
}
