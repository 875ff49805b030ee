//! Tests for expression parsing and assembly.

use super::*;

fn syntax_error(text: &str) -> SyntaxError {
    match parse(text) {
        Err(ExprError::Syntax(e)) => e,
        other => panic!("expected syntax error for {:?}, got {:?}", text, other),
    }
}

// ── Successful parses ───────────────────────────────────────────────

#[test]
fn parse_variable_greater_than_number() {
    let cond = parse("vm.instance-01.tap0.rx > 1000").unwrap();
    assert_eq!(cond.left, Symbol::variable("vm.instance-01.tap0.rx"));
    assert_eq!(cond.operator, Operator::Greater);
    assert_eq!(cond.right, Symbol::number("1000"));
}

#[test]
fn parse_every_operator() {
    let cases = [
        ("x == 1", Operator::Equal),
        ("x != 1", Operator::NotEqual),
        ("x <= 1", Operator::LessOrEqual),
        ("x >= 1", Operator::GreaterOrEqual),
        ("x < 1", Operator::Less),
        ("x > 1", Operator::Greater),
    ];
    for (text, op) in cases {
        assert_eq!(parse(text).unwrap().operator, op, "{}", text);
    }
}

#[test]
fn operators_without_whitespace() {
    assert_eq!(parse("x<=5").unwrap().operator, Operator::LessOrEqual);
    assert_eq!(parse("x>=5").unwrap().operator, Operator::GreaterOrEqual);
    assert_eq!(parse("x<5").unwrap().operator, Operator::Less);
    assert_eq!(parse("x!=5").unwrap().operator, Operator::NotEqual);
}

#[test]
fn surrounding_spaces_and_tabs_are_ignored() {
    let cond = parse(" \t vm.rx \t>=\t 10  ").unwrap();
    assert_eq!(cond.left.text, "vm.rx");
    assert_eq!(cond.operator, Operator::GreaterOrEqual);
    assert_eq!(cond.right.text, "10");
}

#[test]
fn number_on_both_sides() {
    let cond = parse("5 < 10").unwrap();
    assert_eq!(cond.left.kind, SymbolKind::Number);
    assert_eq!(cond.right.kind, SymbolKind::Number);
}

#[test]
fn fractional_and_negative_numbers() {
    assert_eq!(parse("x < 0.5").unwrap().right, Symbol::number("0.5"));
    assert_eq!(parse("x < -1").unwrap().right, Symbol::number("-1"));
    assert_eq!(parse("x < -2.25").unwrap().right, Symbol::number("-2.25"));
}

#[test]
fn dash_without_digit_is_a_variable() {
    assert_eq!(parse("x < -foo").unwrap().right, Symbol::variable("-foo"));
}

#[test]
fn string_operand_keeps_inner_text() {
    let cond = parse(r#"name == "eth 0""#).unwrap();
    assert_eq!(cond.right, Symbol::string("eth 0"));
    assert_eq!(cond.to_string(), r#"name == "eth 0""#);
}

#[test]
fn empty_string_operand() {
    let cond = parse(r#"name != """#).unwrap();
    assert_eq!(cond.right, Symbol::string(""));
}

#[test]
fn tokens_follow_source_order() {
    let tree = parse_tree("vm.rx > 10").unwrap();
    let rules: Vec<Rule> = tree.tokens().iter().map(|t| t.rule).collect();
    assert_eq!(
        rules,
        vec![
            Rule::Root,
            Rule::Expression,
            Rule::Condition,
            Rule::Symbol,
            Rule::Variable,
            Rule::Ops,
            Rule::OpGt,
            Rule::Symbol,
            Rule::Number,
        ]
    );

    let texts: Vec<&str> = tree
        .tokens()
        .iter()
        .filter(|t| matches!(t.rule, Rule::Variable | Rule::OpGt | Rule::Number))
        .map(|t| t.text)
        .collect();
    assert_eq!(texts, vec!["vm.rx", ">", "10"]);
}

#[test]
fn display_round_trips() {
    for text in ["vm.rx > 10", "a.b-c_d <= -3.5", r#""s" != x"#, "1 == 1"] {
        let cond = parse(text).unwrap();
        assert_eq!(parse(&cond.to_string()).unwrap(), cond);
    }
}

// ── Syntax errors ───────────────────────────────────────────────────

#[test]
fn missing_right_operand() {
    let err = syntax_error("foo >=");
    assert_eq!(err.position, 6);
    assert_eq!(err.rule, Rule::Symbol);
    assert_eq!(err.found, None);
}

#[test]
fn trailing_characters_after_condition() {
    let err = syntax_error("x > 3 y");
    assert_eq!(err.position, 6);
    assert_eq!(err.rule, Rule::EndOfInput);
    assert_eq!(err.found, Some('y'));
}

#[test]
fn unterminated_string() {
    let err = syntax_error(r#""abc > 3"#);
    assert_eq!(err.rule, Rule::String);
    assert_eq!(err.position, 8);
    assert_eq!(err.found, None);
}

#[test]
fn backslash_not_allowed_in_string() {
    let err = syntax_error(r#"x == "a\b""#);
    assert_eq!(err.rule, Rule::String);
    assert_eq!(err.found, Some('\\'));
}

#[test]
fn leading_digits_always_start_a_number() {
    let err = syntax_error("10abc > 5");
    assert_eq!(err.position, 2);
    assert_eq!(err.rule, Rule::Ops);
    assert_eq!(err.found, Some('a'));
}

#[test]
fn no_operator() {
    let err = syntax_error("x 5");
    assert_eq!(err.rule, Rule::Ops);
    assert_eq!(err.position, 2);
}

#[test]
fn single_equals_is_not_an_operator() {
    let err = syntax_error("x = 1");
    assert_eq!(err.rule, Rule::Ops);
    assert_eq!(err.position, 2);
    assert_eq!(err.found, Some('='));
}

#[test]
fn split_two_character_operator() {
    let err = syntax_error("x > = 1");
    assert_eq!(err.rule, Rule::Symbol);
    assert_eq!(err.position, 4);
}

#[test]
fn empty_input() {
    let err = syntax_error("");
    assert_eq!(err.position, 0);
    assert_eq!(err.found, None);
    assert_eq!(err.rule, Rule::Condition);
}

#[test]
fn boolean_connectives_are_rejected() {
    let err = syntax_error("x > 1 AND y < 2");
    assert_eq!(err.rule, Rule::EndOfInput);
    assert_eq!(err.position, 6);
}

#[test]
fn syntax_error_message_names_rule_and_position() {
    let msg = syntax_error("foo >=").to_string();
    assert_eq!(msg, "parse error near symbol at position 6: unexpected end of input");
}
