//! Parser totality: `parse_program` always returns a `Program`, and statement ranges never
//! overlap or go backwards, even across malformed input.

use pebble_ls::ast::Node;
use pebble_ls::parser::Parser;

fn statement_ranges(source: &str) -> Vec<(usize, usize)> {
    let mut parser = Parser::new(source);
    let program = parser.parse_program();
    program
        .statements
        .iter()
        .map(|s| (s.range().start.line, s.range().start.character))
        .collect()
}

#[test]
fn well_formed_program_has_non_decreasing_statement_starts() {
    let ranges = statement_ranges("let a = 1;\nlet b = 2;\nlet c = a + b;\n");
    assert_eq!(ranges.len(), 3);
    for pair in ranges.windows(2) {
        assert!(pair[0] <= pair[1]);
    }
}

#[test]
fn malformed_statement_does_not_abort_the_rest_of_the_program() {
    let mut parser = Parser::new("let = 1;\nlet b = 2;\n");
    let program = parser.parse_program();
    assert!(!parser.errors().is_empty());
    assert!(program.statements.iter().any(|s| matches!(
        s,
        pebble_ls::ast::Statement::Let(l) if l.name.value == "b"
    )));
}

#[test]
fn call_binds_tighter_than_infix_addition() {
    let mut parser = Parser::new("let r = f(1) + 2;\n");
    let program = parser.parse_program();
    assert!(parser.errors().is_empty());
    assert_eq!(program.statements.len(), 1);
}

#[test]
fn empty_input_yields_an_empty_program_with_no_errors() {
    let mut parser = Parser::new("");
    let program = parser.parse_program();
    assert!(program.statements.is_empty());
    assert!(parser.errors().is_empty());
}
