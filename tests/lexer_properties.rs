//! Byte-offset invariants for every token the lexer produces.

use pebble_ls::lexer::Lexer;
use pebble_ls::token::TokenKind;

fn literal_width(kind: TokenKind, literal: &str) -> usize {
    match kind {
        TokenKind::Eq | TokenKind::NotEq => 2,
        TokenKind::Str => literal.len() + 2,
        _ => literal.len(),
    }
}

#[test]
fn every_token_range_matches_its_rendered_width_and_line_position() {
    let source = "let x = 10;\nif (x == 10) {\n  return \"ok\";\n}\n";
    let tokens = Lexer::lex_all(source);

    for token in &tokens {
        if token.kind == TokenKind::Eof {
            continue;
        }
        let expected_width = literal_width(token.kind, &token.literal);
        let actual_width = token.range.end.character - token.range.start.character;
        assert_eq!(
            actual_width, expected_width,
            "token {:?} ({:?}) has range {:?}",
            token.kind, token.literal, token.range
        );
        assert_eq!(token.range.start.line, token.range.end.line);
    }
}

#[test]
fn line_and_column_advance_correctly_across_newlines() {
    let tokens = Lexer::lex_all("a\nb\nc");
    let idents: Vec<_> = tokens
        .iter()
        .filter(|t| t.kind == TokenKind::Ident)
        .collect();
    assert_eq!(idents.len(), 3);
    assert_eq!(idents[0].range.start, pebble_ls::token::Position::new(0, 0));
    assert_eq!(idents[1].range.start, pebble_ls::token::Position::new(1, 0));
    assert_eq!(idents[2].range.start, pebble_ls::token::Position::new(2, 0));
}

#[test]
fn string_literal_range_covers_both_quotes() {
    let tokens = Lexer::lex_all("\"foo\"");
    let string_token = tokens
        .iter()
        .find(|t| t.kind == TokenKind::Str)
        .expect("a string token");
    assert_eq!(string_token.literal, "foo");
    assert_eq!(string_token.range.start.character, 0);
    assert_eq!(string_token.range.end.character, 5);
}
