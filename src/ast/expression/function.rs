use crate::ast::{BlockStatement, Identifier};
use crate::token::Range;

/// `fn(<parameters>) { <body> }`.
///
/// `name` is `None` for an anonymous literal and `Some(name)` when the parser sees it on
/// the right-hand side of `let name = fn(...) {...}` — the compiler uses that name to
/// introduce a `Function`-scoped self-binding into the function's own inner scope, so
/// recursive calls resolve without being captured as a `Free` variable (see
/// `compiler::Compiler`, `FunctionLiteral` visit rule).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionLiteral {
    pub token_literal: String,
    pub name: Option<String>,
    pub parameters: Vec<Identifier>,
    pub body: BlockStatement,
    pub range: Range,
}
