use super::{Node, Statement};
use crate::token::Range;

/// The root of the tree: a sequence of statements. Its range spans the first statement's
/// start to the last statement's end; an empty program has a zeroed range.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Program {
    pub statements: Vec<Statement>,
}

impl Program {
    pub fn new(statements: Vec<Statement>) -> Self {
        Self { statements }
    }
}

impl Node for Program {
    fn range(&self) -> Range {
        match (self.statements.first(), self.statements.last()) {
            (Some(first), Some(last)) => first.range().through(last.range()),
            _ => Range::default(),
        }
    }

    fn token_literal(&self) -> &str {
        self.statements
            .first()
            .map(|s| s.token_literal())
            .unwrap_or("")
    }
}
