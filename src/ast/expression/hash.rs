use super::Expression;
use crate::token::Range;

/// `{ <key>: <value>, ... }`.
///
/// Pairs are kept as an ordered sequence rather than a map — key expressions (arbitrary
/// `Expression`s at this stage, before any evaluation) are not necessarily hashable, and
/// preserving source order keeps the compiler's traversal deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashLiteral {
    pub token_literal: String,
    pub pairs: Vec<(Expression, Expression)>,
    pub range: Range,
}
