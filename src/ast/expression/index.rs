use super::Expression;
use crate::token::Range;

/// `<left>[<index>]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexExpression {
    pub token_literal: String,
    pub left: Box<Expression>,
    pub index: Box<Expression>,
    pub range: Range,
}
