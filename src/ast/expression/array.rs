use super::Expression;
use crate::token::Range;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayLiteral {
    pub token_literal: String,
    pub elements: Vec<Expression>,
    pub range: Range,
}
