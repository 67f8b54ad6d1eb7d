use crate::token::Range;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegerLiteral {
    pub token_literal: String,
    pub value: i64,
    pub range: Range,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringLiteral {
    pub token_literal: String,
    pub value: String,
    pub range: Range,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BooleanLiteral {
    pub token_literal: String,
    pub value: bool,
    pub range: Range,
}
