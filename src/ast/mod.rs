//! Abstract syntax tree.
//!
//! Modeled as a flat sum type per node family (`Statement`, `Expression`), each variant
//! carrying its own range — no `dyn Node` hierarchy. The compiler's scope-resolving
//! visitor (`crate::compiler`) is a `match` over these variants; that dividend only pays
//! off for a tree this shallow because every node kind is known up front.

mod expression;
mod program;
mod statement;

pub use expression::*;
pub use program::*;
pub use statement::*;

use crate::token::Range;

/// Every statement and expression variant carries a range; node-specific accessors are
/// implemented per family rather than through a shared trait object.
pub trait Node {
    fn range(&self) -> Range;
    fn token_literal(&self) -> &str;
}
