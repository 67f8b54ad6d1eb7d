//! Scope-aware completion: constants, builtins and keywords are always offered; symbols
//! visible at a cursor position are added on top by walking the compiler's closed-scope
//! map for the deepest scope whose body encloses that position.

use once_cell::sync::Lazy;

use crate::compiler::Compiler;
use crate::scope::SymbolTable;
use crate::symbol::SymbolScope;
use crate::token::Position;

pub static CONSTANTS: Lazy<Vec<&'static str>> = Lazy::new(|| vec!["null"]);

pub static BUILTINS: Lazy<Vec<&'static str>> = Lazy::new(|| vec!["len", "puts"]);

pub static KEYWORDS: Lazy<Vec<&'static str>> =
    Lazy::new(|| vec!["fn", "let", "if", "else", "return", "true", "false"]);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionItemKind {
    Constant,
    Function,
    Keyword,
    Variable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionItem {
    pub label: String,
    pub kind: CompletionItemKind,
}

impl CompletionItem {
    fn new(label: impl Into<String>, kind: CompletionItemKind) -> Self {
        Self {
            label: label.into(),
            kind,
        }
    }
}

/// Items are emitted without deduplication across the four sources; consumers tolerate
/// duplicate labels.
pub fn complete(compiler: &Compiler, position: Position) -> Vec<CompletionItem> {
    let mut items = Vec::new();

    for name in CONSTANTS.iter() {
        items.push(CompletionItem::new(*name, CompletionItemKind::Constant));
    }
    for name in BUILTINS.iter() {
        items.push(CompletionItem::new(*name, CompletionItemKind::Function));
    }
    for name in KEYWORDS.iter() {
        items.push(CompletionItem::new(*name, CompletionItemKind::Keyword));
    }

    let scope = find_enclosing_scope(compiler, position);
    for symbol in SymbolTable::resolve_all(&scope) {
        let kind = if symbol.scope == SymbolScope::Function {
            CompletionItemKind::Function
        } else {
            CompletionItemKind::Variable
        };
        items.push(CompletionItem::new(symbol.name, kind));
    }

    items
}

/// Starts from the root table (depth 0) and keeps the deepest closed scope whose range
/// strictly contains `position`'s line. On a depth tie, the first candidate found wins —
/// iteration order over the closed-scope map is otherwise unspecified.
fn find_enclosing_scope(
    compiler: &Compiler,
    position: Position,
) -> crate::scope::SymbolTableRef {
    let mut selected = compiler.root();
    let mut selected_depth = selected.borrow().depth;

    for table in compiler.scopes().values() {
        let (range, depth) = {
            let t = table.borrow();
            (t.range, t.depth)
        };
        if range.strictly_contains_line(position) && depth > selected_depth {
            selected = table.clone();
            selected_depth = depth;
        }
    }

    selected
}
