//! Lexical symbol tables, chained by an enclosing-scope pointer.
//!
//! The tree is shared, not owned top-down: a completed (function-body) scope keeps its
//! parent pointer alive so that a later, standalone query (`Completion::complete`, long
//! after the compiler has moved on to sibling scopes) can still walk outward to globals
//! and enclosing locals. That rules out a plain `Option<Box<SymbolTable>>` — popping a
//! scope would either drop it or sever it from its parent. `Rc<RefCell<_>>` gives the
//! shared, freely-aliased ownership this graph needs without reaching for an arena; see
//! `compiler::Compiler::enter_scope`/`leave_scope`.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::symbol::{Symbol, SymbolScope};
use crate::token::Range;

pub type SymbolTableRef = Rc<RefCell<SymbolTable>>;

#[derive(Debug)]
pub struct SymbolTable {
    pub parent: Option<SymbolTableRef>,
    store: HashMap<String, Symbol>,
    num_definitions: usize,
    pub depth: usize,
    pub range: Range,
    pub free_symbols: Vec<Symbol>,
}

impl SymbolTable {
    pub fn new_root() -> SymbolTableRef {
        Rc::new(RefCell::new(SymbolTable {
            parent: None,
            store: HashMap::new(),
            num_definitions: 0,
            depth: 0,
            range: Range::default(),
            free_symbols: Vec::new(),
        }))
    }

    pub fn new_enclosed(outer: SymbolTableRef, range: Range) -> SymbolTableRef {
        let depth = outer.borrow().depth + 1;
        Rc::new(RefCell::new(SymbolTable {
            parent: Some(outer),
            store: HashMap::new(),
            num_definitions: 0,
            depth,
            range,
            free_symbols: Vec::new(),
        }))
    }

    /// Global if this is the root table, Local otherwise. Overwrites any prior entry for
    /// the same name, matching shadowing-by-redeclaration within one scope.
    pub fn define(&mut self, name: &str) -> Symbol {
        let scope = if self.parent.is_none() {
            SymbolScope::Global
        } else {
            SymbolScope::Local
        };
        let symbol = Symbol {
            name: name.to_string(),
            scope,
            index: self.num_definitions,
        };
        self.store.insert(name.to_string(), symbol.clone());
        self.num_definitions += 1;
        symbol
    }

    pub fn define_builtin(&mut self, index: usize, name: &str) -> Symbol {
        let symbol = Symbol {
            name: name.to_string(),
            scope: SymbolScope::Builtin,
            index,
        };
        self.store.insert(name.to_string(), symbol.clone());
        symbol
    }

    /// Self-binding for a named function literal, so recursive calls resolve locally
    /// rather than being captured as a `Free` variable.
    pub fn define_function_name(&mut self, name: &str) -> Symbol {
        let symbol = Symbol {
            name: name.to_string(),
            scope: SymbolScope::Function,
            index: 0,
        };
        self.store.insert(name.to_string(), symbol.clone());
        symbol
    }

    fn define_free(&mut self, original: Symbol) -> Symbol {
        self.free_symbols.push(original.clone());
        let symbol = Symbol {
            name: original.name.clone(),
            scope: SymbolScope::Free,
            index: self.free_symbols.len() - 1,
        };
        self.store.insert(original.name, symbol.clone());
        symbol
    }

    /// Looks up `name` in `table`, then its ancestors. A binding captured from a
    /// non-global, non-builtin ancestor is synthesized as `Free`, cached in `table`'s own
    /// store and appended to its `free_symbols` — this is the one place symbol
    /// resolution is NOT a pure read (see `resolve_all` for the pure variant completion
    /// uses instead).
    pub fn resolve(table: &SymbolTableRef, name: &str) -> Option<Symbol> {
        if let Some(sym) = table.borrow().store.get(name).cloned() {
            return Some(sym);
        }
        let parent = table.borrow().parent.clone()?;
        let resolved = Self::resolve(&parent, name)?;
        if matches!(resolved.scope, SymbolScope::Global | SymbolScope::Builtin) {
            return Some(resolved);
        }
        Some(table.borrow_mut().define_free(resolved))
    }

    /// All symbols visible from `table`, nearer scopes shadowing farther ones. Never
    /// mutates `free_symbols` — safe to call repeatedly for completion.
    pub fn resolve_all(table: &SymbolTableRef) -> Vec<Symbol> {
        let mut seen: HashMap<String, Symbol> = HashMap::new();
        let mut current = Some(table.clone());
        while let Some(t) = current {
            let t = t.borrow();
            for (name, symbol) in t.store.iter() {
                seen.entry(name.clone()).or_insert_with(|| symbol.clone());
            }
            current = t.parent.clone();
        }
        seen.into_values().collect()
    }
}
