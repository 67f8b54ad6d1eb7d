//! Scope-resolving compiler pass: a post-order AST visitor whose only job is to build the
//! scope tree and flag undefined references. There is no bytecode target here — "compile"
//! means "resolve names," nothing more.

use std::collections::HashMap;
use std::fmt;

use crate::ast::{Expression, Node, Program, Statement};
use crate::scope::{SymbolTable, SymbolTableRef};
use crate::token::Range;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileError {
    pub message: String,
    pub range: Range,
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.message, self.range)
    }
}

impl std::error::Error for CompileError {}

pub struct Compiler {
    current: SymbolTableRef,
    scopes: HashMap<String, SymbolTableRef>,
    scope_index: usize,
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}

impl Compiler {
    pub fn new() -> Self {
        Self {
            current: SymbolTable::new_root(),
            scopes: HashMap::new(),
            scope_index: 0,
        }
    }

    pub fn root(&self) -> SymbolTableRef {
        self.current.clone()
    }

    pub fn scopes(&self) -> &HashMap<String, SymbolTableRef> {
        &self.scopes
    }

    pub fn scope_index(&self) -> usize {
        self.scope_index
    }

    /// Walks `program`, returning the first name-resolution failure (if any). Scopes
    /// closed before that point stay in `scopes()` and remain usable for completion —
    /// a partial scope tree is still useful to an editor.
    pub fn compile_program(&mut self, program: &Program) -> Result<(), CompileError> {
        for statement in &program.statements {
            self.compile_statement(statement)?;
        }
        Ok(())
    }

    fn compile_statement(&mut self, statement: &Statement) -> Result<(), CompileError> {
        match statement {
            Statement::Let(let_stmt) => {
                self.current.borrow_mut().define(&let_stmt.name.value);
                self.compile_expression(&let_stmt.value)
            }
            Statement::Return(ret) => match &ret.value {
                Some(value) => self.compile_expression(value),
                None => Ok(()),
            },
            Statement::Expression(expr_stmt) => self.compile_expression(&expr_stmt.expression),
            Statement::Block(block) => {
                for statement in &block.statements {
                    self.compile_statement(statement)?;
                }
                Ok(())
            }
        }
    }

    fn compile_expression(&mut self, expression: &Expression) -> Result<(), CompileError> {
        match expression {
            Expression::Integer(_) | Expression::Str(_) | Expression::Boolean(_) => Ok(()),

            Expression::Identifier(ident) => {
                if SymbolTable::resolve(&self.current, &ident.value).is_none() {
                    return Err(CompileError {
                        message: format!("undefined variable {}", ident.value),
                        range: ident.range,
                    });
                }
                Ok(())
            }

            Expression::Prefix(prefix) => self.compile_expression(&prefix.right),

            // A deliberate normalization with no bearing on name resolution: the right
            // operand visits before the left whenever the operator is `<`.
            Expression::Infix(infix) if infix.operator == "<" => {
                self.compile_expression(&infix.right)?;
                self.compile_expression(&infix.left)
            }
            Expression::Infix(infix) => {
                self.compile_expression(&infix.left)?;
                self.compile_expression(&infix.right)
            }

            Expression::If(if_expr) => {
                self.compile_expression(&if_expr.condition)?;
                self.compile_statement(&Statement::Block(if_expr.consequence.clone()))?;
                if let Some(alternative) = &if_expr.alternative {
                    self.compile_statement(&Statement::Block(alternative.clone()))?;
                }
                Ok(())
            }

            Expression::Array(array) => {
                for element in &array.elements {
                    self.compile_expression(element)?;
                }
                Ok(())
            }

            Expression::Hash(hash) => {
                for (key, value) in &hash.pairs {
                    self.compile_expression(key)?;
                    self.compile_expression(value)?;
                }
                Ok(())
            }

            Expression::Index(index) => {
                self.compile_expression(&index.left)?;
                self.compile_expression(&index.index)
            }

            Expression::Function(function) => {
                self.enter_scope(function.body.range);
                if let Some(name) = &function.name {
                    self.current.borrow_mut().define_function_name(name);
                }
                for parameter in &function.parameters {
                    self.current.borrow_mut().define(&parameter.value);
                }
                let result = self.compile_statement(&Statement::Block(function.body.clone()));
                self.leave_scope();
                result
            }

            Expression::Call(call) => {
                self.compile_expression(&call.function)?;
                for argument in &call.arguments {
                    self.compile_expression(argument)?;
                }
                Ok(())
            }
        }
    }

    fn enter_scope(&mut self, range: Range) {
        self.scope_index += 1;
        self.current = SymbolTable::new_enclosed(self.current.clone(), range);
    }

    /// The root scope is never stored in `scopes` — it has no range of its own.
    fn leave_scope(&mut self) {
        let closed = self.current.clone();
        let key = closed.borrow().range.to_string();
        self.scopes.insert(key, closed.clone());
        let parent = closed
            .borrow()
            .parent
            .clone()
            .expect("leave_scope called without a matching enter_scope");
        self.current = parent;
        self.scope_index -= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;

    fn compile(source: &str) -> (Compiler, Result<(), CompileError>) {
        let mut parser = Parser::new(source);
        let program = parser.parse_program();
        assert!(parser.errors().is_empty(), "unexpected parse errors: {:?}", parser.errors());
        let mut compiler = Compiler::new();
        let result = compiler.compile_program(&program);
        (compiler, result)
    }

    #[test]
    fn let_binding_resolves_in_descendant_scope() {
        let (_compiler, result) = compile("let x = 1; let y = fn() { x };");
        assert!(result.is_ok());
    }

    #[test]
    fn identifier_before_its_let_in_same_scope_is_undefined() {
        let (_compiler, result) = compile("let y = x; let x = 1;");
        let err = result.unwrap_err();
        assert_eq!(err.message, "undefined variable x");
    }

    #[test]
    fn function_scope_is_closed_and_keyed_by_its_body_range() {
        let (compiler, result) = compile("let f = fn(a) { let b = a; b };");
        assert!(result.is_ok());
        assert_eq!(compiler.scopes().len(), 1);
    }

    #[test]
    fn nested_function_scopes_are_both_closed() {
        let (compiler, result) = compile("let f = fn(a) { let g = fn(b) { a }; g };");
        assert!(result.is_ok());
        assert_eq!(compiler.scopes().len(), 2);
    }

    #[test]
    fn closed_scope_ranges_are_disjoint_or_nested() {
        let (compiler, _) = compile(
            "let outer = fn(a) {\n  let inner = fn(b) {\n    a\n  };\n  inner\n};",
        );
        let ranges: Vec<Range> = compiler.scopes().values().map(|t| t.borrow().range).collect();
        for (i, a) in ranges.iter().enumerate() {
            for b in ranges.iter().skip(i + 1) {
                let disjoint = a.end.line < b.start.line || b.end.line < a.start.line;
                let nested = (a.start.line <= b.start.line && a.end.line >= b.end.line)
                    || (b.start.line <= a.start.line && b.end.line >= a.end.line);
                assert!(disjoint || nested, "ranges {:?} and {:?} overlap without nesting", a, b);
            }
        }
    }

    #[test]
    fn partial_scope_tree_survives_a_later_undefined_reference() {
        let (compiler, result) = compile("let f = fn(a) { a }; let y = z;");
        assert!(result.is_err());
        assert_eq!(compiler.scopes().len(), 1);
    }
}
