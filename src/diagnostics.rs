//! Diagnostics and code actions produced from a document's text.
//!
//! Two sources feed `analyze`: the literal `"VS Code"` pattern (a deliberate toy feature)
//! and the parser/compiler's own error lists, promoted to real diagnostics rather than
//! only logged.

use crate::ast::Program;
use crate::compiler::Compiler;
use crate::parser::Parser;
use crate::token::{Position, Range};

const TARGET_PATTERN: &str = "VS Code";
const REPLACEMENT: &str = "Neovim";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub range: Range,
    pub message: String,
    pub severity: Severity,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeAction {
    pub title: String,
    pub range: Range,
    pub new_text: String,
}

/// Parses and scope-resolves `text`, returning the best-effort `Program` alongside every
/// diagnostic collected along the way. Parsing never fails outright (see
/// `parser::Parser::parse_program`); a name-resolution failure still yields whatever
/// scopes closed before it did.
pub fn analyze(text: &str) -> (Program, Vec<Diagnostic>) {
    let mut parser = Parser::new(text);
    let program = parser.parse_program();

    let mut diagnostics: Vec<Diagnostic> = parser
        .errors()
        .iter()
        .map(|e| Diagnostic {
            range: e.range.unwrap_or_default(),
            message: e.message.clone(),
            severity: Severity::Error,
        })
        .collect();

    let mut compiler = Compiler::new();
    if let Err(err) = compiler.compile_program(&program) {
        diagnostics.push(Diagnostic {
            range: err.range,
            message: err.message,
            severity: Severity::Error,
        });
    }

    diagnostics.extend(vs_code_diagnostics(text));
    (program, diagnostics)
}

/// One warning per line containing the literal substring `"VS Code"`.
pub fn vs_code_diagnostics(text: &str) -> Vec<Diagnostic> {
    find_matches(text)
        .into_iter()
        .map(|range| Diagnostic {
            range,
            message: format!("Replace \"{TARGET_PATTERN}\" with superior text editor"),
            severity: Severity::Warning,
        })
        .collect()
}

/// One code action per match, each replacing the matched span with `"Neovim"`.
pub fn vs_code_code_actions(text: &str) -> Vec<CodeAction> {
    find_matches(text)
        .into_iter()
        .map(|range| CodeAction {
            title: format!("Replace \"{TARGET_PATTERN}\" with superior text editor"),
            range,
            new_text: REPLACEMENT.to_string(),
        })
        .collect()
}

fn find_matches(text: &str) -> Vec<Range> {
    text.lines()
        .enumerate()
        .filter_map(|(line, content)| {
            content.find(TARGET_PATTERN).map(|col| {
                Range::single_line(line, col, TARGET_PATTERN.len())
            })
        })
        .collect()
}
