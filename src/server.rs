//! LSP method dispatch: decodes one JSON-RPC envelope at a time, mutates `State`
//! synchronously, and returns whatever should be written back through the framed
//! transport. There is no concurrency here by design — see the module docs on
//! [`crate::rpc`] for the framing this sits on top of.

use log::{info, warn};
use lsp_types::{
    CodeActionOrCommand, CodeActionParams, CodeActionProviderCapability, CodeActionResponse,
    CompletionItem as LspCompletionItem, CompletionItemKind as LspCompletionItemKind,
    CompletionOptions, CompletionParams, CompletionResponse, Diagnostic as LspDiagnostic,
    DiagnosticSeverity, DidChangeTextDocumentParams, DidOpenTextDocumentParams,
    DidSaveTextDocumentParams, GotoDefinitionParams, GotoDefinitionResponse, Hover,
    HoverContents, HoverParams, HoverProviderCapability, InitializeParams, InitializeResult,
    Location, MarkedString, OneOf, Position as LspPosition, PublishDiagnosticsParams,
    Range as LspRange, ServerCapabilities, TextDocumentSyncCapability, TextDocumentSyncKind,
    TextEdit, Url, WorkspaceEdit,
};
use serde_json::Value;
use std::collections::HashMap;

use crate::completion;
use crate::diagnostics::{self, Severity};
use crate::document_store::DocumentStore;
use crate::token::{Position, Range};

fn to_internal_position(p: LspPosition) -> Position {
    Position::new(p.line as usize, p.character as usize)
}

fn to_lsp_position(p: Position) -> LspPosition {
    LspPosition::new(p.line as u32, p.character as u32)
}

fn to_lsp_range(r: Range) -> LspRange {
    LspRange::new(to_lsp_position(r.start), to_lsp_position(r.end))
}

fn to_lsp_severity(s: Severity) -> DiagnosticSeverity {
    match s {
        Severity::Error => DiagnosticSeverity::ERROR,
        Severity::Warning => DiagnosticSeverity::WARNING,
    }
}

fn to_lsp_diagnostic(d: diagnostics::Diagnostic) -> LspDiagnostic {
    LspDiagnostic {
        range: to_lsp_range(d.range),
        severity: Some(to_lsp_severity(d.severity)),
        message: d.message,
        ..Default::default()
    }
}

fn to_lsp_completion_item(item: completion::CompletionItem) -> LspCompletionItem {
    let kind = match item.kind {
        completion::CompletionItemKind::Constant => LspCompletionItemKind::CONSTANT,
        completion::CompletionItemKind::Function => LspCompletionItemKind::FUNCTION,
        completion::CompletionItemKind::Keyword => LspCompletionItemKind::KEYWORD,
        completion::CompletionItemKind::Variable => LspCompletionItemKind::VARIABLE,
    };
    LspCompletionItem {
        label: item.label,
        kind: Some(kind),
        ..Default::default()
    }
}

/// A response body destined for the same request id the handler was invoked with, or a
/// notification with no request id at all.
pub enum Outgoing {
    Response(Value),
    Notification { method: &'static str, params: Value },
    None,
}

/// Owns the document store and per-document analysis; the process's single source of
/// mutable state. One `State` lives for the lifetime of the server.
#[derive(Default)]
pub struct State {
    documents: DocumentStore,
    analyses: HashMap<String, crate::compiler::Compiler>,
    shutdown_requested: bool,
}

impl State {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shutdown_requested(&self) -> bool {
        self.shutdown_requested
    }

    fn reanalyze(&mut self, uri: &str) -> Vec<LspDiagnostic> {
        let text = self.documents.get(uri).unwrap_or_default().to_string();
        let (program, diags) = diagnostics::analyze(&text);

        let mut compiler = crate::compiler::Compiler::new();
        let _ = compiler.compile_program(&program);
        self.analyses.insert(uri.to_string(), compiler);

        diags.into_iter().map(to_lsp_diagnostic).collect()
    }

    fn publish_diagnostics(&mut self, uri: &str) -> Outgoing {
        let diagnostics = self.reanalyze(uri);
        let params = PublishDiagnosticsParams {
            uri: parse_uri(uri),
            diagnostics,
            version: None,
        };
        Outgoing::Notification {
            method: "textDocument/publishDiagnostics",
            params: serde_json::to_value(params).expect("PublishDiagnosticsParams always serializes"),
        }
    }

    pub fn initialize(&mut self, _params: InitializeParams) -> InitializeResult {
        InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Kind(
                    TextDocumentSyncKind::FULL,
                )),
                hover_provider: Some(HoverProviderCapability::Simple(true)),
                definition_provider: Some(OneOf::Left(true)),
                code_action_provider: Some(CodeActionProviderCapability::Simple(true)),
                completion_provider: Some(CompletionOptions {
                    trigger_characters: Some(vec![".".to_string()]),
                    ..Default::default()
                }),
                ..Default::default()
            },
            server_info: None,
        }
    }

    pub fn did_open(&mut self, params: DidOpenTextDocumentParams) -> Outgoing {
        let uri = params.text_document.uri.to_string();
        self.documents.open(uri.clone(), params.text_document.text);
        self.publish_diagnostics(&uri)
    }

    pub fn did_change(&mut self, params: DidChangeTextDocumentParams) -> Outgoing {
        let uri = params.text_document.uri.to_string();
        if let Some(change) = params.content_changes.into_iter().last() {
            self.documents.update(uri.clone(), change.text);
        }
        self.publish_diagnostics(&uri)
    }

    /// A save carries no new text of its own; re-publishing diagnostics catches any
    /// analysis that was deferred mid-edit on the last `didChange`.
    pub fn did_save(&mut self, params: DidSaveTextDocumentParams) -> Outgoing {
        let uri = params.text_document.uri.to_string();
        self.publish_diagnostics(&uri)
    }

    pub fn hover(&self, params: HoverParams) -> Hover {
        let uri = params
            .text_document_position_params
            .text_document
            .uri
            .to_string();
        let len = self.documents.get(&uri).map(str::len).unwrap_or(0);
        Hover {
            contents: HoverContents::Scalar(MarkedString::String(format!(
                "File {uri}, Characters: {len}"
            ))),
            range: None,
        }
    }

    /// Placeholder: always points one line below the cursor at column 0.
    pub fn definition(&self, params: GotoDefinitionParams) -> GotoDefinitionResponse {
        let uri = params
            .text_document_position_params
            .text_document
            .uri
            .clone();
        let position = params.text_document_position_params.position;
        let target = LspPosition::new(position.line + 1, 0);
        GotoDefinitionResponse::Scalar(Location {
            uri,
            range: LspRange::new(target, target),
        })
    }

    pub fn code_action(&self, params: CodeActionParams) -> CodeActionResponse {
        let uri = params.text_document.uri;
        let text = self.documents.get(uri.as_str()).unwrap_or_default();
        diagnostics::vs_code_code_actions(text)
            .into_iter()
            .map(|action| {
                let mut changes = HashMap::new();
                changes.insert(
                    uri.clone(),
                    vec![TextEdit {
                        range: to_lsp_range(action.range),
                        new_text: action.new_text,
                    }],
                );
                CodeActionOrCommand::CodeAction(lsp_types::CodeAction {
                    title: action.title,
                    edit: Some(WorkspaceEdit {
                        changes: Some(changes),
                        ..Default::default()
                    }),
                    ..Default::default()
                })
            })
            .collect()
    }

    pub fn completion(&self, params: CompletionParams) -> CompletionResponse {
        let uri = params
            .text_document_position
            .text_document
            .uri
            .to_string();
        let position = to_internal_position(params.text_document_position.position);
        let items = match self.analyses.get(&uri) {
            Some(compiler) => completion::complete(compiler, position),
            None => Vec::new(),
        };
        CompletionResponse::Array(items.into_iter().map(to_lsp_completion_item).collect())
    }

    pub fn request_shutdown(&mut self) {
        self.shutdown_requested = true;
    }
}

fn parse_uri(s: &str) -> Url {
    Url::parse(s).unwrap_or_else(|_| Url::parse("file:///unknown").expect("static URL parses"))
}

/// Dispatches one decoded JSON-RPC envelope. Unknown methods are silently ignored, per
/// the error-handling policy: there is no well-formed response to send for a method this
/// server doesn't implement.
pub fn dispatch(state: &mut State, method: &str, content: &Value) -> Outgoing {
    let id = content.get("id").cloned();
    let params = content.get("params").cloned().unwrap_or(Value::Null);

    macro_rules! respond {
        ($result:expr) => {
            match id {
                Some(id) => Outgoing::Response(serde_json::json!({
                    "jsonrpc": "2.0",
                    "id": id,
                    "result": $result,
                })),
                None => Outgoing::None,
            }
        };
    }

    match method {
        "initialize" => match serde_json::from_value::<InitializeParams>(params) {
            Ok(p) => respond!(state.initialize(p)),
            Err(e) => {
                warn!("could not decode initialize params: {e}");
                Outgoing::None
            }
        },
        "textDocument/didOpen" => match serde_json::from_value(params) {
            Ok(p) => state.did_open(p),
            Err(e) => {
                warn!("could not decode didOpen params: {e}");
                Outgoing::None
            }
        },
        "textDocument/didChange" => match serde_json::from_value(params) {
            Ok(p) => state.did_change(p),
            Err(e) => {
                warn!("could not decode didChange params: {e}");
                Outgoing::None
            }
        },
        "textDocument/didSave" => match serde_json::from_value(params) {
            Ok(p) => state.did_save(p),
            Err(e) => {
                warn!("could not decode didSave params: {e}");
                Outgoing::None
            }
        },
        "textDocument/hover" => match serde_json::from_value(params) {
            Ok(p) => respond!(state.hover(p)),
            Err(e) => {
                warn!("could not decode hover params: {e}");
                Outgoing::None
            }
        },
        "textDocument/definition" => match serde_json::from_value(params) {
            Ok(p) => respond!(state.definition(p)),
            Err(e) => {
                warn!("could not decode definition params: {e}");
                Outgoing::None
            }
        },
        "textDocument/codeAction" => match serde_json::from_value(params) {
            Ok(p) => respond!(state.code_action(p)),
            Err(e) => {
                warn!("could not decode codeAction params: {e}");
                Outgoing::None
            }
        },
        "textDocument/completion" => match serde_json::from_value(params) {
            Ok(p) => respond!(state.completion(p)),
            Err(e) => {
                warn!("could not decode completion params: {e}");
                Outgoing::None
            }
        },
        "shutdown" => {
            state.request_shutdown();
            respond!(Value::Null)
        }
        "exit" => Outgoing::None,
        other => {
            info!("ignoring unknown method {other}");
            Outgoing::None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initialize_advertises_the_documented_capabilities() {
        let mut state = State::new();
        let result = state.initialize(InitializeParams::default());
        assert!(result.capabilities.hover_provider.is_some());
        assert!(result.capabilities.definition_provider.is_some());
        assert!(result.capabilities.code_action_provider.is_some());
        let completion = result.capabilities.completion_provider.unwrap();
        assert_eq!(completion.trigger_characters, Some(vec![".".to_string()]));
    }

    #[test]
    fn did_open_triggers_a_publish_diagnostics_notification() {
        let mut state = State::new();
        let params: DidOpenTextDocumentParams = serde_json::from_value(serde_json::json!({
            "textDocument": { "uri": "file:///a.pebble", "languageId": "pebble", "version": 1, "text": "let y = z;" }
        }))
        .unwrap();
        match state.did_open(params) {
            Outgoing::Notification { method, params } => {
                assert_eq!(method, "textDocument/publishDiagnostics");
                let decoded: PublishDiagnosticsParams = serde_json::from_value(params).unwrap();
                assert_eq!(decoded.diagnostics.len(), 1);
            }
            _ => panic!("expected a notification"),
        }
    }

    #[test]
    fn unknown_method_produces_no_outgoing_message() {
        let mut state = State::new();
        let outgoing = dispatch(&mut state, "workspace/unknownThing", &Value::Null);
        assert!(matches!(outgoing, Outgoing::None));
    }

    #[test]
    fn shutdown_sets_the_flag_and_still_responds() {
        let mut state = State::new();
        let outgoing = dispatch(
            &mut state,
            "shutdown",
            &serde_json::json!({"jsonrpc": "2.0", "id": 1, "method": "shutdown"}),
        );
        assert!(matches!(outgoing, Outgoing::Response(_)));
        assert!(state.shutdown_requested());
    }
}
