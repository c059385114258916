//! Entity extraction from Python source using tree-sitter.
//!
//! A single recursive walk over the parse tree yields the flat, source-ordered
//! sequence of documentable entities for a file: the module itself, then every
//! class, function, and method, including definitions nested inside other
//! definitions or inside control-flow blocks.

use std::path::Path;

use thiserror::Error;
use tree_sitter::{Language, Node, Parser};

use crate::entity::{DocumentableEntity, EntityKind};

/// Extraction failure for a single file.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The source could not be structurally parsed. No partial analysis is
    /// attempted for such a file.
    #[error("syntax error at line {line}")]
    Syntax { line: usize },
    /// The tree-sitter parser itself failed.
    #[error("parser failure: {0}")]
    Parser(String),
}

/// The enclosing scope of a definition, used to distinguish methods
/// from plain functions.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Scope {
    Module,
    Class,
    Function,
}

/// Extracts documentable entities from Python source files.
///
/// tree_sitter::Parser is not Sync, so a parser is created per call;
/// the extractor itself only holds the grammar and is safe to share
/// across worker threads.
pub struct PythonExtractor {
    language: Language,
}

impl PythonExtractor {
    pub fn new() -> Self {
        Self {
            language: tree_sitter_python::LANGUAGE.into(),
        }
    }

    /// Extract the ordered entity sequence for one file.
    ///
    /// The module entity comes first, followed by nested definitions in
    /// source order. A file with syntax errors yields `ExtractError::Syntax`
    /// carrying the first offending line.
    pub fn extract(
        &self,
        path: &Path,
        source: &[u8],
    ) -> Result<Vec<DocumentableEntity>, ExtractError> {
        let mut parser = Parser::new();
        parser
            .set_language(&self.language)
            .map_err(|e| ExtractError::Parser(e.to_string()))?;

        let tree = parser
            .parse(source, None)
            .ok_or_else(|| ExtractError::Parser(format!("failed to parse {}", path.display())))?;

        let root = tree.root_node();
        if root.has_error() {
            return Err(ExtractError::Syntax {
                line: first_error_line(root),
            });
        }

        let module_name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("<module>")
            .to_string();

        let mut entities = vec![DocumentableEntity {
            kind: EntityKind::Module,
            qualified_name: module_name,
            start_line: 1,
            docstring: docstring_of(root, source),
        }];

        let mut scope_path = Vec::new();
        visit(root, source, Scope::Module, &mut scope_path, &mut entities);

        Ok(entities)
    }
}

impl Default for PythonExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Recursively visit `node`'s children, emitting an entity for every
/// definition and descending into its body under the updated scope.
/// Non-definition nodes (if/try/with blocks etc.) pass the enclosing
/// scope through unchanged, so definitions inside them are still found.
fn visit(
    node: Node,
    source: &[u8],
    scope: Scope,
    scope_path: &mut Vec<String>,
    out: &mut Vec<DocumentableEntity>,
) {
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "function_definition" | "class_definition" => {
                emit_definition(child, source, scope, scope_path, out)
            }
            "decorated_definition" => {
                if let Some(def) = child.child_by_field_name("definition") {
                    emit_definition(def, source, scope, scope_path, out);
                }
            }
            _ => visit(child, source, scope, scope_path, out),
        }
    }
}

/// Emit one class or function definition and recurse into its body.
fn emit_definition(
    def: Node,
    source: &[u8],
    scope: Scope,
    scope_path: &mut Vec<String>,
    out: &mut Vec<DocumentableEntity>,
) {
    let name = match def.child_by_field_name("name") {
        Some(n) => node_text(n, source).to_string(),
        None => return,
    };

    let is_class = def.kind() == "class_definition";
    let kind = if is_class {
        EntityKind::Class
    } else if scope == Scope::Class {
        EntityKind::Method
    } else {
        EntityKind::Function
    };

    let qualified_name = if scope_path.is_empty() {
        name.clone()
    } else {
        format!("{}.{}", scope_path.join("."), name)
    };

    let body = def.child_by_field_name("body");
    let docstring = body.and_then(|b| docstring_of(b, source));

    out.push(DocumentableEntity {
        kind,
        qualified_name,
        start_line: def.start_position().row + 1,
        docstring,
    });

    if let Some(body) = body {
        let inner_scope = if is_class { Scope::Class } else { Scope::Function };
        scope_path.push(name);
        visit(body, source, inner_scope, scope_path, out);
        scope_path.pop();
    }
}

/// Return the docstring of a module or block node: the string literal that
/// is the first statement, with quote delimiters stripped. `None` when the
/// first statement is anything else.
fn docstring_of(body: Node, source: &[u8]) -> Option<String> {
    let mut cursor = body.walk();
    let first = body
        .named_children(&mut cursor)
        .find(|n| n.kind() != "comment")?;

    if first.kind() != "expression_statement" {
        return None;
    }
    let expr = first.named_child(0)?;
    // Implicitly concatenated string literals still form one docstring.
    if expr.kind() != "string" && expr.kind() != "concatenated_string" {
        return None;
    }
    // An f-string is a runtime expression, not a docstring.
    if is_format_string(expr, source) {
        return None;
    }

    let mut text = String::new();
    collect_string_content(expr, source, &mut text);
    Some(text)
}

/// Whether a string literal is (or contains) an f-string. Detected by the
/// `f` prefix on the opening delimiter, which also covers f-strings with
/// no interpolation braces.
fn is_format_string(node: Node, source: &[u8]) -> bool {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "interpolation" => return true,
            "string_start" => {
                if node_text(child, source)
                    .chars()
                    .any(|c| c == 'f' || c == 'F')
                {
                    return true;
                }
            }
            "string" | "concatenated_string" => {
                if is_format_string(child, source) {
                    return true;
                }
            }
            _ => {}
        }
    }
    false
}

/// Accumulate the content of a string literal, excluding quote delimiters
/// and prefixes. Escape sequences are kept verbatim; the compliance rules
/// only look at leading and trailing characters.
fn collect_string_content(node: Node, source: &[u8], out: &mut String) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "string_content" | "escape_sequence" => out.push_str(node_text(child, source)),
            "string" | "concatenated_string" => collect_string_content(child, source, out),
            _ => {}
        }
    }
}

/// Line of the first ERROR or MISSING node under `node` (1-indexed).
fn first_error_line(node: Node) -> usize {
    if node.is_error() || node.is_missing() {
        return node.start_position().row + 1;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.has_error() {
            return first_error_line(child);
        }
    }
    node.start_position().row + 1
}

fn node_text<'a>(node: Node, source: &'a [u8]) -> &'a str {
    node.utf8_text(source).unwrap_or("")
}
