//! # Expression Renaming
//!
//! Parses an expression with tree-sitter, swaps every bound identifier for
//! its generated name and prints the result back on one compact line.
//!
//! Member-expression property names and labels (`statement_identifier`)
//! are left alone. Object-literal keys are renamed like any other name, so
//! `({ first: second })` becomes `({n:u})`, and shorthand properties are
//! renamed in place: `({ second })` becomes `({u})`.

use crate::BindingsError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tree_sitter::{Node, Parser};

/// Node kinds whose text is a variable reference.
const RENAMED_KINDS: [&str; 3] = [
    "identifier",
    "shorthand_property_identifier",
    "shorthand_property_identifier_pattern",
];

/// Parents whose `key` field is a renamed `property_identifier`.
const KEYED_KINDS: [&str; 2] = ["pair", "pair_pattern"];

/// Node kinds printed verbatim, without descending into them.
const ATOMIC_KINDS: [&str; 3] = ["string", "number", "regex"];

/// Statements terminated with `;` when printed.
const TERMINATED_KINDS: [&str; 8] = [
    "expression_statement",
    "lexical_declaration",
    "variable_declaration",
    "return_statement",
    "throw_statement",
    "break_statement",
    "continue_statement",
    "debugger_statement",
];

/// Original-to-generated names of one scope.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MappedScopeBindings {
    pub bindings: BTreeMap<String, String>,
}

impl MappedScopeBindings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a binding.
    #[must_use]
    pub fn with_binding(mut self, original: impl Into<String>, generated: impl Into<String>) -> Self {
        self.bindings.insert(original.into(), generated.into());
        self
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MappedScopeBindings {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            bindings: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Rewrite `expression` so original names use their generated counterparts.
///
/// `scopes` is ordered innermost-first; the first scope binding a name
/// wins. One trailing `;` is stripped from the output.
pub fn replace_original_variable_name(
    expression: &str,
    scopes: &[MappedScopeBindings],
) -> Result<String, BindingsError> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_javascript::LANGUAGE.into())
        .map_err(|e| BindingsError::Language(e.to_string()))?;

    let tree = parser
        .parse(expression, None)
        .ok_or_else(|| BindingsError::Language("parser produced no tree".to_string()))?;
    let root = tree.root_node();

    if root.has_error() {
        let offset = first_error_offset(root);
        tracing::debug!(offset, "expression has a syntax error");
        return Err(BindingsError::Syntax { offset });
    }

    let mut printer = Printer::new(expression, scopes);
    printer.print(root);

    let mut output = printer.finish();
    if output.ends_with(';') {
        output.pop();
    }
    Ok(output)
}

/// Byte offset of the first error or missing node.
fn first_error_offset(root: Node<'_>) -> usize {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            return node.start_byte();
        }
        let mut cursor = node.walk();
        let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
        stack.extend(children.into_iter().rev().filter(|c| c.has_error()));
    }
    root.start_byte()
}

// =============================================================================
// COMPACT PRINTER
// =============================================================================

struct Printer<'a> {
    source: &'a str,
    scopes: &'a [MappedScopeBindings],
    out: String,
    last_was_integer: bool,
}

impl<'a> Printer<'a> {
    fn new(source: &'a str, scopes: &'a [MappedScopeBindings]) -> Self {
        Self {
            source,
            scopes,
            out: String::with_capacity(source.len()),
            last_was_integer: false,
        }
    }

    fn finish(self) -> String {
        self.out
    }

    /// Print the subtree rooted at `root`, walking it with a cursor.
    fn print(&mut self, root: Node<'_>) {
        let mut cursor = root.walk();
        loop {
            let descend = self.enter(cursor.node());
            if descend && cursor.goto_first_child() {
                continue;
            }

            loop {
                self.leave(cursor.node());
                if cursor.node() == root {
                    return;
                }
                if cursor.goto_next_sibling() {
                    break;
                }
                if !cursor.goto_parent() {
                    return;
                }
            }
        }
    }

    /// Emit what `node` contributes on the way down. Returns whether its
    /// children must be visited.
    fn enter(&mut self, node: Node<'_>) -> bool {
        let kind = node.kind();

        if node.is_extra() || kind == "comment" {
            return false;
        }

        if RENAMED_KINDS.contains(&kind) || is_object_key(node) {
            let name = self.text(node);
            let scopes = self.scopes;
            let renamed = scopes
                .iter()
                .find_map(|scope| scope.bindings.get(name))
                .map_or(name, String::as_str);
            self.push_token(renamed, false);
            return false;
        }

        if ATOMIC_KINDS.contains(&kind) {
            let text = self.text(node);
            let integer = kind == "number" && text.bytes().all(|b| b.is_ascii_digit());
            self.push_token(text, integer);
            return false;
        }

        if kind == "template_string" {
            self.print_template(node);
            return false;
        }

        if node.child_count() == 0 {
            let text = self.text(node);
            if !text.is_empty() {
                self.push_token(text, false);
            }
            return false;
        }

        true
    }

    /// Emit what `node` contributes on the way up.
    fn leave(&mut self, node: Node<'_>) {
        if TERMINATED_KINDS.contains(&node.kind()) && !self.out.ends_with(';') {
            self.push_token(";", false);
        }
    }

    /// Template strings keep their raw text; only substitutions are
    /// printed (and renamed).
    fn print_template(&mut self, node: Node<'_>) {
        let mut position = node.start_byte();
        let mut first = true;
        let mut cursor = node.walk();

        for child in node.children(&mut cursor) {
            if child.kind() != "template_substitution" {
                continue;
            }
            let raw = self.slice(position, child.start_byte());
            self.push_raw(raw, first);
            first = false;

            self.push_raw("${", false);
            let mut inner = child.walk();
            for expression in child.named_children(&mut inner) {
                self.print(expression);
            }
            self.push_raw("}", false);
            position = child.end_byte();
        }

        let raw = self.slice(position, node.end_byte());
        self.push_raw(raw, first);
    }

    fn push_raw(&mut self, raw: &str, spaced: bool) {
        if spaced {
            self.push_token(raw, false);
        } else {
            self.out.push_str(raw);
            self.last_was_integer = false;
        }
    }

    fn push_token(&mut self, token: &str, integer: bool) {
        if self.needs_space(token) {
            self.out.push(' ');
        }
        self.out.push_str(token);
        self.last_was_integer = integer;
    }

    /// Whether `token` would fuse with the output so far.
    fn needs_space(&self, token: &str) -> bool {
        let (Some(prev), Some(next)) = (self.out.chars().last(), token.chars().next()) else {
            return false;
        };

        (is_word_char(prev) && is_word_char(next))
            || ((prev == '+' || prev == '-') && next == prev)
            || (prev == '/' && (next == '/' || next == '*'))
            || (self.last_was_integer && next == '.')
    }

    fn text(&self, node: Node<'_>) -> &'a str {
        self.slice(node.start_byte(), node.end_byte())
    }

    fn slice(&self, start: usize, end: usize) -> &'a str {
        self.source.get(start..end).unwrap_or_default()
    }
}

/// Whether `node` is the key of an object-literal or pattern property.
fn is_object_key(node: Node<'_>) -> bool {
    node.kind() == "property_identifier"
        && node.parent().is_some_and(|parent| {
            KEYED_KINDS.contains(&parent.kind())
                && parent.child_by_field_name("key") == Some(node)
        })
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

// =============================================================================
// TESTS
// =============================================================================
