//! JavaScript parser using tree-sitter
//!
//! This module wraps the [tree-sitter-javascript](https://github.com/tree-sitter/tree-sitter-javascript)
//! grammar. It strips a leading `#!` line, parses the rest, rejects input with
//! syntax errors, collects the comments in source order and lowers the
//! concrete syntax tree into the typed tree of [`crate::ast`].
//!
//! # Example
//!
//! ```rust
//! use jsclean::parser::parse;
//!
//! let parsed = parse("#!/usr/bin/env node\n// hi\nrun();\n").unwrap();
//! assert_eq!(parsed.program.hashbang.as_deref(), Some("#!/usr/bin/env node"));
//! assert_eq!(parsed.program.body.len(), 1);
//! assert_eq!(parsed.comments.len(), 1);
//! ```

use crate::ast::{Comment, CommentKind, Program};
use crate::error::{FormatError, Result};
use crate::lower;
use once_cell::sync::Lazy;
use tree_sitter::{Language, Node, Parser, Tree};

/// The JavaScript language definition for tree-sitter
pub static JAVASCRIPT: Lazy<Language> = Lazy::new(|| tree_sitter_javascript::LANGUAGE.into());

/// Node kinds whose text is emitted verbatim, so nothing inside them is a
/// free-standing comment.
const OPAQUE_KINDS: &[&str] = &["string", "template_string", "regex"];

/// Output of [`parse`]: the typed tree and the raw comment list, not yet
/// attached to any node.
#[derive(Debug)]
pub struct Parsed {
    pub program: Program,
    pub comments: Vec<Comment>,
}

/// Parse JavaScript source into a typed tree plus its comments.
///
/// # Errors
///
/// - [`FormatError::Syntax`] when tree-sitter reports an `ERROR` or `MISSING`
///   node; the position is that of the first one.
/// - [`FormatError::Unsupported`] for constructs outside the supported dialect.
pub fn parse(source: &str) -> Result<Parsed> {
    let (hashbang, body) = split_hashbang(source);
    let tree = parse_tree(body)?;
    let root = tree.root_node();
    if root.has_error() {
        return Err(syntax_error(root, body));
    }

    let comments = collect_comments(root, body)?;
    let mut program = lower::program(root, body)?;
    program.hashbang = hashbang.map(str::to_string);
    tracing::debug!(
        statements = program.body.len(),
        comments = comments.len(),
        "parsed"
    );
    Ok(Parsed { program, comments })
}

/// Run tree-sitter over `source` and return the concrete syntax tree.
pub fn parse_tree(source: &str) -> Result<Tree> {
    let mut parser = Parser::new();
    parser
        .set_language(&JAVASCRIPT)
        .map_err(|e| FormatError::Parser(e.to_string()))?;
    parser
        .parse(source, None)
        .ok_or_else(|| FormatError::Parser("tree-sitter returned no tree".to_string()))
}

/// Split off a `#!` first line.
///
/// The newline stays with the body so line numbers in diagnostics match the
/// original file.
pub fn split_hashbang(source: &str) -> (Option<&str>, &str) {
    if !source.starts_with("#!") {
        return (None, source);
    }
    match source.find('\n') {
        Some(i) => (Some(source[..i].trim_end_matches('\r')), &source[i..]),
        None => (Some(source), ""),
    }
}

fn syntax_error(root: Node<'_>, source: &str) -> FormatError {
    let node = first_error(root).unwrap_or(root);
    let pos = node.start_position();
    let message = if node.is_missing() {
        format!("expected `{}`", node.kind())
    } else {
        let snippet: String = source[node.start_byte()..node.end_byte()]
            .chars()
            .take(20)
            .collect();
        format!("unexpected `{}`", snippet.trim())
    };
    FormatError::Syntax {
        line: pos.row + 1,
        column: pos.column + 1,
        message,
    }
}

fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let children: Vec<_> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error)
}

fn collect_comments(root: Node<'_>, source: &str) -> Result<Vec<Comment>> {
    let mut comments = Vec::new();
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.kind() == "comment" {
            comments.push(comment(node, source)?);
            continue;
        }
        if OPAQUE_KINDS.contains(&node.kind()) {
            continue;
        }
        let mut cursor = node.walk();
        let children: Vec<_> = node.children(&mut cursor).collect();
        // Reversed so the stack pops them in source order.
        stack.extend(children.into_iter().rev());
    }
    Ok(comments)
}

fn comment(node: Node<'_>, source: &str) -> Result<Comment> {
    let span = lower::span(node);
    let raw = &source[node.start_byte()..node.end_byte()];
    if let Some(text) = raw.strip_prefix("//") {
        return Ok(Comment {
            kind: CommentKind::Line,
            text: text.trim_end().to_string(),
            span,
        });
    }
    if let Some(text) = raw.strip_prefix("/*").and_then(|t| t.strip_suffix("*/")) {
        return Ok(Comment {
            kind: CommentKind::Block,
            text: text.to_string(),
            span,
        });
    }
    Err(FormatError::Unsupported {
        construct: raw.chars().take(4).collect(),
        line: span.line,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::StmtKind;

    #[test]
    fn hashbang_is_split_off() {
        assert_eq!(
            split_hashbang("#!/bin/node\nx;\n"),
            (Some("#!/bin/node"), "\nx;\n")
        );
        assert_eq!(split_hashbang("#!/bin/node"), (Some("#!/bin/node"), ""));
        assert_eq!(split_hashbang("x;"), (None, "x;"));
    }

    #[test]
    fn comments_come_back_in_source_order() {
        let parsed = parse("// one\nf(/* two */ 1);\n/* three */\n").unwrap();
        let texts: Vec<_> = parsed.comments.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, [" one", " two ", " three "]);
        assert_eq!(parsed.comments[0].kind, CommentKind::Line);
        assert_eq!(parsed.comments[1].kind, CommentKind::Block);
        assert_eq!(parsed.comments[2].span.line, 3);
    }

    #[test]
    fn comment_lookalikes_in_strings_are_ignored() {
        let parsed = parse("var s = '// not a comment', t = `/* nor */`;\n").unwrap();
        assert!(parsed.comments.is_empty());
    }

    #[test]
    fn syntax_errors_report_their_line() {
        let err = parse("var a = 1;\nvar = ;\n").unwrap_err();
        match err {
            FormatError::Syntax { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn hashbang_keeps_line_numbers() {
        let err = parse("#!/usr/bin/env node\nif (\n").unwrap_err();
        assert!(matches!(err, FormatError::Syntax { line, .. } if line >= 2));
    }

    #[test]
    fn modules_are_unsupported() {
        let err = parse("import x from 'y';\n").unwrap_err();
        assert!(matches!(err, FormatError::Unsupported { line: 1, .. }));
    }

    #[test]
    fn statements_are_lowered() {
        let parsed = parse("var a = 1;\nfunction f() {}\n").unwrap();
        let kinds: Vec<_> = parsed.program.body.iter().map(|s| s.kind_name()).collect();
        assert_eq!(kinds, ["VariableDeclaration", "FunctionDeclaration"]);
        assert!(matches!(parsed.program.body[1].kind, StmtKind::Function(_)));
    }
}
