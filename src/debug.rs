//! Tree dumps behind the `debug` subcommand.

use crate::ast::{ClassMember, Comment, CommentKind, Program, Stmt, SwitchCase};
use crate::error::Result;
use crate::parser::{parse_tree, split_hashbang};
use crate::visit::{self, VisitMut};
use std::fmt::Write;
use tree_sitter::Node;

/// The tree-sitter concrete syntax tree of `source`, one node per line.
pub fn syntax_tree(source: &str) -> Result<String> {
    let (_, body) = split_hashbang(source);
    let tree = parse_tree(body)?;
    let mut out = String::new();
    debug_tree(tree.root_node(), body, 0, &mut out);
    Ok(out)
}

fn debug_tree(node: Node, source: &str, indent: usize, out: &mut String) {
    let indent_str = "  ".repeat(indent);
    let text = node.utf8_text(source.as_bytes()).unwrap_or("<error>");
    let text_display = if text.contains('\n') {
        format!("{:?}", text)
    } else {
        text.to_string()
    };

    let _ = writeln!(
        out,
        "{}{}({}): {}",
        indent_str,
        node.kind(),
        if node.child_count() == 0 { "leaf" } else { "parent" },
        text_display
    );

    let mut cursor = node.walk();
    if cursor.goto_first_child() {
        loop {
            debug_tree(cursor.node(), source, indent + 1, out);
            if !cursor.goto_next_sibling() {
                break;
            }
        }
    }
}

/// Statement outline of an attached tree, with every comment shown under
/// the node that owns it. The tree is walked with [`VisitMut`] but left
/// unchanged.
pub fn outline(program: &mut Program) -> String {
    let mut o = Outline::default();
    o.visit_program(program);
    o.out
}

#[derive(Default)]
struct Outline {
    out: String,
    depth: usize,
}

impl Outline {
    fn line(&mut self, text: &str) {
        let _ = writeln!(self.out, "{}{}", "  ".repeat(self.depth), text);
    }
}

impl VisitMut for Outline {
    fn visit_stmt(&mut self, stmt: &mut Stmt) {
        self.line(&format!("{} @{}", stmt.kind_name(), stmt.span.line));
        self.depth += 1;
        visit::walk_stmt(self, stmt);
        self.depth -= 1;
    }

    fn visit_case(&mut self, case: &mut SwitchCase) {
        let label = if case.test.is_some() { "SwitchCase" } else { "SwitchDefault" };
        self.line(&format!("{label} @{}", case.span.line));
        self.depth += 1;
        visit::walk_case(self, case);
        self.depth -= 1;
    }

    fn visit_class_member(&mut self, member: &mut ClassMember) {
        self.line(&format!("ClassMember @{}", member.span.line));
        self.depth += 1;
        visit::walk_class_member(self, member);
        self.depth -= 1;
    }

    fn visit_comments(&mut self, comments: &mut Vec<Comment>) {
        for c in comments.iter() {
            let text = match c.kind {
                CommentKind::Line => format!("//{}", c.text),
                CommentKind::Block => format!("/*{}*/", c.text),
            };
            self.line(&text);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comments::attach;
    use crate::parser::parse;

    #[test]
    fn syntax_tree_lists_nodes() {
        let dump = syntax_tree("#!/usr/bin/env node\nif (x) y();\n").unwrap();
        assert!(dump.starts_with("program(parent)"));
        assert!(dump.contains("  if_statement(parent): if (x) y();"));
    }

    #[test]
    fn outline_shows_owned_comments() {
        let parsed = parse("// lead\nif (x) {\n  y();\n  // tail\n}\n").unwrap();
        let mut program = parsed.program;
        attach(&mut program, parsed.comments).unwrap();
        assert_eq!(
            outline(&mut program),
            "IfStatement @2\n  // lead\n  BlockStatement @2\n    ExpressionStatement @3\n    // tail\n"
        );
    }
}
