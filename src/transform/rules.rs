//! Rewrites that do not reorder anything.

use crate::ast::*;
use crate::visit::{self, VisitMut};
use std::mem;

/// `==` and `!=` become `===` and `!==` unless one side is `null`.
pub fn exact_equals(program: &mut Program) {
    struct ExactEquals;

    impl VisitMut for ExactEquals {
        fn visit_expr(&mut self, expr: &mut Expr) {
            visit::walk_expr(self, expr);
            if let ExprKind::Binary { op, left, right } = &mut expr.kind {
                if left.is_null() || right.is_null() {
                    return;
                }
                match *op {
                    "==" => *op = "===",
                    "!=" => *op = "!==",
                    _ => {}
                }
            }
        }
    }

    ExactEquals.visit_program(program);
}

/// Loop bodies and `if` branches, except an `else if`.
fn bodies(stmt: &mut Stmt) -> Vec<&mut Box<Stmt>> {
    match &mut stmt.kind {
        StmtKind::If {
            consequent,
            alternate,
            ..
        } => {
            let mut out = vec![consequent];
            if let Some(alt) = alternate {
                if !matches!(alt.kind, StmtKind::If { .. }) {
                    out.push(alt);
                }
            }
            out
        }
        StmtKind::While { body, .. }
        | StmtKind::DoWhile { body, .. }
        | StmtKind::For { body, .. }
        | StmtKind::ForIn { body, .. }
        | StmtKind::ForOf { body, .. } => vec![body],
        _ => Vec::new(),
    }
}

/// Wrap every brace-less loop body and `if` branch in a block.
pub fn insert_braces(program: &mut Program) {
    struct InsertBraces;

    impl VisitMut for InsertBraces {
        fn visit_stmt(&mut self, stmt: &mut Stmt) {
            visit::walk_stmt(self, stmt);
            for body in bodies(stmt) {
                if matches!(body.kind, StmtKind::Block(_)) {
                    continue;
                }
                let span = body.span;
                let inner = mem::replace(&mut **body, Stmt::new(StmtKind::Empty, span));
                let block = if matches!(inner.kind, StmtKind::Empty) {
                    Block {
                        body: Vec::new(),
                        trailing: inner.comments,
                        span,
                    }
                } else {
                    Block::new(vec![inner], span)
                };
                **body = Stmt::new(StmtKind::Block(block), span);
            }
        }
    }

    InsertBraces.visit_program(program);
}

/// True when `stmt` ends in an `if` without `else`, so an `else` written
/// after it would bind to that inner `if`.
fn ends_in_open_if(stmt: &Stmt) -> bool {
    match &stmt.kind {
        StmtKind::If {
            alternate: None, ..
        } => true,
        StmtKind::If {
            alternate: Some(alt),
            ..
        } => ends_in_open_if(alt),
        StmtKind::While { body, .. }
        | StmtKind::For { body, .. }
        | StmtKind::ForIn { body, .. }
        | StmtKind::ForOf { body, .. }
        | StmtKind::Labeled { body, .. } => ends_in_open_if(body),
        _ => false,
    }
}

/// Statements that cannot stand alone as a body.
fn needs_block(stmt: &Stmt) -> bool {
    match &stmt.kind {
        StmtKind::If { .. } | StmtKind::Function(_) | StmtKind::Class(_) => true,
        StmtKind::Var(decl) => decl.kind != VarKind::Var,
        _ => false,
    }
}

/// Inverse of [`insert_braces`]: empty body blocks become `;` and blocks
/// holding one uncommented statement are unwrapped where that is safe.
pub fn strip_braces(program: &mut Program) {
    struct StripBraces;

    impl VisitMut for StripBraces {
        fn visit_stmt(&mut self, stmt: &mut Stmt) {
            visit::walk_stmt(self, stmt);
            let has_else = matches!(
                stmt.kind,
                StmtKind::If {
                    alternate: Some(_),
                    ..
                }
            );
            for (i, body) in bodies(stmt).into_iter().enumerate() {
                let StmtKind::Block(block) = &mut body.kind else {
                    continue;
                };
                let span = body.span;
                match block.body.len() {
                    0 => {
                        let mut empty = Stmt::new(StmtKind::Empty, span);
                        empty.comments = mem::take(&mut block.trailing);
                        empty.comments.append(&mut body.comments);
                        **body = empty;
                    }
                    1 if block.trailing.is_empty() && body.comments.is_empty() => {
                        let inner = &block.body[0];
                        let dangling_else = i == 0 && has_else && ends_in_open_if(inner);
                        if inner.comments.is_empty() && !needs_block(inner) && !dangling_else {
                            if let Some(inner) = block.body.pop() {
                                **body = inner;
                            }
                        }
                    }
                    _ => {}
                }
            }
        }
    }

    StripBraces.visit_program(program);
}

/// Append `break` to the last case of every switch that can fall off its end.
pub fn trailing_break(program: &mut Program) {
    struct TrailingBreak;

    impl VisitMut for TrailingBreak {
        fn visit_switch(&mut self, switch: &mut Switch) {
            visit::walk_switch(self, switch);
            if let Some(last) = switch.cases.last_mut() {
                if !ends_in_terminator(&last.consequent) {
                    last.consequent
                        .push(Stmt::new(StmtKind::Break(None), last.span));
                }
            }
        }
    }

    TrailingBreak.visit_program(program);
}

/// Uppercase the first non-space character of every line comment.
pub fn cap_comments(program: &mut Program) {
    struct CapComments;

    impl VisitMut for CapComments {
        fn visit_comments(&mut self, comments: &mut Vec<Comment>) {
            for c in comments.iter_mut().filter(|c| c.kind == CommentKind::Line) {
                c.text = capitalize(&c.text);
            }
        }
    }

    CapComments.visit_program(program);
}

fn capitalize(text: &str) -> String {
    let Some((i, first)) = text.char_indices().find(|&(_, c)| c != ' ') else {
        return text.to_string();
    };
    if !first.is_lowercase() {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    out.push_str(&text[..i]);
    out.extend(first.to_uppercase());
    out.push_str(&text[i + first.len_utf8()..]);
    out
}

/// `var a = 1, b = 2;` becomes one declaration per binding. Only statement
/// lists are touched, so `for` heads keep their shape.
pub fn separate_vars(program: &mut Program) {
    struct SeparateVars;

    impl VisitMut for SeparateVars {
        fn visit_stmts(&mut self, stmts: &mut Vec<Stmt>) {
            visit::walk_stmts(self, stmts);
            if !stmts.iter().any(is_multi_var) {
                return;
            }
            let mut out = Vec::with_capacity(stmts.len());
            for stmt in stmts.drain(..) {
                let (decl, mut comments, span) = match stmt {
                    Stmt {
                        kind: StmtKind::Var(decl),
                        comments,
                        span,
                    } => (decl, comments, span),
                    other => {
                        out.push(other);
                        continue;
                    }
                };
                for declarator in decl.declarators {
                    let single = VarDecl {
                        kind: decl.kind,
                        declarators: vec![declarator],
                        span: decl.span,
                    };
                    let mut split = Stmt::new(StmtKind::Var(single), span);
                    split.comments = mem::take(&mut comments);
                    out.push(split);
                }
            }
            *stmts = out;
        }
    }

    SeparateVars.visit_program(program);
}

fn is_multi_var(stmt: &Stmt) -> bool {
    matches!(&stmt.kind, StmtKind::Var(decl) if decl.declarators.len() > 1)
}
