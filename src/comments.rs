//! Comment attachment
//!
//! Comments arrive from the parser as a flat, source-ordered list. [`attach`]
//! hands each one to a node in three steps:
//!
//! 1. **Seed**: every comment goes to the first node, in pre-order, that
//!    starts at or after the comment's end. Comments with no such node inside
//!    their block, switch body or class body become that container's
//!    `trailing` comments; leftovers at the end of the file go to the program.
//! 2. **Bubble**: nodes that may not own comments (expressions, patterns,
//!    blocks in body position) hand theirs up to the nearest owner. Owners are
//!    statements in a statement list, brace-less bodies, switch cases, class
//!    members, array elements, object literal properties and the declaration
//!    in a `for` init clause.
//! 3. **Verify**: no comment may sit on a non-owner, and none may be lost.

use crate::ast::*;
use crate::error::{FormatError, Result};
use crate::visit::{self, VisitMut};
use std::collections::VecDeque;
use std::mem;

/// Attach `comments` to the nodes of `program`.
///
/// # Errors
///
/// [`FormatError::DetachedComment`] or [`FormatError::CommentCount`] when the
/// result breaks the ownership rules. Both indicate a bug, not bad input.
pub fn attach(program: &mut Program, comments: Vec<Comment>) -> Result<()> {
    let expected = comments.len();

    let mut seeder = Seeder {
        pending: comments.into(),
    };
    seeder.visit_program(program);

    Bubbler::default().visit_program(program);

    let mut verifier = Verifier::default();
    verifier.visit_program(program);
    if let Some(err) = verifier.error {
        return Err(err);
    }

    let found = count(program);
    if found != expected {
        return Err(FormatError::CommentCount { expected, found });
    }
    tracing::debug!(comments = expected, "attached comments");
    Ok(())
}

/// Number of comments anywhere in the tree.
///
/// Takes the tree mutably only because it walks with [`VisitMut`]; nothing
/// is changed.
pub fn count(program: &mut Program) -> usize {
    struct Counter(usize);

    impl VisitMut for Counter {
        fn visit_comments(&mut self, comments: &mut Vec<Comment>) {
            self.0 += comments.len();
        }
    }

    let mut counter = Counter(0);
    counter.visit_program(program);
    counter.0
}

struct Seeder {
    pending: VecDeque<Comment>,
}

impl Seeder {
    /// Move every pending comment ending at or before `offset` into `out`.
    fn take(&mut self, offset: usize, out: &mut Vec<Comment>) {
        while let Some(c) = self.pending.pop_front() {
            if c.span.end > offset {
                self.pending.push_front(c);
                break;
            }
            out.push(c);
        }
    }
}

impl VisitMut for Seeder {
    fn visit_program(&mut self, program: &mut Program) {
        self.visit_stmts(&mut program.body);
        program.trailing.extend(self.pending.drain(..));
    }

    fn visit_stmt(&mut self, stmt: &mut Stmt) {
        self.take(stmt.span.start, &mut stmt.comments);
        visit::walk_stmt(self, stmt);
    }

    fn visit_block(&mut self, block: &mut Block) {
        self.visit_stmts(&mut block.body);
        self.take(block.span.end, &mut block.trailing);
    }

    fn visit_switch(&mut self, switch: &mut Switch) {
        self.visit_expr(&mut switch.discriminant);
        for case in &mut switch.cases {
            self.visit_case(case);
        }
        self.take(switch.span.end, &mut switch.trailing);
    }

    fn visit_case(&mut self, case: &mut SwitchCase) {
        self.take(case.span.start, &mut case.comments);
        visit::walk_case(self, case);
    }

    fn visit_for_init(&mut self, init: &mut ForInit) {
        if let ForInit::Var { decl, comments } = init {
            self.take(decl.span.start, comments);
        }
        visit::walk_for_init(self, init);
    }

    fn visit_class(&mut self, class: &mut Class) {
        if let Some(superclass) = &mut class.superclass {
            self.visit_expr(superclass);
        }
        for member in &mut class.members {
            self.visit_class_member(member);
        }
        self.take(class.span.end, &mut class.trailing);
    }

    fn visit_class_member(&mut self, member: &mut ClassMember) {
        self.take(member.span.start, &mut member.comments);
        visit::walk_class_member(self, member);
    }

    fn visit_expr(&mut self, expr: &mut Expr) {
        self.take(expr.span.start, &mut expr.comments);
        visit::walk_expr(self, expr);
    }

    fn visit_property(&mut self, property: &mut Property) {
        self.take(property.span.start, &mut property.comments);
        visit::walk_property(self, property);
    }
}

/// Nodes with their own comment list.
pub(crate) trait Owner {
    fn comments(&self) -> &[Comment];
    fn comments_mut(&mut self) -> &mut Vec<Comment>;
}

macro_rules! impl_owner {
    ($($ty:ty),*) => {
        $(impl Owner for $ty {
            fn comments(&self) -> &[Comment] {
                &self.comments
            }

            fn comments_mut(&mut self) -> &mut Vec<Comment> {
                &mut self.comments
            }
        })*
    };
}

impl_owner!(Stmt, Expr, SwitchCase, ClassMember, Property);

/// A brace-less body keeps its comments; a block body passes them up.
fn body_owns_comments(body: &Stmt) -> bool {
    !matches!(body.kind, StmtKind::Block(_))
}

/// Collects the comments of non-owners into `sink`, the list of the owner
/// currently being settled.
#[derive(Default)]
struct Bubbler {
    sink: Vec<Comment>,
}

impl Bubbler {
    fn settle<T: Owner>(&mut self, node: &mut T, walk: fn(&mut Self, &mut T)) {
        let outer = mem::take(&mut self.sink);
        walk(self, node);
        let mut owned = mem::replace(&mut self.sink, outer);
        owned.sort_by_key(|c| c.span.start);
        *node.comments_mut() = owned;
    }

    /// Like [`visit::walk_stmt`], except that an `else if` passes its
    /// comments to the enclosing `if`.
    fn walk_stmt(&mut self, stmt: &mut Stmt) {
        let StmtKind::If {
            test,
            consequent,
            alternate,
        } = &mut stmt.kind
        else {
            visit::walk_stmt(self, stmt);
            return;
        };
        self.visit_comments(&mut stmt.comments);
        self.visit_expr(test);
        self.visit_stmt(consequent);
        match alternate {
            Some(alt) if matches!(alt.kind, StmtKind::If { .. }) => self.walk_stmt(alt),
            Some(alt) => self.visit_stmt(alt),
            None => {}
        }
    }
}

impl VisitMut for Bubbler {
    fn visit_program(&mut self, program: &mut Program) {
        self.visit_stmts(&mut program.body);
    }

    fn visit_stmts(&mut self, stmts: &mut Vec<Stmt>) {
        for stmt in stmts {
            self.settle(stmt, Self::walk_stmt);
        }
    }

    /// Only reached for statements in body position.
    fn visit_stmt(&mut self, stmt: &mut Stmt) {
        if body_owns_comments(stmt) {
            self.settle(stmt, Self::walk_stmt);
        } else {
            self.walk_stmt(stmt);
        }
    }

    // Trailing comments already belong to their container.

    fn visit_block(&mut self, block: &mut Block) {
        self.visit_stmts(&mut block.body);
    }

    fn visit_switch(&mut self, switch: &mut Switch) {
        self.visit_expr(&mut switch.discriminant);
        for case in &mut switch.cases {
            self.settle(case, visit::walk_case);
        }
    }

    fn visit_class(&mut self, class: &mut Class) {
        if let Some(superclass) = &mut class.superclass {
            self.visit_expr(superclass);
        }
        for member in &mut class.members {
            self.settle(member, visit::walk_class_member);
        }
    }

    fn visit_for_init(&mut self, init: &mut ForInit) {
        match init {
            ForInit::Var { decl, comments } => {
                let outer = mem::take(&mut self.sink);
                self.sink.append(comments);
                self.visit_var(decl);
                let mut owned = mem::replace(&mut self.sink, outer);
                owned.sort_by_key(|c| c.span.start);
                *comments = owned;
            }
            ForInit::Expr(expr) => self.visit_expr(expr),
        }
    }

    fn visit_expr(&mut self, expr: &mut Expr) {
        match &mut expr.kind {
            ExprKind::Array(items) => {
                self.sink.append(&mut expr.comments);
                for item in items {
                    self.settle(item, Self::visit_expr);
                }
            }
            ExprKind::Object(props) => {
                self.sink.append(&mut expr.comments);
                for prop in props {
                    self.settle(prop, visit::walk_property);
                }
            }
            _ => visit::walk_expr(self, expr),
        }
    }

    fn visit_comments(&mut self, comments: &mut Vec<Comment>) {
        self.sink.append(comments);
    }
}

/// Reports the first comment left on a node that may not own one.
#[derive(Default)]
struct Verifier {
    /// Set right before visiting a node in owner position.
    owner: bool,
    error: Option<FormatError>,
}

impl Verifier {
    fn check(&mut self, comments: &[Comment], kind: &'static str) {
        let allowed = mem::take(&mut self.owner);
        if allowed || self.error.is_some() {
            return;
        }
        if let Some(c) = comments.first() {
            self.error = Some(FormatError::DetachedComment {
                kind,
                line: c.span.line,
            });
        }
    }
}

impl VisitMut for Verifier {
    fn visit_stmts(&mut self, stmts: &mut Vec<Stmt>) {
        for stmt in stmts {
            self.owner = true;
            self.visit_stmt(stmt);
        }
    }

    fn visit_stmt(&mut self, stmt: &mut Stmt) {
        self.owner |= body_owns_comments(stmt);
        self.check(&stmt.comments, stmt.kind_name());
        visit::walk_stmt(self, stmt);
    }

    fn visit_for_init(&mut self, init: &mut ForInit) {
        match init {
            ForInit::Var { decl, .. } => self.visit_var(decl),
            ForInit::Expr(expr) => self.visit_expr(expr),
        }
    }

    fn visit_expr(&mut self, expr: &mut Expr) {
        self.check(&expr.comments, expr.kind_name());
        match &mut expr.kind {
            ExprKind::Array(items) => {
                for item in items {
                    self.owner = true;
                    self.visit_expr(item);
                }
            }
            ExprKind::Object(props) => {
                for prop in props {
                    visit::walk_property(self, prop);
                }
            }
            _ => visit::walk_expr(self, expr),
        }
    }

    fn visit_property(&mut self, property: &mut Property) {
        self.check(&property.comments, "Property");
        visit::walk_property(self, property);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn attached(source: &str) -> Program {
        let parsed = parse(source).unwrap();
        let mut program = parsed.program;
        attach(&mut program, parsed.comments).unwrap();
        program
    }

    fn texts(comments: &[Comment]) -> Vec<&str> {
        comments.iter().map(|c| c.text.as_str()).collect()
    }

    #[test]
    fn leading_comment_goes_to_statement() {
        let program = attached("// one\nfoo();\n// two\nbar();\n");
        assert_eq!(texts(&program.body[0].comments), [" one"]);
        assert_eq!(texts(&program.body[1].comments), [" two"]);
    }

    #[test]
    fn expression_comments_bubble_to_statement() {
        let program = attached("f(/* a */ 1, /* b */ 2);\n");
        assert_eq!(texts(&program.body[0].comments), [" a ", " b "]);
    }

    #[test]
    fn block_body_comments_bubble_to_compound_statement() {
        let program = attached("if (x) /* c */ {\n  y();\n}\n");
        assert_eq!(texts(&program.body[0].comments), [" c "]);
    }

    #[test]
    fn braceless_body_keeps_its_comment() {
        let program = attached("if (x)\n  // c\n  y();\n");
        let StmtKind::If { consequent, .. } = &program.body[0].kind else {
            panic!("not an if");
        };
        assert!(program.body[0].comments.is_empty());
        assert_eq!(texts(&consequent.comments), [" c"]);
    }

    #[test]
    fn dangling_comments_stay_in_their_container() {
        let program = attached("function f() {\n  x();\n  // end\n}\n// eof\n");
        let StmtKind::Function(f) = &program.body[0].kind else {
            panic!("not a function");
        };
        assert_eq!(texts(&f.body.trailing), [" end"]);
        assert_eq!(texts(&program.trailing), [" eof"]);
    }

    #[test]
    fn literal_members_own_their_comments() {
        let program = attached("var o = {\n  // first\n  a: 1,\n  b: [\n    // elem\n    2,\n  ],\n};\n");
        let StmtKind::Var(decl) = &program.body[0].kind else {
            panic!("not a var");
        };
        let Some(Expr {
            kind: ExprKind::Object(props),
            ..
        }) = &decl.declarators[0].init
        else {
            panic!("not an object");
        };
        assert_eq!(texts(&props[0].comments), [" first"]);
        let PropKind::Init { value, .. } = &props[1].kind else {
            panic!("not a pair");
        };
        let ExprKind::Array(items) = &value.kind else {
            panic!("not an array");
        };
        assert_eq!(texts(&items[0].comments), [" elem"]);
        assert!(program.body[0].comments.is_empty());
    }

    #[test]
    fn switch_cases_own_their_comments() {
        let program = attached("switch (x) {\n  // one\n  case 1:\n    break;\n  // tail\n}\n");
        let StmtKind::Switch(switch) = &program.body[0].kind else {
            panic!("not a switch");
        };
        assert_eq!(texts(&switch.cases[0].comments), [" one"]);
        assert_eq!(texts(&switch.trailing), [" tail"]);
    }

    #[test]
    fn else_if_comments_move_to_outer_if() {
        let program = attached("if (a) {\n  x();\n} else /* c */ if (b) {\n  y();\n}\n");
        assert_eq!(texts(&program.body[0].comments), [" c "]);
    }

    #[test]
    fn comment_count_is_conserved() {
        let source = "// a\nvar x = /* b */ 1;\nfunction f(/* c */ y) {\n  // d\n  return y; // e\n}\n// f\n";
        let parsed = parse(source).unwrap();
        let expected = parsed.comments.len();
        let mut program = parsed.program;
        attach(&mut program, parsed.comments).unwrap();
        assert_eq!(count(&mut program), expected);
        assert_eq!(expected, 6);
    }

    #[test]
    fn verifier_rejects_comment_on_expression() {
        let mut program = attached("f(x);\n");
        let StmtKind::Expr(expr) = &mut program.body[0].kind else {
            panic!("not an expression statement");
        };
        expr.comments.push(Comment::line(" stray"));
        let mut verifier = Verifier::default();
        verifier.visit_program(&mut program);
        assert!(matches!(
            verifier.error,
            Some(FormatError::DetachedComment {
                kind: "CallExpression",
                ..
            })
        ));
    }
}
