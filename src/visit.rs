//! Mutable tree traversal.
//!
//! Implementors override the hooks they care about and call the matching
//! `walk_*` function to keep descending. Children are visited in source order.

use crate::ast::*;

pub trait VisitMut {
    fn visit_program(&mut self, program: &mut Program) {
        walk_program(self, program);
    }

    /// A statement list: program body, block body or case consequent.
    fn visit_stmts(&mut self, stmts: &mut Vec<Stmt>) {
        walk_stmts(self, stmts);
    }

    fn visit_stmt(&mut self, stmt: &mut Stmt) {
        walk_stmt(self, stmt);
    }

    fn visit_block(&mut self, block: &mut Block) {
        walk_block(self, block);
    }

    fn visit_switch(&mut self, switch: &mut Switch) {
        walk_switch(self, switch);
    }

    fn visit_case(&mut self, case: &mut SwitchCase) {
        walk_case(self, case);
    }

    fn visit_for_init(&mut self, init: &mut ForInit) {
        walk_for_init(self, init);
    }

    fn visit_var(&mut self, decl: &mut VarDecl) {
        walk_var(self, decl);
    }

    fn visit_function(&mut self, function: &mut Function) {
        walk_function(self, function);
    }

    fn visit_class(&mut self, class: &mut Class) {
        walk_class(self, class);
    }

    fn visit_class_member(&mut self, member: &mut ClassMember) {
        walk_class_member(self, member);
    }

    fn visit_expr(&mut self, expr: &mut Expr) {
        walk_expr(self, expr);
    }

    fn visit_property(&mut self, property: &mut Property) {
        walk_property(self, property);
    }

    fn visit_prop_key(&mut self, key: &mut PropKey) {
        if let PropKey::Computed(expr) = key {
            self.visit_expr(expr);
        }
    }

    /// Called once for every comment list in the tree, owned or trailing.
    fn visit_comments(&mut self, _comments: &mut Vec<Comment>) {}
}

pub fn walk_program<V: VisitMut + ?Sized>(v: &mut V, program: &mut Program) {
    v.visit_stmts(&mut program.body);
    v.visit_comments(&mut program.trailing);
}

pub fn walk_stmts<V: VisitMut + ?Sized>(v: &mut V, stmts: &mut Vec<Stmt>) {
    for stmt in stmts {
        v.visit_stmt(stmt);
    }
}

pub fn walk_block<V: VisitMut + ?Sized>(v: &mut V, block: &mut Block) {
    v.visit_stmts(&mut block.body);
    v.visit_comments(&mut block.trailing);
}

pub fn walk_switch<V: VisitMut + ?Sized>(v: &mut V, switch: &mut Switch) {
    v.visit_expr(&mut switch.discriminant);
    for case in &mut switch.cases {
        v.visit_case(case);
    }
    v.visit_comments(&mut switch.trailing);
}

pub fn walk_case<V: VisitMut + ?Sized>(v: &mut V, case: &mut SwitchCase) {
    v.visit_comments(&mut case.comments);
    if let Some(test) = &mut case.test {
        v.visit_expr(test);
    }
    v.visit_stmts(&mut case.consequent);
}

pub fn walk_for_init<V: VisitMut + ?Sized>(v: &mut V, init: &mut ForInit) {
    match init {
        ForInit::Var { decl, comments } => {
            v.visit_comments(comments);
            v.visit_var(decl);
        }
        ForInit::Expr(expr) => v.visit_expr(expr),
    }
}

pub fn walk_var<V: VisitMut + ?Sized>(v: &mut V, decl: &mut VarDecl) {
    for d in &mut decl.declarators {
        v.visit_expr(&mut d.id);
        if let Some(init) = &mut d.init {
            v.visit_expr(init);
        }
    }
}

pub fn walk_function<V: VisitMut + ?Sized>(v: &mut V, function: &mut Function) {
    for param in &mut function.params {
        v.visit_expr(param);
    }
    v.visit_block(&mut function.body);
}

pub fn walk_class<V: VisitMut + ?Sized>(v: &mut V, class: &mut Class) {
    if let Some(superclass) = &mut class.superclass {
        v.visit_expr(superclass);
    }
    for member in &mut class.members {
        v.visit_class_member(member);
    }
    v.visit_comments(&mut class.trailing);
}

pub fn walk_class_member<V: VisitMut + ?Sized>(v: &mut V, member: &mut ClassMember) {
    v.visit_comments(&mut member.comments);
    match &mut member.kind {
        MemberKind::Method { key, function, .. } => {
            v.visit_prop_key(key);
            v.visit_function(function);
        }
        MemberKind::Field { key, value } => {
            v.visit_prop_key(key);
            if let Some(value) = value {
                v.visit_expr(value);
            }
        }
        MemberKind::StaticBlock(block) => v.visit_block(block),
    }
}

pub fn walk_stmt<V: VisitMut + ?Sized>(v: &mut V, stmt: &mut Stmt) {
    v.visit_comments(&mut stmt.comments);
    match &mut stmt.kind {
        StmtKind::Empty | StmtKind::Debugger | StmtKind::Break(_) | StmtKind::Continue(_) => {}
        StmtKind::Block(block) => v.visit_block(block),
        StmtKind::Expr(expr) | StmtKind::Throw(expr) => v.visit_expr(expr),
        StmtKind::Return(arg) => {
            if let Some(arg) = arg {
                v.visit_expr(arg);
            }
        }
        StmtKind::Var(decl) => v.visit_var(decl),
        StmtKind::Function(function) => v.visit_function(function),
        StmtKind::Class(class) => v.visit_class(class),
        StmtKind::If {
            test,
            consequent,
            alternate,
        } => {
            v.visit_expr(test);
            v.visit_stmt(consequent);
            if let Some(alternate) = alternate {
                v.visit_stmt(alternate);
            }
        }
        StmtKind::While { test, body } => {
            v.visit_expr(test);
            v.visit_stmt(body);
        }
        StmtKind::DoWhile { body, test } => {
            v.visit_stmt(body);
            v.visit_expr(test);
        }
        StmtKind::For {
            init,
            test,
            update,
            body,
        } => {
            if let Some(init) = init {
                v.visit_for_init(init);
            }
            if let Some(test) = test {
                v.visit_expr(test);
            }
            if let Some(update) = update {
                v.visit_expr(update);
            }
            v.visit_stmt(body);
        }
        StmtKind::ForIn { head, right, body } | StmtKind::ForOf { head, right, body, .. } => {
            v.visit_expr(&mut head.target);
            v.visit_expr(right);
            v.visit_stmt(body);
        }
        StmtKind::Switch(switch) => v.visit_switch(switch),
        StmtKind::Try {
            block,
            handler,
            finalizer,
        } => {
            v.visit_block(block);
            if let Some(handler) = handler {
                if let Some(param) = &mut handler.param {
                    v.visit_expr(param);
                }
                v.visit_block(&mut handler.body);
            }
            if let Some(finalizer) = finalizer {
                v.visit_block(finalizer);
            }
        }
        StmtKind::Labeled { body, .. } => v.visit_stmt(body),
    }
}

pub fn walk_property<V: VisitMut + ?Sized>(v: &mut V, property: &mut Property) {
    v.visit_comments(&mut property.comments);
    match &mut property.kind {
        PropKind::Init { key, value } => {
            v.visit_prop_key(key);
            v.visit_expr(value);
        }
        PropKind::Shorthand(_) => {}
        PropKind::Method { key, function, .. } => {
            v.visit_prop_key(key);
            v.visit_function(function);
        }
        PropKind::Spread(expr) => v.visit_expr(expr),
    }
}

pub fn walk_expr<V: VisitMut + ?Sized>(v: &mut V, expr: &mut Expr) {
    v.visit_comments(&mut expr.comments);
    match &mut expr.kind {
        ExprKind::Ident(_)
        | ExprKind::This
        | ExprKind::Super
        | ExprKind::Null
        | ExprKind::Bool(_)
        | ExprKind::Num(_)
        | ExprKind::Str(_)
        | ExprKind::Regex(_)
        | ExprKind::Template(_)
        | ExprKind::MetaProperty(_)
        | ExprKind::Hole => {}
        ExprKind::TaggedTemplate { tag, .. } => v.visit_expr(tag),
        ExprKind::Array(items) | ExprKind::ArrayPattern(items) | ExprKind::Sequence(items) => {
            for item in items {
                v.visit_expr(item);
            }
        }
        ExprKind::Object(props) | ExprKind::ObjectPattern(props) => {
            for prop in props {
                v.visit_property(prop);
            }
        }
        ExprKind::Function(function) => v.visit_function(function),
        ExprKind::Arrow(arrow) => {
            for param in &mut arrow.params {
                v.visit_expr(param);
            }
            match &mut arrow.body {
                ArrowBody::Block(block) => v.visit_block(block),
                ArrowBody::Expr(body) => v.visit_expr(body),
            }
        }
        ExprKind::Class(class) => v.visit_class(class),
        ExprKind::Unary { arg, .. }
        | ExprKind::Update { arg, .. }
        | ExprKind::Paren(arg)
        | ExprKind::Spread(arg)
        | ExprKind::Await(arg) => v.visit_expr(arg),
        ExprKind::Binary { left, right, .. }
        | ExprKind::Logical { left, right, .. }
        | ExprKind::Assign { left, right, .. }
        | ExprKind::AssignPattern { left, right } => {
            v.visit_expr(left);
            v.visit_expr(right);
        }
        ExprKind::Conditional {
            test,
            consequent,
            alternate,
        } => {
            v.visit_expr(test);
            v.visit_expr(consequent);
            v.visit_expr(alternate);
        }
        ExprKind::Call { callee, args, .. } | ExprKind::New { callee, args } => {
            v.visit_expr(callee);
            for arg in args {
                v.visit_expr(arg);
            }
        }
        ExprKind::Member { object, .. } => v.visit_expr(object),
        ExprKind::Index { object, index, .. } => {
            v.visit_expr(object);
            v.visit_expr(index);
        }
        ExprKind::Yield { arg, .. } => {
            if let Some(arg) = arg {
                v.visit_expr(arg);
            }
        }
    }
}
