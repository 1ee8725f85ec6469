//! Emitter: renders a [`Program`] back to JavaScript source.
//!
//! The walk writes every statement on its own line and every comment on a
//! line of its own, then a single normalization pass fixes up blank lines.
//! Template literals and block comments are copied verbatim and that pass
//! leaves them alone.

use crate::ast::*;
use crate::formatter::FormatOptions;
use std::ops::Range;

/// Render `program` as source text.
pub fn emit(program: &Program, opts: &FormatOptions) -> String {
    let mut p = Printer::new(opts);
    if let Some(hashbang) = &program.hashbang {
        p.write(hashbang);
        p.write("\n\n");
    }
    p.stmts(&program.body, 0);
    if !program.trailing.is_empty() {
        p.comments(&program.trailing, 0, !program.body.is_empty());
    }
    normalize(&p.output, &p.verbatim)
}

#[derive(Debug)]
struct Printer<'o> {
    output: String,
    opts: &'o FormatOptions,
    /// Byte ranges of `output` that normalization must not touch
    verbatim: Vec<Range<usize>>,
}

impl<'o> Printer<'o> {
    fn new(opts: &'o FormatOptions) -> Self {
        Self {
            output: String::new(),
            opts,
            verbatim: Vec::new(),
        }
    }

    fn write(&mut self, text: &str) {
        self.output.push_str(text);
    }

    fn write_verbatim(&mut self, text: &str) {
        let start = self.output.len();
        self.output.push_str(text);
        self.verbatim.push(start..self.output.len());
    }

    fn newline(&mut self) {
        self.output.push('\n');
    }

    fn write_indent(&mut self, level: usize) {
        for _ in 0..level {
            self.output.push_str(&self.opts.indent);
        }
    }

    fn semicolon(&mut self) {
        if self.opts.semicolons {
            self.write(";");
        }
    }

    /// One comment per line at `level`, after a blank line when `blank`.
    fn comments<'c>(
        &mut self,
        comments: impl IntoIterator<Item = &'c Comment>,
        level: usize,
        blank: bool,
    ) {
        let mut first = true;
        for c in comments {
            if first && blank {
                self.newline();
            }
            first = false;
            self.write_indent(level);
            match c.kind {
                CommentKind::Line => {
                    let text = c.text.trim_end();
                    self.write("//");
                    if !text.is_empty() && !text.starts_with(' ') {
                        self.write(" ");
                    }
                    self.write(text);
                }
                CommentKind::Block => self.write_verbatim(&format!("/*{}*/", c.text)),
            }
            self.newline();
        }
    }

    // Statements

    fn stmts(&mut self, stmts: &[Stmt], level: usize) {
        for (i, stmt) in stmts.iter().enumerate() {
            let spaced = matches!(stmt.kind, StmtKind::Function(_) | StmtKind::Class(_));
            if spaced {
                self.newline();
            }
            self.comments(leading_comments(stmt), level, i > 0 && !spaced);
            self.write_indent(level);
            self.stmt(stmt, level);
            self.newline();
            if spaced {
                self.newline();
            }
        }
    }

    fn block(&mut self, block: &Block, level: usize) {
        if block.body.is_empty() && block.trailing.is_empty() {
            self.write("{}");
            return;
        }
        self.write("{");
        self.newline();
        self.stmts(&block.body, level + 1);
        self.comments(&block.trailing, level + 1, !block.body.is_empty());
        self.write_indent(level);
        self.write("}");
    }

    /// A statement body: ` {...}` for blocks, otherwise the statement on the
    /// next line, one level deeper.
    fn body(&mut self, body: &Stmt, level: usize) {
        if let StmtKind::Block(block) = &body.kind {
            self.write(" ");
            self.block(block, level);
        } else {
            self.newline();
            self.comments(leading_comments(body), level + 1, false);
            self.write_indent(level + 1);
            self.stmt(body, level + 1);
        }
    }

    /// What separates a body from a following `else` or `while`.
    fn body_end(&mut self, body: &Stmt, level: usize) {
        if matches!(body.kind, StmtKind::Block(_)) {
            self.write(" ");
        } else {
            self.newline();
            self.write_indent(level);
        }
    }

    fn stmt(&mut self, stmt: &Stmt, level: usize) {
        match &stmt.kind {
            StmtKind::Block(block) => self.block(block, level),
            StmtKind::Empty => self.write(";"),
            StmtKind::Debugger => {
                self.write("debugger");
                self.semicolon();
            }
            StmtKind::Expr(expr) => {
                if !self.opts.semicolons && needs_asi_guard(expr) {
                    self.write(";");
                }
                self.expr(expr, level);
                self.semicolon();
            }
            StmtKind::Var(decl) => {
                self.var_decl(decl, level);
                self.semicolon();
            }
            StmtKind::Function(f) => self.function(f, level),
            StmtKind::Class(c) => self.class(c, level),
            StmtKind::If {
                test,
                consequent,
                alternate,
            } => {
                self.write("if (");
                self.expr(test, level);
                self.write(")");
                self.body(consequent, level);
                if let Some(alt) = alternate {
                    self.body_end(consequent, level);
                    self.write("else");
                    if matches!(alt.kind, StmtKind::If { .. }) {
                        self.write(" ");
                        self.stmt(alt, level);
                    } else {
                        self.body(alt, level);
                    }
                }
            }
            StmtKind::While { test, body } => {
                self.write("while (");
                self.expr(test, level);
                self.write(")");
                self.body(body, level);
            }
            StmtKind::DoWhile { body, test } => {
                self.write("do");
                self.body(body, level);
                self.body_end(body, level);
                self.write("while (");
                self.expr(test, level);
                self.write(")");
                self.semicolon();
            }
            StmtKind::For {
                init,
                test,
                update,
                body,
            } => {
                self.write("for (");
                match init {
                    Some(ForInit::Var { decl, .. }) => self.var_decl(decl, level),
                    Some(ForInit::Expr(expr)) => self.expr(expr, level),
                    None => {}
                }
                self.write(";");
                if let Some(test) = test {
                    self.write(" ");
                    self.expr(test, level);
                }
                self.write(";");
                if let Some(update) = update {
                    self.write(" ");
                    self.expr(update, level);
                }
                self.write(")");
                self.body(body, level);
            }
            StmtKind::ForIn { head, right, body } => {
                self.write("for (");
                self.for_head(head, level);
                self.write(" in ");
                self.expr(right, level);
                self.write(")");
                self.body(body, level);
            }
            StmtKind::ForOf {
                head,
                right,
                body,
                is_await,
            } => {
                self.write(if *is_await { "for await (" } else { "for (" });
                self.for_head(head, level);
                self.write(" of ");
                self.expr(right, level);
                self.write(")");
                self.body(body, level);
            }
            StmtKind::Switch(switch) => self.switch(switch, level),
            StmtKind::Try {
                block,
                handler,
                finalizer,
            } => {
                self.write("try ");
                self.block(block, level);
                if let Some(handler) = handler {
                    match &handler.param {
                        Some(param) => {
                            self.write(" catch (");
                            self.expr(param, level);
                            self.write(") ");
                        }
                        None => self.write(" catch "),
                    }
                    self.block(&handler.body, level);
                }
                if let Some(finalizer) = finalizer {
                    self.write(" finally ");
                    self.block(finalizer, level);
                }
            }
            StmtKind::Return(arg) => {
                self.write("return");
                if let Some(arg) = arg {
                    self.write(" ");
                    self.expr(arg, level);
                }
                self.semicolon();
            }
            StmtKind::Throw(arg) => {
                self.write("throw ");
                self.expr(arg, level);
                self.semicolon();
            }
            StmtKind::Break(label) => {
                self.write("break");
                self.label(label.as_deref());
                self.semicolon();
            }
            StmtKind::Continue(label) => {
                self.write("continue");
                self.label(label.as_deref());
                self.semicolon();
            }
            StmtKind::Labeled { label, body } => {
                self.write(label);
                self.write(":");
                self.newline();
                self.comments(leading_comments(body), level + 1, false);
                self.write_indent(level + 1);
                self.stmt(body, level + 1);
            }
        }
    }

    fn label(&mut self, label: Option<&str>) {
        if let Some(label) = label {
            self.write(" ");
            self.write(label);
        }
    }

    fn var_decl(&mut self, decl: &VarDecl, level: usize) {
        self.write(decl.kind.as_str());
        self.write(" ");
        for (i, d) in decl.declarators.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.expr(&d.id, level);
            if let Some(init) = &d.init {
                self.write(" = ");
                self.expr(init, level);
            }
        }
    }

    fn for_head(&mut self, head: &ForHead, level: usize) {
        if let Some(kind) = head.kind {
            self.write(kind.as_str());
            self.write(" ");
        }
        self.expr(&head.target, level);
    }

    fn switch(&mut self, switch: &Switch, level: usize) {
        self.write("switch (");
        self.expr(&switch.discriminant, level);
        self.write(") ");
        if switch.cases.is_empty() && switch.trailing.is_empty() {
            self.write("{}");
            return;
        }
        self.write("{");
        self.newline();
        for (i, case) in switch.cases.iter().enumerate() {
            self.comments(&case.comments, level, i > 0);
            self.write_indent(level);
            match &case.test {
                Some(test) => {
                    self.write("case ");
                    self.expr(test, level);
                    self.write(":");
                }
                None => self.write("default:"),
            }
            self.newline();
            self.stmts(&case.consequent, level + 1);
        }
        self.comments(&switch.trailing, level + 1, !switch.cases.is_empty());
        self.write_indent(level);
        self.write("}");
    }

    // Functions and classes

    fn params(&mut self, params: &[Expr], level: usize) {
        self.write("(");
        self.list(params, level);
        self.write(")");
    }

    fn list(&mut self, items: &[Expr], level: usize) {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.expr(item, level);
        }
    }

    fn function(&mut self, f: &Function, level: usize) {
        if f.is_async {
            self.write("async ");
        }
        self.write(if f.is_generator { "function*" } else { "function" });
        self.write(" ");
        if let Some(id) = &f.id {
            self.write(id);
        }
        self.params(&f.params, level);
        self.write(" ");
        self.block(&f.body, level);
    }

    /// Shared by object literal methods and class methods.
    fn method(&mut self, key: &PropKey, kind: MethodKind, f: &Function, level: usize) {
        if f.is_async {
            self.write("async ");
        }
        if f.is_generator {
            self.write("*");
        }
        match kind {
            MethodKind::Get => self.write("get "),
            MethodKind::Set => self.write("set "),
            MethodKind::Method => {}
        }
        self.prop_key(key, level);
        self.params(&f.params, level);
        self.write(" ");
        self.block(&f.body, level);
    }

    fn arrow(&mut self, arrow: &Arrow, level: usize) {
        if arrow.is_async {
            self.write("async ");
        }
        match arrow.params.as_slice() {
            [Expr {
                kind: ExprKind::Ident(name),
                ..
            }] => self.write(name),
            params => self.params(params, level),
        }
        self.write(" => ");
        match &arrow.body {
            ArrowBody::Block(block) => self.block(block, level),
            ArrowBody::Expr(body) => self.expr(body, level),
        }
    }

    fn class(&mut self, class: &Class, level: usize) {
        self.write("class ");
        if let Some(id) = &class.id {
            self.write(id);
            self.write(" ");
        }
        if let Some(superclass) = &class.superclass {
            self.write("extends ");
            self.expr(superclass, level);
            self.write(" ");
        }
        if class.members.is_empty() && class.trailing.is_empty() {
            self.write("{}");
            return;
        }
        self.write("{");
        self.newline();
        for (i, member) in class.members.iter().enumerate() {
            let spaced = matches!(member.kind, MemberKind::Method { .. });
            if spaced {
                self.newline();
            }
            self.comments(&member.comments, level + 1, i > 0 && !spaced);
            self.write_indent(level + 1);
            self.class_member(member, level + 1);
            self.newline();
            if spaced {
                self.newline();
            }
        }
        self.comments(&class.trailing, level + 1, !class.members.is_empty());
        self.write_indent(level);
        self.write("}");
    }

    fn class_member(&mut self, member: &ClassMember, level: usize) {
        if member.is_static {
            self.write("static ");
        }
        match &member.kind {
            MemberKind::Method { key, kind, function } => self.method(key, *kind, function, level),
            MemberKind::Field { key, value } => {
                self.prop_key(key, level);
                if let Some(value) = value {
                    self.write(" = ");
                    self.expr(value, level);
                }
                self.write(";");
            }
            MemberKind::StaticBlock(block) => {
                self.write("static ");
                self.block(block, level);
            }
        }
    }

    fn prop_key(&mut self, key: &PropKey, level: usize) {
        match key {
            PropKey::Ident(name) => self.write(name),
            PropKey::Str(s) => self.write(&quote(s)),
            PropKey::Num(raw) => self.write(raw),
            PropKey::Computed(expr) => {
                self.write("[");
                self.expr(expr, level);
                self.write("]");
            }
        }
    }

    // Expressions

    fn expr(&mut self, expr: &Expr, level: usize) {
        match &expr.kind {
            ExprKind::Ident(name) => self.write(name),
            ExprKind::This => self.write("this"),
            ExprKind::Super => self.write("super"),
            ExprKind::Null => self.write("null"),
            ExprKind::Bool(b) => self.write(if *b { "true" } else { "false" }),
            ExprKind::Num(raw) | ExprKind::Regex(raw) | ExprKind::MetaProperty(raw) => {
                self.write(raw)
            }
            ExprKind::Str(s) => self.write(&quote(s)),
            ExprKind::Template(raw) => self.write_verbatim(raw),
            ExprKind::TaggedTemplate { tag, quasi } => {
                self.expr(tag, level);
                self.write_verbatim(quasi);
            }
            ExprKind::Array(items) => self.array(items, level),
            ExprKind::Object(props) => self.object(props, level),
            ExprKind::Function(f) => self.function(f, level),
            ExprKind::Arrow(arrow) => self.arrow(arrow, level),
            ExprKind::Class(class) => self.class(class, level),
            ExprKind::Unary { op, arg } => {
                self.write(op);
                let sign = op.chars().next().filter(|c| matches!(c, '+' | '-'));
                if op.chars().all(char::is_alphabetic)
                    || sign.is_some() && first_char(arg) == sign
                {
                    self.write(" ");
                }
                self.expr(arg, level);
            }
            ExprKind::Update { op, prefix, arg } => {
                if *prefix {
                    self.write(op);
                    self.expr(arg, level);
                } else {
                    self.expr(arg, level);
                    self.write(op);
                }
            }
            ExprKind::Binary { op, left, right }
            | ExprKind::Logical { op, left, right }
            | ExprKind::Assign { op, left, right } => {
                self.expr(left, level);
                self.write(" ");
                self.write(op);
                self.write(" ");
                self.expr(right, level);
            }
            ExprKind::Conditional {
                test,
                consequent,
                alternate,
            } => {
                self.expr(test, level);
                self.write(" ? ");
                self.expr(consequent, level);
                self.write(" : ");
                self.expr(alternate, level);
            }
            ExprKind::Call {
                callee,
                args,
                optional,
            } => {
                self.expr(callee, level);
                if *optional {
                    self.write("?.");
                }
                self.params(args, level);
            }
            ExprKind::New { callee, args } => {
                self.write("new ");
                self.expr(callee, level);
                self.params(args, level);
            }
            ExprKind::Member {
                object,
                property,
                optional,
            } => {
                self.expr(object, level);
                if *optional {
                    self.write("?.");
                } else {
                    if matches!(&object.kind, ExprKind::Num(raw) if is_plain_integer(raw))
                    {
                        self.write(" ");
                    }
                    self.write(".");
                }
                self.write(property);
            }
            ExprKind::Index {
                object,
                index,
                optional,
            } => {
                self.expr(object, level);
                self.write(if *optional { "?.[" } else { "[" });
                self.expr(index, level);
                self.write("]");
            }
            ExprKind::Sequence(items) => self.list(items, level),
            ExprKind::Paren(inner) => {
                self.write("(");
                self.expr(inner, level);
                self.write(")");
            }
            ExprKind::Spread(arg) => {
                self.write("...");
                self.expr(arg, level);
            }
            ExprKind::Await(arg) => {
                self.write("await ");
                self.expr(arg, level);
            }
            ExprKind::Yield { arg, delegate } => {
                self.write(if *delegate { "yield*" } else { "yield" });
                if let Some(arg) = arg {
                    self.write(" ");
                    self.expr(arg, level);
                }
            }
            ExprKind::AssignPattern { left, right } => {
                self.expr(left, level);
                self.write(" = ");
                self.expr(right, level);
            }
            ExprKind::ArrayPattern(items) => {
                self.write("[");
                self.list(items, level);
                if matches!(items.last(), Some(Expr { kind: ExprKind::Hole, .. })) {
                    self.write(",");
                }
                self.write("]");
            }
            ExprKind::ObjectPattern(props) => {
                self.write("{");
                for (i, prop) in props.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    self.property(prop, level);
                }
                self.write("}");
            }
            ExprKind::Hole => {}
        }
    }

    fn array(&mut self, items: &[Expr], level: usize) {
        if items.is_empty() {
            self.write("[]");
            return;
        }
        self.write("[");
        self.newline();
        for (i, item) in items.iter().enumerate() {
            self.comments(&item.comments, level + 1, i > 0);
            self.write_indent(level + 1);
            self.expr(item, level + 1);
            self.write(",");
            self.newline();
        }
        self.write_indent(level);
        self.write("]");
    }

    fn object(&mut self, props: &[Property], level: usize) {
        if props.is_empty() {
            self.write("{}");
            return;
        }
        self.write("{");
        self.newline();
        for (i, prop) in props.iter().enumerate() {
            let spaced = matches!(prop.kind, PropKind::Method { .. });
            if spaced {
                self.newline();
            }
            self.comments(&prop.comments, level + 1, i > 0 && !spaced);
            self.write_indent(level + 1);
            self.property(prop, level + 1);
            self.write(",");
            self.newline();
            if spaced {
                self.newline();
            }
        }
        self.write_indent(level);
        self.write("}");
    }

    fn property(&mut self, prop: &Property, level: usize) {
        match &prop.kind {
            PropKind::Init { key, value } => {
                if let PropKey::Ident(name) = key {
                    match &value.kind {
                        ExprKind::Ident(v) if v == name => {
                            self.write(name);
                            return;
                        }
                        ExprKind::AssignPattern { left, right }
                            if matches!(&left.kind, ExprKind::Ident(v) if v == name) =>
                        {
                            self.write(name);
                            self.write(" = ");
                            self.expr(right, level);
                            return;
                        }
                        _ => {}
                    }
                }
                self.prop_key(key, level);
                self.write(": ");
                self.expr(value, level);
            }
            PropKind::Shorthand(name) => self.write(name),
            PropKind::Method { key, kind, function } => self.method(key, *kind, function, level),
            PropKind::Spread(arg) => {
                self.write("...");
                self.expr(arg, level);
            }
        }
    }
}

/// Comments printed above a statement. A `for` init declaration owns
/// comments of its own; they go above the loop.
fn leading_comments(stmt: &Stmt) -> impl Iterator<Item = &Comment> {
    let init: &[Comment] = match &stmt.kind {
        StmtKind::For {
            init: Some(ForInit::Var { comments, .. }),
            ..
        } => comments.as_slice(),
        _ => &[],
    };
    stmt.comments.iter().chain(init)
}

/// First character the expression renders as, when it matters for
/// statement-start ambiguity.
fn first_char(expr: &Expr) -> Option<char> {
    match &expr.kind {
        ExprKind::Paren(_) => Some('('),
        ExprKind::Array(_) | ExprKind::ArrayPattern(_) => Some('['),
        ExprKind::Template(_) => Some('`'),
        ExprKind::Regex(_) => Some('/'),
        ExprKind::Str(_) => Some('\''),
        ExprKind::Unary { op, .. } => op.chars().next(),
        ExprKind::Update {
            op, prefix: true, ..
        } => op.chars().next(),
        ExprKind::Update { arg, .. } => first_char(arg),
        ExprKind::Binary { left, .. }
        | ExprKind::Logical { left, .. }
        | ExprKind::Assign { left, .. }
        | ExprKind::AssignPattern { left, .. } => first_char(left),
        ExprKind::Conditional { test, .. } => first_char(test),
        ExprKind::Call { callee, .. } => first_char(callee),
        ExprKind::TaggedTemplate { tag, .. } => first_char(tag),
        ExprKind::Member { object, .. } | ExprKind::Index { object, .. } => first_char(object),
        ExprKind::Sequence(items) => items.first().and_then(first_char),
        ExprKind::Arrow(arrow) if !arrow.is_async => match arrow.params.as_slice() {
            [Expr {
                kind: ExprKind::Ident(_),
                ..
            }] => None,
            _ => Some('('),
        },
        _ => None,
    }
}

/// A decimal literal with no `.`, exponent or prefix, so a following dot
/// would be read as its decimal point.
fn is_plain_integer(raw: &str) -> bool {
    raw.bytes().all(|b| b.is_ascii_digit() || b == b'_')
}

/// Without semicolons, a statement starting with one of these characters
/// would continue the previous line.
fn needs_asi_guard(expr: &Expr) -> bool {
    matches!(first_char(expr), Some('(' | '[' | '`' | '+' | '-' | '/'))
}

/// Quote a string value: single quotes unless the value contains one.
pub fn quote(value: &JsString) -> String {
    let q = if value.0.contains(&u16::from(b'\'')) {
        '"'
    } else {
        '\''
    };
    let mut out = String::with_capacity(value.0.len() + 2);
    out.push(q);
    for &unit in &value.0 {
        match unit {
            0x08 => out.push_str("\\b"),
            0x09 => out.push_str("\\t"),
            0x0a => out.push_str("\\n"),
            0x0b => out.push_str("\\v"),
            0x0c => out.push_str("\\f"),
            0x0d => out.push_str("\\r"),
            0x5c => out.push_str("\\\\"),
            u if u == q as u16 => {
                out.push('\\');
                out.push(q);
            }
            0x20..=0x7e => out.push(char::from(unit as u8)),
            u if u < 0x100 => out.push_str(&format!("\\x{u:02x}")),
            u => out.push_str(&format!("\\u{u:04x}")),
        }
    }
    out.push(q);
    out
}

/// Collapse newline runs outside `verbatim`: none at the start, at most one
/// blank line anywhere, no blank line after `{` or before `}`, exactly one
/// newline at the end.
fn normalize(text: &str, verbatim: &[Range<usize>]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut ranges = verbatim.iter().peekable();
    let mut i = 0;
    while i < text.len() {
        if let Some(r) = ranges.next_if(|r| r.start == i) {
            out.push_str(&text[r.clone()]);
            i = r.end;
            continue;
        }
        let next_verbatim = ranges.peek().map_or(text.len(), |r| r.start);
        if !text[i..].starts_with('\n') {
            let end = text[i..next_verbatim]
                .find('\n')
                .map_or(next_verbatim, |p| i + p);
            out.push_str(&text[i..end]);
            i = end;
            continue;
        }
        let run = text[i..next_verbatim]
            .bytes()
            .take_while(|&b| b == b'\n')
            .count();
        let end = i + run;
        let rest = text[end..].trim_start_matches([' ', '\t']);
        let keep = if out.is_empty() || end == text.len() {
            0
        } else if out.ends_with('{') || rest.starts_with('}') {
            1
        } else {
            run.min(2)
        };
        for _ in 0..keep {
            out.push('\n');
        }
        i = end;
    }
    let trimmed = out.trim_end_matches('\n').len();
    out.truncate(trimmed);
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comments::attach;
    use crate::parser::parse;
    use pretty_assertions::assert_eq;

    fn render(source: &str, opts: &FormatOptions) -> String {
        let parsed = parse(source).unwrap();
        let mut program = parsed.program;
        attach(&mut program, parsed.comments).unwrap();
        emit(&program, opts)
    }

    fn plain(source: &str) -> String {
        render(source, &FormatOptions::default())
    }

    #[test]
    fn quotes_prefer_single() {
        assert_eq!(quote(&JsString::from("abc")), "'abc'");
        assert_eq!(quote(&JsString::from("it's")), "\"it's\"");
        assert_eq!(quote(&JsString::from("say \"hi\"")), "'say \"hi\"'");
        assert_eq!(quote(&JsString::from("both ' \"\n")), "\"both ' \\\"\\n\"");
    }

    #[test]
    fn quotes_escape_non_printable_units() {
        assert_eq!(quote(&JsString::from("a\tb\\")), "'a\\tb\\\\'");
        assert_eq!(quote(&JsString::from("\u{e9}")), "'\\xe9'");
        assert_eq!(quote(&JsString::from("\u{2028}")), "'\\u2028'");
        assert_eq!(quote(&JsString(vec![0xd83d])), "'\\ud83d'");
        assert_eq!(quote(&JsString::from("\0")), "'\\x00'");
    }

    #[test]
    fn normalize_collapses_blank_lines() {
        assert_eq!(normalize("\n\na\n\n\n\n\nb\n\n", &[]), "a\n\nb\n");
        assert_eq!(normalize("{\n\n\tx\n\n}\n", &[]), "{\n\tx\n}\n");
        assert_eq!(normalize("", &[]), "\n");
    }

    #[test]
    fn normalize_skips_verbatim_ranges() {
        let text = "x = `a\n\n\n\nb`\n\n\n\ny\n";
        let start = text.find('`').unwrap();
        let end = text.rfind('`').unwrap() + 1;
        assert_eq!(normalize(text, &[start..end]), "x = `a\n\n\n\nb`\n\ny\n");
    }

    #[test]
    fn statements_get_their_own_lines() {
        assert_eq!(plain("a();b();if(x){y()}else{z()}"), "a();\nb();\nif (x) {\n\ty();\n} else {\n\tz();\n}\n");
    }

    #[test]
    fn functions_are_spaced() {
        assert_eq!(
            plain("x();\n// doc\nfunction f(a, b) { return a }\ny();"),
            "x();\n\n// doc\nfunction f(a, b) {\n\treturn a;\n}\n\ny();\n"
        );
    }

    #[test]
    fn comments_are_preceded_by_blank_line() {
        assert_eq!(
            plain("a();\n//note\nb(); /* tail */"),
            "a();\n\n// note\nb();\n\n/* tail */\n"
        );
    }

    #[test]
    fn literals_render_one_element_per_line() {
        assert_eq!(
            plain("var a = [1, [], {}], o = {k: v, v: v, m() {}};"),
            "var a = [\n\t1,\n\t[],\n\t{},\n], o = {\n\tk: v,\n\tv,\n\n\tm() {},\n};\n"
        );
    }

    #[test]
    fn patterns_render_inline() {
        assert_eq!(
            plain("var {a, b: [c, , d], e = 1, ...f} = g;"),
            "var {a, b: [c, , d], e = 1, ...f} = g;\n"
        );
        assert_eq!(plain("var [x, ,] = y;"), "var [x, ,] = y;\n");
    }

    #[test]
    fn unary_signs_do_not_merge() {
        assert_eq!(plain("a = - -b; c = +(+d); e = - --f; g = typeof h;"), "a = - -b;\nc = +(+d);\ne = - --f;\ng = typeof h;\n");
    }

    #[test]
    fn number_member_access_keeps_space() {
        assert_eq!(plain("1 .toString(); 1.5.toFixed();"), "1 .toString();\n1.5.toFixed();\n");
        assert_eq!(plain("x = 1_000 .toString();"), "x = 1_000 .toString();\n");
        assert_eq!(plain("0x10.toString();"), "0x10.toString();\n");
    }

    #[test]
    fn arrows_and_functions() {
        assert_eq!(
            plain("f(x => x, (a, b) => a, async () => {}, function () {}, function* g() {});"),
            "f(x => x, (a, b) => a, async () => {}, function () {}, function* g() {});\n"
        );
    }

    #[test]
    fn new_always_has_arguments() {
        assert_eq!(plain("new Foo;"), "new Foo();\n");
    }

    #[test]
    fn switch_layout() {
        assert_eq!(
            plain("switch (x) { case 1: a(); break; default: b() }"),
            "switch (x) {\ncase 1:\n\ta();\n\tbreak;\ndefault:\n\tb();\n}\n"
        );
    }

    #[test]
    fn braceless_bodies_go_on_the_next_line() {
        assert_eq!(
            plain("if (a) b(); else c();\ndo x(); while (y);\nlabel: for (;;) break label;"),
            "if (a)\n\tb();\nelse\n\tc();\ndo\n\tx();\nwhile (y);\nlabel:\n\tfor (;;)\n\t\tbreak label;\n"
        );
    }

    #[test]
    fn try_catch_finally() {
        assert_eq!(
            plain("try { a() } catch (e) { b() } finally { c() }\ntry {} catch {}"),
            "try {\n\ta();\n} catch (e) {\n\tb();\n} finally {\n\tc();\n}\ntry {} catch {}\n"
        );
    }

    #[test]
    fn classes() {
        assert_eq!(
            plain("class A extends B { x = 1; static y; get z() { return 1 } static { init() } }"),
            "\nclass A extends B {\n\tx = 1;\n\tstatic y;\n\n\tget z() {\n\t\treturn 1;\n\t}\n\n\tstatic {\n\t\tinit();\n\t}\n}\n"
                .trim_start()
        );
    }

    #[test]
    fn semicolons_can_be_omitted_safely() {
        let opts = FormatOptions {
            semicolons: false,
            ..FormatOptions::default()
        };
        assert_eq!(
            render("a = b;\n(c || d).e();\n[1].forEach(f);\nx++;\n-y;\n`t`.length;\n", &opts),
            "a = b\n;(c || d).e()\n;[\n\t1,\n].forEach(f)\nx++\n;-y\n;`t`.length\n"
        );
    }

    #[test]
    fn hashbang_is_kept_with_blank_line() {
        assert_eq!(plain("#!/usr/bin/env node\nrun()"), "#!/usr/bin/env node\n\nrun();\n");
        assert_eq!(plain(""), "\n");
    }

    #[test]
    fn block_comments_and_templates_are_verbatim() {
        let source = "/* keep\n\n\n   this */\nx = `a\n\n\nb`;\n";
        assert_eq!(plain(source), source);
    }

    #[test]
    fn custom_indent() {
        let opts = FormatOptions {
            indent: "  ".to_string(),
            ..FormatOptions::default()
        };
        assert_eq!(render("if (a) { b() }", &opts), "if (a) {\n  b();\n}\n");
    }
}
