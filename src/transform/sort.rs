//! Reordering rules: switch cases, object properties, and runs of
//! declarations and statements.
//!
//! All sorts are stable, so equal keys keep their source order and a second
//! run changes nothing.

use crate::ast::*;
use crate::comments::Owner;
use crate::visit::{self, VisitMut};
use std::cmp::Ordering;
use std::mem;

/// Ordering key shared by the sorting rules.
///
/// Numbers sort before strings, and everything that has no natural key
/// (`default`, spreads, computed keys) sorts last.
#[derive(Clone, Debug, PartialEq)]
pub enum SortKey {
    Num(f64),
    Str(String),
    Last,
}

impl SortKey {
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Num(a), SortKey::Num(b)) => a.total_cmp(b),
            (SortKey::Str(a), SortKey::Str(b)) => a.cmp(b),
            (SortKey::Last, SortKey::Last) => Ordering::Equal,
            (SortKey::Num(_), _) | (SortKey::Str(_), SortKey::Last) => Ordering::Less,
            _ => Ordering::Greater,
        }
    }

    pub fn of_expr(expr: &Expr) -> SortKey {
        match &expr.kind {
            ExprKind::Ident(name) => SortKey::Str(name.clone()),
            ExprKind::Str(s) => SortKey::Str(s.to_string_lossy()),
            ExprKind::Num(raw) => SortKey::of_number(raw),
            ExprKind::Bool(b) => SortKey::Str(b.to_string()),
            ExprKind::Null => SortKey::Str("null".to_string()),
            ExprKind::Spread(_) => SortKey::Last,
            _ => SortKey::Str(expr.kind_name().to_string()),
        }
    }

    pub fn of_number(raw: &str) -> SortKey {
        match number_value(raw) {
            Some(n) => SortKey::Num(n),
            None => SortKey::Str(raw.to_string()),
        }
    }

    pub fn of_prop_key(key: &PropKey) -> SortKey {
        match key {
            PropKey::Ident(name) => SortKey::Str(name.clone()),
            PropKey::Str(s) => SortKey::Str(s.to_string_lossy()),
            PropKey::Num(raw) => SortKey::of_number(raw),
            PropKey::Computed(_) => SortKey::Last,
        }
    }

    pub fn of_property(property: &Property) -> SortKey {
        match &property.kind {
            PropKind::Init { key, .. } | PropKind::Method { key, .. } => SortKey::of_prop_key(key),
            PropKind::Shorthand(name) => SortKey::Str(name.clone()),
            PropKind::Spread(_) => SortKey::Last,
        }
    }

    pub fn of_case(case: &SwitchCase) -> SortKey {
        case.test.as_ref().map_or(SortKey::Last, SortKey::of_expr)
    }
}

/// Numeric value of a JavaScript numeric literal.
fn number_value(raw: &str) -> Option<f64> {
    let digits: String = raw.chars().filter(|&c| c != '_').collect();
    let digits = digits.strip_suffix('n').unwrap_or(&digits);
    let radix = |prefix: [&str; 2], base| {
        prefix
            .iter()
            .find_map(|p| digits.strip_prefix(*p))
            .map(|rest| u128::from_str_radix(rest, base).ok().map(|n| n as f64))
    };
    if let Some(n) = radix(["0x", "0X"], 16)
        .or_else(|| radix(["0o", "0O"], 8))
        .or_else(|| radix(["0b", "0B"], 2))
    {
        return n;
    }
    // Legacy octal: `017` is 15, but `019` is decimal.
    if digits.len() > 1
        && digits.starts_with('0')
        && digits.bytes().all(|b| (b'0'..=b'7').contains(&b))
    {
        return u128::from_str_radix(&digits[1..], 8).ok().map(|n| n as f64);
    }
    digits.parse().ok()
}

/// Stable sort of `items` by key.
fn sort_by_key<T>(items: &mut Vec<T>, key: impl Fn(&T) -> SortKey) {
    let mut keyed: Vec<_> = items.drain(..).map(|item| (key(&item), item)).collect();
    keyed.sort_by(|a, b| a.0.compare(&b.0));
    items.extend(keyed.into_iter().map(|(_, item)| item));
}

/// Split `cases` into fallthrough blocks: runs that end with the first case
/// whose consequent ends in a terminator. The last block may be open.
fn fallthrough_blocks(cases: Vec<SwitchCase>) -> Vec<Vec<SwitchCase>> {
    let mut blocks = Vec::new();
    let mut current = Vec::new();
    for case in cases {
        let ends = ends_in_terminator(&case.consequent);
        current.push(case);
        if ends {
            blocks.push(mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }
    blocks
}

/// Sort the labels of one fallthrough block. Only blocks where every case
/// but the last is empty can be sorted; the shared consequent moves to
/// whichever case ends up last.
fn sort_block(block: &mut Vec<SwitchCase>) {
    let Some((last, rest)) = block.split_last_mut() else {
        return;
    };
    if rest.iter().any(|c| !c.consequent.is_empty()) {
        return;
    }
    let consequent = mem::take(&mut last.consequent);
    sort_by_key(block, SortKey::of_case);
    if let Some(last) = block.last_mut() {
        last.consequent = consequent;
    }
}

pub fn sort_cases(program: &mut Program) {
    struct SortCases;

    impl VisitMut for SortCases {
        fn visit_switch(&mut self, switch: &mut Switch) {
            visit::walk_switch(self, switch);
            let mut blocks = fallthrough_blocks(mem::take(&mut switch.cases));
            for block in &mut blocks {
                sort_block(block);
            }
            // A block that can fall off the end must stay last.
            let open_tail = blocks
                .last()
                .and_then(|b| b.last())
                .is_some_and(|c| !ends_in_terminator(&c.consequent));
            let open = if open_tail { blocks.pop() } else { None };
            sort_by_key(&mut blocks, |b| b.first().map_or(SortKey::Last, SortKey::of_case));
            blocks.extend(open);
            switch.cases = blocks.into_iter().flatten().collect();
        }
    }

    SortCases.visit_program(program);
}

fn function_name(stmt: &Stmt) -> Option<&str> {
    match &stmt.kind {
        StmtKind::Function(f) => f.id.as_deref(),
        _ => None,
    }
}

/// Move every comment of `run` off its owner, in order.
fn hoist_comments<T: Owner>(run: &mut [T]) -> Vec<Comment> {
    run.iter_mut()
        .flat_map(|item| mem::take(item.comments_mut()))
        .collect()
}

/// Stable-sort the runs of `items` that `member` picks out. A run starts at
/// any member and extends over following members that own no comments; its
/// comments end up on whichever item sorts first. Runs that `reorderable`
/// rejects keep their order.
fn sort_runs<T: Owner>(
    items: &mut Vec<T>,
    member: impl Fn(&T) -> bool,
    key: impl Fn(&T) -> SortKey,
    reorderable: impl Fn(&[T]) -> bool,
) {
    let mut out = Vec::with_capacity(items.len());
    let mut iter = mem::take(items).into_iter().peekable();
    while let Some(item) = iter.next() {
        if !member(&item) {
            out.push(item);
            continue;
        }
        let mut run = vec![item];
        while let Some(next) = iter.next_if(|i| member(i) && i.comments().is_empty()) {
            run.push(next);
        }
        if run.len() > 1 && reorderable(&run) {
            let comments = hoist_comments(&mut run);
            sort_by_key(&mut run, &key);
            *run[0].comments_mut() = comments;
        }
        out.append(&mut run);
    }
    *items = out;
}

fn any_run(_: &[Stmt]) -> bool {
    true
}

/// Sort runs of adjacent named function declarations by name.
pub fn sort_functions(program: &mut Program) {
    struct SortFunctions;

    impl VisitMut for SortFunctions {
        fn visit_stmts(&mut self, stmts: &mut Vec<Stmt>) {
            visit::walk_stmts(self, stmts);
            sort_runs(
                stmts,
                |s| function_name(s).is_some(),
                |s| SortKey::Str(function_name(s).unwrap_or_default().to_string()),
                any_run,
            );
        }
    }

    SortFunctions.visit_program(program);
}

fn method_key(member: &ClassMember) -> SortKey {
    match &member.kind {
        MemberKind::Method {
            key: PropKey::Ident(name),
            ..
        } if name == "constructor" && !member.is_static => SortKey::Str(String::new()),
        MemberKind::Method { key, .. } => SortKey::of_prop_key(key),
        _ => SortKey::Last,
    }
}

/// Sort runs of adjacent class methods by name, constructor first. Fields
/// and static blocks break runs since their initializers run in order.
pub fn sort_methods(program: &mut Program) {
    struct SortMethods;

    impl VisitMut for SortMethods {
        fn visit_class(&mut self, class: &mut Class) {
            visit::walk_class(self, class);
            sort_runs(
                &mut class.members,
                |m| matches!(m.kind, MemberKind::Method { .. }),
                method_key,
                |_| true,
            );
        }
    }

    SortMethods.visit_program(program);
}

/// A value whose evaluation has no effects and does not depend on order:
/// no initializer, a literal, an empty array or object, or `new Map()`.
fn is_const(value: Option<&Expr>) -> bool {
    let Some(value) = value else {
        return true;
    };
    match &value.kind {
        ExprKind::Num(_)
        | ExprKind::Str(_)
        | ExprKind::Bool(_)
        | ExprKind::Null
        | ExprKind::Regex(_) => true,
        ExprKind::Array(items) => items.is_empty(),
        ExprKind::Object(props) => props.is_empty(),
        ExprKind::New { callee, args } => {
            args.is_empty() && matches!(&callee.kind, ExprKind::Ident(name) if name == "Map")
        }
        _ => false,
    }
}

fn ident(expr: Option<&Expr>) -> Option<&str> {
    match expr.map(|e| &e.kind) {
        Some(ExprKind::Ident(name)) => Some(name.as_str()),
        _ => None,
    }
}

/// Name and initializer of a declaration with a single identifier binding.
fn single_binding(stmt: &Stmt) -> Option<(&str, Option<&Expr>)> {
    let StmtKind::Var(decl) = &stmt.kind else {
        return None;
    };
    match decl.declarators.as_slice() {
        [Declarator { id, init }] => Some((ident(Some(id))?, init.as_ref())),
        _ => None,
    }
}

/// Target and value of `name = value;`.
fn simple_assign(stmt: &Stmt) -> Option<(&str, &Expr)> {
    let (target, value) = assignment(stmt)?;
    Some((ident(Some(target))?, value))
}

/// True unless one binding of `run` reads another binding of the same run.
fn independent<'a>(
    run: &'a [Stmt],
    binding: impl Fn(&'a Stmt) -> Option<(&'a str, Option<&'a Expr>)>,
) -> bool {
    let bindings: Vec<_> = run.iter().filter_map(binding).collect();
    !bindings.iter().any(|(_, value)| {
        ident(*value).is_some_and(|read| bindings.iter().any(|(name, _)| *name == read))
    })
}

fn is_simple_var(stmt: &Stmt) -> bool {
    single_binding(stmt).is_some_and(|(_, init)| is_const(init) || ident(init).is_some())
}

/// Sort runs of single-binding declarations of constants or plain
/// identifiers by name, unless one of them reads another.
pub fn sort_vars(program: &mut Program) {
    struct SortVars;

    impl VisitMut for SortVars {
        fn visit_stmts(&mut self, stmts: &mut Vec<Stmt>) {
            visit::walk_stmts(self, stmts);
            sort_runs(
                stmts,
                is_simple_var,
                |s| single_binding(s).map_or(SortKey::Last, |(name, _)| SortKey::Str(name.to_string())),
                |run| independent(run, single_binding),
            );
        }
    }

    SortVars.visit_program(program);
}

fn is_simple_assign(stmt: &Stmt) -> bool {
    simple_assign(stmt).is_some_and(|(_, value)| is_const(Some(value)) || ident(Some(value)).is_some())
}

/// Sort runs of `name = constant;` and `name = other;` assignments by
/// target, unless one of them reads another.
pub fn sort_assigns(program: &mut Program) {
    struct SortAssigns;

    impl VisitMut for SortAssigns {
        fn visit_stmts(&mut self, stmts: &mut Vec<Stmt>) {
            visit::walk_stmts(self, stmts);
            sort_runs(
                stmts,
                is_simple_assign,
                |s| simple_assign(s).map_or(SortKey::Last, |(name, _)| SortKey::Str(name.to_string())),
                |run| independent(run, |s| simple_assign(s).map(|(name, value)| (name, Some(value)))),
            );
        }
    }

    SortAssigns.visit_program(program);
}

/// `var name = require(...)` with any binding pattern.
fn is_require(stmt: &Stmt) -> bool {
    let StmtKind::Var(decl) = &stmt.kind else {
        return false;
    };
    match decl.declarators.as_slice() {
        [Declarator {
            init: Some(Expr {
                kind: ExprKind::Call { callee, .. },
                ..
            }),
            ..
        }] => matches!(&callee.kind, ExprKind::Ident(name) if name == "require"),
        _ => false,
    }
}

/// Sort runs of `require` declarations by bound name.
pub fn sort_requires(program: &mut Program) {
    struct SortRequires;

    impl VisitMut for SortRequires {
        fn visit_stmts(&mut self, stmts: &mut Vec<Stmt>) {
            visit::walk_stmts(self, stmts);
            sort_runs(
                stmts,
                is_require,
                |s| match &s.kind {
                    StmtKind::Var(decl) => decl
                        .declarators
                        .first()
                        .map_or(SortKey::Last, |d| match &d.id.kind {
                            ExprKind::Ident(name) => SortKey::Str(name.clone()),
                            _ => SortKey::Last,
                        }),
                    _ => SortKey::Last,
                },
                any_run,
            );
        }
    }

    SortRequires.visit_program(program);
}

/// Target and value of any `target = value;` statement.
fn assignment(stmt: &Stmt) -> Option<(&Expr, &Expr)> {
    match &stmt.kind {
        StmtKind::Expr(Expr {
            kind: ExprKind::Assign { op: "=", left, right },
            ..
        }) => Some((left.as_ref(), right.as_ref())),
        _ => None,
    }
}

/// Exported value of `exports.x = name;`.
fn export_source(stmt: &Stmt) -> Option<&str> {
    let (target, value) = assignment(stmt)?;
    match &target.kind {
        ExprKind::Member {
            object,
            optional: false,
            ..
        } if ident(Some(object.as_ref())) == Some("exports") => ident(Some(value)),
        _ => None,
    }
}

/// Sort runs of `exports.x = name;` statements by the exported value's name.
pub fn sort_exports(program: &mut Program) {
    struct SortExports;

    impl VisitMut for SortExports {
        fn visit_stmts(&mut self, stmts: &mut Vec<Stmt>) {
            visit::walk_stmts(self, stmts);
            sort_runs(
                stmts,
                |s| export_source(s).is_some(),
                |s| SortKey::Str(export_source(s).unwrap_or_default().to_string()),
                any_run,
            );
        }
    }

    SortExports.visit_program(program);
}

/// Sort the properties of every object literal. Destructuring patterns keep
/// their order.
pub fn sort_properties(program: &mut Program) {
    struct SortProperties;

    impl VisitMut for SortProperties {
        fn visit_expr(&mut self, expr: &mut Expr) {
            visit::walk_expr(self, expr);
            if let ExprKind::Object(props) = &mut expr.kind {
                sort_by_key(props, SortKey::of_property);
            }
        }
    }

    SortProperties.visit_program(program);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comments::attach;
    use crate::parser::parse;

    fn program(source: &str) -> Program {
        let parsed = parse(source).unwrap();
        let mut program = parsed.program;
        attach(&mut program, parsed.comments).unwrap();
        program
    }

    fn case_labels(stmt: &Stmt) -> Vec<String> {
        let StmtKind::Switch(switch) = &stmt.kind else {
            panic!("not a switch");
        };
        switch
            .cases
            .iter()
            .map(|c| match &c.test {
                None => "default".to_string(),
                Some(e) => match SortKey::of_expr(e) {
                    SortKey::Num(n) => n.to_string(),
                    SortKey::Str(s) => s,
                    SortKey::Last => "?".to_string(),
                },
            })
            .collect()
    }

    fn function_names(stmts: &[Stmt]) -> Vec<&str> {
        stmts.iter().filter_map(function_name).collect()
    }

    #[test]
    fn keys_order_numbers_strings_then_last() {
        let mut keys = vec![
            SortKey::Last,
            SortKey::Str("b".into()),
            SortKey::Num(10.0),
            SortKey::Str("a".into()),
            SortKey::Num(2.0),
        ];
        keys.sort_by(SortKey::compare);
        assert_eq!(
            keys,
            [
                SortKey::Num(2.0),
                SortKey::Num(10.0),
                SortKey::Str("a".into()),
                SortKey::Str("b".into()),
                SortKey::Last,
            ]
        );
    }

    #[test]
    fn numeric_literals_parse() {
        assert_eq!(number_value("0x1F"), Some(31.0));
        assert_eq!(number_value("0o17"), Some(15.0));
        assert_eq!(number_value("0b101"), Some(5.0));
        assert_eq!(number_value("017"), Some(15.0));
        assert_eq!(number_value("019"), Some(19.0));
        assert_eq!(number_value("1_000"), Some(1000.0));
        assert_eq!(number_value("10n"), Some(10.0));
        assert_eq!(number_value(".5"), Some(0.5));
        assert_eq!(number_value("1e3"), Some(1000.0));
    }

    #[test]
    fn labels_within_a_block_are_sorted() {
        let mut p = program("switch (x) {\ncase 'b':\ncase 'a':\n  f();\n  break;\n}\n");
        sort_cases(&mut p);
        assert_eq!(case_labels(&p.body[0]), ["a", "b"]);
        let StmtKind::Switch(switch) = &p.body[0].kind else {
            unreachable!()
        };
        assert!(switch.cases[0].consequent.is_empty());
        assert_eq!(switch.cases[1].consequent.len(), 2);
    }

    #[test]
    fn blocks_are_sorted_with_default_last() {
        let mut p = program(
            "switch (x) {\ndefault:\n  d();\n  break;\ncase 10:\n  a();\n  break;\ncase 2:\n  b();\n  return;\n}\n",
        );
        sort_cases(&mut p);
        assert_eq!(case_labels(&p.body[0]), ["2", "10", "default"]);
    }

    #[test]
    fn open_final_block_stays_last() {
        let mut p = program("switch (x) {\ncase 2:\n  a();\n  break;\ncase 1:\n  b();\n}\n");
        sort_cases(&mut p);
        assert_eq!(case_labels(&p.body[0]), ["2", "1"]);
    }

    #[test]
    fn cases_with_code_in_the_middle_are_not_resorted() {
        let mut p = program("switch (x) {\ncase 'b':\n  g();\ncase 'a':\n  f();\n  break;\n}\n");
        sort_cases(&mut p);
        assert_eq!(case_labels(&p.body[0]), ["b", "a"]);
    }

    #[test]
    fn case_comments_travel_with_their_case() {
        let mut p = program("switch (x) {\n// bee\ncase 'b':\n  break;\n// ay\ncase 'a':\n  break;\n}\n");
        sort_cases(&mut p);
        let StmtKind::Switch(switch) = &p.body[0].kind else {
            unreachable!()
        };
        assert_eq!(switch.cases[0].comments[0].text, " ay");
        assert_eq!(switch.cases[1].comments[0].text, " bee");
    }

    #[test]
    fn uncommented_functions_sort_as_one_run() {
        let mut p = program("function c() {}\nfunction a() {}\nfunction b() {}\n");
        sort_functions(&mut p);
        assert_eq!(function_names(&p.body), ["a", "b", "c"]);
    }

    #[test]
    fn commented_function_starts_a_new_run() {
        let source = "function d() {}\nfunction b() {}\n// second run\nfunction c() {}\nfunction a() {}\n";
        let mut p = program(source);
        sort_functions(&mut p);
        assert_eq!(function_names(&p.body), ["b", "d", "a", "c"]);
        assert_eq!(p.body[2].comments[0].text, " second run");
        assert!(p.body[3].comments.is_empty());
    }

    #[test]
    fn other_statements_break_runs() {
        let mut p = program("function b() {}\nx();\nfunction a() {}\n");
        sort_functions(&mut p);
        assert_eq!(function_names(&p.body), ["b", "a"]);
    }

    #[test]
    fn object_literals_sort_but_patterns_do_not() {
        let mut p = program("var {z, y} = {b: 1, a: {d: 2, c: 3}, ...rest, 1: 0};\n");
        sort_properties(&mut p);
        let StmtKind::Var(decl) = &p.body[0].kind else {
            panic!("not a var");
        };
        let keys = |e: &Expr| -> Vec<SortKey> {
            match &e.kind {
                ExprKind::Object(props) | ExprKind::ObjectPattern(props) => {
                    props.iter().map(SortKey::of_property).collect()
                }
                _ => panic!("not an object"),
            }
        };
        let d = &decl.declarators[0];
        assert_eq!(keys(&d.id), [SortKey::Str("z".into()), SortKey::Str("y".into())]);
        let init = d.init.as_ref().unwrap();
        assert_eq!(
            keys(init),
            [
                SortKey::Num(1.0),
                SortKey::Str("a".into()),
                SortKey::Str("b".into()),
                SortKey::Last,
            ]
        );
        let ExprKind::Object(props) = &init.kind else {
            unreachable!()
        };
        let PropKind::Init { value, .. } = &props[1].kind else {
            panic!("not a pair");
        };
        assert_eq!(keys(value), [SortKey::Str("c".into()), SortKey::Str("d".into())]);
    }

    fn sorted(source: &str, rule: fn(&mut Program)) -> String {
        let mut p = program(source);
        rule(&mut p);
        crate::emit::emit(&p, &crate::formatter::FormatOptions::default())
    }

    #[test]
    fn methods_sort_with_constructor_first() {
        let source = "class A {\nb() {}\nconstructor() {}\na() {}\nx = 1;\nd() {}\nc() {}\n}\n";
        let mut p = program(source);
        sort_methods(&mut p);
        let StmtKind::Class(class) = &p.body[0].kind else {
            panic!("not a class");
        };
        let keys: Vec<_> = class.members.iter().map(method_key).collect();
        let str_key = |s: &str| SortKey::Str(s.to_string());
        assert_eq!(
            keys,
            [str_key(""), str_key("a"), str_key("b"), SortKey::Last, str_key("c"), str_key("d")]
        );
    }

    #[test]
    fn constant_vars_sort_by_name() {
        assert_eq!(
            sorted("var c = 1;\nlet b;\nvar a = 'x';\nvar z = f();\nvar y = c;\n", sort_vars),
            "var a = 'x';\nlet b;\nvar c = 1;\nvar z = f();\nvar y = c;\n"
        );
    }

    #[test]
    fn dependent_vars_keep_their_order() {
        let source = "var c = 1;\nvar a = c;\n";
        assert_eq!(sorted(source, sort_vars), source);
    }

    #[test]
    fn simple_assignments_sort_unless_dependent() {
        assert_eq!(
            sorted("b = 1;\na = null;\nz += 1;\ny = 2;\nx = y;\n", sort_assigns),
            "a = null;\nb = 1;\nz += 1;\ny = 2;\nx = y;\n"
        );
    }

    #[test]
    fn requires_sort_by_binding() {
        assert_eq!(
            sorted("var z = require('z');\nvar a = require('./a');\nrun();\n", sort_requires),
            "var a = require('./a');\nvar z = require('z');\nrun();\n"
        );
    }

    #[test]
    fn exports_sort_by_value() {
        assert_eq!(
            sorted("exports.run = run;\nexports.format = format;\nexports.x = 1;\n", sort_exports),
            "exports.format = format;\nexports.run = run;\nexports.x = 1;\n"
        );
    }
}
