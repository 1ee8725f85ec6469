//! Lowering from the tree-sitter concrete syntax tree to [`crate::ast`].
//!
//! Every construct the emitter cannot reproduce is rejected here with
//! [`FormatError::Unsupported`], so later stages never meet an unknown shape.

use crate::ast::*;
use crate::error::{FormatError, Result};
use tree_sitter::Node;

pub(crate) fn span(node: Node<'_>) -> Span {
    Span {
        start: node.start_byte(),
        end: node.end_byte(),
        line: node.start_position().row + 1,
    }
}

pub(crate) fn program(root: Node<'_>, source: &str) -> Result<Program> {
    let lower = Lower { source };
    Ok(Program {
        hashbang: None,
        body: lower.stmts(root)?,
        trailing: Vec::new(),
        span: span(root),
    })
}

struct Lower<'s> {
    source: &'s str,
}

impl<'s> Lower<'s> {
    fn text(&self, node: Node<'_>) -> &'s str {
        &self.source[node.start_byte()..node.end_byte()]
    }

    fn unsupported(&self, node: Node<'_>) -> FormatError {
        FormatError::Unsupported {
            construct: node.kind().to_string(),
            line: node.start_position().row + 1,
        }
    }

    /// Named children, comments excluded.
    fn named<'t>(&self, node: Node<'t>) -> Vec<Node<'t>> {
        let mut cursor = node.walk();
        node.named_children(&mut cursor)
            .filter(|n| n.kind() != "comment")
            .collect()
    }

    /// Kinds of the anonymous tokens directly under `node` (`async`, `*`, ...).
    fn tokens(&self, node: Node<'_>) -> Vec<&'static str> {
        let mut cursor = node.walk();
        node.children(&mut cursor)
            .filter(|n| !n.is_named())
            .map(|n| n.kind())
            .collect()
    }

    fn field<'t>(&self, node: Node<'t>, name: &str) -> Result<Node<'t>> {
        node.child_by_field_name(name)
            .ok_or_else(|| self.unsupported(node))
    }

    fn first_named<'t>(&self, node: Node<'t>) -> Result<Node<'t>> {
        self.named(node)
            .into_iter()
            .next()
            .ok_or_else(|| self.unsupported(node))
    }

    fn reject_decorators(&self, node: Node<'_>) -> Result<()> {
        match self.named(node).into_iter().find(|n| n.kind() == "decorator") {
            Some(decorator) => Err(self.unsupported(decorator)),
            None => Ok(()),
        }
    }

    // Statements

    fn stmts(&self, node: Node<'_>) -> Result<Vec<Stmt>> {
        self.named(node).into_iter().map(|n| self.stmt(n)).collect()
    }

    fn block(&self, node: Node<'_>) -> Result<Block> {
        if node.kind() != "statement_block" {
            return Err(self.unsupported(node));
        }
        Ok(Block::new(self.stmts(node)?, span(node)))
    }

    fn boxed_stmt(&self, node: Node<'_>) -> Result<Box<Stmt>> {
        self.stmt(node).map(Box::new)
    }

    fn stmt(&self, node: Node<'_>) -> Result<Stmt> {
        let kind = match node.kind() {
            "expression_statement" => StmtKind::Expr(self.expr(self.first_named(node)?)?),
            "variable_declaration" | "lexical_declaration" => StmtKind::Var(self.var_decl(node)?),
            "statement_block" => StmtKind::Block(self.block(node)?),
            "empty_statement" => StmtKind::Empty,
            "debugger_statement" => StmtKind::Debugger,
            "function_declaration" | "generator_function_declaration" => {
                StmtKind::Function(self.function(node)?)
            }
            "class_declaration" => StmtKind::Class(self.class(node)?),
            "if_statement" => {
                let alternate = match node.child_by_field_name("alternative") {
                    Some(clause) => Some(self.boxed_stmt(self.first_named(clause)?)?),
                    None => None,
                };
                StmtKind::If {
                    test: self.condition(self.field(node, "condition")?)?,
                    consequent: self.boxed_stmt(self.field(node, "consequence")?)?,
                    alternate,
                }
            }
            "while_statement" => StmtKind::While {
                test: self.condition(self.field(node, "condition")?)?,
                body: self.boxed_stmt(self.field(node, "body")?)?,
            },
            "do_statement" => StmtKind::DoWhile {
                body: self.boxed_stmt(self.field(node, "body")?)?,
                test: self.condition(self.field(node, "condition")?)?,
            },
            "for_statement" => self.for_stmt(node)?,
            "for_in_statement" => self.for_in_stmt(node)?,
            "switch_statement" => StmtKind::Switch(self.switch(node)?),
            "try_statement" => {
                let handler = match node.child_by_field_name("handler") {
                    Some(clause) => Some(Catch {
                        param: match clause.child_by_field_name("parameter") {
                            Some(p) => Some(self.expr(p)?),
                            None => None,
                        },
                        body: self.block(self.field(clause, "body")?)?,
                    }),
                    None => None,
                };
                let finalizer = match node.child_by_field_name("finalizer") {
                    Some(clause) => Some(self.block(self.field(clause, "body")?)?),
                    None => None,
                };
                StmtKind::Try {
                    block: self.block(self.field(node, "body")?)?,
                    handler,
                    finalizer,
                }
            }
            "return_statement" => match self.named(node).into_iter().next() {
                Some(arg) => StmtKind::Return(Some(self.expr(arg)?)),
                None => StmtKind::Return(None),
            },
            "throw_statement" => StmtKind::Throw(self.expr(self.first_named(node)?)?),
            "break_statement" => StmtKind::Break(self.label(node)),
            "continue_statement" => StmtKind::Continue(self.label(node)),
            "labeled_statement" => StmtKind::Labeled {
                label: self.text(self.field(node, "label")?).to_string(),
                body: self.boxed_stmt(self.field(node, "body")?)?,
            },
            _ => return Err(self.unsupported(node)),
        };
        Ok(Stmt::new(kind, span(node)))
    }

    fn label(&self, node: Node<'_>) -> Option<String> {
        node.child_by_field_name("label")
            .map(|n| self.text(n).to_string())
    }

    /// The parenthesized test of `if`, `while`, `do` and `switch`; the
    /// parentheses belong to the statement syntax.
    fn condition(&self, node: Node<'_>) -> Result<Expr> {
        if node.kind() == "parenthesized_expression" {
            self.expr(self.first_named(node)?)
        } else {
            self.expr(node)
        }
    }

    fn var_decl(&self, node: Node<'_>) -> Result<VarDecl> {
        let kind = match node.child_by_field_name("kind").map(|n| n.kind()) {
            Some("let") => VarKind::Let,
            Some("const") => VarKind::Const,
            Some(_) => return Err(self.unsupported(node)),
            None => VarKind::Var,
        };
        let declarators = self
            .named(node)
            .into_iter()
            .filter(|n| n.kind() == "variable_declarator")
            .map(|d| {
                Ok(Declarator {
                    id: self.expr(self.field(d, "name")?)?,
                    init: match d.child_by_field_name("value") {
                        Some(v) => Some(self.expr(v)?),
                        None => None,
                    },
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(VarDecl {
            kind,
            declarators,
            span: span(node),
        })
    }

    fn for_stmt(&self, node: Node<'_>) -> Result<StmtKind> {
        let init = match node.child_by_field_name("initializer") {
            None => None,
            Some(n) => match n.kind() {
                "variable_declaration" | "lexical_declaration" => Some(ForInit::Var {
                    decl: self.var_decl(n)?,
                    comments: Vec::new(),
                }),
                "empty_statement" | ";" => None,
                "expression_statement" => Some(ForInit::Expr(self.expr(self.first_named(n)?)?)),
                _ => Some(ForInit::Expr(self.expr(n)?)),
            },
        };
        let test = match node.child_by_field_name("condition") {
            None => None,
            Some(n) => match n.kind() {
                "empty_statement" | ";" => None,
                "expression_statement" => Some(self.expr(self.first_named(n)?)?),
                _ => Some(self.expr(n)?),
            },
        };
        let update = match node.child_by_field_name("increment") {
            Some(n) => Some(self.expr(n)?),
            None => None,
        };
        Ok(StmtKind::For {
            init,
            test,
            update,
            body: self.boxed_stmt(self.field(node, "body")?)?,
        })
    }

    fn for_in_stmt(&self, node: Node<'_>) -> Result<StmtKind> {
        // `for (var x = 1 in o)` is legacy syntax with no emitter form.
        if node.child_by_field_name("value").is_some() {
            return Err(self.unsupported(node));
        }
        let kind = match node.child_by_field_name("kind").map(|n| n.kind()) {
            Some("var") => Some(VarKind::Var),
            Some("let") => Some(VarKind::Let),
            Some("const") => Some(VarKind::Const),
            Some(_) => return Err(self.unsupported(node)),
            None => None,
        };
        let head = ForHead {
            kind,
            target: self.expr(self.field(node, "left")?)?,
        };
        let right = self.expr(self.field(node, "right")?)?;
        let body = self.boxed_stmt(self.field(node, "body")?)?;
        match self.field(node, "operator")?.kind() {
            "in" => Ok(StmtKind::ForIn { head, right, body }),
            "of" => Ok(StmtKind::ForOf {
                head,
                right,
                body,
                is_await: self.tokens(node).contains(&"await"),
            }),
            _ => Err(self.unsupported(node)),
        }
    }

    fn switch(&self, node: Node<'_>) -> Result<Switch> {
        let body = self.field(node, "body")?;
        let mut cases = Vec::new();
        for case in self.named(body) {
            let test = match case.kind() {
                "switch_case" => Some(self.field(case, "value")?),
                "switch_default" => None,
                _ => return Err(self.unsupported(case)),
            };
            let consequent = self
                .named(case)
                .into_iter()
                .filter(|n| Some(n.id()) != test.map(|t| t.id()))
                .map(|n| self.stmt(n))
                .collect::<Result<Vec<_>>>()?;
            cases.push(SwitchCase {
                test: match test {
                    Some(t) => Some(self.expr(t)?),
                    None => None,
                },
                consequent,
                comments: Vec::new(),
                span: span(case),
            });
        }
        Ok(Switch {
            discriminant: self.condition(self.field(node, "value")?)?,
            cases,
            trailing: Vec::new(),
            span: span(body),
        })
    }

    // Functions and classes

    fn function(&self, node: Node<'_>) -> Result<Function> {
        let tokens = self.tokens(node);
        Ok(Function {
            id: node
                .child_by_field_name("name")
                .map(|n| self.text(n).to_string()),
            params: self.params(self.field(node, "parameters")?)?,
            body: self.block(self.field(node, "body")?)?,
            is_async: tokens.contains(&"async"),
            is_generator: tokens.contains(&"*"),
        })
    }

    fn params(&self, node: Node<'_>) -> Result<Vec<Expr>> {
        self.named(node).into_iter().map(|p| self.expr(p)).collect()
    }

    fn arrow(&self, node: Node<'_>) -> Result<Arrow> {
        let params = match node.child_by_field_name("parameter") {
            Some(p) => vec![self.expr(p)?],
            None => self.params(self.field(node, "parameters")?)?,
        };
        let body = self.field(node, "body")?;
        let body = if body.kind() == "statement_block" {
            ArrowBody::Block(self.block(body)?)
        } else {
            ArrowBody::Expr(Box::new(self.expr(body)?))
        };
        Ok(Arrow {
            params,
            body,
            is_async: self.tokens(node).contains(&"async"),
        })
    }

    fn class(&self, node: Node<'_>) -> Result<Class> {
        self.reject_decorators(node)?;
        let superclass = match self
            .named(node)
            .into_iter()
            .find(|n| n.kind() == "class_heritage")
        {
            Some(heritage) => Some(Box::new(self.expr(self.first_named(heritage)?)?)),
            None => None,
        };
        let body = self.field(node, "body")?;
        let members = self
            .named(body)
            .into_iter()
            .map(|m| self.class_member(m))
            .collect::<Result<Vec<_>>>()?;
        Ok(Class {
            id: node
                .child_by_field_name("name")
                .map(|n| self.text(n).to_string()),
            superclass,
            members,
            trailing: Vec::new(),
            span: span(body),
        })
    }

    fn class_member(&self, node: Node<'_>) -> Result<ClassMember> {
        self.reject_decorators(node)?;
        let is_static = self.tokens(node).iter().any(|t| t.starts_with("static"));
        let kind = match node.kind() {
            "method_definition" => {
                let (key, kind, function) = self.method(node)?;
                MemberKind::Method {
                    key,
                    kind,
                    function,
                }
            }
            "field_definition" => MemberKind::Field {
                key: self.prop_key(self.field(node, "property")?)?,
                value: match node.child_by_field_name("value") {
                    Some(v) => Some(self.expr(v)?),
                    None => None,
                },
            },
            "class_static_block" => MemberKind::StaticBlock(self.block(self.field(node, "body")?)?),
            _ => return Err(self.unsupported(node)),
        };
        let is_static = is_static && !matches!(kind, MemberKind::StaticBlock(_));
        Ok(ClassMember {
            kind,
            is_static,
            comments: Vec::new(),
            span: span(node),
        })
    }

    fn method(&self, node: Node<'_>) -> Result<(PropKey, MethodKind, Function)> {
        self.reject_decorators(node)?;
        let tokens = self.tokens(node);
        let kind = if tokens.iter().any(|t| t.ends_with("get")) {
            MethodKind::Get
        } else if tokens.contains(&"set") {
            MethodKind::Set
        } else {
            MethodKind::Method
        };
        let function = Function {
            id: None,
            params: self.params(self.field(node, "parameters")?)?,
            body: self.block(self.field(node, "body")?)?,
            is_async: tokens.contains(&"async"),
            is_generator: tokens.contains(&"*"),
        };
        Ok((self.prop_key(self.field(node, "name")?)?, kind, function))
    }

    fn prop_key(&self, node: Node<'_>) -> Result<PropKey> {
        match node.kind() {
            "property_identifier" | "private_property_identifier" | "identifier" => {
                Ok(PropKey::Ident(self.text(node).to_string()))
            }
            "string" => Ok(PropKey::Str(self.string(node)?)),
            "number" => Ok(PropKey::Num(self.text(node).to_string())),
            "computed_property_name" => Ok(PropKey::Computed(Box::new(
                self.expr(self.first_named(node)?)?,
            ))),
            _ => Err(self.unsupported(node)),
        }
    }

    // Expressions

    fn boxed(&self, node: Node<'_>) -> Result<Box<Expr>> {
        self.expr(node).map(Box::new)
    }

    fn boxed_field(&self, node: Node<'_>, name: &str) -> Result<Box<Expr>> {
        self.boxed(self.field(node, name)?)
    }

    fn exprs(&self, node: Node<'_>) -> Result<Vec<Expr>> {
        self.named(node).into_iter().map(|n| self.expr(n)).collect()
    }

    fn expr(&self, node: Node<'_>) -> Result<Expr> {
        let kind = match node.kind() {
            "identifier"
            | "property_identifier"
            | "shorthand_property_identifier"
            | "shorthand_property_identifier_pattern"
            | "statement_identifier"
            | "private_property_identifier"
            | "undefined" => ExprKind::Ident(self.text(node).to_string()),
            "this" => ExprKind::This,
            "super" => ExprKind::Super,
            "null" => ExprKind::Null,
            "true" => ExprKind::Bool(true),
            "false" => ExprKind::Bool(false),
            "number" => ExprKind::Num(self.text(node).to_string()),
            "string" => ExprKind::Str(self.string(node)?),
            "regex" => ExprKind::Regex(self.text(node).to_string()),
            "template_string" => ExprKind::Template(self.text(node).to_string()),
            "meta_property" => ExprKind::MetaProperty(self.text(node).to_string()),
            "parenthesized_expression" => ExprKind::Paren(self.boxed(self.first_named(node)?)?),
            "sequence_expression" => {
                let mut list = Vec::new();
                self.flatten_sequence(node, &mut list)?;
                ExprKind::Sequence(list)
            }
            "array" => ExprKind::Array(self.elements(node)?),
            "array_pattern" => ExprKind::ArrayPattern(self.elements(node)?),
            "object" => ExprKind::Object(self.properties(node)?),
            "object_pattern" => ExprKind::ObjectPattern(self.properties(node)?),
            "assignment_pattern" => ExprKind::AssignPattern {
                left: self.boxed_field(node, "left")?,
                right: self.boxed_field(node, "right")?,
            },
            "spread_element" | "rest_pattern" => ExprKind::Spread(self.boxed(self.first_named(node)?)?),
            "function_expression" | "function" | "generator_function" => {
                ExprKind::Function(Box::new(self.function(node)?))
            }
            "arrow_function" => ExprKind::Arrow(Box::new(self.arrow(node)?)),
            "class" => ExprKind::Class(Box::new(self.class(node)?)),
            "unary_expression" => ExprKind::Unary {
                op: self.field(node, "operator")?.kind(),
                arg: self.boxed_field(node, "argument")?,
            },
            "update_expression" => {
                let op = self.field(node, "operator")?;
                let arg = self.field(node, "argument")?;
                ExprKind::Update {
                    op: op.kind(),
                    prefix: op.start_byte() < arg.start_byte(),
                    arg: self.boxed(arg)?,
                }
            }
            "binary_expression" => {
                let op = self.field(node, "operator")?.kind();
                let left = self.boxed_field(node, "left")?;
                let right = self.boxed_field(node, "right")?;
                if matches!(op, "&&" | "||" | "??") {
                    ExprKind::Logical { op, left, right }
                } else {
                    ExprKind::Binary { op, left, right }
                }
            }
            "assignment_expression" => ExprKind::Assign {
                op: "=",
                left: self.boxed_field(node, "left")?,
                right: self.boxed_field(node, "right")?,
            },
            "augmented_assignment_expression" => ExprKind::Assign {
                op: self.field(node, "operator")?.kind(),
                left: self.boxed_field(node, "left")?,
                right: self.boxed_field(node, "right")?,
            },
            "ternary_expression" => ExprKind::Conditional {
                test: self.boxed_field(node, "condition")?,
                consequent: self.boxed_field(node, "consequence")?,
                alternate: self.boxed_field(node, "alternative")?,
            },
            "call_expression" => {
                let callee = self.boxed_field(node, "function")?;
                let args = self.field(node, "arguments")?;
                if args.kind() == "template_string" {
                    ExprKind::TaggedTemplate {
                        tag: callee,
                        quasi: self.text(args).to_string(),
                    }
                } else {
                    ExprKind::Call {
                        callee,
                        args: self.exprs(args)?,
                        optional: node.child_by_field_name("optional_chain").is_some(),
                    }
                }
            }
            "new_expression" => ExprKind::New {
                callee: self.boxed_field(node, "constructor")?,
                args: match node.child_by_field_name("arguments") {
                    Some(args) => self.exprs(args)?,
                    None => Vec::new(),
                },
            },
            "member_expression" => ExprKind::Member {
                object: self.boxed_field(node, "object")?,
                property: self.text(self.field(node, "property")?).to_string(),
                optional: node.child_by_field_name("optional_chain").is_some(),
            },
            "subscript_expression" => ExprKind::Index {
                object: self.boxed_field(node, "object")?,
                index: self.boxed_field(node, "index")?,
                optional: node.child_by_field_name("optional_chain").is_some(),
            },
            "await_expression" => ExprKind::Await(self.boxed(self.first_named(node)?)?),
            "yield_expression" => ExprKind::Yield {
                arg: match self.named(node).into_iter().next() {
                    Some(arg) => Some(self.boxed(arg)?),
                    None => None,
                },
                delegate: self.tokens(node).contains(&"*"),
            },
            _ => return Err(self.unsupported(node)),
        };
        Ok(Expr::new(kind, span(node)))
    }

    fn flatten_sequence(&self, node: Node<'_>, list: &mut Vec<Expr>) -> Result<()> {
        for child in self.named(node) {
            if child.kind() == "sequence_expression" {
                self.flatten_sequence(child, list)?;
            } else {
                list.push(self.expr(child)?);
            }
        }
        Ok(())
    }

    /// Array elements, with elisions turned into [`ExprKind::Hole`].
    fn elements(&self, node: Node<'_>) -> Result<Vec<Expr>> {
        let mut cursor = node.walk();
        let children: Vec<_> = node.children(&mut cursor).collect();
        let mut elements = Vec::new();
        let mut filled = false;
        for child in children {
            match child.kind() {
                "," => {
                    if !filled {
                        elements.push(Expr::new(ExprKind::Hole, span(child)));
                    }
                    filled = false;
                }
                "comment" | "[" | "]" => {}
                _ if child.is_named() => {
                    elements.push(self.expr(child)?);
                    filled = true;
                }
                _ => return Err(self.unsupported(child)),
            }
        }
        Ok(elements)
    }

    fn properties(&self, node: Node<'_>) -> Result<Vec<Property>> {
        self.named(node)
            .into_iter()
            .map(|p| {
                let kind = match p.kind() {
                    "pair" | "pair_pattern" => PropKind::Init {
                        key: self.prop_key(self.field(p, "key")?)?,
                        value: self.expr(self.field(p, "value")?)?,
                    },
                    "shorthand_property_identifier" | "shorthand_property_identifier_pattern" => {
                        PropKind::Shorthand(self.text(p).to_string())
                    }
                    "object_assignment_pattern" => {
                        let left = self.field(p, "left")?;
                        if left.kind() != "shorthand_property_identifier_pattern" {
                            return Err(self.unsupported(left));
                        }
                        let name = self.text(left).to_string();
                        PropKind::Init {
                            key: PropKey::Ident(name),
                            value: Expr::new(
                                ExprKind::AssignPattern {
                                    left: self.boxed(left)?,
                                    right: self.boxed_field(p, "right")?,
                                },
                                span(p),
                            ),
                        }
                    }
                    "method_definition" => {
                        let (key, kind, function) = self.method(p)?;
                        PropKind::Method {
                            key,
                            kind,
                            function,
                        }
                    }
                    "spread_element" | "rest_pattern" => {
                        PropKind::Spread(self.expr(self.first_named(p)?)?)
                    }
                    _ => return Err(self.unsupported(p)),
                };
                Ok(Property {
                    kind,
                    comments: Vec::new(),
                    span: span(p),
                })
            })
            .collect()
    }

    /// Decode a string literal into its UTF-16 value.
    fn string(&self, node: Node<'_>) -> Result<JsString> {
        let mut units = Vec::new();
        for part in self.named(node) {
            let text = self.text(part);
            if part.kind() == "escape_sequence" {
                decode_escape(text, &mut units);
            } else {
                units.extend(text.encode_utf16());
            }
        }
        Ok(JsString(units))
    }
}

/// Append the value of one escape sequence (backslash included) to `out`.
pub(crate) fn decode_escape(escape: &str, out: &mut Vec<u16>) {
    let body = escape.strip_prefix('\\').unwrap_or(escape);
    let mut chars = body.chars();
    let Some(first) = chars.next() else {
        return;
    };
    let rest = chars.as_str();
    match first {
        'b' => out.push(0x08),
        't' => out.push(0x09),
        'n' => out.push(0x0a),
        'v' => out.push(0x0b),
        'f' => out.push(0x0c),
        'r' => out.push(0x0d),
        // Line continuation
        '\r' | '\n' | '\u{2028}' | '\u{2029}' => {}
        'x' => match u16::from_str_radix(rest, 16) {
            Ok(unit) => out.push(unit),
            Err(_) => out.extend(body.encode_utf16()),
        },
        'u' => {
            let digits = rest.trim_start_matches('{').trim_end_matches('}');
            match u32::from_str_radix(digits, 16) {
                Ok(code) if rest.starts_with('{') => match char::from_u32(code) {
                    Some(c) => out.extend(c.encode_utf16(&mut [0; 2]).iter()),
                    None => out.extend(body.encode_utf16()),
                },
                // `\uXXXX` may be half of a surrogate pair.
                Ok(code) => out.push(code as u16),
                Err(_) => out.extend(body.encode_utf16()),
            }
        }
        '0'..='7' => match u16::from_str_radix(body, 8) {
            Ok(unit) => out.push(unit),
            Err(_) => out.extend(body.encode_utf16()),
        },
        c => out.extend(c.encode_utf16(&mut [0; 2]).iter()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn decode(escape: &str) -> Vec<u16> {
        let mut out = Vec::new();
        decode_escape(escape, &mut out);
        out
    }

    fn first_expr(source: &str) -> Expr {
        let parsed = parse(source).unwrap();
        match parsed.program.body.into_iter().next().map(|s| s.kind) {
            Some(StmtKind::Expr(e)) => e,
            other => panic!("expected an expression statement, got {other:?}"),
        }
    }

    #[test]
    fn escapes_decode_to_code_units() {
        assert_eq!(decode("\\n"), [0x0a]);
        assert_eq!(decode("\\'"), [u16::from(b'\'')]);
        assert_eq!(decode("\\x41"), [0x41]);
        assert_eq!(decode("\\u00e9"), [0xe9]);
        assert_eq!(decode("\\u{1F600}"), [0xd83d, 0xde00]);
        assert_eq!(decode("\\0"), [0]);
        assert_eq!(decode("\\101"), [0x41]);
        assert_eq!(decode("\\\n"), Vec::<u16>::new());
    }

    #[test]
    fn string_values_are_decoded() {
        let e = first_expr("'it\\'s\\n';");
        assert_eq!(e.kind, ExprKind::Str(JsString::from("it's\n")));
    }

    #[test]
    fn logical_operators_are_separate_from_binary() {
        let e = first_expr("a && b;");
        assert!(matches!(e.kind, ExprKind::Logical { op: "&&", .. }));
        let e = first_expr("a == b;");
        assert!(matches!(e.kind, ExprKind::Binary { op: "==", .. }));
    }

    #[test]
    fn array_holes_are_kept() {
        let e = first_expr("[1, , 2];");
        let ExprKind::Array(elements) = e.kind else {
            panic!("not an array");
        };
        let kinds: Vec<_> = elements.iter().map(Expr::kind_name).collect();
        assert_eq!(kinds, ["Literal", "Hole", "Literal"]);
    }

    #[test]
    fn update_expressions_know_their_fixity() {
        assert!(matches!(first_expr("++i;").kind, ExprKind::Update { prefix: true, .. }));
        assert!(matches!(first_expr("i++;").kind, ExprKind::Update { prefix: false, .. }));
    }

    #[test]
    fn sequences_are_flattened() {
        let e = first_expr("a, b, c;");
        assert!(matches!(e.kind, ExprKind::Sequence(ref list) if list.len() == 3));
    }
}
