//! Typed syntax tree for the JavaScript dialect jsclean understands
//!
//! The tree is built by [`crate::parser`] from the tree-sitter concrete syntax
//! tree. Every node owns its children. Nodes that may carry comments have a
//! `comments` field; before [`crate::comments::attach`] runs those lists are
//! empty, afterwards each comment sits on exactly one owning node.

/// Source position of a node or comment.
///
/// Spans are only used to order comments and to report diagnostics. The
/// emitter never looks at them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Span {
    /// Byte offset of the first byte
    pub start: usize,
    /// Byte offset one past the last byte
    pub end: usize,
    /// 1-based line of the first byte
    pub line: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommentKind {
    /// `// text`
    Line,
    /// `/* text */`
    Block,
}

/// A source comment, with its delimiters stripped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Comment {
    pub kind: CommentKind,
    pub text: String,
    pub span: Span,
}

impl Comment {
    #[cfg(test)]
    pub(crate) fn line(text: impl Into<String>) -> Self {
        Self {
            kind: CommentKind::Line,
            text: text.into(),
            span: Span::default(),
        }
    }
}

/// String literal value as UTF-16 code units, the way JavaScript sees it.
///
/// Lone surrogates are legal in JavaScript strings, so the value cannot be a
/// Rust `String`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct JsString(pub Vec<u16>);

impl JsString {
    pub fn to_string_lossy(&self) -> String {
        String::from_utf16_lossy(&self.0)
    }
}

impl From<&str> for JsString {
    fn from(s: &str) -> Self {
        Self(s.encode_utf16().collect())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Program {
    /// `#!` line, without its newline
    pub hashbang: Option<String>,
    pub body: Vec<Stmt>,
    /// Comments after the last statement
    pub trailing: Vec<Comment>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub comments: Vec<Comment>,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Self {
            kind,
            comments: Vec::new(),
            span,
        }
    }

    /// `break`, `continue`, `return` and `throw` end a fallthrough chain.
    pub fn is_terminator(&self) -> bool {
        matches!(
            self.kind,
            StmtKind::Break(_) | StmtKind::Continue(_) | StmtKind::Return(_) | StmtKind::Throw(_)
        )
    }

    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            StmtKind::Block(_) => "BlockStatement",
            StmtKind::Empty => "EmptyStatement",
            StmtKind::Debugger => "DebuggerStatement",
            StmtKind::Expr(_) => "ExpressionStatement",
            StmtKind::Var(_) => "VariableDeclaration",
            StmtKind::Function(_) => "FunctionDeclaration",
            StmtKind::Class(_) => "ClassDeclaration",
            StmtKind::If { .. } => "IfStatement",
            StmtKind::While { .. } => "WhileStatement",
            StmtKind::DoWhile { .. } => "DoWhileStatement",
            StmtKind::For { .. } => "ForStatement",
            StmtKind::ForIn { .. } => "ForInStatement",
            StmtKind::ForOf { .. } => "ForOfStatement",
            StmtKind::Switch(_) => "SwitchStatement",
            StmtKind::Try { .. } => "TryStatement",
            StmtKind::Return(_) => "ReturnStatement",
            StmtKind::Throw(_) => "ThrowStatement",
            StmtKind::Break(_) => "BreakStatement",
            StmtKind::Continue(_) => "ContinueStatement",
            StmtKind::Labeled { .. } => "LabeledStatement",
        }
    }
}

/// True when the last statement of `stmts` is a terminator.
pub fn ends_in_terminator(stmts: &[Stmt]) -> bool {
    stmts.last().is_some_and(Stmt::is_terminator)
}

#[derive(Clone, Debug, PartialEq)]
pub enum StmtKind {
    Block(Block),
    Empty,
    Debugger,
    Expr(Expr),
    Var(VarDecl),
    Function(Function),
    Class(Class),
    If {
        test: Expr,
        consequent: Box<Stmt>,
        alternate: Option<Box<Stmt>>,
    },
    While {
        test: Expr,
        body: Box<Stmt>,
    },
    DoWhile {
        body: Box<Stmt>,
        test: Expr,
    },
    For {
        init: Option<ForInit>,
        test: Option<Expr>,
        update: Option<Expr>,
        body: Box<Stmt>,
    },
    ForIn {
        head: ForHead,
        right: Expr,
        body: Box<Stmt>,
    },
    ForOf {
        head: ForHead,
        right: Expr,
        body: Box<Stmt>,
        is_await: bool,
    },
    Switch(Switch),
    Try {
        block: Block,
        handler: Option<Catch>,
        finalizer: Option<Block>,
    },
    Return(Option<Expr>),
    Throw(Expr),
    Break(Option<String>),
    Continue(Option<String>),
    Labeled {
        label: String,
        body: Box<Stmt>,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    pub body: Vec<Stmt>,
    /// Comments after the last statement, before the closing brace
    pub trailing: Vec<Comment>,
    pub span: Span,
}

impl Block {
    pub fn new(body: Vec<Stmt>, span: Span) -> Self {
        Self {
            body,
            trailing: Vec::new(),
            span,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VarKind {
    Var,
    Let,
    Const,
}

impl VarKind {
    pub fn as_str(self) -> &'static str {
        match self {
            VarKind::Var => "var",
            VarKind::Let => "let",
            VarKind::Const => "const",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct VarDecl {
    pub kind: VarKind,
    pub declarators: Vec<Declarator>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Declarator {
    /// Identifier or destructuring pattern
    pub id: Expr,
    pub init: Option<Expr>,
}

/// Init clause of a C-style `for`.
#[derive(Clone, Debug, PartialEq)]
pub enum ForInit {
    /// A declaration in this position owns its comments.
    Var {
        decl: VarDecl,
        comments: Vec<Comment>,
    },
    Expr(Expr),
}

/// Left side of `for (... in x)` / `for (... of x)`.
#[derive(Clone, Debug, PartialEq)]
pub struct ForHead {
    pub kind: Option<VarKind>,
    pub target: Expr,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Switch {
    pub discriminant: Expr,
    pub cases: Vec<SwitchCase>,
    pub trailing: Vec<Comment>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SwitchCase {
    /// `None` is `default`
    pub test: Option<Expr>,
    pub consequent: Vec<Stmt>,
    pub comments: Vec<Comment>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Catch {
    pub param: Option<Expr>,
    pub body: Block,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Function {
    pub id: Option<String>,
    pub params: Vec<Expr>,
    pub body: Block,
    pub is_async: bool,
    pub is_generator: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Arrow {
    pub params: Vec<Expr>,
    pub body: ArrowBody,
    pub is_async: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ArrowBody {
    Block(Block),
    Expr(Box<Expr>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Class {
    pub id: Option<String>,
    pub superclass: Option<Box<Expr>>,
    pub members: Vec<ClassMember>,
    pub trailing: Vec<Comment>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ClassMember {
    pub kind: MemberKind,
    pub is_static: bool,
    pub comments: Vec<Comment>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub enum MemberKind {
    Method {
        key: PropKey,
        kind: MethodKind,
        function: Function,
    },
    Field {
        key: PropKey,
        value: Option<Expr>,
    },
    StaticBlock(Block),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MethodKind {
    Method,
    Get,
    Set,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Property {
    pub kind: PropKind,
    pub comments: Vec<Comment>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub enum PropKind {
    Init {
        key: PropKey,
        value: Expr,
    },
    Shorthand(String),
    Method {
        key: PropKey,
        kind: MethodKind,
        function: Function,
    },
    /// `...x` in literals, `...rest` in patterns
    Spread(Expr),
}

#[derive(Clone, Debug, PartialEq)]
pub enum PropKey {
    /// Plain or `#private` name
    Ident(String),
    Str(JsString),
    /// Raw numeric literal
    Num(String),
    Computed(Box<Expr>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub comments: Vec<Comment>,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self {
            kind,
            comments: Vec::new(),
            span,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self.kind, ExprKind::Null)
    }

    /// ESTree-style tag, used in diagnostics and as a last-resort sort key.
    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            ExprKind::Ident(_) => "Identifier",
            ExprKind::This => "ThisExpression",
            ExprKind::Super => "Super",
            ExprKind::Null
            | ExprKind::Bool(_)
            | ExprKind::Num(_)
            | ExprKind::Str(_)
            | ExprKind::Regex(_) => "Literal",
            ExprKind::Template(_) => "TemplateLiteral",
            ExprKind::TaggedTemplate { .. } => "TaggedTemplateExpression",
            ExprKind::Array(_) => "ArrayExpression",
            ExprKind::Object(_) => "ObjectExpression",
            ExprKind::Function(_) => "FunctionExpression",
            ExprKind::Arrow(_) => "ArrowFunctionExpression",
            ExprKind::Class(_) => "ClassExpression",
            ExprKind::Unary { .. } => "UnaryExpression",
            ExprKind::Update { .. } => "UpdateExpression",
            ExprKind::Binary { .. } => "BinaryExpression",
            ExprKind::Logical { .. } => "LogicalExpression",
            ExprKind::Assign { .. } => "AssignmentExpression",
            ExprKind::Conditional { .. } => "ConditionalExpression",
            ExprKind::Call { .. } => "CallExpression",
            ExprKind::New { .. } => "NewExpression",
            ExprKind::Member { .. } | ExprKind::Index { .. } => "MemberExpression",
            ExprKind::Sequence(_) => "SequenceExpression",
            ExprKind::Paren(_) => "ParenthesizedExpression",
            ExprKind::Spread(_) => "SpreadElement",
            ExprKind::Await(_) => "AwaitExpression",
            ExprKind::Yield { .. } => "YieldExpression",
            ExprKind::MetaProperty(_) => "MetaProperty",
            ExprKind::AssignPattern { .. } => "AssignmentPattern",
            ExprKind::ArrayPattern(_) => "ArrayPattern",
            ExprKind::ObjectPattern(_) => "ObjectPattern",
            ExprKind::Hole => "Hole",
        }
    }
}

/// Expressions and binding patterns.
///
/// Operators are kept as the grammar's token strings.
#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    Ident(String),
    This,
    Super,
    Null,
    Bool(bool),
    /// Raw numeric literal
    Num(String),
    Str(JsString),
    /// Raw regular expression literal
    Regex(String),
    /// Raw template literal, backticks included
    Template(String),
    TaggedTemplate {
        tag: Box<Expr>,
        quasi: String,
    },
    Array(Vec<Expr>),
    Object(Vec<Property>),
    Function(Box<Function>),
    Arrow(Box<Arrow>),
    Class(Box<Class>),
    Unary {
        op: &'static str,
        arg: Box<Expr>,
    },
    Update {
        op: &'static str,
        prefix: bool,
        arg: Box<Expr>,
    },
    Binary {
        op: &'static str,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Logical {
        op: &'static str,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Assign {
        op: &'static str,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Conditional {
        test: Box<Expr>,
        consequent: Box<Expr>,
        alternate: Box<Expr>,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
        optional: bool,
    },
    New {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    Member {
        object: Box<Expr>,
        property: String,
        optional: bool,
    },
    Index {
        object: Box<Expr>,
        index: Box<Expr>,
        optional: bool,
    },
    Sequence(Vec<Expr>),
    Paren(Box<Expr>),
    /// Spread element or rest pattern
    Spread(Box<Expr>),
    Await(Box<Expr>),
    Yield {
        arg: Option<Box<Expr>>,
        delegate: bool,
    },
    /// `new.target`
    MetaProperty(String),
    /// `x = default` in parameters and patterns
    AssignPattern {
        left: Box<Expr>,
        right: Box<Expr>,
    },
    ArrayPattern(Vec<Expr>),
    ObjectPattern(Vec<Property>),
    /// Elided array element
    Hole,
}
