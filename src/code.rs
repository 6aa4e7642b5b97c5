//! Deferred builders for Go syntax trees.
//!
//! A [`Code`] value describes a node without allocating it. Combinators wrap
//! the receiver in a new `Code`, so values are immutable and cheap to clone.
//! Nothing is built until [`Code::resolve`] runs against a [`Scope`] and an
//! [`AstArena`]:
//!
//! ```
//! use gogen::code::{ident, if_init, define};
//!
//! let (x, y, z, n) = (ident("x"), ident("y"), ident("z"), ident("n"));
//! let stmt = if_init(&define(&x, &n), &x.op("<", Some(&y))).then(&[z]);
//! assert_eq!(stmt.render().unwrap(), "if x := n; x < y {\n\tz\n}");
//! ```
//!
//! Misuse, such as calling `then` on something that is not a conditional or
//! passing a statement where an expression is required, panics during
//! resolution. Construction itself never fails.

use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, OnceLock};

use gogen_syntax::ast::*;
use gogen_syntax::printer::{print_node, quote_rune, quote_string};
use gogen_syntax::PrintError;

use crate::scope::{Scope, StashKey};

/// Literal values accepted by [`literal`].
#[derive(Debug, Clone, PartialEq)]
pub enum Lit {
    Int(i64),
    Float(f64),
    Char(char),
    Str(String),
}

impl From<i64> for Lit {
    fn from(v: i64) -> Self {
        Lit::Int(v)
    }
}

impl From<i32> for Lit {
    fn from(v: i32) -> Self {
        Lit::Int(v.into())
    }
}

impl From<u16> for Lit {
    fn from(v: u16) -> Self {
        Lit::Int(v.into())
    }
}

impl From<f64> for Lit {
    fn from(v: f64) -> Self {
        Lit::Float(v)
    }
}

impl From<char> for Lit {
    fn from(v: char) -> Self {
        Lit::Char(v)
    }
}

impl From<&str> for Lit {
    fn from(v: &str) -> Self {
        Lit::Str(v.to_owned())
    }
}

impl From<String> for Lit {
    fn from(v: String) -> Self {
        Lit::Str(v)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldSlot {
    Receiver,
    Param,
    Result,
}

type Install = Arc<dyn Fn(&mut Scope<'_>) + Send + Sync>;
type Deferred = Arc<dyn Fn(&Scope<'_>) -> Code + Send + Sync>;

enum CodeKind {
    Ident(String),
    IdentPrefix {
        prefix: String,
        picked: OnceLock<String>,
    },
    Lit(Lit),
    Import(String),

    Op {
        x: Code,
        sym: String,
        y: Option<Code>,
    },
    Paren(Code),
    Call {
        fun: Code,
        args: Vec<Code>,
    },
    Dot {
        x: Code,
        sel: String,
    },
    Star(Code),
    Index {
        x: Code,
        index: Code,
    },

    Assign {
        lhs: Vec<Code>,
        sym: String,
        rhs: Vec<Code>,
    },
    IncDec {
        x: Code,
        op: IncDecOp,
    },
    If {
        init: Option<Code>,
        cond: Code,
        body: Vec<Code>,
        alt: Option<Code>,
    },
    Then {
        target: Code,
        stmts: Vec<Code>,
    },
    Else {
        target: Code,
        alt: Code,
    },
    Return(Vec<Code>),
    Block(Vec<Code>),

    Func(String),
    WithField {
        target: Code,
        slot: FieldSlot,
        parts: Vec<Option<Code>>,
    },
    WithBody {
        target: Code,
        stmts: Vec<Code>,
    },
    File {
        package: String,
        decls: Vec<Code>,
    },

    WithStash {
        target: Code,
        install: Install,
    },
    Scoped(Deferred),
}

impl CodeKind {
    fn label(&self) -> &'static str {
        match self {
            CodeKind::Ident(_) => "ident",
            CodeKind::IdentPrefix { .. } => "ident_prefix",
            CodeKind::Lit(_) => "literal",
            CodeKind::Import(_) => "import",
            CodeKind::Op { .. } => "op",
            CodeKind::Paren(_) => "paren",
            CodeKind::Call { .. } => "call",
            CodeKind::Dot { .. } => "dot",
            CodeKind::Star(_) => "star",
            CodeKind::Index { .. } => "index",
            CodeKind::Assign { .. } => "assign",
            CodeKind::IncDec { .. } => "inc/dec",
            CodeKind::If { .. } => "if",
            CodeKind::Then { .. } => "then",
            CodeKind::Else { .. } => "else",
            CodeKind::Return(_) => "return",
            CodeKind::Block(_) => "block",
            CodeKind::Func(_) => "func",
            CodeKind::WithField { .. } => "with_field",
            CodeKind::WithBody { .. } => "with_body",
            CodeKind::File { .. } => "file",
            CodeKind::WithStash { .. } => "with_stash",
            CodeKind::Scoped(_) => "scoped",
        }
    }

    /// Calls `f` on every nested producer known before resolution.
    fn for_each_child<'a>(&'a self, mut f: impl FnMut(&'a Code)) {
        match self {
            CodeKind::Ident(_)
            | CodeKind::IdentPrefix { .. }
            | CodeKind::Lit(_)
            | CodeKind::Import(_)
            | CodeKind::Func(_)
            | CodeKind::Scoped(_) => {}
            CodeKind::Paren(x) | CodeKind::Star(x) | CodeKind::IncDec { x, .. } => f(x),
            CodeKind::Dot { x, .. } => f(x),
            CodeKind::Op { x, y, .. } => {
                f(x);
                y.iter().for_each(f);
            }
            CodeKind::Call { fun, args } => {
                f(fun);
                args.iter().for_each(f);
            }
            CodeKind::Index { x, index } => {
                f(x);
                f(index);
            }
            CodeKind::Assign { lhs, rhs, .. } => lhs.iter().chain(rhs).for_each(f),
            CodeKind::If {
                init,
                cond,
                body,
                alt,
            } => {
                f(cond);
                init.iter().chain(alt).chain(body).for_each(f);
            }
            CodeKind::Then { target, stmts } | CodeKind::WithBody { target, stmts } => {
                f(target);
                stmts.iter().for_each(f);
            }
            CodeKind::Else { target, alt } => {
                f(target);
                f(alt);
            }
            CodeKind::Return(codes) | CodeKind::Block(codes) => codes.iter().for_each(f),
            CodeKind::WithField { target, parts, .. } => {
                f(target);
                parts.iter().flatten().for_each(f);
            }
            CodeKind::File { decls, .. } => decls.iter().for_each(f),
            CodeKind::WithStash { target, .. } => f(target),
        }
    }
}

/// A deferred syntax tree node.
#[derive(Clone)]
pub struct Code(Arc<CodeKind>);

impl fmt::Debug for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.0 {
            CodeKind::Ident(name) => write!(f, "Code(ident {name:?})"),
            CodeKind::IdentPrefix { prefix, picked } => {
                write!(f, "Code(ident_prefix {prefix:?} -> {:?})", picked.get())
            }
            CodeKind::Lit(lit) => write!(f, "Code({lit:?})"),
            kind => write!(f, "Code({})", kind.label()),
        }
    }
}

// =============================================================================
// Constructors
// =============================================================================

/// An identifier used verbatim.
pub fn ident(name: impl Into<String>) -> Code {
    Code::new(CodeKind::Ident(name.into()))
}

/// A fresh identifier starting with `prefix`.
///
/// The first resolution picks the name from the scope; every later
/// resolution of this value (or its clones) reuses it.
pub fn ident_prefix(prefix: impl Into<String>) -> Code {
    Code::new(CodeKind::IdentPrefix {
        prefix: prefix.into(),
        picked: OnceLock::new(),
    })
}

/// A basic literal. Negative numbers become a unary minus applied to the
/// magnitude, which is how Go source spells them.
pub fn literal(value: impl Into<Lit>) -> Code {
    Code::new(CodeKind::Lit(value.into()))
}

pub fn int(v: i64) -> Code {
    literal(v)
}

pub fn float(v: f64) -> Code {
    literal(v)
}

pub fn rune(c: char) -> Code {
    literal(c)
}

pub fn string(s: impl Into<String>) -> Code {
    literal(Lit::Str(s.into()))
}

pub fn nil() -> Code {
    ident("nil")
}

/// The package identifier for `path`.
///
/// Inside [`file`] the path is added to the file's import declaration. A
/// package name already taken by another import gets a numbered alias.
pub fn import(path: impl Into<String>) -> Code {
    Code::new(CodeKind::Import(path.into()))
}

/// `lhs op rhs` for a single target; `":="` declares.
pub fn assign(op: &str, lhs: &Code, rhs: &Code) -> Code {
    assign_many(op, std::slice::from_ref(lhs), std::slice::from_ref(rhs))
}

/// `a, b op c, d`.
pub fn assign_many(op: &str, lhs: &[Code], rhs: &[Code]) -> Code {
    Code::new(CodeKind::Assign {
        lhs: lhs.to_vec(),
        sym: op.to_owned(),
        rhs: rhs.to_vec(),
    })
}

pub fn define(lhs: &Code, rhs: &Code) -> Code {
    assign(":=", lhs, rhs)
}

pub fn inc(x: &Code) -> Code {
    x.inc()
}

pub fn dec(x: &Code) -> Code {
    x.dec()
}

/// `if cond {}`; attach the body with [`Code::then`].
pub fn if_stmt(cond: &Code) -> Code {
    Code::new(CodeKind::If {
        init: None,
        cond: cond.clone(),
        body: Vec::new(),
        alt: None,
    })
}

/// `if init; cond {}`. The initializer, condition and branches resolve in
/// the conditional's own scope.
pub fn if_init(init: &Code, cond: &Code) -> Code {
    Code::new(CodeKind::If {
        init: Some(init.clone()),
        cond: cond.clone(),
        body: Vec::new(),
        alt: None,
    })
}

/// `func name() {}`.
pub fn func(name: impl Into<String>) -> Code {
    Code::new(CodeKind::Func(name.into()))
}

pub fn file(package: impl Into<String>, decls: &[Code]) -> Code {
    Code::new(CodeKind::File {
        package: package.into(),
        decls: decls.to_vec(),
    })
}

pub fn ret(values: &[Code]) -> Code {
    Code::new(CodeKind::Return(values.to_vec()))
}

pub fn block(stmts: &[Code]) -> Code {
    Code::new(CodeKind::Block(stmts.to_vec()))
}

/// Defers the choice of node to resolution time, when the scope is known.
pub fn scoped<F>(f: F) -> Code
where
    F: Fn(&Scope<'_>) -> Code + Send + Sync + 'static,
{
    Code::new(CodeKind::Scoped(Arc::new(f)))
}

// =============================================================================
// Combinators
// =============================================================================

impl Code {
    fn new(kind: CodeKind) -> Self {
        Code(Arc::new(kind))
    }

    /// Binary `self sym other`, or prefix `sym self` when `other` is `None`.
    ///
    /// Unknown symbols are kept as an illegal operator and rejected by the
    /// printer.
    pub fn op(&self, sym: &str, other: Option<&Code>) -> Code {
        Code::new(CodeKind::Op {
            x: self.clone(),
            sym: sym.to_owned(),
            y: other.cloned(),
        })
    }

    pub fn paren(&self) -> Code {
        Code::new(CodeKind::Paren(self.clone()))
    }

    pub fn call(&self, args: &[Code]) -> Code {
        Code::new(CodeKind::Call {
            fun: self.clone(),
            args: args.to_vec(),
        })
    }

    /// Selector `self.sel`.
    pub fn dot(&self, sel: impl Into<String>) -> Code {
        Code::new(CodeKind::Dot {
            x: self.clone(),
            sel: sel.into(),
        })
    }

    /// `*self`: an indirection, or a pointer type where a type is expected.
    pub fn star(&self) -> Code {
        Code::new(CodeKind::Star(self.clone()))
    }

    pub fn index(&self, index: &Code) -> Code {
        Code::new(CodeKind::Index {
            x: self.clone(),
            index: index.clone(),
        })
    }

    pub fn assign(&self, op: &str, rhs: &Code) -> Code {
        assign(op, self, rhs)
    }

    pub fn inc(&self) -> Code {
        Code::new(CodeKind::IncDec {
            x: self.clone(),
            op: IncDecOp::Inc,
        })
    }

    pub fn dec(&self) -> Code {
        Code::new(CodeKind::IncDec {
            x: self.clone(),
            op: IncDecOp::Dec,
        })
    }

    /// Sets the body of a conditional. Expressions become expression
    /// statements.
    pub fn then(&self, stmts: &[Code]) -> Code {
        match &*self.0 {
            CodeKind::If {
                init, cond, alt, ..
            } => Code::new(CodeKind::If {
                init: init.clone(),
                cond: cond.clone(),
                body: stmts.to_vec(),
                alt: alt.clone(),
            }),
            _ => Code::new(CodeKind::Then {
                target: self.clone(),
                stmts: stmts.to_vec(),
            }),
        }
    }

    /// Sets the else branch of a conditional: another conditional or a
    /// [`block`].
    pub fn else_(&self, alt: &Code) -> Code {
        match &*self.0 {
            CodeKind::If {
                init, cond, body, ..
            } => Code::new(CodeKind::If {
                init: init.clone(),
                cond: cond.clone(),
                body: body.clone(),
                alt: Some(alt.clone()),
            }),
            _ => Code::new(CodeKind::Else {
                target: self.clone(),
                alt: alt.clone(),
            }),
        }
    }

    /// Appends a receiver field. See [`Code::with_param`] for `parts`.
    pub fn with_receiver(&self, parts: &[Option<Code>]) -> Code {
        self.with_field(FieldSlot::Receiver, parts)
    }

    /// Appends a parameter field.
    ///
    /// `parts` is read from the end: the last entry is the optional tag,
    /// the one before it the type, and everything earlier the names.
    /// `None` entries are skipped.
    pub fn with_param(&self, parts: &[Option<Code>]) -> Code {
        self.with_field(FieldSlot::Param, parts)
    }

    /// Appends a result field, with the same layout as `with_param`.
    pub fn with_result(&self, parts: &[Option<Code>]) -> Code {
        self.with_field(FieldSlot::Result, parts)
    }

    fn with_field(&self, slot: FieldSlot, parts: &[Option<Code>]) -> Code {
        Code::new(CodeKind::WithField {
            target: self.clone(),
            slot,
            parts: parts.to_vec(),
        })
    }

    /// Replaces the body of a function.
    pub fn with_body(&self, stmts: &[Code]) -> Code {
        Code::new(CodeKind::WithBody {
            target: self.clone(),
            stmts: stmts.to_vec(),
        })
    }

    /// Resolves `self` in a child scope whose stash holds `value` under `K`.
    pub fn with_stash<K>(&self, value: K::Value) -> Code
    where
        K: StashKey,
        K::Value: Clone + Send + Sync,
    {
        Code::new(CodeKind::WithStash {
            target: self.clone(),
            install: Arc::new(move |s: &mut Scope<'_>| {
                s.insert_stash::<K>(value.clone());
            }),
        })
    }
}

// =============================================================================
// Resolution
// =============================================================================

/// Import paths collected by the enclosing [`file`].
struct Imports;

impl StashKey for Imports {
    type Value = RefCell<ImportSet>;
}

#[derive(Debug, Default)]
struct ImportSet {
    entries: Vec<ImportEntry>,
    /// Fresh names picked anywhere in the file; packages must not take them.
    fresh: HashSet<String>,
}

#[derive(Debug)]
struct ImportEntry {
    path: String,
    name: String,
    aliased: bool,
}

/// Whether `name` already names a package imported by the enclosing file.
fn imported(scope: &Scope<'_>, name: &str) -> bool {
    scope
        .lookup_stash::<Imports>()
        .is_some_and(|set| set.borrow().has_name(name))
}

fn package_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

impl ImportSet {
    fn add(&mut self, path: &str, taken: impl Fn(&str) -> bool) -> String {
        if let Some(e) = self.entries.iter().find(|e| e.path == path) {
            return e.name.clone();
        }

        let base = package_name(path);
        let mut name = base.to_owned();
        let mut idx = 2u32;
        while self.has_name(&name) || self.fresh.contains(&name) || taken(&name) {
            name = format!("{base}{idx}");
            idx += 1;
        }
        self.entries.push(ImportEntry {
            path: path.to_owned(),
            name: name.clone(),
            aliased: name != base,
        });
        name
    }

    fn has_name(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    fn into_decl(mut self, a: &mut AstArena) -> Option<TopLevelDecl> {
        if self.entries.is_empty() {
            return None;
        }
        self.entries.sort_by(|l, r| l.path.cmp(&r.path));

        let specs: Vec<Spec> = self
            .entries
            .iter()
            .map(|e| {
                let name = e.aliased.then(|| ImportName::Name(a.intern(&e.name)));
                let raw = a.push_text(&quote_string(&e.path));
                Spec::Import(ImportSpec {
                    name,
                    path: StringLit { raw },
                })
            })
            .collect();
        let decl = GenDecl {
            kind: GenDeclKind::Import,
            grouped: specs.len() > 1,
            specs: a.list_specs(specs),
        };
        let id = a.decls.alloc(Decl::Gen(decl), Span::default());
        Some(TopLevelDecl::Decl(id))
    }
}

#[track_caller]
fn misuse(context: &str, wanted: &str, got: Node) -> ! {
    panic!("{context}: expected {wanted}, got {got:?}")
}

impl Code {
    /// Builds a fresh arena from a root scope.
    pub fn build(&self) -> (AstArena, Node) {
        let mut arena = AstArena::new();
        let node = self.resolve(&mut Scope::root(), &mut arena);
        (arena, node)
    }

    /// Builds and prints with the default printer configuration.
    pub fn render(&self) -> Result<String, PrintError> {
        let (arena, node) = self.build();
        print_node(&arena, node)
    }

    /// Allocates the described node in `a`, picking names from `scope`.
    ///
    /// Names that fresh identifiers in `self` memoized during earlier
    /// resolutions are reserved first, so new fresh names avoid them.
    ///
    /// # Panics
    /// Panics when a combinator was applied to a node of the wrong kind.
    pub fn resolve(&self, scope: &mut Scope<'_>, a: &mut AstArena) -> Node {
        self.reserve_memoized(scope);
        self.resolve_in(scope, a)
    }

    fn reserve_memoized(&self, scope: &mut Scope<'_>) {
        let mut seen = HashSet::new();
        let mut stack = vec![self];
        while let Some(code) = stack.pop() {
            if !seen.insert(Arc::as_ptr(&code.0)) {
                continue;
            }
            if let CodeKind::IdentPrefix { picked, .. } = &*code.0 {
                if let Some(name) = picked.get() {
                    scope.reserve(name.as_str());
                }
            }
            code.0.for_each_child(|c| stack.push(c));
        }
    }

    fn resolve_in(&self, scope: &mut Scope<'_>, a: &mut AstArena) -> Node {
        let sp = Span::default();
        match &*self.0 {
            CodeKind::Ident(name) => Node::Expr(a.ident_expr(name)),
            CodeKind::IdentPrefix { prefix, picked } => {
                let name = picked.get_or_init(|| loop {
                    let name = scope.pick_name(prefix);
                    if !imported(scope, &name) {
                        break name;
                    }
                });
                scope.reserve(name.as_str());
                if let Some(set) = scope.lookup_stash::<Imports>() {
                    set.borrow_mut().fresh.insert(name.clone());
                }
                Node::Expr(a.ident_expr(name))
            }
            CodeKind::Lit(lit) => Node::Expr(resolve_lit(lit, a)),
            CodeKind::Import(path) => {
                let view: &Scope<'_> = scope;
                let name = match view.lookup_stash::<Imports>() {
                    Some(set) => set.borrow_mut().add(path, |n| view.is_visible(n)),
                    None => package_name(path).to_owned(),
                };
                Node::Expr(a.ident_expr(&name))
            }

            CodeKind::Op { x, sym, y } => {
                let left = x.expr(scope, a);
                let expr = match y {
                    Some(y) => {
                        let right = y.expr(scope, a);
                        let op = BinaryOp::from_symbol(sym).unwrap_or(BinaryOp::Illegal);
                        Expr::Binary { left, op, right }
                    }
                    None => {
                        let op = UnaryOp::from_symbol(sym).unwrap_or(UnaryOp::Illegal);
                        Expr::Unary { op, expr: left }
                    }
                };
                Node::Expr(a.exprs.alloc(expr, sp))
            }
            CodeKind::Paren(x) => {
                let inner = x.expr(scope, a);
                Node::Expr(a.exprs.alloc(Expr::Paren(inner), sp))
            }
            CodeKind::Call { fun, args } => {
                let callee = CallCallee::Expr(fun.expr(scope, a));
                let args: Vec<_> = args
                    .iter()
                    .map(|arg| ExprOrType::Expr(arg.expr(scope, a)))
                    .collect();
                let args = a.list_expr_or_types(args);
                let call = Expr::Call {
                    callee,
                    args,
                    ellipsis: false,
                };
                Node::Expr(a.exprs.alloc(call, sp))
            }
            CodeKind::Dot { x, sel } => {
                let expr = x.expr(scope, a);
                let sel = a.intern(sel);
                Node::Expr(a.exprs.alloc(Expr::Selector { expr, sel }, sp))
            }
            CodeKind::Star(x) => match x.resolve_in(scope, a) {
                Node::Expr(expr) => {
                    let deref = Expr::Unary {
                        op: UnaryOp::Deref,
                        expr,
                    };
                    Node::Expr(a.exprs.alloc(deref, sp))
                }
                Node::Type(t) => Node::Type(a.types.alloc(Type::Pointer(t), sp)),
                other => misuse("star", "an expression or type", other),
            },
            CodeKind::Index { x, index } => {
                let base = x.expr(scope, a);
                let index = index.expr(scope, a);
                let args = a.list_expr_or_types([ExprOrType::Expr(index)]);
                Node::Expr(a.exprs.alloc(Expr::Index { base, args }, sp))
            }

            CodeKind::Assign { lhs, sym, rhs } => {
                let lhs: Vec<_> = lhs.iter().map(|c| c.expr(scope, a)).collect();
                let rhs: Vec<_> = rhs.iter().map(|c| c.expr(scope, a)).collect();
                let lhs = a.list_exprs(lhs);
                let rhs = a.list_exprs(rhs);
                let op = AssignOp::from_symbol(sym).unwrap_or(AssignOp::Illegal);
                let simple = a.simple_stmts.alloc(SimpleStmt::Assign { lhs, op, rhs }, sp);
                Node::Stmt(a.stmts.alloc(Stmt::Simple(simple), sp))
            }
            CodeKind::IncDec { x, op } => {
                let expr = x.expr(scope, a);
                let simple = a.simple_stmts.alloc(SimpleStmt::IncDec { expr, op: *op }, sp);
                Node::Stmt(a.stmts.alloc(Stmt::Simple(simple), sp))
            }
            CodeKind::If {
                init,
                cond,
                body,
                alt,
            } => {
                let mut inner = scope.new_child();
                let init = init.as_ref().map(|c| c.simple_stmt(&mut inner, a));
                let cond = cond.expr(&mut inner, a);
                let then_block = resolve_block(body, &mut inner, a);
                let else_stmt = alt.as_ref().map(|c| c.else_branch(&mut inner, a));
                let stmt = Stmt::If {
                    init,
                    cond,
                    then_block,
                    else_stmt,
                };
                Node::Stmt(a.stmts.alloc(stmt, sp))
            }
            CodeKind::Then { target, stmts } => {
                let id = target.if_stmt(scope, a, "then");
                let block = resolve_block(stmts, &mut scope.new_child(), a);
                if let Stmt::If { then_block, .. } = &mut a.stmts[id] {
                    *then_block = block;
                }
                Node::Stmt(id)
            }
            CodeKind::Else { target, alt } => {
                let id = target.if_stmt(scope, a, "else");
                let branch = alt.else_branch(&mut scope.new_child(), a);
                if let Stmt::If { else_stmt, .. } = &mut a.stmts[id] {
                    *else_stmt = Some(branch);
                }
                Node::Stmt(id)
            }
            CodeKind::Return(values) => {
                let values: Vec<_> = values.iter().map(|c| c.expr(scope, a)).collect();
                let values = a.list_exprs(values);
                Node::Stmt(a.stmts.alloc(Stmt::Return(values), sp))
            }
            CodeKind::Block(stmts) => {
                let mut inner = scope.new_child();
                let block = resolve_block(stmts, &mut inner, a);
                Node::Stmt(a.stmts.alloc(Stmt::Block(block), sp))
            }

            CodeKind::Func(name) => {
                let sym = a.intern(name);
                let signature = a.signatures.alloc(
                    Signature {
                        params: FieldList::default(),
                        results: FieldList::default(),
                    },
                    sp,
                );
                let id = a.funcs.alloc(
                    FuncDecl {
                        recv: None,
                        name: sym,
                        signature,
                        body: Some(Block::default()),
                    },
                    sp,
                );
                let node = Node::Decl(TopLevelDecl::Func(id));
                scope.declare(name.as_str(), node);
                node
            }
            CodeKind::WithField {
                target,
                slot,
                parts,
            } => {
                let id = target.func_decl(scope, a, "with_field");
                let field = resolve_field(parts, scope, a);
                match slot {
                    FieldSlot::Receiver => {
                        let fields = a.funcs[id].recv.unwrap_or_default().fields;
                        let fields = a.append_field(fields, field);
                        a.funcs[id].recv = Some(FieldList { fields });
                    }
                    FieldSlot::Param | FieldSlot::Result => {
                        let sig = a.funcs[id].signature;
                        let list = match slot {
                            FieldSlot::Param => a.signatures[sig].params,
                            _ => a.signatures[sig].results,
                        };
                        let fields = FieldList {
                            fields: a.append_field(list.fields, field),
                        };
                        match slot {
                            FieldSlot::Param => a.signatures[sig].params = fields,
                            _ => a.signatures[sig].results = fields,
                        }
                    }
                }
                Node::Decl(TopLevelDecl::Func(id))
            }
            CodeKind::WithBody { target, stmts } => {
                let id = target.func_decl(scope, a, "with_body");
                let mut inner = scope.new_child();
                let body = resolve_block(stmts, &mut inner, a);
                a.funcs[id].body = Some(body);
                Node::Decl(TopLevelDecl::Func(id))
            }
            CodeKind::File { package, decls } => {
                let mut inner = scope.new_child();
                inner.insert_stash::<Imports>(RefCell::default());
                let decls: Vec<_> = decls.iter().map(|d| d.top_decl(&mut inner, a)).collect();
                let imports = inner
                    .remove_stash::<Imports>()
                    .map(RefCell::into_inner)
                    .unwrap_or_default();

                let all: Vec<_> = imports.into_decl(a).into_iter().chain(decls).collect();
                let file = SourceFile {
                    package: a.intern(package),
                    decls: a.list_top_decls(all),
                };
                Node::File(file)
            }

            CodeKind::WithStash { target, install } => {
                let mut inner = scope.new_child();
                install(&mut inner);
                target.resolve_in(&mut inner, a)
            }
            CodeKind::Scoped(f) => f(scope).resolve(scope, a),
        }
    }

    fn expr(&self, scope: &mut Scope<'_>, a: &mut AstArena) -> ExprId {
        match self.resolve_in(scope, a) {
            Node::Expr(id) => id,
            other => misuse(self.0.label(), "an expression", other),
        }
    }

    fn typ(&self, scope: &mut Scope<'_>, a: &mut AstArena) -> TypeId {
        match self.resolve_in(scope, a) {
            Node::Type(id) => id,
            Node::Expr(id) => a
                .expr_to_type(id)
                .unwrap_or_else(|| misuse(self.0.label(), "a type", Node::Expr(id))),
            other => misuse(self.0.label(), "a type", other),
        }
    }

    /// Statement position: expressions are wrapped as expression statements.
    fn stmt(&self, scope: &mut Scope<'_>, a: &mut AstArena) -> StmtId {
        match self.resolve_in(scope, a) {
            Node::Stmt(id) => id,
            Node::Expr(e) => {
                let simple = a.simple_stmts.alloc(SimpleStmt::Expr(e), Span::default());
                a.stmts.alloc(Stmt::Simple(simple), Span::default())
            }
            other => misuse(self.0.label(), "a statement", other),
        }
    }

    fn simple_stmt(&self, scope: &mut Scope<'_>, a: &mut AstArena) -> SimpleStmtId {
        match self.resolve_in(scope, a) {
            Node::Expr(e) => a.simple_stmts.alloc(SimpleStmt::Expr(e), Span::default()),
            Node::Stmt(id) => match a.stmts[id] {
                Stmt::Simple(simple) => simple,
                _ => misuse("if header", "a simple statement", Node::Stmt(id)),
            },
            other => misuse("if header", "a simple statement", other),
        }
    }

    fn top_decl(&self, scope: &mut Scope<'_>, a: &mut AstArena) -> TopLevelDecl {
        match self.resolve_in(scope, a) {
            Node::Decl(d) => d,
            Node::Stmt(id) => match a.stmts[id] {
                Stmt::Decl(d) => TopLevelDecl::Decl(d),
                _ => misuse("file", "a declaration", Node::Stmt(id)),
            },
            other => misuse("file", "a declaration", other),
        }
    }

    fn ident_sym(&self, scope: &mut Scope<'_>, a: &mut AstArena) -> Ident {
        let id = self.expr(scope, a);
        match a.exprs[id] {
            Expr::Ident(sym) => sym,
            _ => misuse("field name", "an identifier", Node::Expr(id)),
        }
    }

    fn string_lit(&self, scope: &mut Scope<'_>, a: &mut AstArena) -> StringLit {
        let id = self.expr(scope, a);
        match a.exprs[id] {
            Expr::BasicLit(BasicLit {
                kind: BasicLitKind::String,
                raw,
            }) => StringLit { raw },
            _ => misuse("field tag", "a string literal", Node::Expr(id)),
        }
    }

    fn if_stmt(&self, scope: &mut Scope<'_>, a: &mut AstArena, context: &str) -> StmtId {
        match self.resolve_in(scope, a) {
            Node::Stmt(id) if matches!(a.stmts[id], Stmt::If { .. }) => id,
            other => misuse(context, "an if statement", other),
        }
    }

    fn else_branch(&self, scope: &mut Scope<'_>, a: &mut AstArena) -> StmtId {
        match self.resolve_in(scope, a) {
            Node::Stmt(id) if matches!(a.stmts[id], Stmt::If { .. } | Stmt::Block(_)) => id,
            other => misuse("else", "an if statement or a block", other),
        }
    }

    fn func_decl(&self, scope: &mut Scope<'_>, a: &mut AstArena, context: &str) -> FuncDeclId {
        match self.resolve_in(scope, a) {
            Node::Decl(TopLevelDecl::Func(id)) => id,
            other => misuse(context, "a function declaration", other),
        }
    }
}

fn resolve_block(stmts: &[Code], scope: &mut Scope<'_>, a: &mut AstArena) -> Block {
    let stmts: Vec<_> = stmts.iter().map(|c| c.stmt(scope, a)).collect();
    Block {
        stmts: a.list_stmts(stmts),
    }
}

fn resolve_field(parts: &[Option<Code>], scope: &mut Scope<'_>, a: &mut AstArena) -> FieldId {
    let [names @ .., typ, tag] = parts else {
        panic!("field: expected at least a type and a tag slot, got {parts:?}");
    };
    let Some(typ) = typ else {
        panic!("field: the type slot is empty in {parts:?}");
    };

    let names: Vec<_> = names.iter().flatten().map(|n| n.ident_sym(scope, a)).collect();
    let typ = typ.typ(scope, a);
    let tag = tag.as_ref().map(|t| t.string_lit(scope, a));
    let field = Field {
        names: a.list_idents(names),
        variadic: false,
        typ,
        tag,
    };
    a.fields.alloc(field, Span::default())
}

fn resolve_lit(lit: &Lit, a: &mut AstArena) -> ExprId {
    let (kind, text, negative) = match lit {
        Lit::Int(v) => (BasicLitKind::Int, v.unsigned_abs().to_string(), *v < 0),
        Lit::Float(v) => {
            assert!(v.is_finite(), "literal: {v} has no Go spelling");
            (
                BasicLitKind::Float,
                format!("{:?}", v.abs()),
                v.is_sign_negative(),
            )
        }
        Lit::Char(c) => (BasicLitKind::Rune, quote_rune(*c), false),
        Lit::Str(s) => (BasicLitKind::String, quote_string(s), false),
    };

    let raw = a.push_text(&text);
    let id = a.exprs.alloc(Expr::BasicLit(BasicLit { kind, raw }), Span::default());
    if !negative {
        return id;
    }
    let neg = Expr::Unary {
        op: UnaryOp::Sub,
        expr: id,
    };
    a.exprs.alloc(neg, Span::default())
}
