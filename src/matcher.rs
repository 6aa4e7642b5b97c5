//! Structural equality between two syntax trees.
//!
//! The trees may live in different arenas. Identifiers compare by name,
//! literals by their source text, and positions are ignored. Anything the
//! matcher cannot vouch for (kind mismatches, `Bad` nodes) does not match.

use std::cell::Cell;

use gogen_syntax::ast::*;
use gogen_syntax::walk::ListSlice;

/// Structural equality for one node kind.
///
/// `self` lives in the matcher's left arena and `other` in its right one.
pub trait Matches {
    fn matches(&self, m: &Matcher<'_>, other: &Self) -> bool;
}

pub struct Matcher<'a> {
    left: &'a AstArena,
    right: &'a AstArena,
    reported: Cell<bool>,
}

/// Whether `l` in `left` and `r` in `right` are structurally identical.
pub fn matches(left: &AstArena, l: Node, right: &AstArena, r: Node) -> bool {
    Matcher::new(left, right).node(l, r)
}

impl<'a> Matcher<'a> {
    pub fn new(left: &'a AstArena, right: &'a AstArena) -> Self {
        Self {
            left,
            right,
            reported: Cell::new(false),
        }
    }

    #[inline]
    fn same_arena(&self) -> bool {
        std::ptr::eq(self.left, self.right)
    }

    pub fn node(&self, l: Node, r: Node) -> bool {
        let ok = match (l, r) {
            (Node::Expr(l), Node::Expr(r)) => l.matches(self, &r),
            (Node::Type(l), Node::Type(r)) => l.matches(self, &r),
            (Node::Stmt(l), Node::Stmt(r)) => l.matches(self, &r),
            (Node::Decl(l), Node::Decl(r)) => l.matches(self, &r),
            (Node::File(l), Node::File(r)) => l.matches(self, &r),
            (Node::Expr(_), _)
            | (Node::Type(_), _)
            | (Node::Stmt(_), _)
            | (Node::Decl(_), _)
            | (Node::File(_), _) => false,
        };
        if !ok {
            self.diverged("node", Span::default(), Span::default());
        }
        ok
    }

    /// Logs the first divergence only; it is the deepest one, since
    /// failures propagate upwards from there.
    fn diverged(&self, what: &'static str, l: Span, r: Span) {
        if self.reported.replace(true) {
            return;
        }
        tracing::debug!(
            what,
            left = ?(l.start..l.end),
            right = ?(r.start..r.end),
            "trees diverge"
        );
    }

    fn list<T>(&self, l: ListRef<T>, r: ListRef<T>) -> bool
    where
        T: Matches,
        AstArena: ListSlice<T>,
    {
        let ls = ListSlice::slice(self.left, l);
        let rs = ListSlice::slice(self.right, r);
        if ls.len() != rs.len() {
            self.diverged("list length", Span::default(), Span::default());
            return false;
        }
        ls.iter().zip(rs).all(|(a, b)| a.matches(self, b))
    }
}

// =============================================================================
// Leaves
// =============================================================================

impl Matches for Symbol {
    fn matches(&self, m: &Matcher<'_>, other: &Self) -> bool {
        if m.same_arena() && self == other {
            return true;
        }
        m.left.name(*self) == m.right.name(*other)
    }
}

impl Matches for BasicLit {
    fn matches(&self, m: &Matcher<'_>, other: &Self) -> bool {
        self.kind == other.kind && m.left.text(self.raw) == m.right.text(other.raw)
    }
}

impl Matches for StringLit {
    fn matches(&self, m: &Matcher<'_>, other: &Self) -> bool {
        m.left.text(self.raw) == m.right.text(other.raw)
    }
}

impl<T: Matches> Matches for Option<T> {
    fn matches(&self, m: &Matcher<'_>, other: &Self) -> bool {
        match (self, other) {
            (Some(l), Some(r)) => l.matches(m, r),
            (None, None) => true,
            (Some(_), None) | (None, Some(_)) => false,
        }
    }
}

impl<T> Matches for ListRef<T>
where
    T: Matches,
    AstArena: ListSlice<T>,
{
    fn matches(&self, m: &Matcher<'_>, other: &Self) -> bool {
        m.list(*self, *other)
    }
}

/// Ids resolve in their own arena, then compare the nodes they name.
macro_rules! impl_matches_for_ids {
    ($($id:ty => $arena:ident),* $(,)?) => {
        $(
            impl Matches for $id {
                fn matches(&self, m: &Matcher<'_>, other: &Self) -> bool {
                    if m.same_arena() && self == other {
                        return true;
                    }
                    let ok = m.left.$arena[*self].matches(m, &m.right.$arena[*other]);
                    if !ok {
                        m.diverged(
                            stringify!($arena),
                            m.left.$arena.span(*self),
                            m.right.$arena.span(*other),
                        );
                    }
                    ok
                }
            }
        )*
    };
}

impl_matches_for_ids! {
    DeclId => decls,
    FuncDeclId => funcs,
    StmtId => stmts,
    SimpleStmtId => simple_stmts,
    ExprId => exprs,
    TypeId => types,
    FieldId => fields,
    SignatureId => signatures,
    SwitchClauseId => switch_clauses,
    CommClauseId => comm_clauses,
}

// =============================================================================
// Files and declarations
// =============================================================================

impl Matches for SourceFile {
    fn matches(&self, m: &Matcher<'_>, other: &Self) -> bool {
        self.package.matches(m, &other.package) && self.decls.matches(m, &other.decls)
    }
}

impl Matches for TopLevelDecl {
    fn matches(&self, m: &Matcher<'_>, other: &Self) -> bool {
        match (self, other) {
            (TopLevelDecl::Decl(l), TopLevelDecl::Decl(r)) => l.matches(m, r),
            (TopLevelDecl::Func(l), TopLevelDecl::Func(r)) => l.matches(m, r),
            (TopLevelDecl::Decl(_), _) | (TopLevelDecl::Func(_), _) => false,
        }
    }
}

impl Matches for Decl {
    fn matches(&self, m: &Matcher<'_>, other: &Self) -> bool {
        match (self, other) {
            (Decl::Gen(l), Decl::Gen(r)) => {
                // Parentheses around a single spec do not change meaning.
                l.kind == r.kind && l.specs.matches(m, &r.specs)
            }
            (Decl::Bad, _) | (_, Decl::Bad) => false,
        }
    }
}

impl Matches for Spec {
    fn matches(&self, m: &Matcher<'_>, other: &Self) -> bool {
        match (self, other) {
            (Spec::Import(l), Spec::Import(r)) => {
                l.name.matches(m, &r.name) && l.path.matches(m, &r.path)
            }
            (Spec::Value(l), Spec::Value(r)) => {
                l.names.matches(m, &r.names)
                    && l.typ.matches(m, &r.typ)
                    && l.values.matches(m, &r.values)
            }
            (Spec::Type(l), Spec::Type(r)) => {
                l.alias == r.alias && l.name.matches(m, &r.name) && l.typ.matches(m, &r.typ)
            }
            (Spec::Import(_), _) | (Spec::Value(_), _) | (Spec::Type(_), _) => false,
        }
    }
}

impl Matches for ImportName {
    fn matches(&self, m: &Matcher<'_>, other: &Self) -> bool {
        match (self, other) {
            (ImportName::Dot, ImportName::Dot) | (ImportName::Blank, ImportName::Blank) => true,
            (ImportName::Name(l), ImportName::Name(r)) => l.matches(m, r),
            (ImportName::Dot, _) | (ImportName::Blank, _) | (ImportName::Name(_), _) => false,
        }
    }
}

impl Matches for FuncDecl {
    fn matches(&self, m: &Matcher<'_>, other: &Self) -> bool {
        self.recv.matches(m, &other.recv)
            && self.name.matches(m, &other.name)
            && self.signature.matches(m, &other.signature)
            && self.body.matches(m, &other.body)
    }
}

impl Matches for Signature {
    fn matches(&self, m: &Matcher<'_>, other: &Self) -> bool {
        self.params.matches(m, &other.params) && self.results.matches(m, &other.results)
    }
}

impl Matches for FieldList {
    fn matches(&self, m: &Matcher<'_>, other: &Self) -> bool {
        self.fields.matches(m, &other.fields)
    }
}

impl Matches for Field {
    fn matches(&self, m: &Matcher<'_>, other: &Self) -> bool {
        self.variadic == other.variadic
            && self.names.matches(m, &other.names)
            && self.typ.matches(m, &other.typ)
            && self.tag.matches(m, &other.tag)
    }
}

// =============================================================================
// Statements
// =============================================================================

impl Matches for Block {
    fn matches(&self, m: &Matcher<'_>, other: &Self) -> bool {
        self.stmts.matches(m, &other.stmts)
    }
}

impl Matches for SimpleStmt {
    fn matches(&self, m: &Matcher<'_>, other: &Self) -> bool {
        use SimpleStmt::*;
        match (self, other) {
            (Empty, Empty) => true,
            (Expr(l), Expr(r)) => l.matches(m, r),
            (Send { chan: lc, value: lv }, Send { chan: rc, value: rv }) => {
                lc.matches(m, rc) && lv.matches(m, rv)
            }
            (IncDec { expr: le, op: lo }, IncDec { expr: re, op: ro }) => {
                lo == ro && le.matches(m, re)
            }
            (
                Assign {
                    lhs: ll,
                    op: lo,
                    rhs: lr,
                },
                Assign {
                    lhs: rl,
                    op: ro,
                    rhs: rr,
                },
            ) => lo == ro && ll.matches(m, rl) && lr.matches(m, rr),
            (Empty, _)
            | (Expr(_), _)
            | (Send { .. }, _)
            | (IncDec { .. }, _)
            | (Assign { .. }, _) => false,
        }
    }
}

impl Matches for Stmt {
    fn matches(&self, m: &Matcher<'_>, other: &Self) -> bool {
        use Stmt::*;
        match (self, other) {
            (Simple(l), Simple(r)) => l.matches(m, r),
            (Decl(l), Decl(r)) => l.matches(m, r),
            (
                Labeled {
                    label: ll,
                    stmt: ls,
                },
                Labeled {
                    label: rl,
                    stmt: rs,
                },
            ) => ll.matches(m, rl) && ls.matches(m, rs),
            (Go(l), Go(r)) | (Defer(l), Defer(r)) => l.matches(m, r),
            (Return(l), Return(r)) => l.matches(m, r),
            (
                Branch {
                    kind: lk,
                    label: ll,
                },
                Branch {
                    kind: rk,
                    label: rl,
                },
            ) => lk == rk && ll.matches(m, rl),
            (Block(l), Block(r)) => l.matches(m, r),
            (
                If {
                    init: li,
                    cond: lc,
                    then_block: lt,
                    else_stmt: le,
                },
                If {
                    init: ri,
                    cond: rc,
                    then_block: rt,
                    else_stmt: re,
                },
            ) => li.matches(m, ri) && lc.matches(m, rc) && lt.matches(m, rt) && le.matches(m, re),
            (
                For {
                    kind: lk,
                    block: lb,
                },
                For {
                    kind: rk,
                    block: rb,
                },
            ) => lk.matches(m, rk) && lb.matches(m, rb),
            (
                Switch {
                    init: li,
                    tag: lt,
                    clauses: lc,
                },
                Switch {
                    init: ri,
                    tag: rt,
                    clauses: rc,
                },
            ) => li.matches(m, ri) && lt.matches(m, rt) && lc.matches(m, rc),
            (
                TypeSwitch {
                    init: li,
                    guard: lg,
                    clauses: lc,
                },
                TypeSwitch {
                    init: ri,
                    guard: rg,
                    clauses: rc,
                },
            ) => li.matches(m, ri) && lg.matches(m, rg) && lc.matches(m, rc),
            (Select { clauses: l }, Select { clauses: r }) => l.matches(m, r),
            (Simple(_), _)
            | (Decl(_), _)
            | (Labeled { .. }, _)
            | (Go(_), _)
            | (Defer(_), _)
            | (Return(_), _)
            | (Branch { .. }, _)
            | (Block(_), _)
            | (If { .. }, _)
            | (For { .. }, _)
            | (Switch { .. }, _)
            | (TypeSwitch { .. }, _)
            | (Select { .. }, _)
            | (Bad, _) => false,
        }
    }
}

impl Matches for ForKind {
    fn matches(&self, m: &Matcher<'_>, other: &Self) -> bool {
        use ForKind::*;
        match (self, other) {
            (Infinite, Infinite) => true,
            (Cond(l), Cond(r)) => l.matches(m, r),
            (
                ForClause {
                    init: li,
                    cond: lc,
                    post: lp,
                },
                ForClause {
                    init: ri,
                    cond: rc,
                    post: rp,
                },
            ) => li.matches(m, ri) && lc.matches(m, rc) && lp.matches(m, rp),
            (Range { lhs: ll, expr: le }, Range { lhs: rl, expr: re }) => {
                ll.matches(m, rl) && le.matches(m, re)
            }
            (Infinite, _) | (Cond(_), _) | (ForClause { .. }, _) | (Range { .. }, _) => false,
        }
    }
}

impl Matches for RangeLhs {
    fn matches(&self, m: &Matcher<'_>, other: &Self) -> bool {
        self.define == other.define && self.exprs.matches(m, &other.exprs)
    }
}

impl Matches for SwitchClause {
    fn matches(&self, m: &Matcher<'_>, other: &Self) -> bool {
        use SwitchClause::*;
        match (self, other) {
            (
                ExprCase {
                    items: li,
                    stmts: ls,
                },
                ExprCase {
                    items: ri,
                    stmts: rs,
                },
            ) => li.matches(m, ri) && ls.matches(m, rs),
            (
                TypeCase {
                    items: li,
                    stmts: ls,
                },
                TypeCase {
                    items: ri,
                    stmts: rs,
                },
            ) => li.matches(m, ri) && ls.matches(m, rs),
            (ExprCase { .. }, _) | (TypeCase { .. }, _) => false,
        }
    }
}

impl Matches for CommClause {
    fn matches(&self, m: &Matcher<'_>, other: &Self) -> bool {
        self.comm.matches(m, &other.comm) && self.stmts.matches(m, &other.stmts)
    }
}

impl Matches for TypeSwitchGuard {
    fn matches(&self, m: &Matcher<'_>, other: &Self) -> bool {
        self.bind.matches(m, &other.bind) && self.x.matches(m, &other.x)
    }
}

impl Matches for TypeCaseElem {
    fn matches(&self, m: &Matcher<'_>, other: &Self) -> bool {
        match (self, other) {
            (TypeCaseElem::Type(l), TypeCaseElem::Type(r)) => l.matches(m, r),
            (TypeCaseElem::Nil, TypeCaseElem::Nil) => true,
            (TypeCaseElem::Type(_), _) | (TypeCaseElem::Nil, _) => false,
        }
    }
}

// =============================================================================
// Expressions
// =============================================================================

impl Matches for KeyedElement {
    fn matches(&self, m: &Matcher<'_>, other: &Self) -> bool {
        self.key.matches(m, &other.key) && self.value.matches(m, &other.value)
    }
}

impl Matches for Element {
    fn matches(&self, m: &Matcher<'_>, other: &Self) -> bool {
        match (self, other) {
            (Element::Expr(l), Element::Expr(r)) => l.matches(m, r),
            (Element::Literal(l), Element::Literal(r)) => l.matches(m, r),
            (Element::Expr(_), _) | (Element::Literal(_), _) => false,
        }
    }
}

impl Matches for ExprOrType {
    fn matches(&self, m: &Matcher<'_>, other: &Self) -> bool {
        match (self, other) {
            (ExprOrType::Expr(l), ExprOrType::Expr(r)) => l.matches(m, r),
            (ExprOrType::Type(l), ExprOrType::Type(r)) => l.matches(m, r),
            (ExprOrType::Expr(_), _) | (ExprOrType::Type(_), _) => false,
        }
    }
}

impl Matches for CallCallee {
    fn matches(&self, m: &Matcher<'_>, other: &Self) -> bool {
        match (self, other) {
            (CallCallee::Expr(l), CallCallee::Expr(r)) => l.matches(m, r),
            (CallCallee::Type(l), CallCallee::Type(r)) => l.matches(m, r),
            (CallCallee::Expr(_), _) | (CallCallee::Type(_), _) => false,
        }
    }
}

impl Matches for Expr {
    fn matches(&self, m: &Matcher<'_>, other: &Self) -> bool {
        use Expr::*;
        match (self, other) {
            (Ident(l), Ident(r)) => l.matches(m, r),
            (BasicLit(l), BasicLit(r)) => l.matches(m, r),
            (FuncLit { sig: ls, body: lb }, FuncLit { sig: rs, body: rb }) => {
                ls.matches(m, rs) && lb.matches(m, rb)
            }
            (CompositeLit { typ: lt, elts: le }, CompositeLit { typ: rt, elts: re }) => {
                lt.matches(m, rt) && le.matches(m, re)
            }
            (Index { base: lb, args: la }, Index { base: rb, args: ra }) => {
                lb.matches(m, rb) && la.matches(m, ra)
            }
            (Paren(l), Paren(r)) => l.matches(m, r),
            (Selector { expr: le, sel: ls }, Selector { expr: re, sel: rs }) => {
                le.matches(m, re) && ls.matches(m, rs)
            }
            (
                Slice {
                    expr: le,
                    lo: ll,
                    hi: lh,
                    max: lm,
                },
                Slice {
                    expr: re,
                    lo: rl,
                    hi: rh,
                    max: rm,
                },
            ) => le.matches(m, re) && ll.matches(m, rl) && lh.matches(m, rh) && lm.matches(m, rm),
            (TypeAssert { expr: le, typ: lt }, TypeAssert { expr: re, typ: rt }) => {
                le.matches(m, re) && lt.matches(m, rt)
            }
            (
                Call {
                    callee: lc,
                    args: la,
                    ellipsis: ld,
                },
                Call {
                    callee: rc,
                    args: ra,
                    ellipsis: rd,
                },
            ) => ld == rd && lc.matches(m, rc) && la.matches(m, ra),
            (Unary { op: lo, expr: le }, Unary { op: ro, expr: re }) => {
                lo == ro && le.matches(m, re)
            }
            (
                Binary {
                    left: ll,
                    op: lo,
                    right: lr,
                },
                Binary {
                    left: rl,
                    op: ro,
                    right: rr,
                },
            ) => lo == ro && ll.matches(m, rl) && lr.matches(m, rr),
            (Ident(_), _)
            | (BasicLit(_), _)
            | (FuncLit { .. }, _)
            | (CompositeLit { .. }, _)
            | (Index { .. }, _)
            | (Paren(_), _)
            | (Selector { .. }, _)
            | (Slice { .. }, _)
            | (TypeAssert { .. }, _)
            | (Call { .. }, _)
            | (Unary { .. }, _)
            | (Binary { .. }, _)
            | (Bad, _) => false,
        }
    }
}

// =============================================================================
// Types
// =============================================================================

impl Matches for Type {
    fn matches(&self, m: &Matcher<'_>, other: &Self) -> bool {
        use Type::*;
        match (self, other) {
            (Named { pkg: lp, name: ln }, Named { pkg: rp, name: rn }) => {
                lp.matches(m, rp) && ln.matches(m, rn)
            }
            (Pointer(l), Pointer(r)) | (Slice(l), Slice(r)) | (Paren(l), Paren(r)) => {
                l.matches(m, r)
            }
            (Array { len: ll, elem: le }, Array { len: rl, elem: re }) => {
                ll.matches(m, rl) && le.matches(m, re)
            }
            (Map { key: lk, val: lv }, Map { key: rk, val: rv }) => {
                lk.matches(m, rk) && lv.matches(m, rv)
            }
            (Chan { dir: ld, elem: le }, Chan { dir: rd, elem: re }) => {
                ld == rd && le.matches(m, re)
            }
            (Struct { fields: l }, Struct { fields: r }) => l.matches(m, r),
            (Interface { elems: l }, Interface { elems: r }) => l.matches(m, r),
            (Func(l), Func(r)) => l.matches(m, r),
            (Named { .. }, _)
            | (Pointer(_), _)
            | (Array { .. }, _)
            | (Slice(_), _)
            | (Map { .. }, _)
            | (Chan { .. }, _)
            | (Struct { .. }, _)
            | (Interface { .. }, _)
            | (Func(_), _)
            | (Paren(_), _)
            | (Bad, _) => false,
        }
    }
}

impl Matches for ArrayLen {
    fn matches(&self, m: &Matcher<'_>, other: &Self) -> bool {
        match (self, other) {
            (ArrayLen::Expr(l), ArrayLen::Expr(r)) => l.matches(m, r),
            (ArrayLen::Ellipsis, ArrayLen::Ellipsis) => true,
            (ArrayLen::Expr(_), _) | (ArrayLen::Ellipsis, _) => false,
        }
    }
}

impl Matches for InterfaceElem {
    fn matches(&self, m: &Matcher<'_>, other: &Self) -> bool {
        match (self, other) {
            (
                InterfaceElem::Method { name: ln, sig: ls },
                InterfaceElem::Method { name: rn, sig: rs },
            ) => ln.matches(m, rn) && ls.matches(m, rs),
            (InterfaceElem::Embed(l), InterfaceElem::Embed(r)) => l.matches(m, r),
            (InterfaceElem::Method { .. }, _) | (InterfaceElem::Embed(_), _) => false,
        }
    }
}
