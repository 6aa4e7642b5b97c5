//! # Go Syntax Tree
//!
//! Arena-allocated syntax tree shared by the parser, the printer, the code
//! builder and the structural matcher.
//!
//! ## Architecture
//!
//! - **Nodes**: All nodes are allocated in typed arenas (`SpannedArena<T>`)
//! - **Lists**: Centralized buffers avoid per-node `Vec` allocations
//! - **Spans**: Location information stored separately in side tables
//! - **Symbols**: String interning for identifiers, owned by the arena
//! - **Text**: Literal nodes point into `AstArena::text`. For parsed trees
//!   the buffer is the source; built trees append literal text to it.
//!
//! ## Important Notes
//!
//! - This module models Go's **syntax only**. Generics and comments are not
//!   represented.
//! - Trees built programmatically carry `Span::default()` everywhere; only
//!   the parser records real positions.
//! - Walk/Visitor infrastructure lives in `walk.rs` (see `crate::walk`)

use ast_derive::WalkAst;
use core::marker::PhantomData;
use core::ops::{Index, IndexMut};
use smallvec::SmallVec;
use std::collections::HashMap;
use std::hash::{BuildHasher, BuildHasherDefault, Hasher, RandomState};

// =============================================================================
// Core Foundation Types
// =============================================================================

/// Represents a source code span with start and end positions.
///
/// Positions are stored as `u32` to save memory, limiting file size to 4GB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    /// Creates a new span from usize positions.
    ///
    /// # Panics
    /// In debug builds, panics if positions exceed `u32::MAX`.
    #[inline]
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= u32::MAX as usize);
        debug_assert!(end <= u32::MAX as usize);
        Self {
            start: start as u32,
            end: end as u32,
        }
    }

    /// Returns the length of the span.
    #[inline]
    pub const fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    /// Checks if the span is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Smallest span covering both `self` and `other`.
    #[inline]
    pub fn to(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

/// Type-safe identifier for arena-allocated nodes.
///
/// The phantom marker ensures type safety at compile time.
#[derive(Debug, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Id<T> {
    raw: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Copy for Id<T> {}

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Id<T> {
    /// Creates an ID from a raw u32 value.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self {
            raw,
            _marker: PhantomData,
        }
    }

    /// Converts the ID to usize for indexing.
    #[inline]
    pub const fn to_usize(&self) -> usize {
        self.raw as usize
    }

    /// Returns the raw u32 value.
    #[inline]
    pub const fn raw(&self) -> u32 {
        self.raw
    }
}

/// Typed reference into a centralized list buffer.
///
/// Lists are stored in `AstArena::extras`. Each `ListRef` points to a
/// contiguous slice in the appropriate buffer.
#[derive(Debug, PartialEq, Eq)]
pub struct ListRef<T> {
    start: u32,
    len: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Copy for ListRef<T> {}

impl<T> Clone for ListRef<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Default for ListRef<T> {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl<T> ListRef<T> {
    /// Empty list constant.
    pub const EMPTY: Self = Self {
        start: 0,
        len: 0,
        _marker: PhantomData,
    };

    /// Creates a new list reference.
    #[inline]
    pub const fn new(start: u32, len: u32) -> Self {
        Self {
            start,
            len,
            _marker: PhantomData,
        }
    }

    /// Checks if the list is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the start index.
    #[inline]
    pub const fn start(&self) -> u32 {
        self.start
    }

    /// Returns the length.
    #[inline]
    pub const fn len(&self) -> u32 {
        self.len
    }

    /// Returns the end index (exclusive).
    #[inline]
    pub const fn end(&self) -> u32 {
        self.start + self.len
    }
}

// =============================================================================
// Symbol Interning System
// =============================================================================

/// Interned string symbol.
///
/// Symbols are only meaningful relative to the interner that produced them;
/// comparing symbols from two different arenas requires resolving them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Symbol(u32);

/// Type alias for identifier symbols.
pub type Ident = Symbol;

impl Symbol {
    /// Creates a symbol from a raw u32 value.
    #[inline]
    pub const fn from_raw(v: u32) -> Self {
        Self(v)
    }

    /// Returns the raw u32 value.
    #[inline]
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

/// Identity hasher for u64 values (used for symbol hash buckets).
#[derive(Default)]
struct U64IdentityHasher(u64);

impl Hasher for U64IdentityHasher {
    fn write(&mut self, _b: &[u8]) {
        unreachable!("U64IdentityHasher only supports write_u64")
    }

    #[inline]
    fn write_u64(&mut self, i: u64) {
        self.0 = i;
    }

    #[inline]
    fn finish(&self) -> u64 {
        self.0
    }
}

type U64IdentityBuild = BuildHasherDefault<U64IdentityHasher>;

/// String interner for identifier storage.
///
/// Symbols are stored once and looked up via hash buckets.
#[derive(Debug, Default)]
pub struct Interner {
    strings: Vec<Box<str>>,
    buckets: HashMap<u64, SmallVec<[Symbol; 1]>, U64IdentityBuild>,
    state: RandomState,
}

impl Interner {
    /// Creates a new empty interner.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns a string and returns its symbol.
    ///
    /// If the string already exists, returns the existing symbol.
    pub fn intern(&mut self, s: &str) -> Symbol {
        let h = self.state.hash_one(s);
        let entry = self.buckets.entry(h).or_default();

        for &sym in entry.iter() {
            if self.strings[sym.0 as usize].as_ref() == s {
                return sym;
            }
        }

        let sym = Symbol(self.strings.len() as u32);
        self.strings.push(s.into());
        entry.push(sym);
        sym
    }

    /// Looks up an already interned string without inserting it.
    pub fn get(&self, s: &str) -> Option<Symbol> {
        let h = self.state.hash_one(s);
        self.buckets
            .get(&h)?
            .iter()
            .copied()
            .find(|sym| self.strings[sym.0 as usize].as_ref() == s)
    }

    /// Resolves a symbol back to its string.
    ///
    /// # Panics
    /// Panics if the symbol was not produced by this interner.
    #[inline]
    pub fn resolve(&self, sym: Symbol) -> &str {
        self.strings
            .get(sym.0 as usize)
            .expect("symbol from a different interner")
            .as_ref()
    }

    /// Number of distinct strings.
    #[inline]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

// =============================================================================
// Arena Allocation
// =============================================================================

/// Arena for nodes with associated spans.
///
/// Stores nodes and their spans in parallel vectors for cache efficiency.
#[derive(Debug)]
pub struct SpannedArena<T> {
    data: Vec<T>,
    spans: Vec<Span>,
}

impl<T> Default for SpannedArena<T> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            spans: Vec::new(),
        }
    }
}

impl<T> SpannedArena<T> {
    /// Creates a new empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a node with its span and returns an ID.
    #[inline]
    pub fn alloc(&mut self, node: T, span: Span) -> Id<T> {
        let id = Id::from_raw(self.data.len() as u32);
        self.data.push(node);
        self.spans.push(span);
        id
    }

    /// Gets an immutable reference to a node.
    #[inline]
    pub fn get(&self, id: Id<T>) -> &T {
        &self.data[id.to_usize()]
    }

    /// Gets a mutable reference to a node.
    #[inline]
    pub fn get_mut(&mut self, id: Id<T>) -> &mut T {
        &mut self.data[id.to_usize()]
    }

    /// Gets the span for a node.
    #[inline]
    pub fn span(&self, id: Id<T>) -> Span {
        self.spans[id.to_usize()]
    }

    /// Returns the number of nodes in the arena.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Checks if the arena is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl<T> Index<Id<T>> for SpannedArena<T> {
    type Output = T;
    fn index(&self, id: Id<T>) -> &T {
        self.get(id)
    }
}

impl<T> IndexMut<Id<T>> for SpannedArena<T> {
    fn index_mut(&mut self, id: Id<T>) -> &mut T {
        self.get_mut(id)
    }
}

// =============================================================================
// Type Aliases for Node IDs
// =============================================================================

pub type DeclId = Id<Decl>;
pub type StmtId = Id<Stmt>;
pub type SimpleStmtId = Id<SimpleStmt>;
pub type ExprId = Id<Expr>;
pub type TypeId = Id<Type>;
pub type FieldId = Id<Field>;
pub type SignatureId = Id<Signature>;
pub type FuncDeclId = Id<FuncDecl>;
pub type SwitchClauseId = Id<SwitchClause>;
pub type CommClauseId = Id<CommClause>;

// =============================================================================
// Centralized List Storage
// =============================================================================

/// Extra data storage for all list types.
#[derive(Debug, Default)]
pub struct ExtraData {
    pub idents: Vec<Ident>,
    pub exprs: Vec<ExprId>,
    pub stmts: Vec<StmtId>,
    pub fields: Vec<FieldId>,
    pub specs: Vec<Spec>,
    pub keyed_elems: Vec<KeyedElement>,
    pub top_decls: Vec<TopLevelDecl>,
    pub switch_clause_ids: Vec<SwitchClauseId>,
    pub comm_clause_ids: Vec<CommClauseId>,
    pub type_case_elems: Vec<TypeCaseElem>,
    pub interface_elems: Vec<InterfaceElem>,
    pub expr_or_types: Vec<ExprOrType>,
}

// =============================================================================
// Main AST Arena
// =============================================================================

/// Central arena holding all nodes, list buffers, identifiers and literal
/// text of one tree.
#[derive(Debug, Default)]
pub struct AstArena {
    pub decls: SpannedArena<Decl>,
    pub stmts: SpannedArena<Stmt>,
    pub simple_stmts: SpannedArena<SimpleStmt>,
    pub exprs: SpannedArena<Expr>,
    pub types: SpannedArena<Type>,
    pub signatures: SpannedArena<Signature>,
    pub funcs: SpannedArena<FuncDecl>,
    pub fields: SpannedArena<Field>,
    pub switch_clauses: SpannedArena<SwitchClause>,
    pub comm_clauses: SpannedArena<CommClause>,
    pub extras: ExtraData,
    pub interner: Interner,
    pub text: String,
}

impl AstArena {
    /// Creates a new empty AST arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an arena whose text buffer is `source`, so parser spans
    /// resolve against it.
    pub fn with_source(source: &str) -> Self {
        Self {
            text: source.to_owned(),
            ..Self::default()
        }
    }

    /// Helper to push items into a buffer and return a typed list reference.
    #[inline]
    fn push_list<T>(buf: &mut Vec<T>, items: impl IntoIterator<Item = T>) -> ListRef<T> {
        let start = buf.len();
        buf.extend(items);
        let len = buf.len() - start;
        debug_assert!(start <= u32::MAX as usize);
        debug_assert!(len <= u32::MAX as usize);
        ListRef::new(start as u32, len as u32)
    }

    /// Helper to get a slice from a buffer using a list reference.
    #[inline]
    fn slice<T>(buf: &[T], r: ListRef<T>) -> &[T] {
        let s = r.start() as usize;
        let e = r.end() as usize;
        &buf[s..e]
    }

    /// Copies `r` followed by `item` into a fresh list. Lists are never
    /// grown in place because another node may share the old range.
    #[inline]
    fn append_list<T: Copy>(buf: &mut Vec<T>, r: ListRef<T>, item: T) -> ListRef<T> {
        let start = buf.len();
        buf.extend_from_within(r.start() as usize..r.end() as usize);
        buf.push(item);
        ListRef::new(start as u32, (buf.len() - start) as u32)
    }

    // Identifiers and text

    #[inline]
    pub fn intern(&mut self, s: &str) -> Ident {
        self.interner.intern(s)
    }

    #[inline]
    pub fn name(&self, sym: Ident) -> &str {
        self.interner.resolve(sym)
    }

    /// Source text covered by `span`.
    #[inline]
    pub fn text(&self, span: Span) -> &str {
        &self.text[span.start as usize..span.end as usize]
    }

    /// Appends literal text and returns the span that covers it.
    pub fn push_text(&mut self, s: &str) -> Span {
        let start = self.text.len();
        self.text.push_str(s);
        Span::new(start, self.text.len())
    }

    // Node helpers

    /// Allocates an identifier expression with no source position.
    pub fn ident_expr(&mut self, name: &str) -> ExprId {
        let sym = self.intern(name);
        self.exprs.alloc(Expr::Ident(sym), Span::default())
    }

    /// Converts an expression that denotes a type into a type node.
    ///
    /// Accepts identifiers, qualified identifiers (`pkg.Name`), pointer
    /// indirections (`*T`) and parenthesized types. Returns `None` for any
    /// other expression.
    pub fn expr_to_type(&mut self, id: ExprId) -> Option<TypeId> {
        let span = self.exprs.span(id);
        let typ = match self.exprs[id] {
            Expr::Ident(name) => Type::Named { pkg: None, name },
            Expr::Selector { expr, sel } => match self.exprs[expr] {
                Expr::Ident(pkg) => Type::Named {
                    pkg: Some(pkg),
                    name: sel,
                },
                _ => return None,
            },
            Expr::Unary {
                op: UnaryOp::Deref,
                expr,
            } => Type::Pointer(self.expr_to_type(expr)?),
            Expr::Paren(inner) => Type::Paren(self.expr_to_type(inner)?),
            _ => return None,
        };
        Some(self.types.alloc(typ, span))
    }

    // List Builders

    pub fn list_idents(&mut self, i: impl IntoIterator<Item = Ident>) -> ListRef<Ident> {
        Self::push_list(&mut self.extras.idents, i)
    }

    pub fn list_exprs(&mut self, i: impl IntoIterator<Item = ExprId>) -> ListRef<ExprId> {
        Self::push_list(&mut self.extras.exprs, i)
    }

    pub fn list_stmts(&mut self, i: impl IntoIterator<Item = StmtId>) -> ListRef<StmtId> {
        Self::push_list(&mut self.extras.stmts, i)
    }

    pub fn list_fields(&mut self, i: impl IntoIterator<Item = FieldId>) -> ListRef<FieldId> {
        Self::push_list(&mut self.extras.fields, i)
    }

    pub fn list_keyed_elems(
        &mut self,
        i: impl IntoIterator<Item = KeyedElement>,
    ) -> ListRef<KeyedElement> {
        Self::push_list(&mut self.extras.keyed_elems, i)
    }

    pub fn list_specs(&mut self, i: impl IntoIterator<Item = Spec>) -> ListRef<Spec> {
        Self::push_list(&mut self.extras.specs, i)
    }

    pub fn list_top_decls(
        &mut self,
        i: impl IntoIterator<Item = TopLevelDecl>,
    ) -> ListRef<TopLevelDecl> {
        Self::push_list(&mut self.extras.top_decls, i)
    }

    pub fn list_switch_clause_ids(
        &mut self,
        i: impl IntoIterator<Item = SwitchClauseId>,
    ) -> ListRef<SwitchClauseId> {
        Self::push_list(&mut self.extras.switch_clause_ids, i)
    }

    pub fn list_comm_clause_ids(
        &mut self,
        i: impl IntoIterator<Item = CommClauseId>,
    ) -> ListRef<CommClauseId> {
        Self::push_list(&mut self.extras.comm_clause_ids, i)
    }

    pub fn list_type_cases(
        &mut self,
        i: impl IntoIterator<Item = TypeCaseElem>,
    ) -> ListRef<TypeCaseElem> {
        Self::push_list(&mut self.extras.type_case_elems, i)
    }

    pub fn list_interface_elems(
        &mut self,
        i: impl IntoIterator<Item = InterfaceElem>,
    ) -> ListRef<InterfaceElem> {
        Self::push_list(&mut self.extras.interface_elems, i)
    }

    pub fn list_expr_or_types(
        &mut self,
        i: impl IntoIterator<Item = ExprOrType>,
    ) -> ListRef<ExprOrType> {
        Self::push_list(&mut self.extras.expr_or_types, i)
    }

    // List Appenders

    pub fn append_field(&mut self, r: ListRef<FieldId>, item: FieldId) -> ListRef<FieldId> {
        Self::append_list(&mut self.extras.fields, r, item)
    }

    pub fn append_top_decl(
        &mut self,
        r: ListRef<TopLevelDecl>,
        item: TopLevelDecl,
    ) -> ListRef<TopLevelDecl> {
        Self::append_list(&mut self.extras.top_decls, r, item)
    }

    // List Accessors

    pub fn idents(&self, r: ListRef<Ident>) -> &[Ident] {
        Self::slice(&self.extras.idents, r)
    }

    pub fn exprs_list(&self, r: ListRef<ExprId>) -> &[ExprId] {
        Self::slice(&self.extras.exprs, r)
    }

    pub fn stmts_list(&self, r: ListRef<StmtId>) -> &[StmtId] {
        Self::slice(&self.extras.stmts, r)
    }

    pub fn fields_list(&self, r: ListRef<FieldId>) -> &[FieldId] {
        Self::slice(&self.extras.fields, r)
    }

    pub fn keyed_elems_list(&self, r: ListRef<KeyedElement>) -> &[KeyedElement] {
        Self::slice(&self.extras.keyed_elems, r)
    }

    pub fn specs_list(&self, r: ListRef<Spec>) -> &[Spec] {
        Self::slice(&self.extras.specs, r)
    }

    pub fn top_decls(&self, r: ListRef<TopLevelDecl>) -> &[TopLevelDecl] {
        Self::slice(&self.extras.top_decls, r)
    }

    pub fn switch_clause_ids(&self, r: ListRef<SwitchClauseId>) -> &[SwitchClauseId] {
        Self::slice(&self.extras.switch_clause_ids, r)
    }

    pub fn comm_clause_ids(&self, r: ListRef<CommClauseId>) -> &[CommClauseId] {
        Self::slice(&self.extras.comm_clause_ids, r)
    }

    pub fn type_case_elems(&self, r: ListRef<TypeCaseElem>) -> &[TypeCaseElem] {
        Self::slice(&self.extras.type_case_elems, r)
    }

    pub fn interface_elems(&self, r: ListRef<InterfaceElem>) -> &[InterfaceElem] {
        Self::slice(&self.extras.interface_elems, r)
    }

    pub fn expr_or_types(&self, r: ListRef<ExprOrType>) -> &[ExprOrType] {
        Self::slice(&self.extras.expr_or_types, r)
    }
}

// =============================================================================
// Node handle
// =============================================================================

/// Handle to any node of the closed set, relative to one `AstArena`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node {
    Expr(ExprId),
    Type(TypeId),
    Stmt(StmtId),
    Decl(TopLevelDecl),
    File(SourceFile),
}

/// The syntactic category a node belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Expression,
    Statement,
    Declaration,
    File,
}

impl Node {
    /// Type expressions count as expressions.
    pub const fn category(self) -> Category {
        match self {
            Node::Expr(_) | Node::Type(_) => Category::Expression,
            Node::Stmt(_) => Category::Statement,
            Node::Decl(_) => Category::Declaration,
            Node::File(_) => Category::File,
        }
    }
}

// =============================================================================
// Source File (Root Node)
// =============================================================================

/// Represents a complete Go source file.
///
/// ```text
/// SourceFile = PackageClause ";" { ImportDecl ";" } { TopLevelDecl ";" }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct SourceFile {
    /// Package name
    pub package: Ident,
    /// All top-level declarations in source order, imports included
    pub decls: ListRef<TopLevelDecl>,
}

// =============================================================================
// Declarations
// =============================================================================

/// Top-level declaration (can be a general declaration or function).
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub enum TopLevelDecl {
    Decl(DeclId),
    Func(FuncDeclId),
}

/// General declaration node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub enum Decl {
    Gen(GenDecl),
    Bad,
}

/// Generic declaration (import, const, type, var).
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct GenDecl {
    #[walk(skip)]
    pub kind: GenDeclKind,
    /// Written with parentheses: `var ( ... )`
    #[walk(skip)]
    pub grouped: bool,
    pub specs: ListRef<Spec>,
}

/// Kind of generic declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum GenDeclKind {
    Import,
    Const,
    Type,
    Var,
}

impl GenDeclKind {
    pub const fn keyword(self) -> &'static str {
        match self {
            GenDeclKind::Import => "import",
            GenDeclKind::Const => "const",
            GenDeclKind::Type => "type",
            GenDeclKind::Var => "var",
        }
    }
}

/// Specification within a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub enum Spec {
    Import(ImportSpec),
    Value(ValueSpec),
    Type(TypeSpec),
}

/// Import specification.
///
/// Spec: `ImportSpec = [ "." | PackageName ] ImportPath`
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct ImportSpec {
    pub name: Option<ImportName>,
    pub path: StringLit,
}

/// Import name variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub enum ImportName {
    /// `import . "pkg"`
    Dot,
    /// `import _ "pkg"`
    Blank,
    /// `import name "pkg"`
    Name(Ident),
}

/// Value specification (const or var).
///
/// Spec: `VarSpec = IdentifierList ( Type [ "=" ExpressionList ] | "=" ExpressionList )`
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct ValueSpec {
    pub names: ListRef<Ident>,
    pub typ: Option<TypeId>,
    pub values: ListRef<ExprId>,
}

/// Type specification: `type Name T` or `type Name = T`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct TypeSpec {
    pub name: Ident,
    pub typ: TypeId,
    #[walk(skip)]
    pub alias: bool,
}

/// Function or method declaration.
///
/// ```text
/// FunctionDecl = "func" FunctionName Signature [ FunctionBody ]
/// MethodDecl   = "func" Receiver MethodName Signature [ FunctionBody ]
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct FuncDecl {
    /// Receiver list (present only for methods)
    pub recv: Option<FieldList>,
    pub name: Ident,
    pub signature: SignatureId,
    /// Function body (None for external declarations)
    pub body: Option<Block>,
}

// =============================================================================
// Signatures and Fields
// =============================================================================

/// Function signature. A result list with a single unnamed field prints
/// without parentheses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct Signature {
    pub params: FieldList,
    pub results: FieldList,
}

/// Field list (receivers, parameters, results, struct fields).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, WalkAst)]
pub struct FieldList {
    pub fields: ListRef<FieldId>,
}

/// Field in a parameter list or struct.
///
/// Spec: `ParameterDecl = [ IdentifierList ] [ "..." ] Type`
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct Field {
    /// Field names (empty for anonymous or embedded fields)
    pub names: ListRef<Ident>,
    /// `...T` variadic parameter
    #[walk(skip)]
    pub variadic: bool,
    pub typ: TypeId,
    /// Struct tag
    pub tag: Option<StringLit>,
}

// =============================================================================
// Statements
// =============================================================================

/// Simple statement (used in for/if/switch headers).
///
/// Spec: `SimpleStmt = EmptyStmt | ExpressionStmt | SendStmt | IncDecStmt | Assignment | ShortVarDecl`
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub enum SimpleStmt {
    Empty,
    Expr(ExprId),

    /// Send statement: `chan <- value`
    Send { chan: ExprId, value: ExprId },

    /// Increment/decrement: `x++` or `x--`
    IncDec {
        expr: ExprId,
        #[walk(skip)]
        op: IncDecOp,
    },

    /// Assignment `x = y`, `x += y`, or short variable declaration `x := y`
    Assign {
        lhs: ListRef<ExprId>,
        #[walk(skip)]
        op: AssignOp,
        rhs: ListRef<ExprId>,
    },
}

/// Statement node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub enum Stmt {
    Simple(SimpleStmtId),
    Decl(DeclId),

    /// Labeled statement: `label: stmt`
    Labeled { label: Ident, stmt: StmtId },

    /// `go f()`
    Go(ExprId),

    /// `defer f()`
    Defer(ExprId),

    /// `return [expr, ...]`
    Return(ListRef<ExprId>),

    /// Branch statement (break, continue, goto, fallthrough)
    Branch {
        #[walk(skip)]
        kind: BranchKind,
        label: Option<Ident>,
    },

    /// `{ ... }`
    Block(Block),

    If {
        init: Option<SimpleStmtId>,
        cond: ExprId,
        then_block: Block,
        /// Either another `If` or a `Block`
        else_stmt: Option<StmtId>,
    },

    For { kind: ForKind, block: Block },

    /// Expression switch. An empty item list in a clause means `default`.
    Switch {
        init: Option<SimpleStmtId>,
        tag: Option<ExprId>,
        clauses: ListRef<SwitchClauseId>,
    },

    TypeSwitch {
        init: Option<SimpleStmtId>,
        guard: TypeSwitchGuard,
        clauses: ListRef<SwitchClauseId>,
    },

    Select { clauses: ListRef<CommClauseId> },

    /// Bad statement (error recovery)
    Bad,
}

/// Branch keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchKind {
    Break,
    Continue,
    Goto,
    Fallthrough,
}

impl BranchKind {
    pub const fn keyword(self) -> &'static str {
        match self {
            BranchKind::Break => "break",
            BranchKind::Continue => "continue",
            BranchKind::Goto => "goto",
            BranchKind::Fallthrough => "fallthrough",
        }
    }
}

/// For loop variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub enum ForKind {
    /// `for { ... }`
    Infinite,

    /// `for cond { ... }`
    Cond(ExprId),

    /// `for init; cond; post { ... }`
    ForClause {
        init: Option<SimpleStmtId>,
        cond: Option<ExprId>,
        post: Option<SimpleStmtId>,
    },

    /// `for k, v := range x { ... }`
    Range { lhs: Option<RangeLhs>, expr: ExprId },
}

/// Left-hand side of a range clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct RangeLhs {
    pub exprs: ListRef<ExprId>,
    /// `:=` rather than `=`
    #[walk(skip)]
    pub define: bool,
}

/// Switch or type switch case clause. Empty items mean `default`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub enum SwitchClause {
    ExprCase {
        items: ListRef<ExprId>,
        stmts: ListRef<StmtId>,
    },
    TypeCase {
        items: ListRef<TypeCaseElem>,
        stmts: ListRef<StmtId>,
    },
}

/// Select clause: `case comm:` or `default:` when `comm` is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct CommClause {
    pub comm: Option<SimpleStmtId>,
    pub stmts: ListRef<StmtId>,
}

/// Block of statements.
///
/// Spec: `Block = "{" StatementList "}"`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, WalkAst)]
pub struct Block {
    pub stmts: ListRef<StmtId>,
}

/// Type switch guard: `[ bind := ] x.(type)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct TypeSwitchGuard {
    pub bind: Option<Ident>,
    pub x: ExprId,
}

// =============================================================================
// Expressions
// =============================================================================

/// Keyed element in a composite literal.
///
/// Spec: `KeyedElement = [ Key ":" ] Element`
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct KeyedElement {
    pub key: Option<Element>,
    pub value: Element,
}

/// Element value in a literal: an expression or a nested `{...}` whose type
/// is elided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub enum Element {
    Expr(ExprId),
    Literal(ListRef<KeyedElement>),
}

/// Bracket or argument list item that may be an expression or a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub enum ExprOrType {
    Expr(ExprId),
    Type(TypeId),
}

/// Call callee may be an expression or a type (conversion).
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub enum CallCallee {
    Expr(ExprId),
    Type(TypeId),
}

/// Expression node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub enum Expr {
    Ident(Ident),

    /// Basic literal (int, float, string, etc.)
    BasicLit(BasicLit),

    /// `func(x int) int { return x }`
    FuncLit { sig: SignatureId, body: Block },

    /// `T{...}`
    CompositeLit {
        typ: TypeId,
        elts: ListRef<KeyedElement>,
    },

    /// `a[i]`
    Index {
        base: ExprId,
        args: ListRef<ExprOrType>,
    },

    /// `(x)`
    Paren(ExprId),

    /// `x.y`
    Selector { expr: ExprId, sel: Ident },

    /// `a[lo:hi]` or `a[lo:hi:max]`
    Slice {
        expr: ExprId,
        lo: Option<ExprId>,
        hi: Option<ExprId>,
        max: Option<ExprId>,
    },

    /// `x.(T)`, or `x.(type)` in a type switch when `typ` is `None`
    TypeAssert { expr: ExprId, typ: Option<TypeId> },

    /// `f(args...)` or `T(x)`
    Call {
        callee: CallCallee,
        args: ListRef<ExprOrType>,
        /// `f(xs...)`
        #[walk(skip)]
        ellipsis: bool,
    },

    /// `+x`, `-x`, `!x`, `^x`, `*x`, `&x`, `<-x`
    Unary {
        #[walk(skip)]
        op: UnaryOp,
        expr: ExprId,
    },

    /// `x + y`, `x && y`, etc.
    Binary {
        left: ExprId,
        #[walk(skip)]
        op: BinaryOp,
        right: ExprId,
    },

    /// Bad expression (error recovery)
    Bad,
}

/// Basic literal value; the text is `AstArena::text(raw)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct BasicLit {
    #[walk(skip)]
    pub kind: BasicLitKind,
    pub raw: Span,
}

/// Basic literal kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum BasicLitKind {
    Int,
    Float,
    Imag,
    Rune,
    String,
}

/// String literal (quotes included in the raw text).
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct StringLit {
    pub raw: Span,
}

// =============================================================================
// Types
// =============================================================================

/// Type node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub enum Type {
    /// `Name` or `pkg.Name`
    Named { pkg: Option<Ident>, name: Ident },

    /// `*T`
    Pointer(TypeId),

    /// `[N]T`
    Array { len: ArrayLen, elem: TypeId },

    /// `[]T`
    Slice(TypeId),

    /// `map[K]V`
    Map { key: TypeId, val: TypeId },

    /// `chan T`, `<-chan T`, or `chan<- T`
    Chan {
        #[walk(skip)]
        dir: ChanDir,
        elem: TypeId,
    },

    /// `struct { ... }`
    Struct { fields: ListRef<FieldId> },

    /// `interface { ... }`
    Interface { elems: ListRef<InterfaceElem> },

    /// `func(...) ...`
    Func(SignatureId),

    /// `(T)`
    Paren(TypeId),

    /// Bad type (error recovery)
    Bad,
}

/// Array length specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub enum ArrayLen {
    /// `[10]int`
    Expr(ExprId),
    /// `[...]int`
    Ellipsis,
}

/// Channel direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChanDir {
    /// `chan T`
    Both,
    /// `chan<- T`
    Send,
    /// `<-chan T`
    Recv,
}

/// Type case element (in type switch).
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub enum TypeCaseElem {
    Type(TypeId),
    Nil,
}

/// Interface element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub enum InterfaceElem {
    /// `Method(...) ...`
    Method { name: Ident, sig: SignatureId },
    /// Embedded interface: `io.Reader`
    Embed(TypeId),
}

// =============================================================================
// Operators
// =============================================================================

/// Unary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Add,   // +
    Sub,   // -
    Not,   // !
    Xor,   // ^
    Deref, // *
    Addr,  // &
    Recv,  // <-
    /// Symbol that is not a unary operator; the printer rejects it.
    Illegal,
}

impl UnaryOp {
    pub fn from_symbol(sym: &str) -> Option<Self> {
        Some(match sym {
            "+" => Self::Add,
            "-" => Self::Sub,
            "!" => Self::Not,
            "^" => Self::Xor,
            "*" => Self::Deref,
            "&" => Self::Addr,
            "<-" => Self::Recv,
            _ => return None,
        })
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Not => "!",
            Self::Xor => "^",
            Self::Deref => "*",
            Self::Addr => "&",
            Self::Recv => "<-",
            Self::Illegal => "ILLEGAL",
        }
    }
}

/// Binary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,    // +
    Sub,    // -
    Mul,    // *
    Div,    // /
    Mod,    // %
    And,    // &
    Or,     // |
    Xor,    // ^
    Shl,    // <<
    Shr,    // >>
    AndNot, // &^
    LAnd,   // &&
    LOr,    // ||
    Eq,     // ==
    Ne,     // !=
    Lt,     // <
    Le,     // <=
    Gt,     // >
    Ge,     // >=
    /// Symbol that is not a binary operator; the printer rejects it.
    Illegal,
}

impl BinaryOp {
    pub fn from_symbol(sym: &str) -> Option<Self> {
        Some(match sym {
            "+" => Self::Add,
            "-" => Self::Sub,
            "*" => Self::Mul,
            "/" => Self::Div,
            "%" => Self::Mod,
            "&" => Self::And,
            "|" => Self::Or,
            "^" => Self::Xor,
            "<<" => Self::Shl,
            ">>" => Self::Shr,
            "&^" => Self::AndNot,
            "&&" => Self::LAnd,
            "||" => Self::LOr,
            "==" => Self::Eq,
            "!=" => Self::Ne,
            "<" => Self::Lt,
            "<=" => Self::Le,
            ">" => Self::Gt,
            ">=" => Self::Ge,
            _ => return None,
        })
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::And => "&",
            Self::Or => "|",
            Self::Xor => "^",
            Self::Shl => "<<",
            Self::Shr => ">>",
            Self::AndNot => "&^",
            Self::LAnd => "&&",
            Self::LOr => "||",
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Illegal => "ILLEGAL",
        }
    }

    /// Go operator precedence, 1 (`||`) through 5 (`*`).
    pub const fn precedence(self) -> u8 {
        match self {
            Self::LOr => 1,
            Self::LAnd => 2,
            Self::Eq | Self::Ne | Self::Lt | Self::Le | Self::Gt | Self::Ge => 3,
            Self::Add | Self::Sub | Self::Or | Self::Xor => 4,
            Self::Mul
            | Self::Div
            | Self::Mod
            | Self::Shl
            | Self::Shr
            | Self::And
            | Self::AndNot => 5,
            Self::Illegal => 0,
        }
    }
}

/// Assignment operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,       // =
    Define,       // :=
    AddAssign,    // +=
    SubAssign,    // -=
    MulAssign,    // *=
    DivAssign,    // /=
    ModAssign,    // %=
    AndAssign,    // &=
    OrAssign,     // |=
    XorAssign,    // ^=
    ShlAssign,    // <<=
    ShrAssign,    // >>=
    AndNotAssign, // &^=
    /// Symbol that is not an assignment operator; the printer rejects it.
    Illegal,
}

impl AssignOp {
    pub fn from_symbol(sym: &str) -> Option<Self> {
        Some(match sym {
            "=" => Self::Assign,
            ":=" => Self::Define,
            "+=" => Self::AddAssign,
            "-=" => Self::SubAssign,
            "*=" => Self::MulAssign,
            "/=" => Self::DivAssign,
            "%=" => Self::ModAssign,
            "&=" => Self::AndAssign,
            "|=" => Self::OrAssign,
            "^=" => Self::XorAssign,
            "<<=" => Self::ShlAssign,
            ">>=" => Self::ShrAssign,
            "&^=" => Self::AndNotAssign,
            _ => return None,
        })
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Assign => "=",
            Self::Define => ":=",
            Self::AddAssign => "+=",
            Self::SubAssign => "-=",
            Self::MulAssign => "*=",
            Self::DivAssign => "/=",
            Self::ModAssign => "%=",
            Self::AndAssign => "&=",
            Self::OrAssign => "|=",
            Self::XorAssign => "^=",
            Self::ShlAssign => "<<=",
            Self::ShrAssign => ">>=",
            Self::AndNotAssign => "&^=",
            Self::Illegal => "ILLEGAL",
        }
    }
}

/// Increment/decrement operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncDecOp {
    Inc, // ++
    Dec, // --
}

impl IncDecOp {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inc => "++",
            Self::Dec => "--",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operator_tables_round_trip() {
        for sym in ["+", "-", "*", "/", "%", "&", "|", "^", "<<", ">>", "&^", "&&", "||"] {
            assert_eq!(BinaryOp::from_symbol(sym).map(BinaryOp::as_str), Some(sym));
        }
        for sym in ["==", "!=", "<", "<=", ">", ">="] {
            assert_eq!(BinaryOp::from_symbol(sym).map(|op| op.precedence()), Some(3));
        }
        assert_eq!(UnaryOp::from_symbol("<"), None);
        assert_eq!(AssignOp::from_symbol(":="), Some(AssignOp::Define));
    }

    #[test]
    fn append_copies_the_list() {
        let mut a = AstArena::new();
        let t = a.ident_expr("int");
        let typ = a.expr_to_type(t).unwrap();
        let f = a.fields.alloc(
            Field {
                names: ListRef::EMPTY,
                variadic: false,
                typ,
                tag: None,
            },
            Span::default(),
        );
        let one = a.list_fields([f]);
        let two = a.append_field(one, f);
        assert_eq!(a.fields_list(one).len(), 1);
        assert_eq!(a.fields_list(two), &[f, f]);
    }

    #[test]
    fn qualified_selector_becomes_named_type() {
        let mut a = AstArena::new();
        let pkg = a.ident_expr("http");
        let sel = a.intern("Request");
        let e = a.exprs.alloc(Expr::Selector { expr: pkg, sel }, Span::default());
        let star = a.exprs.alloc(
            Expr::Unary {
                op: UnaryOp::Deref,
                expr: e,
            },
            Span::default(),
        );
        let t = a.expr_to_type(star).unwrap();
        let Type::Pointer(inner) = a.types[t] else {
            panic!("expected pointer type");
        };
        assert!(matches!(a.types[inner], Type::Named { pkg: Some(_), .. }));
    }
}
