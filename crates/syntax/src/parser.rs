//! Recursive-descent parser producing an `AstArena` tree.
//!
//! The parser stops at the first syntax error. `expr_lev` follows the Go
//! parser: it is negative while parsing a statement header, where `T{` opens
//! the block instead of a composite literal.

use crate::ast::*;
use crate::error::{Diag, ParseFailure};
use crate::lexer::{tokenize, Tok};
use crate::parser_support::{resolve_param_list, ParamDecl};

type PResult<T> = Result<T, Diag>;

/// A parsed file together with the arena that owns its nodes.
#[derive(Debug)]
pub struct ParsedFile {
    pub arena: AstArena,
    pub file: SourceFile,
}

/// Parses a complete Go source file.
pub fn parse_source(src: &str) -> Result<ParsedFile, ParseFailure> {
    let mut p = Parser::new(src)?;
    let file = p.source_file().map_err(|d| p.fail(d))?;
    Ok(ParsedFile {
        arena: p.arena,
        file,
    })
}

/// Parses a single expression, e.g. `a + b*c`.
pub fn parse_expr(src: &str) -> Result<(AstArena, ExprId), ParseFailure> {
    let mut p = Parser::new(src)?;
    let expr = p
        .expr()
        .and_then(|e| {
            p.eat(Tok::Semi);
            if p.at_eof() {
                Ok(e)
            } else {
                Err(p.unexpected("end of expression"))
            }
        })
        .map_err(|d| p.fail(d))?;
    Ok((p.arena, expr))
}

enum Operand {
    Expr(ExprId),
    Type(TypeId),
}

/// Outcome of a simple statement in a `for` header.
enum Header {
    Simple(SimpleStmtId),
    Range(Option<RangeLhs>, ExprId),
}

struct Parser<'src> {
    toks: Vec<(usize, Tok<'src>, usize)>,
    pos: usize,
    prev_end: usize,
    src_len: usize,
    expr_lev: i32,
    arena: AstArena,
}

impl<'src> Parser<'src> {
    fn new(src: &'src str) -> Result<Self, ParseFailure> {
        let (toks, diags) = tokenize(src);
        tracing::trace!(len = src.len(), tokens = toks.len(), "parsing");
        if !diags.is_empty() {
            tracing::debug!(count = diags.len(), "lexer reported errors");
            return Err(ParseFailure { diags });
        }
        Ok(Self {
            toks,
            pos: 0,
            prev_end: 0,
            src_len: src.len(),
            expr_lev: 0,
            arena: AstArena::with_source(src),
        })
    }

    fn fail(&self, diag: Diag) -> ParseFailure {
        tracing::debug!(%diag, "parse failed");
        ParseFailure { diags: vec![diag] }
    }

    // Token cursor

    #[inline]
    fn peek(&self) -> Option<Tok<'src>> {
        self.toks.get(self.pos).map(|t| t.1)
    }

    #[inline]
    fn peek_at(&self, n: usize) -> Option<Tok<'src>> {
        self.toks.get(self.pos + n).map(|t| t.1)
    }

    #[inline]
    fn at(&self, tok: Tok<'_>) -> bool {
        self.peek() == Some(tok)
    }

    #[inline]
    fn at_eof(&self) -> bool {
        self.pos >= self.toks.len()
    }

    fn start(&self) -> usize {
        self.toks.get(self.pos).map_or(self.src_len, |t| t.0)
    }

    fn span_from(&self, start: usize) -> Span {
        Span::new(start, self.prev_end.max(start))
    }

    fn bump(&mut self) -> Option<(usize, Tok<'src>, usize)> {
        let tok = self.toks.get(self.pos).copied()?;
        self.pos += 1;
        self.prev_end = tok.2;
        Some(tok)
    }

    fn eat(&mut self, tok: Tok<'_>) -> bool {
        if self.at(tok) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, tok: Tok<'_>) -> PResult<Span> {
        match self.toks.get(self.pos).copied() {
            Some((l, t, r)) if t == tok => {
                self.bump();
                Ok(Span::new(l, r))
            }
            _ => Err(self.unexpected(&format!("{tok}"))),
        }
    }

    fn unexpected(&self, expected: &str) -> Diag {
        match self.toks.get(self.pos) {
            Some(&(l, t, r)) => Diag::parse(
                Span::new(l, r),
                format!("unexpected {t}, expected {expected}"),
            ),
            None => Diag::parse(
                Span::new(self.src_len, self.src_len),
                format!("unexpected EOF, expected {expected}"),
            ),
        }
    }

    fn ident(&mut self) -> PResult<Ident> {
        match self.peek() {
            Some(Tok::Ident(name)) => {
                self.bump();
                Ok(self.arena.intern(name))
            }
            _ => Err(self.unexpected("identifier")),
        }
    }

    /// `;` or the closing token of the enclosing list.
    fn expect_semi_or(&mut self, close: Tok<'_>) -> PResult<()> {
        if self.eat(Tok::Semi) || self.at(close) || self.at_eof() {
            Ok(())
        } else {
            Err(self.unexpected("';'"))
        }
    }

    fn alloc_expr(&mut self, e: Expr, start: usize) -> ExprId {
        let span = self.span_from(start);
        self.arena.exprs.alloc(e, span)
    }

    fn alloc_type(&mut self, t: Type, start: usize) -> TypeId {
        let span = self.span_from(start);
        self.arena.types.alloc(t, span)
    }

    fn alloc_stmt(&mut self, s: Stmt, start: usize) -> StmtId {
        let span = self.span_from(start);
        self.arena.stmts.alloc(s, span)
    }

    fn alloc_simple(&mut self, s: SimpleStmt, start: usize) -> SimpleStmtId {
        let span = self.span_from(start);
        self.arena.simple_stmts.alloc(s, span)
    }

    fn with_lev<T>(&mut self, lev: i32, f: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<T> {
        let old = self.expr_lev;
        self.expr_lev = lev;
        let out = f(self);
        self.expr_lev = old;
        out
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    fn source_file(&mut self) -> PResult<SourceFile> {
        self.expect(Tok::KwPackage)?;
        let package = self.ident()?;
        self.expect_semi_or(Tok::Semi)?;

        let mut decls = Vec::new();
        while !self.at_eof() {
            if self.eat(Tok::Semi) {
                continue;
            }
            let decl = match self.peek() {
                Some(Tok::KwFunc) => TopLevelDecl::Func(self.func_decl()?),
                Some(Tok::KwImport | Tok::KwVar | Tok::KwConst | Tok::KwType) => {
                    TopLevelDecl::Decl(self.gen_decl()?)
                }
                _ => return Err(self.unexpected("declaration")),
            };
            decls.push(decl);
            if !self.at_eof() {
                self.expect(Tok::Semi)?;
            }
        }

        Ok(SourceFile {
            package,
            decls: self.arena.list_top_decls(decls),
        })
    }

    fn gen_decl(&mut self) -> PResult<DeclId> {
        let start = self.start();
        let kind = match self.bump().map(|t| t.1) {
            Some(Tok::KwImport) => GenDeclKind::Import,
            Some(Tok::KwVar) => GenDeclKind::Var,
            Some(Tok::KwConst) => GenDeclKind::Const,
            Some(Tok::KwType) => GenDeclKind::Type,
            _ => return Err(self.unexpected("declaration keyword")),
        };

        let mut specs = Vec::new();
        let grouped = self.eat(Tok::LParen);
        if grouped {
            while !self.at(Tok::RParen) {
                specs.push(self.spec(kind)?);
                self.expect_semi_or(Tok::RParen)?;
            }
            self.expect(Tok::RParen)?;
        } else {
            specs.push(self.spec(kind)?);
        }

        let specs = self.arena.list_specs(specs);
        let span = self.span_from(start);
        Ok(self.arena.decls.alloc(
            Decl::Gen(GenDecl {
                kind,
                grouped,
                specs,
            }),
            span,
        ))
    }

    fn spec(&mut self, kind: GenDeclKind) -> PResult<Spec> {
        match kind {
            GenDeclKind::Import => {
                let name = match self.peek() {
                    Some(Tok::Dot) => {
                        self.bump();
                        Some(ImportName::Dot)
                    }
                    Some(Tok::Ident("_")) => {
                        self.bump();
                        Some(ImportName::Blank)
                    }
                    Some(Tok::Ident(_)) => Some(ImportName::Name(self.ident()?)),
                    _ => None,
                };
                let path = self.string_lit()?;
                Ok(Spec::Import(ImportSpec { name, path }))
            }
            GenDeclKind::Type => {
                let name = self.ident()?;
                let alias = self.eat(Tok::Assign);
                let typ = self.typ()?;
                Ok(Spec::Type(TypeSpec { name, typ, alias }))
            }
            GenDeclKind::Var | GenDeclKind::Const => {
                let mut names = vec![self.ident()?];
                while self.eat(Tok::Comma) {
                    names.push(self.ident()?);
                }
                let typ = if matches!(
                    self.peek(),
                    Some(Tok::Assign | Tok::Semi | Tok::RParen) | None
                ) {
                    None
                } else {
                    Some(self.typ()?)
                };
                let values = if self.eat(Tok::Assign) {
                    self.expr_list()?
                } else {
                    Vec::new()
                };
                Ok(Spec::Value(ValueSpec {
                    names: self.arena.list_idents(names),
                    typ,
                    values: self.arena.list_exprs(values),
                }))
            }
        }
    }

    fn string_lit(&mut self) -> PResult<StringLit> {
        match self.toks.get(self.pos).copied() {
            Some((l, Tok::StringLit(_) | Tok::RawStringLit(_), r)) => {
                self.bump();
                Ok(StringLit {
                    raw: Span::new(l, r),
                })
            }
            _ => Err(self.unexpected("string literal")),
        }
    }

    fn func_decl(&mut self) -> PResult<FuncDeclId> {
        let start = self.start();
        self.expect(Tok::KwFunc)?;
        let recv = if self.at(Tok::LParen) {
            Some(self.params()?)
        } else {
            None
        };
        let name = self.ident()?;
        let signature = self.signature()?;
        let body = if self.at(Tok::LBrace) {
            Some(self.with_lev(0, |p| p.block())?)
        } else {
            None
        };
        let span = self.span_from(start);
        Ok(self.arena.funcs.alloc(
            FuncDecl {
                recv,
                name,
                signature,
                body,
            },
            span,
        ))
    }

    fn signature(&mut self) -> PResult<SignatureId> {
        let start = self.start();
        let params = self.params()?;
        let results = if self.at(Tok::LParen) {
            self.params()?
        } else if self.at_type_start() {
            let tstart = self.start();
            let typ = self.typ()?;
            let span = self.span_from(tstart);
            let field = self.arena.fields.alloc(
                Field {
                    names: ListRef::EMPTY,
                    variadic: false,
                    typ,
                    tag: None,
                },
                span,
            );
            FieldList {
                fields: self.arena.list_fields([field]),
            }
        } else {
            FieldList::default()
        };
        let span = self.span_from(start);
        Ok(self
            .arena
            .signatures
            .alloc(Signature { params, results }, span))
    }

    fn params(&mut self) -> PResult<FieldList> {
        self.expect(Tok::LParen)?;
        let mut entries = Vec::new();
        while !self.at(Tok::RParen) {
            entries.push(self.param_entry()?);
            if !self.eat(Tok::Comma) {
                break;
            }
        }
        self.expect(Tok::RParen)?;
        let fields = resolve_param_list(&mut self.arena, entries);
        Ok(FieldList {
            fields: self.arena.list_fields(fields),
        })
    }

    fn param_entry(&mut self) -> PResult<ParamDecl> {
        let start = self.start();
        let mut names = Vec::new();
        if let Some(Tok::Ident(_)) = self.peek() {
            match self.peek_at(1) {
                Some(Tok::Dot) => {}
                Some(Tok::Comma | Tok::RParen) => {
                    let name = self.ident()?;
                    return Ok(ParamDecl {
                        names: vec![(name, self.span_from(start))],
                        variadic: false,
                        typ: None,
                        span: self.span_from(start),
                    });
                }
                _ => {
                    let name = self.ident()?;
                    names.push((name, self.span_from(start)));
                }
            }
        }
        let variadic = self.eat(Tok::Ellipsis);
        let typ = self.typ()?;
        Ok(ParamDecl {
            names,
            variadic,
            typ: Some(typ),
            span: self.span_from(start),
        })
    }

    // =========================================================================
    // Types
    // =========================================================================

    fn at_type_start(&self) -> bool {
        matches!(
            self.peek(),
            Some(
                Tok::Ident(_)
                    | Tok::Star
                    | Tok::LBrack
                    | Tok::KwMap
                    | Tok::KwChan
                    | Tok::Arrow
                    | Tok::KwFunc
                    | Tok::KwStruct
                    | Tok::KwInterface
                    | Tok::LParen
            )
        )
    }

    fn typ(&mut self) -> PResult<TypeId> {
        let start = self.start();
        let t = match self.peek() {
            Some(Tok::Ident(_)) => {
                let first = self.ident()?;
                if self.eat(Tok::Dot) {
                    let name = self.ident()?;
                    Type::Named {
                        pkg: Some(first),
                        name,
                    }
                } else {
                    Type::Named {
                        pkg: None,
                        name: first,
                    }
                }
            }
            Some(Tok::Star) => {
                self.bump();
                Type::Pointer(self.typ()?)
            }
            Some(Tok::LBrack) => {
                self.bump();
                if self.eat(Tok::RBrack) {
                    Type::Slice(self.typ()?)
                } else {
                    let len = if self.eat(Tok::Ellipsis) {
                        ArrayLen::Ellipsis
                    } else {
                        ArrayLen::Expr(self.with_lev(self.expr_lev + 1, |p| p.expr())?)
                    };
                    self.expect(Tok::RBrack)?;
                    Type::Array {
                        len,
                        elem: self.typ()?,
                    }
                }
            }
            Some(Tok::KwMap) => {
                self.bump();
                self.expect(Tok::LBrack)?;
                let key = self.typ()?;
                self.expect(Tok::RBrack)?;
                Type::Map {
                    key,
                    val: self.typ()?,
                }
            }
            Some(Tok::KwChan) => {
                self.bump();
                let dir = if self.eat(Tok::Arrow) {
                    ChanDir::Send
                } else {
                    ChanDir::Both
                };
                Type::Chan {
                    dir,
                    elem: self.typ()?,
                }
            }
            Some(Tok::Arrow) => {
                self.bump();
                self.expect(Tok::KwChan)?;
                Type::Chan {
                    dir: ChanDir::Recv,
                    elem: self.typ()?,
                }
            }
            Some(Tok::KwFunc) => {
                self.bump();
                Type::Func(self.signature()?)
            }
            Some(Tok::KwStruct) => self.struct_type()?,
            Some(Tok::KwInterface) => self.interface_type()?,
            Some(Tok::LParen) => {
                self.bump();
                let inner = self.typ()?;
                self.expect(Tok::RParen)?;
                Type::Paren(inner)
            }
            _ => return Err(self.unexpected("type")),
        };
        Ok(self.alloc_type(t, start))
    }

    fn struct_type(&mut self) -> PResult<Type> {
        self.expect(Tok::KwStruct)?;
        self.expect(Tok::LBrace)?;
        let mut fields = Vec::new();
        while !self.at(Tok::RBrace) {
            let start = self.start();
            let embedded = match (self.peek(), self.peek_at(1)) {
                (Some(Tok::Star), _) => true,
                (
                    Some(Tok::Ident(_)),
                    Some(
                        Tok::Dot | Tok::Semi | Tok::RBrace | Tok::StringLit(_) | Tok::RawStringLit(_),
                    ),
                ) => true,
                _ => false,
            };
            let (names, typ) = if embedded {
                (Vec::new(), self.typ()?)
            } else {
                let mut names = vec![self.ident()?];
                while self.eat(Tok::Comma) {
                    names.push(self.ident()?);
                }
                (names, self.typ()?)
            };
            let tag = match self.peek() {
                Some(Tok::StringLit(_) | Tok::RawStringLit(_)) => Some(self.string_lit()?),
                _ => None,
            };
            let names = self.arena.list_idents(names);
            let span = self.span_from(start);
            fields.push(self.arena.fields.alloc(
                Field {
                    names,
                    variadic: false,
                    typ,
                    tag,
                },
                span,
            ));
            self.expect_semi_or(Tok::RBrace)?;
        }
        self.expect(Tok::RBrace)?;
        Ok(Type::Struct {
            fields: self.arena.list_fields(fields),
        })
    }

    fn interface_type(&mut self) -> PResult<Type> {
        self.expect(Tok::KwInterface)?;
        self.expect(Tok::LBrace)?;
        let mut elems = Vec::new();
        while !self.at(Tok::RBrace) {
            let elem = match (self.peek(), self.peek_at(1)) {
                (Some(Tok::Ident(_)), Some(Tok::LParen)) => {
                    let name = self.ident()?;
                    InterfaceElem::Method {
                        name,
                        sig: self.signature()?,
                    }
                }
                _ => InterfaceElem::Embed(self.typ()?),
            };
            elems.push(elem);
            self.expect_semi_or(Tok::RBrace)?;
        }
        self.expect(Tok::RBrace)?;
        Ok(Type::Interface {
            elems: self.arena.list_interface_elems(elems),
        })
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn block(&mut self) -> PResult<Block> {
        self.expect(Tok::LBrace)?;
        let stmts = self.stmt_list()?;
        self.expect(Tok::RBrace)?;
        Ok(Block { stmts })
    }

    fn stmt_list(&mut self) -> PResult<ListRef<StmtId>> {
        let mut stmts = Vec::new();
        loop {
            match self.peek() {
                None | Some(Tok::RBrace | Tok::KwCase | Tok::KwDefault) => break,
                Some(Tok::Semi) => {
                    self.bump();
                }
                Some(_) => {
                    stmts.push(self.stmt()?);
                    if !matches!(
                        self.peek(),
                        Some(Tok::RBrace | Tok::KwCase | Tok::KwDefault)
                    ) {
                        self.expect(Tok::Semi)?;
                    }
                }
            }
        }
        Ok(self.arena.list_stmts(stmts))
    }

    fn stmt(&mut self) -> PResult<StmtId> {
        let start = self.start();
        let stmt = match self.peek() {
            Some(Tok::KwVar | Tok::KwConst | Tok::KwType) => Stmt::Decl(self.gen_decl()?),
            Some(Tok::Ident(_)) if self.peek_at(1) == Some(Tok::Colon) => {
                let label = self.ident()?;
                self.expect(Tok::Colon)?;
                let stmt = if matches!(self.peek(), Some(Tok::RBrace | Tok::Semi)) {
                    let empty = self.alloc_simple(SimpleStmt::Empty, self.prev_end);
                    self.alloc_stmt(Stmt::Simple(empty), self.prev_end)
                } else {
                    self.stmt()?
                };
                Stmt::Labeled { label, stmt }
            }
            Some(Tok::KwGo) => {
                self.bump();
                Stmt::Go(self.expr()?)
            }
            Some(Tok::KwDefer) => {
                self.bump();
                Stmt::Defer(self.expr()?)
            }
            Some(Tok::KwReturn) => {
                self.bump();
                let results = if matches!(self.peek(), Some(Tok::Semi | Tok::RBrace) | None) {
                    Vec::new()
                } else {
                    self.expr_list()?
                };
                Stmt::Return(self.arena.list_exprs(results))
            }
            Some(Tok::KwBreak) => self.branch(BranchKind::Break)?,
            Some(Tok::KwContinue) => self.branch(BranchKind::Continue)?,
            Some(Tok::KwGoto) => self.branch(BranchKind::Goto)?,
            Some(Tok::KwFallthrough) => self.branch(BranchKind::Fallthrough)?,
            Some(Tok::LBrace) => Stmt::Block(self.block()?),
            Some(Tok::KwIf) => return self.if_stmt(),
            Some(Tok::KwFor) => self.for_stmt()?,
            Some(Tok::KwSwitch) => self.switch_stmt()?,
            Some(Tok::KwSelect) => self.select_stmt()?,
            _ => Stmt::Simple(self.simple_stmt()?),
        };
        Ok(self.alloc_stmt(stmt, start))
    }

    fn branch(&mut self, kind: BranchKind) -> PResult<Stmt> {
        self.bump();
        let label = match (kind, self.peek()) {
            (BranchKind::Fallthrough, _) => None,
            (_, Some(Tok::Ident(_))) => Some(self.ident()?),
            _ => None,
        };
        Ok(Stmt::Branch { kind, label })
    }

    fn simple_stmt(&mut self) -> PResult<SimpleStmtId> {
        match self.header_stmt(false)? {
            Header::Simple(s) => Ok(s),
            Header::Range(..) => Err(self.unexpected("statement")),
        }
    }

    fn header_stmt(&mut self, range_ok: bool) -> PResult<Header> {
        let start = self.start();
        if range_ok && self.eat(Tok::KwRange) {
            return Ok(Header::Range(None, self.expr()?));
        }

        let lhs = self.expr_list()?;
        let assign_op = match self.peek() {
            Some(Tok::Define) => Some(AssignOp::Define),
            Some(Tok::Assign) => Some(AssignOp::Assign),
            Some(Tok::AddAssign) => Some(AssignOp::AddAssign),
            Some(Tok::SubAssign) => Some(AssignOp::SubAssign),
            Some(Tok::MulAssign) => Some(AssignOp::MulAssign),
            Some(Tok::DivAssign) => Some(AssignOp::DivAssign),
            Some(Tok::ModAssign) => Some(AssignOp::ModAssign),
            Some(Tok::AndAssign) => Some(AssignOp::AndAssign),
            Some(Tok::OrAssign) => Some(AssignOp::OrAssign),
            Some(Tok::XorAssign) => Some(AssignOp::XorAssign),
            Some(Tok::ShlAssign) => Some(AssignOp::ShlAssign),
            Some(Tok::ShrAssign) => Some(AssignOp::ShrAssign),
            Some(Tok::AndNotAssign) => Some(AssignOp::AndNotAssign),
            _ => None,
        };

        let stmt = if let Some(op) = assign_op {
            self.bump();
            if range_ok
                && matches!(op, AssignOp::Define | AssignOp::Assign)
                && self.eat(Tok::KwRange)
            {
                let expr = self.expr()?;
                let lhs = RangeLhs {
                    exprs: self.arena.list_exprs(lhs),
                    define: op == AssignOp::Define,
                };
                return Ok(Header::Range(Some(lhs), expr));
            }
            let rhs = self.expr_list()?;
            SimpleStmt::Assign {
                lhs: self.arena.list_exprs(lhs),
                op,
                rhs: self.arena.list_exprs(rhs),
            }
        } else {
            let &[x] = lhs.as_slice() else {
                return Err(self.unexpected("':=' or '='"));
            };
            match self.peek() {
                Some(Tok::Arrow) => {
                    self.bump();
                    SimpleStmt::Send {
                        chan: x,
                        value: self.expr()?,
                    }
                }
                Some(Tok::Inc) => {
                    self.bump();
                    SimpleStmt::IncDec {
                        expr: x,
                        op: IncDecOp::Inc,
                    }
                }
                Some(Tok::Dec) => {
                    self.bump();
                    SimpleStmt::IncDec {
                        expr: x,
                        op: IncDecOp::Dec,
                    }
                }
                _ => SimpleStmt::Expr(x),
            }
        };
        Ok(Header::Simple(self.alloc_simple(stmt, start)))
    }

    fn if_stmt(&mut self) -> PResult<StmtId> {
        let start = self.start();
        self.expect(Tok::KwIf)?;
        let (init, cond) = self.with_lev(-1, |p| {
            let first = if p.at(Tok::Semi) {
                None
            } else {
                Some(p.simple_stmt()?)
            };
            if p.eat(Tok::Semi) {
                Ok((first, p.expr()?))
            } else {
                match first.map(|s| p.arena.simple_stmts[s]) {
                    Some(SimpleStmt::Expr(cond)) => Ok((None, cond)),
                    _ => Err(p.unexpected("condition")),
                }
            }
        })?;
        let then_block = self.block()?;
        let else_stmt = if self.eat(Tok::KwElse) {
            match self.peek() {
                Some(Tok::KwIf) => Some(self.if_stmt()?),
                Some(Tok::LBrace) => {
                    let bstart = self.start();
                    let block = self.block()?;
                    Some(self.alloc_stmt(Stmt::Block(block), bstart))
                }
                _ => return Err(self.unexpected("if statement or block")),
            }
        } else {
            None
        };
        Ok(self.alloc_stmt(
            Stmt::If {
                init,
                cond,
                then_block,
                else_stmt,
            },
            start,
        ))
    }

    fn for_stmt(&mut self) -> PResult<Stmt> {
        self.expect(Tok::KwFor)?;
        let kind = if self.at(Tok::LBrace) {
            ForKind::Infinite
        } else {
            self.with_lev(-1, |p| {
                let first = if p.at(Tok::Semi) {
                    None
                } else {
                    match p.header_stmt(true)? {
                        Header::Range(lhs, expr) => return Ok(ForKind::Range { lhs, expr }),
                        Header::Simple(s) => Some(s),
                    }
                };
                if p.eat(Tok::Semi) {
                    let cond = if p.at(Tok::Semi) { None } else { Some(p.expr()?) };
                    p.expect(Tok::Semi)?;
                    let post = if p.at(Tok::LBrace) {
                        None
                    } else {
                        Some(p.simple_stmt()?)
                    };
                    Ok(ForKind::ForClause {
                        init: first,
                        cond,
                        post,
                    })
                } else {
                    match first.map(|s| p.arena.simple_stmts[s]) {
                        Some(SimpleStmt::Expr(cond)) => Ok(ForKind::Cond(cond)),
                        _ => Err(p.unexpected("for loop condition")),
                    }
                }
            })?
        };
        let block = self.block()?;
        Ok(Stmt::For { kind, block })
    }

    fn switch_stmt(&mut self) -> PResult<Stmt> {
        self.expect(Tok::KwSwitch)?;
        let (init, tag) = self.with_lev(-1, |p| {
            if p.at(Tok::LBrace) {
                return Ok((None, None));
            }
            let first = if p.at(Tok::Semi) {
                None
            } else {
                Some(p.simple_stmt()?)
            };
            if p.eat(Tok::Semi) {
                let tag = if p.at(Tok::LBrace) {
                    None
                } else {
                    Some(p.simple_stmt()?)
                };
                Ok((first, tag))
            } else {
                Ok((None, first))
            }
        })?;

        let guard = tag.and_then(|s| self.type_switch_guard(s));
        self.expect(Tok::LBrace)?;
        let mut clauses = Vec::new();
        while !self.at(Tok::RBrace) {
            let start = self.start();
            let clause = if self.eat(Tok::KwDefault) {
                self.expect(Tok::Colon)?;
                let stmts = self.stmt_list()?;
                if guard.is_some() {
                    SwitchClause::TypeCase {
                        items: ListRef::EMPTY,
                        stmts,
                    }
                } else {
                    SwitchClause::ExprCase {
                        items: ListRef::EMPTY,
                        stmts,
                    }
                }
            } else {
                self.expect(Tok::KwCase)?;
                if guard.is_some() {
                    let mut items = vec![self.type_case_elem()?];
                    while self.eat(Tok::Comma) {
                        items.push(self.type_case_elem()?);
                    }
                    self.expect(Tok::Colon)?;
                    let stmts = self.stmt_list()?;
                    SwitchClause::TypeCase {
                        items: self.arena.list_type_cases(items),
                        stmts,
                    }
                } else {
                    let items = self.expr_list()?;
                    self.expect(Tok::Colon)?;
                    let stmts = self.stmt_list()?;
                    SwitchClause::ExprCase {
                        items: self.arena.list_exprs(items),
                        stmts,
                    }
                }
            };
            let span = self.span_from(start);
            clauses.push(self.arena.switch_clauses.alloc(clause, span));
        }
        self.expect(Tok::RBrace)?;
        let clauses = self.arena.list_switch_clause_ids(clauses);

        if let Some(guard) = guard {
            return Ok(Stmt::TypeSwitch {
                init,
                guard,
                clauses,
            });
        }
        let tag = match tag.map(|s| self.arena.simple_stmts[s]) {
            None => None,
            Some(SimpleStmt::Expr(e)) => Some(e),
            Some(_) => return Err(Diag::parse(self.span_from(0), "switch tag must be an expression")),
        };
        Ok(Stmt::Switch { init, tag, clauses })
    }

    /// Recognizes `x.(type)` and `v := x.(type)`.
    fn type_switch_guard(&self, s: SimpleStmtId) -> Option<TypeSwitchGuard> {
        let is_guard = |e: ExprId| match self.arena.exprs[e] {
            Expr::TypeAssert { expr, typ: None } => Some(expr),
            _ => None,
        };
        match self.arena.simple_stmts[s] {
            SimpleStmt::Expr(e) => is_guard(e).map(|x| TypeSwitchGuard { bind: None, x }),
            SimpleStmt::Assign {
                lhs,
                op: AssignOp::Define,
                rhs,
            } => {
                let (&[l], &[r]) = (self.arena.exprs_list(lhs), self.arena.exprs_list(rhs)) else {
                    return None;
                };
                let Expr::Ident(bind) = self.arena.exprs[l] else {
                    return None;
                };
                is_guard(r).map(|x| TypeSwitchGuard {
                    bind: Some(bind),
                    x,
                })
            }
            _ => None,
        }
    }

    fn type_case_elem(&mut self) -> PResult<TypeCaseElem> {
        if self.at(Tok::Ident("nil")) {
            self.bump();
            return Ok(TypeCaseElem::Nil);
        }
        Ok(TypeCaseElem::Type(self.typ()?))
    }

    fn select_stmt(&mut self) -> PResult<Stmt> {
        self.expect(Tok::KwSelect)?;
        self.expect(Tok::LBrace)?;
        let mut clauses = Vec::new();
        while !self.at(Tok::RBrace) {
            let start = self.start();
            let comm = if self.eat(Tok::KwDefault) {
                None
            } else {
                self.expect(Tok::KwCase)?;
                Some(self.simple_stmt()?)
            };
            self.expect(Tok::Colon)?;
            let stmts = self.stmt_list()?;
            let span = self.span_from(start);
            clauses.push(
                self.arena
                    .comm_clauses
                    .alloc(CommClause { comm, stmts }, span),
            );
        }
        self.expect(Tok::RBrace)?;
        Ok(Stmt::Select {
            clauses: self.arena.list_comm_clause_ids(clauses),
        })
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn expr_list(&mut self) -> PResult<Vec<ExprId>> {
        let mut out = vec![self.expr()?];
        while self.eat(Tok::Comma) {
            out.push(self.expr()?);
        }
        Ok(out)
    }

    fn expr(&mut self) -> PResult<ExprId> {
        let start = self.start();
        let x = self.unary()?;
        self.binary_from(x, 1, start)
    }

    fn binary_op(&self) -> Option<BinaryOp> {
        Some(match self.peek()? {
            Tok::LOr => BinaryOp::LOr,
            Tok::LAnd => BinaryOp::LAnd,
            Tok::EqEq => BinaryOp::Eq,
            Tok::NotEq => BinaryOp::Ne,
            Tok::Lt => BinaryOp::Lt,
            Tok::Le => BinaryOp::Le,
            Tok::Gt => BinaryOp::Gt,
            Tok::Ge => BinaryOp::Ge,
            Tok::Plus => BinaryOp::Add,
            Tok::Minus => BinaryOp::Sub,
            Tok::Pipe => BinaryOp::Or,
            Tok::Caret => BinaryOp::Xor,
            Tok::Star => BinaryOp::Mul,
            Tok::Slash => BinaryOp::Div,
            Tok::Percent => BinaryOp::Mod,
            Tok::Shl => BinaryOp::Shl,
            Tok::Shr => BinaryOp::Shr,
            Tok::Amp => BinaryOp::And,
            Tok::AndNot => BinaryOp::AndNot,
            _ => return None,
        })
    }

    /// Precedence climbing with `x` already parsed as the leftmost operand.
    fn binary_from(&mut self, mut x: ExprId, prec1: u8, start: usize) -> PResult<ExprId> {
        while let Some(op) = self.binary_op() {
            let prec = op.precedence();
            if prec < prec1 {
                break;
            }
            self.bump();
            let rstart = self.start();
            let y = self.unary()?;
            let right = self.binary_from(y, prec + 1, rstart)?;
            x = self.alloc_expr(
                Expr::Binary {
                    left: x,
                    op,
                    right,
                },
                start,
            );
        }
        Ok(x)
    }

    fn unary(&mut self) -> PResult<ExprId> {
        let start = self.start();
        let op = match self.peek() {
            Some(Tok::Plus) => UnaryOp::Add,
            Some(Tok::Minus) => UnaryOp::Sub,
            Some(Tok::Bang) => UnaryOp::Not,
            Some(Tok::Caret) => UnaryOp::Xor,
            Some(Tok::Star) => UnaryOp::Deref,
            Some(Tok::Amp) => UnaryOp::Addr,
            Some(Tok::Arrow) if self.peek_at(1) != Some(Tok::KwChan) => UnaryOp::Recv,
            _ => {
                return match self.primary()? {
                    Operand::Expr(e) => Ok(e),
                    Operand::Type(_) => Err(Diag::parse(
                        self.span_from(start),
                        "type is not an expression",
                    )),
                };
            }
        };
        self.bump();
        let expr = self.unary()?;
        Ok(self.alloc_expr(Expr::Unary { op, expr }, start))
    }

    /// Call arguments and parenthesized operands may name a type.
    fn expr_or_type(&mut self) -> PResult<ExprOrType> {
        let type_literal = matches!(
            self.peek(),
            Some(Tok::LBrack | Tok::KwMap | Tok::KwChan | Tok::KwStruct | Tok::KwInterface)
        ) || (self.at(Tok::Arrow) && self.peek_at(1) == Some(Tok::KwChan));
        if !type_literal {
            return Ok(ExprOrType::Expr(self.expr()?));
        }
        let start = self.start();
        match self.primary()? {
            Operand::Type(t) => Ok(ExprOrType::Type(t)),
            Operand::Expr(e) => Ok(ExprOrType::Expr(self.binary_from(e, 1, start)?)),
        }
    }

    fn operand(&mut self) -> PResult<Operand> {
        let start = self.start();
        let Some((l, tok, r)) = self.toks.get(self.pos).copied() else {
            return Err(self.unexpected("expression"));
        };
        let lit = |kind| Expr::BasicLit(BasicLit {
            kind,
            raw: Span::new(l, r),
        });
        let e = match tok {
            Tok::Ident(_) => Expr::Ident(self.ident()?),
            Tok::IntLit(_) => {
                self.bump();
                lit(BasicLitKind::Int)
            }
            Tok::FloatLit(_) => {
                self.bump();
                lit(BasicLitKind::Float)
            }
            Tok::ImagLit(_) => {
                self.bump();
                lit(BasicLitKind::Imag)
            }
            Tok::RuneLit(_) => {
                self.bump();
                lit(BasicLitKind::Rune)
            }
            Tok::StringLit(_) | Tok::RawStringLit(_) => {
                self.bump();
                lit(BasicLitKind::String)
            }
            Tok::LParen => {
                self.bump();
                let inner = self.with_lev(self.expr_lev + 1, |p| p.expr_or_type())?;
                self.expect(Tok::RParen)?;
                match inner {
                    ExprOrType::Expr(e) => Expr::Paren(e),
                    ExprOrType::Type(t) => {
                        return Ok(Operand::Type(self.alloc_type(Type::Paren(t), start)));
                    }
                }
            }
            Tok::KwFunc => {
                self.bump();
                let sig = self.signature()?;
                if self.at(Tok::LBrace) {
                    let body = self.with_lev(self.expr_lev + 1, |p| p.block())?;
                    Expr::FuncLit { sig, body }
                } else {
                    return Ok(Operand::Type(self.alloc_type(Type::Func(sig), start)));
                }
            }
            Tok::LBrack | Tok::KwMap | Tok::KwChan | Tok::KwStruct | Tok::KwInterface | Tok::Arrow => {
                return Ok(Operand::Type(self.typ()?));
            }
            _ => return Err(self.unexpected("expression")),
        };
        Ok(Operand::Expr(self.alloc_expr(e, start)))
    }

    fn primary(&mut self) -> PResult<Operand> {
        let start = self.start();
        let mut x = match self.operand()? {
            Operand::Expr(e) => e,
            Operand::Type(t) => match self.peek() {
                Some(Tok::LBrace) => self.composite_lit(t, start)?,
                Some(Tok::LParen) => self.call(CallCallee::Type(t), start)?,
                _ => return Ok(Operand::Type(t)),
            },
        };

        loop {
            match self.peek() {
                Some(Tok::Dot) => {
                    self.bump();
                    if self.eat(Tok::LParen) {
                        let typ = if self.eat(Tok::KwType) {
                            None
                        } else {
                            Some(self.typ()?)
                        };
                        self.expect(Tok::RParen)?;
                        x = self.alloc_expr(Expr::TypeAssert { expr: x, typ }, start);
                    } else {
                        let sel = self.ident()?;
                        x = self.alloc_expr(Expr::Selector { expr: x, sel }, start);
                    }
                }
                Some(Tok::LBrack) => {
                    self.bump();
                    x = self.with_lev(self.expr_lev + 1, |p| p.index_or_slice(x, start))?;
                }
                Some(Tok::LParen) => x = self.call(CallCallee::Expr(x), start)?,
                Some(Tok::LBrace) if self.is_literal_type(x) => {
                    let Some(t) = self.arena.expr_to_type(x) else {
                        break;
                    };
                    x = self.composite_lit(t, start)?;
                }
                _ => break,
            }
        }
        Ok(Operand::Expr(x))
    }

    fn is_literal_type(&self, x: ExprId) -> bool {
        if self.expr_lev < 0 {
            return false;
        }
        match self.arena.exprs[x] {
            Expr::Ident(_) => true,
            Expr::Selector { expr, .. } => matches!(self.arena.exprs[expr], Expr::Ident(_)),
            _ => false,
        }
    }

    fn index_or_slice(&mut self, base: ExprId, start: usize) -> PResult<ExprId> {
        let lo = if self.at(Tok::Colon) {
            None
        } else {
            Some(self.expr_or_type()?)
        };
        if self.eat(Tok::Colon) {
            let lo = match lo {
                Some(ExprOrType::Expr(e)) => Some(e),
                Some(ExprOrType::Type(_)) => return Err(self.unexpected("slice index")),
                None => None,
            };
            let hi = if matches!(self.peek(), Some(Tok::Colon | Tok::RBrack)) {
                None
            } else {
                Some(self.expr()?)
            };
            let max = if self.eat(Tok::Colon) {
                Some(self.expr()?)
            } else {
                None
            };
            self.expect(Tok::RBrack)?;
            return Ok(self.alloc_expr(
                Expr::Slice {
                    expr: base,
                    lo,
                    hi,
                    max,
                },
                start,
            ));
        }

        let Some(first) = lo else {
            return Err(self.unexpected("index"));
        };
        let mut args = vec![first];
        while self.eat(Tok::Comma) {
            if self.at(Tok::RBrack) {
                break;
            }
            args.push(self.expr_or_type()?);
        }
        self.expect(Tok::RBrack)?;
        let args = self.arena.list_expr_or_types(args);
        Ok(self.alloc_expr(Expr::Index { base, args }, start))
    }

    fn call(&mut self, callee: CallCallee, start: usize) -> PResult<ExprId> {
        self.expect(Tok::LParen)?;
        let (args, ellipsis) = self.with_lev(self.expr_lev + 1, |p| {
            let mut args = Vec::new();
            let mut ellipsis = false;
            while !p.at(Tok::RParen) {
                args.push(p.expr_or_type()?);
                ellipsis = p.eat(Tok::Ellipsis);
                if !p.eat(Tok::Comma) {
                    break;
                }
            }
            Ok((args, ellipsis))
        })?;
        self.expect(Tok::RParen)?;
        let args = self.arena.list_expr_or_types(args);
        Ok(self.alloc_expr(
            Expr::Call {
                callee,
                args,
                ellipsis,
            },
            start,
        ))
    }

    fn composite_lit(&mut self, typ: TypeId, start: usize) -> PResult<ExprId> {
        let elts = self.literal_value()?;
        Ok(self.alloc_expr(Expr::CompositeLit { typ, elts }, start))
    }

    fn literal_value(&mut self) -> PResult<ListRef<KeyedElement>> {
        self.expect(Tok::LBrace)?;
        let elts = self.with_lev(self.expr_lev.max(0) + 1, |p| {
            let mut elts = Vec::new();
            while !p.at(Tok::RBrace) {
                let first = p.element()?;
                let elt = if p.eat(Tok::Colon) {
                    KeyedElement {
                        key: Some(first),
                        value: p.element()?,
                    }
                } else {
                    KeyedElement {
                        key: None,
                        value: first,
                    }
                };
                elts.push(elt);
                if !p.eat(Tok::Comma) {
                    break;
                }
            }
            Ok(elts)
        })?;
        self.expect(Tok::RBrace)?;
        Ok(self.arena.list_keyed_elems(elts))
    }

    fn element(&mut self) -> PResult<Element> {
        if self.at(Tok::LBrace) {
            Ok(Element::Literal(self.literal_value()?))
        } else {
            Ok(Element::Expr(self.expr()?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precedence_builds_left_leaning_tree() {
        let (a, e) = parse_expr("a + b*c - d").unwrap();
        let Expr::Binary { left, op, .. } = a.exprs[e] else {
            panic!("expected binary expression");
        };
        assert_eq!(op, BinaryOp::Sub);
        assert!(matches!(
            a.exprs[left],
            Expr::Binary {
                op: BinaryOp::Add,
                ..
            }
        ));
    }

    #[test]
    fn composite_literal_not_taken_in_if_header() {
        let src = "package p\nfunc f() {\n\tif x == y {\n\t}\n}\n";
        assert!(parse_source(src).is_ok());
    }

    #[test]
    fn reports_unexpected_token() {
        let err = parse_source("package p\nfunc (\n").unwrap_err();
        assert_eq!(err.diags.len(), 1);
        assert!(err.diags[0].message.contains("unexpected"));
    }
}
