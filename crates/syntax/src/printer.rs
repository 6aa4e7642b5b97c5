//! gofmt-style rendering of an `AstArena` tree.
//!
//! Expression spacing follows go/printer: blanks around a binary operator
//! depend on the operator mix and nesting depth, so `a + b*c` prints the way
//! gofmt prints it. Parentheses are inserted wherever the tree's shape
//! requires them. Column alignment of struct fields is not reproduced.

use crate::ast::*;
use crate::error::PrintError;

type PResult = Result<(), PrintError>;

const LOWEST_PREC: u8 = 0;
const UNARY_PREC: u8 = 6;
const PRIMARY_PREC: u8 = 7;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrinterConfig {
    /// Indent with this many spaces instead of a tab.
    pub spaces: Option<usize>,
    /// End a printed file with a newline.
    pub trailing_newline: bool,
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self {
            spaces: None,
            trailing_newline: true,
        }
    }
}

/// Renders `node` with the default configuration.
pub fn print_node(arena: &AstArena, node: Node) -> Result<String, PrintError> {
    Printer::new(arena, PrinterConfig::default()).print(node)
}

pub struct Printer<'a> {
    arena: &'a AstArena,
    config: PrinterConfig,
    out: String,
    indent: usize,
}

impl<'a> Printer<'a> {
    pub fn new(arena: &'a AstArena, config: PrinterConfig) -> Self {
        Self {
            arena,
            config,
            out: String::new(),
            indent: 0,
        }
    }

    pub fn print(mut self, node: Node) -> Result<String, PrintError> {
        match node {
            Node::Expr(e) => self.expr(e)?,
            Node::Type(t) => self.typ(t)?,
            Node::Stmt(s) => self.stmt(s)?,
            Node::Decl(d) => self.top_decl(d)?,
            Node::File(f) => self.file(&f)?,
        }
        Ok(self.out)
    }

    #[inline]
    fn w(&mut self, s: &str) {
        self.out.push_str(s);
    }

    fn newline(&mut self) {
        self.out.push('\n');
        for _ in 0..self.indent {
            match self.config.spaces {
                Some(n) => self.out.extend(std::iter::repeat_n(' ', n)),
                None => self.out.push('\t'),
            }
        }
    }

    fn name(&mut self, sym: Ident) {
        let arena = self.arena;
        self.w(arena.name(sym));
    }

    fn raw(&mut self, span: Span) {
        let arena = self.arena;
        self.w(arena.text(span));
    }

    fn idents(&mut self, list: ListRef<Ident>) {
        for (i, &sym) in self.arena.idents(list).iter().enumerate() {
            if i > 0 {
                self.w(", ");
            }
            self.name(sym);
        }
    }

    // =========================================================================
    // Files and declarations
    // =========================================================================

    fn file(&mut self, f: &SourceFile) -> PResult {
        self.w("package ");
        self.name(f.package);
        self.w("\n");
        for &d in self.arena.top_decls(f.decls) {
            self.w("\n");
            self.top_decl(d)?;
            self.w("\n");
        }
        if !self.config.trailing_newline && self.out.ends_with('\n') {
            self.out.pop();
        }
        Ok(())
    }

    fn top_decl(&mut self, d: TopLevelDecl) -> PResult {
        match d {
            TopLevelDecl::Decl(id) => self.decl(id),
            TopLevelDecl::Func(id) => self.func_decl(id),
        }
    }

    fn decl(&mut self, id: DeclId) -> PResult {
        let Decl::Gen(g) = self.arena.decls[id] else {
            return Err(PrintError::BadNode("declaration"));
        };
        self.w(g.kind.keyword());
        let specs = self.arena.specs_list(g.specs);
        if !g.grouped && specs.len() == 1 {
            self.w(" ");
            return self.spec(specs[0]);
        }
        self.w(" (");
        self.indent += 1;
        for &spec in specs {
            self.newline();
            self.spec(spec)?;
        }
        self.indent -= 1;
        if !specs.is_empty() {
            self.newline();
        }
        self.w(")");
        Ok(())
    }

    fn spec(&mut self, spec: Spec) -> PResult {
        match spec {
            Spec::Import(s) => {
                match s.name {
                    Some(ImportName::Dot) => self.w(". "),
                    Some(ImportName::Blank) => self.w("_ "),
                    Some(ImportName::Name(n)) => {
                        self.name(n);
                        self.w(" ");
                    }
                    None => {}
                }
                self.raw(s.path.raw);
            }
            Spec::Value(s) => {
                self.idents(s.names);
                if let Some(t) = s.typ {
                    self.w(" ");
                    self.typ(t)?;
                }
                if !s.values.is_empty() {
                    self.w(" = ");
                    self.expr_list(s.values, 1)?;
                }
            }
            Spec::Type(s) => {
                self.name(s.name);
                self.w(if s.alias { " = " } else { " " });
                self.typ(s.typ)?;
            }
        }
        Ok(())
    }

    fn func_decl(&mut self, id: FuncDeclId) -> PResult {
        let f = self.arena.funcs[id];
        self.w("func ");
        if let Some(recv) = f.recv {
            self.field_list(recv)?;
            self.w(" ");
        }
        self.name(f.name);
        self.signature(f.signature)?;
        if let Some(body) = f.body {
            self.w(" ");
            self.block(body)?;
        }
        Ok(())
    }

    fn signature(&mut self, id: SignatureId) -> PResult {
        let sig = self.arena.signatures[id];
        self.field_list(sig.params)?;
        let results = self.arena.fields_list(sig.results.fields);
        match results {
            [] => {}
            [single] if self.arena.fields[*single].names.is_empty() => {
                self.w(" ");
                self.typ(self.arena.fields[*single].typ)?;
            }
            _ => {
                self.w(" ");
                self.field_list(sig.results)?;
            }
        }
        Ok(())
    }

    fn field_list(&mut self, list: FieldList) -> PResult {
        self.w("(");
        for (i, &f) in self.arena.fields_list(list.fields).iter().enumerate() {
            if i > 0 {
                self.w(", ");
            }
            self.field(f)?;
        }
        self.w(")");
        Ok(())
    }

    fn field(&mut self, id: FieldId) -> PResult {
        let f = self.arena.fields[id];
        if !f.names.is_empty() {
            self.idents(f.names);
            self.w(" ");
        }
        if f.variadic {
            self.w("...");
        }
        self.typ(f.typ)?;
        if let Some(tag) = f.tag {
            self.w(" ");
            self.raw(tag.raw);
        }
        Ok(())
    }

    // =========================================================================
    // Types
    // =========================================================================

    fn typ(&mut self, id: TypeId) -> PResult {
        match self.arena.types[id] {
            Type::Named { pkg, name } => {
                if let Some(pkg) = pkg {
                    self.name(pkg);
                    self.w(".");
                }
                self.name(name);
            }
            Type::Pointer(t) => {
                self.w("*");
                self.typ(t)?;
            }
            Type::Array { len, elem } => {
                self.w("[");
                match len {
                    ArrayLen::Expr(e) => self.expr(e)?,
                    ArrayLen::Ellipsis => self.w("..."),
                }
                self.w("]");
                self.typ(elem)?;
            }
            Type::Slice(t) => {
                self.w("[]");
                self.typ(t)?;
            }
            Type::Map { key, val } => {
                self.w("map[");
                self.typ(key)?;
                self.w("]");
                self.typ(val)?;
            }
            Type::Chan { dir, elem } => {
                self.w(match dir {
                    ChanDir::Both => "chan ",
                    ChanDir::Send => "chan<- ",
                    ChanDir::Recv => "<-chan ",
                });
                self.typ(elem)?;
            }
            Type::Struct { fields } => {
                let fields = self.arena.fields_list(fields);
                if fields.is_empty() {
                    self.w("struct{}");
                    return Ok(());
                }
                self.w("struct {");
                self.indent += 1;
                for &f in fields {
                    self.newline();
                    self.field(f)?;
                }
                self.indent -= 1;
                self.newline();
                self.w("}");
            }
            Type::Interface { elems } => {
                let elems = self.arena.interface_elems(elems);
                if elems.is_empty() {
                    self.w("interface{}");
                    return Ok(());
                }
                self.w("interface {");
                self.indent += 1;
                for &e in elems {
                    self.newline();
                    match e {
                        InterfaceElem::Method { name, sig } => {
                            self.name(name);
                            self.signature(sig)?;
                        }
                        InterfaceElem::Embed(t) => self.typ(t)?,
                    }
                }
                self.indent -= 1;
                self.newline();
                self.w("}");
            }
            Type::Func(sig) => {
                self.w("func");
                self.signature(sig)?;
            }
            Type::Paren(t) => {
                self.w("(");
                self.typ(t)?;
                self.w(")");
            }
            Type::Bad => return Err(PrintError::BadNode("type")),
        }
        Ok(())
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn block(&mut self, b: Block) -> PResult {
        self.w("{");
        self.stmt_lines(b.stmts)?;
        self.newline();
        self.w("}");
        Ok(())
    }

    /// Statements one per line, one level deeper than the current indent.
    fn stmt_lines(&mut self, stmts: ListRef<StmtId>) -> PResult {
        self.indent += 1;
        for &s in self.arena.stmts_list(stmts) {
            if let Stmt::Labeled { .. } = self.arena.stmts[s] {
                self.stmt(s)?;
            } else {
                self.newline();
                self.stmt(s)?;
            }
        }
        self.indent -= 1;
        Ok(())
    }

    fn stmt(&mut self, id: StmtId) -> PResult {
        match self.arena.stmts[id] {
            Stmt::Simple(s) => self.simple_stmt(s)?,
            Stmt::Decl(d) => self.decl(d)?,
            Stmt::Labeled { label, stmt } => {
                // Labels sit one level left of the statement they mark.
                self.indent = self.indent.saturating_sub(1);
                self.newline();
                self.name(label);
                self.w(":");
                self.indent += 1;
                self.newline();
                self.stmt(stmt)?;
            }
            Stmt::Go(e) => {
                self.w("go ");
                self.expr(e)?;
            }
            Stmt::Defer(e) => {
                self.w("defer ");
                self.expr(e)?;
            }
            Stmt::Return(results) => {
                self.w("return");
                if !results.is_empty() {
                    self.w(" ");
                    self.expr_list(results, 1)?;
                }
            }
            Stmt::Branch { kind, label } => {
                self.w(kind.keyword());
                if let Some(l) = label {
                    self.w(" ");
                    self.name(l);
                }
            }
            Stmt::Block(b) => self.block(b)?,
            Stmt::If {
                init,
                cond,
                then_block,
                else_stmt,
            } => {
                self.w("if ");
                if let Some(init) = init {
                    self.simple_stmt(init)?;
                    self.w("; ");
                }
                self.expr(cond)?;
                self.w(" ");
                self.block(then_block)?;
                if let Some(e) = else_stmt {
                    self.w(" else ");
                    self.stmt(e)?;
                }
            }
            Stmt::For { kind, block } => {
                self.w("for ");
                match kind {
                    ForKind::Infinite => {}
                    ForKind::Cond(c) => {
                        self.expr(c)?;
                        self.w(" ");
                    }
                    ForKind::ForClause { init, cond, post } => {
                        if let Some(s) = init {
                            self.simple_stmt(s)?;
                        }
                        self.w("; ");
                        if let Some(c) = cond {
                            self.expr(c)?;
                        }
                        self.w("; ");
                        if let Some(s) = post {
                            self.simple_stmt(s)?;
                            self.w(" ");
                        }
                    }
                    ForKind::Range { lhs, expr } => {
                        if let Some(lhs) = lhs {
                            self.expr_list(lhs.exprs, 1)?;
                            self.w(if lhs.define { " := " } else { " = " });
                        }
                        self.w("range ");
                        self.expr(expr)?;
                        self.w(" ");
                    }
                }
                self.block(block)?;
            }
            Stmt::Switch { init, tag, clauses } => {
                self.w("switch ");
                if let Some(init) = init {
                    self.simple_stmt(init)?;
                    self.w("; ");
                }
                if let Some(tag) = tag {
                    self.expr(tag)?;
                    self.w(" ");
                }
                self.switch_body(clauses)?;
            }
            Stmt::TypeSwitch {
                init,
                guard,
                clauses,
            } => {
                self.w("switch ");
                if let Some(init) = init {
                    self.simple_stmt(init)?;
                    self.w("; ");
                }
                if let Some(bind) = guard.bind {
                    self.name(bind);
                    self.w(" := ");
                }
                self.expr1(guard.x, PRIMARY_PREC, 1)?;
                self.w(".(type) ");
                self.switch_body(clauses)?;
            }
            Stmt::Select { clauses } => {
                self.w("select {");
                for &c in self.arena.comm_clause_ids(clauses) {
                    let clause = self.arena.comm_clauses[c];
                    self.newline();
                    match clause.comm {
                        Some(s) => {
                            self.w("case ");
                            self.simple_stmt(s)?;
                            self.w(":");
                        }
                        None => self.w("default:"),
                    }
                    self.stmt_lines(clause.stmts)?;
                }
                self.newline();
                self.w("}");
            }
            Stmt::Bad => return Err(PrintError::BadNode("statement")),
        }
        Ok(())
    }

    fn switch_body(&mut self, clauses: ListRef<SwitchClauseId>) -> PResult {
        self.w("{");
        for &c in self.arena.switch_clause_ids(clauses) {
            self.newline();
            let stmts = match self.arena.switch_clauses[c] {
                SwitchClause::ExprCase { items, stmts } => {
                    if items.is_empty() {
                        self.w("default:");
                    } else {
                        self.w("case ");
                        self.expr_list(items, 1)?;
                        self.w(":");
                    }
                    stmts
                }
                SwitchClause::TypeCase { items, stmts } => {
                    if items.is_empty() {
                        self.w("default:");
                    } else {
                        self.w("case ");
                        for (i, &item) in self.arena.type_case_elems(items).iter().enumerate() {
                            if i > 0 {
                                self.w(", ");
                            }
                            match item {
                                TypeCaseElem::Type(t) => self.typ(t)?,
                                TypeCaseElem::Nil => self.w("nil"),
                            }
                        }
                        self.w(":");
                    }
                    stmts
                }
            };
            self.stmt_lines(stmts)?;
        }
        self.newline();
        self.w("}");
        Ok(())
    }

    fn simple_stmt(&mut self, id: SimpleStmtId) -> PResult {
        match self.arena.simple_stmts[id] {
            SimpleStmt::Empty => {}
            SimpleStmt::Expr(e) => self.expr(e)?,
            SimpleStmt::Send { chan, value } => {
                self.expr(chan)?;
                self.w(" <- ");
                self.expr(value)?;
            }
            SimpleStmt::IncDec { expr, op } => {
                self.expr1(expr, PRIMARY_PREC, 1)?;
                self.w(op.as_str());
            }
            SimpleStmt::Assign { lhs, op, rhs } => {
                if op == AssignOp::Illegal {
                    return Err(PrintError::IllegalOperator {
                        context: "assignment",
                    });
                }
                let depth = if lhs.len() > 1 && rhs.len() > 1 { 2 } else { 1 };
                self.expr_list(lhs, depth)?;
                self.w(" ");
                self.w(op.as_str());
                self.w(" ");
                self.expr_list(rhs, depth)?;
            }
        }
        Ok(())
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn expr(&mut self, id: ExprId) -> PResult {
        self.expr1(id, LOWEST_PREC, 1)
    }

    fn expr_list(&mut self, list: ListRef<ExprId>, depth: u32) -> PResult {
        for (i, &e) in self.arena.exprs_list(list).iter().enumerate() {
            if i > 0 {
                self.w(", ");
            }
            self.expr1(e, LOWEST_PREC, depth)?;
        }
        Ok(())
    }

    fn expr_or_type(&mut self, x: ExprOrType, depth: u32) -> PResult {
        match x {
            ExprOrType::Expr(e) => self.expr1(e, LOWEST_PREC, depth),
            ExprOrType::Type(t) => self.typ(t),
        }
    }

    fn expr1(&mut self, id: ExprId, prec1: u8, depth: u32) -> PResult {
        let depth = depth.max(1);
        match self.arena.exprs[id] {
            Expr::Ident(sym) => self.name(sym),
            Expr::BasicLit(lit) => self.raw(lit.raw),
            Expr::FuncLit { sig, body } => {
                self.w("func");
                self.signature(sig)?;
                self.w(" ");
                self.block(body)?;
            }
            Expr::CompositeLit { typ, elts } => {
                self.typ(typ)?;
                self.literal_value(elts, depth)?;
            }
            Expr::Index { base, args } => {
                self.expr1(base, PRIMARY_PREC, 1)?;
                self.w("[");
                for (i, &a) in self.arena.expr_or_types(args).iter().enumerate() {
                    if i > 0 {
                        self.w(", ");
                    }
                    self.expr_or_type(a, depth + 1)?;
                }
                self.w("]");
            }
            Expr::Paren(inner) => {
                self.w("(");
                self.expr1(inner, LOWEST_PREC, depth.saturating_sub(1))?;
                self.w(")");
            }
            Expr::Selector { expr, sel } => {
                self.expr1(expr, PRIMARY_PREC, depth)?;
                self.w(".");
                self.name(sel);
            }
            Expr::Slice { expr, lo, hi, max } => {
                self.expr1(expr, PRIMARY_PREC, 1)?;
                self.w("[");
                let indices = [Some(lo), Some(hi), max.map(Some)];
                let indices: Vec<Option<ExprId>> = indices.into_iter().flatten().collect();
                let present = indices.iter().flatten().count();
                let has_binary = indices
                    .iter()
                    .flatten()
                    .any(|&e| matches!(self.arena.exprs[e], Expr::Binary { .. }));
                let blanks = depth <= 1 && present > 1 && has_binary;
                for (i, &x) in indices.iter().enumerate() {
                    if i > 0 {
                        if indices[i - 1].is_some() && blanks {
                            self.w(" ");
                        }
                        self.w(":");
                        if x.is_some() && blanks {
                            self.w(" ");
                        }
                    }
                    if let Some(x) = x {
                        self.expr1(x, LOWEST_PREC, depth + 1)?;
                    }
                }
                self.w("]");
            }
            Expr::TypeAssert { expr, typ } => {
                self.expr1(expr, PRIMARY_PREC, 1)?;
                self.w(".(");
                match typ {
                    Some(t) => self.typ(t)?,
                    None => self.w("type"),
                }
                self.w(")");
            }
            Expr::Call {
                callee,
                args,
                ellipsis,
            } => {
                let args_list = self.arena.expr_or_types(args);
                let depth = if args_list.len() > 1 { depth + 1 } else { depth };
                match callee {
                    CallCallee::Expr(f) => self.expr1(f, PRIMARY_PREC, depth)?,
                    CallCallee::Type(t) => {
                        let wrap = matches!(
                            self.arena.types[t],
                            Type::Func(_) | Type::Pointer(_) | Type::Chan { dir: ChanDir::Recv, .. }
                        );
                        if wrap {
                            self.w("(");
                        }
                        self.typ(t)?;
                        if wrap {
                            self.w(")");
                        }
                    }
                }
                self.w("(");
                for (i, &a) in args_list.iter().enumerate() {
                    if i > 0 {
                        self.w(", ");
                    }
                    self.expr_or_type(a, depth)?;
                }
                if ellipsis {
                    self.w("...");
                }
                self.w(")");
            }
            Expr::Unary { op, expr } => {
                if op == UnaryOp::Illegal {
                    return Err(PrintError::IllegalOperator { context: "unary" });
                }
                if UNARY_PREC < prec1 {
                    self.w("(");
                    self.expr1(id, LOWEST_PREC, depth)?;
                    self.w(")");
                } else {
                    self.w(op.as_str());
                    if let Expr::Unary { op: inner, .. } = self.arena.exprs[expr] {
                        if tokens_combine(op.as_str(), inner.as_str()) {
                            self.w(" ");
                        }
                    }
                    self.expr1(expr, UNARY_PREC, depth)?;
                }
            }
            Expr::Binary { op, .. } => {
                if op == BinaryOp::Illegal {
                    return Err(PrintError::IllegalOperator { context: "binary" });
                }
                let cutoff = self.cutoff(id, depth);
                self.binary(id, prec1, cutoff, depth)?;
            }
            Expr::Bad => return Err(PrintError::BadNode("expression")),
        }
        Ok(())
    }

    fn literal_value(&mut self, elts: ListRef<KeyedElement>, depth: u32) -> PResult {
        self.w("{");
        for (i, &kv) in self.arena.keyed_elems_list(elts).iter().enumerate() {
            if i > 0 {
                self.w(", ");
            }
            if let Some(key) = kv.key {
                self.element(key, depth)?;
                self.w(": ");
            }
            self.element(kv.value, depth)?;
        }
        self.w("}");
        Ok(())
    }

    fn element(&mut self, e: Element, depth: u32) -> PResult {
        match e {
            Element::Expr(x) => self.expr1(x, LOWEST_PREC, depth),
            Element::Literal(elts) => self.literal_value(elts, depth),
        }
    }

    fn binary(&mut self, id: ExprId, prec1: u8, cutoff: u8, depth: u32) -> PResult {
        let Expr::Binary { left, op, right } = self.arena.exprs[id] else {
            return self.expr1(id, prec1, depth);
        };
        let prec = op.precedence();
        if prec < prec1 {
            // Parentheses undo one level of depth.
            let inner = depth.saturating_sub(1).max(1);
            self.w("(");
            let cutoff = self.cutoff(id, inner);
            self.binary(id, LOWEST_PREC, cutoff, inner)?;
            self.w(")");
            return Ok(());
        }

        let blank = prec < cutoff;
        self.expr1(left, prec, depth + self.diff_prec(left, prec))?;
        if blank {
            self.w(" ");
        }
        self.w(op.as_str());
        if blank {
            self.w(" ");
        }
        self.expr1(right, prec + 1, depth + 1)
    }

    /// Precedence at or above which operators print without blanks.
    fn cutoff(&self, id: ExprId, depth: u32) -> u8 {
        let (has4, has5, max_problem) = self.walk_binary(id);
        if max_problem > 0 {
            return max_problem + 1;
        }
        match (has4 && has5, depth == 1) {
            (true, true) => 5,
            (true, false) => 4,
            (false, true) => 6,
            (false, false) => 4,
        }
    }

    fn diff_prec(&self, x: ExprId, prec: u8) -> u32 {
        match self.arena.exprs[x] {
            Expr::Binary { op, .. } if op.precedence() == prec => 0,
            _ => 1,
        }
    }

    /// Scans the operator chain printed without parentheses for precedence
    /// 4 and 5 operators, and for operator pairs that would fuse when
    /// printed without a blank (`x / *p`, `x & &y`).
    fn walk_binary(&self, id: ExprId) -> (bool, bool, u8) {
        let Expr::Binary { left, op, right } = self.arena.exprs[id] else {
            return (false, false, 0);
        };
        let prec = op.precedence();
        let mut has4 = prec == 4;
        let mut has5 = prec == 5;
        let mut max_problem = 0;

        if let Expr::Binary { op: lop, .. } = self.arena.exprs[left] {
            if lop.precedence() >= prec {
                let (h4, h5, mp) = self.walk_binary(left);
                has4 |= h4;
                has5 |= h5;
                max_problem = max_problem.max(mp);
            }
        }

        match self.arena.exprs[right] {
            Expr::Binary { op: rop, .. } => {
                if rop.precedence() > prec {
                    let (h4, h5, mp) = self.walk_binary(right);
                    has4 |= h4;
                    has5 |= h5;
                    max_problem = max_problem.max(mp);
                }
            }
            Expr::Unary { op: rop, .. } => match (op.as_str(), rop.as_str()) {
                ("/", "*") | ("&", "&") | ("&", "^") => max_problem = 5,
                ("+", "+") | ("-", "-") => max_problem = max_problem.max(4),
                _ => {}
            },
            _ => {}
        }
        (has4, has5, max_problem)
    }
}

/// Adjacent operator tokens that would lex as a different token.
fn tokens_combine(prev: &str, next: &str) -> bool {
    matches!(
        (prev.as_bytes().last(), next.as_bytes().first()),
        (Some(b'-'), Some(b'-'))
            | (Some(b'+'), Some(b'+'))
            | (Some(b'&'), Some(b'^' | b'&'))
            | (Some(b'<'), Some(b'-'))
    )
}

/// Quotes `s` as a Go interpreted string literal.
pub fn quote_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        push_escaped(&mut out, c, '"');
    }
    out.push('"');
    out
}

/// Quotes `c` as a Go rune literal.
pub fn quote_rune(c: char) -> String {
    let mut out = String::with_capacity(4);
    out.push('\'');
    push_escaped(&mut out, c, '\'');
    out.push('\'');
    out
}

fn push_escaped(out: &mut String, c: char, quote: char) {
    use std::fmt::Write as _;
    match c {
        '\x07' => out.push_str("\\a"),
        '\x08' => out.push_str("\\b"),
        '\x0c' => out.push_str("\\f"),
        '\n' => out.push_str("\\n"),
        '\r' => out.push_str("\\r"),
        '\t' => out.push_str("\\t"),
        '\x0b' => out.push_str("\\v"),
        '\\' => out.push_str("\\\\"),
        c if c == quote => {
            out.push('\\');
            out.push(c);
        }
        c if (c as u32) < 0x20 || c == '\x7f' => {
            let _ = write!(out, "\\x{:02x}", c as u32);
        }
        c if c.is_control() => {
            if (c as u32) <= 0xFFFF {
                let _ = write!(out, "\\u{:04x}", c as u32);
            } else {
                let _ = write!(out, "\\U{:08x}", c as u32);
            }
        }
        c => out.push(c),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_expr;

    fn reprint(src: &str) -> String {
        let (arena, e) = parse_expr(src).unwrap();
        print_node(&arena, Node::Expr(e)).unwrap()
    }

    #[test]
    fn spacing_follows_operator_mix() {
        assert_eq!(reprint("a+b*c"), "a + b*c");
        assert_eq!(reprint("x<y"), "x < y");
        assert_eq!(reprint("f(a+b, c)"), "f(a+b, c)");
        assert_eq!(reprint("x / *p"), "x / *p");
    }

    #[test]
    fn quoting_matches_go() {
        assert_eq!(quote_string("a\"b\n"), r#""a\"b\n""#);
        assert_eq!(quote_rune('x'), "'x'");
        assert_eq!(quote_rune('\''), r"'\''");
        assert_eq!(quote_string("é"), "\"é\"");
    }
}
