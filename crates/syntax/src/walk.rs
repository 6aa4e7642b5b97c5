//! Depth-first traversal over an `AstArena`.
//!
//! `Walk` is derived for every node type (see `ast_derive`). A `Visitor`
//! overrides the hooks it cares about and calls `walk` to descend.

use crate::ast::*;

pub trait Walk<'ast> {
    fn walk<V: Visitor<'ast> + ?Sized>(&self, a: &'ast AstArena, v: &mut V);
}

pub trait Visitor<'ast> {
    #[inline(always)]
    fn visit_source_file(&mut self, a: &'ast AstArena, f: &'ast SourceFile) {
        f.walk(a, self);
    }

    #[inline(always)]
    fn visit_decl(&mut self, a: &'ast AstArena, id: DeclId) {
        a.decls[id].walk(a, self);
    }

    #[inline(always)]
    fn visit_func_decl(&mut self, a: &'ast AstArena, id: FuncDeclId) {
        a.funcs[id].walk(a, self);
    }

    #[inline(always)]
    fn visit_stmt(&mut self, a: &'ast AstArena, id: StmtId) {
        a.stmts[id].walk(a, self);
    }

    #[inline(always)]
    fn visit_simple_stmt(&mut self, a: &'ast AstArena, id: SimpleStmtId) {
        a.simple_stmts[id].walk(a, self);
    }

    #[inline(always)]
    fn visit_expr(&mut self, a: &'ast AstArena, id: ExprId) {
        a.exprs[id].walk(a, self);
    }

    #[inline(always)]
    fn visit_type(&mut self, a: &'ast AstArena, id: TypeId) {
        a.types[id].walk(a, self);
    }

    #[inline(always)]
    fn visit_field(&mut self, a: &'ast AstArena, id: FieldId) {
        a.fields[id].walk(a, self);
    }

    #[inline(always)]
    fn visit_signature(&mut self, a: &'ast AstArena, id: SignatureId) {
        a.signatures[id].walk(a, self);
    }

    #[inline(always)]
    fn visit_switch_clause(&mut self, a: &'ast AstArena, id: SwitchClauseId) {
        a.switch_clauses[id].walk(a, self);
    }

    #[inline(always)]
    fn visit_comm_clause(&mut self, a: &'ast AstArena, id: CommClauseId) {
        a.comm_clauses[id].walk(a, self);
    }

    /// Called for every identifier occurrence: names, selectors, labels,
    /// package qualifiers and declared names alike.
    #[inline(always)]
    fn visit_ident(&mut self, _a: &'ast AstArena, _name: Ident) {}
}

/// Dispatches a `Node` handle to the matching visitor hook.
pub fn walk_node<'ast, V: Visitor<'ast> + ?Sized>(a: &'ast AstArena, node: Node, v: &mut V) {
    match node {
        Node::Expr(id) => v.visit_expr(a, id),
        Node::Type(id) => v.visit_type(a, id),
        Node::Stmt(id) => v.visit_stmt(a, id),
        Node::Decl(d) => d.walk(a, v),
        Node::File(f) => {
            f.package.walk(a, v);
            f.decls.walk(a, v);
        }
    }
}

macro_rules! impl_walk_for_ids {
    ($($id:ty => $visit:ident),* $(,)?) => {
        $(
            impl<'ast> Walk<'ast> for $id {
                #[inline(always)]
                fn walk<V: Visitor<'ast> + ?Sized>(&self, a: &'ast AstArena, v: &mut V) {
                    v.$visit(a, *self);
                }
            }
        )*
    };
}

impl_walk_for_ids! {
    DeclId => visit_decl,
    FuncDeclId => visit_func_decl,
    StmtId => visit_stmt,
    SimpleStmtId => visit_simple_stmt,
    ExprId => visit_expr,
    TypeId => visit_type,
    FieldId => visit_field,
    SignatureId => visit_signature,
    SwitchClauseId => visit_switch_clause,
    CommClauseId => visit_comm_clause,
    Symbol => visit_ident,
}

pub trait ListSlice<T> {
    fn slice(&self, r: ListRef<T>) -> &[T];
}

impl<'ast, T> Walk<'ast> for ListRef<T>
where
    AstArena: ListSlice<T>,
    T: Walk<'ast> + 'ast,
{
    #[inline(always)]
    fn walk<V: Visitor<'ast> + ?Sized>(&self, a: &'ast AstArena, v: &mut V) {
        for item in a.slice(*self) {
            item.walk(a, v);
        }
    }
}

macro_rules! impl_list_slice {
    ($($t:ty => $getter:ident),* $(,)?) => {
        $(
            impl ListSlice<$t> for AstArena {
                #[inline(always)]
                fn slice(&self, r: ListRef<$t>) -> &[$t] {
                    self.$getter(r)
                }
            }
        )*
    };
}

impl_list_slice! {
    Ident => idents,
    ExprId => exprs_list,
    StmtId => stmts_list,
    FieldId => fields_list,
    KeyedElement => keyed_elems_list,
    Spec => specs_list,
    TopLevelDecl => top_decls,
    SwitchClauseId => switch_clause_ids,
    CommClauseId => comm_clause_ids,
    TypeCaseElem => type_case_elems,
    InterfaceElem => interface_elems,
    ExprOrType => expr_or_types,
}

impl<'ast, T: Walk<'ast>> Walk<'ast> for Option<T> {
    #[inline(always)]
    fn walk<V: Visitor<'ast> + ?Sized>(&self, a: &'ast AstArena, v: &mut V) {
        if let Some(x) = self {
            x.walk(a, v);
        }
    }
}

impl<'ast> Walk<'ast> for Span {
    #[inline(always)]
    fn walk<V: Visitor<'ast> + ?Sized>(&self, _: &'ast AstArena, _: &mut V) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Names<'a>(Vec<&'a str>);

    impl<'ast> Visitor<'ast> for Names<'ast> {
        fn visit_ident(&mut self, a: &'ast AstArena, name: Ident) {
            self.0.push(a.name(name));
        }
    }

    #[test]
    fn visits_identifiers_in_order() {
        let mut a = AstArena::new();
        let x = a.ident_expr("x");
        let sel = a.intern("y");
        let left = a.exprs.alloc(Expr::Selector { expr: x, sel }, Span::default());
        let right = a.ident_expr("z");
        let bin = a.exprs.alloc(
            Expr::Binary {
                left,
                op: BinaryOp::Add,
                right,
            },
            Span::default(),
        );

        let mut names = Names(Vec::new());
        walk_node(&a, Node::Expr(bin), &mut names);
        assert_eq!(names.0, ["x", "y", "z"]);
    }
}
