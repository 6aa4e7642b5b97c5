//! Helpers shared by the parser's grammar routines.

use crate::ast::{self, Ident, Span};

/// One comma-separated entry of a parameter list before grouping.
///
/// `a, b int` arrives as two entries: `a` without a type and `b int`.
#[derive(Clone, Debug)]
pub struct ParamDecl {
    pub names: Vec<(Ident, Span)>,
    pub variadic: bool,
    pub typ: Option<ast::TypeId>,
    pub span: Span,
}

/// Folds bare names into the next typed entry, as Go does for `a, b int`.
///
/// Names still pending at the end of the list were types all along
/// (`func(int, string)`), so each becomes an anonymous field.
pub fn resolve_param_list(
    arena: &mut ast::AstArena,
    params: Vec<ParamDecl>,
) -> Vec<ast::FieldId> {
    let mut out = Vec::new();
    let mut pending_names: Vec<(Ident, Span)> = Vec::new();
    let mut pending_start: Option<u32> = None;

    for param in params {
        if let Some(typ) = param.typ {
            let mut names = std::mem::take(&mut pending_names);
            names.extend(param.names);

            let names_ref = arena.list_idents(names.into_iter().map(|(sym, _)| sym));
            let start = pending_start.take().unwrap_or(param.span.start);
            let span = Span {
                start,
                end: param.span.end,
            };
            let field = ast::Field {
                names: names_ref,
                variadic: param.variadic,
                typ,
                tag: None,
            };
            out.push(arena.fields.alloc(field, span));
        } else {
            if pending_names.is_empty() {
                pending_start = Some(param.span.start);
            }
            pending_names.extend(param.names);
        }
    }

    for (name, span) in pending_names {
        let typ = arena.types.alloc(ast::Type::Named { pkg: None, name }, span);
        let field = ast::Field {
            names: ast::ListRef::EMPTY,
            variadic: false,
            typ,
            tag: None,
        };
        out.push(arena.fields.alloc(field, span));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{AstArena, Type};

    fn bare(a: &mut AstArena, name: &str) -> ParamDecl {
        ParamDecl {
            names: vec![(a.intern(name), Span::default())],
            variadic: false,
            typ: None,
            span: Span::default(),
        }
    }

    #[test]
    fn groups_leading_names_with_type() {
        let mut a = AstArena::new();
        let x = bare(&mut a, "x");
        let mut y = bare(&mut a, "y");
        let int = a.intern("int");
        y.typ = Some(a.types.alloc(Type::Named { pkg: None, name: int }, Span::default()));

        let fields = resolve_param_list(&mut a, vec![x, y]);
        assert_eq!(fields.len(), 1);
        let names: Vec<_> = a
            .idents(a.fields[fields[0]].names)
            .iter()
            .map(|s| a.name(*s).to_owned())
            .collect();
        assert_eq!(names, ["x", "y"]);
    }

    #[test]
    fn trailing_bare_names_are_types() {
        let mut a = AstArena::new();
        let params = vec![bare(&mut a, "int"), bare(&mut a, "string")];
        let fields = resolve_param_list(&mut a, params);
        assert_eq!(fields.len(), 2);
        assert!(fields.iter().all(|f| a.fields[*f].names.is_empty()));
    }
}
