//! Programmatic construction of Go syntax trees.
//!
//! - [`code`]: deferred builders (`Code`) and their combinators.
//! - [`scope`]: naming context for fresh identifiers and stashed values.
//! - [`matcher`]: structural equality between two trees.
//! - [`router`]: a `ServeHTTP` generator built on the above.
//!
//! Trees are the arena-based ones of [`gogen_syntax`], which also provides
//! the printer and a parser for obtaining expected trees.

pub mod code;
pub mod error;
pub mod matcher;
pub mod router;
pub mod scope;

pub use code::Code;
pub use error::Error;
pub use gogen_syntax::ast::{AstArena, Node};
pub use matcher::{matches, Matcher};
pub use scope::{Scope, StashKey};

use gogen_syntax::ast::TopLevelDecl;
use gogen_syntax::{parse_expr, parse_source, print_node};

/// Renders `code`, parses the text back and reports whether the reparsed
/// tree matches the built one.
///
/// Statements and declarations are reparsed inside a minimal file.
///
/// The printer parenthesizes operands whose precedence would otherwise
/// change the meaning of the text, as in `a - (b - c)` or `(a + b)()`.
/// Those parentheses come back as `Paren` nodes the built tree does not
/// have, so such trees report `Ok(false)`. Wrap the operand with
/// [`Code::paren`] to make the tree survive the round trip.
pub fn round_trip(code: &Code) -> Result<bool, Error> {
    let (built, node) = code.build();
    let text = print_node(&built, node)?;
    tracing::trace!(%text, "reparsing rendered code");

    let (parsed, reparsed) = match node {
        Node::File(_) => {
            let p = parse_source(&text)?;
            (p.arena, Node::File(p.file))
        }
        Node::Expr(_) => {
            let (arena, e) = parse_expr(&text)?;
            (arena, Node::Expr(e))
        }
        Node::Decl(_) => {
            let p = parse_source(&format!("package p\n\n{text}\n"))?;
            let decl = p.arena.top_decls(p.file.decls).first().copied();
            let decl = decl.ok_or(Error::Shape("declaration"))?;
            (p.arena, Node::Decl(decl))
        }
        Node::Stmt(_) => {
            let p = parse_source(&format!("package p\n\nfunc _() {{\n{text}\n}}\n"))?;
            let stmt = p
                .arena
                .top_decls(p.file.decls)
                .iter()
                .find_map(|d| match d {
                    TopLevelDecl::Func(f) => p.arena.funcs[*f].body,
                    TopLevelDecl::Decl(_) => None,
                })
                .and_then(|body| p.arena.stmts_list(body.stmts).first().copied())
                .ok_or(Error::Shape("statement"))?;
            (p.arena, Node::Stmt(stmt))
        }
        Node::Type(_) => return Err(Error::Shape("type")),
    };

    Ok(matches(&built, node, &parsed, reparsed))
}

