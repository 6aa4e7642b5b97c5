//! Go syntax tree, lexer, parser and gofmt-style printer.
//!
//! - Lexer uses Logos and implements Go semicolon insertion.
//! - Parser is hand-written recursive descent over the token stream.
//! - Printer renders any `ast::Node` back to Go source.

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod parser_support;
pub mod printer;
pub mod walk;

pub use ast::{AstArena, Node};
pub use error::{Diag, ParseFailure, PrintError};
pub use lexer::Lexer;
pub use parser::{parse_expr, parse_source, ParsedFile};
pub use printer::{print_node, Printer, PrinterConfig};
