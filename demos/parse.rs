use std::env;

use gogen::{matches, Node};
use gogen_syntax::{parse_source, print_node};

/// Reformats a Go file and checks the result parses back to the same tree.
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let path = env::args().nth(1).unwrap_or_else(|| {
        eprintln!("usage: cargo run --example parse -- <file.go>");
        std::process::exit(2);
    });

    let src = match std::fs::read_to_string(&path) {
        Ok(src) => src,
        Err(e) => {
            eprintln!("{path}: {e}");
            std::process::exit(2);
        }
    };

    let parsed = match parse_source(&src) {
        Ok(parsed) => parsed,
        Err(f) => {
            eprintln!("parse failed");
            for d in &f.diags {
                eprintln!("{:?} {}..{}: {}", d.kind, d.span.start, d.span.end, d.message);
            }
            std::process::exit(1);
        }
    };

    let node = Node::File(parsed.file);
    let printed = match print_node(&parsed.arena, node) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("print failed: {e}");
            std::process::exit(1);
        }
    };
    print!("{printed}");

    match parse_source(&printed) {
        Ok(again) if matches(&parsed.arena, node, &again.arena, Node::File(again.file)) => {}
        Ok(_) => {
            eprintln!("reformatted tree differs from the original");
            std::process::exit(1);
        }
        Err(f) => {
            eprintln!("reformatted source does not parse: {f}");
            std::process::exit(1);
        }
    }
}
