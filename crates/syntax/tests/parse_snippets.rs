use gogen_syntax::ast::{Node, TopLevelDecl};
use gogen_syntax::parse_source;
use gogen_syntax::printer::print_node;

fn assert_parses(src: &str) {
    if let Err(f) = parse_source(src) {
        panic!("expected parse ok, got diagnostics: {:#?}", f.diags);
    }
}

#[test]
fn parses_imports_and_decls() {
    assert_parses(
        r#"
package main

import (
    "fmt"
    . "math"
    _ "net/http"
)

const (
    A = 1
    B int = 2
)

var (
    x = 1
    y, z int
)

type (
    T = int
    U struct { F T `json:"f"` }
    V interface {
        M(x int) int
        fmt.Stringer
    }
)

func main() {
    fmt.Println(Sqrt(4))
}
"#,
    );
}

#[test]
fn parses_statements() {
    assert_parses(
        r#"
package p

func f(x int) int {
    if x < 0 { return -x }
    for i := 0; i < 10; i++ {
        if i == 5 { break }
        continue
    }
    for range []int{1,2,3} {
    }
    switch x {
    case 0, 1:
        x++
    default:
        x = 3
    }
loop:
    for {
        break loop
    }
    select {
    case ch <- x:
        return x
    default:
        return 0
    }
}
"#,
    );
}

#[test]
fn parses_expressions() {
    assert_parses(
        r#"
package p

func f(a, b, c int, ch chan<- int) {
    _ = a + b*c - (a<<2)
    _ = a == b || a < c && b <= c
    _ = &a
    _ = <-ch
    _ = []int{1,2,3}[0]
    _ = []int{1,2,3}[1:]
    _ = []int{1,2,3}[:2]
    _ = []int{1,2,3}[0:2:3]
    _ = map[string]int{"a":1, "b":2}["a"]
    _ = f(a, b, c)
    _ = f(a, b, c...)
    _ = func(x int) int { return x }(1)
    _ = [...]string{"x"}
}
"#,
    );
}

#[test]
fn type_parameters_are_rejected() {
    assert!(parse_source("package p\nfunc f[T any](x T) {}\n").is_err());
}

#[test]
fn methods_keep_their_receiver() {
    let parsed = parse_source("package p\nfunc (s *S) Len() int { return 0 }\n").unwrap();
    let decls = parsed.arena.top_decls(parsed.file.decls);
    let TopLevelDecl::Func(f) = decls[0] else {
        panic!("expected a function");
    };
    assert!(parsed.arena.funcs[f].recv.is_some());
    let out = print_node(&parsed.arena, Node::Decl(decls[0])).unwrap();
    assert_eq!(out, "func (s *S) Len() int {\n\treturn 0\n}");
}
