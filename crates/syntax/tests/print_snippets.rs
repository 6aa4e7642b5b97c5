use gogen_syntax::ast::Node;
use gogen_syntax::parser::{parse_expr, parse_source};
use gogen_syntax::printer::{print_node, Printer, PrinterConfig};
use pretty_assertions::assert_eq;

fn reformat(src: &str) -> String {
    let parsed = parse_source(src).unwrap_or_else(|e| panic!("{e}: {:?}", e.diags));
    print_node(&parsed.arena, Node::File(parsed.file)).unwrap()
}

fn reformat_expr(src: &str) -> String {
    let (arena, e) = parse_expr(src).unwrap();
    print_node(&arena, Node::Expr(e)).unwrap()
}

const PROGRAM: &str = r#"package main

import (
	"fmt"
	"strings"
)

type Point struct {
	X int
	Y int
}

var origin = Point{X: 0, Y: 0}

func (p *Point) Scale(k int) {
	p.X *= k
	p.Y *= k
}

func sum(xs ...int) (total int) {
	for _, x := range xs {
		total += x
	}
	return
}

func main() {
	words := []string{"a", "b"}
	if n := len(words); n > 1 {
		fmt.Println(strings.Join(words, ", "))
	} else {
		fmt.Println("short")
	}
	switch x := sum(1, 2, 3); {
	case x > 5:
		fmt.Println(x)
	default:
	}
}
"#;

#[test]
fn gofmt_output_is_reproduced() {
    assert_eq!(reformat(PROGRAM), PROGRAM);
}

#[test]
fn statements_round_trip() {
    let src = r#"package p

func f(ch chan int, m map[string][]byte) error {
	defer close(ch)
	go func() {
		ch <- 1
	}()
	select {
	case v := <-ch:
		_ = v
	default:
	}
	switch t := any(m).(type) {
	case nil, int:
		return nil
	}
	for i := 0; i < 10; i++ {
		if i%2 == 0 {
			continue
		}
	}
	var err error
	return err
}
"#;
    assert_eq!(reformat(src), src);
}

#[test]
fn binary_spacing_matches_gofmt() {
    for (input, want) in [
        ("a*b+c*d", "a*b + c*d"),
        ("(a+b)*c", "(a + b) * c"),
        ("x[i+1]", "x[i+1]"),
        ("s[a+1:b]", "s[a+1 : b]"),
        ("-x+y", "-x + y"),
        ("x<y&&y<z", "x < y && y < z"),
    ] {
        assert_eq!(reformat_expr(input), want, "input={input}");
    }
}

#[test]
fn unformatted_input_is_normalized() {
    let src = "package p\nimport \"os\"\nfunc main(){os.Exit(1)}";
    assert_eq!(
        reformat(src),
        "package p\n\nimport \"os\"\n\nfunc main() {\n\tos.Exit(1)\n}\n"
    );
}

#[test]
fn space_indentation_is_configurable() {
    let parsed = parse_source("package p\nfunc f() {\n\tg()\n}\n").unwrap();
    let config = PrinterConfig {
        spaces: Some(4),
        ..PrinterConfig::default()
    };
    let out = Printer::new(&parsed.arena, config)
        .print(Node::File(parsed.file))
        .unwrap();
    assert_eq!(out, "package p\n\nfunc f() {\n    g()\n}\n");
}
