use gogen::code::{ident, int, string};
use gogen::{matches, AstArena, Matcher, Node};
use gogen_syntax::{parse_expr, parse_source};
use proptest::prelude::*;

const FIXTURE: &str = include_str!("fixtures/inventory.go");

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn expr(src: &str) -> (AstArena, Node) {
    let (arena, e) = parse_expr(src).unwrap_or_else(|f| panic!("{src}: {f}"));
    (arena, Node::Expr(e))
}

fn same(l: &str, r: &str) -> bool {
    let (la, ln) = expr(l);
    let (ra, rn) = expr(r);
    matches(&la, ln, &ra, rn)
}

#[test]
fn a_file_parsed_twice_matches_itself() {
    init_tracing();
    let first = parse_source(FIXTURE).unwrap();
    let second = parse_source(FIXTURE).unwrap();
    assert!(matches(
        &first.arena,
        Node::File(first.file),
        &second.arena,
        Node::File(second.file),
    ));
}

#[test]
fn identical_handles_short_circuit() {
    let parsed = parse_source(FIXTURE).unwrap();
    let node = Node::File(parsed.file);
    assert!(Matcher::new(&parsed.arena, &parsed.arena).node(node, node));
}

#[test]
fn positions_and_layout_are_ignored() {
    assert!(same("a+b*c", "a + b * c"));
    assert!(same("f(x,\n y)", "f(x, y)"));
    let compact = parse_source("package p\nfunc f(){g()}").unwrap();
    let spread = parse_source("package p\n\n\nfunc f() {\n\n\tg()\n}\n").unwrap();
    assert!(matches(
        &compact.arena,
        Node::File(compact.file),
        &spread.arena,
        Node::File(spread.file)
    ));
}

#[test]
fn differences_are_detected() {
    init_tracing();
    for (l, r) in [
        ("x", "y"),
        ("x + y", "x - y"),
        ("f(x)", "f(x, y)"),
        ("f(x)", "f(x...)"),
        ("1", "1.0"),
        ("0x10", "16"),
        ("\"a\"", "`a`"),
        ("a.b", "a.c"),
        ("(x)", "x"),
        ("-x", "^x"),
        ("s[1:2]", "s[1:2:3]"),
        ("[]int{1}", "[]int{1, 2}"),
        ("map[string]int{}", "map[string]bool{}"),
        ("x.(T)", "x.(*T)"),
        ("<-ch", "ch"),
    ] {
        assert!(!same(l, r), "{l} vs {r}");
        assert!(!same(r, l), "{r} vs {l}");
    }
}

#[test]
fn different_kinds_never_match() {
    let parsed = parse_source("package p\nvar x = 1\n").unwrap();
    let (arena, e) = expr("x");
    assert!(!matches(&arena, e, &parsed.arena, Node::File(parsed.file)));
}

fn same_file(l: &str, r: &str) -> bool {
    let l = parse_source(l).unwrap_or_else(|f| panic!("{l}: {f}"));
    let r = parse_source(r).unwrap_or_else(|f| panic!("{r}: {f}"));
    matches(&l.arena, Node::File(l.file), &r.arena, Node::File(r.file))
}

#[test]
fn statement_and_type_variants_are_told_apart() {
    init_tracing();
    let body = |s: &str| format!("package p\nfunc f() {{\n\t{s}\n}}\n");
    for (l, r) in [
        ("for {\n\t}", "for x {\n\t}"),
        ("for i := 0; i < n; i++ {\n\t}", "for i := range n {\n\t}"),
        ("go f()", "defer f()"),
        ("x++", "x--"),
        ("x = 1", "x := 1"),
        ("return", "{\n\t}"),
        ("f()", "ch <- f()"),
        ("switch x {\n\t}", "switch x := y.(type) {\n\t}"),
    ] {
        assert!(!same_file(&body(l), &body(r)), "{l} vs {r}");
        assert!(!same_file(&body(r), &body(l)), "{r} vs {l}");
    }

    let decl = |s: &str| format!("package p\n\n{s}\n");
    for (l, r) in [
        ("var x int", "const x int = 1"),
        ("type T int", "type T = int"),
        ("var x []int", "var x [4]int"),
        ("var x chan int", "var x <-chan int"),
        ("var x map[int]int", "var x *int"),
        ("var x func()", "var x struct{}"),
        ("import \"fmt\"", "import f \"fmt\""),
    ] {
        assert!(!same_file(&decl(l), &decl(r)), "{l} vs {r}");
        assert!(!same_file(&decl(r), &decl(l)), "{r} vs {l}");
    }
}

#[test]
fn statement_lists_must_have_equal_length() {
    let one = parse_source("package p\nfunc f() {\n\tg()\n}\n").unwrap();
    let two = parse_source("package p\nfunc f() {\n\tg()\n\tg()\n}\n").unwrap();
    assert!(!matches(
        &one.arena,
        Node::File(one.file),
        &two.arena,
        Node::File(two.file)
    ));
}

#[test]
fn built_trees_match_parsed_ones() {
    let built = ident("fmt")
        .dot("Println")
        .call(&[string("n ="), ident("n").op("+", Some(&int(1)))]);
    let (arena, node) = built.build();
    let (parsed, pnode) = expr(r#"fmt.Println("n =", n+1)"#);
    assert!(matches(&arena, node, &parsed, pnode));
    assert!(matches(&parsed, pnode, &arena, node));
}

fn leaf() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-e]".prop_map(String::from),
        (0u32..100).prop_map(|n| n.to_string()),
    ]
}

fn arb_expr() -> impl Strategy<Value = String> {
    leaf().prop_recursive(4, 32, 2, |inner| {
        prop_oneof![
            (inner.clone(), prop::sample::select(vec!["+", "*", "<", "&&", "|"]), inner.clone())
                .prop_map(|(l, op, r)| format!("({l} {op} {r})")),
            inner.clone().prop_map(|x| format!("f({x})")),
            inner.prop_map(|x| format!("-({x})")),
        ]
    })
}

proptest! {
    #[test]
    fn matching_is_reflexive_and_symmetric(l in arb_expr(), r in arb_expr()) {
        prop_assert!(same(&l, &l));
        prop_assert_eq!(same(&l, &r), same(&r, &l));
        if l != r {
            // Distinct generated sources differ in at least one leaf or operator.
            prop_assert!(!same(&l, &r));
        }
    }
}
