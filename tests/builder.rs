use gogen::code::{
    assign, assign_many, block, define, file, float, func, ident, ident_prefix, if_init, if_stmt,
    import, inc, int, literal, nil, ret, rune, scoped, string, Code,
};
use gogen::scope::{Scope, StashKey};
use gogen::AstArena;
use gogen_syntax::{parse_source, PrintError};
use pretty_assertions::assert_eq;

fn render(code: &Code) -> String {
    code.render()
        .unwrap_or_else(|e| panic!("{code:?} failed to render: {e}"))
}

#[test]
fn expressions_render_like_gofmt() {
    let (x, y) = (ident("x"), ident("y"));
    for (want, code) in [
        ("x", x.clone()),
        ("5", literal(5)),
        ("-5", literal(-5)),
        ("5.2", literal(5.2)),
        ("-0.5", float(-0.5)),
        ("5.0", float(5.0)),
        ("'x'", rune('x')),
        ("'\\n'", rune('\n')),
        ("\"a\\\"b\"", string("a\"b")),
        ("nil", nil()),
        ("x + y", x.op("+", Some(&y))),
        ("-x", x.op("-", None)),
        ("x < y", x.op("<", Some(&y))),
        ("x <= y", x.op("<=", Some(&y))),
        ("(x)", x.paren()),
        ("x()", x.call(&[])),
        ("x(y)", x.call(&[y.clone()])),
        ("x.y", x.dot("y")),
        ("*x", x.star()),
        ("x[y]", x.index(&y)),
        ("-(x + y)", x.op("+", Some(&y)).op("-", None)),
    ] {
        assert_eq!(render(&code), want);
    }
}

#[test]
fn operands_are_parenthesized_when_precedence_requires_it() {
    let (a, b, c) = (ident("a"), ident("b"), ident("c"));
    let sum = a.op("+", Some(&b));
    assert_eq!(render(&sum.op("*", Some(&c))), "(a + b) * c");
    assert_eq!(render(&c.op("*", Some(&sum))), "c * (a + b)");
}

#[test]
fn fresh_names_are_distinct_per_instance() {
    let expr = ident_prefix("x").op("<", Some(&ident_prefix("x")));
    assert_eq!(render(&expr), "x < x2");
}

#[test]
fn fresh_names_are_memoized_per_instance() {
    let x2 = ident_prefix("x");
    let expr = ident_prefix("x")
        .op("<", Some(&x2))
        .op("<", Some(&x2.clone()));
    assert_eq!(render(&expr), "x < x2 < x2");

    // The name sticks even when resolved against a fresh scope later.
    assert_eq!(render(&x2), "x2");
}

#[test]
fn memoized_names_stay_taken_in_later_builds() {
    let earlier = ident_prefix("x");
    assert_eq!(render(&earlier), "x");

    let expr = ident_prefix("x").op("<", Some(&earlier));
    assert_eq!(render(&expr), "x2 < x");
}

#[test]
fn empty_prefix_uses_filler() {
    assert_eq!(render(&ident_prefix("")), "gogen");
}

#[test]
fn resolution_is_repeatable() {
    let code = if_stmt(&ident("x")).then(&[ident("y").call(&[int(1)])]);
    assert_eq!(render(&code), render(&code));
}

#[test]
fn conditionals() {
    let (x, y, z, n) = (ident("x"), ident("y"), ident("z"), ident("n"));

    assert_eq!(render(&if_stmt(&x).then(&[y.clone()])), "if x {\n\ty\n}");
    assert_eq!(
        render(&if_stmt(&x).then(&[y.clone(), z.clone()])),
        "if x {\n\ty\n\tz\n}"
    );
    assert_eq!(
        render(&if_init(&assign(":=", &x, &n), &x.op("<", Some(&y))).then(&[z.clone()])),
        "if x := n; x < y {\n\tz\n}"
    );
    assert_eq!(
        render(&if_init(&x.assign(":=", &n), &x.op("<", Some(&y))).then(&[z.clone()])),
        "if x := n; x < y {\n\tz\n}"
    );

    let chain = if_stmt(&x)
        .then(&[y.clone()])
        .else_(&if_stmt(&n).then(&[z.clone()]).else_(&block(&[ret(&[])])));
    assert_eq!(
        render(&chain),
        "if x {\n\ty\n} else if n {\n\tz\n} else {\n\treturn\n}"
    );
}

#[test]
fn then_reaches_conditionals_built_later() {
    let deferred = scoped(|_| if_stmt(&ident("ok")));
    assert_eq!(
        render(&deferred.then(&[ident("run").call(&[])])),
        "if ok {\n\trun()\n}"
    );
}

#[test]
fn deferred_conditionals_scope_their_bodies() {
    let set_v = |v: i64| define(&ident_prefix("v"), &int(v));
    let want = "{\n\tif c {\n\t\tv := 1\n\t}\n\tv := 2\n}";

    let direct = block(&[if_stmt(&ident("c")).then(&[set_v(1)]), set_v(2)]);
    assert_eq!(render(&direct), want);

    let deferred = block(&[
        scoped(|_| if_stmt(&ident("c"))).then(&[set_v(1)]),
        set_v(2),
    ]);
    assert_eq!(render(&deferred), want);
}

#[test]
fn statements() {
    let (x, y) = (ident("x"), ident("y"));
    assert_eq!(render(&assign("=", &x, &y)), "x = y");
    assert_eq!(render(&define(&x, &int(1))), "x := 1");
    assert_eq!(render(&x.assign("+=", &y)), "x += y");
    let swap = assign_many("=", &[x.clone(), y.clone()], &[y.clone(), x.clone()]);
    assert_eq!(render(&swap), "x, y = y, x");
    assert_eq!(render(&inc(&x)), "x++");
    assert_eq!(render(&x.dec()), "x--");
    assert_eq!(render(&ret(&[x.clone(), nil()])), "return x, nil");
    assert_eq!(render(&block(&[x.clone()])), "{\n\tx\n}");
}

#[test]
fn unknown_operators_fail_at_print_time() {
    let (x, y) = (ident("x"), ident("y"));
    assert_eq!(
        x.op("<>", Some(&y)).render(),
        Err(PrintError::IllegalOperator { context: "binary" })
    );
    assert_eq!(
        x.op("?", None).render(),
        Err(PrintError::IllegalOperator { context: "unary" })
    );
    assert!(assign("=!", &x, &y).render().is_err());
}

fn choose() -> Code {
    let (x, y, n) = (ident("x"), ident("y"), ident("n"));
    let int_t = Some(ident("int"));
    let body = if_init(&define(&x, &n), &x.op("<", Some(&y)))
        .then(&[ret(&[ident("pick").call(&[x.clone()])])]);

    func("choose")
        .with_param(&[Some(ident("a")), int_t.clone(), None])
        .with_param(&[Some(ident("b")), int_t, None])
        .with_result(&[Some(ident("string")), None])
        .with_body(&[body])
}

const CHOOSE: &str = "package p

func choose(a int, b int) string {
\tif x := n; x < y {
\t\treturn pick(x)
\t}
}
";

#[test]
fn function_declaration_renders_and_reparses() {
    let src = file("p", &[choose()]);
    let out = render(&src);
    assert_eq!(out, CHOOSE);

    let (built, node) = src.build();
    let parsed = parse_source(&out).unwrap();
    assert!(gogen::matches(
        &built,
        node,
        &parsed.arena,
        gogen::Node::File(parsed.file)
    ));
    assert!(gogen::round_trip(&src).unwrap());
}

#[test]
fn round_trip_covers_every_category() {
    let (x, y) = (ident("x"), ident("y"));
    assert!(gogen::round_trip(&x.op("+", Some(&y.op("*", Some(&int(-3)))))).unwrap());
    assert!(gogen::round_trip(&if_stmt(&x).then(&[inc(&y)])).unwrap());
    assert!(gogen::round_trip(&choose()).unwrap());
}

#[test]
fn round_trip_needs_explicit_parens_where_the_printer_adds_them() {
    let (a, b, c) = (ident("a"), ident("b"), ident("c"));
    let implicit = a.op("-", Some(&b.op("-", Some(&c))));
    assert_eq!(render(&implicit), "a - (b - c)");
    assert!(!gogen::round_trip(&implicit).unwrap());

    let explicit = a.op("-", Some(&b.op("-", Some(&c)).paren()));
    assert_eq!(render(&explicit), "a - (b - c)");
    assert!(gogen::round_trip(&explicit).unwrap());
}

#[test]
fn func_starts_with_an_empty_body() {
    assert_eq!(render(&func("noop")), "func noop() {\n}");
}

#[test]
fn receivers_and_named_fields() {
    let method = func("Len")
        .with_receiver(&[Some(ident("s")), Some(ident("Stack").star()), None])
        .with_param(&[Some(ident("a")), Some(ident("b")), Some(ident("int")), None])
        .with_param(&[Some(ident("buf")), Some(ident("bytes").dot("Buffer")), None])
        .with_result(&[Some(ident("n")), Some(ident("int")), None])
        .with_result(&[Some(ident("err")), Some(ident("error")), None]);
    assert_eq!(
        render(&method),
        "func (s *Stack) Len(a, b int, buf bytes.Buffer) (n int, err error) {\n}"
    );
}

#[test]
fn imports_are_collected_by_the_file() {
    let main = func("main").with_body(&[import("fmt").dot("Println").call(&[string("hi")])]);
    assert_eq!(
        render(&file("main", &[main])),
        "package main\n\nimport \"fmt\"\n\nfunc main() {\n\tfmt.Println(\"hi\")\n}\n"
    );
}

#[test]
fn conflicting_imports_get_an_alias() {
    let body = [
        import("net/http").dot("A").call(&[]),
        import("example.com/http").dot("B").call(&[]),
        import("net/http").dot("C").call(&[]),
    ];
    let out = render(&file("p", &[func("f").with_body(&body)]));
    assert_eq!(
        out,
        "package p

import (
\thttp2 \"example.com/http\"
\t\"net/http\"
)

func f() {
\thttp.A()
\thttp2.B()
\thttp.C()
}
"
    );
}

#[test]
fn fresh_names_and_imports_never_collide() {
    let http = import("net/http");
    let get = http.dot("Get").call(&[]);

    let import_first = [get.clone(), define(&ident_prefix("http"), &int(1))];
    assert_eq!(
        render(&file("p", &[func("f").with_body(&import_first)])),
        "package p\n\nimport \"net/http\"\n\nfunc f() {\n\thttp.Get()\n\thttp2 := 1\n}\n"
    );

    let fresh_first = [define(&ident_prefix("http"), &int(1)), get];
    assert_eq!(
        render(&file("p", &[func("f").with_body(&fresh_first)])),
        "package p\n\nimport http2 \"net/http\"\n\nfunc f() {\n\thttp := 1\n\thttp2.Get()\n}\n"
    );
}

#[test]
fn import_outside_a_file_is_just_the_package_name() {
    assert_eq!(render(&import("encoding/json").dot("Marshal")), "json.Marshal");
}

struct Greeting;

impl StashKey for Greeting {
    type Value = String;
}

#[test]
fn stash_values_flow_to_scoped_producers() {
    let greet = scoped(|s| {
        let name = s.lookup_stash::<Greeting>().cloned().unwrap_or_default();
        ident(name).call(&[])
    });
    assert_eq!(render(&greet.with_stash::<Greeting>("hello".into())), "hello()");

    // The entry only lives in the child scope the producer resolves in.
    let mut root = Scope::root();
    let mut arena = AstArena::new();
    greet
        .with_stash::<Greeting>("hi".into())
        .resolve(&mut root, &mut arena);
    assert!(root.lookup_stash::<Greeting>().is_none());
}

#[test]
fn functions_reserve_their_names() {
    let mut root = Scope::root();
    let mut arena = AstArena::new();
    func("helper").resolve(&mut root, &mut arena);
    assert!(root.lookup_var("helper").is_some());
    assert_eq!(root.pick_name("helper"), "helper2");
}

#[test]
fn code_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Code>();

    let x = ident_prefix("t");
    let handle = std::thread::spawn({
        let x = x.clone();
        move || x.render().unwrap()
    });
    assert_eq!(handle.join().unwrap(), "t");
    assert_eq!(render(&x), "t");
}

#[test]
#[should_panic(expected = "expected an if statement")]
fn then_on_a_non_conditional_panics() {
    ident("x").then(&[ident("y")]).build();
}

#[test]
#[should_panic(expected = "expected a function declaration")]
fn with_body_on_a_non_function_panics() {
    ident("x").with_body(&[]).build();
}

#[test]
#[should_panic(expected = "expected an expression")]
fn statements_are_not_operands() {
    assign("=", &ident("x"), &ident("y"))
        .op("+", Some(&ident("z")))
        .build();
}

#[test]
#[should_panic(expected = "type slot is empty")]
fn fields_need_a_type() {
    func("f").with_param(&[Some(ident("a")), None, None]).build();
}
