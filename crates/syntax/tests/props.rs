use gogen_syntax::ast::Node;
use gogen_syntax::lexer::{Lexer, Tok};
use gogen_syntax::parser::{parse_expr, parse_source};
use gogen_syntax::printer::print_node;
use proptest::prelude::*;

fn expr_source() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![
        "[a-z][a-z0-9]{0,3}".prop_filter("keyword", |s| !matches!(
            s.as_str(),
            "go" | "if" | "for" | "map" | "var" | "func" | "case" | "chan" | "else" | "goto"
                | "type"
        )),
        (0u32..1000).prop_map(|n| n.to_string()),
    ];
    leaf.prop_recursive(4, 24, 2, |inner| {
        let op = prop::sample::select(vec![
            "+", "-", "*", "/", "%", "<<", ">>", "&", "|", "^", "&^", "&&", "||", "==", "!=",
            "<", "<=", ">", ">=",
        ]);
        prop_oneof![
            (inner.clone(), op, inner.clone()).prop_map(|(l, op, r)| format!("{l} {op} {r}")),
            inner.clone().prop_map(|x| format!("({x})")),
            (prop::sample::select(vec!["-", "!", "^"]), inner.clone())
                .prop_map(|(op, x)| format!("{op}({x})")),
            (inner.clone(), inner).prop_map(|(f, x)| format!("f({f}, {x})")),
        ]
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    #[test]
    fn lexer_spans_are_monotonic(s in ".*") {
        let mut last_real_end = 0usize;
        let max_steps = s.len().saturating_mul(4) + 64;

        for (steps, (start, tok, end)) in Lexer::new(&s).enumerate() {
            prop_assert!(start <= end && end <= s.len(), "bad span ({start},{end}) tok={tok:?}");
            let injected = matches!(tok, Tok::Semi) && start == end;
            if !injected {
                prop_assert!(start >= last_real_end, "token moved backwards: {tok:?} input={s:?}");
                last_real_end = end;
            }
            prop_assert!(steps <= max_steps, "possible hang on {s:?}");
        }
    }

    #[test]
    fn parser_never_panics(s in "(package p\n)?[ -~\n]{0,64}") {
        let _ = parse_source(&s);
    }

    #[test]
    fn printing_is_a_fixed_point(src in expr_source()) {
        let (arena, e) = parse_expr(&src).unwrap();
        let once = print_node(&arena, Node::Expr(e)).unwrap();
        let (arena2, e2) = parse_expr(&once).unwrap();
        let twice = print_node(&arena2, Node::Expr(e2)).unwrap();
        prop_assert_eq!(once, twice);
    }
}
