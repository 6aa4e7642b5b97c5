use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use gogen::code::{define, file, func, ident, ident_prefix, if_init, int, ret, Code};
use gogen::scope::Scope;
use gogen::{matches, AstArena, Node};
use gogen_syntax::{parse_source, print_node};
use std::hint::black_box as bb;

// =============================================================================
// Inputs
// =============================================================================

const SERVICE: &str = r#"
package service

import (
	"errors"
	"fmt"
)

type Request struct {
	ID   int
	Name string
}

func (s *Server) Handle(req *Request) (string, error) {
	if req == nil {
		return "", errors.New("nil request")
	}
	for i := 0; i < s.retries; i++ {
		if out, err := s.try(req); err == nil {
			return fmt.Sprintf("%d: %s", req.ID, out), nil
		}
	}
	switch {
	case req.ID < 0:
		return "", errors.New("negative id")
	default:
		return req.Name, nil
	}
}
"#;

/// A file with `n` functions, each a guarded return over fresh names.
fn generated_file(n: usize) -> Code {
    let funcs: Vec<Code> = (0..n)
        .map(|i| {
            let v = ident_prefix("v");
            let body = if_init(&define(&v, &int(i as i64)), &v.op("<", Some(&ident("limit"))))
                .then(&[ret(&[v.op("*", Some(&int(2)))])]);
            func(format!("f{i}"))
                .with_param(&[Some(ident("limit")), Some(ident("int")), None])
                .with_result(&[Some(ident("int")), None])
                .with_body(&[body, ret(&[int(0)])])
        })
        .collect();
    file("gen", &funcs)
}

// =============================================================================
// Benchmark 1: resolution and printing of built trees
// =============================================================================

fn bench_builder(c: &mut Criterion) {
    let mut group = c.benchmark_group("builder");

    for n in [1usize, 16, 128] {
        let code = generated_file(n);
        group.throughput(Throughput::Elements(n as u64));

        group.bench_with_input(BenchmarkId::new("resolve", n), &code, |b, code| {
            b.iter(|| {
                let mut arena = AstArena::new();
                let node = code.resolve(&mut Scope::root(), &mut arena);
                bb((node, arena))
            });
        });

        let (arena, node) = code.build();
        group.bench_with_input(BenchmarkId::new("print", n), &(arena, node), |b, (a, n)| {
            b.iter(|| bb(print_node(a, *n).map(|s| s.len())));
        });
    }

    group.finish();
}

// =============================================================================
// Benchmark 2: fresh names against a crowded scope
// =============================================================================

fn bench_pick_name(c: &mut Criterion) {
    let mut group = c.benchmark_group("pick_name");

    for taken in [0usize, 64, 1024] {
        group.bench_with_input(BenchmarkId::new("after", taken), &taken, |b, &taken| {
            b.iter_batched(
                || {
                    let mut s = Scope::root();
                    for _ in 0..taken {
                        s.pick_name("tmp");
                    }
                    s
                },
                |mut s| bb(s.pick_name("tmp")),
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

// =============================================================================
// Benchmark 3: structural matching
// =============================================================================

fn bench_matcher(c: &mut Criterion) {
    let mut group = c.benchmark_group("matcher");
    group.throughput(Throughput::Bytes(SERVICE.len() as u64));

    let (left, right) = match (parse_source(SERVICE), parse_source(SERVICE)) {
        (Ok(l), Ok(r)) => (l, r),
        _ => panic!("benchmark input does not parse"),
    };

    group.bench_function("parsed_vs_parsed", |b| {
        b.iter(|| {
            bb(matches(
                &left.arena,
                Node::File(left.file),
                &right.arena,
                Node::File(right.file),
            ))
        });
    });

    group.bench_function("parse_and_match", |b| {
        b.iter(|| {
            let Ok(again) = parse_source(bb(SERVICE)) else {
                return false;
            };
            matches(
                &left.arena,
                Node::File(left.file),
                &again.arena,
                Node::File(again.file),
            )
        });
    });

    group.finish();
}

criterion_group!(benches, bench_builder, bench_pick_name, bench_matcher);
criterion_main!(benches);
