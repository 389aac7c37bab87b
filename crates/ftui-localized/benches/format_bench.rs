//! Benchmarks for template parsing and substitution.
//!
//! Run with: `cargo bench --package ftui-localized --bench format_bench`
//!
//! Groups:
//!
//! | Group | What it measures |
//! |-------|------------------|
//! | `parse` | scanning + directive parsing only |
//! | `render` | substitution into a pre-parsed template |
//! | `format` | parse + render in one call |
//! | `plural_depth` | nested plural sub-templates at increasing depth |

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use ftui_localized::{Argument, CategoryMap, Formatter, Template, Value};
use std::hint::black_box;

// ============================================================================
// Fixtures
// ============================================================================

const LITERAL: &str = "The quick brown fox jumps over the lazy dog. No placeholders at all here.";
const SPRINTF: &str = "%-10s|%05d|%8.3f|%#x|%e";
const NAMED: &str = "%{user} uploaded %<size>.1f MB to %{folder} at %<rate>d kB/s";
const INLINE: &str =
    r#"%{user}: %<{"n": {"one": "%{n} new message", "other": "%{n} new messages"}}>"#;

fn positional() -> Argument {
    Argument::positional([
        Value::from("name"),
        Value::from(42),
        Value::from(1.61803),
        Value::from(255),
        Value::from(12345.678),
    ])
}

fn keyed(n: i64) -> Argument {
    Argument::keyed([
        ("user", Value::from("ana")),
        ("folder", Value::from("docs")),
        ("size", Value::from(12.75)),
        ("rate", Value::from(900)),
        ("n", Value::from(n)),
    ])
}

/// Rules whose `other` form nests one more plural reference, `depth` times.
fn nested(depth: usize) -> Argument {
    let mut pairs = vec![("n".to_string(), Value::from(2))];
    for level in 0..depth {
        let next = if level + 1 == depth {
            "leaf".to_string()
        } else {
            format!("[%{{n:r{}}}]", level + 1)
        };
        let rules: CategoryMap = [("other".to_string(), next)].into();
        pairs.push((format!("r{level}"), Value::from(rules)));
    }
    Argument::keyed(pairs)
}

// ============================================================================
// Benchmarks
// ============================================================================

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    for (name, src) in [
        ("literal", LITERAL),
        ("sprintf", SPRINTF),
        ("named", NAMED),
        ("inline", INLINE),
    ] {
        group.throughput(Throughput::Bytes(src.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), src, |b, src| {
            b.iter(|| Template::parse(black_box(src)));
        });
    }
    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let formatter = Formatter::default();
    let mut group = c.benchmark_group("render");

    let cases = [
        ("literal", LITERAL, positional()),
        ("sprintf", SPRINTF, positional()),
        ("named", NAMED, keyed(3)),
        ("inline_one", INLINE, keyed(1)),
        ("inline_other", INLINE, keyed(7)),
    ];
    for (name, src, arg) in &cases {
        let Ok(template) = Template::parse(src) else {
            continue;
        };
        group.bench_function(*name, |b| {
            b.iter(|| formatter.render(black_box(&template), black_box(arg), "en"));
        });
    }
    group.finish();
}

fn bench_format(c: &mut Criterion) {
    let formatter = Formatter::default();
    let arg = keyed(5);
    c.bench_function("format/named", |b| {
        b.iter(|| formatter.format(black_box(NAMED), black_box(&arg), "en"));
    });
}

fn bench_plural_depth(c: &mut Criterion) {
    let formatter = Formatter::default();
    let mut group = c.benchmark_group("plural_depth");
    for depth in [1usize, 4, 16] {
        let arg = nested(depth);
        group.bench_with_input(BenchmarkId::from_parameter(depth), &arg, |b, arg| {
            b.iter(|| formatter.format(black_box("%{n:r0}"), black_box(arg), "en"));
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_parse,
    bench_render,
    bench_format,
    bench_plural_depth
);
criterion_main!(benches);
