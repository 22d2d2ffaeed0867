//! Benchmark template compilation and rendering time.

use criterion::{criterion_group, criterion_main, Criterion};

use benches::{context, repeat, TEMPLATE};
use condfmt::{Bindings, Engine};

criterion_main! { benches }
criterion_group! { benches, bench_compile, bench_render, bench_format }

/// Benchmarks the time taken to compile a template, bypassing the cache.
fn bench_compile(c: &mut Criterion) {
    let source = repeat(TEMPLATE, 50);
    let mut engine = Engine::new();
    engine.set_cache_capacity(0);
    c.bench_function("compile", |b| {
        b.iter(|| engine.compile(&source).unwrap());
    });
}

/// Benchmarks the time taken to render an already compiled template.
fn bench_render(c: &mut Criterion) {
    let source = repeat(TEMPLATE, 20);
    let bindings = Bindings::from_serialize(context::random())
        .unwrap()
        .with_recursive("footer");
    let tables = bindings.resolve();
    let engine = Engine::new();
    let template = engine.compile(&source).unwrap();
    c.bench_function("render", |b| {
        b.iter(|| template.evaluate(&tables).unwrap());
    });
}

/// Benchmarks compiling through the cache and rendering in one step.
fn bench_format(c: &mut Criterion) {
    let bindings = Bindings::from_serialize(context::random())
        .unwrap()
        .with_recursive("footer");
    let engine = Engine::new();
    c.bench_function("format", |b| {
        b.iter(|| engine.format(TEMPLATE, &bindings).unwrap());
    });
}
