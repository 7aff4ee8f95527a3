//! Benchmarks for markdown rendering into styled documents.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use ai_share::document::{self, RenderDescriptor};
use ai_share::theme;

fn bench_render_simple(c: &mut Criterion) {
    let md = "# Hello\n\nWorld";
    c.bench_function("render_simple", |b| {
        b.iter(|| document::render(&RenderDescriptor::new(black_box(md), theme::default_theme())))
    });
}

fn bench_render_medium(c: &mut Criterion) {
    let md = include_str!("../tests/fixtures/sample.md");
    c.bench_function("render_medium", |b| {
        b.iter(|| document::render(&RenderDescriptor::new(black_box(md), theme::default_theme())))
    });
}

criterion_group!(benches, bench_render_simple, bench_render_medium);
criterion_main!(benches);
