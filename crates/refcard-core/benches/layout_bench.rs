//! Criterion benchmarks for [`LayoutEngine::layout`].
//!
//! The size search re-measures every label once per candidate size, so its
//! cost grows with both label count and the distance between the maximum
//! and the chosen font size.
//!
//! Run with:
//! ```bash
//! cargo bench --package refcard-core --bench layout_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use refcard_core::domain::style::group_style;
use refcard_core::{HitBox, LayoutEngine, MonospaceMeasurer, TextItem};

// ── Fixture builders ──────────────────────────────────────────────────────────

fn build_labels(n: usize) -> Vec<TextItem> {
    (0..n)
        .map(|i| TextItem {
            text: format!("Command {i}[{}]", i % 7),
            group: "Ship".to_string(),
            style: group_style("Ship"),
        })
        .collect()
}

// ── Benchmarks ────────────────────────────────────────────────────────────────

/// A typical button hit-box with a growing number of labels.
fn bench_layout_labels(c: &mut Criterion) {
    let engine = LayoutEngine::new(MonospaceMeasurer);
    let hit_box = HitBox::new(1200, 400, 400, 54);

    let mut group = c.benchmark_group("layout_labels");
    for n in [1, 4, 12, 32] {
        let labels = build_labels(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &labels, |b, labels| {
            b.iter(|| engine.layout(black_box(labels), black_box(&hit_box), black_box(40)))
        });
    }
    group.finish();
}

/// Worst case: the search walks all the way down to the minimum size.
fn bench_layout_overfull(c: &mut Criterion) {
    let engine = LayoutEngine::new(MonospaceMeasurer);
    let hit_box = HitBox::new(0, 0, 120, 20);
    let labels = build_labels(64);

    c.bench_function("layout_overfull", |b| {
        b.iter(|| engine.layout(black_box(&labels), black_box(&hit_box), black_box(72)))
    });
}

criterion_group!(benches, bench_layout_labels, bench_layout_overfull);
criterion_main!(benches);
