//! Table sampling benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use vizcore_transfer::PiecewiseFunction;

fn opacity_ramp(nodes: usize) -> PiecewiseFunction {
    let mut f = PiecewiseFunction::new();
    for i in 0..nodes {
        let x = i as f64 / (nodes - 1) as f64;
        let sharpness = (i % 4) as f64 / 4.0;
        f.add_point_with(x, (x * 7.0).sin().abs(), 0.5, sharpness)
            .expect("valid node");
    }
    f
}

fn bench_get_table(c: &mut Criterion) {
    let mut group = c.benchmark_group("get_table");

    for nodes in [4, 64, 1024] {
        let f = opacity_ramp(nodes);
        let mut table = vec![0.0f64; 4096];
        group.bench_with_input(BenchmarkId::new("f64", nodes), &f, |b, f| {
            b.iter(|| f.get_table(black_box(-0.1), black_box(1.1), 4096, &mut table, 1, false))
        });
    }

    let f = opacity_ramp(64);
    let mut rgba = vec![0.0f32; 4 * 1024];
    group.bench_function("f32_rgba_stride", |b| {
        b.iter(|| f.get_table(black_box(0.0), black_box(1.0), 1024, &mut rgba[3..], 4, false))
    });
    group.finish();
}

fn bench_value(c: &mut Criterion) {
    let f = opacity_ramp(256);
    c.bench_function("value_single", |b| b.iter(|| f.value(black_box(0.4321))));
}

criterion_group!(benches, bench_get_table, bench_value);
criterion_main!(benches);
