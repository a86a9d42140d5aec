//! Generation throughput at the panel's minimum, default, and maximum counts.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use galaxygen::{generate_seeded, GalaxyParams};

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");

    for count in [100u32, 10_000, 50_000] {
        let params = GalaxyParams {
            count,
            ..Default::default()
        };
        group.bench_function(format!("{count}_points"), |b| {
            b.iter(|| generate_seeded(black_box(&params), 42).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_generate);
criterion_main!(benches);
