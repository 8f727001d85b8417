//! Benchmarks for the symbol interner.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use silt_util::Obarray;

fn bench_intern_miss(c: &mut Criterion) {
    c.bench_function("intern_miss", |b| {
        let names: Vec<String> = (0..10_000).map(|i| format!("symbol_{i}")).collect();
        b.iter(|| {
            let mut obarray = Obarray::new();
            for name in &names {
                black_box(obarray.intern(name));
            }
        });
    });
}

fn bench_intern_hit(c: &mut Criterion) {
    c.bench_function("intern_hit", |b| {
        let mut obarray = Obarray::new();
        let names: Vec<String> = (0..10_000).map(|i| format!("symbol_{i}")).collect();
        for name in &names {
            obarray.intern(name);
        }
        b.iter(|| {
            for name in &names {
                black_box(obarray.intern(name));
            }
        });
    });
}

fn bench_resolve(c: &mut Criterion) {
    c.bench_function("resolve", |b| {
        let mut obarray = Obarray::new();
        let syms: Vec<_> = (0..10_000)
            .map(|i| obarray.intern(&format!("symbol_{i}")))
            .collect();
        b.iter(|| {
            for &sym in &syms {
                black_box(obarray.resolve(sym));
            }
        });
    });
}

criterion_group!(benches, bench_intern_miss, bench_intern_hit, bench_resolve);
criterion_main!(benches);
