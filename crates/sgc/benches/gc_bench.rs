//! Benchmarks for allocation and collection.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sgc::{Gc, GcConfig, Value};

fn bench_gc() -> Gc {
    Gc::new(GcConfig {
        young_size: 4 * 1024 * 1024,
        old_size: 8 * 1024 * 1024,
        ..Default::default()
    })
    .expect("bench configuration should be valid")
}

fn bench_pair_allocation(c: &mut Criterion) {
    c.bench_function("alloc_1000_pairs", |b| {
        let mut gc = bench_gc();
        b.iter(|| {
            for _ in 0..1000 {
                black_box(gc.alloc_pair());
            }
        });
    });
}

fn bench_minor_gc_with_live_chain(c: &mut Criterion) {
    c.bench_function("minor_gc_1000_live_pairs", |b| {
        let mut gc = bench_gc();
        let mut head = Value::Nil;
        gc.preserve(&mut head);
        for i in 0..1000 {
            let mut cdr = head;
            gc.preserve(&mut cdr);
            let pair = gc.alloc_pair();
            gc.release(1);
            unsafe {
                let obj = pair.as_ptr().unwrap();
                (*obj.pair()).car = Value::Fixnum(i);
                (*obj.pair()).cdr = cdr;
            }
            head = pair;
        }
        b.iter(|| {
            gc.collect_minor();
            black_box(head);
        });
        gc.release(1);
    });
}

fn bench_major_gc_with_tenured_chain(c: &mut Criterion) {
    c.bench_function("major_gc_1000_tenured_pairs", |b| {
        let mut gc = bench_gc();
        let mut head = Value::Nil;
        gc.preserve(&mut head);
        for i in 0..1000 {
            let mut cdr = head;
            gc.preserve(&mut cdr);
            let pair = gc.alloc_pair();
            gc.release(1);
            unsafe {
                let obj = pair.as_ptr().unwrap();
                (*obj.pair()).car = Value::Fixnum(i);
                (*obj.pair()).cdr = cdr;
            }
            head = pair;
        }
        for _ in 0..gc.config().tenure_threshold {
            gc.collect_minor();
        }
        b.iter(|| {
            gc.collect_major();
            black_box(head);
        });
        gc.release(1);
    });
}

criterion_group!(
    benches,
    bench_pair_allocation,
    bench_minor_gc_with_live_chain,
    bench_major_gc_with_tenured_chain
);
criterion_main!(benches);
