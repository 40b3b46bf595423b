//! Store operation benchmarks
//!
//! Measures the locked fast paths: a full create/read/delete cycle for a
//! small value, error creation, and a forward/delete pair.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use gresult_core::{site, Store};

fn bench_create_read_delete(c: &mut Criterion) {
    let store = Store::new();
    let bytes = 0x1234_5678_9abc_def0u64.to_ne_bytes();

    c.bench_function("create_read_delete_u64", |b| {
        b.iter(|| {
            let id = store
                .create_success(black_box(&bytes), 8, 8, site!())
                .unwrap();
            let mut out = [0u8; 8];
            store.read_success(id, &mut out, site!()).unwrap();
            store.delete(id, site!()).unwrap();
            black_box(out)
        })
    });
}

fn bench_error_forward(c: &mut Criterion) {
    let store = Store::new();

    c.bench_function("create_forward_delete_error", |b| {
        b.iter(|| {
            let source = store.create_error("bench failure", site!()).unwrap();
            let forwarded = store.forward_error(source, site!()).unwrap();
            store.delete(source, site!()).unwrap();
            store.delete(forwarded, site!()).unwrap();
        })
    });
}

criterion_group!(benches, bench_create_read_delete, bench_error_forward);
criterion_main!(benches);
