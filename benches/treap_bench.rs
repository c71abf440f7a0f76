use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use treapcache::db::{ReplicaMapper, Treap};
use treapcache::{Storage, DB};

fn bench_treap_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("treap_insert");
    for size in [1_000u64, 10_000, 100_000] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| {
                let mut treap = Treap::with_seed(42);
                for k in 0..size {
                    treap.insert(k, k).unwrap();
                }
                black_box(treap.len())
            });
        });
    }
    group.finish();
}

fn bench_treap_search(c: &mut Criterion) {
    let mut treap = Treap::with_seed(42);
    for k in 0..100_000u64 {
        treap.insert(k, k).unwrap();
    }
    c.bench_function("treap_search_100k", |b| {
        let mut k = 0u64;
        b.iter(|| {
            k = (k + 7919) % 100_000;
            black_box(treap.search(&k).unwrap())
        });
    });
}

fn bench_replicas_for(c: &mut Criterion) {
    let mapper = ReplicaMapper::new(32, 5).unwrap();
    c.bench_function("replicas_for_32x5", |b| {
        b.iter(|| black_box(mapper.replicas_for(black_box("user:101")).unwrap()));
    });
}

fn bench_db_mixed(c: &mut Criterion) {
    c.bench_function("db_insert_delete_10k", |b| {
        b.iter(|| {
            let db: DB<String, u32> = DB::with_seed(32, 5, 1).unwrap();
            for i in 0..10_000u32 {
                db.insert(format!("user:{}", i), i).unwrap();
            }
            for i in (0..10_000u32).step_by(2) {
                db.delete(&format!("user:{}", i)).unwrap();
            }
            black_box(db.len())
        });
    });
}

criterion_group!(
    benches,
    bench_treap_insert,
    bench_treap_search,
    bench_replicas_for,
    bench_db_mixed
);
criterion_main!(benches);
