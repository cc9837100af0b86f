use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use indexable::{concatenate, Entity};

fn random_entity(rng: &mut StdRng, n: usize) -> Entity {
    Entity::builder()
        .array("id", (0..n as i64).collect::<Vec<_>>())
        .array(
            "group",
            (0..n)
                .map(|_| rng.random_range(0..50_i64))
                .collect::<Vec<_>>(),
        )
        .array("a", (0..n).map(|_| rng.random::<f64>()).collect::<Vec<_>>())
        .opaque("frame", "ecliptic")
        .index("id")
        .build()
        .unwrap()
}

fn bench_sort(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0xDEADBEEF);
    let entity = random_entity(&mut rng, 100_000);

    c.bench_function("sort_values/single_key", |b| {
        b.iter(|| black_box(entity.sort_values(&["a"], &[true]).unwrap()))
    });

    c.bench_function("sort_values/two_keys", |b| {
        b.iter(|| {
            black_box(
                entity
                    .sort_values(&["group", "a"], &[true, false])
                    .unwrap(),
            )
        })
    });
}

fn bench_concat(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0xBADF00D);
    let parts: Vec<Entity> = (0..100).map(|_| random_entity(&mut rng, 1_000)).collect();

    c.bench_function("concatenate/100x1000", |b| {
        b.iter(|| black_box(concatenate(black_box(&parts)).unwrap()))
    });

    let whole = concatenate(&parts).unwrap();
    c.bench_function("yield_chunks/1000", |b| {
        b.iter_batched(
            || whole.clone(),
            |e| {
                for chunk in e.yield_chunks(1_000).unwrap() {
                    black_box(chunk);
                }
            },
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(benches, bench_sort, bench_concat);
criterion_main!(benches);
