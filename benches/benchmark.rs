use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use neartree::{distance::euclidean, NearTree};
use rand::{rngs::StdRng, Rng, SeedableRng};

const D: usize = 3;
const SEED: u64 = 0;
const N: usize = 10000;
const PROBES: usize = 1000;
const K: usize = 10;

fn benchmark(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("build");
    group.sample_size(10);
    group.bench_function("sequential", |b| b.iter(bench_build_sequential));
    group.bench_function("random", |b| b.iter(bench_build_random));
    group.finish();

    let mut tree = NearTree::new(euclidean::<D>);
    tree.insert_random_order(dataset(N, SEED));
    let probes = dataset(PROBES, SEED + 1);

    let mut group = criterion.benchmark_group("k_nearest");
    group.bench_function("neartree", |b| {
        b.iter(|| {
            for probe in &probes {
                let (found, _) = tree.k_nearest(K, f64::INFINITY, probe).unwrap();
                assert_eq!(found.len(), K);
            }
        });
    });
    group.finish();

    // Halving radius sweep, with and without pre-pruning.
    let mut group = criterion.benchmark_group("nearest_within_radius");
    for no_pre_prune in [false, true] {
        tree.set_no_pre_prune(no_pre_prune);
        let label = if no_pre_prune { "no_pre_prune" } else { "pre_prune" };
        let mut radius = 10.0;
        for _ in 0..6 {
            tree.reset_node_visits();
            for probe in &probes {
                tree.nearest_within_radius(radius, probe).unwrap();
            }
            println!(
                "{label} radius {radius}: {:.3} node visits per probe",
                tree.node_visits() as f64 / PROBES as f64
            );

            group.bench_with_input(BenchmarkId::new(label, radius), &radius, |b, &radius| {
                b.iter(|| {
                    for probe in &probes {
                        black_box(tree.nearest_within_radius(radius, probe).unwrap());
                    }
                });
            });
            radius *= 0.5;
        }
    }
    group.finish();
}

criterion_group!(benches, benchmark);
criterion_main!(benches);

fn bench_build_sequential() {
    let mut tree = NearTree::new(euclidean::<D>);
    tree.insert_sequential(dataset(N, SEED));
}

fn bench_build_random() {
    let mut tree = NearTree::new(euclidean::<D>);
    tree.insert_random_order(dataset(N, SEED));
}

fn dataset(n: usize, seed: u64) -> Vec<[f64; D]> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| [rng.gen(), rng.gen(), rng.gen()])
        .collect()
}
