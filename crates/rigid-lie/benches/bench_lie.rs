use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::DVec3;
use rand::{rngs::StdRng, SeedableRng};
use rigid_lie::random::{random_vec3, random_vec6};
use rigid_lie::{se3, so3, Transformation};

fn bench_so3(c: &mut Criterion) {
    let mut group = c.benchmark_group("so3");
    let mut rng = StdRng::seed_from_u64(0);
    let phi = random_vec3(&mut rng);
    let near_pi = DVec3::new(0.0, std::f64::consts::PI - 1e-5, 0.0);

    group.bench_function(BenchmarkId::new("exp", "closed_form"), |b| {
        b.iter(|| black_box(so3::exp(black_box(phi))))
    });

    group.bench_function(BenchmarkId::new("exp", "series_15"), |b| {
        b.iter(|| black_box(so3::exp_series(black_box(phi), 15)))
    });

    for (name, v) in [("generic", phi), ("near_pi", near_pi)] {
        let rotation = so3::exp(v);
        group.bench_function(BenchmarkId::new("log", name), |b| {
            b.iter(|| black_box(so3::log(black_box(&rotation))))
        });
    }

    group.bench_function(BenchmarkId::new("left_jacobian_inverse", ""), |b| {
        b.iter(|| black_box(so3::left_jacobian_inverse(black_box(phi))))
    });
}

fn bench_se3(c: &mut Criterion) {
    let mut group = c.benchmark_group("se3");
    let mut rng = StdRng::seed_from_u64(1);
    let xi = random_vec6(&mut rng);
    let t1 = Transformation::from_random(&mut rng);
    let t2 = Transformation::from_random(&mut rng);

    group.bench_function(BenchmarkId::new("exp", ""), |b| {
        b.iter(|| black_box(se3::exp(black_box(&xi))))
    });

    group.bench_function(BenchmarkId::new("left_jacobian", ""), |b| {
        b.iter(|| black_box(se3::left_jacobian(black_box(&xi))))
    });

    group.bench_function(BenchmarkId::new("vec", ""), |b| {
        b.iter(|| black_box(black_box(t1).vec()))
    });

    group.bench_function(BenchmarkId::new("compose_in_place", ""), |b| {
        b.iter(|| {
            let mut t = black_box(t1);
            t *= black_box(t2);
            black_box(t)
        })
    });
}

criterion_group!(benches, bench_so3, bench_se3);
criterion_main!(benches);
