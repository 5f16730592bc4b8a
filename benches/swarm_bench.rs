use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use swarmforge::functions::KnownFunction;
use swarmforge::optimizer::{SwarmMatrix, SwarmState, Topology};
use swarmforge::{ObjectiveFunction, OptimizationOptions, Optimizer};

fn setup_state(particles: usize, dims: usize) -> SwarmState {
    let mut rng = fastrand::Rng::with_seed(42);
    let bounds = KnownFunction::Rastrigin.default_bounds(dims).expect("bounds");
    SwarmState::initialize(particles, &bounds, &KnownFunction::Rastrigin, &mut rng)
        .expect("initial evaluation")
}

fn criterion_benchmark(c: &mut Criterion) {
    let function = KnownFunction::Rastrigin;
    let options = OptimizationOptions::new(function.default_bounds(10).expect("bounds"))
        .with_particles(50)
        .with_iterations(100)
        .with_report_interval(0);
    let optimizer = Optimizer::new(function, options).expect("valid options");

    c.bench_function("run rastrigin (50 x 10D, 100 iters)", |b| {
        b.iter(|| optimizer.run(black_box(Some(7))))
    });

    let state = setup_state(200, 10);
    let ring = Topology::Ring { neighbors: 5 };
    c.bench_function("ring social bests (200 particles, k=5)", |b| {
        b.iter(|| ring.social_bests(black_box(&state)))
    });

    let mut rng = fastrand::Rng::with_seed(1);
    let positions = SwarmMatrix::random(200, 10, &mut rng);
    c.bench_function("batched rastrigin (200 x 10D)", |b| {
        b.iter(|| function.evaluate(black_box(&positions)))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
