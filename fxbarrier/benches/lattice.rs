//! Lattice cost versus step count.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fxbarrier::{
    methods::lattice::{BinomialTree, CrrParameters, SurvivalField},
    BarrierContract, BarrierType, BinomialBarrierEngine, KnockOutWeighting, OptionType,
    PricingEngine,
};

fn contract(steps: usize) -> BarrierContract {
    BarrierContract::builder(OptionType::Call, BarrierType::UpOut, 100.0, 100.0, 120.0, 1.0)
        .with_volatility(0.2)
        .with_rates(0.05, 0.02)
        .with_steps(steps)
        .build()
        .unwrap()
}

fn benchmark_barrier_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("binomial_barrier_engine");

    for steps in [50, 200, 500, 1000, 2000] {
        let contract = contract(steps);
        for (name, weighting) in [
            ("survival_weighted", KnockOutWeighting::SurvivalWeighted),
            ("pruned", KnockOutWeighting::Pruned),
        ] {
            let engine = BinomialBarrierEngine::with_weighting(weighting);
            group.bench_with_input(BenchmarkId::new(name, steps), &contract, |b, c| {
                b.iter(|| engine.calculate(black_box(c)))
            });
        }
    }

    group.finish();
}

fn benchmark_survival_field(c: &mut Criterion) {
    let mut group = c.benchmark_group("survival_field");

    for steps in [200, 1000] {
        let params = CrrParameters::new(1.0, steps, 0.2, 0.05, 0.02).unwrap();
        let tree = BinomialTree::cox_ross_rubinstein(100.0, params);
        group.bench_with_input(BenchmarkId::from_parameter(steps), &tree, |b, t| {
            b.iter(|| SurvivalField::build(black_box(t), |s| s >= 120.0))
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_barrier_engine, benchmark_survival_field);
criterion_main!(benches);
