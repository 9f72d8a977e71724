//! Resolving the lattice volatility from a provider before pricing.

use approx::assert_relative_eq;
use fxbarrier::{
    price, BarrierContract, BarrierType, BinomialBarrierEngine, FallbackVolatility,
    FlatVolatility, KnockOutWeighting, OptionType, PricingEngine, VolatilityGrid,
    VolatilityProvider,
};

fn grid() -> VolatilityGrid {
    let times = [0.5, 1.0, 2.0];
    let strikes = [80.0, 100.0, 120.0];
    let vols = vec![
        vec![0.24, 0.20, 0.22],
        vec![0.23, 0.19, 0.21],
        vec![0.22, 0.18, 0.20],
    ];
    VolatilityGrid::new(&times, &strikes, &vols).unwrap()
}

fn contract_from(provider: &dyn VolatilityProvider, strike: f64) -> BarrierContract {
    BarrierContract::builder(OptionType::Call, BarrierType::DownOut, 100.0, strike, 85.0, 1.0)
        .with_volatility_from(provider)
        .with_rates(0.05, 0.02)
        .with_steps(150)
        .build()
        .unwrap()
}

#[test]
fn test_grid_volatility_feeds_the_lattice() {
    let g = grid();
    let from_grid = contract_from(&g, 100.0);
    assert_relative_eq!(from_grid.volatility(), 0.19, max_relative = 1e-12);

    let flat = FlatVolatility::new(from_grid.volatility()).unwrap();
    let from_flat = contract_from(&flat, 100.0);
    assert_eq!(price(&from_grid).unwrap(), price(&from_flat).unwrap());
}

#[test]
fn test_out_of_grid_query_uses_fallback() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("fxb_termstructures=warn")
        .with_test_writer()
        .try_init();

    let g = grid();
    assert_eq!(g.try_implied_vol(150.0, 1.0), None);

    let p = FallbackVolatility::new(g, 0.25).unwrap();
    let c = contract_from(&p, 150.0);
    assert_eq!(c.volatility(), 0.25);

    let flat = contract_from(&FlatVolatility::new(0.25).unwrap(), 150.0);
    assert_eq!(price(&c).unwrap(), price(&flat).unwrap());
}

#[test]
fn test_higher_volatility_lowers_survival() {
    let low = contract_from(&FlatVolatility::new(0.05).unwrap(), 100.0);
    let high = contract_from(&FlatVolatility::new(0.40).unwrap(), 100.0);
    let engine = BinomialBarrierEngine::with_weighting(KnockOutWeighting::Pruned);
    let s_low = engine.calculate(&low).unwrap().result("survival_probability").unwrap();
    let s_high = engine.calculate(&high).unwrap().result("survival_probability").unwrap();
    assert!(s_high < s_low, "survival low σ = {s_low}, high σ = {s_high}");
}
