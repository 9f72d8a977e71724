//! Binomial-lattice barrier option engine.
//!
//! Each run builds a CRR tree over `[0, T]` with the contract's step count,
//! computes the barrier-survival field for the knock-out direction of the
//! contract, and rolls the knock-out value back to the root. Knock-in
//! values are the same-tree vanilla minus the knock-out value, so
//! `in + out == vanilla` holds on the lattice up to rounding.
//!
//! The engine is pure: trees and fields live for a single call and nothing
//! is cached between calls.

use fxb_core::{ensure_post, errors::Result, Price, Real};
use fxb_instruments::{BarrierContract, PricingEngine, PricingResults};
use fxb_methods::lattice::{
    price_european, BarrierValueField, BinomialTree, CrrParameters, KnockOutWeighting,
    SurvivalField,
};
use tracing::debug;

/// Relative size of the rounding residue tolerated below zero in
/// `vanilla − knock_out`.
const CANCELLATION_TOLERANCE: Real = 1e-12;

/// Lattice pricing engine for single-barrier European FX options.
#[derive(Debug, Clone, Copy, Default)]
pub struct BinomialBarrierEngine {
    weighting: KnockOutWeighting,
}

impl BinomialBarrierEngine {
    /// Engine with the default [`KnockOutWeighting::SurvivalWeighted`] policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine with an explicit knock-out weighting policy.
    pub fn with_weighting(weighting: KnockOutWeighting) -> Self {
        Self { weighting }
    }

    /// The knock-out weighting policy in use.
    pub fn weighting(&self) -> KnockOutWeighting {
        self.weighting
    }
}

impl PricingEngine<BarrierContract> for BinomialBarrierEngine {
    fn calculate(&self, args: &BarrierContract) -> Result<PricingResults> {
        let params = CrrParameters::new(
            args.maturity(),
            args.steps(),
            args.volatility(),
            args.domestic_rate(),
            args.foreign_rate(),
        )?;
        debug!(
            steps = params.steps(),
            dt = params.dt(),
            up = params.up(),
            down = params.down(),
            up_probability = params.up_probability(),
            discount = params.discount(),
            barrier_type = %args.barrier_type(),
            option_type = %args.option_type(),
            "building barrier lattice"
        );

        let tree = BinomialTree::cox_ross_rubinstein(args.spot(), params);
        let discount = params.discount();
        let terminal = args.payoff();
        let payoff = |s: Real| terminal.value(s);

        let vanilla = price_european(&tree, &payoff, discount);

        let knock_out_type = args.barrier_type().knock_out_counterpart();
        let barrier = args.barrier();
        let survival = SurvivalField::build(&tree, |s| knock_out_type.is_breached(s, barrier));
        if survival.is_breached(0, 0) {
            debug!(spot = args.spot(), barrier, "barrier breached at inception");
        }

        let knock_out =
            BarrierValueField::roll_back(&tree, &survival, &payoff, discount, self.weighting)
                .root();

        let npv = if args.barrier_type().is_knock_in() {
            let npv = vanilla - knock_out;
            if npv < 0.0 && -npv <= CANCELLATION_TOLERANCE * vanilla.max(1.0) {
                0.0
            } else {
                npv
            }
        } else {
            knock_out
        };

        ensure_post!(
            npv.is_finite() && npv >= 0.0,
            "lattice produced invalid price {npv} (vanilla {vanilla}, knock-out {knock_out})"
        );
        debug!(
            npv,
            vanilla,
            survival_probability = survival.root(),
            "barrier lattice priced"
        );

        Ok(PricingResults::from_npv(npv)
            .with_result("survival_probability", survival.root())
            .with_result("vanilla_npv", vanilla)
            .with_result("up_probability", params.up_probability())
            .with_result("steps", params.steps() as Real))
    }
}

/// Price `contract` on the lattice with the default engine settings.
pub fn price(contract: &BarrierContract) -> Result<Price> {
    BinomialBarrierEngine::new()
        .calculate(contract)
        .map(|r| r.npv)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use fxb_core::Error;
    use fxb_instruments::{BarrierType, OptionType};

    fn contract(
        option_type: OptionType,
        barrier_type: BarrierType,
        barrier: Real,
        steps: usize,
    ) -> BarrierContract {
        BarrierContract::builder(option_type, barrier_type, 100.0, 100.0, barrier, 1.0)
            .with_volatility(0.2)
            .with_rates(0.05, 0.02)
            .with_steps(steps)
            .build()
            .unwrap()
    }

    #[test]
    fn up_out_call_scenario() {
        let c = contract(OptionType::Call, BarrierType::UpOut, 110.0, 200);
        let r = BinomialBarrierEngine::new().calculate(&c).unwrap();
        let vanilla = r.result("vanilla_npv").unwrap();
        assert!(r.npv > 0.0, "npv = {}", r.npv);
        assert!(r.npv < vanilla, "npv = {}, vanilla = {vanilla}", r.npv);
        assert!((vanilla - 9.21729155156533).abs() < 1e-9, "vanilla = {vanilla}");
        assert_eq!(r.result("steps"), Some(200.0));
        let s = r.result("survival_probability").unwrap();
        assert!((s - 0.36396796243111856).abs() < 1e-9, "survival = {s}");
    }

    #[test]
    fn in_plus_out_is_lattice_vanilla() {
        for weighting in [KnockOutWeighting::SurvivalWeighted, KnockOutWeighting::Pruned] {
            let engine = BinomialBarrierEngine::with_weighting(weighting);
            for (ot, b) in [(OptionType::Call, 90.0), (OptionType::Put, 85.0)] {
                let knock_out = contract(ot, BarrierType::DownOut, b, 150);
                let knock_in = knock_out.with_barrier_type(BarrierType::DownIn);
                let out = engine.calculate(&knock_out).unwrap();
                let inn = engine.calculate(&knock_in).unwrap();
                let vanilla = out.result("vanilla_npv").unwrap();
                assert_relative_eq!(out.npv + inn.npv, vanilla, max_relative = 1e-12);
            }
        }
    }

    #[test]
    fn pruned_lattice_matches_reference() {
        let engine = BinomialBarrierEngine::with_weighting(KnockOutWeighting::Pruned);
        let npv = engine
            .calculate(&contract(OptionType::Call, BarrierType::DownOut, 90.0, 500))
            .unwrap()
            .npv;
        assert!((npv - 7.649485413130433).abs() < 1e-8, "npv = {npv}");
    }

    #[test]
    fn knock_out_breached_at_inception_is_zero() {
        for bt in [BarrierType::DownOut, BarrierType::UpOut] {
            let c = contract(OptionType::Call, bt, 100.0, 50);
            let r = BinomialBarrierEngine::new().calculate(&c).unwrap();
            assert_eq!(r.npv, 0.0);
            assert_eq!(r.result("survival_probability"), Some(0.0));
        }
    }

    #[test]
    fn knock_in_breached_at_inception_is_vanilla() {
        for bt in [BarrierType::DownIn, BarrierType::UpIn] {
            let c = contract(OptionType::Put, bt, 100.0, 50);
            let r = BinomialBarrierEngine::new().calculate(&c).unwrap();
            assert_eq!(Some(r.npv), r.result("vanilla_npv"));
        }
    }

    #[test]
    fn degenerate_lattice_is_reported() {
        let c = BarrierContract::builder(OptionType::Call, BarrierType::UpOut, 1.0, 1.0, 1.2, 1.0)
            .with_volatility(0.01)
            .with_rates(0.25, 0.05)
            .with_steps(1)
            .build()
            .unwrap();
        let err = price(&c).unwrap_err();
        assert!(
            matches!(err, Error::DegenerateLattice { steps: 1, .. }),
            "got {err:?}"
        );
    }

    #[test]
    fn weighting_is_configurable() {
        assert_eq!(BinomialBarrierEngine::new().weighting(), KnockOutWeighting::SurvivalWeighted);
        let e = BinomialBarrierEngine::with_weighting(KnockOutWeighting::Pruned);
        assert_eq!(e.weighting(), KnockOutWeighting::Pruned);
    }
}
