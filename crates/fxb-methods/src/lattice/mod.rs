//! Lattice methods for barrier option pricing.
//!
//! # Overview
//!
//! * [`CrrParameters`] / [`BinomialTree`]: the recombining CRR tree
//! * [`SurvivalField`]: per-node barrier-survival probabilities
//! * [`BarrierValueField`]: knock-out values rolled back from maturity
//! * [`price_european`]: plain backward induction on the same tree
//!
//! Every pricing run builds its own tree and fields; nothing here is shared
//! between runs.

pub mod barrier_value;
pub mod binomial_tree;
pub mod field;
pub mod survival;

pub use barrier_value::{BarrierValueField, KnockOutWeighting};
pub use binomial_tree::{BinomialTree, CrrParameters};
pub use field::TriangularField;
pub use survival::SurvivalField;

use fxb_core::{DiscountFactor, Real};

// ─── Backward-induction pricing ───────────────────────────────────────────────

/// Price a European option by backward induction on a binomial tree.
///
/// # Arguments
/// * `tree`: the binomial tree (already constructed)
/// * `payoff`: payoff function `S → value` (e.g. `|s| (s - K).max(0.0)`)
/// * `discount`: per-step discount factor, typically `exp(−r_d · Δt)`
pub fn price_european(
    tree: &BinomialTree,
    payoff: &dyn Fn(Real) -> Real,
    discount: DiscountFactor,
) -> Real {
    let n = tree.steps();

    let mut values: Vec<Real> = (0..tree.size(n))
        .map(|j| payoff(tree.underlying(n, j)))
        .collect();

    // In place: node j of layer i only reads j and j + 1 of layer i + 1.
    for i in (0..n).rev() {
        for j in 0..tree.size(i) {
            values[j] = discount * tree.expectation(i, j, &values);
        }
    }

    values[0]
}
