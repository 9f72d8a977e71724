//! Barrier-survival probabilities on a binomial tree.
//!
//! `survival(i, j)` is the risk-neutral probability that a path standing at
//! node `(i, j)` reaches maturity without touching the barrier. It is
//! computed as its own backward sequence so that its invariants can be
//! checked independently of any option value:
//!
//! * terminal layer: `1` if the node price is on the safe side, `0` if it
//!   is breached;
//! * interior: `q · s(i+1, j) + (1 − q) · s(i+1, j+1)`, forced to `0` at
//!   breached nodes (a breached node cannot heal);
//! * every value lies in `[0, 1]`, and values shrink towards the barrier.

use super::binomial_tree::BinomialTree;
use super::field::TriangularField;
use fxb_core::{Probability, Real, Size};

/// Per-node breach flags and survival probabilities.
#[derive(Debug, Clone)]
pub struct SurvivalField {
    breached: TriangularField<bool>,
    survival: TriangularField<Probability>,
}

impl SurvivalField {
    /// Classify every node with `is_breached` and roll survival back from
    /// maturity.
    pub fn build(tree: &BinomialTree, is_breached: impl Fn(Real) -> bool) -> Self {
        let n = tree.steps();
        let mut breached = TriangularField::filled(n, false);
        let mut survival = TriangularField::filled(n, 0.0);

        // Forward sweep: barrier classification per node price.
        for i in 0..=n {
            for j in 0..tree.size(i) {
                breached.set(i, j, is_breached(tree.underlying(i, j)));
            }
        }

        for j in 0..tree.size(n) {
            survival.set(n, j, if breached.get(n, j) { 0.0 } else { 1.0 });
        }

        for i in (0..n).rev() {
            for j in 0..tree.size(i) {
                let s = if breached.get(i, j) {
                    0.0
                } else {
                    tree.expectation(i, j, survival.layer(i + 1))
                };
                survival.set(i, j, s);
            }
        }

        Self { breached, survival }
    }

    /// Number of time steps.
    pub fn steps(&self) -> Size {
        self.survival.steps()
    }

    /// Survival probability at node `(i, j)`.
    pub fn at(&self, i: Size, j: Size) -> Probability {
        self.survival.get(i, j)
    }

    /// Survival probabilities of layer `i`.
    pub fn layer(&self, i: Size) -> &[Probability] {
        self.survival.layer(i)
    }

    /// Whether node `(i, j)` sits on or beyond the barrier.
    pub fn is_breached(&self, i: Size, j: Size) -> bool {
        self.breached.get(i, j)
    }

    /// Survival probability seen from the root.
    pub fn root(&self) -> Probability {
        self.survival.get(0, 0)
    }
}
