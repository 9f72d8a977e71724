//! Knock-out option values on a binomial tree.
//!
//! The value field is the second backward sequence of a barrier lattice. It
//! consumes a finished [`SurvivalField`] and never mutates it.

use super::binomial_tree::BinomialTree;
use super::field::TriangularField;
use super::survival::SurvivalField;
use fxb_core::{DiscountFactor, Price, Real, Size};

/// How surviving knock-out values are weighted during backward induction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KnockOutWeighting {
    /// `v(i, j) = s(i, j) · disc · E[v(i+1, ·)]` at every unbreached node.
    ///
    /// The survival multiplier is applied at each parent on top of the
    /// terminal pruning, which suppresses value carried by paths whose
    /// survival decays as they approach the barrier.
    #[default]
    SurvivalWeighted,
    /// `v(i, j) = disc · E[v(i+1, ·)]` at unbreached nodes and zero at
    /// breached ones; the classical discretely monitored knock-out.
    Pruned,
}

/// Knock-out values at every node of a tree.
#[derive(Debug, Clone)]
pub struct BarrierValueField {
    values: TriangularField<Price>,
}

impl BarrierValueField {
    /// Roll a knock-out payoff back from maturity.
    ///
    /// Terminal values are `payoff(S) · s(N, j)`, so breached terminal nodes
    /// pay nothing. Interior nodes that are themselves breached are forced to
    /// zero; the others follow `weighting`.
    pub fn roll_back(
        tree: &BinomialTree,
        survival: &SurvivalField,
        payoff: &dyn Fn(Real) -> Real,
        discount: DiscountFactor,
        weighting: KnockOutWeighting,
    ) -> Self {
        let n = tree.steps();
        debug_assert_eq!(survival.steps(), n, "survival field built on another tree");
        let mut values = TriangularField::filled(n, 0.0);

        for j in 0..tree.size(n) {
            values.set(n, j, payoff(tree.underlying(n, j)) * survival.at(n, j));
        }

        for i in (0..n).rev() {
            for j in 0..tree.size(i) {
                let v = if survival.is_breached(i, j) {
                    0.0
                } else {
                    let continuation = discount * tree.expectation(i, j, values.layer(i + 1));
                    match weighting {
                        KnockOutWeighting::SurvivalWeighted => survival.at(i, j) * continuation,
                        KnockOutWeighting::Pruned => continuation,
                    }
                };
                values.set(i, j, v);
            }
        }

        Self { values }
    }

    /// Value at node `(i, j)`.
    pub fn at(&self, i: Size, j: Size) -> Price {
        self.values.get(i, j)
    }

    /// Values of layer `i`.
    pub fn layer(&self, i: Size) -> &[Price] {
        self.values.layer(i)
    }

    /// Present value at the root.
    pub fn root(&self) -> Price {
        self.values.get(0, 0)
    }
}
