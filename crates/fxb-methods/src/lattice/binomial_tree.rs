//! Cox-Ross-Rubinstein recombining binomial tree.
//!
//! Equal multiplicative jumps `u = e^{σ√Δt}`, `d = 1/u`; the drift lives
//! entirely in the up-probability `q = (e^{(r_d − r_f)Δt} − d) / (u − d)`.
//! Discounting is per step at the domestic rate only; the foreign rate
//! enters through `q`.

use fxb_core::{
    ensure, errors::Result, DiscountFactor, Error, Probability, Rate, Real, Size, Time, Volatility,
};
use tracing::warn;

/// Per-step parameters of a CRR lattice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrrParameters {
    steps: Size,
    dt: Time,
    log_step: Real,
    up: Real,
    down: Real,
    up_probability: Probability,
    discount: DiscountFactor,
}

impl CrrParameters {
    /// Discretise `[0, maturity]` into `steps` equal intervals.
    ///
    /// # Errors
    /// * [`Error::Configuration`] if `steps < 1`, `maturity <= 0` or
    ///   `volatility <= 0` (or either is non-finite).
    /// * [`Error::DegenerateLattice`] if the resulting up-probability is not
    ///   strictly inside `(0, 1)`.
    pub fn new(
        maturity: Time,
        steps: Size,
        volatility: Volatility,
        domestic_rate: Rate,
        foreign_rate: Rate,
    ) -> Result<Self> {
        ensure!(steps >= 1, "steps must be >= 1, got {steps}");
        ensure!(
            maturity.is_finite() && maturity > 0.0,
            "maturity must be finite and positive, got {maturity}"
        );
        ensure!(
            volatility.is_finite() && volatility > 0.0,
            "volatility must be finite and positive, got {volatility}"
        );

        let dt = maturity / steps as Real;
        let log_step = volatility * dt.sqrt();
        let up = log_step.exp();
        let down = 1.0 / up;
        let growth = ((domestic_rate - foreign_rate) * dt).exp();
        let up_probability = (growth - down) / (up - down);
        let discount = (-domestic_rate * dt).exp();

        if !(up_probability > 0.0 && up_probability < 1.0) {
            warn!(
                up_probability,
                steps,
                dt,
                up,
                down,
                "risk-neutral up-probability outside (0, 1)"
            );
            return Err(Error::DegenerateLattice {
                up_probability,
                steps,
            });
        }

        Ok(Self {
            steps,
            dt,
            log_step,
            up,
            down,
            up_probability,
            discount,
        })
    }

    /// Number of time steps `N`.
    pub fn steps(&self) -> Size {
        self.steps
    }

    /// Time increment `Δt = T / N`.
    pub fn dt(&self) -> Time {
        self.dt
    }

    /// Up factor `u`.
    pub fn up(&self) -> Real {
        self.up
    }

    /// Down factor `d = 1/u`.
    pub fn down(&self) -> Real {
        self.down
    }

    /// Risk-neutral up-probability `q`.
    pub fn up_probability(&self) -> Probability {
        self.up_probability
    }

    /// Per-step domestic discount factor `e^{−r_d Δt}`.
    pub fn discount(&self) -> DiscountFactor {
        self.discount
    }
}

/// A recombining binomial tree of underlying prices.
///
/// The tree has `steps + 1` time layers, with layer `i` having `i + 1`
/// nodes. Node `(i, j)` is reached by `i − j` up-moves and `j` down-moves,
/// so `j = 0` is the highest price in each layer. Prices are evaluated in
/// log space, `x0 · e^{(i − 2j) σ√Δt}`, which makes every up-down pair
/// cancel exactly: node `(2k, k)` is `x0` bit for bit.
#[derive(Debug, Clone)]
pub struct BinomialTree {
    x0: Real,
    params: CrrParameters,
}

impl BinomialTree {
    /// Build the CRR tree rooted at `x0`.
    pub fn cox_ross_rubinstein(x0: Real, params: CrrParameters) -> Self {
        Self { x0, params }
    }

    // ── Accessors ────────────────────────────────────────────────────────

    /// Number of time steps.
    pub fn steps(&self) -> Size {
        self.params.steps
    }

    /// Lattice parameters.
    pub fn params(&self) -> &CrrParameters {
        &self.params
    }

    /// Initial underlying value (spot price).
    pub fn x0(&self) -> Real {
        self.x0
    }

    /// Number of nodes at time step `i` (always `i + 1`).
    pub fn size(&self, i: Size) -> Size {
        i + 1
    }

    /// Index of the descendant node at step `i+1` for a given `branch`.
    ///
    /// `branch = 0` → up, `branch = 1` → down.
    pub fn descendant(&self, _i: Size, index: Size, branch: Size) -> Size {
        index + branch
    }

    /// Transition probability for `branch` (0 = up, 1 = down).
    pub fn probability(&self, _i: Size, _index: Size, branch: Size) -> Probability {
        if branch == 0 {
            self.params.up_probability
        } else {
            1.0 - self.params.up_probability
        }
    }

    /// Underlying value at node `(i, index)`.
    #[inline]
    pub fn underlying(&self, i: Size, index: Size) -> Real {
        let net_ups = i as isize - 2 * index as isize;
        self.x0 * (net_ups as Real * self.params.log_step).exp()
    }

    /// Expectation over the two descendants of `(i, index)` of a quantity
    /// stored per node of layer `i + 1`.
    #[inline]
    pub fn expectation(&self, i: Size, index: Size, next_layer: &[Real]) -> Real {
        let q = self.probability(i, index, 0);
        let up = next_layer[self.descendant(i, index, 0)];
        let down = next_layer[self.descendant(i, index, 1)];
        q * up + (1.0 - q) * down
    }
}
