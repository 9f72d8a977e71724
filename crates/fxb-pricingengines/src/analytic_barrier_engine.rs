//! Analytic barrier option pricing engine.
//!
//! Prices European single-barrier FX options using the closed-form solution
//! from Reiner & Rubinstein (1991) under continuous monitoring, without
//! rebate. Serves as the continuous-time reference for the lattice engine.

use fxb_core::{errors::Result, Price, Probability, Rate, Real, Time, Volatility};
use fxb_instruments::{
    BarrierContract, BarrierType, OptionType, PricingEngine, PricingResults, VanillaPricer,
};
use fxb_math::distributions::normal_cdf;

use crate::analytic_european_engine::BlackScholesPricer;

/// Analytic barrier option engine (Reiner-Rubinstein).
///
/// Prices knock-in and knock-out, up and down, calls and puts. The vanilla
/// leg used when the barrier is already breached at inception comes from
/// the supplied [`VanillaPricer`].
///
/// The price of a down-and-out call, for example, is:
///
/// $$C_{\text{do}} = C_{\text{BS}} - C_{\text{di}}$$
#[derive(Debug, Clone, Default)]
pub struct AnalyticBarrierEngine<P = BlackScholesPricer> {
    vanilla: P,
}

impl AnalyticBarrierEngine {
    /// Engine using the Garman-Kohlhagen vanilla price.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<P: VanillaPricer> AnalyticBarrierEngine<P> {
    /// Engine using a custom vanilla pricer.
    pub fn with_vanilla_pricer(vanilla: P) -> Self {
        Self { vanilla }
    }
}

/// Closed-form barrier option price (Reiner-Rubinstein).
///
/// Handles all 8 barrier types: up/down × in/out × call/put. If `spot` is
/// already on or beyond `barrier`, knock-outs are worth zero and knock-ins
/// are worth the vanilla.
#[allow(clippy::too_many_arguments)]
pub fn analytic_barrier_price(
    option_type: OptionType,
    barrier_type: BarrierType,
    spot: Price,
    strike: Price,
    barrier: Price,
    domestic_rate: Rate,
    foreign_rate: Rate,
    volatility: Volatility,
    maturity: Time,
) -> Price {
    price_with(
        &BlackScholesPricer,
        option_type,
        barrier_type,
        spot,
        strike,
        barrier,
        domestic_rate,
        foreign_rate,
        volatility,
        maturity,
    )
}

/// Risk-neutral probability that spot never touches `barrier` before
/// `maturity` under continuous monitoring.
///
/// With `ν = r_d − r_f − σ²/2` and `h = ln(B/S)`, for an up barrier:
///
/// $$P = N\left(\frac{h - \nu T}{\sigma\sqrt{T}}\right)
///     - e^{2\nu h/\sigma^2} N\left(\frac{-h - \nu T}{\sigma\sqrt{T}}\right)$$
///
/// and symmetrically for a down barrier. Zero when the barrier is already
/// breached; one at expiry otherwise.
pub fn barrier_survival_probability(
    barrier_type: BarrierType,
    spot: Price,
    barrier: Price,
    domestic_rate: Rate,
    foreign_rate: Rate,
    volatility: Volatility,
    maturity: Time,
) -> Probability {
    if barrier_type.is_breached(spot, barrier) {
        return 0.0;
    }
    let std_dev = volatility * maturity.max(0.0).sqrt();
    if std_dev <= 0.0 {
        return 1.0;
    }

    let nu = domestic_rate - foreign_rate - 0.5 * volatility * volatility;
    let h = (barrier / spot).ln();
    let reflection = (2.0 * nu * h / (volatility * volatility)).exp();
    let drift = nu * maturity;
    let p = if barrier_type.is_up() {
        normal_cdf((h - drift) / std_dev) - reflection * normal_cdf((-h - drift) / std_dev)
    } else {
        normal_cdf((drift - h) / std_dev) - reflection * normal_cdf((h + drift) / std_dev)
    };
    p.clamp(0.0, 1.0)
}

#[allow(clippy::too_many_arguments)]
fn price_with(
    vanilla: &dyn VanillaPricer,
    option_type: OptionType,
    barrier_type: BarrierType,
    spot: Price,
    strike: Price,
    barrier: Price,
    r: Rate,
    q: Rate,
    sigma: Volatility,
    t: Time,
) -> Price {
    if barrier_type.is_breached(spot, barrier) {
        return if barrier_type.is_knock_in() {
            vanilla.vanilla_price(spot, strike, t, sigma, r, q, option_type)
        } else {
            0.0
        };
    }

    if t <= 0.0 {
        let phi = option_type.sign();
        let intrinsic = (phi * (spot - strike)).max(0.0);
        return if barrier_type.is_knock_out() {
            intrinsic // survived
        } else {
            0.0 // never knocked in
        };
    }

    reiner_rubinstein(option_type, barrier_type, spot, strike, barrier, r, q, sigma, t)
}

#[allow(clippy::too_many_arguments)]
fn reiner_rubinstein(
    option_type: OptionType,
    barrier_type: BarrierType,
    spot: Real,
    strike: Real,
    barrier: Real,
    r: Real,
    q: Real,
    sigma: Real,
    t: Real,
) -> Real {
    let sigma2 = sigma * sigma;
    let sqrt_t = t.sqrt();
    let std_dev = sigma * sqrt_t;
    let mu = (r - q - 0.5 * sigma2) / sigma2;

    let phi = option_type.sign(); // +1 call, -1 put
    let eta = if barrier_type.is_up() { -1.0 } else { 1.0 };

    let x1 = (spot / strike).ln() / std_dev + (1.0 + mu) * std_dev;
    let x2 = (spot / barrier).ln() / std_dev + (1.0 + mu) * std_dev;
    let y1 = (barrier * barrier / (spot * strike)).ln() / std_dev + (1.0 + mu) * std_dev;
    let y2 = (barrier / spot).ln() / std_dev + (1.0 + mu) * std_dev;

    let df_r = (-r * t).exp();
    let df_q = (-q * t).exp();
    let h_s = barrier / spot;

    // Components A through D from Reiner-Rubinstein; E and F carry the
    // rebate and vanish here.
    let a = phi * spot * df_q * normal_cdf(phi * x1)
        - phi * strike * df_r * normal_cdf(phi * x1 - phi * std_dev);

    let b = phi * spot * df_q * normal_cdf(phi * x2)
        - phi * strike * df_r * normal_cdf(phi * x2 - phi * std_dev);

    let c = phi * spot * df_q * h_s.powf(2.0 * (mu + 1.0)) * normal_cdf(eta * y1)
        - phi * strike * df_r * h_s.powf(2.0 * mu) * normal_cdf(eta * y1 - eta * std_dev);

    let d = phi * spot * df_q * h_s.powf(2.0 * (mu + 1.0)) * normal_cdf(eta * y2)
        - phi * strike * df_r * h_s.powf(2.0 * mu) * normal_cdf(eta * y2 - eta * std_dev);

    let price = match (barrier_type, option_type) {
        // Down-and-in
        (BarrierType::DownIn, OptionType::Call) if strike >= barrier => c,
        (BarrierType::DownIn, OptionType::Call) => a - b + d,
        (BarrierType::DownIn, OptionType::Put) if strike >= barrier => b - c + d,
        (BarrierType::DownIn, OptionType::Put) => a,

        // Up-and-in
        (BarrierType::UpIn, OptionType::Call) if strike >= barrier => a,
        (BarrierType::UpIn, OptionType::Call) => b - c + d,
        (BarrierType::UpIn, OptionType::Put) if strike >= barrier => a - b + d,
        (BarrierType::UpIn, OptionType::Put) => c,

        // Down-and-out (= vanilla - down-and-in)
        (BarrierType::DownOut, OptionType::Call) if strike >= barrier => a - c,
        (BarrierType::DownOut, OptionType::Call) => b - d,
        (BarrierType::DownOut, OptionType::Put) if strike >= barrier => a - b + c - d,
        (BarrierType::DownOut, OptionType::Put) => 0.0,

        // Up-and-out
        (BarrierType::UpOut, OptionType::Call) if strike >= barrier => 0.0,
        (BarrierType::UpOut, OptionType::Call) => a - b + c - d,
        (BarrierType::UpOut, OptionType::Put) if strike >= barrier => b - d,
        (BarrierType::UpOut, OptionType::Put) => a - c,
    };

    // Cancellation between components can dip a few ulps below zero.
    price.max(0.0)
}

impl<P: VanillaPricer> PricingEngine<BarrierContract> for AnalyticBarrierEngine<P> {
    fn calculate(&self, args: &BarrierContract) -> Result<PricingResults> {
        let vanilla = self.vanilla.vanilla_price(
            args.spot(),
            args.strike(),
            args.maturity(),
            args.volatility(),
            args.domestic_rate(),
            args.foreign_rate(),
            args.option_type(),
        );
        let price = price_with(
            &self.vanilla,
            args.option_type(),
            args.barrier_type(),
            args.spot(),
            args.strike(),
            args.barrier(),
            args.domestic_rate(),
            args.foreign_rate(),
            args.volatility(),
            args.maturity(),
        );

        Ok(PricingResults::from_npv(price).with_result("vanilla_npv", vanilla))
    }
}
